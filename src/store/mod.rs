//! Document store gateway
//!
//! The rest of the service talks to persistence only through
//! [`DocumentStore`]: insert one document, find many by [`Predicate`], find
//! one by [`ObjectId`]. Documents are untyped JSON objects here and become
//! typed records in [`crate::domain::document`].

pub mod memory;
pub mod object_id;
pub mod postgres;
pub mod predicate;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use memory::InMemoryStore;
pub use object_id::{InvalidIdentifier, ObjectId};
pub use postgres::PgDocumentStore;
pub use predicate::Predicate;

/// Field under which a stored document carries its identifier
pub const ID_FIELD: &str = "_id";

/// A stored document as returned by the store, including [`ID_FIELD`]
pub type RawDocument = serde_json::Map<String, serde_json::Value>;

/// Named grouping of documents of one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tender,
    Bid,
    Company,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Tender, Self::Bid, Self::Company];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tender => "tender",
            Self::Bid => "bid",
            Self::Company => "company",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations required by the service
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `document` and return its newly assigned identifier. Any
    /// [`ID_FIELD`] already present in `document` is replaced.
    async fn insert(&self, collection: Collection, document: RawDocument) -> StoreResult<ObjectId>;

    /// All documents in `collection` matching `predicate`
    async fn find_many(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> StoreResult<Vec<RawDocument>>;

    async fn find_one(&self, collection: Collection, id: ObjectId)
        -> StoreResult<Option<RawDocument>>;

    /// Connectivity probe for the health endpoint
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Serialize a record into a document suitable for [`DocumentStore::insert`].
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<RawDocument> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}
