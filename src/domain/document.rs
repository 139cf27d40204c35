//! Mapping stored documents to typed records
//!
//! Everything read from a [`DocumentStore`](crate::store::DocumentStore)
//! passes through [`FromDocument`] before it reaches a handler. A stored
//! document missing a required field is a storage fault, reported as
//! [`MappingError`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::store::{Collection, ObjectId, RawDocument, ID_FIELD};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{collection} document {id}: field '{field}' {reason}")]
pub struct MappingError {
    pub collection: Collection,
    pub id: String,
    pub field: String,
    pub reason: String,
}

/// Typed record built from a stored document
pub trait FromDocument: Sized {
    const COLLECTION: Collection;

    fn from_document(doc: &RawDocument) -> Result<Self, MappingError>;

    fn from_documents(docs: Vec<RawDocument>) -> Result<Vec<Self>, MappingError> {
        docs.iter().map(Self::from_document).collect()
    }
}

/// Field accessor over one stored document
pub struct DocumentReader<'a> {
    collection: Collection,
    doc: &'a RawDocument,
}

impl<'a> DocumentReader<'a> {
    pub fn new(collection: Collection, doc: &'a RawDocument) -> Self {
        Self { collection, doc }
    }

    fn error(&self, field: &str, reason: impl Into<String>) -> MappingError {
        let id = match self.doc.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            _ => "<unknown>".to_string(),
        };
        MappingError {
            collection: self.collection,
            id,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The document identifier as text
    pub fn id(&self) -> Result<String, MappingError> {
        let raw: String = self.required(ID_FIELD)?;
        ObjectId::parse_str(&raw)
            .map(|id| id.to_hex())
            .map_err(|e| self.error(ID_FIELD, e.reason))
    }

    pub fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T, MappingError> {
        self.optional(field)?
            .ok_or_else(|| self.error(field, "is missing"))
    }

    /// Absent and `null` both read as `None`.
    pub fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, MappingError> {
        match self.doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| self.error(field, format!("has unexpected type: {e}"))),
        }
    }

    pub fn or_else<T: DeserializeOwned>(
        &self,
        field: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, MappingError> {
        Ok(self.optional(field)?.unwrap_or_else(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> RawDocument {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_reads_fields() {
        let d = doc(json!({
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "title": "Roads",
            "tags": ["a"],
            "note": null
        }));
        let reader = DocumentReader::new(Collection::Tender, &d);

        assert_eq!(reader.id().unwrap(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(reader.required::<String>("title").unwrap(), "Roads");
        assert_eq!(reader.optional::<String>("note").unwrap(), None);
        assert_eq!(reader.optional::<String>("absent").unwrap(), None);
        assert_eq!(
            reader.or_else("status", || "open".to_string()).unwrap(),
            "open"
        );
        assert_eq!(reader.or_else("tags", Vec::<String>::new).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_missing_required_field() {
        let d = doc(json!({ "_id": "65a1f0c2e4b0a1b2c3d4e5f6" }));
        let err = DocumentReader::new(Collection::Bid, &d)
            .required::<String>("company_name")
            .unwrap_err();

        assert_eq!(err.collection, Collection::Bid);
        assert_eq!(err.id, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(err.field, "company_name");
        assert_eq!(err.reason, "is missing");
    }

    #[test]
    fn test_wrong_type_is_a_mapping_error() {
        let d = doc(json!({ "title": 42 }));
        let err = DocumentReader::new(Collection::Tender, &d)
            .required::<String>("title")
            .unwrap_err();

        assert_eq!(err.id, "<unknown>");
        assert!(err.reason.starts_with("has unexpected type"));
    }

    #[test]
    fn test_malformed_stored_id() {
        let d = doc(json!({ "_id": "not-an-id" }));
        let err = DocumentReader::new(Collection::Tender, &d).id().unwrap_err();
        assert_eq!(err.field, "_id");
    }
}
