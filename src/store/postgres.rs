//! PostgreSQL-backed document store
//!
//! All collections share the `documents` table; each row holds one JSONB
//! document. Predicates are compiled to parameterised SQL over `body`.

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::{types::Json, PgPool};

use super::{Collection, DocumentStore, ObjectId, Predicate, RawDocument, StoreResult, ID_FIELD};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, mut document: RawDocument) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(id.to_hex())
            .bind(Json(&document))
            .execute(&self.pool)
            .await?;

        tracing::debug!(collection = %collection, id = %id, "Document inserted");
        Ok(id)
    }

    async fn find_many(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> StoreResult<Vec<RawDocument>> {
        let (sql, binds) = select_sql(collection, predicate);

        let mut query = sqlx::query_scalar::<_, Json<RawDocument>>(&sql);
        for value in binds {
            query = query.bind(value);
        }

        let docs: Vec<RawDocument> = query
            .fetch(&self.pool)
            .map_ok(|Json(doc)| doc)
            .try_collect()
            .await?;

        tracing::debug!(collection = %collection, count = docs.len(), "Documents found");
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: ObjectId,
    ) -> StoreResult<Option<RawDocument>> {
        let doc = sqlx::query_scalar::<_, Json<RawDocument>>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.name())
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(doc)| doc))
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Full `SELECT` for `predicate` over `collection`. `$1` is the collection
/// name; predicate values follow in order.
fn select_sql(collection: Collection, predicate: &Predicate) -> (String, Vec<String>) {
    let mut binds = vec![collection.name().to_string()];
    let filter = compile(predicate, &mut binds);
    let sql = format!("SELECT body FROM documents WHERE collection = $1 AND {filter} ORDER BY seq");
    (sql, binds)
}

fn push_bind(binds: &mut Vec<String>, value: String) -> usize {
    binds.push(value);
    binds.len()
}

fn compile(predicate: &Predicate, binds: &mut Vec<String>) -> String {
    match predicate {
        Predicate::MatchAll => "TRUE".to_string(),
        Predicate::Eq { field, value } => {
            let idx = push_bind(binds, value.clone());
            format!("body->>'{}' = ${}", quote_field(field), idx)
        }
        Predicate::Contains { field, needle } => {
            let idx = push_bind(binds, format!("%{}%", escape_like_pattern(needle)));
            let f = quote_field(field);
            format!(
                "((jsonb_typeof(body->'{f}') = 'string' AND body->>'{f}' ILIKE ${idx} ESCAPE '\\') \
                 OR EXISTS (SELECT 1 FROM jsonb_array_elements_text(\
                 CASE WHEN jsonb_typeof(body->'{f}') = 'array' THEN body->'{f}' ELSE '[]'::jsonb END\
                 ) AS elem(value) WHERE elem.value ILIKE ${idx} ESCAPE '\\'))"
            )
        }
        Predicate::And(clauses) if clauses.is_empty() => "TRUE".to_string(),
        Predicate::Or(clauses) if clauses.is_empty() => "FALSE".to_string(),
        Predicate::And(clauses) => join(clauses, " AND ", binds),
        Predicate::Or(clauses) => join(clauses, " OR ", binds),
    }
}

fn join(clauses: &[Predicate], op: &str, binds: &mut Vec<String>) -> String {
    let parts: Vec<String> = clauses.iter().map(|c| compile(c, binds)).collect();
    format!("({})", parts.join(op))
}

fn quote_field(field: &str) -> String {
    field.replace('\'', "''")
}

fn escape_like_pattern(s: &str) -> String {
    // Escape LIKE meta-characters so user input is matched literally.
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
