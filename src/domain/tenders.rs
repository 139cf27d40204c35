use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{DocumentReader, FromDocument, MappingError};
use super::validation::{
    non_blank, non_negative_decimal, required, timestamp, ValidationResult, DEFAULT_JURISDICTION,
    DEFAULT_TENDER_STATUS,
};
use crate::store::{Collection, Predicate, RawDocument};

/// Conventional tender status values. Other values are accepted as-is.
pub mod status {
    pub const OPEN: &str = "open";
    pub const CLOSED: &str = "closed";
    pub const AWARDED: &str = "awarded";
}

/// Request DTO for creating a tender
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTenderRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget_qar: Option<Decimal>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CreateTenderRequest {
    /// Check field rules and apply defaults.
    pub fn validate(self) -> ValidationResult<NewTender> {
        let title = non_blank("title", required("title", self.title)?)?;
        let description = required("description", self.description)?;
        let category = required("category", self.category)?;
        let budget_qar = self
            .budget_qar
            .map(|b| non_negative_decimal("budget_qar", b))
            .transpose()?;
        let issuer = required("issuer", self.issuer)?;
        let deadline = timestamp("deadline", &required("deadline", self.deadline)?)?;

        Ok(NewTender {
            title,
            description,
            category,
            budget_qar,
            issuer,
            location: self
                .location
                .unwrap_or_else(|| DEFAULT_JURISDICTION.to_string()),
            deadline,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_TENDER_STATUS.to_string()),
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// A validated tender, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTender {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub budget_qar: Option<Decimal>,
    pub issuer: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub tags: Vec<String>,
}

/// Optional search criteria for listing tenders. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fields searched by the free-text criterion
pub const SEARCH_FIELDS: [&str; 3] = ["title", "description", "tags"];

impl TenderFilter {
    pub fn to_predicate(&self) -> Predicate {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        let mut clauses = Vec::new();

        if let Some(q) = present(&self.q) {
            clauses.push(Predicate::any_of(
                SEARCH_FIELDS
                    .iter()
                    .map(|&field| Predicate::contains(field, q.clone()))
                    .collect(),
            ));
        }
        if let Some(category) = present(&self.category) {
            clauses.push(Predicate::eq("category", category));
        }
        if let Some(status) = present(&self.status) {
            clauses.push(Predicate::eq("status", status));
        }

        Predicate::all_of(clauses)
    }
}

/// Response DTO for tender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget_qar: Option<Decimal>,
    pub issuer: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub tags: Vec<String>,
}

impl FromDocument for TenderResponse {
    const COLLECTION: Collection = Collection::Tender;

    fn from_document(doc: &RawDocument) -> Result<Self, MappingError> {
        let r = DocumentReader::new(Self::COLLECTION, doc);
        Ok(Self {
            id: r.id()?,
            title: r.required("title")?,
            description: r.required("description")?,
            category: r.required("category")?,
            budget_qar: r.optional("budget_qar")?,
            issuer: r.required("issuer")?,
            location: r.or_else("location", || DEFAULT_JURISDICTION.to_string())?,
            deadline: r.required("deadline")?,
            status: r.or_else("status", || DEFAULT_TENDER_STATUS.to_string())?,
            tags: r.or_else("tags", Vec::new)?,
        })
    }
}

/// Demo tenders inserted by the seed endpoint
pub fn sample_tenders(deadline: DateTime<Utc>) -> Vec<NewTender> {
    let samples = [
        (
            "Road Maintenance for Al Rayyan",
            "Annual maintenance of municipal roads including resurfacing and signage.",
            "Construction",
            2_500_000,
            "Ministry of Municipality",
            "Al Rayyan, Qatar",
            ["roads", "maintenance", "municipality"],
        ),
        (
            "IT Infrastructure Upgrade - Education Sector",
            "Supply and installation of network equipment and servers for public schools.",
            "IT",
            1_800_000,
            "Ministry of Education and Higher Education",
            "Doha, Qatar",
            ["network", "servers", "education"],
        ),
        (
            "Healthcare Consumables Supply",
            "Framework agreement for supply of medical consumables to hospitals.",
            "Healthcare",
            1_200_000,
            "Ministry of Public Health",
            DEFAULT_JURISDICTION,
            ["medical", "consumables", "framework"],
        ),
    ];

    samples
        .into_iter()
        .map(
            |(title, description, category, budget, issuer, location, tags)| NewTender {
                title: title.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                budget_qar: Some(Decimal::from(budget)),
                issuer: issuer.to_string(),
                location: location.to_string(),
                deadline,
                status: status::OPEN.to_string(),
                tags: tags.into_iter().map(str::to_string).collect(),
            },
        )
        .collect()
}
