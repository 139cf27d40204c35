//! Companies participating in tenders.
//!
//! Stored in the `company` collection. No endpoint reads or writes companies
//! yet; bids carry the company name inline.

use serde::{Deserialize, Serialize};

use super::document::{DocumentReader, FromDocument, MappingError};
use super::validation::{required, ValidationResult, DEFAULT_JURISDICTION};
use crate::store::{Collection, RawDocument};

/// Request DTO for registering a company
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl CreateCompanyRequest {
    pub fn validate(self) -> ValidationResult<NewCompany> {
        Ok(NewCompany {
            name: required("name", self.name)?,
            email: self.email,
            phone: self.phone,
            address: self.address,
            country: self
                .country
                .unwrap_or_else(|| DEFAULT_JURISDICTION.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCompany {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: String,
}

impl FromDocument for CompanyResponse {
    const COLLECTION: Collection = Collection::Company;

    fn from_document(doc: &RawDocument) -> Result<Self, MappingError> {
        let r = DocumentReader::new(Self::COLLECTION, doc);
        Ok(Self {
            id: r.id()?,
            name: r.required("name")?,
            email: r.optional("email")?,
            phone: r.optional("phone")?,
            address: r.optional("address")?,
            country: r.or_else("country", || DEFAULT_JURISDICTION.to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{to_document, DocumentStore, InMemoryStore};
    use serde_json::json;

    #[test]
    fn test_country_defaults() {
        let req: CreateCompanyRequest = serde_json::from_value(json!({ "name": "Doha Builders" })).unwrap();
        let company = req.validate().unwrap();
        assert_eq!(company.country, "Qatar");
        assert_eq!(company.email, None);
    }

    #[test]
    fn test_name_required() {
        let req: CreateCompanyRequest =
            serde_json::from_value(json!({ "email": "info@example.qa" })).unwrap();
        assert_eq!(req.validate().unwrap_err().field, "name");
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = InMemoryStore::new();
        let company = CreateCompanyRequest {
            name: Some("Doha Builders".into()),
            phone: Some("+974 4000 0000".into()),
            country: Some("Qatar".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        let id = store
            .insert(Collection::Company, to_document(&company).unwrap())
            .await
            .unwrap();
        let doc = store.find_one(Collection::Company, id).await.unwrap().unwrap();
        let out = CompanyResponse::from_document(&doc).unwrap();

        assert_eq!(out.id, id.to_hex());
        assert_eq!(out.name, company.name);
        assert_eq!(out.phone, company.phone);
        assert_eq!(out.country, "Qatar");
    }
}
