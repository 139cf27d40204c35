use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{DocumentReader, FromDocument, MappingError};
use super::validation::{
    non_negative_decimal, non_negative_integer, required, ValidationError, ValidationResult,
};
use crate::store::{Collection, ObjectId, Predicate, RawDocument};

/// Request DTO for creating a bid
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBidRequest {
    /// Overwritten with the tender in the request path when submitted over HTTP
    #[serde(default)]
    pub tender_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount_qar: Option<Decimal>,
    #[serde(default)]
    pub proposal_summary: Option<String>,
    #[serde(default)]
    pub delivery_time_days: Option<i64>,
}

impl CreateBidRequest {
    pub fn validate(self) -> ValidationResult<NewBid> {
        let tender_id = required("tender_id", self.tender_id)?;
        let tender_id = ObjectId::parse_str(&tender_id)
            .map_err(|e| ValidationError::new("tender_id", e.to_string()))?;
        let company_name = required("company_name", self.company_name)?;
        let amount_qar =
            non_negative_decimal("amount_qar", required("amount_qar", self.amount_qar)?)?;
        let delivery_time_days = self
            .delivery_time_days
            .map(|d| non_negative_integer("delivery_time_days", d))
            .transpose()?;

        Ok(NewBid {
            tender_id,
            company_name,
            contact_email: self.contact_email,
            amount_qar,
            proposal_summary: self.proposal_summary,
            delivery_time_days,
        })
    }
}

/// A validated bid, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBid {
    pub tender_id: ObjectId,
    pub company_name: String,
    pub contact_email: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_qar: Decimal,
    pub proposal_summary: Option<String>,
    pub delivery_time_days: Option<u64>,
}

/// Predicate selecting the bids placed on one tender
pub fn bids_for_tender(tender_id: ObjectId) -> Predicate {
    Predicate::eq("tender_id", tender_id.to_hex())
}

/// Response DTO for bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidResponse {
    pub id: String,
    pub tender_id: String,
    pub company_name: String,
    pub contact_email: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_qar: Decimal,
    pub proposal_summary: Option<String>,
    pub delivery_time_days: Option<u64>,
}

impl FromDocument for BidResponse {
    const COLLECTION: Collection = Collection::Bid;

    fn from_document(doc: &RawDocument) -> Result<Self, MappingError> {
        let r = DocumentReader::new(Self::COLLECTION, doc);
        Ok(Self {
            id: r.id()?,
            tender_id: r.required("tender_id")?,
            company_name: r.required("company_name")?,
            contact_email: r.optional("contact_email")?,
            amount_qar: r.required("amount_qar")?,
            proposal_summary: r.optional("proposal_summary")?,
            delivery_time_days: r.optional("delivery_time_days")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_document;
    use serde_json::json;
    use std::str::FromStr;

    const TENDER: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn request(body: serde_json::Value) -> CreateBidRequest {
        serde_json::from_value(body).unwrap()
    }

    fn minimal() -> serde_json::Value {
        json!({
            "tender_id": TENDER,
            "company_name": "Gulf Paving W.L.L.",
            "amount_qar": 2100000
        })
    }

    #[test]
    fn test_minimal_bid() {
        let bid = request(minimal()).validate().unwrap();
        assert_eq!(bid.tender_id.to_hex(), TENDER);
        assert_eq!(bid.amount_qar, Decimal::from(2_100_000));
        assert_eq!(bid.contact_email, None);
        assert_eq!(bid.proposal_summary, None);
        assert_eq!(bid.delivery_time_days, None);
    }

    #[test]
    fn test_required_fields() {
        for field in ["tender_id", "company_name", "amount_qar"] {
            let mut body = minimal();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(request(body).validate().unwrap_err().field, field);
        }
    }

    #[test]
    fn test_negative_bounds() {
        let mut body = minimal();
        body["amount_qar"] = json!(-0.5);
        assert_eq!(request(body).validate().unwrap_err().field, "amount_qar");

        let mut body = minimal();
        body["delivery_time_days"] = json!(-3);
        assert_eq!(
            request(body).validate().unwrap_err().field,
            "delivery_time_days"
        );

        let mut body = minimal();
        body["amount_qar"] = json!(0);
        body["delivery_time_days"] = json!(0);
        assert!(request(body).validate().is_ok());
    }

    #[test]
    fn test_malformed_tender_reference() {
        let mut body = minimal();
        body["tender_id"] = json!("not-a-tender");
        let err = request(body).validate().unwrap_err();
        assert_eq!(err.field, "tender_id");
    }

    #[test]
    fn test_fractional_days_fail_to_decode() {
        let mut body = minimal();
        body["delivery_time_days"] = json!(2.5);
        assert!(serde_json::from_value::<CreateBidRequest>(body).is_err());
    }

    #[test]
    fn test_stored_document_and_mapping() {
        let mut body = minimal();
        body["amount_qar"] = json!(1999.99);
        body["delivery_time_days"] = json!(45);
        body["contact_email"] = json!("bids@gulfpaving.qa");

        let bid = request(body).validate().unwrap();
        let mut doc = to_document(&bid).unwrap();
        assert_eq!(doc["tender_id"], TENDER);
        assert!(doc["amount_qar"].is_number());

        doc.insert("_id".into(), json!("65a1f0c2e4b0a1b2c3d4e5f7"));
        let out = BidResponse::from_document(&doc).unwrap();
        assert_eq!(out.tender_id, TENDER);
        assert_eq!(out.amount_qar, Decimal::from_str("1999.99").unwrap());
        assert_eq!(out.delivery_time_days, Some(45));
        assert_eq!(out.contact_email.as_deref(), Some("bids@gulfpaving.qa"));
    }

    #[test]
    fn test_bids_for_tender_predicate() {
        let tender = ObjectId::parse_str(TENDER).unwrap();
        let doc = json!({ "tender_id": TENDER });
        let other = json!({ "tender_id": "65a1f0c2e4b0a1b2c3d4e5f7" });

        assert!(bids_for_tender(tender).matches(doc.as_object().unwrap()));
        assert!(!bids_for_tender(tender).matches(other.as_object().unwrap()));
    }
}
