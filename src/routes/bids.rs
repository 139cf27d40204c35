//! Bid routes
//!
//! Bid submission and listing for tenders.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::{Created, IdResponse};
use crate::app::AppState;
use crate::domain::{bids_for_tender, BidResponse, CreateBidRequest, FromDocument};
use crate::error::{ApiError, ApiResult};
use crate::store::{to_document, Collection, ObjectId};

/// POST /api/tenders/:tender_id/bids
///
/// Submit a bid for a tender. The tender must exist; its status is not
/// checked.
pub async fn create_bid(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<String>,
    WithRejection(Json(mut req), _): WithRejection<Json<CreateBidRequest>, ApiError>,
) -> ApiResult<Created<IdResponse>> {
    let tender_id = ObjectId::parse_str(&tender_id)?;

    req.tender_id = Some(tender_id.to_hex());
    let bid = req.validate()?;

    let tender = state.store.find_one(Collection::Tender, tender_id).await?;
    if tender.is_none() {
        return Err(ApiError::not_found("Tender not found"));
    }

    let id = state
        .store
        .insert(Collection::Bid, to_document(&bid)?)
        .await?;

    tracing::info!(
        bid_id = %id,
        tender_id = %tender_id,
        company_name = %bid.company_name,
        amount_qar = %bid.amount_qar,
        "Bid submitted"
    );

    Ok(Created(IdResponse { id: id.to_hex() }))
}

/// GET /api/tenders/:tender_id/bids
///
/// List bids for a tender. An unknown tender has no bids.
pub async fn list_bids(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<String>,
) -> ApiResult<Json<Vec<BidResponse>>> {
    let tender_id = ObjectId::parse_str(&tender_id)?;

    let docs = state
        .store
        .find_many(Collection::Bid, &bids_for_tender(tender_id))
        .await?;
    let bids = BidResponse::from_documents(docs)?;

    tracing::debug!(tender_id = %tender_id, count = bids.len(), "Listed bids");

    Ok(Json(bids))
}
