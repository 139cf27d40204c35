//! Tender routes
//!
//! Publishing, searching and reading tenders.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{Created, IdResponse};
use crate::app::AppState;
use crate::domain::{
    sample_tenders, CreateTenderRequest, FromDocument, TenderFilter, TenderResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::store::{to_document, Collection, ObjectId};

/// POST /api/tenders
pub async fn create_tender(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateTenderRequest>, ApiError>,
) -> ApiResult<Created<IdResponse>> {
    let tender = req.validate()?;

    let id = state
        .store
        .insert(Collection::Tender, to_document(&tender)?)
        .await?;

    tracing::info!(
        tender_id = %id,
        title = %tender.title,
        category = %tender.category,
        "Tender created"
    );

    Ok(Created(IdResponse { id: id.to_hex() }))
}

/// GET /api/tenders?q=&category=&status=
pub async fn list_tenders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TenderFilter>,
) -> ApiResult<Json<Vec<TenderResponse>>> {
    let predicate = filter.to_predicate();

    let docs = state.store.find_many(Collection::Tender, &predicate).await?;
    let tenders = TenderResponse::from_documents(docs)?;

    tracing::debug!(
        q = ?filter.q,
        category = ?filter.category,
        status = ?filter.status,
        count = tenders.len(),
        "Listed tenders"
    );

    Ok(Json(tenders))
}

/// GET /api/tenders/:tender_id
pub async fn get_tender(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<String>,
) -> ApiResult<Json<TenderResponse>> {
    let tender_id = ObjectId::parse_str(&tender_id)?;

    let doc = state
        .store
        .find_one(Collection::Tender, tender_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tender not found"))?;

    Ok(Json(TenderResponse::from_document(&doc)?))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub inserted: usize,
}

/// POST /api/seed
///
/// Insert the demo tenders. Each call inserts a fresh copy.
pub async fn seed_tenders(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedResponse>> {
    let mut inserted = 0;
    for tender in sample_tenders(Utc::now()) {
        state
            .store
            .insert(Collection::Tender, to_document(&tender)?)
            .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Seeded sample tenders");
    Ok(Json(SeedResponse { inserted }))
}
