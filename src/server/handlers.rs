//! HTTP route handlers for the ledger server.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};

use super::error::ApiError;
use super::request::{self, ListParams};
use super::response::{AckResponse, ListResponse, SubmitResponse};
use crate::db::record_store::RecordStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
}

/// Handle POST /submit
pub async fn handle_submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let fields = request::parse_body(&body)?;
    let kind = request::kind(&fields)?;

    let id = state.records.create(kind, &fields).await?;

    Ok(Json(SubmitResponse::success(id)))
}

/// Handle POST /update
pub async fn handle_update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AckResponse>, ApiError> {
    let fields = request::parse_body(&body)?;
    let (id, kind) = request::target(&fields)?;

    state.records.update(&id, kind, &fields).await?;

    Ok(Json(AckResponse::success()))
}

/// Handle POST /delete
pub async fn handle_delete(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AckResponse>, ApiError> {
    let fields = request::parse_body(&body)?;
    let (id, kind) = request::target(&fields)?;

    state.records.delete(&id, kind).await?;

    Ok(Json(AckResponse::success()))
}

/// Handle GET /list
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let kind = params.kind()?;

    let items = state.records.list(kind, params.month.as_deref()).await?;

    Ok(Json(ListResponse { items }))
}
