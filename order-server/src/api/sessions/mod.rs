//! Diner sessions
//!
//! `POST /api/sessions/scan` turns a scanned QR code (restaurant slug or id
//! plus table id) into an anonymous table token.

use axum::{Json, Router, extract::State, routing::post};
use shared::client::{ScanRequest, ScanResponse};
use shared::error::AppError;

use super::{ApiResult, ok};
use crate::auth::AuthError;
use crate::core::ServerState;
use crate::utils::validation::validate_payload;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sessions/scan", post(scan))
}

async fn scan(
    State(state): State<ServerState>,
    Json(req): Json<ScanRequest>,
) -> ApiResult<ScanResponse> {
    validate_payload(&req)?;
    let tenant = state
        .directory
        .lookup(&req.restaurant)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::from(AuthError::TenantNotFound(req.restaurant.clone())))?;

    let session = state
        .tokens
        .issue_anonymous_table_token(&tenant.id, &req.table_id)?;
    tracing::info!(
        tenant_id = %session.tenant_id,
        table_id = %session.table_id,
        session_id = %session.session_id,
        "Table session started"
    );
    ok(session)
}
