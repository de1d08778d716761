//! Table API
//!
//! | Path | Method | Capability |
//! |------|--------|------------|
//! | /api/tables | GET | order:read |
//! | /api/tables/{id}/order | GET | order:read or own table |
//! | /api/tables/{id}/status | PUT | table:update |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use shared::client::TableStatusRequest;
use shared::error::AppError;
use shared::models::Table;
use shared::order::Order;

use super::{ApiResult, blocking, for_caller, ok};
use crate::auth::AccessContext;
use crate::auth::capability::ORDER_READ;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tables", get(list))
        .route("/api/tables/{id}/order", get(current_order))
        .route("/api/tables/{id}/status", put(set_status))
}

/// Tables of the caller's tenant
async fn list(State(state): State<ServerState>, ctx: AccessContext) -> ApiResult<Vec<Table>> {
    ctx.require(ORDER_READ).map_err(|e| for_caller(&ctx)(e.into()))?;
    let tables = state
        .directory
        .list_tables(ctx.tenant_id())
        .map_err(AppError::from)?;
    ok(tables)
}

/// Active order of a table (None when the table is free)
async fn current_order(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
) -> ApiResult<Option<Order>> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || engine.order_for_table(&caller, &id).map_err(AppError::from))
        .await
        .map_err(for_caller(&ctx))?;
    ok(order)
}

/// Manual status override (cleaning, reserved, ...)
async fn set_status(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
    Json(req): Json<TableStatusRequest>,
) -> ApiResult<Table> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let table = blocking(move || {
        engine
            .set_table_status(&caller, &id, req.status)
            .map_err(AppError::from)
    })
    .await
    .map_err(for_caller(&ctx))?;
    ok(table)
}
