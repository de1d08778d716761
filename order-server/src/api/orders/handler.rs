//! Order API Handlers
//!
//! The engine is synchronous (redb transactions are short and blocking);
//! handlers hand each call to the blocking pool.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{CancelRequest, CreateOrderRequest, NoteRequest, TransitionRequest};
use shared::error::AppError;
use shared::order::{Order, TimelineEntry};

use crate::api::{ApiResult, blocking, for_caller, ok};
use crate::auth::AccessContext;
use crate::core::ServerState;
use crate::utils::validation::validate_payload;

/// Place an order
pub async fn create(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Order> {
    let redact = for_caller(&ctx);
    validate_payload(&req).map_err(&redact)?;
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || engine.create_order(&caller, &req).map_err(AppError::from))
        .await
        .map_err(&redact)?;
    ok(order)
}

/// Active orders of the caller's tenant (kitchen view)
pub async fn list_active(
    State(state): State<ServerState>,
    ctx: AccessContext,
) -> ApiResult<Vec<Order>> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let orders = blocking(move || engine.active_orders(&caller).map_err(AppError::from))
        .await
        .map_err(for_caller(&ctx))?;
    ok(orders)
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || engine.get_order(&caller, &id).map_err(AppError::from))
        .await
        .map_err(for_caller(&ctx))?;
    ok(order)
}

pub async fn timeline(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
) -> ApiResult<Vec<TimelineEntry>> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let entries = blocking(move || engine.timeline(&caller, &id).map_err(AppError::from))
        .await
        .map_err(for_caller(&ctx))?;
    ok(entries)
}

/// Move an order to the requested status
pub async fn transition(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> ApiResult<Order> {
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || {
        engine
            .transition_status(&caller, &id, req.status, req.expected_version)
            .map_err(AppError::from)
    })
    .await
    .map_err(for_caller(&ctx))?;
    ok(order)
}

pub async fn cancel(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> ApiResult<Order> {
    let redact = for_caller(&ctx);
    validate_payload(&req).map_err(&redact)?;
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || {
        engine
            .cancel_order(&caller, &id, req.reason.as_deref())
            .map_err(AppError::from)
    })
    .await
    .map_err(&redact)?;
    ok(order)
}

/// Append a staff note
pub async fn annotate(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Path(id): Path<String>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Order> {
    validate_payload(&req)?;
    let (engine, caller) = (state.orders.clone(), ctx.clone());
    let order = blocking(move || engine.annotate(&caller, &id, &req.note).map_err(AppError::from))
        .await
        .map_err(for_caller(&ctx))?;
    ok(order)
}
