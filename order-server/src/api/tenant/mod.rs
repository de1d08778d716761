//! Tenant administration of the caller's own restaurant
//!
//! | Path | Method | Capability |
//! |------|--------|------------|
//! | /api/tenant | GET | order:read |
//! | /api/tenant/settings | PUT | tenant:update |
//! | /api/tenant/deactivate | POST | tenant:deactivate |

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use shared::error::AppError;
use shared::models::{Tenant, TenantSettings};

use super::{ApiResult, for_caller, ok};
use crate::auth::AccessContext;
use crate::auth::capability::ORDER_READ;
use crate::auth::AuthError;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tenant", get(get_tenant))
        .route("/api/tenant/settings", put(update_settings))
        .route("/api/tenant/deactivate", post(deactivate))
}

async fn get_tenant(State(state): State<ServerState>, ctx: AccessContext) -> ApiResult<Tenant> {
    ctx.require(ORDER_READ).map_err(|e| for_caller(&ctx)(e.into()))?;
    let tenant = state
        .directory
        .get(ctx.tenant_id())
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::from(AuthError::TenantNotFound(ctx.tenant_id().to_string())))?;
    ok(tenant)
}

/// Replace tax/service rates and ordering limits
///
/// Orders already placed keep the rates they were priced with.
async fn update_settings(
    State(state): State<ServerState>,
    ctx: AccessContext,
    Json(settings): Json<TenantSettings>,
) -> ApiResult<Tenant> {
    let tenant = state
        .directory
        .update_settings(&ctx, settings)
        .map_err(|e| for_caller(&ctx)(e.into()))?;
    ok(tenant)
}

/// Soft-deactivate the restaurant: every outstanding token stops working
async fn deactivate(State(state): State<ServerState>, ctx: AccessContext) -> ApiResult<Tenant> {
    let tenant = state
        .directory
        .set_active(&ctx, false)
        .map_err(|e| for_caller(&ctx)(e.into()))?;
    ok(tenant)
}
