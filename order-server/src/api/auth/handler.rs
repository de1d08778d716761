//! Authentication handlers

use axum::{Json, extract::State};
use shared::client::{
    CurrentActor, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
};
use shared::error::AppError;

use crate::api::{ApiResult, blocking, ok};
use crate::auth::capability::POLICY;
use crate::auth::{AccessContext, Actor, AuthError};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::validate_payload;

/// Exchange credentials for an access + refresh token pair
///
/// An unknown restaurant is reported like wrong credentials so logins
/// never reveal which restaurants exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    validate_payload(&req)?;
    let Some(tenant) = state.directory.lookup(&req.restaurant).map_err(AppError::from)? else {
        security_log!(
            "WARN",
            "login_failed",
            restaurant = req.restaurant.clone(),
            reason = "unknown restaurant"
        );
        return Err(AuthError::InvalidCredentials.into());
    };

    let tokens = state.tokens.clone();
    let tenant_id = tenant.id.clone();
    let response = blocking(move || {
        tokens
            .issue_staff_token(&tenant_id, &req.username, &req.password)
            .map_err(AppError::from)
    })
    .await?;
    tracing::info!(
        tenant_id = %tenant.id,
        staff_id = %response.staff.id,
        "Staff logged in"
    );
    ok(response)
}

/// Mint a new access token from a refresh token
pub async fn refresh(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<RefreshResponse> {
    validate_payload(&req)?;
    ok(state.tokens.refresh_staff_token(&req.refresh_token)?)
}

/// Describe the caller behind the access token
///
/// Works for table and staff tokens alike. Role and permissions are the ones
/// embedded at issuance, not the current staff record.
pub async fn me(State(state): State<ServerState>, ctx: AccessContext) -> ApiResult<CurrentActor> {
    let restaurant = state
        .directory
        .get(ctx.tenant_id())
        .map_err(AppError::from)?
        .map(|t| t.name)
        .ok_or_else(|| AppError::from(AuthError::TenantNotFound(ctx.tenant_id().to_string())))?;
    let capabilities: Vec<String> = POLICY
        .iter()
        .filter(|rule| ctx.can(rule.capability))
        .map(|rule| rule.capability.to_string())
        .collect();
    let tenant_id = ctx.tenant_id().to_string();

    let actor = match ctx.actor {
        Actor::AnonymousTable {
            table_id,
            session_id,
        } => CurrentActor::Guest {
            tenant_id,
            restaurant,
            table_id,
            session_id,
            capabilities,
        },
        Actor::Staff {
            staff_id,
            role,
            permissions,
        } => CurrentActor::Staff {
            tenant_id,
            restaurant,
            staff_id,
            role,
            permissions,
            capabilities,
        },
        // Gateway contexts are never built from a bearer token
        Actor::PaymentGateway => return Err(AppError::not_authenticated()),
    };
    ok(actor)
}
