//! AccessContext extractor
//!
//! Resolves the bearer token of a request into an [`AccessContext`].
//! Capability checks stay with each operation.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use super::{AccessContext, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for AccessContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AccessContext>() {
            return Ok(ctx.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::not_authenticated());
            }
        };

        match state.resolver.authenticate(token) {
            Ok(ctx) => {
                parts.extensions.insert(ctx.clone());
                Ok(ctx)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                Err(e.into())
            }
        }
    }
}
