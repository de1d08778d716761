//! API routes
//!
//! - [`health`] - liveness
//! - [`sessions`] - QR scan → anonymous table token
//! - [`auth`] - staff login and refresh
//! - [`menu`] - menu of the caller's restaurant
//! - [`orders`] - order lifecycle
//! - [`tables`] - table order lookup and status override
//! - [`tenant`] - tenant settings and deactivation
//! - [`payments`] - payment gateway callbacks
//! - [`live`] - WebSocket event feed

pub mod auth;
pub mod health;
pub mod live;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod sessions;
pub mod tables;
pub mod tenant;

use std::time::Duration;

use axum::{Json, Router, middleware};
use shared::error::{ApiResponse, AppError, ErrorClass};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AccessContext;
use crate::core::ServerState;

/// Handler result type
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Wrap data in the success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Run synchronous storage or password-hashing work on the blocking pool
///
/// redb commits and argon2 verification block the calling thread.
pub async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        AppError::internal("blocking task failed")
    })?
}

/// Tailor an error to the caller
///
/// Anonymous diners get the generic message of the error class; a
/// validation error keeps the offending field so the diner can fix it.
/// Staff get the precise code and details.
pub fn for_caller(ctx: &AccessContext) -> impl Fn(AppError) -> AppError + '_ {
    move |err| {
        if !ctx.is_anonymous() {
            return err;
        }
        let field = (err.class() == ErrorClass::Validation)
            .then(|| err.details.as_ref().and_then(|d| d.get("field").cloned()))
            .flatten();
        let redacted = err.redacted_for_guest();
        match field {
            Some(field) => redacted.with_detail("field", field),
            None => redacted,
        }
    }
}

/// Build the routes (without state)
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(sessions::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(tables::router())
        .merge(tenant::router())
        .merge(payments::router())
        .merge(live::router())
}

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// Build the application with state and tower layers
pub fn build_app(state: &ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    routes()
        .with_state(state.clone())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[tokio::test]
    async fn test_blocking_returns_work_result() {
        let value = blocking(|| Ok::<_, AppError>(7)).await.unwrap();
        assert_eq!(value, 7);

        let err = blocking(|| Err::<(), _>(AppError::validation("bad note")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_blocking_panic_becomes_internal_error() {
        let err = blocking(|| -> Result<(), AppError> { panic!("storage exploded") })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
