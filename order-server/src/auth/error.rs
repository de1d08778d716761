use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::jwt::JwtError;
use crate::db::StorageError;

/// Token and authorization errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token kind not accepted here")]
    WrongTokenKind,

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Tenant is deactivated: {0}")]
    TenantInactive(String),

    #[error("Table {table_id} not found in tenant {tenant_id}")]
    TableNotFound { tenant_id: String, table_id: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Staff account is disabled")]
    AccountDisabled,

    #[error("{actor} lacks capability {capability}")]
    Denied { actor: String, capability: String },

    #[error("{resource} belongs to another tenant")]
    TenantMismatch { resource: String },

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AuthError::TokenExpired,
            JwtError::InvalidSignature => AuthError::InvalidToken("invalid signature".to_string()),
            JwtError::InvalidToken(msg) => AuthError::InvalidToken(msg),
            JwtError::GenerationFailed(msg) | JwtError::ConfigError(msg) => {
                AuthError::Signing(msg)
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::not_authenticated(),
            AuthError::InvalidToken(_) | AuthError::WrongTokenKind => {
                // Never echo token parsing details back to the caller
                AppError::invalid_token("Invalid token")
            }
            AuthError::TokenExpired => AppError::token_expired(),
            AuthError::TenantNotFound(id) => {
                AppError::new(ErrorCode::TenantNotFound).with_detail("tenant_id", id)
            }
            AuthError::TenantInactive(id) => {
                AppError::new(ErrorCode::TenantInactive).with_detail("tenant_id", id)
            }
            AuthError::TableNotFound { table_id, .. } => {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
            }
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::AccountDisabled => AppError::new(ErrorCode::AccountDisabled),
            AuthError::Denied { capability, .. } => AppError::permission_denied(format!(
                "Permission denied: {capability}"
            ))
            .with_detail("capability", capability),
            AuthError::TenantMismatch { resource } => {
                AppError::tenant_mismatch(format!("{resource} belongs to another restaurant"))
            }
            AuthError::Signing(msg) => AppError::internal(msg),
            AuthError::Storage(e) => e.into(),
        }
    }
}
