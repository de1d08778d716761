//! Access token issuer and verifier
//!
//! Issues anonymous table tokens (one per QR scan) and staff access/refresh
//! tokens, and verifies them statelessly: signature, expiry, and that the
//! tenant in the token still exists and is active (directory cache lookup,
//! no write).

use std::sync::Arc;

use chrono::Duration;
use shared::client::{LoginResponse, RefreshResponse, ScanResponse};
use shared::models::{StaffIdentity, StaffInfo};
use shared::util::prefixed_id;

use super::error::AuthError;
use super::jwt::{Claims, JwtService, TABLE_TOKEN_TTL_HOURS, TokenKind};
use super::password::verify_password;
use crate::directory::TenantDirectory;
use crate::security_log;

/// Token issuer and verifier
#[derive(Debug, Clone)]
pub struct TokenService {
    jwt: Arc<JwtService>,
    directory: Arc<TenantDirectory>,
}

impl TokenService {
    pub fn new(jwt: Arc<JwtService>, directory: Arc<TenantDirectory>) -> Self {
        Self { jwt, directory }
    }

    /// Mint a fresh anonymous token for one table (never renewed)
    pub fn issue_anonymous_table_token(
        &self,
        tenant_id: &str,
        table_id: &str,
    ) -> Result<ScanResponse, AuthError> {
        let tenant = self
            .directory
            .get(tenant_id)?
            .ok_or_else(|| AuthError::TenantNotFound(tenant_id.to_string()))?;
        if !tenant.active {
            return Err(AuthError::TenantInactive(tenant_id.to_string()));
        }
        let table = match self.directory.find_table(table_id)? {
            Some(table) if table.tenant_id == tenant.id => table,
            _ => {
                return Err(AuthError::TableNotFound {
                    tenant_id: tenant_id.to_string(),
                    table_id: table_id.to_string(),
                });
            }
        };

        let session_id = prefixed_id("ses");
        let claims = self.jwt.claims(
            TokenKind::Table,
            &table.id,
            &tenant.id,
            &session_id,
            Duration::hours(TABLE_TOKEN_TTL_HOURS),
        );
        let token = self.jwt.encode(&claims)?;

        tracing::debug!(tenant_id, table_id, session_id = %session_id, "Table token issued");
        Ok(ScanResponse {
            token,
            tenant_id: tenant.id,
            table_id: table.id,
            table_number: table.number,
            session_id,
            expires_at: claims.exp,
        })
    }

    /// Check credentials and mint an access + refresh token pair
    ///
    /// Role and permissions are copied into the access token; later changes
    /// apply from the next refresh.
    pub fn issue_staff_token(
        &self,
        tenant_id: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let tenant = self
            .directory
            .get(tenant_id)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !tenant.active {
            return Err(AuthError::TenantInactive(tenant_id.to_string()));
        }

        let staff = match self.directory.find_staff(tenant_id, username)? {
            Some(staff) if verify_password(password, &staff.password_hash) => staff,
            _ => {
                security_log!(
                    "WARN",
                    "login_failed",
                    tenant_id = tenant_id.to_string(),
                    username = username.to_string()
                );
                return Err(AuthError::InvalidCredentials);
            }
        };
        if !staff.active {
            security_log!(
                "WARN",
                "login_disabled_account",
                tenant_id = tenant_id.to_string(),
                staff_id = staff.id.clone()
            );
            return Err(AuthError::AccountDisabled);
        }

        let session_id = prefixed_id("ses");
        let access = self.access_claims(&staff, &session_id);
        let refresh = self.jwt.claims(
            TokenKind::Refresh,
            &staff.id,
            &staff.tenant_id,
            &session_id,
            Duration::days(self.jwt.config.refresh_token_days),
        );

        let response = LoginResponse {
            access_token: self.jwt.encode(&access)?,
            refresh_token: self.jwt.encode(&refresh)?,
            expires_at: access.exp,
            staff: StaffInfo::from(&staff),
        };
        tracing::info!(tenant_id, staff_id = %staff.id, role = %staff.role, "Staff logged in");
        Ok(response)
    }

    /// Exchange a refresh token for an access token with current role/permissions
    pub fn refresh_staff_token(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let claims = self.verify_any(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongTokenKind);
        }

        let staff = self
            .directory
            .get_staff(&claims.sub)?
            .filter(|s| s.tenant_id == claims.tid)
            .ok_or_else(|| AuthError::InvalidToken("staff no longer exists".to_string()))?;
        if !staff.active {
            return Err(AuthError::AccountDisabled);
        }

        let access = self.access_claims(&staff, &claims.sid);
        Ok(RefreshResponse {
            access_token: self.jwt.encode(&access)?,
            expires_at: access.exp,
        })
    }

    /// Verify an access token (table or staff)
    ///
    /// Refresh tokens are rejected: they are only accepted by
    /// [`Self::refresh_staff_token`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify_any(token)?;
        if claims.kind == TokenKind::Refresh {
            return Err(AuthError::WrongTokenKind);
        }
        Ok(claims)
    }

    fn verify_any(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.jwt.validate_token(token)?;
        match self.directory.get(&claims.tid)? {
            Some(tenant) if tenant.active => Ok(claims),
            Some(_) => Err(AuthError::TenantInactive(claims.tid)),
            None => Err(AuthError::InvalidToken(format!(
                "unknown tenant {}",
                claims.tid
            ))),
        }
    }

    fn access_claims(&self, staff: &StaffIdentity, session_id: &str) -> Claims {
        let mut claims = self.jwt.claims(
            TokenKind::Staff,
            &staff.id,
            &staff.tenant_id,
            session_id,
            Duration::minutes(self.jwt.config.staff_token_minutes),
        );
        claims.role = Some(staff.role);
        claims.permissions = staff.permissions.join(",");
        claims
    }
}
