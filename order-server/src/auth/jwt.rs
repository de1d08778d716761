//! JWT token service
//!
//! Encodes and decodes the three token kinds (table, staff, refresh) with
//! HS256. Business checks on top of the signature (tenant still active,
//! token kind expected) live in [`super::tokens`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::StaffRole;
use thiserror::Error;

/// Anonymous table token lifetime (fixed, not renewable)
pub const TABLE_TOKEN_TTL_HOURS: i64 = 24;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 key (at least 32 bytes)
    pub secret: String,
    /// Staff access token lifetime (minutes)
    pub staff_token_minutes: i64,
    /// Staff refresh token lifetime (days)
    pub refresh_token_days: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// Build from environment variables
    ///
    /// Production requires `JWT_SECRET`; development generates a temporary key
    /// (tokens then do not survive a restart).
    pub fn from_env(production: bool) -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret(production)?,
            staff_token_minutes: env_or("STAFF_TOKEN_MINUTES", 60),
            refresh_token_days: env_or("REFRESH_TOKEN_DAYS", 7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "order-clients".to_string()),
        })
    }

    /// Config with a freshly generated secret (tests, development)
    pub fn with_generated_secret() -> Self {
        Self {
            secret: generate_secure_printable_jwt_secret(),
            staff_token_minutes: 60,
            refresh_token_days: 7,
            issuer: "order-server".to_string(),
            audience: "order-clients".to_string(),
        }
    }
}

fn env_or(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Token kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Anonymous diner token scoped to one table
    Table,
    /// Staff access token
    Staff,
    /// Staff refresh token (only accepted by the refresh endpoint)
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Table id (table tokens) or staff id (staff/refresh tokens)
    pub sub: String,
    pub kind: TokenKind,
    /// Tenant id
    pub tid: String,
    /// Staff role as of issuance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    /// Permission list (comma separated)
    #[serde(default)]
    pub permissions: String,
    /// Session id: one per scan for table tokens, one per login for staff
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn permission_list(&self) -> Vec<String> {
        if self.permissions.is_empty() {
            vec![]
        } else {
            self.permissions.split(',').map(|s| s.to_string()).collect()
        }
    }
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable random secret (64 chars)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=+.";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // SystemRandom only fails when the OS RNG is unavailable
        tracing::error!("System RNG unavailable, falling back to uuid-based secret");
        return format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
    }
    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}

fn load_jwt_secret(production: bool) -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) if production => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable must be set in production".to_string(),
        )),
        Err(_) => {
            tracing::warn!("JWT_SECRET not set, generating a temporary key for development");
            Ok(generate_secure_printable_jwt_secret())
        }
    }
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Build claims for `kind` expiring after `ttl`
    pub fn claims(
        &self,
        kind: TokenKind,
        subject: &str,
        tenant_id: &str,
        session_id: &str,
        ttl: Duration,
    ) -> Claims {
        let now = Utc::now();
        Claims {
            sub: subject.to_string(),
            kind,
            tid: tenant_id.to_string(),
            role: None,
            permissions: String::new(),
            sid: session_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        }
    }

    /// Sign claims into a token
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate signature, expiry, issuer and audience, then decode
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::with_generated_secret())
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let mut claims = service.claims(
            TokenKind::Staff,
            "staff-1",
            "tenant-1",
            "sid-1",
            Duration::minutes(5),
        );
        claims.role = Some(StaffRole::Kitchen);
        claims.permissions = "menu:update,order:*".to_string();

        let token = service.encode(&claims).unwrap();
        let decoded = service.validate_token(&token).unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(
            decoded.permission_list(),
            vec!["menu:update".to_string(), "order:*".to_string()]
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let claims = service.claims(
            TokenKind::Table,
            "table-1",
            "tenant-1",
            "sid",
            Duration::seconds(-10),
        );
        let token = service.encode(&claims).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = service();
        let verifier = service();
        let claims = issuer.claims(TokenKind::Table, "t", "tenant", "sid", Duration::hours(1));
        let token = issuer.encode(&claims).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret();
        let b = generate_secure_printable_jwt_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
