//! Authentication and authorization
//!
//! - [`jwt`]: HS256 token encoding
//! - [`tokens`]: table/staff token issuance and verification
//! - [`capability`]: the capability policy table
//! - [`resolver`]: token → [`AccessContext`]
//! - [`password`]: argon2 hashing

pub mod capability;
mod error;
mod extractor;
pub mod jwt;
pub mod password;
pub mod resolver;
pub mod tokens;

pub use error::AuthError;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TokenKind};
pub use resolver::{AccessContext, Actor, AuthorizationResolver};
pub use tokens::TokenService;
