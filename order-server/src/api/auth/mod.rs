//! Staff authentication and the current caller
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /api/auth/login | POST | `{restaurant, username, password}` |
//! | /api/auth/refresh | POST | `{refresh_token}` |
//! | /api/auth/me | GET | - (any access token) |
//! | /api/auth/profile | GET | alias of `/me` |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/profile", get(handler::me))
}
