//! Order API
//!
//! | Path | Method | Capability |
//! |------|--------|------------|
//! | /api/orders | POST | order:create |
//! | /api/orders | GET | order:read (active orders of the tenant) |
//! | /api/orders/{id} | GET | order:read or own table |
//! | /api/orders/{id}/timeline | GET | order:read or own table |
//! | /api/orders/{id}/status | POST | per transition |
//! | /api/orders/{id}/cancel | POST | order:cancel or own session |
//! | /api/orders/{id}/notes | POST | order:annotate |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list_active))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/timeline", get(handler::timeline))
        .route("/{id}/status", post(handler::transition))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/notes", post(handler::annotate))
}
