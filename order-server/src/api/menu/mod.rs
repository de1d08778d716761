//! Menu of the caller's restaurant (`GET /api/menu`)

use axum::{Router, extract::State, routing::get};
use shared::models::MenuItem;

use super::{ApiResult, for_caller, ok};
use crate::auth::AccessContext;
use crate::auth::capability::MENU_READ;
use crate::catalog::MenuCatalog;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(list_menu))
}

/// Diners see available items only; staff see the whole menu
async fn list_menu(State(state): State<ServerState>, ctx: AccessContext) -> ApiResult<Vec<MenuItem>> {
    ctx.require(MENU_READ).map_err(|e| for_caller(&ctx)(e.into()))?;
    let mut items = state.catalog.list_items(ctx.tenant_id());
    if ctx.is_anonymous() {
        items.retain(|item| item.available);
    }
    ok(items)
}
