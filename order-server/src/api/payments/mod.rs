//! Payment gateway callbacks
//!
//! `POST /api/payments/callback` carries `{order_id, result, amount}` and an
//! `X-Payment-Signature` header: hex HMAC-SHA256 of the raw body keyed with
//! `PAYMENT_WEBHOOK_SECRET`. Without a configured secret every callback is
//! rejected.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use ring::hmac;
use shared::client::PaymentCallback;
use shared::error::{AppError, ErrorCode};
use shared::order::Order;

use super::{ApiResult, blocking, ok};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::validate_payload;

pub const SIGNATURE_HEADER: &str = "x-payment-signature";

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payments/callback", post(callback))
}

async fn callback(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Order> {
    let Some(secret) = state.config.payment_webhook_secret.as_deref() else {
        security_log!("WARN", "payment_callback_rejected", reason = "no webhook secret");
        return Err(AppError::new(ErrorCode::PaymentSignatureInvalid));
    };
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_signature(secret, &body, signature) {
        security_log!("WARN", "payment_signature_invalid", length = body.len());
        return Err(AppError::new(ErrorCode::PaymentSignatureInvalid));
    }

    let callback: PaymentCallback = serde_json::from_slice(&body)
        .map_err(|e| AppError::invalid_request(format!("Invalid callback body: {e}")))?;
    validate_payload(&callback)?;

    let engine = state.orders.clone();
    let order =
        blocking(move || engine.apply_payment_result(&callback).map_err(AppError::from)).await?;
    ok(order)
}

/// Check a hex HMAC-SHA256 signature (optionally prefixed `sha256=`)
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(tag) = hex::decode(signature.trim()) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::verify(&key, body, &tag).is_ok()
}

/// Sign a body the way the gateway does
pub fn sign(secret: &str, body: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hex::encode(hmac::sign(&key, body).as_ref())
}
