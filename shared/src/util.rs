/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a random resource id with a readable prefix (`ord_…`, `tbl_…`).
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}
