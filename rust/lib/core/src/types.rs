use serde::Serialize;

/// Format used for the `Date Called` cell: `YYYY-MM-DD HH:MM`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> ListResult<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current local time, minute precision, in [`TIMESTAMP_FORMAT`].
pub fn now_local_minute() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
