//! Dining table model

use serde::{Deserialize, Serialize};

/// Dining table (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub id: String,
    pub tenant_id: String,
    /// Number shown on the table and its QR code
    pub number: u32,
    pub status: TableStatus,
    /// Active (non-terminal) order currently seated at this table
    pub current_order_id: Option<String>,
    /// Bumped on every status change; used as the live-feed sequence
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
