//! Menu item model
//!
//! Only the fields needed to price an order line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

fn default_available() -> bool {
    true
}

/// Optional modifier with a price delta (extra cheese, large size, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_delta: Decimal,
}
