//! Tenant (restaurant) model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Restaurant account, the unit of data isolation
///
/// Never hard-deleted: deactivation flips `active`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tenant {
    pub id: String,
    /// URL-safe identifier printed into QR codes
    pub slug: String,
    pub name: String,
    pub active: bool,
    pub settings: TenantSettings,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-tenant pricing and capacity settings
///
/// Rates are decimal fractions (`0.10` = 10%).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TenantSettings {
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub service_charge_rate: Decimal,
    /// Maximum number of non-terminal orders across all tables (None = unlimited)
    #[serde(default)]
    pub max_concurrent_orders: Option<u32>,
    /// Whether staff may confirm an order before it is paid
    #[serde(default = "default_allow_pay_later")]
    pub allow_pay_later: bool,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_allow_pay_later() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            service_charge_rate: Decimal::ZERO,
            max_concurrent_orders: None,
            allow_pay_later: default_allow_pay_later(),
            currency: default_currency(),
        }
    }
}

impl TenantSettings {
    /// Check rates are within `[0, 1]` and the currency is a 3-letter code
    pub fn check(&self) -> Result<(), String> {
        for (field, rate) in [
            ("tax_rate", self.tax_rate),
            ("service_charge_rate", self.service_charge_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(format!("{field} must be between 0 and 1, got {rate}"));
            }
        }
        if self.max_concurrent_orders == Some(0) {
            return Err("max_concurrent_orders must be positive".to_string());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(format!("currency must be an ISO 4217 code, got {:?}", self.currency));
        }
        Ok(())
    }
}
