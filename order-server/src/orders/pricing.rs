//! Server-side order pricing
//!
//! Client prices are never trusted: every line is re-priced from the catalog
//! and totals use the tenant rates captured at creation time. Each money
//! component is rounded to 2 decimals, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::client::OrderItemRequest;
use shared::models::{MenuItem, TenantSettings};
use shared::order::{ChosenCustomization, OrderLine};

use super::error::{InvalidItemReason, OrderError, OrderResult};
use crate::catalog::MenuCatalog;

const DECIMAL_PLACES: u32 = 2;

/// Maximum quantity per line
pub const MAX_QUANTITY: u32 = 99;

/// Totals of an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub service_charge: Decimal,
    pub total: Decimal,
}

/// Round a money amount to cents
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price submitted items against the catalog of `tenant_id`
///
/// Fails on the first unknown or unavailable item, unknown customization or
/// out-of-range quantity, reporting its index.
pub fn price_lines(
    catalog: &dyn MenuCatalog,
    tenant_id: &str,
    items: &[OrderItemRequest],
) -> OrderResult<Vec<OrderLine>> {
    if items.is_empty() {
        return Err(OrderError::Validation("an order needs at least one item".into()));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| price_line(catalog, tenant_id, index, item))
        .collect()
}

fn price_line(
    catalog: &dyn MenuCatalog,
    tenant_id: &str,
    index: usize,
    item: &OrderItemRequest,
) -> OrderResult<OrderLine> {
    let invalid = |reason| OrderError::InvalidItem {
        index,
        menu_item_id: item.menu_item_id.clone(),
        reason,
    };

    if item.quantity == 0 || item.quantity > MAX_QUANTITY {
        return Err(invalid(InvalidItemReason::InvalidQuantity(item.quantity)));
    }
    let menu_item = catalog
        .get_item(tenant_id, &item.menu_item_id)
        .ok_or_else(|| invalid(InvalidItemReason::UnknownItem))?;
    if !menu_item.available {
        return Err(invalid(InvalidItemReason::Unavailable));
    }

    let customizations = choose_customizations(&menu_item, &item.customizations)
        .map_err(|c| invalid(InvalidItemReason::UnknownCustomization(c)))?;

    let unit_price = customizations
        .iter()
        .fold(menu_item.price, |acc, c| acc + c.price_delta);
    if unit_price < Decimal::ZERO {
        return Err(OrderError::Validation(format!(
            "line {index} has a negative unit price"
        )));
    }

    Ok(OrderLine {
        menu_item_id: menu_item.id,
        name: menu_item.name,
        quantity: item.quantity,
        unit_price,
        customizations,
        line_total: round_money(unit_price * Decimal::from(item.quantity)),
    })
}

fn choose_customizations(
    menu_item: &MenuItem,
    requested: &[String],
) -> Result<Vec<ChosenCustomization>, String> {
    requested
        .iter()
        .map(|id| {
            menu_item
                .customizations
                .iter()
                .find(|c| &c.id == id)
                .map(|c| ChosenCustomization {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    price_delta: c.price_delta,
                })
                .ok_or_else(|| id.clone())
        })
        .collect()
}

/// `sum(line totals) + tax + service charge` with the given rates
pub fn compute_totals(lines: &[OrderLine], settings: &TenantSettings) -> Totals {
    let subtotal: Decimal = lines.iter().map(|l| l.line_total).sum();
    let tax_amount = round_money(subtotal * settings.tax_rate);
    let service_charge = round_money(subtotal * settings.service_charge_rate);
    Totals {
        subtotal,
        tax_amount,
        service_charge,
        total: subtotal + tax_amount + service_charge,
    }
}

/// `min(base + 3 × item count, cap)` minutes
pub fn estimate_prep_minutes(item_count: u32, base: u32, cap: u32) -> u32 {
    base.saturating_add(item_count.saturating_mul(3)).min(cap)
}
