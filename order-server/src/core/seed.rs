//! Bootstrap data
//!
//! Tenant administration has no HTTP surface, so tenants, tables, staff and
//! the menu are loaded from a JSON file at startup. Loading is idempotent:
//! existing slugs, table numbers and usernames are kept as they are. The
//! menu is always (re)loaded because the catalog lives in memory.
//!
//! ```json
//! {
//!   "tenants": [{
//!     "slug": "trattoria",
//!     "name": "Trattoria Roma",
//!     "settings": { "tax_rate": "0.10", "currency": "EUR" },
//!     "tables": [1, 2, 3],
//!     "staff": [{ "username": "anna", "display_name": "Anna",
//!                 "password": "change-me-now", "role": "owner" }],
//!     "menu": [{ "id": "margherita", "name": "Margherita", "price": "9.50" }]
//!   }]
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Customization, MenuItem, StaffRole, Tenant, TenantSettings};

use super::error::{Result, ServerError};
use crate::catalog::InMemoryCatalog;
use crate::directory::{NewStaff, TenantDirectory};

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub tenants: Vec<SeedTenant>,
}

#[derive(Debug, Deserialize)]
pub struct SeedTenant {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub settings: TenantSettings,
    #[serde(default)]
    pub tables: Vec<u32>,
    #[serde(default)]
    pub staff: Vec<SeedStaff>,
    #[serde(default)]
    pub menu: Vec<SeedMenuItem>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStaff {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: StaffRole,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedMenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

fn default_true() -> bool {
    true
}

/// Summary of what a seed run created
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub tenants: usize,
    pub tables: usize,
    pub staff: usize,
    pub menu_items: usize,
}

/// Read and apply a seed file
pub fn load_seed_file(
    path: &Path,
    directory: &TenantDirectory,
    catalog: &InMemoryCatalog,
) -> Result<SeedReport> {
    let raw = std::fs::read_to_string(path)?;
    let seed: SeedFile = serde_json::from_str(&raw)
        .map_err(|e| ServerError::Seed(format!("{}: {e}", path.display())))?;
    apply_seed(&seed, directory, catalog)
}

/// Apply seed data, skipping what already exists
pub fn apply_seed(
    seed: &SeedFile,
    directory: &TenantDirectory,
    catalog: &InMemoryCatalog,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for entry in &seed.tenants {
        let tenant = match directory.get_by_slug(&entry.slug)? {
            Some(existing) => existing,
            None => {
                report.tenants += 1;
                directory.register_tenant(&entry.slug, &entry.name, entry.settings.clone())?
            }
        };

        report.tables += seed_tables(&tenant, &entry.tables, directory)?;
        report.staff += seed_staff(&tenant, &entry.staff, directory)?;

        for item in &entry.menu {
            catalog.upsert(MenuItem {
                id: item.id.clone(),
                tenant_id: tenant.id.clone(),
                name: item.name.clone(),
                price: item.price,
                available: item.available,
                customizations: item.customizations.clone(),
            });
            report.menu_items += 1;
        }
    }

    tracing::info!(
        tenants = report.tenants,
        tables = report.tables,
        staff = report.staff,
        menu_items = report.menu_items,
        "Seed data applied"
    );
    Ok(report)
}

fn seed_tables(tenant: &Tenant, numbers: &[u32], directory: &TenantDirectory) -> Result<usize> {
    let existing: Vec<u32> = directory
        .list_tables(&tenant.id)?
        .iter()
        .map(|t| t.number)
        .collect();
    let mut added = 0;
    for number in numbers.iter().filter(|n| !existing.contains(n)) {
        directory.add_table(&tenant.id, *number)?;
        added += 1;
    }
    Ok(added)
}

fn seed_staff(tenant: &Tenant, staff: &[SeedStaff], directory: &TenantDirectory) -> Result<usize> {
    let mut added = 0;
    for member in staff {
        if directory.find_staff(&tenant.id, &member.username)?.is_some() {
            continue;
        }
        directory.register_staff(
            &tenant.id,
            NewStaff {
                username: member.username.clone(),
                display_name: member.display_name.clone(),
                password: member.password.clone(),
                role: member.role,
                permissions: member.permissions.clone(),
            },
        )?;
        added += 1;
    }
    Ok(added)
}
