//! Tenant Directory
//!
//! Maps restaurant ids/slugs and table ids to tenant metadata. Tenants are
//! read on every token verification, so they are cached in a [`DashMap`] in
//! front of redb; every write goes to redb first and then refreshes the cache.

use std::sync::Arc;

use dashmap::DashMap;
use shared::error::{AppError, ErrorCode};
use shared::models::{StaffIdentity, StaffRole, Table, TableStatus, Tenant, TenantSettings};
use shared::util::prefixed_id;
use thiserror::Error;

use crate::auth::capability::{TENANT_DEACTIVATE, TENANT_UPDATE};
use crate::auth::password::hash_password;
use crate::auth::{AccessContext, AuthError};
use crate::db::{Storage, StorageError, StorageResult};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SLUG_LEN, validate_required_text};
use crate::utils::Clock;

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Tenant is deactivated: {0}")]
    TenantInactive(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Slug already taken: {0}")]
    SlugExists(String),

    #[error("Table number {0} already exists")]
    TableNumberExists(u32),

    #[error("Username already taken: {0}")]
    UsernameExists(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::TenantNotFound(id) => {
                AppError::new(ErrorCode::TenantNotFound).with_detail("tenant_id", id)
            }
            DirectoryError::TenantInactive(id) => {
                AppError::new(ErrorCode::TenantInactive).with_detail("tenant_id", id)
            }
            DirectoryError::TableNotFound(id) => {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_id", id)
            }
            DirectoryError::SlugExists(slug) => {
                AppError::new(ErrorCode::TenantSlugExists).with_detail("slug", slug)
            }
            DirectoryError::TableNumberExists(n) => {
                AppError::conflict(format!("Table number {n} already exists"))
            }
            DirectoryError::UsernameExists(name) => {
                AppError::new(ErrorCode::StaffUsernameExists).with_detail("username", name)
            }
            DirectoryError::Validation(msg) => AppError::validation(msg),
            DirectoryError::PasswordHash(msg) => AppError::internal(msg),
            DirectoryError::Auth(e) => e.into(),
            DirectoryError::Storage(e) => e.into(),
        }
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// New staff account
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
}

/// Tenant directory
#[derive(Debug)]
pub struct TenantDirectory {
    storage: Storage,
    cache: DashMap<String, Tenant>,
    clock: Arc<dyn Clock>,
}

impl TenantDirectory {
    /// Create the directory and warm the tenant cache
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> StorageResult<Self> {
        let cache = DashMap::new();
        for tenant in storage.list_tenants()? {
            cache.insert(tenant.id.clone(), tenant);
        }
        tracing::debug!(tenants = cache.len(), "Tenant directory loaded");
        Ok(Self {
            storage,
            cache,
            clock,
        })
    }

    // ========== Tenants ==========

    /// Register a restaurant
    pub fn register_tenant(
        &self,
        slug: &str,
        name: &str,
        settings: TenantSettings,
    ) -> DirectoryResult<Tenant> {
        validate_slug(slug)?;
        validate_required_text(name, "name", MAX_NAME_LEN)
            .map_err(|e| DirectoryError::Validation(e.message))?;
        settings.check().map_err(DirectoryError::Validation)?;

        let now = self.clock.now_millis();
        let tenant = Tenant {
            id: prefixed_id("ten"),
            slug: slug.to_string(),
            name: name.trim().to_string(),
            active: true,
            settings,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        if self.storage.slug_exists_txn(&txn, slug)? {
            return Err(DirectoryError::SlugExists(slug.to_string()));
        }
        self.storage.put_tenant_txn(&txn, &tenant)?;
        txn.commit().map_err(StorageError::from)?;

        self.cache.insert(tenant.id.clone(), tenant.clone());
        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant registered");
        Ok(tenant)
    }

    /// Get a tenant by id
    pub fn get(&self, tenant_id: &str) -> StorageResult<Option<Tenant>> {
        if let Some(tenant) = self.cache.get(tenant_id) {
            return Ok(Some(tenant.clone()));
        }
        let tenant = self.storage.get_tenant(tenant_id)?;
        if let Some(t) = &tenant {
            self.cache.insert(t.id.clone(), t.clone());
        }
        Ok(tenant)
    }

    /// Get a tenant by slug
    pub fn get_by_slug(&self, slug: &str) -> StorageResult<Option<Tenant>> {
        match self.storage.find_tenant_id_by_slug(slug)? {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    /// Resolve a QR restaurant reference: slug first, then tenant id
    pub fn lookup(&self, restaurant: &str) -> StorageResult<Option<Tenant>> {
        match self.get_by_slug(restaurant)? {
            Some(t) => Ok(Some(t)),
            None => self.get(restaurant),
        }
    }

    /// Get a tenant that exists and is active
    pub fn require_active(&self, tenant_id: &str) -> DirectoryResult<Tenant> {
        let tenant = self
            .get(tenant_id)?
            .ok_or_else(|| DirectoryError::TenantNotFound(tenant_id.to_string()))?;
        if !tenant.active {
            return Err(DirectoryError::TenantInactive(tenant_id.to_string()));
        }
        Ok(tenant)
    }

    /// Replace the settings of the caller's tenant
    ///
    /// Existing orders keep the rates they were priced with.
    pub fn update_settings(
        &self,
        ctx: &AccessContext,
        settings: TenantSettings,
    ) -> DirectoryResult<Tenant> {
        ctx.require(TENANT_UPDATE)?;
        settings.check().map_err(DirectoryError::Validation)?;
        self.modify_tenant(ctx.tenant_id(), |tenant| tenant.settings = settings)
    }

    /// Activate or soft-deactivate the caller's tenant
    ///
    /// Deactivation invalidates every outstanding token of the tenant at
    /// the next verification.
    pub fn set_active(&self, ctx: &AccessContext, active: bool) -> DirectoryResult<Tenant> {
        ctx.require(TENANT_DEACTIVATE)?;
        let tenant = self.modify_tenant(ctx.tenant_id(), |tenant| tenant.active = active)?;
        tracing::warn!(
            tenant_id = %tenant.id,
            active,
            actor = %ctx.actor_ref(),
            "Tenant activation changed"
        );
        Ok(tenant)
    }

    fn modify_tenant(
        &self,
        tenant_id: &str,
        apply: impl FnOnce(&mut Tenant),
    ) -> DirectoryResult<Tenant> {
        let txn = self.storage.begin_write()?;
        let mut tenant = self
            .storage
            .get_tenant_txn(&txn, tenant_id)?
            .ok_or_else(|| DirectoryError::TenantNotFound(tenant_id.to_string()))?;
        apply(&mut tenant);
        tenant.updated_at = self.clock.now_millis();
        self.storage.put_tenant_txn(&txn, &tenant)?;
        txn.commit().map_err(StorageError::from)?;

        self.cache.insert(tenant.id.clone(), tenant.clone());
        Ok(tenant)
    }

    // ========== Tables ==========

    /// Add a dining table with a display number unique within the tenant
    pub fn add_table(&self, tenant_id: &str, number: u32) -> DirectoryResult<Table> {
        if number == 0 {
            return Err(DirectoryError::Validation(
                "table number must be positive".to_string(),
            ));
        }
        self.get(tenant_id)?
            .ok_or_else(|| DirectoryError::TenantNotFound(tenant_id.to_string()))?;

        let table = Table {
            id: prefixed_id("tbl"),
            tenant_id: tenant_id.to_string(),
            number,
            status: TableStatus::Available,
            current_order_id: None,
            version: 1,
        };

        let txn = self.storage.begin_write()?;
        // redb allows one writer at a time, so this read cannot race another add
        if self
            .storage
            .list_tables_txn(&txn, tenant_id)?
            .iter()
            .any(|t| t.number == number)
        {
            return Err(DirectoryError::TableNumberExists(number));
        }
        self.storage.put_table_txn(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(tenant_id, table_id = %table.id, number, "Table added");
        Ok(table)
    }

    /// Get a table of `tenant_id`
    ///
    /// A table of another tenant is reported as not found: the caller only
    /// named a tenant, it holds no context that could be violated.
    pub fn get_table(&self, tenant_id: &str, table_id: &str) -> DirectoryResult<Table> {
        match self.storage.get_table(table_id)? {
            Some(table) if table.tenant_id == tenant_id => Ok(table),
            _ => Err(DirectoryError::TableNotFound(table_id.to_string())),
        }
    }

    /// Get a table by id regardless of tenant
    pub fn find_table(&self, table_id: &str) -> StorageResult<Option<Table>> {
        self.storage.get_table(table_id)
    }

    pub fn list_tables(&self, tenant_id: &str) -> StorageResult<Vec<Table>> {
        self.storage.list_tables(tenant_id)
    }

    // ========== Staff ==========

    /// Create a staff account with an argon2-hashed password
    pub fn register_staff(&self, tenant_id: &str, new: NewStaff) -> DirectoryResult<StaffIdentity> {
        validate_required_text(&new.username, "username", MAX_SLUG_LEN)
            .map_err(|e| DirectoryError::Validation(e.message))?;
        validate_required_text(&new.display_name, "display_name", MAX_NAME_LEN)
            .map_err(|e| DirectoryError::Validation(e.message))?;
        if new.password.len() < 8 {
            return Err(DirectoryError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        self.get(tenant_id)?
            .ok_or_else(|| DirectoryError::TenantNotFound(tenant_id.to_string()))?;

        let password_hash =
            hash_password(&new.password).map_err(|e| DirectoryError::PasswordHash(e.to_string()))?;
        let staff = StaffIdentity {
            id: prefixed_id("stf"),
            tenant_id: tenant_id.to_string(),
            username: new.username.trim().to_string(),
            display_name: new.display_name.trim().to_string(),
            role: new.role,
            permissions: new.permissions,
            active: true,
            password_hash,
        };

        let txn = self.storage.begin_write()?;
        if self
            .storage
            .username_exists_txn(&txn, tenant_id, &staff.username)?
        {
            return Err(DirectoryError::UsernameExists(staff.username));
        }
        self.storage.put_staff_txn(&txn, &staff)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(tenant_id, staff_id = %staff.id, role = %staff.role, "Staff registered");
        Ok(staff)
    }

    /// Enable or disable a staff account
    pub fn set_staff_active(&self, staff_id: &str, active: bool) -> DirectoryResult<StaffIdentity> {
        let txn = self.storage.begin_write()?;
        let mut staff = self
            .storage
            .get_staff_txn(&txn, staff_id)?
            .ok_or_else(|| DirectoryError::Validation(format!("unknown staff {staff_id}")))?;
        staff.active = active;
        self.storage.put_staff_txn(&txn, &staff)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(staff)
    }

    pub fn get_staff(&self, staff_id: &str) -> StorageResult<Option<StaffIdentity>> {
        self.storage.get_staff(staff_id)
    }

    /// Find a staff account by tenant-scoped username
    pub fn find_staff(&self, tenant_id: &str, username: &str) -> StorageResult<Option<StaffIdentity>> {
        self.storage.find_staff_by_username(tenant_id, username)
    }
}

fn validate_slug(slug: &str) -> DirectoryResult<()> {
    let valid = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(DirectoryError::Validation(format!(
            "slug must be lowercase letters, digits and inner hyphens: {slug:?}"
        )))
    }
}
