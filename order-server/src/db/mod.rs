//! redb-based storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tenants` | `tenant_id` | `Tenant` | Restaurants |
//! | `tenant_slugs` | `slug` | `tenant_id` | Slug uniqueness + lookup |
//! | `tables` | `table_id` | `Table` | Dining tables |
//! | `tenant_tables` | `(tenant_id, table_id)` | `()` | Tables of a tenant |
//! | `staff_identities` | `staff_id` | `StaffIdentity` | Staff accounts |
//! | `staff_usernames` | `(tenant_id, username)` | `staff_id` | Login lookup |
//! | `orders` | `order_id` | `Order` | Orders with embedded lines |
//! | `order_timeline_entries` | `(order_id, version)` | `TimelineEntry` | Status history |
//! | `active_table_orders` | `(tenant_id, table_id)` | `order_id` | One active order per table |
//!
//! Values are JSON. redb serialises write transactions, so a check made
//! inside a write transaction holds until its commit: `active_table_orders`
//! is checked and set in the same transaction that inserts the order.

mod orders;
mod staff;
mod tables;
mod tenants;

use redb::{Database, ReadTransaction, ReadableDatabase, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const TENANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tenants");

pub(crate) const TENANT_SLUGS_TABLE: TableDefinition<&str, &str> =
    TableDefinition::new("tenant_slugs");

pub(crate) const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tables");

pub(crate) const TENANT_TABLES_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("tenant_tables");

pub(crate) const STAFF_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("staff_identities");

pub(crate) const STAFF_USERNAMES_TABLE: TableDefinition<(&str, &str), &str> =
    TableDefinition::new("staff_usernames");

pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

pub(crate) const TIMELINE_TABLE: TableDefinition<(&str, u64), &[u8]> =
    TableDefinition::new("order_timeline_entries");

pub(crate) const ACTIVE_TABLE_ORDERS_TABLE: TableDefinition<(&str, &str), &str> =
    TableDefinition::new("active_table_orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Classify into an error code (redb reports disk problems only as text)
    pub fn code(&self) -> shared::error::ErrorCode {
        use shared::error::ErrorCode;

        if let StorageError::Serialization(_) = self {
            return ErrorCode::StorageCorrupted;
        }
        let err_str = self.to_string().to_lowercase();
        if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
        {
            return ErrorCode::StorageFull;
        }
        if err_str.contains("corrupt") || err_str.contains("invalid database") {
            return ErrorCode::StorageCorrupted;
        }
        ErrorCode::DatabaseError
    }
}

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        let code = err.code();
        tracing::error!(error = %err, error_code = %code, "Storage error occurred");
        shared::error::AppError::with_message(code, err.to_string())
    }
}

/// Storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("db", &"<redb::Database>").finish()
    }
}

impl Storage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns, the change survives a crash.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(TENANTS_TABLE)?;
            let _ = write_txn.open_table(TENANT_SLUGS_TABLE)?;
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(TENANT_TABLES_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(STAFF_USERNAMES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(TIMELINE_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// Blocks while another write transaction is open.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (snapshot isolation, never blocks writers)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
