use redb::{ReadableTable, WriteTransaction};
use shared::models::Tenant;

use super::{Storage, StorageResult, TENANT_SLUGS_TABLE, TENANTS_TABLE, decode, encode};

impl Storage {
    // ========== Tenant Operations ==========

    /// Get a tenant by id
    pub fn get_tenant(&self, tenant_id: &str) -> StorageResult<Option<Tenant>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TENANTS_TABLE)?;
        match table.get(tenant_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve a slug to a tenant id
    pub fn find_tenant_id_by_slug(&self, slug: &str) -> StorageResult<Option<String>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TENANT_SLUGS_TABLE)?;
        Ok(table.get(slug)?.map(|v| v.value().to_string()))
    }

    /// Check whether a slug is taken (within transaction)
    pub fn slug_exists_txn(&self, txn: &WriteTransaction, slug: &str) -> StorageResult<bool> {
        let table = txn.open_table(TENANT_SLUGS_TABLE)?;
        Ok(table.get(slug)?.is_some())
    }

    /// Insert or replace a tenant and its slug index entry
    pub fn put_tenant_txn(&self, txn: &WriteTransaction, tenant: &Tenant) -> StorageResult<()> {
        let mut tenants = txn.open_table(TENANTS_TABLE)?;
        let value = encode(tenant)?;
        tenants.insert(tenant.id.as_str(), value.as_slice())?;

        let mut slugs = txn.open_table(TENANT_SLUGS_TABLE)?;
        slugs.insert(tenant.slug.as_str(), tenant.id.as_str())?;
        Ok(())
    }

    /// Get a tenant by id (within transaction)
    pub fn get_tenant_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
    ) -> StorageResult<Option<Tenant>> {
        let table = txn.open_table(TENANTS_TABLE)?;
        match table.get(tenant_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// All tenants (directory cache warm-up)
    pub fn list_tenants(&self) -> StorageResult<Vec<Tenant>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TENANTS_TABLE)?;
        let mut tenants = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            tenants.push(decode(value.value())?);
        }
        Ok(tenants)
    }
}
