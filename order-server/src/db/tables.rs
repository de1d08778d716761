use redb::{ReadableTable, WriteTransaction};
use shared::models::Table;

use super::{Storage, StorageResult, TABLES_TABLE, TENANT_TABLES_TABLE, decode, encode};

impl Storage {
    // ========== Dining Table Operations ==========

    /// Get a table by id, regardless of tenant
    ///
    /// Callers compare `tenant_id` themselves so a foreign table is reported
    /// as an isolation violation rather than "not found".
    pub fn get_table(&self, table_id: &str) -> StorageResult<Option<Table>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a table by id (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<Table>> {
        let table = txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a table and its tenant index entry
    pub fn put_table_txn(&self, txn: &WriteTransaction, dining_table: &Table) -> StorageResult<()> {
        let mut tables = txn.open_table(TABLES_TABLE)?;
        let value = encode(dining_table)?;
        tables.insert(dining_table.id.as_str(), value.as_slice())?;

        let mut index = txn.open_table(TENANT_TABLES_TABLE)?;
        index.insert(
            (dining_table.tenant_id.as_str(), dining_table.id.as_str()),
            (),
        )?;
        Ok(())
    }

    /// Tables of a tenant, ordered by display number
    pub fn list_tables(&self, tenant_id: &str) -> StorageResult<Vec<Table>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(TENANT_TABLES_TABLE)?;
        let tables = read_txn.open_table(TABLES_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((tenant_id, "")..)? {
            let (key, _) = entry?;
            let (owner, table_id) = key.value();
            if owner != tenant_id {
                break;
            }
            if let Some(value) = tables.get(table_id)? {
                result.push(decode::<Table>(value.value())?);
            }
        }
        result.sort_by_key(|t| t.number);
        Ok(result)
    }

    /// Tables of a tenant (within transaction)
    pub fn list_tables_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
    ) -> StorageResult<Vec<Table>> {
        let index = txn.open_table(TENANT_TABLES_TABLE)?;
        let tables = txn.open_table(TABLES_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((tenant_id, "")..)? {
            let (key, _) = entry?;
            let (owner, table_id) = key.value();
            if owner != tenant_id {
                break;
            }
            if let Some(value) = tables.get(table_id)? {
                result.push(decode::<Table>(value.value())?);
            }
        }
        Ok(result)
    }
}
