use redb::{ReadableTable, WriteTransaction};
use shared::order::{Order, TimelineEntry};

use super::{
    ACTIVE_TABLE_ORDERS_TABLE, ORDERS_TABLE, Storage, StorageResult, TIMELINE_TABLE, decode,
    encode,
};

impl Storage {
    // ========== Order Operations ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by id (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Store an order (lines embedded)
    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = encode(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    // ========== Timeline Operations ==========

    /// Append a timeline entry, keyed by the order version it produced
    pub fn append_timeline_txn(
        &self,
        txn: &WriteTransaction,
        entry: &TimelineEntry,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TIMELINE_TABLE)?;
        let value = encode(entry)?;
        table.insert((entry.order_id.as_str(), entry.version), value.as_slice())?;
        Ok(())
    }

    /// Timeline of an order, oldest first
    pub fn get_timeline(&self, order_id: &str) -> StorageResult<Vec<TimelineEntry>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TIMELINE_TABLE)?;

        let mut entries = Vec::new();
        for result in table.range((order_id, 0u64)..=(order_id, u64::MAX))? {
            let (_key, value) = result?;
            entries.push(decode::<TimelineEntry>(value.value())?);
        }
        entries.sort_by_key(|e| e.version);
        Ok(entries)
    }

    // ========== Active Table Index ==========

    /// Active order seated at a table, if any
    pub fn active_order_for_table(
        &self,
        tenant_id: &str,
        table_id: &str,
    ) -> StorageResult<Option<String>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        Ok(table.get((tenant_id, table_id))?.map(|v| v.value().to_string()))
    }

    /// Active order seated at a table, if any (within transaction)
    pub fn active_order_for_table_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        table_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        Ok(table.get((tenant_id, table_id))?.map(|v| v.value().to_string()))
    }

    pub fn set_active_order_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        table_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        table.insert((tenant_id, table_id), order_id)?;
        Ok(())
    }

    pub fn clear_active_order_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        table_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        table.remove((tenant_id, table_id))?;
        Ok(())
    }

    /// Number of active orders of a tenant (within transaction)
    pub fn count_active_orders_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
    ) -> StorageResult<usize> {
        let table = txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        let mut count = 0;
        for entry in table.range((tenant_id, "")..)? {
            let (key, _) = entry?;
            if key.value().0 != tenant_id {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Active orders of a tenant (kitchen display)
    pub fn list_active_orders(&self, tenant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(ACTIVE_TABLE_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((tenant_id, "")..)? {
            let (key, order_id) = entry?;
            if key.value().0 != tenant_id {
                break;
            }
            if let Some(value) = orders.get(order_id.value())? {
                result.push(decode::<Order>(value.value())?);
            }
        }
        result.sort_by_key(|o| o.created_at);
        Ok(result)
    }
}
