use redb::{ReadableTable, WriteTransaction};
use shared::models::StaffIdentity;

use super::{STAFF_TABLE, STAFF_USERNAMES_TABLE, Storage, StorageResult, decode, encode};

impl Storage {
    // ========== Staff Operations ==========

    pub fn get_staff(&self, staff_id: &str) -> StorageResult<Option<StaffIdentity>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(STAFF_TABLE)?;
        match table.get(staff_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_staff_txn(
        &self,
        txn: &WriteTransaction,
        staff_id: &str,
    ) -> StorageResult<Option<StaffIdentity>> {
        let table = txn.open_table(STAFF_TABLE)?;
        match table.get(staff_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a staff identity by tenant-scoped username
    pub fn find_staff_by_username(
        &self,
        tenant_id: &str,
        username: &str,
    ) -> StorageResult<Option<StaffIdentity>> {
        let read_txn = self.begin_read()?;
        let usernames = read_txn.open_table(STAFF_USERNAMES_TABLE)?;
        let Some(staff_id) = usernames.get((tenant_id, username))? else {
            return Ok(None);
        };
        let staff = read_txn.open_table(STAFF_TABLE)?;
        match staff.get(staff_id.value())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn username_exists_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        username: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(STAFF_USERNAMES_TABLE)?;
        Ok(table.get((tenant_id, username))?.is_some())
    }

    /// Insert or replace a staff identity and its username index entry
    pub fn put_staff_txn(&self, txn: &WriteTransaction, staff: &StaffIdentity) -> StorageResult<()> {
        let mut table = txn.open_table(STAFF_TABLE)?;
        let value = encode(staff)?;
        table.insert(staff.id.as_str(), value.as_slice())?;

        let mut usernames = txn.open_table(STAFF_USERNAMES_TABLE)?;
        usernames.insert(
            (staff.tenant_id.as_str(), staff.username.as_str()),
            staff.id.as_str(),
        )?;
        Ok(())
    }
}
