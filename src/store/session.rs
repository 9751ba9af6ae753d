//! redb-backed session holding the `line_items` table.

use super::{StoreError, StoreResult};
use crate::model::{parse_order_number, LineItem};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Line items: key = (owner_id, order_number, product_sku), value = JSON.
///
/// The owner leads the key, so a prefix range doubles as the by-owner index.
const LINE_ITEMS: TableDefinition<(&str, &str, &str), &[u8]> = TableDefinition::new("line_items");

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Volatile; used by tests and dry runs.
    InMemory,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::InMemory => write!(f, "<memory>"),
        }
    }
}

/// An open database handle.
pub struct Session {
    db: Database,
}

impl Session {
    /// Open or create the database and make sure the table exists.
    pub fn open(location: &StoreLocation) -> StoreResult<Self> {
        let db = match location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                Database::create(path)?
            }
            StoreLocation::InMemory => {
                Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?
            }
        };

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LINE_ITEMS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or overwrite the record at the item's composite key.
    pub fn put(&self, item: &LineItem) -> StoreResult<()> {
        let value = serde_json::to_vec(item)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LINE_ITEMS)?;
            table.insert(item.key(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Highest integer order number stored for `owner_id`, 0 if none.
    pub fn max_order_number(&self, owner_id: &str) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LINE_ITEMS)?;

        let mut max = 0;
        for entry in table.range((owner_id, "", "")..)? {
            let (key, _) = entry?;
            let (owner, order_number, _) = key.value();
            if owner != owner_id {
                break;
            }
            if let Some(n) = parse_order_number(order_number) {
                max = max.max(n);
            }
        }
        Ok(max)
    }

    pub fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<LineItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LINE_ITEMS)?;

        let mut items = Vec::new();
        for entry in table.range((owner_id, "", "")..)? {
            let (key, value) = entry?;
            if key.value().0 != owner_id {
                break;
            }
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    /// Delete the database file at `path`.
    ///
    /// The caller must have dropped its own session first. Fails with
    /// [`StoreError::ResetBlocked`] while anyone else holds the file open.
    pub fn destroy(path: &Path) -> StoreResult<()> {
        if !path.exists() {
            return Ok(());
        }

        match Database::open(path) {
            Ok(db) => drop(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(StoreError::ResetBlocked(path.display().to_string()));
            }
            // An unreadable file is still ours to delete.
            Err(e) => warn!(path = %path.display(), error = %e, "Destroying unreadable database"),
        }

        fs::remove_file(path)?;
        Ok(())
    }
}
