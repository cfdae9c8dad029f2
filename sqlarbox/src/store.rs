use std::time::{self, Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;

use super::entry::{ArchiveEntry, EntrySummary};
use super::list::{ArchiveEntries, EntryMapFunc, ListEntries, SummaryMapFunc};

fn unix_mtime(mtime: Option<SystemTime>) -> crate::Result<Option<u64>> {
    mtime
        .map(|mtime| {
            Ok(mtime
                .duration_since(time::UNIX_EPOCH)
                .map_err(|err| crate::Error::InvalidArgs {
                    reason: err.to_string(),
                })?
                .as_secs())
        })
        .transpose()
}

fn system_mtime(mtime_secs: Option<u64>) -> Option<SystemTime> {
    mtime_secs.map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
}

// Methods on this type map 1:1 to SQL queries. rusqlite errors are handled and converted to
// sqlarbox errors.
#[derive(Debug)]
pub struct Store<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl<'conn> Store<'conn> {
    pub fn new(tx: rusqlite::Transaction<'conn>) -> Self {
        Self { tx }
    }

    pub fn into_tx(self) -> rusqlite::Transaction<'conn> {
        self.tx
    }

    pub fn create_table(&self) -> crate::Result<()> {
        self.tx.execute(
            "
            CREATE TABLE IF NOT EXISTS sqlar(
                name TEXT PRIMARY KEY,
                mode INT,
                mtime INT,
                sz INT,
                data BLOB
            );
            ",
            (),
        )?;

        Ok(())
    }

    pub fn table_exists(&self) -> crate::Result<bool> {
        let row = self
            .tx
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sqlar';",
                (),
                |_| Ok(()),
            )
            .optional()?;

        Ok(row.is_some())
    }

    pub fn contains(&self, name: &str) -> crate::Result<bool> {
        let row = self
            .tx
            .query_row("SELECT 1 FROM sqlar WHERE name = ?1;", (name,), |_| Ok(()))
            .optional()?;

        Ok(row.is_some())
    }

    pub fn count(&self) -> crate::Result<u64> {
        Ok(self
            .tx
            .query_row("SELECT count(*) FROM sqlar;", (), |row| row.get(0))?)
    }

    pub fn upsert(&self, entry: &ArchiveEntry) -> crate::Result<()> {
        self.tx.execute(
            "INSERT OR REPLACE INTO sqlar (name, mode, mtime, sz, data) VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &entry.name,
                entry.mode,
                unix_mtime(entry.mtime)?,
                entry.size,
                &entry.data,
            ),
        )?;

        Ok(())
    }

    pub fn delete(&self, name: &str) -> crate::Result<bool> {
        let num_deleted = self
            .tx
            .execute("DELETE FROM sqlar WHERE name = ?1", (name,))?;

        Ok(num_deleted > 0)
    }

    // No ORDER BY: the listing order is whatever order the database returns rows in, which is
    // deliberately unspecified.
    pub fn list_entries(&self) -> crate::Result<ListEntries> {
        let stmt = self.tx.prepare("SELECT name, sz, mtime FROM sqlar")?;

        let map_func: SummaryMapFunc = Box::new(|row| {
            Ok(EntrySummary {
                name: row.get(0)?,
                size: row.get(1)?,
                mtime: system_mtime(row.get(2)?),
            })
        });

        ListEntries::new(stmt, map_func)
    }

    pub fn all_entries(&self) -> crate::Result<ArchiveEntries> {
        let stmt = self
            .tx
            .prepare("SELECT name, mode, mtime, sz, data FROM sqlar")?;

        let map_func: EntryMapFunc = Box::new(|row| {
            Ok(ArchiveEntry {
                name: row.get(0)?,
                mode: row.get(1)?,
                mtime: system_mtime(row.get(2)?),
                size: row.get(3)?,
                data: row.get(4)?,
            })
        });

        ArchiveEntries::new(stmt, map_func)
    }
}
