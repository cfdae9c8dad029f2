use std::path::Path;

use super::archive::Archive;

/// A connection to a SQLite archive.
///
/// All operations on an [`Archive`] must happen within the context of a [`Transaction`]. You can
/// use this connection to begin a transaction. Typically, you'll use [`Connection::exec`] to
/// execute a closure within a transaction.
///
/// You can open a connection to a SQLite archive using one of these methods:
///
/// - [`Connection::create`]
/// - [`Connection::open`]
/// - [`Connection::open_in_memory`]
#[derive(Debug)]
pub struct Connection {
    conn: rusqlite::Connection,
}

impl Connection {
    fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Create or open the SQLite archive at `path`.
    ///
    /// This creates the archive file and its `sqlar` table if they do not already exist; creation
    /// is idempotent and never alters existing entries. This is the connection the `add`
    /// operation uses.
    pub fn create<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        use rusqlite::OpenFlags;

        // SQLITE_OPEN_NO_MUTEX is the default in rusqlite. Its docs explain why.
        let flags = OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE;

        let mut conn = Connection::new(rusqlite::Connection::open_with_flags(path, flags)?);

        conn.exec(|archive| archive.init())?;

        Ok(conn)
    }

    /// Open a connection to the SQLite archive at `path`.
    ///
    /// This does not create a new SQLite archive if one does not already exist, and it requires
    /// the `sqlar` table to be present. Every operation other than `add` opens its archive this
    /// way, so targeting a missing or uninitialized archive fails before anything is mutated.
    ///
    /// # Errors
    ///
    /// - [`ArchiveNotFound`]: There is no file at `path`, or the database has no `sqlar` table.
    ///
    /// [`ArchiveNotFound`]: crate::Error::ArchiveNotFound
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        use rusqlite::OpenFlags;

        // SQLITE_OPEN_NO_MUTEX is the default in rusqlite. Its docs explain why.
        let flags = OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_READ_WRITE;

        let result = rusqlite::Connection::open_with_flags(&path, flags);

        let mut conn = match result {
            Ok(conn) => Connection::new(conn),
            Err(err) if err.sqlite_error_code() == Some(rusqlite::ErrorCode::CannotOpen) => {
                return Err(crate::Error::ArchiveNotFound {
                    path: path.as_ref().to_path_buf(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        let initialized = conn.exec(|archive| archive.is_initialized())?;

        if !initialized {
            return Err(crate::Error::ArchiveNotFound {
                path: path.as_ref().to_path_buf(),
            });
        }

        Ok(conn)
    }

    /// Create a new in-memory SQLite archive.
    pub fn open_in_memory() -> crate::Result<Self> {
        let mut conn = Self::new(rusqlite::Connection::open_in_memory()?);

        conn.exec(|archive| archive.init())?;

        Ok(conn)
    }

    /// Start a new transaction.
    pub fn transaction(&mut self) -> crate::Result<Transaction> {
        Ok(Transaction::new(self.conn.transaction()?))
    }

    /// Execute the given function within a new transaction.
    ///
    /// See [`Transaction::exec`].
    pub fn exec<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Archive) -> Result<T, E>,
        E: From<crate::Error>,
    {
        self.transaction()?.exec(f)
    }
}

/// An open transaction on an [`Archive`].
///
/// If a `Transaction` is dropped without committing, the transaction is rolled back.
#[derive(Debug)]
pub struct Transaction<'conn> {
    archive: Archive<'conn>,
}

impl<'conn> Transaction<'conn> {
    pub(super) fn new(tx: rusqlite::Transaction<'conn>) -> Self {
        Self {
            archive: Archive::new(tx),
        }
    }

    /// Execute the given function within this transaction.
    ///
    /// This calls the given function, passing the [`Archive`] holding this transaction. If the
    /// function returns `Ok`, this transaction is committed. If the function returns `Err`, this
    /// transaction is rolled back.
    pub fn exec<T, E, F>(mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Archive) -> Result<T, E>,
        E: From<crate::Error>,
    {
        let result = f(&mut self.archive)?;

        self.archive
            .into_tx()
            .commit()
            .map_err(crate::Error::from)?;

        Ok(result)
    }

    /// Get a mutable reference to the [`Archive`] holding this transaction.
    pub fn archive_mut(&mut self) -> &mut Archive<'conn> {
        &mut self.archive
    }

    /// Roll back this transaction.
    pub fn rollback(self) -> crate::Result<()> {
        Ok(self.archive.into_tx().rollback()?)
    }

    /// Commit this transaction.
    pub fn commit(self) -> crate::Result<()> {
        Ok(self.archive.into_tx().commit()?)
    }
}
