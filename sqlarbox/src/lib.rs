//! An archive manager for [sqlar](https://sqlite.org/sqlar.html)-format SQLite archive files.
//!
//! A SQLite archive is a SQLite database with a table named `sqlar` that maps an
//! archive-relative file path to its permission bits, modification time, original size, and
//! (possibly compressed) contents. This library implements the entry lifecycle over that table:
//! adding files and directory trees, removing entries by name, listing entries in pages, and
//! extracting the whole archive back into a directory tree with its metadata intact.
//!
//! ```no_run
//! use sqlarbox::{Connection, Resolution};
//!
//! fn main() -> sqlarbox::Result<()> {
//!     let mut conn = Connection::create("backup.sqlar")?;
//!
//!     let report = conn.exec(|archive| {
//!         archive.add_paths(&["docs".into()], &mut |_: &str| Resolution::Skip)
//!     })?;
//!
//!     println!("added {} files", report.added);
//!
//!     Ok(())
//! }
//! ```
//!
//! To open a SQLite archive, create a new [`Connection`]. From there, you can call
//! [`Connection::exec`] to execute a closure within a transaction. This closure will be passed an
//! [`Archive`], which is the main type for reading and writing to the archive.

mod archive;
mod codec;
mod entry;
mod error;
mod list;
mod mode;
mod name;
mod resolve;
mod store;
mod transaction;
mod util;

pub use archive::{AddReport, Archive, ExtractReport};
pub use entry::{ArchiveEntry, EntrySummary};
pub use error::{Error, Result, SqliteError};
pub use list::{ArchiveEntries, ListEntries, Pages};
pub use mode::FileMode;
pub use resolve::{Resolution, ResolveCollision};
pub use transaction::{Connection, Transaction};
