use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::codec;
use super::entry::ArchiveEntry;
use super::list::Pages;
use super::mode::{FileMode, ReadMode, WriteMode};
use super::name::entry_name;
use super::resolve::{Resolution, ResolveCollision};
use super::store::Store;
use super::util::u64_from_usize;

#[cfg(unix)]
use super::mode::UnixModeAdapter as PlatformModeAdapter;
#[cfg(windows)]
use super::mode::WindowsModeAdapter as PlatformModeAdapter;

/// The outcome of [`Archive::add_paths`].
#[derive(Debug, Default)]
pub struct AddReport {
    /// The number of files written to the archive, counting both new entries and overwrites.
    pub added: u64,

    /// The names of entries that already existed and were left untouched.
    pub skipped: Vec<String>,

    /// Per-file failures. The rest of the batch proceeds past these.
    pub errors: Vec<(PathBuf, crate::Error)>,
}

/// The outcome of [`Archive::extract`].
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// The number of files written to the output directory.
    pub extracted: u64,

    /// Per-entry failures: a content write that failed, or metadata that could not be restored.
    /// The rest of the archive is still extracted.
    pub errors: Vec<(String, crate::Error)>,
}

enum AddOutcome {
    Written,
    Skipped(String),
}

/// A SQLite archive.
///
/// This is the main type for reading and writing to the archive. You can only access an `Archive`
/// within the context of a transaction, which you'll typically use [`Connection::exec`] for.
///
/// A SQLite archive is a SQLite database with a table named `sqlar` that conforms to a specific
/// schema. A SQLite archive may contain other tables, and this library will ignore them.
///
/// All entry names in a SQLite archive are relative paths with `/` separators, and they must be
/// valid Unicode.
///
/// [`Connection::exec`]: crate::Connection::exec
#[derive(Debug)]
pub struct Archive<'conn> {
    store: Store<'conn>,
}

impl<'conn> Archive<'conn> {
    pub(super) fn new(tx: rusqlite::Transaction<'conn>) -> Self {
        Self {
            store: Store::new(tx),
        }
    }

    pub(super) fn into_tx(self) -> rusqlite::Transaction<'conn> {
        self.store.into_tx()
    }

    pub(super) fn init(&mut self) -> crate::Result<()> {
        self.store.create_table()
    }

    pub(super) fn is_initialized(&self) -> crate::Result<bool> {
        self.store.table_exists()
    }

    /// Whether the archive has an entry with the given `name`.
    pub fn contains(&self, name: &str) -> crate::Result<bool> {
        self.store.contains(name)
    }

    /// The number of entries in the archive.
    pub fn len(&self) -> crate::Result<u64> {
        self.store.count()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> crate::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Add the files and directories at the given `paths` to the archive.
    ///
    /// A regular file is stored under its final path component, with no directory prefix. A
    /// directory is walked recursively, and every file beneath it is stored under its path
    /// relative to the directory itself, so the tree structure is preserved without the
    /// directory's own name. Input paths that do not exist, and paths that are neither regular
    /// files nor directories, are silently ignored.
    ///
    /// When a computed name already exists in the archive, the `resolver` decides whether the
    /// existing entry is overwritten or the new file is skipped.
    ///
    /// Failures to read or store an individual file do not abort the batch; they are collected in
    /// the returned [`AddReport`].
    pub fn add_paths<R>(&mut self, paths: &[PathBuf], resolver: &mut R) -> crate::Result<AddReport>
    where
        R: ResolveCollision + ?Sized,
    {
        let mut report = AddReport::default();

        for path in paths {
            let metadata = match fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    report.errors.push((path.clone(), err.into()));
                    continue;
                }
            };

            if metadata.is_file() {
                self.add_one(path, None, &metadata, resolver, &mut report);
            } else if metadata.is_dir() {
                self.add_tree(path, path, resolver, &mut report);
            }
        }

        Ok(report)
    }

    // Walks one directory level, recursing into subdirectories. Files are processed one at a
    // time; the full tree is never collected up front.
    fn add_tree<R>(
        &mut self,
        dir: &Path,
        base_dir: &Path,
        resolver: &mut R,
        report: &mut AddReport,
    ) where
        R: ResolveCollision + ?Sized,
    {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                report.errors.push((dir.to_path_buf(), err.into()));
                return;
            }
        };

        for entry in entries {
            let entry_path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    report.errors.push((dir.to_path_buf(), err.into()));
                    continue;
                }
            };

            let metadata = match fs::metadata(&entry_path) {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    report.errors.push((entry_path, err.into()));
                    continue;
                }
            };

            if metadata.is_dir() {
                self.add_tree(&entry_path, base_dir, resolver, report);
            } else if metadata.is_file() {
                self.add_one(&entry_path, Some(base_dir), &metadata, resolver, report);
            }
        }
    }

    fn add_one<R>(
        &mut self,
        path: &Path,
        base_dir: Option<&Path>,
        metadata: &fs::Metadata,
        resolver: &mut R,
        report: &mut AddReport,
    ) where
        R: ResolveCollision + ?Sized,
    {
        match self.add_file(path, base_dir, metadata, resolver) {
            Ok(AddOutcome::Written) => report.added += 1,
            Ok(AddOutcome::Skipped(name)) => report.skipped.push(name),
            Err(err) => report.errors.push((path.to_path_buf(), err)),
        }
    }

    fn add_file<R>(
        &mut self,
        path: &Path,
        base_dir: Option<&Path>,
        metadata: &fs::Metadata,
        resolver: &mut R,
    ) -> crate::Result<AddOutcome>
    where
        R: ResolveCollision + ?Sized,
    {
        let name = entry_name(path, base_dir)?;

        if self.store.contains(&name)? && resolver.resolve(&name) == Resolution::Skip {
            return Ok(AddOutcome::Skipped(name));
        }

        let mode = PlatformModeAdapter
            .read_mode(path, metadata)?
            .to_file_mode();

        // `std::fs::Metadata::modified` returns an error when mtime isn't available on the
        // current platform, in which case we just don't set the mtime in the archive.
        let mtime = metadata.modified().ok();

        let bytes = fs::read(path)?;
        let size = u64_from_usize(bytes.len());
        let data = codec::encode(bytes)?;

        self.store.upsert(&ArchiveEntry {
            name,
            mode,
            mtime,
            size,
            data,
        })?;

        Ok(AddOutcome::Written)
    }

    /// Remove the entry with the given `name` from the archive.
    ///
    /// Returns whether an entry with that name existed.
    pub fn remove(&mut self, name: &str) -> crate::Result<bool> {
        self.store.delete(name)
    }

    /// Return a paginated view over the entries in the archive.
    ///
    /// Pages never contain the stored payloads. The order of the entries is storage-defined.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgs`]: `page_size` was zero.
    ///
    /// [`InvalidArgs`]: crate::Error::InvalidArgs
    pub fn list_pages(&mut self, page_size: usize) -> crate::Result<Pages> {
        if page_size == 0 {
            return Err(crate::Error::InvalidArgs {
                reason: String::from("The page size must be greater than zero."),
            });
        }

        Ok(Pages::new(self.store.list_entries()?, page_size))
    }

    /// Extract every entry in the archive into the directory at `dest`.
    ///
    /// Entries are restored one at a time: the payload is decompressed, parent directories are
    /// created, the contents are written, and the entry's mtime and permission bits are restored
    /// on the written file.
    ///
    /// A failure to write one entry's contents or restore its metadata is recorded in the
    /// returned [`ExtractReport`] and does not stop the remaining entries.
    ///
    /// # Errors
    ///
    /// - [`CorruptEntry`]: A stored payload could not be decompressed. This aborts the whole
    /// extract; files already written stay on disk.
    ///
    /// [`CorruptEntry`]: crate::Error::CorruptEntry
    pub fn extract(&mut self, dest: &Path) -> crate::Result<ExtractReport> {
        let mut report = ExtractReport::default();

        for result in self.store.all_entries()? {
            let ArchiveEntry {
                name,
                mode,
                mtime,
                size,
                data,
            } = result?;

            // A payload that can't be decompressed is fatal. Skipping it and continuing would
            // leave the operator with an output tree that is silently missing data.
            let bytes = codec::decode(&name, data, size)?;

            match write_file(&dest.join(&name), &bytes) {
                Ok(file) => {
                    report.extracted += 1;

                    if let Err(err) = restore_metadata(&file, &dest.join(&name), mode, mtime) {
                        report.errors.push((name, err));
                    }
                }
                Err(err) => report.errors.push((name, err)),
            }
        }

        Ok(report)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> crate::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;

    Ok(file)
}

fn restore_metadata(
    file: &fs::File,
    path: &Path,
    mode: u32,
    mtime: Option<SystemTime>,
) -> crate::Result<()> {
    if let Some(mtime) = mtime {
        file.set_modified(mtime)?;
    }

    PlatformModeAdapter.write_mode(path, FileMode::from_mode(mode))?;

    Ok(())
}
