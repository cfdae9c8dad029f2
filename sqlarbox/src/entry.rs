use std::time::SystemTime;

/// A complete row in the `sqlar` table.
///
/// The `size` is always the *uncompressed* length of the entry's contents; the length of `data`
/// is independent and differs from `size` exactly when the payload is stored compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// The archive-relative path of the entry, using `/` separators.
    pub name: String,

    /// The full file mode bits captured when the entry was added.
    pub mode: u32,

    /// The last modification time, truncated to seconds.
    ///
    /// This is `None` when the platform could not report a modification time.
    pub mtime: Option<SystemTime>,

    /// The uncompressed length of the entry's contents in bytes.
    pub size: u64,

    /// The stored payload, which may or may not be compressed.
    pub data: Vec<u8>,
}

/// An entry as it appears in a listing, without its payload.
///
/// Listings never materialize the stored payload; see [`Archive::list_pages`].
///
/// [`Archive::list_pages`]: crate::Archive::list_pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    /// The archive-relative path of the entry.
    pub name: String,

    /// The uncompressed length of the entry's contents in bytes.
    pub size: u64,

    /// The last modification time, truncated to seconds.
    pub mtime: Option<SystemTime>,
}
