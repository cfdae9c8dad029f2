use std::fmt;

use super::entry::{ArchiveEntry, EntrySummary};

pub type SummaryMapFunc = Box<dyn FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<EntrySummary>>;
pub type EntryMapFunc = Box<dyn FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<ArchiveEntry>>;

#[ouroboros::self_referencing]
struct ListEntriesInner<'conn> {
    stmt: rusqlite::Statement<'conn>,
    #[borrows(mut stmt)]
    #[covariant]
    iter: rusqlite::MappedRows<'this, SummaryMapFunc>,
}

impl<'conn> fmt::Debug for ListEntriesInner<'conn> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEntries").finish_non_exhaustive()
    }
}

fn build_list_entries_inner(
    stmt: rusqlite::Statement,
    map_func: SummaryMapFunc,
) -> crate::Result<ListEntriesInner> {
    ListEntriesInnerTryBuilder {
        stmt,
        iter_builder: |stmt| stmt.query_map([], map_func).map_err(crate::Error::from),
    }
    .try_build()
}

/// A lazy cursor over the entries in an archive, without their payloads.
///
/// This holds the prepared statement open and produces one [`EntrySummary`] at a time, so listing
/// never materializes the stored payloads.
#[derive(Debug)]
pub struct ListEntries<'conn> {
    inner: ListEntriesInner<'conn>,
}

impl<'conn> ListEntries<'conn> {
    pub(super) fn new(
        stmt: rusqlite::Statement<'conn>,
        map_func: SummaryMapFunc,
    ) -> crate::Result<Self> {
        Ok(Self {
            inner: build_list_entries_inner(stmt, map_func)?,
        })
    }
}

impl<'conn> Iterator for ListEntries<'conn> {
    type Item = crate::Result<EntrySummary>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .with_iter_mut(|iter| iter.next())
            .map(|item| item.map_err(crate::Error::from))
    }
}

#[ouroboros::self_referencing]
struct ArchiveEntriesInner<'conn> {
    stmt: rusqlite::Statement<'conn>,
    #[borrows(mut stmt)]
    #[covariant]
    iter: rusqlite::MappedRows<'this, EntryMapFunc>,
}

impl<'conn> fmt::Debug for ArchiveEntriesInner<'conn> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntries").finish_non_exhaustive()
    }
}

fn build_archive_entries_inner(
    stmt: rusqlite::Statement,
    map_func: EntryMapFunc,
) -> crate::Result<ArchiveEntriesInner> {
    ArchiveEntriesInnerTryBuilder {
        stmt,
        iter_builder: |stmt| stmt.query_map([], map_func).map_err(crate::Error::from),
    }
    .try_build()
}

/// A lazy cursor over the complete entries in an archive, payloads included.
///
/// This is used by extraction. Only one row is materialized at a time, because the payloads in
/// aggregate may not fit in memory.
#[derive(Debug)]
pub struct ArchiveEntries<'conn> {
    inner: ArchiveEntriesInner<'conn>,
}

impl<'conn> ArchiveEntries<'conn> {
    pub(super) fn new(
        stmt: rusqlite::Statement<'conn>,
        map_func: EntryMapFunc,
    ) -> crate::Result<Self> {
        Ok(Self {
            inner: build_archive_entries_inner(stmt, map_func)?,
        })
    }
}

impl<'conn> Iterator for ArchiveEntries<'conn> {
    type Item = crate::Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .with_iter_mut(|iter| iter.next())
            .map(|item| item.map_err(crate::Error::from))
    }
}

/// A paginated view over the entries in an archive.
///
/// This is returned by [`Archive::list_pages`]. The underlying cursor advances as pages are
/// taken; the order of the entries is whatever order the database returns rows in, which is
/// deliberately unspecified.
///
/// [`Archive::list_pages`]: crate::Archive::list_pages
#[derive(Debug)]
pub struct Pages<'conn> {
    entries: ListEntries<'conn>,
    page_size: usize,
}

impl<'conn> Pages<'conn> {
    pub(super) fn new(entries: ListEntries<'conn>, page_size: usize) -> Self {
        Self { entries, page_size }
    }

    /// The number of entries per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advance the cursor by one page.
    ///
    /// Returns at most [`page_size`] entries; an empty page means the cursor is exhausted.
    ///
    /// [`page_size`]: Pages::page_size
    pub fn next_page(&mut self) -> crate::Result<Vec<EntrySummary>> {
        let mut page = Vec::new();

        while page.len() < self.page_size {
            match self.entries.next() {
                Some(entry) => page.push(entry?),
                None => break,
            }
        }

        Ok(page)
    }
}
