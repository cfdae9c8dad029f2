#![allow(dead_code)]

use std::fs;
use std::path::Path;

use sqlarbox::{Connection, EntrySummary, Resolution};

/// A collision resolver for tests that should never hit a collision.
pub fn no_collisions(name: &str) -> Resolution {
    panic!("Unexpected name collision for entry `{name}`.");
}

/// Collect every entry summary in the archive, in storage order.
pub fn summaries(conn: &mut Connection) -> sqlarbox::Result<Vec<EntrySummary>> {
    conn.exec(|archive| {
        let mut pages = archive.list_pages(usize::MAX)?;
        pages.next_page()
    })
}

/// Collect the names of every entry in the archive.
pub fn names(conn: &mut Connection) -> sqlarbox::Result<Vec<String>> {
    Ok(summaries(conn)?
        .into_iter()
        .map(|summary| summary.name)
        .collect())
}

/// Write the three-file tree `docs/{a.txt,b.txt,sub/c.txt}` under `root`.
pub fn write_sample_tree(root: &Path) -> sqlarbox::Result<()> {
    fs::create_dir_all(root.join("docs/sub"))?;
    fs::write(root.join("docs/a.txt"), b"contents of a")?;
    fs::write(root.join("docs/b.txt"), b"contents of b")?;
    fs::write(root.join("docs/sub/c.txt"), b"contents of c")?;

    Ok(())
}
