mod common;

use std::fs;

use common::{names, no_collisions, summaries, write_sample_tree};
use sqlarbox::{Connection, Error, Resolution};
use xpct::{
    be_err, be_false, be_ok, be_true, consist_of, equal, expect, match_pattern, pattern,
};

//
// `Connection::create` / `Connection::open`
//

#[test]
fn creating_an_archive_twice_preserves_existing_entries() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let archive_path = temp_dir.path().join("test.sqlar");

    fs::write(temp_dir.path().join("file.txt"), b"some contents")?;

    let mut conn = Connection::create(&archive_path)?;
    conn.exec(|archive| {
        archive.add_paths(&[temp_dir.path().join("file.txt")], &mut no_collisions)
    })?;

    // Opening with `create` again must not touch the table.
    let mut conn = Connection::create(&archive_path)?;

    expect!(names(&mut conn)).to(be_ok()).to(consist_of([String::from("file.txt")]));

    Ok(())
}

#[test]
fn opening_errors_when_archive_does_not_exist() {
    expect!(Connection::open("nonexistent.sqlar"))
        .to(be_err())
        .to(match_pattern(pattern!(Error::ArchiveNotFound { .. })));
}

#[test]
fn opening_errors_when_db_has_no_sqlar_table() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("other.db");

    let raw = rusqlite::Connection::open(&db_path)?;
    raw.execute("CREATE TABLE unrelated (id INTEGER PRIMARY KEY)", ())?;
    drop(raw);

    expect!(Connection::open(&db_path))
        .to(be_err())
        .to(match_pattern(pattern!(Error::ArchiveNotFound { .. })));

    Ok(())
}

//
// `Archive::add_paths`
//

#[test]
fn adding_a_file_strips_its_leading_directories() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;

    fs::create_dir_all(temp_dir.path().join("some/deep"))?;
    fs::write(temp_dir.path().join("some/deep/file.txt"), b"contents")?;

    let mut conn = Connection::open_in_memory()?;
    let report = conn.exec(|archive| {
        archive.add_paths(&[temp_dir.path().join("some/deep/file.txt")], &mut no_collisions)
    })?;

    expect!(report.added).to(equal(1));
    expect!(names(&mut conn)).to(be_ok()).to(consist_of([String::from("file.txt")]));

    Ok(())
}

#[test]
fn adding_a_directory_preserves_structure_without_its_own_name() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    write_sample_tree(temp_dir.path())?;

    let mut conn = Connection::open_in_memory()?;
    let report = conn
        .exec(|archive| archive.add_paths(&[temp_dir.path().join("docs")], &mut no_collisions))?;

    expect!(report.added).to(equal(3));
    expect!(names(&mut conn)).to(be_ok()).to(consist_of([
        String::from("a.txt"),
        String::from("b.txt"),
        String::from("sub/c.txt"),
    ]));

    Ok(())
}

#[test]
fn nonexistent_paths_are_silently_ignored() -> eyre::Result<()> {
    let mut conn = Connection::open_in_memory()?;

    let report =
        conn.exec(|archive| archive.add_paths(&["nonexistent".into()], &mut no_collisions))?;

    expect!(report.added).to(equal(0));
    expect!(report.errors.is_empty()).to(be_true());

    Ok(())
}

#[test]
fn size_records_the_uncompressed_length() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let contents = b"hello world, hello world, hello world".to_vec();

    fs::write(temp_dir.path().join("file.txt"), &contents)?;

    let mut conn = Connection::open_in_memory()?;
    conn.exec(|archive| {
        archive.add_paths(&[temp_dir.path().join("file.txt")], &mut no_collisions)
    })?;

    let summary = summaries(&mut conn)?.remove(0);

    expect!(summary.size).to(equal(contents.len() as u64));

    Ok(())
}

//
// Collision resolution
//

#[test]
fn colliding_add_with_skip_keeps_the_existing_entry() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let file_path = temp_dir.path().join("file.txt");

    fs::write(&file_path, b"original")?;

    let mut conn = Connection::open_in_memory()?;
    conn.exec(|archive| archive.add_paths(&[file_path.clone()], &mut no_collisions))?;

    fs::write(&file_path, b"replacement with a different length")?;

    let report = conn
        .exec(|archive| archive.add_paths(&[file_path.clone()], &mut |_: &str| Resolution::Skip))?;

    expect!(report.added).to(equal(0));
    expect!(report.skipped.clone()).to(consist_of([String::from("file.txt")]));

    let summary = summaries(&mut conn)?.remove(0);

    expect!(summary.size).to(equal("original".len() as u64));

    Ok(())
}

#[test]
fn colliding_add_with_overwrite_replaces_the_entry() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let file_path = temp_dir.path().join("file.txt");

    fs::write(&file_path, b"original")?;

    let mut conn = Connection::open_in_memory()?;
    conn.exec(|archive| archive.add_paths(&[file_path.clone()], &mut no_collisions))?;

    fs::write(&file_path, b"replacement with a different length")?;

    let report = conn.exec(|archive| {
        archive.add_paths(&[file_path.clone()], &mut |_: &str| Resolution::Overwrite)
    })?;

    expect!(report.added).to(equal(1));

    // Still exactly one entry with that name.
    expect!(conn.exec(|archive| archive.len())).to(be_ok()).to(equal(1));

    let summary = summaries(&mut conn)?.remove(0);

    expect!(summary.size).to(equal("replacement with a different length".len() as u64));

    Ok(())
}

//
// `Archive::remove`
//

#[test]
fn removing_a_present_entry_leaves_the_rest() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    write_sample_tree(temp_dir.path())?;

    let mut conn = Connection::open_in_memory()?;
    conn.exec(|archive| archive.add_paths(&[temp_dir.path().join("docs")], &mut no_collisions))?;

    expect!(conn.exec(|archive| archive.remove("sub/c.txt")))
        .to(be_ok())
        .to(be_true());

    expect!(names(&mut conn)).to(be_ok()).to(consist_of([
        String::from("a.txt"),
        String::from("b.txt"),
    ]));

    Ok(())
}

#[test]
fn removing_an_absent_entry_reports_it_and_changes_nothing() -> eyre::Result<()> {
    let mut conn = Connection::open_in_memory()?;

    expect!(conn.exec(|archive| archive.remove("missing.txt")))
        .to(be_ok())
        .to(be_false());

    expect!(conn.exec(|archive| archive.len())).to(be_ok()).to(equal(0));

    Ok(())
}

#[test]
fn contains_reflects_adds_and_removes() -> eyre::Result<()> {
    let temp_dir = tempfile::tempdir()?;

    fs::write(temp_dir.path().join("file.txt"), b"contents")?;

    let mut conn = Connection::open_in_memory()?;
    conn.exec(|archive| {
        archive.add_paths(&[temp_dir.path().join("file.txt")], &mut no_collisions)
    })?;

    expect!(conn.exec(|archive| archive.contains("file.txt")))
        .to(be_ok())
        .to(be_true());

    conn.exec(|archive| archive.remove("file.txt"))?;

    expect!(conn.exec(|archive| archive.contains("file.txt")))
        .to(be_ok())
        .to(be_false());

    Ok(())
}
