use std::io::{self, Write};
use std::path::Path;

use sqlarbox::{Connection, Resolution};

use super::cli::{Add, Cli, Commands, Extract, List, OnCollision, Remove};
use super::error::user_err;
use super::format;

fn prompt_collision(name: &str) -> Resolution {
    eprint!("The entry '{name}' already exists in the archive. [o]verwrite or [s]kip? ");

    let mut line = String::new();

    if io::stdin().read_line(&mut line).is_err() {
        return Resolution::Skip;
    }

    match line.trim().to_lowercase().as_str() {
        "o" | "overwrite" => Resolution::Overwrite,
        // Anything unrecognized is treated as a skip, which never loses data.
        _ => Resolution::Skip,
    }
}

fn prompt_continue() -> eyre::Result<bool> {
    eprint!("Press Enter for the next page, or 'q' to quit> ");

    let mut line = String::new();
    let num_read = io::stdin().read_line(&mut line)?;

    // EOF means there is no operator to ask.
    Ok(num_read != 0 && !line.trim().eq_ignore_ascii_case("q"))
}

impl Add {
    pub fn run(&self, archive: &Path, mut stdout: impl Write) -> eyre::Result<()> {
        let mut conn = Connection::create(archive)?;

        let mut resolver: Box<dyn FnMut(&str) -> Resolution> = match self.on_collision {
            OnCollision::Ask => Box::new(prompt_collision),
            OnCollision::Overwrite => Box::new(|_| Resolution::Overwrite),
            OnCollision::Skip => Box::new(|_| Resolution::Skip),
        };

        let report = conn.exec(|archive| archive.add_paths(&self.paths, &mut *resolver))?;

        for (path, err) in &report.errors {
            writeln!(stdout, "error: {}: {}", path.display(), err)?;
        }

        for name in &report.skipped {
            writeln!(stdout, "skipped existing entry: {name}")?;
        }

        writeln!(stdout, "added {} file(s) to the archive", report.added)?;

        Ok(())
    }
}

impl Remove {
    pub fn run(&self, archive: &Path, mut stdout: impl Write) -> eyre::Result<()> {
        let mut conn = Connection::open(archive)?;

        conn.exec(|archive| -> eyre::Result<()> {
            for name in &self.names {
                match archive.remove(name) {
                    Ok(true) => writeln!(stdout, "removed: {name}")?,
                    Ok(false) => writeln!(stdout, "no entry named '{name}' in the archive")?,
                    // One failed removal doesn't block the rest.
                    Err(err) => writeln!(stdout, "error: {name}: {err}")?,
                }
            }

            eyre::Result::Ok(())
        })?;

        Ok(())
    }
}

impl List {
    pub fn run(&self, archive: &Path, mut stdout: impl Write) -> eyre::Result<()> {
        let mut conn = Connection::open(archive)?;

        let page_size = self.page_size.get();

        conn.exec(|archive| -> eyre::Result<()> {
            let mut pages = archive.list_pages(page_size)?;

            loop {
                let page = pages.next_page()?;

                if page.is_empty() {
                    writeln!(stdout, "(no further entries)")?;
                    break;
                }

                format::print_page(&mut stdout, &page)?;

                // A short page is necessarily the last one.
                if page.len() < page_size {
                    break;
                }

                if !self.no_pause && !prompt_continue()? {
                    break;
                }
            }

            eyre::Result::Ok(())
        })?;

        Ok(())
    }
}

impl Extract {
    pub fn run(&self, archive: &Path, mut stdout: impl Write) -> eyre::Result<()> {
        if self.dest.exists() && !self.dest.is_dir() {
            return Err(user_err!(
                "The destination is not a directory: {}",
                self.dest.display()
            ));
        }

        let mut conn = Connection::open(archive)?;

        let report = conn.exec(|archive| archive.extract(&self.dest))?;

        for (name, err) in &report.errors {
            writeln!(stdout, "error: {name}: {err}")?;
        }

        writeln!(
            stdout,
            "extracted {} file(s) into {}",
            report.extracted,
            self.dest.display()
        )?;

        Ok(())
    }
}

impl Cli {
    pub fn dispatch(&self, stdout: impl Write) -> eyre::Result<()> {
        match &self.command {
            Commands::Add(add) => add.run(&self.archive, stdout),
            Commands::Remove(remove) => remove.run(&self.archive, stdout),
            Commands::List(list) => list.run(&self.archive, stdout),
            Commands::Extract(extract) => extract.run(&self.archive, stdout),
        }
    }
}
