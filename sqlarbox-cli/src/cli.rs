use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// The path of the SQLite archive.
    pub archive: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// How to resolve a name collision with an entry already in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnCollision {
    /// Ask the operator for each colliding entry.
    Ask,

    /// Replace the existing entry.
    Overwrite,

    /// Keep the existing entry.
    Skip,
}

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// The files or directories to add to the archive.
    ///
    /// A file is stored under its filename. A directory is walked recursively, and the files
    /// beneath it are stored under their paths relative to the directory.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// How to resolve name collisions with entries already in the archive.
    #[arg(long, value_enum, default_value_t = OnCollision::Ask)]
    pub on_collision: OnCollision,
}

#[derive(Args, Debug, Clone)]
pub struct Remove {
    /// The names of the entries to remove.
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct List {
    /// The number of entries to show per page.
    #[arg(short = 'p', long = "page-size", default_value = "10")]
    pub page_size: NonZeroUsize,

    /// Print every page without pausing between them.
    #[arg(long)]
    pub no_pause: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Extract {
    /// The directory to extract the entries into.
    pub dest: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add files or directories to the archive, creating it if necessary.
    #[command(visible_alias = "a")]
    Add(Add),

    /// Remove entries from the archive by name.
    #[command(visible_alias = "rm")]
    Remove(Remove),

    /// List the entries in the archive, a page at a time.
    #[command(visible_alias = "ls")]
    List(List),

    /// Extract every entry in the archive into a directory.
    #[command(visible_alias = "ex")]
    Extract(Extract),
}
