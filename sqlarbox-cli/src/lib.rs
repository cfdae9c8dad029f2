mod cli;
mod command;
mod error;
mod format;

pub use cli::{Add, Cli, Commands, Extract, List, OnCollision, Remove};
pub use error::UserError;
