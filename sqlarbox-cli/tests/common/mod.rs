#![allow(dead_code)]

use clap::Parser;
use sqlarbox_cli::Cli;

pub fn command(args: &[&str]) -> eyre::Result<String> {
    let mut output = Vec::new();
    let mut all_args = vec!["sqlarbox"];

    all_args.extend_from_slice(args);
    Cli::parse_from(all_args).dispatch(&mut output)?;

    Ok(String::from_utf8(output)?.trim().to_owned())
}
