use std::io::{self, Write};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use sqlarbox::EntrySummary;

const NAME_WIDTH: usize = 30;
const SIZE_WIDTH: usize = 9;
const MTIME_WIDTH: usize = 25;

// "| " before each column plus the closing "|".
const RULE_WIDTH: usize = NAME_WIDTH + SIZE_WIDTH + MTIME_WIDTH + 7;

pub fn format_mtime(mtime: Option<SystemTime>) -> String {
    match mtime {
        Some(mtime) => DateTime::<Local>::from(mtime)
            .format("%a %b %d %H:%M:%S %Y")
            .to_string(),
        None => String::from("-"),
    }
}

// Long names keep their tail, which is the interesting part of a path.
pub fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();

    if chars.len() <= max_len {
        return name.to_owned();
    }

    let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();

    format!("...{tail}")
}

pub fn print_page(mut out: impl Write, entries: &[EntrySummary]) -> io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "| {:<nw$}| {:<sw$}| {:<mw$}|",
        "Name",
        "Sz",
        "Last modified",
        nw = NAME_WIDTH,
        sw = SIZE_WIDTH,
        mw = MTIME_WIDTH,
    )?;
    writeln!(out, "{rule}")?;

    for entry in entries {
        writeln!(
            out,
            "| {:<nw$}| {:<sw$}| {:<mw$}|",
            truncate_name(&entry.name, NAME_WIDTH - 1),
            entry.size,
            format_mtime(entry.mtime),
            nw = NAME_WIDTH,
            sw = SIZE_WIDTH,
            mw = MTIME_WIDTH,
        )?;
    }

    writeln!(out, "{rule}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use xpct::{eq_diff, equal, expect};

    #[test]
    fn short_names_are_untouched() {
        expect!(truncate_name("a.txt", 10)).to(eq_diff(String::from("a.txt")));
    }

    #[test]
    fn long_names_keep_their_tail() {
        expect!(truncate_name("some/deeply/nested/file.txt", 12))
            .to(eq_diff(String::from(".../file.txt")));
    }

    #[test]
    fn missing_mtime_formats_as_a_dash() {
        expect!(format_mtime(None)).to(equal(String::from("-")));
    }
}
