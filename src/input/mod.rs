//! Seed list loading
//!
//! The seed list is a delimited text export of a spreadsheet: one record per
//! line, the seed URL in the first column, an optional header row. Only the
//! first column is read. Row numbers are the 1-based line numbers of the file,
//! so results can be written back next to the row they came from.

use crate::InputError;
use std::path::Path;

/// One site to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// 1-based line number in the seed list
    pub row: usize,

    /// First-column value, trimmed and unquoted
    pub url: String,
}

/// Reads seeds from `path`
///
/// # Returns
///
/// * `Ok(Vec<Seed>)` - Seeds in file order
/// * `Err(InputError)` - File unreadable or contains no seeds
pub fn load_seeds(path: &Path, has_header: bool) -> Result<Vec<Seed>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let seeds = parse_seeds(&content, has_header);
    if seeds.is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }

    tracing::info!("Loaded {} seeds from {}", seeds.len(), path.display());
    Ok(seeds)
}

/// Parses seed list text; rows with an empty first column are skipped
pub fn parse_seeds(content: &str, has_header: bool) -> Vec<Seed> {
    content
        .lines()
        .enumerate()
        .skip(usize::from(has_header))
        .filter_map(|(index, line)| {
            let url = first_column(line);
            (!url.is_empty()).then(|| Seed {
                row: index + 1,
                url,
            })
        })
        .collect()
}

fn first_column(line: &str) -> String {
    let line = line.trim_start_matches('\u{feff}').trim();

    match line.strip_prefix('"') {
        Some(rest) => unquote(rest).trim().to_string(),
        None => line
            .split([',', ';', '\t'])
            .next()
            .unwrap_or("")
            .trim()
            .to_string(),
    }
}

/// Reads a quoted cell up to its closing quote; `""` stands for one `"`
fn unquote(rest: &str) -> String {
    let mut cell = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' && chars.next_if_eq(&'"').is_none() {
            break;
        }
        cell.push(c);
    }
    cell
}
