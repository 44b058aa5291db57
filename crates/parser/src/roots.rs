//! Root-vertex lists and terminal-pair files: small whitespace-separated
//! integer formats used by the rooted-forest/cut families (`-f`/`--root`)
//! and the multi-terminal path family (`--terminal`), grounded on
//! `RootManager.hpp`'s `Parse` and `TerminalManager::Parse` in the original
//! sources.

use crate::error::{ParseError, Result};

fn parse_u32(field: &str) -> Result<u32> {
    field.parse().map_err(|_| ParseError::new(format!("expected a vertex id, found {field:?}"), 1, 1))
}

/// Parses a whitespace-separated list of root-vertex ids, one or many per
/// line, as read from a `--root` file (`RootManager::Parse`).
pub fn parse_roots(input: &str) -> Result<Vec<u32>> {
    input.split_whitespace().map(parse_u32).collect()
}

/// Parses a terminal-pairs file: consecutive `(a, b)` integer pairs,
/// whitespace-separated, as read by `TerminalManager::Parse`. An odd
/// number of integers is a format error.
pub fn parse_terminal_pairs(input: &str) -> Result<Vec<(u32, u32)>> {
    let numbers: Vec<u32> = input.split_whitespace().map(parse_u32).collect::<Result<_>>()?;
    if numbers.len() % 2 != 0 {
        return Err(ParseError::new("terminal-pairs file has an odd number of integers", 1, 1));
    }
    Ok(numbers.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}
