//! Goal file reader.
//!
//! A goal file is plain text with one candidate goal per line. It is read
//! fully on every call so edits show up on the next render pass.

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Read the goals listed in `path`.
///
/// Blank lines are dropped and surrounding whitespace is trimmed; file order
/// is preserved. A missing file is the normal empty case and yields an
/// empty list. Bytes that are not valid UTF-8 are replaced, so one bad line
/// does not hide the others.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_goals_from_file(path: &Path) -> Result<Vec<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("goal file {} not found", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let goals = parse_goals(&String::from_utf8_lossy(&bytes));
    debug!("read {} goal(s) from {}", goals.len(), path.display());
    Ok(goals)
}

fn parse_goals(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
