//! Tab-separated lookup tables used by the romanizers.
//!
//! Each non-comment line holds a key and a value separated by a tab.
//! Blank lines and lines starting with `#` are skipped.

use crate::error::{Error, Result};

/// A single parsed table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// 1-based line number in the source text.
    pub line: usize,
    pub key: &'a str,
    pub value: &'a str,
}

/// Parses a tab-separated table, failing on the first malformed row.
pub fn parse_entries(text: &str) -> Result<Vec<Entry<'_>>> {
    let mut entries = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('\t') else {
            return Err(Error::InvalidDictionary {
                line,
                message: "expected <key>\\t<value>".into(),
            });
        };

        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(Error::InvalidDictionary {
                line,
                message: "empty key or value".into(),
            });
        }

        entries.push(Entry { line, key, value });
    }

    Ok(entries)
}
