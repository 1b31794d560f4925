//! Cantonese romanization (Jyutping), one syllable per character.

use super::LineRomanizer;
use crate::dictionary::parse_entries;
use crate::error::{Error, Result};
use crate::language::Language;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_TABLE: &str = include_str!("../../data/jyutping.tsv");

static RE_JYUTPING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+[1-6]$").unwrap());

/// Character to Jyutping lookup table, keyed on Simplified forms.
#[derive(Debug, Clone, Default)]
pub struct JyutpingDictionary {
    readings: HashMap<char, String>,
}

impl JyutpingDictionary {
    /// The embedded table of common characters.
    pub fn builtin() -> Result<Self> {
        Self::from_tsv(BUILTIN_TABLE)
    }

    /// Parses a `<char>\t<jyutping>` table. When a character appears more
    /// than once, its first reading is the one used.
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut readings = HashMap::new();

        for entry in parse_entries(text)? {
            let mut chars = entry.key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(Error::InvalidDictionary {
                    line: entry.line,
                    message: format!("key {:?} is not a single character", entry.key),
                });
            };
            if !RE_JYUTPING.is_match(entry.value) {
                return Err(Error::InvalidDictionary {
                    line: entry.line,
                    message: format!("{:?} is not a Jyutping syllable", entry.value),
                });
            }
            readings.entry(c).or_insert_with(|| entry.value.to_string());
        }

        Ok(Self { readings })
    }

    /// Reads a table from a UTF-8 file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_tsv(&text)
    }

    /// Adds every reading from `other`, overriding existing ones.
    pub fn extend(&mut self, other: JyutpingDictionary) {
        self.readings.extend(other.readings);
    }

    /// Reading for `c`, if known.
    pub fn lookup(&self, c: char) -> Option<&str> {
        self.readings.get(&c).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Per-character Jyutping romanizer.
///
/// Every character of the line becomes exactly one token: its reading, or
/// the character itself when the table has none.
#[derive(Debug, Clone)]
pub struct CantoneseRomanizer {
    dictionary: JyutpingDictionary,
}

impl CantoneseRomanizer {
    /// Romanizer backed by the embedded table.
    pub fn new() -> Result<Self> {
        Ok(Self::with_dictionary(JyutpingDictionary::builtin()?))
    }

    pub fn with_dictionary(dictionary: JyutpingDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &JyutpingDictionary {
        &self.dictionary
    }
}

impl LineRomanizer for CantoneseRomanizer {
    fn romanize_line(&self, line: &str) -> String {
        line.chars()
            .map(|c| match self.dictionary.lookup(c) {
                Some(reading) => reading.to_string(),
                None => c.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn language(&self) -> Language {
        Language::Cantonese
    }
}
