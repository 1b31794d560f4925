//! Lyrics sources.
//!
//! A [`LyricsSource`] turns a query into a raw text blob. The pipeline makes
//! no assumption about that text beyond it being UTF-8.

#[cfg(feature = "genius")]
mod genius;

#[cfg(feature = "genius")]
pub use genius::{extract_lyrics, GeniusSource};

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Raw lyrics plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcedLyrics {
    /// Raw, uncleaned text.
    pub text: String,
    /// Where the text was found (URL, path, ...).
    pub origin: String,
    /// Short name of the retrieval method.
    pub method: &'static str,
}

/// Something that can produce raw lyrics for a query.
pub trait LyricsSource {
    /// Fetches raw lyrics. Returns [`Error::SourceUnavailable`] when no text
    /// could be produced.
    fn fetch(&self, query: &str) -> Result<SourcedLyrics>;
}

/// Ensures a source returned some text.
pub(crate) fn non_empty(lyrics: SourcedLyrics) -> Result<SourcedLyrics> {
    if lyrics.text.trim().is_empty() {
        return Err(Error::SourceUnavailable(format!(
            "no lyrics text from {}",
            lyrics.origin
        )));
    }
    Ok(lyrics)
}

/// Serves a fixed, in-memory text regardless of the query.
#[derive(Debug, Clone)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl LyricsSource for TextSource {
    fn fetch(&self, _query: &str) -> Result<SourcedLyrics> {
        non_empty(SourcedLyrics {
            text: self.text.clone(),
            origin: "memory".into(),
            method: "text",
        })
    }
}

/// Reads lyrics from a UTF-8 file; the query is the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl LyricsSource for FileSource {
    fn fetch(&self, query: &str) -> Result<SourcedLyrics> {
        let path = Path::new(query);
        let bytes = std::fs::read(path).map_err(|e| {
            Error::SourceUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let text = String::from_utf8(bytes)?;
        tracing::info!(path = %path.display(), bytes = text.len(), "read lyrics file");
        non_empty(SourcedLyrics {
            text,
            origin: path.display().to_string(),
            method: "file",
        })
    }
}
