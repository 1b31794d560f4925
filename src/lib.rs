//! # hanlyric
//!
//! Turns raw Chinese song lyrics into a study transcript: every lyric line is
//! preceded by its romanization, Hanyu Pinyin with tone marks for Mandarin or
//! Jyutping for Cantonese.
//!
//! ## Pipeline
//!
//! 1. **Clean** - drop section markers, credits, blank runs and carriage returns
//! 2. **Normalize** - convert Traditional characters to Simplified
//! 3. **Romanize** - romanize each line with the selected [`LineRomanizer`]
//! 4. **Assemble** - interleave romanization, source line and stanza breaks
//!
//! ## Quick Start
//!
//! ```no_run
//! use hanlyric::{Language, Pipeline};
//!
//! fn main() -> hanlyric::Result<()> {
//!     let pipeline = Pipeline::for_language(Language::Mandarin)?;
//!     let transcript = pipeline.process("[Verse 1]\n月亮代表我的心");
//!
//!     assert_eq!(transcript, "yuè liàng dài biǎo wǒ de xīn\n月亮代表我的心");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `genius`: fetch lyrics from genius.com
//! - `async`: Async API support with Tokio

pub mod cleanup;
pub mod dictionary;
pub mod error;
pub mod language;
pub mod options;
pub mod romanize;
pub mod script;
pub mod source;
pub mod transcript;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use cleanup::{clean, clean_with_options, CleanOptions};
pub use error::{Error, Result};
pub use language::Language;
pub use options::PipelineOptions;
pub use romanize::{
    romanize, romanize_transcript, CantoneseRomanizer, JyutpingDictionary, LineRomanizer,
    MandarinRomanizer, PhraseTable,
};
pub use script::{normalize, OpenccConverter, Passthrough, ScriptConverter};
pub use source::{FileSource, LyricsSource, SourcedLyrics, TextSource};
pub use transcript::{RomanizedLine, Transcript};

#[cfg(feature = "genius")]
pub use source::GeniusSource;

use rayon::prelude::*;
use serde::Serialize;

/// The assembled cleaner, script converter and romanizer.
///
/// Holds only immutable resources, so one instance can serve any number of
/// concurrent invocations.
pub struct Pipeline {
    clean: CleanOptions,
    converter: Box<dyn ScriptConverter>,
    romanizer: Box<dyn LineRomanizer>,
}

impl Pipeline {
    /// Builds a pipeline from options, loading the dictionaries it needs.
    pub fn new(options: &PipelineOptions) -> Result<Self> {
        let converter: Box<dyn ScriptConverter> = if options.simplify {
            Box::new(OpenccConverter::new()?)
        } else {
            Box::new(Passthrough)
        };

        let romanizer: Box<dyn LineRomanizer> = match options.language {
            Language::Mandarin => {
                Box::new(MandarinRomanizer::new()?.with_tone_sandhi(options.tone_sandhi))
            }
            Language::Cantonese => {
                let mut dictionary = JyutpingDictionary::builtin()?;
                if let Some(path) = &options.jyutping_dictionary {
                    dictionary.extend(JyutpingDictionary::from_path(path)?);
                }
                Box::new(CantoneseRomanizer::with_dictionary(dictionary))
            }
        };

        Ok(Self::with_parts(options.clean.clone(), converter, romanizer))
    }

    /// Pipeline with default options for `language`.
    pub fn for_language(language: Language) -> Result<Self> {
        Self::new(&PipelineOptions::default().with_language(language))
    }

    /// Assembles a pipeline from explicit parts.
    pub fn with_parts(
        clean: CleanOptions,
        converter: Box<dyn ScriptConverter>,
        romanizer: Box<dyn LineRomanizer>,
    ) -> Self {
        Self {
            clean,
            converter,
            romanizer,
        }
    }

    pub fn language(&self) -> Language {
        self.romanizer.language()
    }

    /// Stage 1 only.
    pub fn clean(&self, raw: &str) -> String {
        clean_with_options(raw, &self.clean)
    }

    /// Stage 2 only.
    pub fn normalize(&self, text: &str) -> String {
        normalize(text, self.converter.as_ref())
    }

    /// Runs every stage and returns the structured transcript.
    pub fn transcribe(&self, raw: &str) -> Transcript {
        let cleaned = self.clean(raw);
        if cleaned.is_empty() {
            tracing::warn!("no lyric lines left after cleaning");
        }
        let simplified = self.normalize(&cleaned);
        romanize_transcript(&simplified, self.romanizer.as_ref())
    }

    /// Runs every stage and returns the transcript text. Empty when nothing
    /// survived cleaning.
    pub fn process(&self, raw: &str) -> String {
        self.transcribe(raw).into_string()
    }

    /// Processes independent inputs in parallel, preserving their order.
    pub fn process_batch<S>(&self, inputs: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|raw| self.process(raw.as_ref()))
            .collect()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("language", &self.language())
            .field("clean", &self.clean)
            .finish_non_exhaustive()
    }
}

/// Cleans, normalizes and romanizes `raw` with default options.
///
/// Builds the dictionaries on every call; keep a [`Pipeline`] around when
/// processing more than one text. Errors only if the dictionaries fail to
/// load; the transcript itself is empty when no lyrics survive cleaning.
///
/// # Example
///
/// ```no_run
/// use hanlyric::{process_lyrics, Language};
///
/// let out = process_lyrics("你好\n\n\n再见", Language::Cantonese)?;
/// assert_eq!(out, "nei5 hou2\n你好\n\nzoi3 gin3\n再见");
/// # Ok::<(), hanlyric::Error>(())
/// ```
pub fn process_lyrics(raw: &str, language: Language) -> Result<String> {
    Ok(Pipeline::for_language(language)?.process(raw))
}

/// Result of fetching and processing a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsResponse {
    /// The transcript text.
    pub lyrics: String,
    /// Where the raw lyrics came from.
    pub source: String,
    /// How they were retrieved.
    pub method: &'static str,
    pub language: Language,
}

/// Fetches raw lyrics from `source` and runs them through `pipeline`.
///
/// Source failures are returned as errors before the pipeline runs.
pub fn fetch_and_process(
    pipeline: &Pipeline,
    source: &dyn LyricsSource,
    query: &str,
) -> Result<LyricsResponse> {
    tracing::info!(
        query,
        romanization = pipeline.language().romanization_name(),
        "fetching lyrics"
    );
    let sourced = source.fetch(query)?;
    Ok(LyricsResponse {
        lyrics: pipeline.process(&sourced.text),
        source: sourced.origin,
        method: sourced.method,
        language: pipeline.language(),
    })
}
