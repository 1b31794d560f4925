//! Pipeline options.

use crate::cleanup::CleanOptions;
use crate::language::Language;
use std::path::PathBuf;

/// Options for building a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Which romanization to produce.
    pub language: Language,

    /// Cleanup stage configuration.
    pub clean: CleanOptions,

    /// Whether to convert Traditional script to Simplified before romanizing.
    pub simplify: bool,

    /// Whether to apply 一/不 tone sandhi (Mandarin only).
    pub tone_sandhi: bool,

    /// Extra Jyutping table merged over the embedded one (Cantonese only).
    pub jyutping_dictionary: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            language: Language::Mandarin,
            clean: CleanOptions::default(),
            simplify: true,
            tone_sandhi: true,
            jyutping_dictionary: None,
        }
    }
}

impl PipelineOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the romanization language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Shorthand for Cantonese/Jyutping output.
    pub fn cantonese(self) -> Self {
        self.with_language(Language::Cantonese)
    }

    /// Replaces the cleanup configuration.
    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    /// Leaves Traditional characters as they are.
    pub fn without_simplify(mut self) -> Self {
        self.simplify = false;
        self
    }

    /// Disables 一/不 tone sandhi.
    pub fn without_tone_sandhi(mut self) -> Self {
        self.tone_sandhi = false;
        self
    }

    /// Merges a user Jyutping table over the embedded one.
    pub fn with_jyutping_dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.jyutping_dictionary = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert_eq!(options.language, Language::Mandarin);
        assert!(options.simplify);
        assert!(options.tone_sandhi);
        assert!(options.jyutping_dictionary.is_none());
    }

    #[test]
    fn test_builder() {
        let options = PipelineOptions::new()
            .cantonese()
            .without_simplify()
            .without_tone_sandhi()
            .with_jyutping_dictionary("extra.tsv");
        assert_eq!(options.language, Language::Cantonese);
        assert!(!options.simplify);
        assert!(!options.tone_sandhi);
        assert_eq!(options.jyutping_dictionary, Some(PathBuf::from("extra.tsv")));
    }
}
