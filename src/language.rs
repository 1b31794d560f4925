//! Language variants supported by the romanizer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Spoken variety whose romanization is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Mandarin, romanized as Hanyu Pinyin with tone marks.
    #[default]
    Mandarin,
    /// Cantonese, romanized as Jyutping with tone numbers.
    Cantonese,
}

impl Language {
    /// Lowercase identifier, as used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Mandarin => "mandarin",
            Language::Cantonese => "cantonese",
        }
    }

    /// Human-readable name of the romanization scheme.
    pub fn romanization_name(&self) -> &'static str {
        match self {
            Language::Mandarin => "Hanyu Pinyin",
            Language::Cantonese => "Jyutping",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandarin" | "zh" | "cmn" | "putonghua" => Ok(Language::Mandarin),
            "cantonese" | "yue" | "zh-yue" => Ok(Language::Cantonese),
            other => Err(Error::UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("mandarin".parse::<Language>().unwrap(), Language::Mandarin);
        assert_eq!(" Cantonese ".parse::<Language>().unwrap(), Language::Cantonese);
        assert_eq!("yue".parse::<Language>().unwrap(), Language::Cantonese);
        assert_eq!("cmn".parse::<Language>().unwrap(), Language::Mandarin);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(ref s) if s == "klingon"));
    }

    #[test]
    fn test_default_is_mandarin() {
        assert_eq!(Language::default(), Language::Mandarin);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Language::Cantonese).unwrap();
        assert_eq!(json, "\"cantonese\"");
        let back: Language = serde_json::from_str("\"mandarin\"").unwrap();
        assert_eq!(back, Language::Mandarin);
    }
}
