//! Traditional to Simplified script normalization.
//!
//! Romanization tables are keyed on Simplified forms, so every line passes
//! through a [`ScriptConverter`] before it is romanized.

use crate::error::{Error, Result};
use ferrous_opencc::{config::BuiltinConfig, OpenCC};

/// A pure character-mapping capability over Unicode text.
///
/// Implementations must be idempotent and leave unmapped characters as they
/// are. Conversion never fails.
pub trait ScriptConverter: Send + Sync {
    /// Converts `text` to the target script.
    fn convert(&self, text: &str) -> String;
}

/// Taiwan-variant Traditional to Mainland Simplified, backed by OpenCC `tw2s`.
pub struct OpenccConverter {
    inner: OpenCC,
}

impl OpenccConverter {
    /// Builds the converter from the embedded OpenCC dictionaries.
    pub fn new() -> Result<Self> {
        let inner = OpenCC::from_config(BuiltinConfig::Tw2s)
            .map_err(|e| Error::Conversion(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ScriptConverter for OpenccConverter {
    fn convert(&self, text: &str) -> String {
        self.inner.convert(text)
    }
}

impl std::fmt::Debug for OpenccConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenccConverter").finish_non_exhaustive()
    }
}

/// Leaves text untouched. Used when script normalization is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ScriptConverter for Passthrough {
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Normalizes `text` to Simplified script with the given converter.
pub fn normalize(text: &str, converter: &dyn ScriptConverter) -> String {
    let result = converter.convert(text);
    tracing::debug!(chars = text.chars().count(), "normalized script");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> OpenccConverter {
        OpenccConverter::new().unwrap()
    }

    #[test]
    fn test_traditional_to_simplified() {
        let conv = converter();
        assert_eq!(normalize("我愛你", &conv), "我爱你");
        assert_eq!(normalize("後來", &conv), "后来");
        assert_eq!(normalize("月亮代表我的心", &conv), "月亮代表我的心");
    }

    #[test]
    fn test_non_chinese_untouched() {
        let conv = converter();
        let input = "Hello, world! 123 ♪";
        assert_eq!(normalize(input, &conv), input);
    }

    #[test]
    fn test_idempotent() {
        let conv = converter();
        for input in ["傳說中的愛情", "聽海", "我們的時代 2024", "", "喜歡 ABC"] {
            let once = normalize(input, &conv);
            let twice = normalize(&once, &conv);
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_preserves_char_count() {
        let conv = converter();
        for line in ["對你愛不完", "時間會證明一切", "風繼續吹"] {
            let out = normalize(line, &conv);
            assert_eq!(out.chars().count(), line.chars().count());
        }
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize("我愛你", &Passthrough), "我愛你");
    }
}
