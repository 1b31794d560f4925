//! Transcript model and line assembly.
//!
//! The romanizer decides what each line becomes; [`LineAssembler`] decides
//! how the results are interleaved and spaced.

use crate::language::Language;
use serde::Serialize;

/// A source line paired with its romanization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomanizedLine {
    /// Space-joined syllables.
    pub romanization: String,
    /// The trimmed source line.
    pub text: String,
}

/// Final, immutable result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    language: Language,
    lines: Vec<RomanizedLine>,
    #[serde(skip)]
    rendered: String,
}

impl Transcript {
    /// Language the transcript was romanized for.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Romanized lines in source order.
    pub fn lines(&self) -> &[RomanizedLine] {
        &self.lines
    }

    /// True when no lyric line survived.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The transcript as text: romanization, source, blank line, repeated.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Consumes the transcript, returning its text form.
    pub fn into_string(self) -> String {
        self.rendered
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Builds a [`Transcript`] one emitted line at a time.
///
/// Blank separators are tracked with `last_blank` so that a stanza break is
/// always exactly one blank line, no matter how many blank input lines or
/// block separators meet.
#[derive(Debug)]
pub struct LineAssembler {
    language: Language,
    lines: Vec<RomanizedLine>,
    output: Vec<String>,
    last_blank: bool,
}

impl LineAssembler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            lines: Vec::new(),
            output: Vec::new(),
            last_blank: false,
        }
    }

    /// Records a blank input line. Emits at most one separator in a row and
    /// never one before the first block.
    pub fn push_blank(&mut self) {
        if !self.output.is_empty() && !self.last_blank {
            self.output.push(String::new());
            self.last_blank = true;
        }
    }

    /// Emits romanization, source text and a trailing separator.
    pub fn push_line(&mut self, line: RomanizedLine) {
        self.output.push(line.romanization.clone());
        self.output.push(line.text.clone());
        self.output.push(String::new());
        self.last_blank = true;
        self.lines.push(line);
    }

    pub fn finish(self) -> Transcript {
        let rendered = self.output.join("\n").trim().to_string();
        Transcript {
            language: self.language,
            lines: self.lines,
            rendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(romanization: &str, text: &str) -> RomanizedLine {
        RomanizedLine {
            romanization: romanization.into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_single_block() {
        let mut asm = LineAssembler::new(Language::Mandarin);
        asm.push_line(line("nǐ hǎo", "你好"));
        let t = asm.finish();
        assert_eq!(t.as_str(), "nǐ hǎo\n你好");
        assert_eq!(t.lines().len(), 1);
    }

    #[test]
    fn test_blocks_separated_by_one_blank() {
        let mut asm = LineAssembler::new(Language::Mandarin);
        asm.push_line(line("nǐ hǎo", "你好"));
        asm.push_blank();
        asm.push_blank();
        asm.push_line(line("zài jiàn", "再见"));
        let t = asm.finish();
        assert_eq!(t.as_str(), "nǐ hǎo\n你好\n\nzài jiàn\n再见");
        assert!(!t.as_str().contains("\n\n\n"));
    }

    #[test]
    fn test_leading_blank_ignored() {
        let mut asm = LineAssembler::new(Language::Cantonese);
        asm.push_blank();
        asm.push_line(line("nei5 hou2", "你好"));
        assert_eq!(asm.finish().as_str(), "nei5 hou2\n你好");
    }

    #[test]
    fn test_empty() {
        let t = LineAssembler::new(Language::Mandarin).finish();
        assert!(t.is_empty());
        assert_eq!(t.as_str(), "");
        assert_eq!(t.to_string(), "");
    }

    #[test]
    fn test_serialize_shape() {
        let mut asm = LineAssembler::new(Language::Cantonese);
        asm.push_line(line("nei5 hou2", "你好"));
        let json = serde_json::to_value(asm.finish()).unwrap();
        assert_eq!(json["language"], "cantonese");
        assert_eq!(json["lines"][0]["romanization"], "nei5 hou2");
        assert_eq!(json["lines"][0]["text"], "你好");
        assert!(json.get("rendered").is_none());
    }
}
