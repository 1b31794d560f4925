//! Line romanization.
//!
//! Mandarin and Cantonese are two implementations of [`LineRomanizer`]; the
//! shared driver [`romanize_transcript`] walks the text line by line and
//! hands each result to the [`LineAssembler`].

mod cantonese;
mod mandarin;

pub use cantonese::{CantoneseRomanizer, JyutpingDictionary};
pub use mandarin::{MandarinRomanizer, PhraseTable};

use crate::language::Language;
use crate::transcript::{LineAssembler, RomanizedLine, Transcript};

/// Converts one line of Simplified Chinese text into a space-joined
/// romanization. Must be total: characters without a reading pass through.
pub trait LineRomanizer: Send + Sync {
    /// Romanizes a single non-blank, trimmed line.
    fn romanize_line(&self, line: &str) -> String;

    /// The language this romanizer produces.
    fn language(&self) -> Language;
}

/// Romanizes `text` line by line into a [`Transcript`].
pub fn romanize_transcript(text: &str, romanizer: &dyn LineRomanizer) -> Transcript {
    let mut assembler = LineAssembler::new(romanizer.language());

    for line in text.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            assembler.push_blank();
            continue;
        }

        assembler.push_line(RomanizedLine {
            romanization: romanizer.romanize_line(trimmed),
            text: trimmed.to_string(),
        });
    }

    let transcript = assembler.finish();
    tracing::debug!(
        language = %romanizer.language(),
        lines = transcript.lines().len(),
        "romanized lyrics"
    );
    transcript
}

/// Romanizes `text` and returns the transcript as a string.
pub fn romanize(text: &str, romanizer: &dyn LineRomanizer) -> String {
    romanize_transcript(text, romanizer).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upper-cases ASCII; enough to observe the driver's behavior.
    struct Shout;

    impl LineRomanizer for Shout {
        fn romanize_line(&self, line: &str) -> String {
            line.to_ascii_uppercase()
        }

        fn language(&self) -> Language {
            Language::Mandarin
        }
    }

    #[test]
    fn test_three_lines_per_block() {
        let out = romanize("abc\ndef", &Shout);
        assert_eq!(out, "ABC\nabc\n\nDEF\ndef");
    }

    #[test]
    fn test_stanza_break_kept_once() {
        let out = romanize("abc\n\n\n\ndef", &Shout);
        assert_eq!(out, "ABC\nabc\n\nDEF\ndef");
    }

    #[test]
    fn test_lines_trimmed() {
        let out = romanize("   abc  \n\tdef", &Shout);
        assert_eq!(out, "ABC\nabc\n\nDEF\ndef");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(romanize("", &Shout), "");
        assert_eq!(romanize("\n\n  \n", &Shout), "");
    }

    #[test]
    fn test_order_preserved() {
        let t = romanize_transcript("one\ntwo\nthree", &Shout);
        let texts: Vec<_> = t.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }
}
