//! # Cleanup Pipeline
//!
//! Strips structural noise from raw lyrics before they are romanized.
//!
//! ## Pipeline Stages
//!
//! 1. **Stage 1: String Normalization** - Unicode NFC normalization, invisible control character removal
//! 2. **Stage 2: Blank Collapsing** - Whole-blob trim, blank-run collapse, carriage return removal
//! 3. **Stage 3: Line Filtering** - Empty lines, section markers, attribution lines

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Cleanup configuration options
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Enable Stage 1: String normalization
    pub normalize_strings: bool,
    /// Drop lines wrapped entirely in brackets, like `[Verse 1]` or `[Chorus]`
    pub drop_section_markers: bool,
    /// Drop attribution lines starting with `Written by:`
    pub drop_attributions: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            normalize_strings: true,
            drop_section_markers: true,
            drop_attributions: true,
        }
    }
}

impl CleanOptions {
    /// Creates options for minimal cleanup (only string and blank-line normalization)
    pub fn minimal() -> Self {
        Self {
            normalize_strings: true,
            drop_section_markers: false,
            drop_attributions: false,
        }
    }

    /// Keeps section markers such as `[Chorus]` in the output.
    pub fn keep_section_markers(mut self) -> Self {
        self.drop_section_markers = false;
        self
    }

    /// Keeps attribution lines in the output.
    pub fn keep_attributions(mut self) -> Self {
        self.drop_attributions = false;
        self
    }
}

// ============================================================================
// Stage 1: String Normalization
// ============================================================================

/// Stage 1: Normalize raw string
///
/// - Unicode NFC normalization
/// - Invisible control character removal
pub fn stage1_normalize_string(input: &str) -> String {
    input.nfc().filter(|&c| !is_invisible_char(c)).collect()
}

/// Characters scraped pages leak into text that never carry lyric content
fn is_invisible_char(c: char) -> bool {
    matches!(
        c,
        '\0'        // Null
        | '\x0B'    // Vertical Tab
        | '\x0C'    // Form Feed
        | '\u{FEFF}' // BOM
        | '\u{200B}' // Zero-width space
        | '\u{00AD}' // Soft hyphen
    )
}

// ============================================================================
// Stage 2: Blank Collapsing
// ============================================================================

static RE_MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Stage 2: Trim the blob, collapse 3+ newlines to 2, drop carriage returns.
///
/// The collapse runs before carriage returns are removed, so a CRLF blank
/// run is left for stage 3 to discard line by line.
pub fn stage2_collapse_blanks(input: &str) -> String {
    let trimmed = input.trim();
    let collapsed = RE_MULTIPLE_NEWLINES.replace_all(trimmed, "\n\n");
    collapsed.replace('\r', "")
}

// ============================================================================
// Stage 3: Line Filtering
// ============================================================================

static RE_SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[.*\]$").unwrap());

static RE_ATTRIBUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Written by:").unwrap());

/// Stage 3: Drop blank, section-marker and attribution lines.
///
/// Surviving lines are kept as they are and joined with single newlines.
pub fn stage3_filter_lines(input: &str, options: &CleanOptions) -> String {
    input
        .split('\n')
        .filter(|line| keep_line(line, options))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keep_line(line: &str, options: &CleanOptions) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if options.drop_section_markers && is_section_marker(trimmed) {
        return false;
    }
    if options.drop_attributions && is_attribution(trimmed) {
        return false;
    }
    true
}

/// Returns true for annotation lines like `[Verse 1]` or `[副歌]`.
pub fn is_section_marker(line: &str) -> bool {
    RE_SECTION_MARKER.is_match(line.trim())
}

/// Returns true for credit lines like `Written by: Someone`.
pub fn is_attribution(line: &str) -> bool {
    RE_ATTRIBUTION.is_match(line.trim())
}

// ============================================================================
// Main Pipeline
// ============================================================================

/// Run the full cleanup pipeline on raw lyrics
///
/// Never fails. Input made entirely of noise yields an empty string.
///
/// # Example
///
/// ```
/// use hanlyric::cleanup::{clean_with_options, CleanOptions};
///
/// let raw = "[Verse 1]\n你好\n\n\n\n再见\nWritten by: X";
/// let clean = clean_with_options(raw, &CleanOptions::default());
/// assert_eq!(clean, "你好\n再见");
/// ```
pub fn clean_with_options(input: &str, options: &CleanOptions) -> String {
    let mut result = input.to_string();

    // Stage 1: String normalization
    if options.normalize_strings {
        result = stage1_normalize_string(&result);
    }

    // Stage 2: Blank collapsing
    result = stage2_collapse_blanks(&result);

    // Stage 3: Line filtering
    let result = stage3_filter_lines(&result, options);

    tracing::debug!(
        input_bytes = input.len(),
        lines = result.lines().count(),
        "cleaned lyrics"
    );
    result
}

/// Run cleanup with default options
pub fn clean(input: &str) -> String {
    clean_with_options(input, &CleanOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_char_removal() {
        let input = "\u{FEFF}月亮\u{200B}代表\x0B我的心";
        let result = stage1_normalize_string(input);
        assert_eq!(result, "月亮代表我的心");
    }

    #[test]
    fn test_nfc_composition() {
        // "e" + combining acute -> precomposed "é"
        let result = stage1_normalize_string("Caf\u{0065}\u{0301}");
        assert_eq!(result, "Caf\u{00E9}");
    }

    #[test]
    fn test_multiple_newlines() {
        let input = "第一句\n\n\n\n\n第二句";
        let result = stage2_collapse_blanks(input);
        assert!(!result.contains("\n\n\n"));
        assert_eq!(result, "第一句\n\n第二句");
    }

    #[test]
    fn test_carriage_return_removal() {
        let result = stage2_collapse_blanks("你好\r\n再见\r\n");
        assert_eq!(result, "你好\n再见");
    }

    #[test]
    fn test_section_marker_removal() {
        let input = "[Verse 1]\n你好\n  [Chorus]  \n再见";
        let result = stage3_filter_lines(input, &CleanOptions::default());
        assert_eq!(result, "你好\n再见");
    }

    #[test]
    fn test_partial_brackets_kept() {
        let input = "[Intro] 你好\n再见 [x2]";
        let result = clean(input);
        assert_eq!(result, input);
    }

    #[test]
    fn test_attribution_removal_case_insensitive() {
        let input = "你好\nWritten by: Someone\nWRITTEN BY: Other\nwritten by:x";
        let result = clean(input);
        assert_eq!(result, "你好");
    }

    #[test]
    fn test_attribution_only_at_line_start() {
        let input = "这首歌 Written by: me";
        assert_eq!(clean(input), input);
    }

    #[test]
    fn test_verse_markers_and_credits() {
        let input = "[Verse 1]\n你好\n\n\n\n再见\nWritten by: X";
        assert_eq!(clean(input), "你好\n再见");
    }

    #[test]
    fn test_blank_lines_dropped() {
        let input = "  \n第一句\n   \n\t\n第二句\n\n";
        assert_eq!(clean(input), "第一句\n第二句");
    }

    #[test]
    fn test_surviving_lines_not_trimmed() {
        let input = "第一句\n  第二句  \n第三句";
        assert_eq!(clean(input), "第一句\n  第二句  \n第三句");
    }

    #[test]
    fn test_all_noise_yields_empty() {
        let input = "[Intro]\n\n\nWritten by: X\n[Outro]\n   ";
        assert_eq!(clean(input), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_minimal_keeps_markers() {
        let input = "[Chorus]\n你好\nWritten by: X";
        let result = clean_with_options(input, &CleanOptions::minimal());
        assert_eq!(result, "[Chorus]\n你好\nWritten by: X");
    }

    #[test]
    fn test_builder_toggles() {
        let options = CleanOptions::default().keep_section_markers();
        assert!(!options.drop_section_markers);
        assert!(options.drop_attributions);

        let options = CleanOptions::default().keep_attributions();
        assert!(options.drop_section_markers);
        assert!(!options.drop_attributions);
    }

    #[test]
    fn test_no_metadata_leakage() {
        let input = "[Pre-Chorus]\n我爱你\n[歌词]\nWritten by: A & B\n你爱我\n[]";
        let result = clean(input);
        for line in result.lines() {
            assert!(!is_section_marker(line), "leaked marker: {line}");
            assert!(!is_attribution(line), "leaked attribution: {line}");
        }
        assert_eq!(result, "我爱你\n你爱我");
    }

    #[test]
    fn test_output_never_has_blank_lines() {
        let input = "a\n\n\n\n\nb\n\nc\r\n\r\n\r\n\r\nd";
        let result = clean(input);
        assert!(!result.contains("\n\n"));
        assert!(result.lines().all(|l| !l.trim().is_empty()));
    }
}
