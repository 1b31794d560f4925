//! Mandarin romanization (Hanyu Pinyin with tone marks).
//!
//! A line is segmented into words with jieba. Each word is looked up in a
//! phrase table of polyphonic words first and otherwise read character by
//! character, with the particles 地, 得 and 着 read in their neutral tone
//! when they follow the word they attach to. Tone sandhi for 一 and 不 is
//! applied afterwards.

use super::LineRomanizer;
use crate::dictionary::parse_entries;
use crate::error::{Error, Result};
use crate::language::Language;
use jieba_rs::Jieba;
use pinyin::ToPinyin;
use std::collections::HashMap;

const BUILTIN_PHRASES: &str = include_str!("../../data/pinyin_phrases.tsv");

/// Word to syllables table for words whose reading differs from the
/// per-character defaults.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    phrases: HashMap<String, Vec<String>>,
}

impl PhraseTable {
    /// The embedded table of common polyphonic words.
    pub fn builtin() -> Result<Self> {
        Self::from_tsv(BUILTIN_PHRASES)
    }

    /// Parses a `<word>\t<syllables>` table. Syllable count must equal the
    /// word's character count.
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut phrases = HashMap::new();

        for entry in parse_entries(text)? {
            let syllables: Vec<String> = entry
                .value
                .split_whitespace()
                .map(str::to_string)
                .collect();
            if syllables.len() != entry.key.chars().count() {
                return Err(Error::InvalidDictionary {
                    line: entry.line,
                    message: format!(
                        "{} has {} characters but {} syllables",
                        entry.key,
                        entry.key.chars().count(),
                        syllables.len()
                    ),
                });
            }
            phrases.insert(entry.key.to_string(), syllables);
        }

        Ok(Self { phrases })
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.phrases.get(word).map(Vec::as_slice)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// One output token of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// A Han character's reading.
    Syllable {
        pinyin: String,
        source: char,
        /// Taken from the phrase table; sandhi leaves it alone.
        fixed: bool,
    },
    /// Text without a reading, kept verbatim.
    Literal(String),
}

impl Token {
    fn as_str(&self) -> &str {
        match self {
            Token::Syllable { pinyin, .. } => pinyin,
            Token::Literal(text) => text,
        }
    }
}

/// Word-aware pinyin romanizer.
pub struct MandarinRomanizer {
    jieba: Jieba,
    phrases: PhraseTable,
    tone_sandhi: bool,
}

impl MandarinRomanizer {
    /// Romanizer with jieba's default dictionary and the embedded phrase table.
    pub fn new() -> Result<Self> {
        Ok(Self::with_phrases(PhraseTable::builtin()?))
    }

    /// Romanizer with a custom phrase table. Its words are added to the
    /// segmenter so they are never split.
    pub fn with_phrases(phrases: PhraseTable) -> Self {
        let mut jieba = Jieba::new();
        for word in phrases.words() {
            jieba.add_word(word, None, None);
        }
        Self {
            jieba,
            phrases,
            tone_sandhi: true,
        }
    }

    /// Enables or disables 一/不 tone sandhi.
    pub fn with_tone_sandhi(mut self, enabled: bool) -> Self {
        self.tone_sandhi = enabled;
        self
    }

    fn tokenize(&self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut prev_word: Option<&str> = None;

        for word in self.jieba.cut(line, false) {
            if let Some(syllables) = self.phrases.get(word) {
                flush_literal(&mut literal, &mut tokens);
                for (source, pinyin) in word.chars().zip(syllables) {
                    tokens.push(Token::Syllable {
                        pinyin: pinyin.clone(),
                        source,
                        fixed: true,
                    });
                }
                prev_word = Some(word);
                continue;
            }

            for (index, c) in word.chars().enumerate() {
                if c.is_whitespace() {
                    flush_literal(&mut literal, &mut tokens);
                } else if let Some(reading) = c.to_pinyin() {
                    flush_literal(&mut literal, &mut tokens);
                    let pinyin = particle_reading(c, word, index, prev_word)
                        .unwrap_or_else(|| reading.with_tone());
                    tokens.push(Token::Syllable {
                        pinyin: pinyin.to_string(),
                        source: c,
                        fixed: false,
                    });
                } else if c.is_alphanumeric() {
                    literal.push(c);
                } else {
                    flush_literal(&mut literal, &mut tokens);
                    tokens.push(Token::Literal(c.to_string()));
                }
            }

            if !word.trim().is_empty() {
                prev_word = Some(word);
            }
        }
        flush_literal(&mut literal, &mut tokens);

        tokens
    }
}

impl LineRomanizer for MandarinRomanizer {
    fn romanize_line(&self, line: &str) -> String {
        let mut tokens = self.tokenize(line);
        if self.tone_sandhi {
            apply_tone_sandhi(&mut tokens);
        }
        tokens
            .iter()
            .map(Token::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn language(&self) -> Language {
        Language::Mandarin
    }
}

impl std::fmt::Debug for MandarinRomanizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MandarinRomanizer")
            .field("phrases", &self.phrases.len())
            .field("tone_sandhi", &self.tone_sandhi)
            .finish_non_exhaustive()
    }
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

// ============================================================================
// Particles
// ============================================================================

/// Neutral-tone reading for 着, 得 and 地 used as particles.
///
/// A particle either sits inside a segmented word after its host (看着,
/// 笑得) or is cut as a word of its own right after a Han word. Words where
/// the character keeps a full tone (睡着, 获得, 土地) come from the phrase
/// table and never reach this point.
///
/// - 着 becomes zhe and 得 becomes de after any Han host.
/// - 地 becomes de only after an adverbial: a reduplicated pair (慢慢地)
///   or, when standing alone, a host word of two or more characters.
fn particle_reading(
    c: char,
    word: &str,
    index: usize,
    prev_word: Option<&str>,
) -> Option<&'static str> {
    if !matches!(c, '着' | '得' | '地') {
        return None;
    }

    let standalone = index == 0 && word.chars().count() == 1;
    let host: Vec<char> = if index > 0 {
        word.chars().take(index).collect()
    } else if standalone {
        prev_word?.chars().collect()
    } else {
        return None;
    };
    if !host.last().is_some_and(|h| h.to_pinyin().is_some()) {
        return None;
    }

    match c {
        '着' => Some("zhe"),
        '得' => Some("de"),
        _ => {
            let reduplicated = host.len() >= 2 && host[host.len() - 1] == host[host.len() - 2];
            let last_in_word = index + 1 == word.chars().count();
            (last_in_word && (reduplicated || (standalone && host.len() >= 2))).then_some("de")
        }
    }
}

// ============================================================================
// Tone sandhi
// ============================================================================

const NUMERALS: &[char] = &['〇', '零', '一', '二', '三', '四', '五', '六', '七', '八', '九', '十'];

/// Tone number (1-4, 5 for neutral) of a tone-marked syllable.
fn tone_of(syllable: &str) -> u8 {
    for c in syllable.chars() {
        match c {
            'ā' | 'ē' | 'ī' | 'ō' | 'ū' | 'ǖ' => return 1,
            'á' | 'é' | 'í' | 'ó' | 'ú' | 'ǘ' | 'ń' | 'ḿ' => return 2,
            'ǎ' | 'ě' | 'ǐ' | 'ǒ' | 'ǔ' | 'ǚ' | 'ň' => return 3,
            'à' | 'è' | 'ì' | 'ò' | 'ù' | 'ǜ' | 'ǹ' => return 4,
            _ => {}
        }
    }
    5
}

/// Rewrites 不 (bù) and 一 (yī) according to the following syllable.
///
/// - 不 before a fourth tone becomes bú.
/// - 一 keeps yī after 第, inside numbers and at the end of a phrase;
///   otherwise it becomes yí before a fourth tone and yì before any other
///   tone, neutral included.
fn apply_tone_sandhi(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let Token::Syllable {
            source,
            pinyin,
            fixed: false,
        } = &tokens[i]
        else {
            continue;
        };
        let source = *source;
        if !(source == '不' && pinyin == "bù") && !(source == '一' && pinyin == "yī") {
            continue;
        }

        let prev = i
            .checked_sub(1)
            .and_then(|p| match &tokens[p] {
                Token::Syllable { source, .. } => Some(*source),
                Token::Literal(_) => None,
            });
        let next = match tokens.get(i + 1) {
            Some(Token::Syllable { pinyin, source, .. }) => Some((*source, tone_of(pinyin))),
            _ => None,
        };

        let replacement = match (source, next) {
            ('不', Some((_, 4))) => Some("bú"),
            ('一', Some((next_char, tone))) => {
                let ordinal = matches!(prev, Some(p) if p == '第' || NUMERALS.contains(&p));
                if ordinal || NUMERALS.contains(&next_char) {
                    None
                } else if tone == 4 {
                    Some("yí")
                } else {
                    Some("yì")
                }
            }
            _ => None,
        };

        if let Some(replacement) = replacement {
            if let Token::Syllable { pinyin, .. } = &mut tokens[i] {
                *pinyin = replacement.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn romanizer() -> MandarinRomanizer {
        MandarinRomanizer::new().unwrap()
    }

    #[test]
    fn test_moon_line() {
        let r = romanizer();
        assert_eq!(
            r.romanize_line("月亮代表我的心"),
            "yuè liàng dài biǎo wǒ de xīn"
        );
    }

    #[test]
    fn test_latin_run_kept_together() {
        let r = romanizer();
        assert_eq!(r.romanize_line("ABC你好"), "ABC nǐ hǎo");
        assert_eq!(r.romanize_line("I love 你"), "I love nǐ");
    }

    #[test]
    fn test_punctuation_own_token() {
        let r = romanizer();
        assert_eq!(r.romanize_line("你好，再见"), "nǐ hǎo ， zài jiàn");
    }

    #[test]
    fn test_phrase_table() {
        let r = romanizer();
        assert_eq!(r.romanize_line("长大"), "zhǎng dà");
        assert_eq!(r.romanize_line("音乐"), "yīn yuè");
        assert_eq!(r.romanize_line("我觉得"), "wǒ jué de");
    }

    #[test]
    fn test_bu_sandhi() {
        let r = romanizer();
        assert_eq!(r.romanize_line("不要"), "bú yào");
        assert_eq!(r.romanize_line("不好"), "bù hǎo");
    }

    #[test]
    fn test_yi_sandhi() {
        let r = romanizer();
        assert_eq!(r.romanize_line("一个"), "yí gè");
        assert_eq!(r.romanize_line("一天"), "yì tiān");
        assert_eq!(r.romanize_line("第一"), "dì yī");
        assert_eq!(r.romanize_line("一"), "yī");
    }

    #[test]
    fn test_yi_before_neutral_tone() {
        let mut tokens = vec![
            Token::Syllable {
                pinyin: "yī".into(),
                source: '一',
                fixed: false,
            },
            Token::Syllable {
                pinyin: "ge".into(),
                source: '个',
                fixed: false,
            },
        ];
        apply_tone_sandhi(&mut tokens);
        assert_eq!(tokens[0].as_str(), "yì");
    }

    #[test]
    fn test_particle_de_after_reduplication() {
        let r = romanizer();
        assert_eq!(r.romanize_line("慢慢地走"), "màn màn de zǒu");
        assert_eq!(r.romanize_line("轻轻地"), "qīng qīng de");
    }

    #[test]
    fn test_particle_di_kept_in_nouns() {
        let r = romanizer();
        assert_eq!(r.romanize_line("土地"), "tǔ dì");
        assert_eq!(r.romanize_line("地球"), "dì qiú");
        assert_eq!(particle_reading('地', "地", 0, Some("在")), None);
        assert_eq!(particle_reading('地', "地", 0, Some("慢慢")), Some("de"));
        assert_eq!(particle_reading('地', "草地", 1, None), None);
    }

    #[test]
    fn test_particle_zhe() {
        let r = romanizer();
        assert_eq!(r.romanize_line("怀着"), "huái zhe");
        assert_eq!(r.romanize_line("睡着"), "shuì zháo");
        assert_eq!(r.romanize_line("执着"), "zhí zhuó");
        assert_eq!(particle_reading('着', "着", 0, Some("抱")), Some("zhe"));
        assert_eq!(particle_reading('着', "着", 0, Some("，")), None);
        assert_eq!(particle_reading('着', "着", 0, None), None);
    }

    #[test]
    fn test_particle_de_after_verb() {
        let r = romanizer();
        assert_eq!(r.romanize_line("过得"), "guò de");
        assert_eq!(r.romanize_line("获得"), "huò dé");
        assert_eq!(r.romanize_line("得到"), "dé dào");
        assert_eq!(particle_reading('得', "得", 0, Some("笑")), Some("de"));
        assert_eq!(particle_reading('得', "得意", 0, Some("笑")), None);
    }

    #[test]
    fn test_sandhi_can_be_disabled() {
        let r = romanizer().with_tone_sandhi(false);
        assert_eq!(r.romanize_line("不要"), "bù yào");
        assert_eq!(r.romanize_line("一个"), "yī gè");
    }

    #[test]
    fn test_tone_of() {
        assert_eq!(tone_of("mā"), 1);
        assert_eq!(tone_of("má"), 2);
        assert_eq!(tone_of("mǎ"), 3);
        assert_eq!(tone_of("mà"), 4);
        assert_eq!(tone_of("ma"), 5);
        assert_eq!(tone_of("lǜ"), 4);
    }

    #[test]
    fn test_non_chinese_line() {
        let r = romanizer();
        assert_eq!(r.romanize_line("Hello world"), "Hello world");
        assert_eq!(r.romanize_line("♪"), "♪");
    }

    #[test]
    fn test_phrase_table_rejects_mismatch() {
        let err = PhraseTable::from_tsv("长大\tzhǎng\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDictionary { line: 1, .. }));
    }

    #[test]
    fn test_builtin_phrases_load() {
        let table = PhraseTable::builtin().unwrap();
        assert!(table.len() > 100);
        assert_eq!(
            table.get("音乐").map(|s| s.join(" ")),
            Some("yīn yuè".to_string())
        );
    }
}
