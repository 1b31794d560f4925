//! Genius.com lyrics source.
//!
//! Searches the public multi-search endpoint, takes the first song hit and
//! scrapes the lyrics containers from the song page.

use super::{non_empty, LyricsSource, SourcedLyrics};
use crate::error::{Error, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://genius.com";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CONTAINER_MARKER: &str = r#"data-lyrics-container="true""#;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    url: String,
}

/// Lyrics from genius.com, found by free-text song query.
#[derive(Debug, Clone)]
pub struct GeniusSource {
    client: Client,
    base_url: String,
}

impl GeniusSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the search at another host, e.g. a local mirror.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}/api/search/multi", self.base_url);
        let response: SearchResponse = self
            .client
            .get(url)
            .query(&[("q", query)])
            .header(ACCEPT, "application/json")
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(request_failed)?;

        first_song_url(response)
            .ok_or_else(|| Error::SourceUnavailable(format!("no song found for {query:?}")))
    }

    fn download(&self, url: &str) -> Result<String> {
        let html = self
            .client
            .get(url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(request_failed)?;
        Ok(html)
    }
}

/// Transport and HTTP status failures mean the provider could not deliver.
fn request_failed(e: reqwest::Error) -> Error {
    tracing::warn!(error = %e, "genius request failed");
    Error::SourceUnavailable(format!("genius request failed: {e}"))
}

impl LyricsSource for GeniusSource {
    fn fetch(&self, query: &str) -> Result<SourcedLyrics> {
        tracing::info!(query, "searching genius");
        let song_url = self.search(query)?;
        tracing::info!(url = %song_url, "found song page");

        let html = self.download(&song_url)?;
        let text = extract_lyrics(&html);
        tracing::debug!(chars = text.chars().count(), "extracted lyrics");

        non_empty(SourcedLyrics {
            text,
            origin: song_url,
            method: "genius-direct-scrape",
        })
    }
}

fn first_song_url(response: SearchResponse) -> Option<String> {
    response
        .response
        .sections
        .into_iter()
        .filter(|section| section.kind == "song")
        .find_map(|section| section.hits.into_iter().next())
        .map(|hit| hit.result.url)
}

// ============================================================================
// HTML extraction
// ============================================================================

static RE_DIV_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").unwrap());

static RE_BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static RE_CLOSE_DIV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div>").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static RE_NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:x([0-9a-fA-F]+)|([0-9]+));").unwrap());

/// Extracts the text of every lyrics container in a Genius song page.
///
/// Line breaks and closing `div`s become newlines; all other markup is
/// dropped. Returns an empty string when the page has no containers.
pub fn extract_lyrics(html: &str) -> String {
    let mut lyrics = String::new();

    for inner in lyrics_containers(html) {
        let text = RE_BR.replace_all(inner, "\n");
        let text = RE_CLOSE_DIV.replace_all(&text, "\n");
        let text = RE_TAG.replace_all(&text, "");
        lyrics.push_str(decode_entities(&text).trim());
        lyrics.push('\n');
    }

    lyrics.trim().to_string()
}

/// Inner HTML of each element carrying the lyrics-container attribute.
fn lyrics_containers(html: &str) -> Vec<&str> {
    let mut containers = Vec::new();
    let mut cursor = 0;

    while let Some(found) = html[cursor..].find(CONTAINER_MARKER) {
        let marker = cursor + found;
        let Some(open_end) = html[marker..].find('>').map(|i| marker + i + 1) else {
            break;
        };

        // Walk nested divs until the container's own closing tag.
        let mut depth = 1usize;
        let mut close_start = html.len();
        let mut next_cursor = html.len();
        for tag in RE_DIV_TAG.captures_iter(&html[open_end..]) {
            let Some(m) = tag.get(0) else { continue };
            if tag.get(1).is_some_and(|slash| !slash.as_str().is_empty()) {
                depth -= 1;
                if depth == 0 {
                    close_start = open_end + m.start();
                    next_cursor = open_end + m.end();
                    break;
                }
            } else {
                depth += 1;
            }
        }

        containers.push(&html[open_end..close_start]);
        cursor = next_cursor;
    }

    containers
}

fn decode_entities(text: &str) -> String {
    let text = RE_NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
