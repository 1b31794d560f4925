//! Async API for non-blocking lyrics processing.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! hanlyric = { version = "0.1", features = ["async"] }
//! ```
//!
//! The tests below are part of this module and only build with
//! `cargo test --features async`.

use crate::error::{Error, Result};
use crate::{Language, Pipeline};
use std::sync::Arc;

fn join_error(err: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(err.to_string()))
}

/// Asynchronously processes lyrics with a shared pipeline.
///
/// The pipeline is CPU-bound, so it runs on the blocking thread pool.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> hanlyric::Result<()> {
/// use std::sync::Arc;
/// use hanlyric::{Language, Pipeline};
///
/// let pipeline = Arc::new(Pipeline::for_language(Language::Mandarin)?);
/// let text = hanlyric::async_api::process(pipeline, "月亮代表我的心".into()).await?;
/// println!("{}", text);
/// # Ok(())
/// # }
/// ```
pub async fn process(pipeline: Arc<Pipeline>, raw: String) -> Result<String> {
    tokio::task::spawn_blocking(move || pipeline.process(&raw))
        .await
        .map_err(join_error)
}

/// Asynchronously builds a pipeline for `language` and processes `raw`.
pub async fn process_lyrics(raw: String, language: Language) -> Result<String> {
    tokio::task::spawn_blocking(move || crate::process_lyrics(&raw, language))
        .await
        .map_err(join_error)?
}

// Run with `cargo test --features async`.
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_shared_pipeline() {
        let pipeline = Arc::new(Pipeline::for_language(Language::Cantonese).unwrap());
        let a = process(pipeline.clone(), "你好".into());
        let b = process(pipeline, "再见".into());
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a.unwrap(), "nei5 hou2\n你好");
        assert_eq!(b.unwrap(), "zoi3 gin3\n再见");
    }

    #[tokio::test]
    async fn test_process_lyrics() {
        let out = process_lyrics("[Intro]".into(), Language::Mandarin)
            .await
            .unwrap();
        assert_eq!(out, "");
    }
}
