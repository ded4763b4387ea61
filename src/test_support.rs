//! Shared fixtures for unit tests.

use crate::api::AskAsync;
use crate::models::{Article, Source};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A summarized article with just the fields the trend and graph code reads.
pub fn article(title: &str, importance: Option<u8>, key_points: &[&str]) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://example.com/{}", crate::utils::slugify_title(title)),
        source: Source {
            name: "example.com".to_string(),
        },
        importance_score: importance,
        key_points: key_points.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

/// An [`AskAsync`] double that answers from a plain function and counts calls.
#[derive(Debug)]
pub struct ScriptedAsk {
    respond: fn(&str) -> Result<String, String>,
    delay_ms: fn(&str) -> u64,
    calls: AtomicUsize,
}

impl ScriptedAsk {
    pub fn new(respond: fn(&str) -> Result<String, String>) -> Self {
        Self {
            respond,
            delay_ms: |_| 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call.
    pub fn failing() -> Self {
        Self::new(|_| Err("connection refused".to_string()))
    }

    pub fn with_delay(mut self, delay_ms: fn(&str) -> u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AskAsync for ScriptedAsk {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = (self.delay_ms)(text);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        (self.respond)(text).map_err(|e| e.into())
    }
}
