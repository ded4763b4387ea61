//! Data models for news articles, trend reports and pipeline results.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A news article as fetched, later enriched with LLM output
//! - [`TrendReport`]: Cross-article trending topics and importance statistics
//! - [`NewsDigest`]: The full result of one search, handed to the outputs
//! - [`SavedSearch`]: The optional raw dump of a single search
//!
//! Field names on the wire follow the news API (`publishedAt`), everything
//! else is snake_case.

use serde::{Deserialize, Serialize};

/// Placeholder used when a source name is missing from the news API.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Placeholder used when rendering an article without a title.
pub const UNTITLED: &str = "Untitled";

/// The outlet an article was published by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    pub name: String,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            name: UNKNOWN_SOURCE.to_string(),
        }
    }
}

/// A news article.
///
/// Created by the fetcher with the summary fields unset, enriched once by the
/// summarizer and read-only afterwards. Missing strings default to `""`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// Canonical URL of the article.
    pub url: String,
    /// Publication timestamp as reported by the news API (usually ISO 8601).
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    /// Short description or lede.
    pub description: String,
    /// Body text, scraped from the page when possible.
    pub content: String,
    /// The publishing outlet.
    pub source: Source,
    /// LLM summary, set by the summarizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// LLM importance rating in `0..=10`, set by the summarizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance_score: Option<u8>,
    /// Short key-point phrases in the order the LLM produced them.
    pub key_points: Vec<String>,
}

impl Article {
    /// Importance used for ranking; unscored articles rank as 0.
    pub fn importance(&self) -> u8 {
        self.importance_score.unwrap_or(0)
    }

    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Whether there is anything worth sending to the LLM.
    pub fn has_text(&self) -> bool {
        [&self.title, &self.description, &self.content]
            .iter()
            .any(|s| !s.trim().is_empty())
    }

    /// Attach summarizer output.
    pub fn with_summary(
        mut self,
        summary: impl Into<String>,
        importance_score: u8,
        key_points: Vec<String>,
    ) -> Self {
        self.summary = Some(summary.into());
        self.importance_score = Some(importance_score);
        self.key_points = key_points;
        self
    }
}

/// An entry of [`TrendReport::top_articles`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopArticle {
    pub title: String,
    pub score: u8,
}

/// Trending topics and importance statistics across a batch of articles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TrendReport {
    /// At most five topics, highest score first.
    pub trending_topics: Vec<String>,
    /// At most three articles, highest importance first.
    pub top_articles: Vec<TopArticle>,
    /// Mean importance over scored articles, `0.0` when there are none.
    pub average_importance: f64,
}

impl TrendReport {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.trending_topics.is_empty() && self.top_articles.is_empty()
    }
}

/// The parameters a [`NewsDigest`] was produced with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QueryParameters {
    pub query: String,
    pub days: u32,
    pub article_count: u32,
    /// Empty means all sources.
    pub preferred_sources: Vec<String>,
}

/// The result of one pipeline run.
///
/// This is the only state handed from the pipeline to the outputs; nothing is
/// cached between runs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsDigest {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the run in `HH:MM:SS` format.
    pub local_time: String,
    /// Summarized articles, highest importance first.
    pub articles: Vec<Article>,
    pub trends: TrendReport,
    /// Executive summary across all articles.
    pub combined_summary: String,
    pub total_articles: usize,
    pub query_parameters: QueryParameters,
    /// Set when the run produced nothing to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Raw fetch results persisted when the user asks to keep a search.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedSearch {
    pub query: String,
    pub search_date: String,
    pub articles: Vec<Article>,
}
