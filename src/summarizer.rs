//! Per-article summarization, importance scoring and key-point extraction.
//!
//! Each article is sent to the LLM as a single prompt built from its title,
//! description and content. The model answers with three prefixed lines:
//!
//! ```text
//! SUMMARY: <a few sentences>
//! IMPORTANCE: <1-10>
//! KEY_POINTS: <point one>, <point two>, <point three>
//! ```
//!
//! Parsing is lenient: missing lines keep their defaults and an importance
//! that is not an integer falls back to [`DEFAULT_IMPORTANCE`]. A failed LLM
//! call only affects the article it was made for.

use crate::api::AskAsync;
use crate::models::Article;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

pub const EMPTY_ARTICLE_SUMMARY: &str = "No content available for summarization.";
pub const MISSING_SUMMARY: &str = "Summary not generated.";
pub const DEFAULT_IMPORTANCE: u8 = 5;
pub const MAX_IMPORTANCE: u8 = 10;

/// Build the user prompt for one article.
pub fn build_prompt(article: &Article) -> String {
    format!(
        r#"Analyze this AI news article and provide:
1. A concise 5-9 sentence summary highlighting key innovations and their significance
2. An importance rating from 1 to 10. General background on the field of AI that is easy to find elsewhere rates around 4. A new model, or a model applied to a domain in a novel way, rates 9 or higher because it brings a new perspective to the field.
3. Three specific key points as a comma-separated list

Article to summarize:
Title: {title}
Description: {description}
Content: {content}

Format your response as:
SUMMARY: [insightful summary]
IMPORTANCE: [1-10 score]
KEY_POINTS: [comma-separated list of 3 specific key points]
"#,
        title = article.title,
        description = article.description,
        content = article.content,
    )
}

/// The three fields extracted from an LLM reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    pub summary: String,
    pub importance_score: u8,
    pub key_points: Vec<String>,
}

impl Default for ParsedSummary {
    fn default() -> Self {
        Self {
            summary: MISSING_SUMMARY.to_string(),
            importance_score: DEFAULT_IMPORTANCE,
            key_points: Vec::new(),
        }
    }
}

fn parse_importance(raw: &str) -> u8 {
    match raw.trim().parse::<i64>() {
        Ok(score) => score.clamp(0, i64::from(MAX_IMPORTANCE)) as u8,
        Err(_) => DEFAULT_IMPORTANCE,
    }
}

/// Parse a `SUMMARY:` / `IMPORTANCE:` / `KEY_POINTS:` reply.
///
/// Later lines with the same prefix win. Anything without a known prefix is
/// ignored.
pub fn parse_response(text: &str) -> ParsedSummary {
    let mut parsed = ParsedSummary::default();

    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("SUMMARY:") {
            parsed.summary = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("IMPORTANCE:") {
            parsed.importance_score = parse_importance(rest);
        } else if let Some(rest) = line.strip_prefix("KEY_POINTS:") {
            parsed.key_points = rest
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
    parsed
}

/// Summarizes articles through an [`AskAsync`] client.
#[derive(Debug)]
pub struct Summarizer<A> {
    client: A,
    concurrency: usize,
}

impl<A> Summarizer<A>
where
    A: AskAsync<Response = String>,
{
    /// `concurrency` bounds how many LLM calls are in flight; `0` is treated as `1`.
    pub fn new(client: A, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &A {
        &self.client
    }

    /// Summarize one article. Never fails: errors become placeholder values.
    #[instrument(level = "info", skip_all, fields(url = %article.url))]
    pub async fn summarize(&self, article: Article) -> Article {
        if !article.has_text() {
            debug!("Article has no text; skipping LLM call");
            return article.with_summary(EMPTY_ARTICLE_SUMMARY, 0, Vec::new());
        }

        let prompt = build_prompt(&article);
        match self.client.ask(&prompt).await {
            Ok(reply) => {
                let parsed = parse_response(&reply);
                debug!(
                    importance = parsed.importance_score,
                    key_points = parsed.key_points.len(),
                    reply_preview = %truncate_for_log(&reply, 200),
                    "Parsed LLM reply"
                );
                article.with_summary(parsed.summary, parsed.importance_score, parsed.key_points)
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed; using placeholder");
                article.with_summary(
                    format!("Summary unavailable due to an error: {e}"),
                    DEFAULT_IMPORTANCE,
                    Vec::new(),
                )
            }
        }
    }

    /// Summarize a batch, keeping input order in the output.
    #[instrument(level = "info", skip_all, fields(count = articles.len(), concurrency = self.concurrency))]
    pub async fn summarize_all(&self, articles: Vec<Article>) -> Vec<Article> {
        let summarized: Vec<Article> = stream::iter(articles)
            .map(|article| self.summarize(article))
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(count = summarized.len(), "Summarized articles");
        summarized
    }
}
