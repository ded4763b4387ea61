//! Executive digest: one LLM-written overview across all summarized articles.

use crate::api::AskAsync;
use crate::models::Article;
use crate::trends::ScoreTable;
use itertools::Itertools;
use std::cmp::Reverse;
use std::fmt::Write;
use tracing::{info, instrument, warn};

pub const NO_ARTICLES_DIGEST: &str = "No articles available to summarize.";
pub const DIGEST_UNAVAILABLE: &str = "Unable to generate a combined summary at this time.";
const NO_TOPIC_HINTS: &str = "No clear trending topics identified.";

const MAX_DIGEST_ARTICLES: usize = 15;
const MAX_TOPIC_HINTS: usize = 8;

/// Most frequent key points (lowercased, trimmed) across all articles.
///
/// Unlike [`crate::trends::analyze_trends`] this counts whole key points only;
/// it is a hint for the digest prompt, not a ranking.
pub fn key_point_topics(articles: &[Article]) -> Vec<String> {
    let mut counts = ScoreTable::default();
    for point in articles.iter().flat_map(|a| &a.key_points) {
        counts.add(&point.trim().to_lowercase(), 1);
    }
    counts
        .ranked()
        .into_iter()
        .take(MAX_TOPIC_HINTS)
        .map(|(topic, _)| topic)
        .collect()
}

/// Build the digest prompt from the most important articles.
pub fn build_digest_prompt(articles: &[Article]) -> String {
    let ranked = articles
        .iter()
        .sorted_by_key(|a| Reverse(a.importance()))
        .collect::<Vec<_>>();

    let mut blocks = String::new();
    for (idx, article) in ranked.iter().take(MAX_DIGEST_ARTICLES).enumerate() {
        let _ = writeln!(
            blocks,
            "Article {} [Importance: {}/10]\nTitle: {}\nSummary: {}",
            idx + 1,
            article.importance(),
            article.display_title(),
            article.summary.as_deref().unwrap_or("No summary available"),
        );
        if !article.key_points.is_empty() {
            let _ = writeln!(blocks, "Key Points: {}", article.key_points.join(", "));
        }
        blocks.push('\n');
    }

    let hints = key_point_topics(articles);
    let topics = if hints.is_empty() {
        NO_TOPIC_HINTS.to_string()
    } else {
        hints.join(", ")
    };

    format!(
        r#"Synthesize the following articles into a coherent, non-redundant executive summary of recent AI developments for technology professionals.

ARTICLES:
{blocks}
TRENDING TOPICS:
{topics}

INSTRUCTIONS:
1. Open with a brief high-level overview of the current state of AI based on these articles.
2. Focus on the most important developments (articles with higher importance scores).
3. Group related technologies and themes rather than summarizing each article individually.
4. Highlight genuine breakthroughs, practical applications, and emerging trends.
5. Mention specific companies, researchers, or models only if they make significant contributions.
6. Identify patterns or contradictions across articles that reveal where the industry is heading.
7. Close with 1-2 sentences on what these developments suggest about the near future of AI.

Write 3-4 cohesive paragraphs. Do not use bullet points, numbered lists, or article references.
"#
    )
}

/// Writes the executive digest through an [`AskAsync`] client.
#[derive(Debug)]
pub struct DigestWriter<A> {
    client: A,
}

impl<A> DigestWriter<A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(client: A) -> Self {
        Self { client }
    }

    /// Produce the digest text. Never fails: errors become [`DIGEST_UNAVAILABLE`].
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn write(&self, articles: &[Article]) -> String {
        if articles.is_empty() {
            return NO_ARTICLES_DIGEST.to_string();
        }

        match self.client.ask(&build_digest_prompt(articles)).await {
            Ok(reply) if !reply.trim().is_empty() => {
                info!(chars = reply.len(), "Generated executive digest");
                reply.trim().to_string()
            }
            Ok(_) => {
                warn!("LLM returned an empty digest");
                DIGEST_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Digest generation failed");
                DIGEST_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedAsk, article};

    #[test]
    fn test_key_point_topics_counts_whole_points() {
        let articles = vec![
            article("a", Some(3), &["Open weights", "agents"]),
            article("b", Some(7), &["open weights ", "robotics"]),
        ];
        assert_eq!(key_point_topics(&articles), vec!["open weights", "agents", "robotics"]);
    }

    #[test]
    fn test_prompt_orders_by_importance() {
        let mut low = article("Low impact story", Some(2), &[]);
        low.summary = Some("meh".to_string());
        let mut high = article("Big launch", Some(9), &["new model"]);
        high.summary = Some("wow".to_string());

        let prompt = build_digest_prompt(&[low, high]);
        let big = prompt.find("Title: Big launch").unwrap();
        let small = prompt.find("Title: Low impact story").unwrap();
        assert!(big < small);
        assert!(prompt.contains("Article 1 [Importance: 9/10]"));
        assert!(prompt.contains("Key Points: new model"));
        assert!(prompt.contains("TRENDING TOPICS:\nnew model"));
    }

    #[test]
    fn test_prompt_caps_article_count() {
        let articles = (0..20)
            .map(|i| article(&format!("Story {i}"), Some(5), &[]))
            .collect::<Vec<_>>();
        let prompt = build_digest_prompt(&articles);
        assert!(prompt.contains("Article 15 ["));
        assert!(!prompt.contains("Article 16 ["));
        assert!(prompt.contains(NO_TOPIC_HINTS));
    }

    #[tokio::test]
    async fn test_write_digest() {
        let writer = DigestWriter::new(ScriptedAsk::new(|_| Ok("  AI moved fast this week.\n".to_string())));
        let text = writer.write(&[article("Story", Some(5), &[])]).await;
        assert_eq!(text, "AI moved fast this week.");
    }

    #[tokio::test]
    async fn test_write_digest_fallbacks() {
        let writer = DigestWriter::new(ScriptedAsk::failing());
        assert_eq!(writer.write(&[article("Story", Some(5), &[])]).await, DIGEST_UNAVAILABLE);
        assert_eq!(writer.write(&[]).await, NO_ARTICLES_DIGEST);
        assert_eq!(writer.client.calls(), 1);
    }
}
