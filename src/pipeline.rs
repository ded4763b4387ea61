//! The search → summarize → analyze pipeline.
//!
//! [`run`] takes a [`SearchRequest`] and returns a [`NewsDigest`]; there is no
//! other state. Steps:
//!
//! 1. Fetch articles from the news API (optionally saving the raw results)
//! 2. Keep only preferred sources, if any were given
//! 3. Summarize every article (bounded concurrency, order preserved)
//! 4. Sort by importance, highest first
//! 5. Extract trends
//! 6. Write the executive digest
//!
//! A run that finds no articles returns early with [`NO_ARTICLES_ERROR`].

use crate::api::AskAsync;
use crate::digest::DigestWriter;
use crate::models::{Article, NewsDigest, QueryParameters};
use crate::outputs::json;
use crate::scrapers::perigon::NewsFetcher;
use crate::summarizer::Summarizer;
use crate::trends::analyze_trends;
use chrono::Local;
use std::cmp::Reverse;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_QUERY: &str = "Artificial Intelligence OR AI OR machine learning OR LLM";
pub const NO_ARTICLES_ERROR: &str = "No articles found matching the criteria.";

/// What to search for and how.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// User query; `None` searches for [`DEFAULT_QUERY`].
    pub query_terms: Option<String>,
    pub days: u32,
    pub article_count: u32,
    /// Exact source names to keep; empty keeps everything.
    pub preferred_sources: Vec<String>,
    /// Directory for the raw search dump; `None` disables saving.
    pub save_dir: Option<PathBuf>,
}

impl SearchRequest {
    pub fn query(&self) -> &str {
        self.query_terms
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_QUERY)
    }

    fn parameters(&self) -> QueryParameters {
        QueryParameters {
            query: self.query().to_string(),
            days: self.days,
            article_count: self.article_count,
            preferred_sources: self.preferred_sources.clone(),
        }
    }
}

/// Keep articles whose source name is one of `preferred`; empty keeps all.
pub fn filter_by_sources(articles: Vec<Article>, preferred: &[String]) -> Vec<Article> {
    if preferred.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| preferred.iter().any(|p| *p == a.source.name))
        .collect()
}

/// Stable sort, highest importance first.
pub fn sort_by_importance(articles: &mut [Article]) {
    articles.sort_by_key(|a| Reverse(a.importance()));
}

/// Run the whole pipeline for one request.
#[instrument(level = "info", skip_all, fields(query = %request.query(), days = request.days, count = request.article_count))]
pub async fn run<S, D>(
    request: &SearchRequest,
    fetcher: &NewsFetcher,
    summarizer: &Summarizer<S>,
    digest_writer: &DigestWriter<D>,
) -> NewsDigest
where
    S: AskAsync<Response = String>,
    D: AskAsync<Response = String>,
{
    let now = Local::now();
    let mut digest = NewsDigest {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        query_parameters: request.parameters(),
        ..Default::default()
    };

    let fetched = fetcher
        .fetch(request.query(), request.days, request.article_count)
        .await;

    if let Some(dir) = &request.save_dir {
        if !fetched.is_empty() {
            match json::write_saved_search(
                dir,
                request.query_terms.as_deref(),
                request.query(),
                &fetched,
            )
            .await
            {
                Ok(path) => info!(path = %path.display(), "Saved search results"),
                Err(e) => error!(error = %e, "Failed to save search results"),
            }
        }
    }

    let articles = filter_by_sources(fetched, &request.preferred_sources);
    if articles.is_empty() {
        warn!("No articles to analyze");
        digest.error = Some(NO_ARTICLES_ERROR.to_string());
        return digest;
    }

    let mut articles = summarizer.summarize_all(articles).await;
    sort_by_importance(&mut articles);

    digest.trends = analyze_trends(&articles);
    digest.combined_summary = digest_writer.write(&articles).await;
    digest.total_articles = articles.len();
    digest.articles = articles;

    info!(
        total = digest.total_articles,
        topics = digest.trends.trending_topics.len(),
        average_importance = digest.trends.average_importance,
        "Pipeline complete"
    );
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedAsk, article};
    use httpmock::prelude::*;
    use serde_json::json;

    fn request(preferred_sources: Vec<String>, save_dir: Option<PathBuf>) -> SearchRequest {
        SearchRequest {
            query_terms: Some("OpenAI models".to_string()),
            days: 7,
            article_count: 10,
            preferred_sources,
            save_dir,
        }
    }

    fn summarizer_reply(prompt: &str) -> Result<String, String> {
        if prompt.contains("Title: OpenAI releases new model") {
            Ok("SUMMARY: Big release.\nIMPORTANCE: 9\nKEY_POINTS: new model release, big improvement".to_string())
        } else {
            Ok("SUMMARY: Small update.\nIMPORTANCE: 4\nKEY_POINTS: incremental update".to_string())
        }
    }

    async fn news_server() -> MockServer {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/all").query_param("q", "OpenAI models");
                then.status(200).json_body(json!({
                    "articles": [
                        {"title": "OpenAI model update", "content": "patch notes",
                         "source": {"domain": "blog.example"}},
                        {"title": "OpenAI releases new model", "content": "launch",
                         "source": {"domain": "news.example"}}
                    ]
                }));
            })
            .await;
        server
    }

    #[test]
    fn test_filter_by_sources() {
        let mut a = article("a", None, &[]);
        a.source.name = "Wired".to_string();
        let b = article("b", None, &[]);

        let kept = filter_by_sources(vec![a.clone(), b.clone()], &["Wired".to_string()]);
        assert_eq!(kept, vec![a.clone()]);
        assert_eq!(filter_by_sources(vec![a, b], &[]).len(), 2);
    }

    #[test]
    fn test_default_query() {
        let mut req = request(vec![], None);
        req.query_terms = Some("  ".to_string());
        assert_eq!(req.query(), DEFAULT_QUERY);
        req.query_terms = None;
        assert_eq!(req.query(), DEFAULT_QUERY);
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let server = news_server().await;
        let fetcher = NewsFetcher::new("key", server.base_url(), false).unwrap();
        let summarizer = Summarizer::new(ScriptedAsk::new(summarizer_reply), 2);
        let writer = DigestWriter::new(ScriptedAsk::new(|_| Ok("Models got better.".to_string())));

        let digest = run(&request(vec![], None), &fetcher, &summarizer, &writer).await;

        assert_eq!(digest.error, None);
        assert_eq!(digest.total_articles, 2);
        assert_eq!(digest.articles[0].title, "OpenAI releases new model");
        assert_eq!(digest.articles[0].importance_score, Some(9));
        assert_eq!(digest.trends.top_articles[0].title, "OpenAI releases new model");
        assert!(digest.trends.trending_topics.contains(&"new model release".to_string()));
        assert_eq!(digest.combined_summary, "Models got better.");
        assert_eq!(digest.query_parameters.query, "OpenAI models");
    }

    #[tokio::test]
    async fn test_run_without_matching_sources_reports_error() {
        let server = news_server().await;
        let fetcher = NewsFetcher::new("key", server.base_url(), false).unwrap();
        let summarizer = Summarizer::new(ScriptedAsk::new(summarizer_reply), 2);
        let writer = DigestWriter::new(ScriptedAsk::failing());

        let digest = run(
            &request(vec!["nowhere.example".to_string()], None),
            &fetcher,
            &summarizer,
            &writer,
        )
        .await;

        assert_eq!(digest.error.as_deref(), Some(NO_ARTICLES_ERROR));
        assert!(digest.articles.is_empty());
        assert!(digest.trends.is_empty());
        assert_eq!(summarizer.client().calls(), 0);
    }

    #[tokio::test]
    async fn test_run_saves_search_results() {
        let server = news_server().await;
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = NewsFetcher::new("key", server.base_url(), false).unwrap();
        let summarizer = Summarizer::new(ScriptedAsk::new(summarizer_reply), 1);
        let writer = DigestWriter::new(ScriptedAsk::failing());

        let digest = run(
            &request(vec!["news.example".to_string()], Some(tmp.path().to_path_buf())),
            &fetcher,
            &summarizer,
            &writer,
        )
        .await;
        assert_eq!(digest.total_articles, 1);

        let saved = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(saved, 1);
    }
}
