//! Perigon news search client.
//!
//! Queries the [Perigon](https://www.goperigon.com) `/v1/all` endpoint for
//! articles matching a free-text query within the last `days` days, then
//! normalizes each record into an [`Article`]. When scraping is enabled each
//! article page is downloaded (one at a time) and its visible text replaces
//! the API's often truncated `content`.
//!
//! # Request
//!
//! ```text
//! GET {base_url}/v1/all?apiKey=…&q=…&from=YYYY-MM-DD&to=YYYY-MM-DD
//!     &sortBy=relevance&language=en&size=N
//! ```
//!
//! # Failure Model
//!
//! [`NewsFetcher::fetch`] never returns an error. Transport failures,
//! non-success statuses and malformed bodies are logged and produce an empty
//! list so the rest of the pipeline can report "no articles".

use crate::models::{Article, Source, UNKNOWN_SOURCE};
use crate::scrapers::page::PageScraper;
use chrono::{Duration, Local, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::error::Error;
use tracing::{error, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.goperigon.com";

/// Timeout for the search request itself.
const SEARCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<PerigonArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerigonArticle {
    title: Option<String>,
    url: Option<String>,
    pub_date: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
    content: Option<String>,
    source: Option<PerigonSource>,
}

#[derive(Debug, Default, Deserialize)]
struct PerigonSource {
    domain: Option<String>,
    name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl PerigonArticle {
    /// Normalize into an [`Article`], preferring `scraped` text over the API content.
    fn into_article(self, scraped: String) -> Article {
        let source_name = self
            .source
            .and_then(|s| non_empty(s.domain).or(non_empty(s.name)))
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        let content = if scraped.is_empty() {
            self.content.unwrap_or_default()
        } else {
            scraped
        };

        Article {
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            published_at: non_empty(self.pub_date)
                .or(self.published_at)
                .unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            content,
            source: Source { name: source_name },
            ..Default::default()
        }
    }
}

/// `(from, to)` dates for a search covering the last `days` days.
pub fn date_range(today: NaiveDate, days: u32) -> (String, String) {
    let start = today - Duration::days(i64::from(days));
    (
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}

/// Searches the news API and normalizes the results.
#[derive(Debug, Clone)]
pub struct NewsFetcher {
    client: reqwest::Client,
    api_key: String,
    endpoint: Url,
    scraper: Option<PageScraper>,
}

impl NewsFetcher {
    /// Create a fetcher; `scrape_content` enables per-article page downloads.
    ///
    /// Fails when `base_url` is not an absolute URL.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        scrape_content: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let base_url = base_url.into();
        let endpoint = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?.join("v1/all")?;
        let client = reqwest::Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        let scraper = if scrape_content {
            Some(PageScraper::new()?)
        } else {
            None
        };
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint,
            scraper,
        })
    }

    /// Fetch up to `count` articles matching `query` from the last `days` days.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, query: &str, days: u32, count: u32) -> Vec<Article> {
        let records = match self.search(query, days, count).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "News search failed");
                return Vec::new();
            }
        };
        info!(count = records.len(), "News search returned articles");

        let articles: Vec<Article> = stream::iter(records)
            .then(|record| async move {
                let scraped = match (&self.scraper, record.url.as_deref()) {
                    (Some(scraper), Some(url)) if !url.is_empty() => {
                        scraper.extract_content(url).await
                    }
                    _ => String::new(),
                };
                record.into_article(scraped)
            })
            .collect()
            .await;

        info!(count = articles.len(), "Normalized news articles");
        articles
    }

    async fn search(
        &self,
        query: &str,
        days: u32,
        count: u32,
    ) -> Result<Vec<PerigonArticle>, Box<dyn Error>> {
        let (from, to) = date_range(Local::now().date_naive(), days);
        let size = count.to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("q", query),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sortBy", "relevance"),
                ("language", "en"),
                ("size", size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("news search returned {status}").into());
        }

        let body = response.json::<SearchResponse>().await?;
        Ok(body.articles)
    }
}
