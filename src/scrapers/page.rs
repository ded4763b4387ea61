//! Article page scraping.
//!
//! News APIs often truncate article bodies, so the fetcher downloads each
//! article page and keeps its visible text. Anything inside `<script>` or
//! `<style>` is dropped, every text line is trimmed and blank lines are
//! removed.

use reqwest::StatusCode;
use scraper::Html;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Per-request timeout for page downloads.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

/// Downloads article pages and extracts their visible text.
#[derive(Debug, Clone)]
pub struct PageScraper {
    client: reqwest::Client,
}

impl PageScraper {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder().timeout(PAGE_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Visible text of the page at `url`, or `""` on any failure.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract_content(&self, url: &str) -> String {
        match self.fetch_text(url).await {
            Ok(text) => {
                debug!(bytes = text.len(), "Extracted page text");
                text
            }
            Err(e) => {
                warn!(error = %e, "Page scrape failed");
                String::new()
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "Page returned non-200 status");
            return Ok(String::new());
        }
        let body = response.text().await?;
        Ok(visible_text(&body))
    }
}

/// Text content of an HTML document, one trimmed non-empty line per entry.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Robots fold laundry</title>
    <style>body { color: red; }</style>
    <script>var tracking = "ignore me";</script>
  </head>
  <body>
    <h1>  Robots fold laundry  </h1>
    <!-- a comment -->
    <p>Researchers trained a policy
       on 10,000 demonstrations.</p>
    <script type="application/ld+json">{"headline": "hidden"}</script>
  </body>
</html>"#;

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let text = visible_text(PAGE);
        assert_eq!(
            text,
            "Robots fold laundry\nRobots fold laundry\nResearchers trained a policy\non 10,000 demonstrations."
        );
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
        assert!(!text.contains("comment"));
    }

    #[tokio::test]
    async fn test_extract_content_from_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/story");
                then.status(200).header("content-type", "text/html").body(PAGE);
            })
            .await;

        let scraper = PageScraper::new().unwrap();
        let text = scraper.extract_content(&server.url("/story")).await;

        mock.assert_async().await;
        assert!(text.starts_with("Robots fold laundry"));
    }

    #[tokio::test]
    async fn test_extract_content_non_200_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone");
                then.status(404).body("<p>not found</p>");
            })
            .await;

        let scraper = PageScraper::new().unwrap();
        assert_eq!(scraper.extract_content(&server.url("/gone")).await, "");
    }

    #[tokio::test]
    async fn test_extract_content_transport_error_is_empty() {
        let scraper = PageScraper::new().unwrap();
        assert_eq!(scraper.extract_content("http://127.0.0.1:1/unreachable").await, "");
    }
}
