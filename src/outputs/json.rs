//! JSON output: the per-run digest and the optional raw search dump.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── generative-ai-or-llm-or-gpt-or.json
//!     ├── generative-ai-or-llm-or-gpt-or.graph.json
//!     └── generative-ai-or-llm-or-gpt-or.graph.html
//!
//! searches_dir/
//! └── 2025-05-06_Generative AI OR LLM OR GPT OR.json
//! ```

use crate::models::{Article, NewsDigest, SavedSearch};
use crate::utils::{report_slug, sanitize_query_fragment};
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Filename fragment used when a search had no user query.
const GENERAL_QUERY_FRAGMENT: &str = "general_ai_news";

/// Directory for one run's JSON artifacts: `{json_output_dir}/{date}`.
pub fn run_dir(json_output_dir: &str, digest: &NewsDigest) -> PathBuf {
    Path::new(json_output_dir).join(&digest.local_date)
}

/// Write a [`NewsDigest`] to `{json_output_dir}/{date}/{query-slug}.json`.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(
    digest: &NewsDigest,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    let dir = run_dir(json_output_dir, digest);
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = dir.join(format!("{}.json", report_slug(&digest.query_parameters.query)));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote digest JSON");
    Ok(path)
}

/// `{search_date}_{sanitized query fragment}.json`.
pub fn saved_search_filename(search_date: &str, query_terms: Option<&str>) -> String {
    let fragment = query_terms
        .filter(|q| !q.is_empty())
        .map(sanitize_query_fragment)
        .unwrap_or_else(|| GENERAL_QUERY_FRAGMENT.to_string());
    format!("{search_date}_{fragment}.json")
}

/// Persist the raw results of one search as a [`SavedSearch`].
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), count = articles.len()))]
pub async fn write_saved_search(
    dir: &Path,
    query_terms: Option<&str>,
    query: &str,
    articles: &[Article],
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;

    let search_date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let saved = SavedSearch {
        query: query.to_string(),
        search_date: search_date.clone(),
        articles: articles.to_vec(),
    };

    let path = dir.join(saved_search_filename(&search_date, query_terms));
    fs::write(&path, serde_json::to_string_pretty(&saved)?).await?;
    info!(path = %path.display(), "Wrote saved search");
    Ok(path)
}
