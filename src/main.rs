//! # AI Trend Tracker
//!
//! Searches a news API for recent AI articles, summarizes and scores each one
//! through an LLM, extracts trending topics across the batch, links topics,
//! articles and key points in a knowledge graph, and writes the results as
//! JSON, a Markdown dashboard report and an interactive graph page.
//!
//! ## Usage
//!
//! ```sh
//! PERIGON_API_KEY=... ai_trend_tracker -j ./json -m ./markdown -p generative
//! ```
//!
//! ## Architecture
//!
//! 1. **Searching**: Query the news API and optionally scrape each article page
//! 2. **Summarizing**: Send each article to the LLM (bounded concurrency, order kept)
//! 3. **Analyzing**: Rank trending topics and top articles, write the executive digest
//! 4. **Graphing**: Build the topic / article / key-point knowledge graph
//! 5. **Output**: Write the JSON digest, graph page, Markdown report and index

use awful_aj::{config, config_dir, template};
use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod digest;
mod graph;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarizer;
#[cfg(test)]
mod test_support;
mod trends;
mod utils;

use api::backoff_client;
use cli::Cli;
use digest::DigestWriter;
use outputs::markdown::ReportView;
use outputs::{indexes, json, markdown, network};
use pipeline::SearchRequest;
use scrapers::perigon::NewsFetcher;
use summarizer::Summarizer;
use utils::{ensure_writable_dir, report_slug};

/// awful_aj template holding the per-article summarization system prompt.
const SUMMARY_TEMPLATE: &str = "ai_news_summarizer";
/// awful_aj template holding the executive digest system prompt.
const DIGEST_TEMPLATE: &str = "ai_trends_digest";

fn resolve_config_path(explicit: Option<&str>) -> Result<String, Box<dyn Error>> {
    if let Some(path) = explicit {
        return Ok(path.to_string());
    }
    let conf_file = config_dir()?.join("config.yaml");
    let path = conf_file.to_str().ok_or("Not a valid config filename")?;
    Ok(path.to_string())
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ai_trend_tracker starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.query, ?args.preset, "Parsed CLI arguments");

    // Early check: output dirs must be writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Load config & templates ----
    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = config::load_config(&config_path)
        .map_err(|e| format!("failed to load config {config_path}: {e}"))?;
    info!(config_path = %config_path, "Loaded configuration");

    let summary_template = template::load_template(SUMMARY_TEMPLATE).await?;
    let digest_template = template::load_template(DIGEST_TEMPLATE).await?;
    info!(summary = SUMMARY_TEMPLATE, digest = DIGEST_TEMPLATE, "Loaded templates");

    let fetcher = NewsFetcher::new(
        &args.perigon_api_key,
        &args.perigon_base_url,
        !args.no_scrape,
    )?;
    let summarizer = Summarizer::new(
        backoff_client(&config, &summary_template),
        args.concurrency,
    );
    let digest_writer = DigestWriter::new(backoff_client(&config, &digest_template));

    // ---- Run pipeline ----
    let request = SearchRequest {
        query_terms: args.query_terms(),
        days: args.days,
        article_count: args.article_count,
        preferred_sources: args.preferred_sources.clone(),
        save_dir: args
            .save_search
            .then(|| PathBuf::from(&args.searches_dir)),
    };
    let digest = pipeline::run(&request, &fetcher, &summarizer, &digest_writer).await;

    if let Err(e) = json::write_digest(&digest, &args.json_output_dir).await {
        error!(error = %e, "Failed to write digest JSON");
    }

    // ---- Knowledge graph ----
    let stem = report_slug(&digest.query_parameters.query);
    let mut graph_stats = None;
    let mut graph_page = None;
    if !digest.articles.is_empty() {
        let graph = graph::build_knowledge_graph(&digest.articles, &digest.trends);
        graph_stats = Some(graph.stats());

        let dir = json::run_dir(&args.json_output_dir, &digest);
        let title = format!("AI News Knowledge Graph: {}", digest.query_parameters.query);
        match network::write_graph(&graph, &dir, &stem, &title).await {
            Ok(path) => graph_page = Some(path.display().to_string()),
            Err(e) => error!(error = %e, "Failed to write knowledge graph"),
        }
    }

    // ---- Markdown output ----
    let view = ReportView {
        selected_sources: args.show_sources.clone(),
        min_importance: args.min_importance,
    };
    let md = markdown::digest_to_markdown(&digest, &view, graph_stats.as_ref(), graph_page.as_deref());
    let markdown_filename = format!("{}_{}.md", digest.local_date, stem);
    let output_markdown_path = format!("{}/{}", args.markdown_output_dir, markdown_filename);

    if Path::new(&output_markdown_path).exists() {
        warn!(path = %output_markdown_path, "Replacing an earlier report for the same query slug");
    }
    info!(path = %output_markdown_path, "Writing Markdown");
    if let Err(e) = tokio::fs::write(&output_markdown_path, md).await {
        error!(path = %output_markdown_path, error = %e, "Failed writing Markdown");
    } else {
        info!(path = %output_markdown_path, "Wrote report Markdown");
        if let Err(e) =
            indexes::update_report_index(&args.markdown_output_dir, &digest, &markdown_filename)
                .await
        {
            error!(error = %e, "Failed to update reports.md index");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = digest.total_articles,
        error = ?digest.error,
        "Execution complete"
    );

    Ok(())
}
