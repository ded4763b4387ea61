//! Command-line interface definitions for AI Trend Tracker.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API credentials can also be provided via environment variables.

use crate::scrapers::perigon::DEFAULT_BASE_URL;
use clap::{Parser, ValueEnum};

/// Quick-filter presets, each standing for a ready-made query.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// All AI news
    All,
    /// Generative AI and LLMs
    Generative,
    /// Ethics, bias and regulation
    Ethics,
    /// Research breakthroughs and new models
    Research,
    /// Business applications and startups
    Business,
}

impl Preset {
    pub fn query(self) -> &'static str {
        match self {
            Preset::All => "Artificial Intelligence OR AI OR machine learning OR LLM",
            Preset::Generative => "Generative AI OR LLM OR GPT OR diffusion model",
            Preset::Ethics => "AI ethics OR AI bias OR AI regulation OR responsible AI",
            Preset::Research => "AI research breakthrough OR new AI model OR AI paper",
            Preset::Business => "AI business application OR enterprise AI OR AI startup",
        }
    }
}

/// Command-line arguments for the AI Trend Tracker application.
///
/// # Examples
///
/// ```sh
/// # Default search over the last week
/// ai_trend_tracker -j ./json -m ./markdown
///
/// # Generative AI preset, 14 days, 20 articles, keep the raw search
/// ai_trend_tracker -j ./json -m ./markdown -p generative -d 14 -n 20 --save-search
///
/// # Only show high-importance articles from two outlets
/// ai_trend_tracker -j ./json -m ./markdown -q "AI agents" \
///     --show-source wired.com --show-source theverge.com --min-importance 7
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search terms; overrides --preset
    #[arg(short, long)]
    pub query: Option<String>,

    /// Quick-filter preset used when no query is given
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,

    /// How many days back to search
    #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub days: u32,

    /// How many articles to request
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(5..=30))]
    pub article_count: u32,

    /// Keep only articles from these sources before summarizing (repeatable)
    #[arg(long = "prefer-source")]
    pub preferred_sources: Vec<String>,

    /// Show only these sources in the report (repeatable)
    #[arg(long = "show-source")]
    pub show_sources: Vec<String>,

    /// Hide articles below this importance in the report
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub min_importance: u8,

    /// Output directory for the JSON digest and graph files
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Perigon news API key
    #[arg(long, env = "PERIGON_API_KEY", hide_env_values = true)]
    pub perigon_api_key: String,

    /// Perigon API base URL
    #[arg(long, env = "PERIGON_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub perigon_base_url: String,

    /// Save the raw search results as JSON
    #[arg(long)]
    pub save_search: bool,

    /// Directory for saved searches
    #[arg(long, default_value = "previous_searches")]
    pub searches_dir: String,

    /// Maximum concurrent summarization requests
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Use the API's article content instead of downloading each page
    #[arg(long)]
    pub no_scrape: bool,
}

impl Cli {
    /// The user's search terms: `--query` if non-blank, otherwise the preset's query.
    pub fn query_terms(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .or_else(|| self.preset.map(|p| p.query().to_string()))
    }
}
