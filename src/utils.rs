//! Utility functions for text normalization, string manipulation, and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Text normalization shared by the trend extractor and graph builder
//! - String truncation and slugification for logging, labels and filenames
//! - Query sanitization for saved-search filenames
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Longest query prefix used in generated filenames.
pub const QUERY_FRAGMENT_LEN: usize = 30;

/// Lowercase `text` and strip every character that is neither a word
/// character nor whitespace.
///
/// Topics, titles and key points all go through this before any containment
/// check, so `"Generative-AI"` and `"generative ai"` do not match but
/// `"GPT-4o!"` and `"gpt4o"` do.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("Open-Source LLMs!"), "opensource llms");
/// ```
pub fn normalize_text(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes
/// and get an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// First `max` characters of `s`.
pub fn char_prefix(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Shorten a display label to `max` characters, marking the cut with `...`.
pub fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", char_prefix(s, max))
    } else {
        s.to_string()
    }
}

/// Convert a title to a URL-friendly slug.
///
/// Lowercases the text, removes special characters, and replaces spaces with
/// hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// assert_eq!(slugify_title("Test-Article!"), "test-article");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Make a query safe for use in a filename.
///
/// Keeps the first [`QUERY_FRAGMENT_LEN`] characters; alphanumerics, `-`, `_`
/// and spaces survive, everything else becomes `_`.
pub fn sanitize_query_fragment(query: &str) -> String {
    char_prefix(query, QUERY_FRAGMENT_LEN)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Slug used for per-search report files.
pub fn report_slug(query: &str) -> String {
    let slug = slugify_title(char_prefix(query.trim(), QUERY_FRAGMENT_LEN));
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "general-ai-news".to_string()
    } else {
        slug.to_string()
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
