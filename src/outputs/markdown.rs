//! Markdown dashboard rendering for a [`NewsDigest`].
//!
//! The report mirrors the interactive dashboard: overview metrics, trend
//! tags, the executive summary, one card per visible article and a short
//! block of knowledge-graph statistics. Which articles are visible is decided
//! by an explicit [`ReportView`], never by ambient state.

use crate::graph::GraphStats;
use crate::models::{Article, NewsDigest};
use chrono::{DateTime, NaiveDate};
use itertools::Itertools;
use std::cmp::Reverse;
use std::fmt::Write;

pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const NO_TOPICS: &str = "No trending topics identified from the current articles.";
pub const NO_MATCHING_ARTICLES: &str =
    "No articles match the selected filters. Try selecting more sources or lowering the minimum importance.";

/// Presentation filters applied when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportView {
    /// Source names to show; empty shows every source.
    pub selected_sources: Vec<String>,
    /// Articles scoring below this are hidden. Unscored articles count as 0.
    pub min_importance: u8,
}

/// Articles passing `view`, highest importance first (stable).
pub fn visible_articles<'a>(articles: &'a [Article], view: &ReportView) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| {
            view.selected_sources.is_empty() || view.selected_sources.contains(&a.source.name)
        })
        .filter(|a| a.importance() >= view.min_importance)
        .sorted_by_key(|a| Reverse(a.importance()))
        .collect()
}

/// Distinct source names in first-seen order.
pub fn source_names(articles: &[Article]) -> Vec<&str> {
    articles
        .iter()
        .map(|a| a.source.name.as_str())
        .unique()
        .collect()
}

/// `"May 06, 2025"` from an RFC 3339 timestamp or a bare `YYYY-MM-DD`.
///
/// Empty input gives [`UNKNOWN_DATE`]; anything unparseable is returned as-is.
pub fn format_published_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN_DATE.to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format("%b %d, %Y").to_string();
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn write_card(md: &mut String, article: &Article) {
    let title = article.display_title();
    if article.url.is_empty() {
        writeln!(md, "### {title}\n").unwrap();
    } else {
        writeln!(md, "### [{title}]({})\n", article.url).unwrap();
    }

    let importance = article
        .importance_score
        .map(|s| format!("{s}/10"))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(
        md,
        "**Source:** {} · **Published:** {} · **Importance:** {}\n",
        article.source.name,
        format_published_date(&article.published_at),
        importance
    )
    .unwrap();

    if let Some(summary) = article.summary.as_deref().filter(|s| !s.is_empty()) {
        writeln!(md, "{summary}\n").unwrap();
    }

    if !article.key_points.is_empty() {
        let tags = article.key_points.iter().map(|p| format!("`{p}`")).join(" ");
        writeln!(md, "{tags}\n").unwrap();
    }

    if !article.url.is_empty() {
        writeln!(md, "[Read Full Article]({})\n", article.url).unwrap();
    }
}

fn write_graph_insights(md: &mut String, stats: &GraphStats, graph_page: Option<&str>) {
    md.push_str("## Knowledge Graph\n\n");
    writeln!(md, "- **Topics:** {}", stats.topics).unwrap();
    writeln!(md, "- **Articles:** {}", stats.articles).unwrap();
    writeln!(md, "- **Key Points:** {}", stats.key_points).unwrap();
    writeln!(md, "- **Connections:** {}", stats.connections).unwrap();
    if let Some(page) = graph_page {
        writeln!(md, "\n[Explore the interactive graph]({page})").unwrap();
    }
    md.push('\n');
}

/// Render the full report.
///
/// `graph` carries the statistics of the knowledge graph built for this
/// digest, and `graph_page` an optional link to its interactive page.
pub fn digest_to_markdown(
    digest: &NewsDigest,
    view: &ReportView,
    graph: Option<&GraphStats>,
    graph_page: Option<&str>,
) -> String {
    let mut md = String::new();
    let params = &digest.query_parameters;

    writeln!(md, "# AI News Trend Report\n").unwrap();
    writeln!(md, "**Query:** `{}`\n", params.query).unwrap();

    if let Some(err) = &digest.error {
        writeln!(md, "> **Error fetching news:** {err}\n").unwrap();
        md.push_str("Try adjusting your search terms or time range.\n\n");
    } else {
        md.push_str("## Overview\n\n");
        md.push_str("| Articles Found | Trending Topics | Avg. Importance | Days Searched |\n");
        md.push_str("|---:|---:|---:|---:|\n");
        writeln!(
            md,
            "| {} | {} | {:.1}/10 | {} |\n",
            digest.total_articles,
            digest.trends.trending_topics.len(),
            digest.trends.average_importance,
            params.days
        )
        .unwrap();

        md.push_str("## Trending Topics\n\n");
        if digest.trends.trending_topics.is_empty() {
            writeln!(md, "{NO_TOPICS}\n").unwrap();
        } else {
            let tags = digest
                .trends
                .trending_topics
                .iter()
                .map(|t| format!("`{t}`"))
                .join(" ");
            writeln!(md, "{tags}\n").unwrap();
        }

        md.push_str("## Executive Summary\n\n");
        writeln!(md, "{}\n", digest.combined_summary.trim()).unwrap();

        md.push_str("## Articles\n\n");
        let sources = source_names(&digest.articles);
        writeln!(md, "**Sources:** {}", sources.join(", ")).unwrap();
        if !view.selected_sources.is_empty() {
            writeln!(md, "**Showing:** {}", view.selected_sources.join(", ")).unwrap();
        }
        writeln!(md, "**Minimum importance:** {}/10\n", view.min_importance).unwrap();

        let visible = visible_articles(&digest.articles, view);
        if visible.is_empty() {
            writeln!(md, "> {NO_MATCHING_ARTICLES}\n").unwrap();
        }
        for article in visible {
            write_card(&mut md, article);
        }

        if let Some(stats) = graph {
            write_graph_insights(&mut md, stats, graph_page);
        }
    }

    md.push_str("---\n\n");
    writeln!(
        md,
        "_Last updated: {} {}_",
        digest.local_date, digest.local_time
    )
    .unwrap();
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryParameters, TrendReport};
    use crate::test_support::article;

    fn sourced(title: &str, importance: Option<u8>, source: &str) -> Article {
        let mut a = article(title, importance, &[]);
        a.source.name = source.to_string();
        a
    }

    fn digest() -> NewsDigest {
        let mut lead = sourced("Lab ships model", Some(9), "wired.com");
        lead.summary = Some("A frontier lab shipped a model.".to_string());
        lead.key_points = vec!["new model".to_string(), "open weights".to_string()];
        lead.published_at = "2025-05-06T08:00:00Z".to_string();

        NewsDigest {
            local_date: "2025-05-06".to_string(),
            local_time: "14:02:11".to_string(),
            articles: vec![
                lead,
                sourced("Chip news", Some(6), "verge.com"),
                sourced("Minor note", Some(2), "wired.com"),
            ],
            trends: TrendReport {
                trending_topics: vec!["new model".to_string(), "chip".to_string()],
                top_articles: vec![],
                average_importance: 17.0 / 3.0,
            },
            combined_summary: "Models and chips.".to_string(),
            total_articles: 3,
            query_parameters: QueryParameters {
                query: "AI".to_string(),
                days: 7,
                article_count: 10,
                preferred_sources: vec![],
            },
            error: None,
        }
    }

    #[test]
    fn test_visible_articles_filters_and_sorts() {
        let articles = vec![
            sourced("low", Some(3), "a"),
            sourced("unscored", None, "a"),
            sourced("high", Some(8), "b"),
            sourced("also high", Some(8), "a"),
        ];

        let all = visible_articles(&articles, &ReportView::default());
        let titles = all.iter().map(|a| a.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["high", "also high", "low", "unscored"]);

        let view = ReportView {
            selected_sources: vec!["a".to_string()],
            min_importance: 3,
        };
        let titles = visible_articles(&articles, &view)
            .iter()
            .map(|a| a.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["also high", "low"]);
    }

    #[test]
    fn test_format_published_date() {
        assert_eq!(format_published_date("2025-05-06T08:00:00Z"), "May 06, 2025");
        assert_eq!(format_published_date("2025-01-15T23:10:00+02:00"), "Jan 15, 2025");
        assert_eq!(format_published_date("2025-03-02"), "Mar 02, 2025");
        assert_eq!(format_published_date(""), UNKNOWN_DATE);
        assert_eq!(format_published_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_report_sections() {
        let stats = GraphStats {
            topics: 2,
            articles: 3,
            key_points: 2,
            connections: 4,
        };
        let md = digest_to_markdown(
            &digest(),
            &ReportView {
                selected_sources: vec![],
                min_importance: 1,
            },
            Some(&stats),
            Some("graph.html"),
        );

        assert!(md.contains("| 3 | 2 | 5.7/10 | 7 |"));
        assert!(md.contains("`new model` `chip`"));
        assert!(md.contains("Models and chips."));
        assert!(md.contains("**Sources:** wired.com, verge.com"));
        assert!(md.contains("### [Lab ships model](https://example.com/lab-ships-model)"));
        assert!(md.contains("**Published:** May 06, 2025"));
        assert!(md.contains("**Importance:** 9/10"));
        assert!(md.contains("`new model` `open weights`"));
        assert!(md.contains("[Read Full Article](https://example.com/lab-ships-model)"));
        assert!(md.contains("**Published:** Unknown Date"));
        assert!(md.contains("- **Connections:** 4"));
        assert!(md.contains("[Explore the interactive graph](graph.html)"));
        assert!(md.ends_with("_Last updated: 2025-05-06 14:02:11_\n"));

        let lead = md.find("Lab ships model").unwrap();
        let chip = md.find("### [Chip news]").unwrap();
        let minor = md.find("### [Minor note]").unwrap();
        assert!(lead < chip && chip < minor);
    }

    #[test]
    fn test_report_filters_leave_nothing() {
        let md = digest_to_markdown(
            &digest(),
            &ReportView {
                selected_sources: vec!["verge.com".to_string()],
                min_importance: 7,
            },
            None,
            None,
        );
        assert!(md.contains(NO_MATCHING_ARTICLES));
        assert!(!md.contains("Read Full Article"));
        assert!(!md.contains("## Knowledge Graph"));
    }

    #[test]
    fn test_report_error_and_empty_trends() {
        let mut failed = digest();
        failed.error = Some("No articles found matching the criteria.".to_string());
        let md = digest_to_markdown(&failed, &ReportView::default(), None, None);
        assert!(md.contains("**Error fetching news:** No articles found matching the criteria."));
        assert!(md.contains("Try adjusting your search terms or time range."));
        assert!(!md.contains("## Overview"));

        let mut quiet = digest();
        quiet.trends = TrendReport::default();
        let md = digest_to_markdown(&quiet, &ReportView::default(), None, None);
        assert!(md.contains(NO_TOPICS));
        assert!(md.contains("| 3 | 0 | 0.0/10 | 7 |"));
    }
}
