//! Trend extraction across a batch of summarized articles.
//!
//! Topics come from two places:
//!
//! 1. **Titles**: every word longer than three characters that is not a stop
//!    word, plus every adjacent pair of such words.
//! 2. **Key points**: whole comma-free phrases (weight 2) and each
//!    comma-separated sub-term (weight 1).
//!
//! Key-point scores count double when merged with title scores, and equal
//! scores rank longer terms first. The ten best candidates are then
//! deduplicated so that a fragment like `"model"` does not
//! crowd out the longer `"new model release"` it belongs to, and the first
//! five survivors become the trending topics.
//!
//! Matching is purely lexical; there is no stemming or semantic grouping.

use crate::models::{Article, TopArticle, TrendReport};
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, instrument};

const STOP_WORDS: &[&str] = &[
    "and", "the", "to", "of", "in", "for", "with", "on", "at", "from", "by", "about", "as", "an",
    "is", "are", "was", "were", "be", "been", "being", "how", "what", "when", "where", "who",
    "why", "which", "that", "this", "these", "those",
];

const MAX_CANDIDATES: usize = 10;
const MAX_TRENDING_TOPICS: usize = 5;
const MAX_TOP_ARTICLES: usize = 3;

/// Minimum length (exclusive, in characters) of a title word or key-point term.
const MIN_TERM_LEN: usize = 3;

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Term counts that remember first-seen order, so equal scores rank in the
/// order the terms were encountered.
#[derive(Debug, Default)]
pub(crate) struct ScoreTable {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl ScoreTable {
    pub(crate) fn add(&mut self, term: &str, weight: u32) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].1 += weight,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push((term.to_string(), weight));
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, term: &str) -> u32 {
        self.index.get(term).map_or(0, |&i| self.entries[i].1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Entries by descending score; ties keep first-seen order.
    pub(crate) fn ranked(self) -> Vec<(String, u32)> {
        self.entries
            .into_iter()
            .sorted_by_key(|(_, count)| Reverse(*count))
            .collect()
    }

    /// Like [`ranked`](Self::ranked), but equal scores put longer terms
    /// first, so a phrase always precedes the fragments it contains.
    pub(crate) fn ranked_longest_first(self) -> Vec<(String, u32)> {
        self.entries
            .into_iter()
            .sorted_by_key(|(term, count)| (Reverse(*count), Reverse(term.chars().count())))
            .collect()
    }
}

/// Split a title into candidate topic words.
///
/// Lowercases, turns every non-alphanumeric character into a space and drops
/// short words and stop words.
pub fn title_terms(title: &str) -> Vec<String> {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_TERM_LEN && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

fn score_titles(articles: &[Article]) -> ScoreTable {
    let mut scores = ScoreTable::default();
    for article in articles {
        let words = title_terms(&article.title);
        for pair in words.windows(2) {
            scores.add(&format!("{} {}", pair[0], pair[1]), 1);
        }
        for word in &words {
            scores.add(word, 1);
        }
    }
    scores
}

fn score_key_points(articles: &[Article]) -> ScoreTable {
    let mut scores = ScoreTable::default();
    for point in articles.iter().flat_map(|a| &a.key_points) {
        let phrase = point.trim().to_lowercase();

        if phrase.chars().count() > MIN_TERM_LEN && !phrase.contains([',', ';']) {
            scores.add(&phrase, 2);
        }

        for term in phrase.split(',').map(str::trim) {
            if term.chars().count() > MIN_TERM_LEN && !is_stop_word(term) {
                scores.add(term, 1);
            }
        }
    }
    scores
}

/// `title + 2 * key_point` for every term seen in either table.
fn merge_scores(titles: ScoreTable, key_points: &ScoreTable) -> ScoreTable {
    let mut combined = titles;
    for (term, count) in key_points.iter() {
        combined.add(term, count * 2);
    }
    combined
}

/// Drop candidates that are a strict substring of an already kept candidate
/// with at least the same score. Input must be sorted by descending score,
/// longer terms first among equal scores.
fn drop_dominated(candidates: Vec<(String, u32)>) -> Vec<(String, u32)> {
    let mut kept: Vec<(String, u32)> = Vec::with_capacity(candidates.len());
    for (topic, score) in candidates {
        let dominated = kept.iter().any(|(other, other_score)| {
            *other != topic && other.contains(topic.as_str()) && score <= *other_score
        });
        if !dominated {
            kept.push((topic, score));
        }
    }
    kept
}

/// Rank every candidate topic and return the deduplicated top list with scores.
pub fn rank_topics(articles: &[Article]) -> Vec<(String, u32)> {
    let titles = score_titles(articles);
    let key_points = score_key_points(articles);
    debug!(
        title_terms = titles.len(),
        key_point_terms = key_points.len(),
        "Scored topic candidates"
    );

    let candidates = merge_scores(titles, &key_points)
        .ranked_longest_first()
        .into_iter()
        .take(MAX_CANDIDATES)
        .collect();

    drop_dominated(candidates)
}

fn top_articles(articles: &[Article]) -> Vec<TopArticle> {
    articles
        .iter()
        .sorted_by_key(|a| Reverse(a.importance()))
        .take(MAX_TOP_ARTICLES)
        .map(|a| TopArticle {
            title: a.display_title().to_string(),
            score: a.importance(),
        })
        .collect()
}

fn average_importance(articles: &[Article]) -> f64 {
    let scores = articles
        .iter()
        .filter_map(|a| a.importance_score)
        .map(f64::from)
        .collect::<Vec<_>>();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Extract trending topics, top articles and average importance.
///
/// An empty slice yields an empty [`TrendReport`].
#[instrument(level = "info", skip_all, fields(articles = articles.len()))]
pub fn analyze_trends(articles: &[Article]) -> TrendReport {
    if articles.is_empty() {
        return TrendReport::default();
    }

    let trending_topics = rank_topics(articles)
        .into_iter()
        .take(MAX_TRENDING_TOPICS)
        .map(|(topic, _)| topic)
        .collect::<Vec<_>>();

    let report = TrendReport {
        trending_topics,
        top_articles: top_articles(articles),
        average_importance: average_importance(articles),
    };
    debug!(topics = ?report.trending_topics, "Extracted trends");
    report
}
