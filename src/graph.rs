//! Knowledge graph linking trending topics, articles and their key points.
//!
//! The graph is undirected and has three disjoint node groups:
//!
//! | Group | Id | Label |
//! |-------|----|-------|
//! | Topic | `topic:{normalized topic}` | original topic text |
//! | Article | `article:{position}` | title cut to 30 characters |
//! | Key point | `point:{normalized key point}` | first 20 characters |
//!
//! Edges are decided by substring containment on normalized text (see
//! [`normalize_text`]): an article links to a topic when its title or one of
//! its key points contains the topic, and a key point links to a topic when
//! it contains it. Identical key points from different articles share a node.

use crate::models::{Article, TrendReport};
use crate::utils::{char_prefix, normalize_text, truncate_label};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const ARTICLE_LABEL_LEN: usize = 30;
const KEY_POINT_LABEL_LEN: usize = 20;

/// Key points of this many characters or fewer get no node.
const MIN_KEY_POINT_LEN: usize = 5;

const KEY_POINT_EDGE_WEIGHT: f64 = 1.0;

/// The partition a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeGroup {
    Topic,
    Article,
    KeyPoint,
}

impl NodeGroup {
    /// Display size; topics are the hubs.
    pub fn size(self) -> u32 {
        match self {
            NodeGroup::Topic => 20,
            NodeGroup::Article => 10,
            NodeGroup::KeyPoint => 5,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NodeGroup::Topic => "#3a86ff",
            NodeGroup::Article => "#ff006e",
            NodeGroup::KeyPoint => "#8338ec",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    /// Short text drawn on the node.
    pub label: String,
    /// Full text shown on hover.
    pub title: String,
    pub group: NodeGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Node counts per group plus the edge count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub topics: usize,
    pub articles: usize,
    pub key_points: usize,
    pub connections: usize,
}

/// An undirected, weighted graph whose edges always join existing nodes.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(String, String), usize>,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false` and keeps the existing node when the id
    /// is already present.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Connect two existing nodes, overwriting the weight of an existing edge.
    /// Returns `false` when either endpoint is missing or `a == b`.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> bool {
        if a == b || !self.node_index.contains_key(a) || !self.node_index.contains_key(b) {
            return false;
        }
        let key = edge_key(a, b);
        match self.edge_index.get(&key) {
            Some(&i) => self.edges[i].weight = weight,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(GraphEdge {
                    source: a.to_string(),
                    target: b.to_string(),
                    weight,
                });
            }
        }
        true
    }

    #[cfg(test)]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    #[cfg(test)]
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        self.edge_index
            .get(&edge_key(a, b))
            .map(|&i| self.edges[i].weight)
    }

    #[cfg(test)]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_weight(a, b).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn count_in_group(&self, group: NodeGroup) -> usize {
        self.nodes.iter().filter(|n| n.group == group).count()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            topics: self.count_in_group(NodeGroup::Topic),
            articles: self.count_in_group(NodeGroup::Article),
            key_points: self.count_in_group(NodeGroup::KeyPoint),
            connections: self.edge_count(),
        }
    }
}

pub fn topic_id(normalized: &str) -> String {
    format!("topic:{normalized}")
}

pub fn article_id(position: usize) -> String {
    format!("article:{position}")
}

pub fn key_point_id(normalized: &str) -> String {
    format!("point:{normalized}")
}

/// Build the topic / article / key-point graph for one digest.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), topics = trends.trending_topics.len()))]
pub fn build_knowledge_graph(articles: &[Article], trends: &TrendReport) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();

    let topics = trends
        .trending_topics
        .iter()
        .map(|t| (normalize_text(t), t))
        .filter(|(normalized, _)| !normalized.is_empty())
        .collect::<Vec<_>>();

    for (normalized, topic) in &topics {
        graph.add_node(GraphNode {
            id: topic_id(normalized),
            label: topic.to_string(),
            title: topic.to_string(),
            group: NodeGroup::Topic,
        });
    }

    for (position, article) in articles.iter().enumerate() {
        let title = article.display_title();
        let node_id = article_id(position);
        graph.add_node(GraphNode {
            id: node_id.clone(),
            label: truncate_label(title, ARTICLE_LABEL_LEN),
            title: title.to_string(),
            group: NodeGroup::Article,
        });

        let clean_title = normalize_text(title);
        let clean_points = article
            .key_points
            .iter()
            .map(|p| normalize_text(p))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();

        let weight = f64::from(article.importance()) / 2.0;
        for (normalized, _) in &topics {
            let mentioned = clean_title.contains(normalized.as_str())
                || clean_points.iter().any(|p| p.contains(normalized.as_str()));
            if mentioned {
                graph.add_edge(&node_id, &topic_id(normalized), weight);
            }
        }

        for point in clean_points.iter().filter(|p| p.chars().count() > MIN_KEY_POINT_LEN) {
            let point_id = key_point_id(point);
            graph.add_node(GraphNode {
                id: point_id.clone(),
                label: format!("{}...", char_prefix(point, KEY_POINT_LABEL_LEN)),
                title: point.clone(),
                group: NodeGroup::KeyPoint,
            });
            graph.add_edge(&node_id, &point_id, KEY_POINT_EDGE_WEIGHT);

            for (normalized, _) in &topics {
                if point.contains(normalized.as_str()) {
                    graph.add_edge(&point_id, &topic_id(normalized), KEY_POINT_EDGE_WEIGHT);
                }
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built knowledge graph"
    );
    graph
}
