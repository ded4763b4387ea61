//! Interactive knowledge-graph page.
//!
//! Writes the graph twice: as vis-network JSON (`{stem}.graph.json`) and as a
//! standalone HTML page (`{stem}.graph.html`) that loads vis-network from a
//! CDN and lays the graph out with Barnes–Hut physics.

use crate::graph::{KnowledgeGraph, NodeGroup};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const VIS_NETWORK_SRC: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

#[derive(Debug, Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    title: &'a str,
    size: u32,
    color: &'static str,
    group: NodeGroup,
}

#[derive(Debug, Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    value: f64,
}

/// The `{nodes, edges}` data set vis-network consumes.
#[derive(Debug, Serialize)]
pub struct VisData<'a> {
    nodes: Vec<VisNode<'a>>,
    edges: Vec<VisEdge<'a>>,
}

impl<'a> From<&'a KnowledgeGraph> for VisData<'a> {
    fn from(graph: &'a KnowledgeGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| VisNode {
                id: &n.id,
                label: &n.label,
                title: &n.title,
                size: n.group.size(),
                color: n.group.color(),
                group: n.group,
            })
            .collect();
        let edges = graph
            .edges()
            .map(|e| VisEdge {
                from: &e.source,
                to: &e.target,
                value: e.weight,
            })
            .collect();
        Self { nodes, edges }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON safe to inline in a `<script>` element.
fn script_json(data: &VisData<'_>) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string(data)?.replace("</", "<\\/"))
}

/// A self-contained page rendering `graph`.
pub fn graph_to_html(graph: &KnowledgeGraph, title: &str) -> Result<String, Box<dyn Error>> {
    let data = script_json(&VisData::from(graph))?;
    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{VIS_NETWORK_SRC}"></script>
<style>
  body {{ margin: 0; background: #ffffff; font-family: sans-serif; }}
  h1 {{ font-size: 1.2rem; margin: 0.75rem 1rem; }}
  #graph {{ width: 100%; height: 600px; border-top: 1px solid #e5e5e5; }}
</style>
</head>
<body>
<h1>{title}</h1>
<div id="graph"></div>
<script>
  const data = {data};
  const options = {{
    physics: {{
      solver: "barnesHut",
      barnesHut: {{
        gravitationalConstant: -5000,
        centralGravity: 0.3,
        springLength: 150,
        springConstant: 0.05
      }}
    }},
    nodes: {{ shape: "dot", font: {{ color: "#000000" }} }},
    edges: {{ color: {{ inherit: "from" }}, smooth: false }},
    interaction: {{ hover: true, tooltipDelay: 100 }}
  }};
  new vis.Network(
    document.getElementById("graph"),
    {{ nodes: new vis.DataSet(data.nodes), edges: new vis.DataSet(data.edges) }},
    options
  );
</script>
</body>
</html>
"##,
        title = escape_html(title),
    ))
}

/// Write `{stem}.graph.json` and `{stem}.graph.html` into `dir`.
///
/// Returns the path of the HTML page.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %stem, nodes = graph.node_count(), edges = graph.edge_count()))]
pub async fn write_graph(
    graph: &KnowledgeGraph,
    dir: &Path,
    stem: &str,
    title: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;

    let json_path = dir.join(format!("{stem}.graph.json"));
    fs::write(&json_path, serde_json::to_string_pretty(&VisData::from(graph))?).await?;

    let html_path = dir.join(format!("{stem}.graph.html"));
    fs::write(&html_path, graph_to_html(graph, title)?).await?;

    info!(json = %json_path.display(), html = %html_path.display(), "Wrote knowledge graph");
    Ok(html_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphNode;
    use serde_json::Value;

    fn sample() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        g.add_node(GraphNode {
            id: "topic:agents".to_string(),
            label: "agents".to_string(),
            title: "agents".to_string(),
            group: NodeGroup::Topic,
        });
        g.add_node(GraphNode {
            id: "article:0".to_string(),
            label: "</script><b>Agents ship</b>".to_string(),
            title: "</script><b>Agents ship</b>".to_string(),
            group: NodeGroup::Article,
        });
        g.add_edge("article:0", "topic:agents", 4.5);
        g
    }

    #[test]
    fn test_vis_data_shape() {
        let graph = sample();
        let value = serde_json::to_value(VisData::from(&graph)).unwrap();

        let topic = &value["nodes"][0];
        assert_eq!(topic["id"], "topic:agents");
        assert_eq!(topic["size"], 20);
        assert_eq!(topic["color"], "#3a86ff");
        assert_eq!(topic["group"], "topic");
        assert_eq!(value["nodes"][1]["color"], "#ff006e");

        let edge = &value["edges"][0];
        assert_eq!(edge["value"], Value::from(4.5));
        let ends = [edge["from"].as_str().unwrap(), edge["to"].as_str().unwrap()];
        assert!(ends.contains(&"article:0") && ends.contains(&"topic:agents"));
    }

    #[test]
    fn test_html_escapes_script_breakout() {
        let html = graph_to_html(&sample(), "Trends <today>").unwrap();
        assert!(html.contains("<title>Trends &lt;today&gt;</title>"));
        assert!(html.contains("gravitationalConstant: -5000"));
        assert!(html.contains("springConstant: 0.05"));
        assert!(html.contains(r##"font: { color: "#000000" }"##));
        assert!(html.trim_end().ends_with("</html>"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("<\\/script>"));
    }

    #[tokio::test]
    async fn test_write_graph_files() {
        let tmp = tempfile::tempdir().unwrap();
        let html = write_graph(&sample(), tmp.path(), "ai", "AI").await.unwrap();

        assert_eq!(html, tmp.path().join("ai.graph.html"));
        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("ai.graph.json")).unwrap())
                .unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"].as_array().unwrap().len(), 1);
    }
}
