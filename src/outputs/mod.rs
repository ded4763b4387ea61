//! Output generation modules for JSON, Markdown, graph pages and index files.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`NewsDigest`](crate::models::NewsDigest) and saved searches
//! - [`markdown`]: Renders the digest as a dashboard-style Markdown report
//! - [`network`]: Writes the knowledge graph as vis-network JSON and HTML
//! - [`indexes`]: Maintains `reports.md`, the index of all reports
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── generative-ai-or-llm.json
//!     ├── generative-ai-or-llm.graph.json
//!     └── generative-ai-or-llm.graph.html
//!
//! markdown_output_dir/
//! ├── 2025-05-06_generative-ai-or-llm.md   # Report
//! └── reports.md                           # Index
//! ```

pub mod indexes;
pub mod json;
pub mod markdown;
pub mod network;
