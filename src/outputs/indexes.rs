//! Index file management for navigation between reports.
//!
//! `reports.md` in the Markdown output directory lists every report, grouped
//! under its date with the newest date first:
//!
//! ```text
//! # AI Trend Reports
//!
//! - **2025-05-06**
//!     - [Generative AI OR LLM](./2025-05-06_generative-ai-or-llm.md)
//!     - [AI ethics](./2025-05-06_ai-ethics.md)
//! - **2025-05-05**
//!     - [Artificial Intelligence OR AI OR machine learning OR LLM](./2025-05-05_artificial-intelligence-or-ai-or.md)
//! ```
//!
//! Each report file has exactly one entry. Queries that map to the same
//! file on the same day (`"AI!"` and `"ai"`) share it, labelled with the
//! most recent query.

use crate::models::NewsDigest;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const REPORT_INDEX_FILE: &str = "reports.md";
const REPORT_INDEX_HEADING: &str = "# AI Trend Reports";

/// Add the report for `digest` to `{markdown_output_dir}/reports.md`.
///
/// Creates the file with a heading if it doesn't exist.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, date = %digest.local_date, file = %markdown_filename))]
pub async fn update_report_index(
    markdown_output_dir: &str,
    digest: &NewsDigest,
    markdown_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let index_path = Path::new(markdown_output_dir).join(REPORT_INDEX_FILE);
    let content = if index_path.exists() {
        fs::read_to_string(&index_path).await?
    } else {
        format!("{REPORT_INDEX_HEADING}\n")
    };

    let date_heading = format!("- **{}**", digest.local_date);
    let entry = format!(
        "    - [{}](./{})",
        digest.query_parameters.query, markdown_filename
    );

    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

    // One entry per report file; the latest query names it.
    let target = format!("](./{markdown_filename})");

    match lines.iter().position(|l| l.trim() == date_heading) {
        Some(i) => {
            let mut j = i + 1;
            let mut existing = None;
            while j < lines.len() && lines[j].starts_with("    - ") {
                if lines[j].ends_with(&target) {
                    existing = Some(j);
                    break;
                }
                j += 1;
            }
            match existing {
                Some(k) => lines[k] = entry,
                None => lines.insert(j, entry),
            }
        }
        None => {
            let insert_at = match lines.iter().position(|l| l.starts_with(REPORT_INDEX_HEADING)) {
                Some(pos) => {
                    if lines.get(pos + 1).is_none_or(|l| !l.is_empty()) {
                        lines.insert(pos + 1, String::new());
                    }
                    pos + 2
                }
                None => lines.len(),
            };
            lines.insert(insert_at, date_heading);
            lines.insert(insert_at + 1, entry);
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(&index_path, out).await?;
    info!(path = %index_path.display(), "Updated report index");
    Ok(())
}
