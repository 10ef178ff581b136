//! Text and JSON reports
//!
//! Renderers return strings; [`write_report`] and [`write_json_summary`]
//! persist them as UTF-8 files.

mod analysis;
mod performance;
mod summary;

pub use analysis::render_analysis_report;
pub use performance::{render_performance_report, UNDEFINED};
pub use summary::{FamilySummary, OutcomeSummary};

use crate::error::Result;
use crate::training::SelectionOutcome;
use std::path::Path;
use tracing::info;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write `text` to `path`, creating the parent directory when missing
pub fn write_report(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    std::fs::write(path, text)?;
    info!(path = %path.display(), bytes = text.len(), "Report written");
    Ok(())
}

/// Serialize the outcome metadata as pretty JSON
pub fn write_json_summary(path: impl AsRef<Path>, outcome: &SelectionOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(&OutcomeSummary::from_outcome(outcome))?;
    write_report(path, &json)
}
