//! Output generation for the overall collection and language partitions.
//!
//! # Submodules
//!
//! - [`json`]: Writes item lists as indented JSON arrays
//! - [`csv`]: Writes item lists as CSV with a fixed header
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_data.json      # every admitted item
//! ├── news_data.csv
//! ├── news_en.json        # one pair per language partition
//! ├── news_en.csv
//! ├── news_Unknown.json
//! └── news_Unknown.csv
//! ```
//!
//! A file that fails to write is logged and skipped; the rest are still written.

pub mod csv;
pub mod json;

use crate::models::NewsItem;
use crate::pipeline::Aggregates;
use crate::utils::file_stem_for_language;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// File stem of the overall collection.
pub const OVERALL_STEM: &str = "news_data";

/// Files written and failed by [`write_aggregates`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl WriteSummary {
    /// `true` when no file failed to write.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write the overall collection and every language partition into `output_dir`.
///
/// # Arguments
///
/// * `aggregates` - Everything admitted during the run
/// * `output_dir` - Existing, writable directory (see [`crate::utils::ensure_writable_dir`])
///
/// # Returns
///
/// A [`WriteSummary`] listing the files written and the files that failed.
/// A failed file is logged and does not stop the remaining writes.
#[instrument(level = "info", skip_all, fields(%output_dir, items = aggregates.len(), languages = aggregates.by_language.len()))]
pub async fn write_aggregates(aggregates: &Aggregates, output_dir: &str) -> WriteSummary {
    let dir = Path::new(output_dir);
    let mut summary = WriteSummary::default();

    write_pair(&aggregates.items, dir, OVERALL_STEM, &mut summary).await;

    for (language, items) in &aggregates.by_language {
        let stem = format!("news_{}", file_stem_for_language(language));
        write_pair(items, dir, &stem, &mut summary).await;
        info!(%language, count = items.len(), "Saved language partition");
    }

    summary
}

async fn write_pair(items: &[NewsItem], dir: &Path, stem: &str, summary: &mut WriteSummary) {
    let json_path = dir.join(format!("{stem}.json"));
    match json::write_items_json(items, &json_path).await {
        Ok(()) => summary.written.push(json_path),
        Err(e) => {
            error!(path = %json_path.display(), error = %e, "Failed to write JSON");
            summary.failed.push(json_path);
        }
    }

    let csv_path = dir.join(format!("{stem}.csv"));
    match csv::write_items_csv(items, &csv_path).await {
        Ok(()) => summary.written.push(csv_path),
        Err(e) => {
            error!(path = %csv_path.display(), error = %e, "Failed to write CSV");
            summary.failed.push(csv_path);
        }
    }
}
