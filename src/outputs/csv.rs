//! CSV output.
//!
//! The header row is always written, even for an empty list, so every file
//! starts with the same seven columns.

use crate::models::NewsItem;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Column order of every CSV file; matches the field order of [`NewsItem`].
pub const CSV_HEADER: [&str; 7] = [
    "title",
    "publication_date",
    "source",
    "country",
    "summary",
    "url",
    "language",
];

/// Render `items` as CSV bytes, header first. Fields containing commas,
/// quotes or newlines are quoted.
pub fn items_to_csv(items: &[NewsItem]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for item in items {
        writer.serialize(item)?;
    }
    let buf = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(buf)
}

/// Write `items` to `path` as CSV, replacing any existing file.
///
/// # Arguments
///
/// * `items` - Items to write, one row each
/// * `path` - Destination file; its directory must already exist
///
/// # Returns
///
/// `Ok(())` on success, or an error if encoding or the write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = items.len()))]
pub async fn write_items_csv(items: &[NewsItem], path: &Path) -> Result<(), Box<dyn Error>> {
    let csv = items_to_csv(items)?;
    fs::write(path, csv).await?;
    info!("Wrote CSV");
    Ok(())
}
