//! JSON output.
//!
//! Items are written as one pretty-printed array (four-space indent, raw
//! UTF-8) per file.

use crate::models::NewsItem;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `items` as an indented JSON array.
pub fn items_to_json(items: &[NewsItem]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut ser)?;
    Ok(buf)
}

/// Write `items` to `path` as an indented JSON array, replacing any existing file.
///
/// # Arguments
///
/// * `items` - Items to serialize, in order
/// * `path` - Destination file; its directory must already exist
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization or the write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = items.len()))]
pub async fn write_items_json(items: &[NewsItem], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = items_to_json(items)?;
    fs::write(path, json).await?;
    info!("Wrote JSON");
    Ok(())
}
