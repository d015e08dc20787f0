//! Wayback Machine addressing and capture index decoding.
//!
//! The capture index (CDX) is queried with
//! `<host>/cdx/search/cdx?url=<endpoint>&output=json&from=<YYYYMMDD>&to=<YYYYMMDD>`
//! and answers with a JSON table:
//!
//! ```text
//! [["urlkey","timestamp","original","mimetype","statuscode","digest","length"],
//!  ["uk,co,bbci,feeds)/news/rss.xml","20240105000000","http://feeds.bbci.co.uk/news/rss.xml", ...],
//!  ...]
//! ```
//!
//! Row 0 is the header; column 1 of every other row is a capture timestamp.
//! A capture is replayed from `<host>/web/<timestamp>/<endpoint>`.

use crate::error::FetchError;
use crate::models::ArchiveWindow;
use url::Url;

pub const DEFAULT_ARCHIVE_HOST: &str = "http://web.archive.org";

/// Build the capture index query for `endpoint` within `window`.
pub fn snapshot_index_url(
    archive_host: &str,
    endpoint: &str,
    window: &ArchiveWindow,
) -> Result<Url, FetchError> {
    let base = format!("{}/cdx/search/cdx", archive_host.trim_end_matches('/'));
    Url::parse_with_params(
        &base,
        &[
            ("url", endpoint.to_string()),
            ("output", "json".to_string()),
            ("from", window.from_param()),
            ("to", window.to_param()),
        ],
    )
    .map_err(|source| FetchError::InvalidUrl { url: base, source })
}

/// Build the replay address of one capture. The original endpoint is embedded
/// verbatim after the timestamp.
pub fn replay_url(archive_host: &str, timestamp: &str, endpoint: &str) -> String {
    format!(
        "{}/web/{}/{}",
        archive_host.trim_end_matches('/'),
        timestamp,
        endpoint
    )
}

/// Decode a capture index response into its timestamps, in index order.
///
/// An empty body or a header-only table yields no timestamps. Rows without a
/// second column are skipped.
pub fn parse_snapshot_index(url: &str, body: &[u8]) -> Result<Vec<String>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> =
        serde_json::from_slice(body).map_err(|source| FetchError::ArchiveIndex {
            url: url.to_string(),
            source,
        })?;

    if rows.len() <= 1 {
        return Ok(Vec::new());
    }

    Ok(rows
        .into_iter()
        .skip(1)
        .filter_map(|row| row.into_iter().nth(1))
        .collect())
}
