//! Feed document parsing.
//!
//! Parsing is delegated to `feed-rs`, which understands RSS 0.9x/1.0/2.0,
//! Atom and JSON Feed. Only the four fields the pipeline relies on are kept.
//!
//! Publication dates are kept as the text the feed carries. `feed-rs` only
//! exposes dates it managed to parse, so the raw `pubDate`/`published` text
//! of each item is read in a second pass with `quick-xml` and paired with
//! the parsed entries by position. The parsed date, rendered as RFC 2822, is
//! only used when no raw text is available (JSON Feed, or an XML document
//! whose items could not be paired up).
//!
//! A malformed document is not an error for the pipeline: [`parse_feed`]
//! returns an empty list for it, the same as for a feed with no entries.
//! [`try_parse_feed`] keeps the failure visible for callers that care.

use crate::error::FetchError;
use crate::models::RawFeedEntry;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, instrument};

/// Parse a feed document, failing on anything `feed-rs` rejects.
pub fn try_parse_feed(body: &[u8]) -> Result<Vec<RawFeedEntry>, FetchError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| FetchError::Parse {
        reason: e.to_string(),
    })?;

    let raw_dates = raw_entry_dates(body).filter(|dates| dates.len() == feed.entries.len());
    if raw_dates.is_none() && !feed.entries.is_empty() {
        debug!("Raw dates unavailable; using parsed dates");
    }
    let mut raw_dates = raw_dates.unwrap_or_default().into_iter();

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let raw = raw_dates.next().flatten();
            RawFeedEntry {
                title: entry.title.map(|t| t.content),
                published: raw.or_else(|| entry.published.map(|dt| dt.to_rfc2822())),
                summary: entry.summary.map(|t| t.content),
                link: entry.links.into_iter().next().map(|l| l.href),
            }
        })
        .collect();

    Ok(entries)
}

/// Parse a feed document, degrading to no entries when it is malformed.
#[instrument(level = "debug", skip_all, fields(bytes = body.len()))]
pub fn parse_feed(body: &[u8]) -> Vec<RawFeedEntry> {
    match try_parse_feed(body) {
        Ok(entries) => {
            debug!(count = entries.len(), "Parsed feed entries");
            entries
        }
        Err(e) => {
            debug!(error = %e, "Unparsable feed treated as empty");
            Vec::new()
        }
    }
}

fn is_entry(name: &[u8]) -> bool {
    matches!(name, b"item" | b"entry")
}

fn is_date(name: &[u8]) -> bool {
    matches!(name, b"pubDate" | b"published" | b"issued")
}

/// Trimmed publication date text of every `<item>`/`<entry>`, in document order.
///
/// # Returns
///
/// * `Some(dates)` - one slot per item; `None` where the item has no date text
/// * `None` - the document is not well-formed XML
fn raw_entry_dates(body: &[u8]) -> Option<Vec<Option<String>>> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut dates = Vec::new();
    let mut in_entry = false;
    let mut capturing = false;
    let mut current: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if is_entry(name.as_ref()) && !in_entry {
                    in_entry = true;
                    current = None;
                } else if in_entry && current.is_none() && is_date(name.as_ref()) {
                    capturing = true;
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if !in_entry && is_entry(e.local_name().as_ref()) {
                    dates.push(None);
                }
            }
            Ok(Event::Text(t)) if capturing => text.push_str(&t.decode().ok()?),
            Ok(Event::CData(t)) if capturing => text.push_str(&t.decode().ok()?),
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if capturing && is_date(name.as_ref()) {
                    capturing = false;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        current = Some(trimmed.to_string());
                    }
                } else if in_entry && is_entry(name.as_ref()) {
                    in_entry = false;
                    dates.push(current.take());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }

    Some(dates)
}
