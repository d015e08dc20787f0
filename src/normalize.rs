//! Mapping of raw feed entries onto [`NewsItem`].
//!
//! Normalization never fails. Missing fields become [`NOT_AVAILABLE`], the
//! title is trimmed, and the language comes from the summary, or from the
//! title when the summary has no readable text.

use crate::language::{LanguageClassifier, classify_or_unknown, prepare_sample};
use crate::models::{NOT_AVAILABLE, NewsItem, RawFeedEntry, SourceDescriptor};

/// Build the canonical record for one entry of `source`.
pub fn normalize<C: LanguageClassifier + ?Sized>(
    raw: RawFeedEntry,
    source: &SourceDescriptor,
    classifier: &C,
) -> NewsItem {
    let sample = detection_sample(&raw);
    let language = classify_or_unknown(classifier, &sample);

    let title = match raw.title {
        Some(t) => t.trim().to_string(),
        None => NOT_AVAILABLE.to_string(),
    };

    NewsItem {
        title,
        publication_date: raw.published.unwrap_or_else(na),
        source: source.name.clone(),
        country: source.country.clone(),
        summary: raw.summary.unwrap_or_else(na),
        url: raw.link.unwrap_or_else(na),
        language,
    }
}

/// Text handed to the classifier: the cleaned summary, falling back to the
/// cleaned title. Empty when neither has readable text.
pub fn detection_sample(raw: &RawFeedEntry) -> String {
    let summary = raw.summary.as_deref().map(prepare_sample).unwrap_or_default();
    if !summary.is_empty() {
        return summary;
    }
    raw.title.as_deref().map(prepare_sample).unwrap_or_default()
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}
