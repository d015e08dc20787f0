//! Error types for feed retrieval and language classification.
//!
//! Only [`FetchError::Timeout`], [`FetchError::Http`] and
//! [`FetchError::Network`] ever abort a source. The other kinds are absorbed
//! where they occur: parse failures become an empty entry list, archive index
//! failures become an empty snapshot list, and [`ClassifyError`] becomes the
//! `"Unknown"` language.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("feed document could not be parsed: {reason}")]
    Parse { reason: String },

    #[error("archive index response from {url} was not a table: {source}")]
    ArchiveIndex {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Map a reqwest failure for `url`, keeping timeouts distinguishable.
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no text to classify")]
    EmptySample,

    #[error("language could not be determined")]
    Undetermined,
}
