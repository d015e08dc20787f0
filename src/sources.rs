//! Feed source configuration.
//!
//! The built-in table covers one or two outlets per country or region. A
//! YAML file can replace it:
//!
//! ```yaml
//! - name: BBC (UK)
//!   url: http://feeds.bbci.co.uk/news/rss.xml
//!   country: United Kingdom
//! - name: NHK (Japan)
//!   url: https://www3.nhk.or.jp/rss/news/cat0.xml
//!   country: Japan
//! ```

use crate::models::SourceDescriptor;
use std::collections::HashSet;
use std::error::Error;
use tracing::{info, instrument, warn};

/// The built-in national news feeds as `(name, url, country)`.
const BUILTIN: &[(&str, &str, &str)] = &[
    ("BBC (UK)", "http://feeds.bbci.co.uk/news/rss.xml", "United Kingdom"),
    ("CNN (USA)", "http://rss.cnn.com/rss/edition.rss", "United States"),
    ("ABC (Australia)", "https://www.abc.net.au/news/feed/51120/rss.xml", "Australia"),
    ("Al Jazeera (Middle East)", "https://www.aljazeera.com/xml/rss/all.xml", "Middle East"),
    ("Times of India (India)", "https://timesofindia.indiatimes.com/rssfeeds/-2128936835.cms", "India"),
    ("NHK (Japan)", "https://www3.nhk.or.jp/rss/news/cat0.xml", "Japan"),
    ("The Straits Times (Singapore)", "https://www.straitstimes.com/news/singapore/rss.xml", "Singapore"),
    ("DW (Germany)", "https://rss.dw.com/rdf/rss-en-all", "Germany"),
    ("ANSA (Italy)", "https://www.ansa.it/sito/ansait_rss.xml", "Italy"),
    ("El País (Spain)", "https://feeds.elpais.com/mrss-s/pages/ep/site/elpais.com/portada", "Spain"),
    ("China Daily (China)", "http://www.chinadaily.com.cn/rss/china_rss.xml", "China"),
    ("Yonhap (South Korea)", "https://en.yna.co.kr/Service/RSS/main.xml", "South Korea"),
    ("Globo (Brazil)", "https://g1.globo.com/rss/g1/", "Brazil"),
    ("Punch (Nigeria)", "https://punchng.com/feed/", "Nigeria"),
    ("Hurriyet Daily News (Turkey)", "https://www.hurriyetdailynews.com/rss", "Turkey"),
    ("El Tiempo (Colombia)", "https://www.eltiempo.com/rss/colombia.xml", "Colombia"),
    ("The Star (Malaysia)", "https://www.thestar.com.my/rss", "Malaysia"),
    ("Dawn (Pakistan)", "https://www.dawn.com/feeds/home", "Pakistan"),
    ("VNExpress (Vietnam)", "https://vnexpress.net/rss", "Vietnam"),
    ("Tehran Times (Iran)", "https://www.tehrantimes.com/rss", "Iran"),
    ("Jerusalem Post (Israel)", "https://www.jpost.com/Rss/RssFeedsHeadlines.aspx", "Israel"),
    ("Ekathimerini (Greece)", "https://www.ekathimerini.com/rss/news/", "Greece"),
    ("NL Times (Netherlands)", "https://nltimes.nl/rss", "Netherlands"),
];

/// The built-in source table, in declaration order.
pub fn builtin_sources() -> Vec<SourceDescriptor> {
    BUILTIN
        .iter()
        .map(|(name, url, country)| SourceDescriptor::new(name, url, country))
        .collect()
}

/// Parse a YAML list of sources. Later entries reusing a name are dropped.
pub fn parse_sources(yaml: &str) -> Result<Vec<SourceDescriptor>, serde_yaml::Error> {
    let sources: Vec<SourceDescriptor> = serde_yaml::from_str(yaml)?;
    let mut names = HashSet::new();
    Ok(sources
        .into_iter()
        .filter(|s| {
            let fresh = names.insert(s.name.clone());
            if !fresh {
                warn!(name = %s.name, "Duplicate source name ignored");
            }
            fresh
        })
        .collect())
}

/// Load sources from `path`, or the built-in table when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a YAML list of
/// `name`/`url`/`country` mappings.
#[instrument(level = "info")]
pub async fn load_sources(path: Option<&str>) -> Result<Vec<SourceDescriptor>, Box<dyn Error>> {
    let sources = match path {
        Some(path) => {
            let yaml = tokio::fs::read_to_string(path).await?;
            parse_sources(&yaml)?
        }
        None => builtin_sources(),
    };
    info!(count = sources.len(), "Loaded feed sources");
    Ok(sources)
}
