//! Language classification of feed text.
//!
//! Detection itself is delegated to `whatlang`. This module prepares the
//! sample (feed summaries routinely carry HTML), maps the ISO 639-3 result
//! onto the short codes used in output file names (`en`, `fr`, `zh-cn`, ...)
//! and turns every failure into [`UNKNOWN_LANGUAGE`].

use crate::error::ClassifyError;
use crate::models::UNKNOWN_LANGUAGE;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A text → language code function. May fail on empty or ambiguous input.
pub trait LanguageClassifier {
    fn detect(&self, text: &str) -> Result<String, ClassifyError>;
}

/// Classify `text`, mapping any failure to [`UNKNOWN_LANGUAGE`].
pub fn classify_or_unknown<C: LanguageClassifier + ?Sized>(classifier: &C, text: &str) -> String {
    if text.is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }
    match classifier.detect(text) {
        Ok(code) if !code.is_empty() => code,
        Ok(_) | Err(_) => UNKNOWN_LANGUAGE.to_string(),
    }
}

/// Strip markup and collapse whitespace so only readable text is classified.
pub fn prepare_sample(raw: &str) -> String {
    let text = if raw.contains('<') || raw.contains('&') {
        Html::parse_fragment(raw)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        raw.to_string()
    };
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Statistical trigram detector from `whatlang`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangClassifier;

impl LanguageClassifier for WhatlangClassifier {
    fn detect(&self, text: &str) -> Result<String, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptySample);
        }
        let info = whatlang::detect(text).ok_or(ClassifyError::Undetermined)?;
        Ok(short_code(info.lang().code()).to_string())
    }
}

/// Map an ISO 639-3 code onto its two-letter form. Codes without one are
/// returned unchanged.
pub fn short_code(iso639_3: &str) -> &str {
    match iso639_3 {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh-cn",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "no",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        other => other,
    }
}
