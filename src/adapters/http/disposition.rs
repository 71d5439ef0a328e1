//! Filename extraction from `Content-Disposition`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name used when the disposition header is missing or has no filename.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

// Accepts `filename=a.pdf`, `filename="a.pdf"`, `filename='a.pdf'` and
// `filename*=UTF-8''a%20b.pdf`; the first occurrence wins.
static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)filename\*?=(?:UTF-8'')?["']?([^;"']+)["']?"#)
        .expect("filename pattern is valid")
});

/// Derives the download filename from a `Content-Disposition` value.
///
/// Percent-encoding is decoded; a value that does not decode to UTF-8 is
/// used as written.
pub fn filename_from_disposition(disposition: Option<&str>) -> String {
    let raw = disposition
        .and_then(|value| FILENAME_PATTERN.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty());

    match raw {
        Some(name) => urlencoding::decode(name)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| name.to_string()),
        None => DEFAULT_DOWNLOAD_NAME.to_string(),
    }
}
