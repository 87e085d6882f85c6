//! URL decomposition for tag derivation and compact display.

use url::Url;

/// Domain, path and query of one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSegments {
    /// Hostname; empty when the URL has none or does not parse.
    pub domain: String,
    /// Path without query or fragment; `/` when empty.
    pub path: String,
    /// Query string without the leading `?`; empty when absent.
    pub params: String,
}

impl UrlSegments {
    /// Splits `raw` into segments. Unparseable input yields an empty domain
    /// and `/` path instead of an error.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw.trim()) {
            Ok(url) => Self {
                domain: url.host_str().unwrap_or_default().to_string(),
                path: match url.path() {
                    "" => "/".to_string(),
                    path => path.to_string(),
                },
                params: url.query().unwrap_or_default().to_string(),
            },
            Err(_) => Self {
                domain: String::new(),
                path: "/".to_string(),
                params: String::new(),
            },
        }
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

/// Compact label: hostname plus the first non-empty path segment.
///
/// Falls back to the raw input when it does not parse as a URL.
pub fn display_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw.trim()) else {
        return raw.to_string();
    };
    let host = url.host_str().unwrap_or_default();
    let first_segment = url
        .path_segments()
        .and_then(|mut segments| segments.find(|segment| !segment.is_empty()));
    match first_segment {
        Some(segment) => format!("{host}/{segment}"),
        None => host.to_string(),
    }
}
