//! Bookmark, text mark and tab metadata records.
//!
//! # Responsibility
//! - Define the versioned record schema for flat mark lists.
//! - Resolve optional fields (`labels`, `color`, `id`) at read time.
//!
//! # Invariants
//! - Every record carries a stable `id`; legacy records without one get a
//!   fresh id from [`MarkRecord::upgrade`], which callers must persist.
//! - `color` is always a `#rgb` or `#rrggbb` hex string.
//! - Labels are trimmed and never empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Current record schema version written by this crate.
///
/// Version 0 is any record persisted before the field existed.
pub const MARK_SCHEMA_VERSION: u32 = 1;
/// Color assigned to marks that never had one.
pub const DEFAULT_MARK_COLOR: &str = "#ffffff";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color regex"));

/// Stable mark identifier.
pub type MarkId = String;

/// Generates a fresh mark id.
pub fn new_mark_id() -> MarkId {
    Uuid::new_v4().to_string()
}

fn default_color() -> String {
    DEFAULT_MARK_COLOR.to_string()
}

/// Milliseconds since unix epoch, clamped to zero on clock skew.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Validation failures for mark fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkValidationError {
    /// Color is not a `#rgb`/`#rrggbb` hex literal.
    InvalidColor(String),
}

impl Display for MarkValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`"),
        }
    }
}

impl Error for MarkValidationError {}

/// Validates and lowercases one hex color literal.
pub fn normalize_color(value: &str) -> Result<String, MarkValidationError> {
    let trimmed = value.trim();
    if !HEX_COLOR_RE.is_match(trimmed) {
        return Err(MarkValidationError::InvalidColor(value.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Splits comma-separated label input into trimmed, non-empty labels.
///
/// Order is preserved; duplicates are kept once, first occurrence wins.
pub fn parse_labels(input: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in input.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Common surface over stored mark records.
pub trait MarkRecord {
    fn id(&self) -> &str;
    /// Natural key used by legacy reorder/delete paths (url or text).
    fn natural_key(&self) -> &str;
    fn labels(&self) -> &[String];
    fn set_labels(&mut self, labels: Vec<String>);
    fn set_color(&mut self, color: String);
    /// Brings a record read from storage up to [`MARK_SCHEMA_VERSION`] and
    /// assigns a missing id. Returns `true` when anything changed.
    fn upgrade(&mut self) -> bool;
}

/// Saved page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: MarkId,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
    /// Epoch ms; serialized as `timestamp` to match stored documents.
    #[serde(default, rename = "timestamp")]
    pub created_at: i64,
    #[serde(default)]
    pub schema_version: u32,
}

impl Bookmark {
    /// Creates a bookmark with no labels and the default color.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: new_mark_id(),
            url: url.into(),
            title: title.into(),
            labels: Vec::new(),
            color: default_color(),
            created_at: now_epoch_ms(),
            schema_version: MARK_SCHEMA_VERSION,
        }
    }
}

impl MarkRecord for Bookmark {
    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> &str {
        &self.url
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    fn set_color(&mut self, color: String) {
        self.color = color;
    }

    fn upgrade(&mut self) -> bool {
        upgrade_common(
            &mut self.id,
            &mut self.labels,
            &mut self.color,
            &mut self.schema_version,
        )
    }
}

/// Saved text snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMark {
    #[serde(default)]
    pub id: MarkId,
    pub text: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, rename = "timestamp")]
    pub created_at: i64,
    #[serde(default)]
    pub schema_version: u32,
}

impl TextMark {
    /// Creates a text mark with no labels and the default color.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_mark_id(),
            text: text.into(),
            labels: Vec::new(),
            color: default_color(),
            created_at: now_epoch_ms(),
            schema_version: MARK_SCHEMA_VERSION,
        }
    }
}

impl MarkRecord for TextMark {
    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> &str {
        &self.text
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    fn set_color(&mut self, color: String) {
        self.color = color;
    }

    fn upgrade(&mut self) -> bool {
        upgrade_common(
            &mut self.id,
            &mut self.labels,
            &mut self.color,
            &mut self.schema_version,
        )
    }
}

fn upgrade_common(
    id: &mut MarkId,
    labels: &mut Vec<String>,
    color: &mut String,
    schema_version: &mut u32,
) -> bool {
    let mut changed = false;
    if id.trim().is_empty() {
        *id = new_mark_id();
        changed = true;
    }
    if *schema_version < MARK_SCHEMA_VERSION {
        *labels = parse_labels(&labels.join(","));
        *color = normalize_color(color).unwrap_or_else(|_| default_color());
        *schema_version = MARK_SCHEMA_VERSION;
        changed = true;
    }
    changed
}

/// Host tab id as reported by the browser.
pub type TabId = i64;

/// User metadata attached to one open tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabMetadata {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for TabMetadata {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            color: default_color(),
        }
    }
}

/// Persisted tab metadata map, keyed by host tab id.
pub type TabMetadataMap = BTreeMap<TabId, TabMetadata>;

/// Open tab as reported by the host, joined with stored metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub tab_id: TabId,
    /// Position of the tab in its window strip.
    pub index: u32,
    pub url: String,
    pub title: String,
    pub metadata: TabMetadata,
}

impl TabView {
    /// Custom labels when present, otherwise the tab title as sole label.
    pub fn effective_labels(&self) -> Vec<String> {
        if !self.metadata.labels.is_empty() {
            return self.metadata.labels.clone();
        }
        if self.title.is_empty() {
            Vec::new()
        } else {
            vec![self.title.clone()]
        }
    }
}
