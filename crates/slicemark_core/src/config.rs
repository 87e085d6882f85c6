//! User configuration resolved at read time.
//!
//! # Responsibility
//! - Hold tunables that the extension historically hard-coded.
//! - Load from the `settings` document, falling back to defaults.
//!
//! # Invariants
//! - A loaded config always passes [`SliceMarkConfig::validate`].
//! - The grid width is not configurable; it is fixed at `TOTAL_COLS`.

use crate::grid::place::RowInsertPolicy;
use crate::model::canvas::{DEFAULT_CARD_LEN, DEFAULT_ROW_HEIGHT, TOTAL_COLS};
use crate::model::mark::{normalize_color, DEFAULT_MARK_COLOR};
use crate::store::{load_optional, DocumentStore, StoreResult, SETTINGS_KEY};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Text given to captured cards whose title was left blank.
pub const DEFAULT_CARD_TEXT: &str = "marktext";

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDefaultLen(u8),
    InvalidDefaultColor(String),
    BlankDefaultText,
    InvalidRowHeight,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDefaultLen(len) => {
                write!(f, "default_item_len {len} is outside [1, {TOTAL_COLS}]")
            }
            Self::InvalidDefaultColor(color) => {
                write!(f, "default_mark_color `{color}` is not a hex color")
            }
            Self::BlankDefaultText => write!(f, "default_item_text must not be blank"),
            Self::InvalidRowHeight => write!(f, "default_row_height must be positive"),
        }
    }
}

impl Error for ConfigError {}

/// SliceMark tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceMarkConfig {
    /// Where new rows go when no row has room.
    pub row_insert_policy: RowInsertPolicy,
    pub default_item_len: u8,
    pub default_item_text: String,
    pub default_row_height: f64,
    pub default_mark_color: String,
}

impl Default for SliceMarkConfig {
    fn default() -> Self {
        Self {
            row_insert_policy: RowInsertPolicy::Top,
            default_item_len: DEFAULT_CARD_LEN,
            default_item_text: DEFAULT_CARD_TEXT.to_string(),
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_mark_color: DEFAULT_MARK_COLOR.to_string(),
        }
    }
}

impl SliceMarkConfig {
    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_item_len == 0 || self.default_item_len > TOTAL_COLS {
            return Err(ConfigError::InvalidDefaultLen(self.default_item_len));
        }
        if self.default_item_text.trim().is_empty() {
            return Err(ConfigError::BlankDefaultText);
        }
        if !(self.default_row_height.is_finite() && self.default_row_height > 0.0) {
            return Err(ConfigError::InvalidRowHeight);
        }
        normalize_color(&self.default_mark_color)
            .map_err(|_| ConfigError::InvalidDefaultColor(self.default_mark_color.clone()))?;
        Ok(())
    }

    /// Loads config from `store`, resolving absent fields to defaults.
    ///
    /// An invalid stored config is logged and replaced by the defaults.
    pub fn load<S: DocumentStore + ?Sized>(store: &S) -> StoreResult<Self> {
        let Some(config) = load_optional::<Self, S>(store, SETTINGS_KEY)? else {
            return Ok(Self::default());
        };
        match config.validate() {
            Ok(()) => Ok(config),
            Err(err) => {
                warn!("event=config_load module=config status=fallback reason=\"{err}\"");
                Ok(Self::default())
            }
        }
    }
}
