//! Validated configuration for the rating control.
//!
//! Options arrive either through typed setters or as a dynamic option bag
//! (a JSON object with camelCase keys). Every field is validated on its own:
//! an invalid value is dropped and the previous value kept, values above the
//! current maximum are clamped. Nothing here panics or returns an error for a
//! bad value; callers that care inspect the `bool` returned by a setter or the
//! [`AppliedOptions`] report.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Default number of stars.
pub const DEFAULT_MAX_RATING: u32 = 5;

/// Recognized option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `maxRating`
    MaxRating,
    /// `userRating`
    UserRating,
    /// `averageRating`
    AverageRating,
    /// `disabled`
    Disabled,
    /// `enableClear`
    EnableClear,
    /// `tooltipStrings`
    TooltipStrings,
}

impl OptionKey {
    /// All keys, in the order they are applied.
    ///
    /// `maxRating` comes first so ratings in the same update clamp against
    /// the new bound.
    pub const ALL: [Self; 6] = [
        Self::MaxRating,
        Self::UserRating,
        Self::AverageRating,
        Self::Disabled,
        Self::EnableClear,
        Self::TooltipStrings,
    ];

    /// Key as it appears in an option bag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaxRating => "maxRating",
            Self::UserRating => "userRating",
            Self::AverageRating => "averageRating",
            Self::Disabled => "disabled",
            Self::EnableClear => "enableClear",
            Self::TooltipStrings => "tooltipStrings",
        }
    }

    /// Look up a key by its option-bag name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason an option value was not accepted.
#[derive(Debug, Error)]
pub enum OptionError {
    /// Expected a literal boolean.
    #[error("'{key}' expects a boolean, got {found}")]
    NotABoolean {
        /// Option that was set
        key: OptionKey,
        /// Kind of value supplied
        found: &'static str,
    },

    /// Expected a number.
    #[error("'{key}' expects a number, got {found}")]
    NotANumber {
        /// Option that was set
        key: OptionKey,
        /// Kind of value supplied
        found: &'static str,
    },

    /// Expected a whole number.
    #[error("'{key}' expects an integer, got {value}")]
    NotAnInteger {
        /// Option that was set
        key: OptionKey,
        /// Value supplied
        value: f64,
    },

    /// Number outside the accepted range.
    #[error("'{key}' value {value} is out of range")]
    OutOfRange {
        /// Option that was set
        key: OptionKey,
        /// Value supplied
        value: f64,
    },

    /// Tooltips must be an array of strings or nulls.
    #[error("'tooltipStrings' expects an array of strings or nulls, found {found}")]
    InvalidTooltips {
        /// Offending value kind
        found: &'static str,
    },

    /// Option documents must be objects.
    #[error("options must be an object, got {found}")]
    NotAnObject {
        /// Kind of value supplied
        found: &'static str,
    },

    /// JSON document failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML document failed to parse.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Report of a call to [`RatingOptions::apply`].
#[derive(Debug, Default)]
pub struct AppliedOptions {
    /// Keys whose values took effect, in application order
    pub accepted: Vec<OptionKey>,
    /// Keys whose values were dropped, with the reason
    pub rejected: Vec<(OptionKey, OptionError)>,
    /// Unrecognized keys
    pub ignored: Vec<String>,
}

impl AppliedOptions {
    /// Check if the value for `key` took effect.
    #[must_use]
    pub fn is_accepted(&self, key: OptionKey) -> bool {
        self.accepted.contains(&key)
    }

    /// Get the rejection reason for `key`, if it was rejected.
    #[must_use]
    pub fn rejection(&self, key: OptionKey) -> Option<&OptionError> {
        self.rejected
            .iter()
            .find(|(rejected, _)| *rejected == key)
            .map(|(_, err)| err)
    }

    /// Check that nothing was rejected or ignored.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.ignored.is_empty()
    }
}

/// Rating configuration.
///
/// Invariant: `user_rating <= max_rating` and
/// `0.0 <= average_rating <= max_rating`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOptions {
    max_rating: u32,
    user_rating: u32,
    average_rating: f64,
    disabled: bool,
    enable_clear: bool,
    tooltip_strings: Option<Vec<Option<String>>>,
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingOptions {
    /// Create options with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_rating: DEFAULT_MAX_RATING,
            user_rating: 0,
            average_rating: 0.0,
            disabled: false,
            enable_clear: true,
            tooltip_strings: None,
        }
    }

    /// Parse a JSON option document and apply it over the defaults.
    ///
    /// Invalid individual values are dropped as with [`Self::apply`]; only a
    /// malformed document is an error.
    pub fn from_json_str(text: &str) -> Result<Self, OptionError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_document(&value)
    }

    /// Parse a YAML option document and apply it over the defaults.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, OptionError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml_ng::from_str(text)?;
        Self::from_document(&value)
    }

    fn from_document(value: &Value) -> Result<Self, OptionError> {
        if !(value.is_object() || value.is_null()) {
            return Err(OptionError::NotAnObject {
                found: json_kind(value),
            });
        }
        let mut options = Self::new();
        options.apply(value);
        Ok(options)
    }

    // === Read model ===

    /// Number of stars.
    #[must_use]
    pub const fn max_rating(&self) -> u32 {
        self.max_rating
    }

    /// Committed rating, 0 meaning "not rated".
    #[must_use]
    pub const fn user_rating(&self) -> u32 {
        self.user_rating
    }

    /// Average rating shown when the user has not rated.
    #[must_use]
    pub const fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Whether the control ignores input.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a gesture may clear the rating back to 0.
    #[must_use]
    pub const fn enable_clear(&self) -> bool {
        self.enable_clear
    }

    /// Tooltip strings as supplied.
    #[must_use]
    pub fn tooltip_strings(&self) -> Option<&[Option<String>]> {
        self.tooltip_strings.as_deref()
    }

    /// Tooltip for star `star` (1-based).
    ///
    /// Entries beyond `max_rating`, missing entries and null entries are all
    /// absent.
    #[must_use]
    pub fn tooltip(&self, star: u32) -> Option<&str> {
        if star == 0 || star > self.max_rating {
            return None;
        }
        self.tooltip_strings
            .as_ref()?
            .get(star as usize - 1)?
            .as_deref()
    }

    // === Typed setters ===

    /// Set the number of stars. Re-clamps both ratings.
    ///
    /// Returns `false` (keeping the previous value) unless `value > 0`.
    pub fn set_max_rating(&mut self, value: i64) -> bool {
        let result = validate_max_rating(value);
        settle(OptionKey::MaxRating, result, |max| self.store_max_rating(max))
    }

    /// Set the committed rating, clamped to `max_rating`.
    ///
    /// Returns `false` for negative values.
    pub fn set_user_rating(&mut self, value: i64) -> bool {
        let result = validate_user_rating(value);
        settle(OptionKey::UserRating, result, |rating| {
            self.user_rating = rating.min(self.max_rating);
        })
    }

    /// Set the average rating, clamped to `max_rating`.
    ///
    /// Returns `false` for negative or non-finite values.
    pub fn set_average_rating(&mut self, value: f64) -> bool {
        let result = validate_average_rating(value);
        settle(OptionKey::AverageRating, result, |average| {
            self.average_rating = average.min(f64::from(self.max_rating));
        })
    }

    /// Enable or disable input.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.disabled = disabled;
        true
    }

    /// Allow or forbid clearing the rating.
    pub fn set_enable_clear(&mut self, enable_clear: bool) -> bool {
        self.enable_clear = enable_clear;
        true
    }

    /// Replace the tooltip strings. Any length is accepted.
    pub fn set_tooltip_strings(&mut self, tooltips: Option<Vec<Option<String>>>) -> bool {
        self.tooltip_strings = tooltips;
        true
    }

    // === Option bag ===

    /// Apply a partial option bag.
    ///
    /// Each recognized key is validated independently; unrecognized keys are
    /// ignored. `null` applies nothing. A non-object value applies nothing
    /// and is logged.
    pub fn apply(&mut self, options: &Value) -> AppliedOptions {
        let mut applied = AppliedOptions::default();
        let map = match options {
            Value::Object(map) => map,
            Value::Null => return applied,
            other => {
                debug!(found = json_kind(other), "ignoring non-object rating options");
                return applied;
            }
        };

        for key in OptionKey::ALL {
            let Some(value) = map.get(key.as_str()) else {
                continue;
            };
            match self.apply_value(key, value) {
                Ok(()) => applied.accepted.push(key),
                Err(err) => {
                    debug!(%key, %value, error = %err, "rejected rating option");
                    applied.rejected.push((key, err));
                }
            }
        }

        for name in map.keys() {
            if OptionKey::from_name(name).is_none() {
                trace!(key = %name, "ignoring unrecognized rating option");
                applied.ignored.push(name.clone());
            }
        }

        applied
    }

    fn apply_value(&mut self, key: OptionKey, value: &Value) -> Result<(), OptionError> {
        match key {
            OptionKey::MaxRating => {
                let max = validate_max_rating(integer_value(key, value)?)?;
                self.store_max_rating(max);
            }
            OptionKey::UserRating => {
                let rating = validate_user_rating(integer_value(key, value)?)?;
                self.user_rating = rating.min(self.max_rating);
            }
            OptionKey::AverageRating => {
                let number = value.as_f64().ok_or(OptionError::NotANumber {
                    key,
                    found: json_kind(value),
                })?;
                let average = validate_average_rating(number)?;
                self.average_rating = average.min(f64::from(self.max_rating));
            }
            OptionKey::Disabled => self.disabled = boolean_value(key, value)?,
            OptionKey::EnableClear => self.enable_clear = boolean_value(key, value)?,
            OptionKey::TooltipStrings => self.tooltip_strings = tooltip_list(value)?,
        }
        Ok(())
    }

    fn store_max_rating(&mut self, max: u32) {
        self.max_rating = max;
        self.user_rating = self.user_rating.min(max);
        self.average_rating = self.average_rating.min(f64::from(max));
    }
}

fn settle<T>(key: OptionKey, result: Result<T, OptionError>, store: impl FnOnce(T)) -> bool {
    match result {
        Ok(value) => {
            store(value);
            true
        }
        Err(err) => {
            debug!(%key, error = %err, "rejected rating option");
            false
        }
    }
}

fn validate_max_rating(value: i64) -> Result<u32, OptionError> {
    u32::try_from(value)
        .ok()
        .filter(|max| *max > 0)
        .ok_or(OptionError::OutOfRange {
            key: OptionKey::MaxRating,
            value: value as f64,
        })
}

fn validate_user_rating(value: i64) -> Result<u32, OptionError> {
    if value < 0 {
        return Err(OptionError::OutOfRange {
            key: OptionKey::UserRating,
            value: value as f64,
        });
    }
    // Anything beyond u32 is clamped to max_rating anyway.
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

fn validate_average_rating(value: f64) -> Result<f64, OptionError> {
    if !value.is_finite() {
        return Err(OptionError::NotANumber {
            key: OptionKey::AverageRating,
            found: "non-finite number",
        });
    }
    if value < 0.0 {
        return Err(OptionError::OutOfRange {
            key: OptionKey::AverageRating,
            value,
        });
    }
    // Normalizes -0.0.
    Ok(if value == 0.0 { 0.0 } else { value })
}

fn integer_value(key: OptionKey, value: &Value) -> Result<i64, OptionError> {
    let Value::Number(number) = value else {
        return Err(OptionError::NotANumber {
            key,
            found: json_kind(value),
        });
    };
    if let Some(int) = number.as_i64() {
        return Ok(int);
    }
    let float = number.as_f64().unwrap_or(f64::NAN);
    if !float.is_finite() || float.fract() != 0.0 {
        return Err(OptionError::NotAnInteger { key, value: float });
    }
    if float.abs() < 9.0e18 {
        Ok(float as i64)
    } else {
        Err(OptionError::OutOfRange { key, value: float })
    }
}

fn boolean_value(key: OptionKey, value: &Value) -> Result<bool, OptionError> {
    value.as_bool().ok_or(OptionError::NotABoolean {
        key,
        found: json_kind(value),
    })
}

fn tooltip_list(value: &Value) -> Result<Option<Vec<Option<String>>>, OptionError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                Value::String(text) => Ok(Some(text.clone())),
                other => Err(OptionError::InvalidTooltips {
                    found: json_kind(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(OptionError::InvalidTooltips {
            found: json_kind(other),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
