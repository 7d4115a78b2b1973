//! Translation catalogs: per-locale key → template maps.
//!
//! # Invariants
//!
//! 1. **Flat keys**: nested catalog sources are flattened to dotted keys
//!    (`nav.home`), and arrays to indexed keys (`steps.0`, `steps.1`).
//!
//! 2. **Immutable after load**: a `LocaleStrings` is built once and then
//!    shared behind an `Arc`; locale switches replace the whole snapshot.
//!
//! 3. **Thread safety**: `StringCatalog` and `LocaleStrings` are
//!    `Send + Sync`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in the locale | `get` returns `None` |
//! | Missing locale | Locale not loaded | `get` returns `None` |
//! | Non-object JSON root | Catalog file is an array/string | `I18nError::Parse` |
//! | `null` value | JSON entry is `null` | Entry skipped |

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{I18nError, Result};

/// Locale identifier (e.g., `"en"`, `"de"`, `"pt-BR"`).
pub type Locale = String;

/// Strings for a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty locale string set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat or nested JSON object into a string set.
    ///
    /// ```
    /// use lexicon_i18n::LocaleStrings;
    ///
    /// let strings = LocaleStrings::from_json_str(
    ///     r#"{ "nav": { "home": "Home" }, "steps": ["One", "Two"] }"#,
    /// ).unwrap();
    /// assert_eq!(strings.get("nav.home"), Some("Home"));
    /// assert_eq!(strings.get("steps.1"), Some("Two"));
    /// ```
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| I18nError::parse("", e.to_string()))?;
        Self::from_json_value(value)
    }

    /// Flatten an already-parsed JSON object.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(I18nError::parse("", "catalog root must be a JSON object"));
        };
        let mut strings = Self::new();
        for (key, child) in map {
            strings.flatten_into(key, child);
        }
        Ok(strings)
    }

    fn flatten_into(&mut self, key: String, value: Value) {
        match value {
            Value::Null => {}
            Value::String(s) => self.insert(key, s),
            Value::Bool(b) => self.insert(key, b.to_string()),
            Value::Number(n) => self.insert(key, n.to_string()),
            Value::Array(items) => {
                for (idx, item) in items.into_iter().enumerate() {
                    self.flatten_into(format!("{key}.{idx}"), item);
                }
            }
            Value::Object(map) => {
                for (child_key, child) in map {
                    self.flatten_into(format!("{key}.{child_key}"), child);
                }
            }
        }
    }

    /// Insert a template string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Look up a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the locale has no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all keys in this locale.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for LocaleStrings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut strings = Self::new();
        for (key, value) in iter {
            strings.insert(key, value);
        }
        strings
    }
}

/// All loaded locales. Lookups never cross locales; fallback is the
/// [`Localizer`](crate::Localizer)'s job.
///
/// # Example
///
/// ```
/// use lexicon_i18n::{LocaleStrings, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale("en", [("greeting", "Hello"), ("bye", "Bye")].into_iter().collect());
/// catalog.add_locale("de", [("greeting", "Hallo")].into_iter().collect());
///
/// assert_eq!(catalog.get("de", "greeting"), Some("Hallo"));
/// assert_eq!(catalog.get("de", "bye"), None);
/// assert_eq!(catalog.missing_keys("de", &["greeting", "bye"]), vec!["bye"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
}

impl StringCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) strings for a locale.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        self.locales.insert(locale.into(), strings);
    }

    /// Strings for one locale.
    #[must_use]
    pub fn locale(&self, locale: &str) -> Option<&LocaleStrings> {
        self.locales.get(locale)
    }

    /// Look up a template by key in one locale.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales.get(locale)?.get(key)
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    // -----------------------------------------------------------------
    // Extraction & Coverage
    // -----------------------------------------------------------------

    /// Collect all unique keys across every registered locale, sorted.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .locales
            .values()
            .flat_map(|ls| ls.keys().map(String::from))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Keys from `reference_keys` that are missing in `locale`, sorted
    /// alphabetically.
    #[must_use]
    pub fn missing_keys(&self, locale: &str, reference_keys: &[&str]) -> Vec<String> {
        let mut missing: Vec<String> = reference_keys
            .iter()
            .filter(|key| self.get(locale, key).is_none())
            .map(|key| (*key).to_string())
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Coverage of the full key set for every locale.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_keys();
        let ref_keys: Vec<&str> = all.iter().map(String::as_str).collect();
        let total = ref_keys.len();

        let locales = self
            .locales()
            .into_iter()
            .map(|tag| {
                let missing = self.missing_keys(tag, &ref_keys);
                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale: tag.to_string(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_keys: total,
            locales,
        }
    }
}

/// Coverage report for a string catalog.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Total number of unique keys across all locales.
    pub total_keys: usize,
    /// Per-locale coverage data, sorted by locale tag.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// Whether every locale exposes the full key set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales.iter().all(|lc| lc.missing.is_empty())
    }
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: String,
    /// Number of reference keys present.
    pub present: usize,
    /// Keys from the reference set that are missing.
    pub missing: Vec<String>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}
