#![forbid(unsafe_code)]

//! Localization foundation for lexicon.
//!
//! Provides externalized string storage with dotted-key lookup,
//! `{{name}}` placeholder interpolation, keyed list resolution, and an
//! atomically switchable active locale.
//!
//! # Role in lexicon
//! `lexicon-i18n` is the render-time half of the workspace. UI hosts call
//! [`Localizer::resolve`] / [`Localizer::resolve_list`] and place the
//! returned strings into whatever markup they own. The crate has no
//! knowledge of tags, classes, or component state.
//!
//! # How it fits in the system
//! Catalogs are loaded once per locale through a [`CatalogLoader`]; the
//! [`Localizer`] holds the active snapshot and swaps it on
//! [`Localizer::set_locale`]. The offline scanner (`lexicon-scan`) does not
//! depend on this crate.
//!
//! # Example
//!
//! ```
//! use lexicon_i18n::{LocaleStrings, Params, resolve_in};
//!
//! let mut en = LocaleStrings::new();
//! en.insert("welcome.message", "Hello, {{name}}!");
//!
//! let params = Params::new().with("name", "Ann");
//! assert_eq!(resolve_in(&en, "welcome.message", Some(&params)), "Hello, Ann!");
//! assert_eq!(resolve_in(&en, "missing.key", None), "missing.key");
//! ```

pub mod catalog;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod localizer;

pub use catalog::{CoverageReport, Locale, LocaleCoverage, LocaleStrings, StringCatalog};
pub use error::{I18nError, Result};
pub use interpolate::{Interpolated, ParamValue, Params, interpolate, placeholders};
pub use loader::{CatalogLoader, DirLoader, MemoryLoader};
pub use localizer::{ListItem, Localizer, LocalizerOptions, derive_list_key, resolve_in};
