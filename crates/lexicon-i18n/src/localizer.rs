//! Render-time key resolution against a switchable active locale.
//!
//! # Invariants
//!
//! 1. **Never fails by default**: a missing key resolves to the key itself
//!    and a missing parameter leaves its `{{name}}` token in place.
//! 2. **Snapshot reads**: every `resolve*` call loads the active catalog
//!    once, so a concurrent [`Localizer::set_locale`] is either fully
//!    visible or not at all. `resolve_list` reads one snapshot for the
//!    whole list.
//! 3. **Serialized switches**: `set_locale` calls queue on a FIFO lock;
//!    the last call to complete wins. A failed load leaves the previous
//!    catalog active.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::catalog::{Locale, LocaleStrings};
use crate::error::{I18nError, Result};
use crate::interpolate::{Params, interpolate};
use crate::loader::CatalogLoader;

/// One entry of a list resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Sub-key appended to the prefix (`prefix.item`).
    Key(String),
    /// Position appended to the prefix (`prefix.0`).
    Index(usize),
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for ListItem {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for ListItem {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for ListItem {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Full key for a list item under `prefix`.
#[must_use]
pub fn derive_list_key(prefix: &str, item: &ListItem) -> String {
    format!("{prefix}.{item}")
}

/// Resolve `key` against an explicitly passed catalog.
///
/// This is the stateless form of [`Localizer::resolve_with`]: missing keys
/// return the key, missing parameters stay as `{{name}}` tokens.
#[must_use]
pub fn resolve_in(strings: &LocaleStrings, key: &str, params: Option<&Params>) -> String {
    match (strings.get(key), params) {
        (None, _) => key.to_string(),
        (Some(template), None) => template.to_string(),
        (Some(template), Some(params)) => interpolate(template, params).text,
    }
}

/// Host-facing localizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocalizerOptions {
    /// Locale activated at startup.
    pub default_locale: Locale,
    /// Locale consulted when the active one lacks a key.
    pub fallback_locale: Option<Locale>,
}

impl Default for LocalizerOptions {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            fallback_locale: None,
        }
    }
}

#[derive(Debug)]
struct ActiveCatalog {
    locale: Locale,
    strings: LocaleStrings,
}

#[derive(Debug)]
struct Fallback {
    locale: Locale,
    strings: LocaleStrings,
}

/// Resolves translation keys for the active locale.
///
/// # Example
///
/// ```
/// use lexicon_i18n::{Localizer, MemoryLoader, Params, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale("en", [("welcome.message", "Hello, {{name}}!")].into_iter().collect());
/// let en = catalog.locale("en").cloned().unwrap_or_default();
///
/// let localizer = Localizer::new(MemoryLoader::new(catalog), "en", en);
/// let params = Params::new().with("name", "Ann");
/// assert_eq!(localizer.resolve_with("welcome.message", &params), "Hello, Ann!");
/// assert_eq!(localizer.resolve_list(["a", "b"], "menu"), vec!["menu.a", "menu.b"]);
/// ```
pub struct Localizer<L> {
    loader: L,
    active: ArcSwap<ActiveCatalog>,
    fallback: Option<Fallback>,
    switching: Mutex<()>,
}

impl<L: fmt::Debug> fmt::Debug for Localizer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("loader", &self.loader)
            .field("locale", &self.active.load().locale)
            .field("fallback", &self.fallback.as_ref().map(|fb| &fb.locale))
            .finish()
    }
}

impl<L: CatalogLoader> Localizer<L> {
    /// Create a localizer with an already-loaded initial catalog.
    pub fn new(loader: L, locale: impl Into<String>, strings: LocaleStrings) -> Self {
        Self {
            loader,
            active: ArcSwap::from_pointee(ActiveCatalog {
                locale: locale.into(),
                strings,
            }),
            fallback: None,
            switching: Mutex::new(()),
        }
    }

    /// Consult `strings` for keys the active locale lacks. The fallback is
    /// fixed for the localizer's lifetime; `set_locale` does not reload it.
    #[must_use]
    pub fn with_fallback(mut self, locale: impl Into<String>, strings: LocaleStrings) -> Self {
        self.fallback = Some(Fallback {
            locale: locale.into(),
            strings,
        });
        self
    }

    /// Load the default (and fallback, if any) locale through `loader`.
    pub async fn from_options(loader: L, options: &LocalizerOptions) -> Result<Self> {
        let strings = loader.load(&options.default_locale).await?;
        let fallback = match &options.fallback_locale {
            Some(locale) => Some((locale.clone(), loader.load(locale).await?)),
            None => None,
        };

        let localizer = Self::new(loader, options.default_locale.clone(), strings);
        Ok(match fallback {
            Some((locale, strings)) => localizer.with_fallback(locale, strings),
            None => localizer,
        })
    }

    /// Identifier of the active locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.active.load().locale.clone()
    }

    /// Identifier of the fallback locale, if configured.
    #[must_use]
    pub fn fallback_locale(&self) -> Option<&str> {
        self.fallback.as_ref().map(|fb| fb.locale.as_str())
    }

    #[must_use]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn lookup<'a>(&'a self, active: &'a ActiveCatalog, key: &str) -> Option<&'a str> {
        active
            .strings
            .get(key)
            .or_else(|| self.fallback.as_ref()?.strings.get(key))
    }

    fn resolve_from(&self, active: &ActiveCatalog, key: &str, params: Option<&Params>) -> String {
        let Some(template) = self.lookup(active, key) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(locale = %active.locale, key, "missing translation key");
            return key.to_string();
        };
        let Some(params) = params else {
            return template.to_string();
        };

        let rendered = interpolate(template, params);
        #[cfg(feature = "tracing")]
        if !rendered.unresolved.is_empty() {
            tracing::debug!(
                locale = %active.locale,
                key,
                unresolved = ?rendered.unresolved,
                "unresolved placeholders"
            );
        }
        rendered.text
    }

    /// Resolve `key` without interpolation.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        let active = self.active.load();
        self.resolve_from(&active, key, None)
    }

    /// Resolve `key` and substitute `{{name}}` placeholders from `params`.
    #[must_use]
    pub fn resolve_with(&self, key: &str, params: &Params) -> String {
        let active = self.active.load();
        self.resolve_from(&active, key, Some(params))
    }

    /// Strict resolution: report missing keys and, when `params` is given,
    /// placeholders without a value.
    pub fn try_resolve(&self, key: &str, params: Option<&Params>) -> Result<String> {
        let active = self.active.load();
        let template =
            self.lookup(&active, key)
                .ok_or_else(|| I18nError::MissingTranslationKey {
                    locale: active.locale.clone(),
                    key: key.to_string(),
                })?;
        let Some(params) = params else {
            return Ok(template.to_string());
        };

        let rendered = interpolate(template, params);
        match rendered.unresolved.into_iter().next() {
            Some(placeholder) => Err(I18nError::UnresolvedPlaceholder {
                key: key.to_string(),
                placeholder,
            }),
            None => Ok(rendered.text),
        }
    }

    /// Resolve each item under `prefix`, preserving input order.
    pub fn resolve_list<I>(&self, items: I, prefix: &str) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: Into<ListItem>,
    {
        let active = self.active.load();
        items
            .into_iter()
            .map(|item| {
                let key = derive_list_key(prefix, &item.into());
                self.resolve_from(&active, &key, None)
            })
            .collect()
    }

    /// Load `locale` and make it the active catalog.
    pub async fn set_locale(&self, locale: &str) -> Result<()> {
        let _switch = self.switching.lock().await;
        let strings = self.loader.load(locale).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(locale, keys = strings.len(), "active locale switched");

        self.active.store(Arc::new(ActiveCatalog {
            locale: locale.to_string(),
            strings,
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::StringCatalog;
    use crate::loader::MemoryLoader;

    fn catalog() -> StringCatalog {
        let mut catalog = StringCatalog::new();
        catalog.add_locale(
            "en",
            [
                ("welcome.message", "Hello, {{name}}!"),
                ("menu.home", "Home"),
                ("menu.about", "About"),
                ("steps.0", "First"),
                ("steps.1", "Second"),
                ("empty", ""),
                ("only.en", "English only"),
            ]
            .into_iter()
            .collect(),
        );
        catalog.add_locale(
            "de",
            [
                ("welcome.message", "Hallo, {{name}}!"),
                ("menu.home", "Startseite"),
            ]
            .into_iter()
            .collect(),
        );
        catalog
    }

    fn localizer(locale: &str) -> Localizer<MemoryLoader> {
        let catalog = catalog();
        let strings = catalog.locale(locale).cloned().unwrap_or_default();
        Localizer::new(MemoryLoader::new(catalog), locale, strings)
    }

    #[test]
    fn resolves_with_params() {
        let l = localizer("en");
        let params = Params::new().with("name", "Ann");
        assert_eq!(l.resolve_with("welcome.message", &params), "Hello, Ann!");
    }

    #[test]
    fn missing_key_returns_key() {
        let l = localizer("en");
        assert_eq!(l.resolve("nope.nothing"), "nope.nothing");
        let once = l.resolve("nope.nothing");
        assert_eq!(l.resolve(&once), once);
    }

    #[test]
    fn empty_template_is_not_missing() {
        let l = localizer("en");
        assert_eq!(l.resolve("empty"), "");
        assert_eq!(l.try_resolve("empty", None).unwrap(), "");
    }

    #[test]
    fn no_params_returns_raw_template() {
        let l = localizer("en");
        assert_eq!(l.resolve("welcome.message"), "Hello, {{name}}!");
    }

    #[test]
    fn resolve_list_derives_keys_in_order() {
        let l = localizer("en");
        assert_eq!(l.resolve_list(["about", "home"], "menu"), vec!["About", "Home"]);
        assert_eq!(l.resolve_list([0usize, 1], "steps"), vec!["First", "Second"]);
        assert_eq!(l.resolve_list([2usize], "steps"), vec!["steps.2"]);
        assert!(l.resolve_list(Vec::<ListItem>::new(), "menu").is_empty());
    }

    #[test]
    fn derive_list_key_formats() {
        assert_eq!(derive_list_key("p", &ListItem::from("a")), "p.a");
        assert_eq!(derive_list_key("p", &ListItem::from(3usize)), "p.3");
    }

    #[test]
    fn resolve_in_uses_explicit_catalog() {
        let strings: LocaleStrings = [("k", "v {{x}}")].into_iter().collect();
        let params = Params::new().with("x", 1);
        assert_eq!(resolve_in(&strings, "k", Some(&params)), "v 1");
        assert_eq!(resolve_in(&strings, "k", None), "v {{x}}");
        assert_eq!(resolve_in(&LocaleStrings::new(), "anything", None), "anything");
    }

    #[test]
    fn strict_mode_reports_missing_key_and_placeholder() {
        let l = localizer("en");
        let err = l.try_resolve("nope", None).unwrap_err();
        assert!(matches!(
            err,
            I18nError::MissingTranslationKey { ref locale, ref key } if locale == "en" && key == "nope"
        ));

        let err = l
            .try_resolve("welcome.message", Some(&Params::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            I18nError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "name"
        ));

        let params = Params::new().with("name", "Ann");
        assert_eq!(
            l.try_resolve("welcome.message", Some(&params)).unwrap(),
            "Hello, Ann!"
        );
    }

    #[test]
    fn fallback_fills_missing_keys() {
        let catalog = catalog();
        let de = catalog.locale("de").cloned().unwrap_or_default();
        let en = catalog.locale("en").cloned().unwrap_or_default();
        let l = Localizer::new(MemoryLoader::new(catalog), "de", de).with_fallback("en", en);

        assert_eq!(l.fallback_locale(), Some("en"));
        assert_eq!(l.resolve("menu.home"), "Startseite");
        assert_eq!(l.resolve("only.en"), "English only");
        assert_eq!(l.resolve("nowhere"), "nowhere");
    }

    #[tokio::test]
    async fn set_locale_switches_catalog() {
        let l = localizer("en");
        l.set_locale("de").await.unwrap();
        assert_eq!(l.locale(), "de");
        assert_eq!(l.resolve("menu.home"), "Startseite");
        assert_eq!(l.resolve("menu.about"), "menu.about");
    }

    #[tokio::test]
    async fn failed_switch_keeps_previous_catalog() {
        let l = localizer("en");
        let err = l.set_locale("xx").await.unwrap_err();
        assert!(matches!(err, I18nError::UnknownLocale { .. }));
        assert_eq!(l.locale(), "en");
        assert_eq!(l.resolve("menu.home"), "Home");
    }

    #[tokio::test]
    async fn from_options_loads_default_and_fallback() {
        let options = LocalizerOptions {
            default_locale: "de".to_string(),
            fallback_locale: Some("en".to_string()),
        };
        let l = Localizer::from_options(MemoryLoader::new(catalog()), &options)
            .await
            .unwrap();
        assert_eq!(l.locale(), "de");
        assert_eq!(l.resolve("only.en"), "English only");
    }

    #[tokio::test]
    async fn fallback_is_fixed_across_switches() {
        // The loader has no "fr"; a reload on switch would fail.
        let fr: LocaleStrings = [("only.fr", "Français")].into_iter().collect();
        let l = localizer("en").with_fallback("fr", fr);

        l.set_locale("de").await.unwrap();
        assert_eq!(l.fallback_locale(), Some("fr"));
        assert_eq!(l.resolve("only.fr"), "Français");
        assert_eq!(l.resolve("menu.home"), "Startseite");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: LocalizerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, LocalizerOptions::default());
        let options: LocalizerOptions =
            serde_json::from_str(r#"{ "fallback_locale": "en" }"#).unwrap();
        assert_eq!(options.default_locale, "en");
        assert_eq!(options.fallback_locale.as_deref(), Some("en"));
    }

    /// Loader that sleeps before returning, to hold a switch open.
    struct SlowLoader {
        inner: MemoryLoader,
        delay: Duration,
    }

    impl CatalogLoader for SlowLoader {
        async fn load(&self, locale: &str) -> Result<LocaleStrings> {
            tokio::time::sleep(self.delay).await;
            self.inner.load(locale).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn resolution_during_switch_uses_previous_catalog() {
        let catalog = catalog();
        let en = catalog.locale("en").cloned().unwrap_or_default();
        let loader = SlowLoader {
            inner: MemoryLoader::new(catalog),
            delay: Duration::from_millis(100),
        };
        let l = Arc::new(Localizer::new(loader, "en", en));

        let switching = {
            let l = Arc::clone(&l);
            tokio::spawn(async move { l.set_locale("de").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(l.resolve("menu.home"), "Home");

        switching.await.unwrap().unwrap();
        assert_eq!(l.resolve("menu.home"), "Startseite");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_switches_are_serialized_last_wins() {
        let l = Arc::new(localizer("en"));
        for locale in ["de", "en", "de"] {
            l.set_locale(locale).await.unwrap();
        }
        assert_eq!(l.locale(), "de");

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let l = Arc::clone(&l);
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let pair = l.resolve_list(["home", "about"], "menu");
                        // One snapshot per list: never a German/English mix.
                        let german = pair[0] == "Startseite";
                        assert_eq!(pair[1] == "menu.about", german);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for i in 0..20 {
            let locale = if i % 2 == 0 { "en" } else { "de" };
            l.set_locale(locale).await.unwrap();
        }
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(l.locale(), "de");
    }
}
