//! Catalog loading collaborators.
//!
//! A [`CatalogLoader`] produces the string set for one locale on demand.
//! Loading is async because catalog resources may be fetched lazily.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::catalog::{LocaleStrings, StringCatalog};
use crate::error::{I18nError, Result};

/// Produces the strings for a given locale identifier.
pub trait CatalogLoader: Send + Sync {
    fn load(&self, locale: &str) -> impl Future<Output = Result<LocaleStrings>> + Send;
}

/// Serves locales from a catalog that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    catalog: StringCatalog,
}

impl MemoryLoader {
    #[must_use]
    pub fn new(catalog: StringCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &StringCatalog {
        &self.catalog
    }
}

impl CatalogLoader for MemoryLoader {
    async fn load(&self, locale: &str) -> Result<LocaleStrings> {
        self.catalog
            .locale(locale)
            .cloned()
            .ok_or_else(|| I18nError::UnknownLocale {
                locale: locale.to_string(),
            })
    }
}

/// Reads `<dir>/<locale>.json` for each requested locale.
#[derive(Debug, Clone)]
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the catalog file for `locale`, or `None` if the identifier
    /// could escape the catalog directory.
    #[must_use]
    pub fn path_for(&self, locale: &str) -> Option<PathBuf> {
        let valid = !locale.is_empty()
            && locale
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{locale}.json")))
    }
}

impl CatalogLoader for DirLoader {
    async fn load(&self, locale: &str) -> Result<LocaleStrings> {
        let unknown = || I18nError::UnknownLocale {
            locale: locale.to_string(),
        };
        let path = self.path_for(locale).ok_or_else(unknown)?;

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(unknown()),
            Err(source) => return Err(I18nError::Io { path, source }),
        };

        LocaleStrings::from_json_str(&source).map_err(|err| match err {
            I18nError::Parse { message, .. } => I18nError::parse(locale, message),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_loader_serves_known_locales() {
        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", [("a", "A")].into_iter().collect());
        let loader = MemoryLoader::new(catalog);

        let en = loader.load("en").await.unwrap();
        assert_eq!(en.get("a"), Some("A"));

        let err = loader.load("de").await.unwrap_err();
        assert!(matches!(err, I18nError::UnknownLocale { locale } if locale == "de"));
    }

    #[tokio::test]
    async fn dir_loader_reads_locale_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join("en.json"),
            r#"{ "welcome": { "message": "Hello, {{name}}!" } }"#,
        )
        .unwrap();

        let loader = DirLoader::new(temp.path());
        let en = loader.load("en").await.unwrap();
        assert_eq!(en.get("welcome.message"), Some("Hello, {{name}}!"));
    }

    #[tokio::test]
    async fn dir_loader_maps_missing_file_to_unknown_locale() {
        let temp = tempfile::tempdir().expect("tempdir");
        let loader = DirLoader::new(temp.path());
        let err = loader.load("fr").await.unwrap_err();
        assert!(matches!(err, I18nError::UnknownLocale { .. }));
    }

    #[tokio::test]
    async fn dir_loader_reports_parse_errors_with_locale() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(temp.path().join("de.json"), "[1, 2]").unwrap();
        let loader = DirLoader::new(temp.path());
        let err = loader.load("de").await.unwrap_err();
        assert!(matches!(err, I18nError::Parse { locale, .. } if locale == "de"));
    }

    #[test]
    fn path_for_rejects_traversal() {
        let loader = DirLoader::new("/locales");
        assert_eq!(
            loader.path_for("pt-BR"),
            Some(PathBuf::from("/locales/pt-BR.json"))
        );
        assert_eq!(loader.path_for("../etc/passwd"), None);
        assert_eq!(loader.path_for(""), None);
    }
}
