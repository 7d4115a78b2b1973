use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, I18nError>;

/// Errors from localization operations.
///
/// `MissingTranslationKey` and `UnresolvedPlaceholder` are only produced by
/// the strict lookups; lenient resolution degrades silently instead.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("missing translation key '{key}' in locale '{locale}'")]
    MissingTranslationKey { locale: String, key: String },

    #[error("unresolved placeholder '{{{{{placeholder}}}}}' in '{key}'")]
    UnresolvedPlaceholder { key: String, placeholder: String },

    #[error("unknown locale: {locale}")]
    UnknownLocale { locale: String },

    #[error("catalog parse error for locale '{locale}': {message}")]
    Parse { locale: String, message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl I18nError {
    #[must_use]
    pub fn parse(locale: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            locale: locale.into(),
            message: message.into(),
        }
    }

    /// Whether this is a display-only condition that lenient lookups swallow.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::MissingTranslationKey { .. } | Self::UnresolvedPlaceholder { .. }
        )
    }
}
