//! Scan configuration.
//!
//! Without a config file the scanner uses the fixed defaults below. A TOML
//! file may override any subset of fields; omitted fields keep their
//! defaults.
//!
//! ```toml
//! roots = ["src/components", "src/pages"]
//! extensions = [".tsx"]
//!
//! [[exclude]]
//! id = "storybook"
//! regex = "\\bstoryName\\b"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ScanError};
use crate::patterns::{
    PatternSet, TextPattern, builtin_exclude_patterns, builtin_suspicious_patterns,
};
use crate::scanner::Scanner;

pub const DEFAULT_ROOTS: &[&str] = &["src"];
pub const DEFAULT_EXTENSIONS: &[&str] = &[".tsx", ".jsx", ".ts", ".js"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories to walk.
    pub roots: Vec<PathBuf>,
    /// File name suffixes to scan (e.g. `.tsx`).
    pub extensions: Vec<String>,
    /// Lines matching any of these are never flagged.
    pub exclude: Vec<TextPattern>,
    /// Ordered suspicious-text patterns; the first match wins.
    pub suspicious: Vec<TextPattern>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            exclude: builtin_exclude_patterns(),
            suspicious: builtin_suspicious_patterns(),
        }
    }
}

impl ScanConfig {
    /// Parse a TOML document; `origin` is only used in error messages.
    pub fn from_toml_str(source: &str, origin: &Path) -> Result<Self> {
        toml::from_str(source).map_err(|e| ScanError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Compile the configured patterns into a scanner.
    pub fn scanner(&self) -> Result<Scanner> {
        Ok(Scanner::new(
            PatternSet::compile(&self.exclude)?,
            PatternSet::compile(&self.suspicious)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fixed_constants() {
        let config = ScanConfig::default();
        assert_eq!(config.roots, vec![PathBuf::from("src")]);
        assert_eq!(config.extensions, vec![".tsx", ".jsx", ".ts", ".js"]);
        assert!(!config.exclude.is_empty());
        assert!(!config.suspicious.is_empty());
        assert!(config.scanner().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = ScanConfig::from_toml_str(
            r#"
            roots = ["app", "lib"]
            extensions = [".vue"]
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.roots, vec![PathBuf::from("app"), PathBuf::from("lib")]);
        assert_eq!(config.extensions, vec![".vue"]);
        assert_eq!(config.exclude, builtin_exclude_patterns());
        assert_eq!(config.suspicious, builtin_suspicious_patterns());
    }

    #[test]
    fn patterns_can_be_replaced() {
        let config = ScanConfig::from_toml_str(
            r#"
            [[suspicious]]
            id = "todo"
            regex = "TODO"

            [[exclude]]
            id = "ignored"
            description = "ignore marker"
            regex = "i18n-ignore"
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.suspicious.len(), 1);
        assert_eq!(config.suspicious[0].id, "todo");
        assert_eq!(config.suspicious[0].description, "");
        assert_eq!(config.exclude[0].description, "ignore marker");
    }

    #[test]
    fn unknown_fields_and_bad_regex_are_errors() {
        let err = ScanConfig::from_toml_str("rootz = []", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));

        let config = ScanConfig::from_toml_str(
            "[[exclude]]\nid = \"bad\"\nregex = \"[\"\n",
            Path::new("bad.toml"),
        )
        .unwrap();
        assert!(matches!(
            config.scanner(),
            Err(ScanError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = ScanConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
