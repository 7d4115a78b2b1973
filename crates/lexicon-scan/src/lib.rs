#![forbid(unsafe_code)]

//! Heuristic detection of untranslated user-facing text.
//!
//! Walks front-end source trees and flags lines that look like literal UI
//! copy (JSX text nodes, `placeholder="..."` attributes, `alert('...')`
//! calls) unless the line matches a known-safe pattern such as an existing
//! `t('...')` call, a comment, or an import.
//!
//! The scan is advisory: pattern lists are ordered, replaceable
//! configuration and no guarantee is made about false positives.

pub mod cli;
pub mod config;
pub mod error;
pub mod patterns;
pub mod report;
pub mod scanner;

pub use cli::run_from_env;
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use patterns::{PatternSet, TextPattern, builtin_exclude_patterns, builtin_suspicious_patterns};
pub use report::{render_json, render_text};
pub use scanner::{Finding, ScanOutcome, ScanReport, Scanner, SkippedFile};
