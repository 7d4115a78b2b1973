//! Pattern definitions for untranslated-text detection.
//!
//! Two ordered lists drive the scan: *exclude* patterns mark a line as safe
//! (already localized, a comment, an import) and *suspicious* patterns mark
//! literal UI copy. Both are plain data so they can be replaced from config
//! without touching scan control flow.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

// ── Pattern Definitions ──────────────────────────────────────────────────

/// A line-level pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPattern {
    /// Unique identifier, reported alongside findings.
    pub id: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Regex applied to each line.
    pub regex: String,
}

impl TextPattern {
    pub fn new(id: &str, description: &str, regex: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            regex: regex.to_string(),
        }
    }
}

/// Built-in patterns for literal UI copy in JSX/TSX sources, in priority
/// order.
pub fn builtin_suspicious_patterns() -> Vec<TextPattern> {
    vec![
        TextPattern::new(
            "jsx-text",
            "Literal text between an opening or closing JSX tag and the next tag",
            r"</?[A-Za-z][\w.-]*(?:\s[^<>]*)?>\s*[A-Za-z][^<>{}()|=]*<",
        ),
        TextPattern::new(
            "jsx-attribute",
            "Literal user-facing attribute value",
            r#"\b(?:placeholder|title|alt|label|aria-label)\s*=\s*"[^"{]*[A-Za-z][^"{]*""#,
        ),
        TextPattern::new(
            "dialog-call",
            "String literal passed to a browser dialog",
            r#"\b(?:alert|confirm|prompt)\(\s*['"`][^'"`]*[A-Za-z][^'"`]*['"`]"#,
        ),
        TextPattern::new(
            "message-literal",
            "Sentence assigned to a message-like property",
            r#"\b(?:message|text|heading|description|error|label)\s*[:=]\s*['"][A-Z][^'"]*\s[^'"]*['"]"#,
        ),
        TextPattern::new(
            "bare-jsx-text",
            "A line consisting only of words, typical of multi-line JSX text",
            r"^\s*[A-Z][a-z]+(?:\s+[A-Za-z][A-Za-z']*)+[.!?:]?\s*$",
        ),
    ]
}

/// Built-in patterns for lines that must never be flagged.
pub fn builtin_exclude_patterns() -> Vec<TextPattern> {
    vec![
        TextPattern::new("t-call", "Already routed through t()", r"\bt\("),
        TextPattern::new("trans-component", "Already wrapped in <Trans>", r"<Trans\b"),
        TextPattern::new("line-comment", "Line comment", r"^\s*//"),
        TextPattern::new("block-comment", "Block comment body", r"^\s*(?:/\*|\*)"),
        TextPattern::new("import", "Import statement", r"^\s*import\b"),
        TextPattern::new("require", "CommonJS require", r"\brequire\("),
        TextPattern::new("console", "Console logging", r"\bconsole\."),
        TextPattern::new("test-id", "Test selector attribute", r"data-testid="),
    ]
}

// ── Compiled Sets ────────────────────────────────────────────────────────

/// An ordered list of compiled patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    compiled: Vec<(String, Regex)>,
}

impl PatternSet {
    /// Compile `patterns`, failing on the first invalid regex.
    pub fn compile(patterns: &[TextPattern]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&pattern.regex)
                    .map(|re| (pattern.id.clone(), re))
                    .map_err(|e| ScanError::InvalidPattern {
                        id: pattern.id.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    /// Whether any pattern matches `line`.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.compiled.iter().any(|(_, re)| re.is_match(line))
    }

    /// The first pattern (in list order) that matches, with its first
    /// matched substring.
    #[must_use]
    pub fn first_match<'a>(&'a self, line: &'a str) -> Option<(&'a str, &'a str)> {
        self.compiled
            .iter()
            .find_map(|(id, re)| re.find(line).map(|m| (id.as_str(), m.as_str())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
