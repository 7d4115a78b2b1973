//! Directory walking and per-line classification.
//!
//! # Invariants
//!
//! 1. **Exclusion wins**: a line matching any exclude pattern yields no
//!    finding, whatever else it matches.
//! 2. **One finding per line**: the first suspicious pattern (in list
//!    order) that matches is recorded and the rest are not consulted.
//! 3. **Deterministic output**: files are visited in sorted path order and
//!    reported in a `BTreeMap`, so unchanged inputs give identical reports.
//! 4. **No link following**: symlinks below a root are skipped, so a link
//!    back to an ancestor cannot make the walk revisit files.
//! 5. **Soft file failures**: an unreadable file is recorded in
//!    [`ScanOutcome::skipped`] and the walk continues. Only a search root
//!    that cannot be enumerated aborts the scan.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, ScanError};
use crate::patterns::{PatternSet, builtin_exclude_patterns, builtin_suspicious_patterns};

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

/// One flagged line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The line with surrounding whitespace trimmed.
    pub content: String,
    /// First substring matched by the winning pattern.
    pub matched: String,
    /// Id of the suspicious pattern that matched.
    pub pattern_id: String,
}

/// A file that could not be read as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Findings grouped by file. Files without findings are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScanReport {
    files: BTreeMap<PathBuf, Vec<Finding>>,
}

impl ScanReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings of one file; an empty list is dropped.
    pub fn insert(&mut self, path: PathBuf, findings: Vec<Finding>) {
        if !findings.is_empty() {
            self.files.insert(path, findings);
        }
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[Finding]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Files with findings, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Finding])> {
        self.files
            .iter()
            .map(|(path, findings)| (path.as_path(), findings.as_slice()))
    }

    /// Number of files with at least one finding.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total findings across all files.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Everything a scan run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub report: ScanReport,
    /// Files whose extension matched, including skipped ones.
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Line classifier plus directory walker.
#[derive(Debug, Clone)]
pub struct Scanner {
    exclude: PatternSet,
    suspicious: PatternSet,
}

impl Scanner {
    #[must_use]
    pub fn new(exclude: PatternSet, suspicious: PatternSet) -> Self {
        Self {
            exclude,
            suspicious,
        }
    }

    /// Scanner over the built-in JSX/TSX pattern lists.
    pub fn with_builtin_patterns() -> Result<Self> {
        Ok(Self::new(
            PatternSet::compile(&builtin_exclude_patterns())?,
            PatternSet::compile(&builtin_suspicious_patterns())?,
        ))
    }

    /// Classify one line: `(pattern_id, matched)` for a flagged line.
    #[must_use]
    pub fn classify_line<'a>(&'a self, line: &'a str) -> Option<(&'a str, &'a str)> {
        if self.exclude.is_match(line) {
            return None;
        }
        self.suspicious.first_match(line)
    }

    /// Scan text already in memory, attributing findings to `path`.
    #[must_use]
    pub fn scan_content(&self, content: &str, path: &Path) -> Vec<Finding> {
        content
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                self.classify_line(line).map(|(pattern_id, matched)| Finding {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    content: line.trim().to_string(),
                    matched: matched.to_string(),
                    pattern_id: pattern_id.to_string(),
                })
            })
            .collect()
    }

    /// Read and scan one file. Non-UTF-8 content is an `InvalidData` error.
    pub fn scan_file(&self, path: &Path) -> std::io::Result<Vec<Finding>> {
        let content = fs::read_to_string(path)?;
        Ok(self.scan_content(&content, path))
    }

    /// Walk `roots` and scan every file whose name ends in one of
    /// `extensions`.
    pub fn scan<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        roots: &[P],
        extensions: &[S],
    ) -> Result<ScanOutcome> {
        let mut files = BTreeSet::new();
        for root in roots {
            collect_root(root.as_ref(), extensions, &mut files)?;
        }

        let mut outcome = ScanOutcome {
            files_scanned: files.len(),
            ..ScanOutcome::default()
        };
        for path in files {
            match self.scan_file(&path) {
                Ok(findings) => {
                    tracing::debug!(path = %path.display(), findings = findings.len(), "scanned");
                    outcome.report.insert(path, findings);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    outcome.skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            files = outcome.files_scanned,
            flagged_files = outcome.report.file_count(),
            findings = outcome.report.total_findings(),
            skipped = outcome.skipped.len(),
            "scan complete"
        );
        Ok(outcome)
    }
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext.as_ref())))
}

fn collect_root<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
    out: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let entries = fs::read_dir(root).map_err(|source| ScanError::InvalidSearchRoot {
        root: root.to_path_buf(),
        source,
    })?;
    collect_entries(entries, extensions, out);
    Ok(())
}

fn collect_entries<S: AsRef<str>>(
    entries: fs::ReadDir,
    extensions: &[S],
    out: &mut BTreeSet<PathBuf>,
) {
    for entry in entries.flatten() {
        let path = entry.path();
        // `DirEntry::file_type` does not follow symlinks.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            tracing::debug!(path = %path.display(), "skipping symlink");
        } else if file_type.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && SKIP_DIRS.contains(&name)
            {
                continue;
            }
            match fs::read_dir(&path) {
                Ok(children) => collect_entries(children, extensions, out),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                }
            }
        } else if file_type.is_file() && has_extension(&path, extensions) {
            out.insert(path);
        }
    }
}
