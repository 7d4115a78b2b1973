//! Human and JSON renderings of a scan.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::scanner::{ScanOutcome, ScanReport, SkippedFile};

/// `path` relative to `base` when that is shorter to read.
fn display_path(base: Option<&Path>, path: &Path) -> PathBuf {
    base.and_then(|base| pathdiff::diff_paths(path, base))
        .filter(|relative| !relative.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
}

/// Per-file findings, then a grand total and the flagged file count.
#[must_use]
pub fn render_text(report: &ScanReport, base: Option<&Path>) -> String {
    if report.is_empty() {
        return "No untranslated text found.\n".to_string();
    }

    let mut out = String::new();
    for (path, findings) in report.iter() {
        let _ = writeln!(
            out,
            "{} ({} finding{})",
            display_path(base, path).display(),
            findings.len(),
            if findings.len() == 1 { "" } else { "s" }
        );
        for finding in findings {
            let _ = writeln!(out, "  {:>5}: {}", finding.line, finding.content);
            let _ = writeln!(
                out,
                "         matched [{}]: {}",
                finding.pattern_id, finding.matched
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Total findings: {}", report.total_findings());
    let _ = writeln!(out, "Files with findings: {}", report.file_count());
    out
}

/// Files that were skipped because they could not be read.
#[must_use]
pub fn render_skipped(skipped: &[SkippedFile], base: Option<&Path>) -> String {
    let mut out = String::new();
    if skipped.is_empty() {
        return out;
    }
    let _ = writeln!(out, "Skipped {} unreadable file(s):", skipped.len());
    for file in skipped {
        let _ = writeln!(
            out,
            "  {}: {}",
            display_path(base, &file.path).display(),
            file.reason
        );
    }
    out
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    status: &'static str,
    files_scanned: usize,
    files_with_findings: usize,
    total_findings: usize,
    files: &'a ScanReport,
    skipped: &'a [SkippedFile],
}

/// Pretty-printed JSON document describing the whole outcome.
pub fn render_json(outcome: &ScanOutcome) -> Result<String> {
    let summary = JsonSummary {
        status: if outcome.report.is_empty() {
            "clean"
        } else {
            "findings"
        },
        files_scanned: outcome.files_scanned,
        files_with_findings: outcome.report.file_count(),
        total_findings: outcome.report.total_findings(),
        files: &outcome.report,
        skipped: &outcome.skipped,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}
