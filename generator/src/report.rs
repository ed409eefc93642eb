//! Generation reporting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::diagnostics::{Advisory, Diagnostics};

/// Number of top-level declarations emitted per category.
///
/// Array-like classes and variant expansions emit several declarations for
/// one schema entity; all of them are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub builtins: usize,
    pub defines: usize,
    pub events: usize,
    pub classes: usize,
    pub concepts: usize,
    pub globals: usize,
    pub unmatched_overrides: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.builtins
            + self.defines
            + self.events
            + self.classes
            + self.concepts
            + self.globals
            + self.unmatched_overrides
    }
}

/// Summary of one synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub application_version: String,
    pub counts: CategoryCounts,
    /// Advisory count per code.
    pub advisory_summary: BTreeMap<String, usize>,
    pub advisories: Vec<Advisory>,
    /// SHA-256 of the printed declaration text, hex encoded.
    pub output_sha256: String,
}

impl GenerationReport {
    pub fn new(
        application_version: &str,
        counts: CategoryCounts,
        diagnostics: Diagnostics,
        printed: &str,
    ) -> Self {
        let advisory_summary = diagnostics
            .summary()
            .into_iter()
            .map(|(code, count)| (code.to_string(), count))
            .collect();
        Self {
            application_version: application_version.to_string(),
            counts,
            advisory_summary,
            advisories: diagnostics.into_advisories(),
            output_sha256: output_digest(printed),
        }
    }
}

/// Hex-encoded SHA-256 of printed output.
///
/// ```
/// use api_decl_gen::output_digest;
///
/// assert_eq!(
///     output_digest(""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn output_digest(printed: &str) -> String {
    format!("{:x}", Sha256::digest(printed.as_bytes()))
}

/// Renders a report as plain text for terminals.
pub fn report_to_text(report: &GenerationReport) -> String {
    let mut out = String::new();
    let counts = &report.counts;

    out.push_str(&format!(
        "Generated {} declarations for API {}\n",
        counts.total(),
        if report.application_version.is_empty() {
            "(unknown version)"
        } else {
            report.application_version.as_str()
        }
    ));
    for (label, count) in [
        ("builtins", counts.builtins),
        ("defines", counts.defines),
        ("events", counts.events),
        ("classes", counts.classes),
        ("concepts", counts.concepts),
        ("globals", counts.globals),
        ("unmatched overrides", counts.unmatched_overrides),
    ] {
        out.push_str(&format!("  {label:<20} {count}\n"));
    }

    if report.advisories.is_empty() {
        out.push_str("No advisories\n");
    } else {
        out.push_str(&format!("{} advisories:\n", report.advisories.len()));
        for (code, count) in &report.advisory_summary {
            out.push_str(&format!("  {code:<28} {count}\n"));
        }
    }
    out.push_str(&format!("sha256 {}\n", report.output_sha256));
    out
}
