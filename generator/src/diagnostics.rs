//! Non-fatal advisories.
//!
//! Advisories accumulate across the whole run so every gap surfaces in one
//! pass. Each one is logged at `warn` level when recorded and kept for the
//! generation report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A best-effort fallback taken during synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Advisory {
    /// A documentation reference matched no known entity.
    UnresolvedLink { context: String, reference: String },
    /// A plain concept had no manual override; emitted as an opaque type.
    MissingConceptDefinition { name: String },
    /// A constants-tree node had neither values nor children.
    MissingConstantDefinition { path: String },
    /// A builtin with no known target type and no override.
    MissingBuiltinDefinition { name: String },
    /// A dictionary key cannot index the native map type.
    NonIndexableKey { context: String, key: String },
    /// An array-like class had no index shape; emitted without index support.
    MissingIndexShape { class: String },
}

impl Advisory {
    /// Stable code used in reports and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Advisory::UnresolvedLink { .. } => "unresolved_link",
            Advisory::MissingConceptDefinition { .. } => "missing_concept_definition",
            Advisory::MissingConstantDefinition { .. } => "missing_constant_definition",
            Advisory::MissingBuiltinDefinition { .. } => "missing_builtin_definition",
            Advisory::NonIndexableKey { .. } => "non_indexable_key",
            Advisory::MissingIndexShape { .. } => "missing_index_shape",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnresolvedLink { context, reference } => {
                write!(f, "{context}: unresolved documentation link `{reference}`")
            }
            Advisory::MissingConceptDefinition { name } => {
                write!(f, "{name}: concept has no manual definition, emitted as `any`")
            }
            Advisory::MissingConstantDefinition { path } => {
                write!(f, "{path}: constant has no values or children, emitted as `any`")
            }
            Advisory::MissingBuiltinDefinition { name } => {
                write!(f, "{name}: builtin has no definition, emitted as `any`")
            }
            Advisory::NonIndexableKey { context, key } => {
                write!(f, "{context}: dictionary key `{key}` is not indexable, using LuaTable")
            }
            Advisory::MissingIndexShape { class } => {
                write!(f, "{class}: array-like class has no index shape")
            }
        }
    }
}

/// Accumulates advisories for one run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    advisories: Vec<Advisory>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and keeps an advisory.
    pub fn record(&mut self, advisory: Advisory) {
        tracing::warn!(code = advisory.code(), "{advisory}");
        self.advisories.push(advisory);
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn len(&self) -> usize {
        self.advisories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Number of advisories per code, sorted by code.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for advisory in &self.advisories {
            *counts.entry(advisory.code()).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_advisories(self) -> Vec<Advisory> {
        self.advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_by_code() {
        let mut diag = Diagnostics::new();
        diag.record(Advisory::MissingConceptDefinition { name: "A".into() });
        diag.record(Advisory::MissingConceptDefinition { name: "B".into() });
        diag.record(Advisory::MissingIndexShape {
            class: "LuaInventory".into(),
        });

        let summary = diag.summary();
        assert_eq!(summary.get("missing_concept_definition"), Some(&2));
        assert_eq!(summary.get("missing_index_shape"), Some(&1));
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_advisory_json_is_tagged_by_code() {
        let advisory = Advisory::UnresolvedLink {
            context: "LuaEntity".into(),
            reference: "Nope".into(),
        };
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["code"], "unresolved_link");
        assert_eq!(json["reference"], "Nope");
        assert_eq!(json["code"], advisory.code());
    }
}
