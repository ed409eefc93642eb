//! Schema document validation.
//!
//! Checks the document header (application, stage, api version) and the
//! per-category name uniqueness the synthesizer relies on for its lookup
//! tables. Validation stops at the first problem found.
//!
//! # Examples
//!
//! ```
//! use api_decl_core::*;
//!
//! let doc: SchemaDocument = serde_json::from_str(
//!     r#"{"application":"factorio","stage":"runtime","api_version":3}"#,
//! ).unwrap();
//! assert!(validate_document(&doc).is_empty());
//!
//! let wrong: SchemaDocument = serde_json::from_str(
//!     r#"{"application":"factorio","stage":"prototype","api_version":3}"#,
//! ).unwrap();
//! assert!(!validate_document(&wrong).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{
    Define, SUPPORTED_API_VERSION, SUPPORTED_APPLICATION, SUPPORTED_STAGE, SchemaDocument,
};

/// Schema document validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The document targets another application.
    #[error("unsupported application `{0}` (expected `factorio`)")]
    UnsupportedApplication(String),
    /// The document describes another API stage.
    #[error("unsupported stage `{0}` (expected `runtime`)")]
    UnsupportedStage(String),
    /// The document uses another schema version.
    #[error("unsupported api_version {0} (expected 3)")]
    UnsupportedApiVersion(u32),
    /// An entity has an empty name.
    #[error("empty {0} name")]
    EmptyName(&'static str),
    /// Two entities of one category share a name.
    #[error("duplicate {category} `{name}`")]
    DuplicateName {
        category: &'static str,
        name: String,
    },
}

/// Validates a schema document.
///
/// Returns an empty list when the document is usable.
pub fn validate_document(doc: &SchemaDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if doc.application != SUPPORTED_APPLICATION {
        errors.push(ValidationError::UnsupportedApplication(
            doc.application.clone(),
        ));
        return errors;
    }
    if doc.stage != SUPPORTED_STAGE {
        errors.push(ValidationError::UnsupportedStage(doc.stage.clone()));
        return errors;
    }
    if doc.api_version != SUPPORTED_API_VERSION {
        errors.push(ValidationError::UnsupportedApiVersion(doc.api_version));
        return errors;
    }

    let categories: [(&'static str, Vec<&str>); 5] = [
        (
            "builtin type",
            doc.builtin_types.iter().map(|b| b.name.as_str()).collect(),
        ),
        ("class", doc.classes.iter().map(|c| c.name.as_str()).collect()),
        (
            "concept",
            doc.concepts.iter().map(|c| c.name.as_str()).collect(),
        ),
        ("event", doc.events.iter().map(|e| e.name.as_str()).collect()),
        (
            "global object",
            doc.global_objects.iter().map(|g| g.name.as_str()).collect(),
        ),
    ];

    for (category, names) in categories {
        if let Some(error) = check_unique(category, names) {
            errors.push(error);
            return errors;
        }
    }

    if let Some(error) = check_defines(&doc.defines) {
        errors.push(error);
    }

    errors
}

fn check_unique<'a>(
    category: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Option<ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Some(ValidationError::EmptyName(category));
        }
        if !seen.insert(name) {
            return Some(ValidationError::DuplicateName {
                category,
                name: name.to_string(),
            });
        }
    }
    None
}

fn check_defines(defines: &[Define]) -> Option<ValidationError> {
    if let Some(error) = check_unique("define", defines.iter().map(|d| d.name.as_str())) {
        return Some(error);
    }
    for define in defines {
        if let Some(error) =
            check_unique("define value", define.values.iter().map(|v| v.name.as_str()))
        {
            return Some(error);
        }
        if let Some(error) = check_defines(&define.subkeys) {
            return Some(error);
        }
    }
    None
}
