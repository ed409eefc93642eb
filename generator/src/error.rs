//! Fatal synthesis errors.
//!
//! Any of these aborts the run before output is produced. Each one names the
//! offending entity path.

use api_decl_core::{MemberShape, ValidationError};
use thiserror::Error;

/// Errors that abort a synthesis run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The schema document failed validation.
    #[error("invalid schema document: {0}")]
    InvalidSchema(#[from] ValidationError),

    /// A manual override has the wrong declaration kind for its entity.
    #[error("{entity}: manual override is a {found}, expected a {expected}")]
    OverrideKindMismatch {
        entity: String,
        expected: String,
        found: String,
    },

    /// A manual override member has the wrong shape for its schema member.
    #[error("{entity}.{member}: manual override member is a {found}, expected a {expected}")]
    MemberShapeMismatch {
        entity: String,
        member: String,
        expected: MemberShape,
        found: MemberShape,
    },

    /// The index shape of an array-like class override cannot be used.
    #[error("{class}: unsupported index shape on manual override")]
    UnsupportedIndexShape { class: String },

    /// An inline documentation link names an operator with no known target.
    #[error("{context}: unknown operator suffix in link `{reference}`")]
    UnknownOperatorSuffix { context: String, reference: String },
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entity() {
        let err = GenerateError::MemberShapeMismatch {
            entity: "LuaEntity".into(),
            member: "health".into(),
            expected: MemberShape::Property,
            found: MemberShape::Method,
        };
        assert_eq!(
            err.to_string(),
            "LuaEntity.health: manual override member is a method, expected a property"
        );

        let err = GenerateError::UnsupportedIndexShape {
            class: "LuaInventory".into(),
        };
        assert!(err.to_string().starts_with("LuaInventory:"));
    }
}
