//! Schema document loading.
//!
//! The document is parsed in one go and validated before it is handed to the
//! synthesizer; a document for another application, stage or schema version
//! never reaches synthesis.
//!
//! ```no_run
//! use api_decl_store::load_schema;
//!
//! let doc = load_schema("runtime-api.json").unwrap();
//! println!("{} classes", doc.classes.len());
//! ```

use std::io::BufReader;
use std::path::Path;

use api_decl_core::{SchemaDocument, validate_document};

use crate::error::Result;

/// Loads and validates a schema document from a JSON file.
///
/// # Errors
///
/// Returns [`IoError`](crate::StoreError::IoError) if the file cannot be
/// read, [`JsonError`](crate::StoreError::JsonError) if parsing fails (this
/// includes unknown complex-type, concept-category and operator tags), or
/// [`InvalidSchema`](crate::StoreError::InvalidSchema) if validation fails.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let doc: SchemaDocument = serde_json::from_reader(reader)?;
    check(doc)
}

/// Parses and validates a schema document from a JSON string.
///
/// # Examples
///
/// ```
/// use api_decl_store::{StoreError, parse_schema};
///
/// let doc = parse_schema(r#"{"application":"factorio","stage":"runtime","api_version":3}"#).unwrap();
/// assert_eq!(doc.api_version, 3);
///
/// let err = parse_schema(r#"{"application":"factorio","stage":"runtime","api_version":4}"#);
/// assert!(matches!(err, Err(StoreError::InvalidSchema(_))));
/// ```
pub fn parse_schema(raw: &str) -> Result<SchemaDocument> {
    let doc: SchemaDocument = serde_json::from_str(raw)?;
    check(doc)
}

fn check(doc: SchemaDocument) -> Result<SchemaDocument> {
    if let Some(error) = validate_document(&doc).into_iter().next() {
        return Err(error.into());
    }
    Ok(doc)
}
