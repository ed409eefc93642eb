//! Declaration synthesis from a runtime API schema.
//!
//! This crate turns a validated [`SchemaDocument`] plus a
//! [`ManualOverrideStore`] into an ordered list of [`Declaration`]s:
//! builtins, the constants tree, events, classes, concepts and global
//! objects, followed by overrides no category claimed.
//!
//! Inconsistencies between schema and overrides are fatal
//! ([`GenerateError`]); gaps that have a best-effort fallback are recorded as
//! [`Advisory`] entries and reported at the end of the run.
//!
//! # Main entry points
//!
//! - [`generate`]: run the whole synthesis and get declarations plus a
//!   [`GenerationReport`].
//! - [`print_declarations`]: render declarations as declaration source.
//! - [`format_declarations`] / [`format_report`]: render in an
//!   [`OutputFormat`].
//!
//! # Example
//!
//! ```
//! use api_decl_core::SchemaDocument;
//! use api_decl_gen::generate;
//! use api_decl_store::{GeneratorConfig, ManualOverrideStore};
//!
//! let schema: SchemaDocument = serde_json::from_str(r#"{
//!     "application": "factorio",
//!     "stage": "runtime",
//!     "api_version": 3,
//!     "builtin_types": [{ "name": "uint", "order": 0, "description": "" }],
//!     "global_objects": [{ "name": "game", "order": 0, "description": "", "type": "LuaGameScript" }]
//! }"#).unwrap();
//!
//! let run = generate(&schema, &ManualOverrideStore::empty(), &GeneratorConfig::default()).unwrap();
//! assert_eq!(run.report.counts.builtins, 1);
//! assert!(run.printed.contains("declare const game: LuaGameScript"));
//! ```

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod links;
pub mod merge;
pub mod output;
pub mod report;
pub mod synth;
pub mod text;
pub mod types;
pub mod variants;

use api_decl_core::{Declaration, SchemaDocument, validate_document};
use api_decl_store::{GeneratorConfig, ManualOverrideStore};
use tracing::info;

pub use context::{ConsumedSet, GenContext, Session};
pub use diagnostics::{Advisory, Diagnostics};
pub use error::{GenerateError, Result};
pub use links::{DocLinkResolver, DocSource};
pub use output::{
    OutputFormat, format_declarations, format_report, print_declarations, print_member, print_type,
};
pub use report::{CategoryCounts, GenerationReport, output_digest, report_to_text};
pub use types::map_type;
pub use variants::{VariantShape, expand_variants};

/// Result of one synthesis run.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub declarations: Vec<Declaration>,
    /// [`print_declarations`] output for `declarations`.
    pub printed: String,
    pub report: GenerationReport,
}

/// Synthesizes declarations for `schema`.
///
/// # Errors
///
/// Returns the first validation failure of the schema document, or the
/// first fatal inconsistency between schema and overrides. No partial output
/// is produced.
pub fn generate(
    schema: &SchemaDocument,
    overrides: &ManualOverrideStore,
    config: &GeneratorConfig,
) -> Result<GenerationRun> {
    if let Some(err) = validate_document(schema).into_iter().next() {
        return Err(err.into());
    }

    let ctx = GenContext::new(schema, overrides, config);
    let mut session = Session::new();
    let (declarations, counts) = synth::synthesize_all(&ctx, &mut session)?;
    let printed = print_declarations(&declarations);

    let Session { diagnostics, .. } = session;
    let report = GenerationReport::new(&schema.application_version, counts, diagnostics, &printed);
    info!(
        declarations = report.counts.total(),
        advisories = report.advisories.len(),
        sha256 = %report.output_sha256,
        "generation complete"
    );

    Ok(GenerationRun {
        declarations,
        printed,
        report,
    })
}
