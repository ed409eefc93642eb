//! Input loading for declaration synthesis.
//!
//! This crate loads everything a synthesis run reads and never mutates:
//!
//! - the schema document ([`load_schema`], [`parse_schema`]), validated on
//!   load;
//! - the [`ManualOverrideStore`] of hand-authored declarations, from JSON or
//!   YAML files, with a builder for fallback chains;
//! - the [`GeneratorConfig`] YAML file.
//!
//! # Quick start
//!
//! ```no_run
//! use api_decl_store::{GeneratorConfig, ManualOverrideStore, load_schema};
//!
//! let doc = load_schema("runtime-api.json").unwrap();
//! let overrides = ManualOverrideStore::from_file("overrides.yml").unwrap();
//! let config = GeneratorConfig::load("api-decl.yml").unwrap_or_default();
//! println!("{} classes, {} overrides", doc.classes.len(), overrides.len());
//! # let _ = config;
//! ```

mod config;
mod error;
mod loader;
mod overrides;

pub use config::GeneratorConfig;
pub use error::{Result, StoreError};
pub use loader::{load_schema, parse_schema};
pub use overrides::{
    ManualOverride, ManualOverrideStore, OverrideEntry, OverrideKind, OverrideSource,
    OverrideStoreBuilder,
};
