//! Core schema types and the declaration AST.
//!
//! This crate defines the two data models the declaration synthesizer works
//! between:
//!
//! - [`SchemaDocument`]: the runtime API schema (builtin types, classes,
//!   concepts, events, the `defines` tree, global objects) with recursive
//!   [`TypeExpr`] type expressions.
//! - [`Declaration`]: the target declaration AST ([`TypeNode`], [`Member`]),
//!   shared by synthesized output and hand-authored overrides.
//!
//! Validation ([`validate_document`]) rejects documents for another
//! application, stage or schema version, and duplicate entity names.
//! [`sorted_by_order`] gives the explicit-order iteration every synthesis
//! step uses.
//!
//! # Example
//!
//! ```
//! use api_decl_core::*;
//!
//! let doc: SchemaDocument = serde_json::from_str(r#"{
//!     "application": "factorio",
//!     "stage": "runtime",
//!     "api_version": 3,
//!     "classes": [
//!         { "name": "LuaEntity", "order": 1, "description": "" },
//!         { "name": "LuaBootstrap", "order": 0, "description": "" }
//!     ]
//! }"#).unwrap();
//!
//! assert!(validate_document(&doc).is_empty());
//! let names: Vec<&str> = sorted_by_order(&doc.classes).iter().map(|c| c.name.as_str()).collect();
//! assert_eq!(names, vec!["LuaBootstrap", "LuaEntity"]);
//! ```

mod decl;
mod order;
mod schema;
mod validate;

pub use decl::*;
pub use order::{Ordered, sorted_by_order};
pub use schema::*;
pub use validate::{ValidationError, validate_document};
