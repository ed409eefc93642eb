//! Run context and session state.
//!
//! [`GenContext`] is built once at the start of a run and only read after
//! that: the schema, the override store, the configuration and membership
//! sets for every entity category. [`Session`] holds the two pieces of
//! mutable state a run has, the consumed-override bookkeeping and the
//! accumulated advisories.

use std::collections::HashSet;

use api_decl_core::SchemaDocument;
use api_decl_store::{GeneratorConfig, ManualOverrideStore};

use crate::diagnostics::Diagnostics;

/// Immutable lookup tables for one run.
pub struct GenContext<'a> {
    pub schema: &'a SchemaDocument,
    pub overrides: &'a ManualOverrideStore,
    pub config: &'a GeneratorConfig,
    builtins: HashSet<&'a str>,
    classes: HashSet<&'a str>,
    events: HashSet<&'a str>,
    concepts: HashSet<&'a str>,
    globals: HashSet<&'a str>,
    defines: HashSet<String>,
}

impl<'a> GenContext<'a> {
    pub fn new(
        schema: &'a SchemaDocument,
        overrides: &'a ManualOverrideStore,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            schema,
            overrides,
            config,
            builtins: schema.builtin_types.iter().map(|b| b.name.as_str()).collect(),
            classes: schema.classes.iter().map(|c| c.name.as_str()).collect(),
            events: schema.events.iter().map(|e| e.name.as_str()).collect(),
            concepts: schema.concepts.iter().map(|c| c.name.as_str()).collect(),
            globals: schema.global_objects.iter().map(|g| g.name.as_str()).collect(),
            defines: schema
                .define_paths(&config.constants_root)
                .into_iter()
                .collect(),
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn is_event(&self, name: &str) -> bool {
        self.events.contains(name)
    }

    pub fn is_concept(&self, name: &str) -> bool {
        self.concepts.contains(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    /// Whether `path` is a fully qualified constants-tree node or value,
    /// e.g. `defines.inventory.chest`.
    pub fn is_define(&self, path: &str) -> bool {
        self.defines.contains(path)
    }
}

/// Which overrides, and which of their members, a run has used.
///
/// Keyed by name so the override store itself stays read-only.
#[derive(Debug, Default)]
pub struct ConsumedSet {
    entities: HashSet<String>,
    members: HashSet<(String, String)>,
}

impl ConsumedSet {
    pub fn mark_entity(&mut self, entity: &str) {
        self.entities.insert(entity.to_string());
    }

    pub fn mark_member(&mut self, entity: &str, member: &str) {
        self.members.insert((entity.to_string(), member.to_string()));
    }

    pub fn is_entity_consumed(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    pub fn is_member_consumed(&self, entity: &str, member: &str) -> bool {
        self.members
            .contains(&(entity.to_string(), member.to_string()))
    }
}

/// Mutable state of one run.
#[derive(Debug, Default)]
pub struct Session {
    pub consumed: ConsumedSet,
    pub diagnostics: Diagnostics,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
