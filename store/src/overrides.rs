//! Manual override store with builder pattern and fallback chains.
//!
//! Manual overrides are hand-authored declarations that take precedence over
//! (or supplement) synthesized ones. They are written as a list of
//! [`OverrideEntry`] values in a JSON or YAML file:
//!
//! ```yaml
//! - declaration:
//!     kind: interface
//!     name: LuaInventory
//!     extends:
//!       - reference: { name: ReadonlyArray, args: [{ reference: { name: LuaItemStack } }] }
//!     members: []
//! - declaration:
//!     kind: type_alias
//!     name: MapPosition
//!     ty: { reference: { name: Position } }
//! ```
//!
//! The store is read-only once built. Which overrides a run consumed is
//! tracked by the synthesizer, not here.

use std::collections::HashMap;
use std::fmt;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use api_decl_core::{Declaration, Member, TypeNode};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// The declaration kind of a manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// An interface.
    StructuralType,
    /// A type alias.
    TypeAlias,
    /// A namespace or an enum.
    NamespaceOrEnumeration,
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverrideKind::StructuralType => "structural type",
            OverrideKind::TypeAlias => "type alias",
            OverrideKind::NamespaceOrEnumeration => "namespace or enumeration",
        };
        f.write_str(label)
    }
}

/// One entry of an override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub declaration: Declaration,
    /// Index shape for array-like classes; only meaningful on interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_shape: Option<TypeNode>,
}

/// A loaded manual override.
///
/// The documentation of the declaration is held separately; merged uses take
/// documentation from the schema, and only verbatim emission restores it.
#[derive(Debug, Clone)]
pub struct ManualOverride {
    kind: OverrideKind,
    declaration: Declaration,
    doc: Option<String>,
    index_shape: Option<TypeNode>,
}

impl ManualOverride {
    /// Builds an override from a file entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidOverride`] for `const` declarations and
    /// for index shapes on anything but an interface.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_decl_core::{Declaration, InterfaceDecl};
    /// use api_decl_store::{ManualOverride, OverrideEntry, OverrideKind};
    ///
    /// let entry = OverrideEntry {
    ///     declaration: Declaration::Interface(InterfaceDecl::new("LuaEntity")),
    ///     index_shape: None,
    /// };
    /// let ovr = ManualOverride::from_entry(entry).unwrap();
    /// assert_eq!(ovr.kind(), OverrideKind::StructuralType);
    /// ```
    pub fn from_entry(entry: OverrideEntry) -> Result<Self> {
        let OverrideEntry {
            mut declaration,
            index_shape,
        } = entry;

        let kind = match &declaration {
            Declaration::Interface(_) => OverrideKind::StructuralType,
            Declaration::TypeAlias(_) => OverrideKind::TypeAlias,
            Declaration::Namespace(_) | Declaration::Enum(_) => {
                OverrideKind::NamespaceOrEnumeration
            }
            Declaration::Const(c) => {
                return Err(StoreError::InvalidOverride {
                    name: c.name.clone(),
                    reason: "const declarations cannot be overridden".to_string(),
                });
            }
        };

        if index_shape.is_some() && kind != OverrideKind::StructuralType {
            return Err(StoreError::InvalidOverride {
                name: declaration.name().to_string(),
                reason: format!("index_shape given on a {kind}"),
            });
        }

        let doc = declaration.take_doc();
        Ok(Self {
            kind,
            declaration,
            doc,
            index_shape,
        })
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    pub fn kind(&self) -> OverrideKind {
        self.kind
    }

    /// The declaration without its documentation.
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn index_shape(&self) -> Option<&TypeNode> {
        self.index_shape.as_ref()
    }

    /// Interface members; empty for other kinds.
    pub fn members(&self) -> &[Member] {
        match &self.declaration {
            Declaration::Interface(iface) => &iface.members,
            _ => &[],
        }
    }

    /// Looks up an interface member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members().iter().find(|m| m.name() == Some(name))
    }

    /// Interface supertypes; empty for other kinds.
    pub fn supertypes(&self) -> &[TypeNode] {
        match &self.declaration {
            Declaration::Interface(iface) => &iface.extends,
            _ => &[],
        }
    }

    /// The declaration with its original documentation restored.
    pub fn to_declaration_with_doc(&self) -> Declaration {
        self.declaration.clone().with_doc(self.doc.clone())
    }
}

/// Describes where a [`ManualOverrideStore`] was loaded from.
#[derive(Debug, Clone)]
pub enum OverrideSource {
    /// Built in memory.
    Inline,
    /// A single JSON or YAML file.
    File(PathBuf),
    /// Every override file of a directory.
    Directory(PathBuf),
    /// A fallback chain of sources.
    Multiple(Vec<OverrideSource>),
}

/// Immutable lookup of manual overrides by entity name.
///
/// Iteration follows load order (files in sorted name order, entries in file
/// order), which keeps verbatim emission deterministic.
///
/// # Examples
///
/// ```
/// use api_decl_core::{Declaration, Keyword, TypeNode};
/// use api_decl_store::{ManualOverrideStore, OverrideEntry};
///
/// let store = ManualOverrideStore::from_entries(vec![OverrideEntry {
///     declaration: Declaration::alias("MapPosition", TypeNode::Keyword(Keyword::Any)),
///     index_shape: None,
/// }]).unwrap();
/// assert!(store.contains("MapPosition"));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug)]
pub struct ManualOverrideStore {
    overrides: Vec<ManualOverride>,
    by_name: HashMap<String, usize>,
    source: OverrideSource,
}

impl ManualOverrideStore {
    /// Returns a new [`OverrideStoreBuilder`] for configuring a fallback chain.
    pub fn builder() -> OverrideStoreBuilder {
        OverrideStoreBuilder::new()
    }

    /// An empty store.
    pub fn empty() -> Self {
        Self {
            overrides: Vec::new(),
            by_name: HashMap::new(),
            source: OverrideSource::Inline,
        }
    }

    /// Builds a store from in-memory entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateOverride`] if two entries share a name,
    /// or [`StoreError::InvalidOverride`] for unusable entries.
    pub fn from_entries(entries: Vec<OverrideEntry>) -> Result<Self> {
        let mut store = Self::empty();
        for entry in entries {
            store.push(ManualOverride::from_entry(entry)?)?;
        }
        Ok(store)
    }

    /// Loads overrides from one `.json`, `.yml` or `.yaml` file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedFormat`] for other extensions, plus
    /// I/O, parse and consistency errors.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut store = Self::from_entries(read_entries(path)?)?;
        store.source = OverrideSource::File(path.to_path_buf());
        Ok(store)
    }

    /// Loads every override file of a directory, in sorted file-name order.
    ///
    /// Files with other extensions are skipped.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if format_of(&file_path).is_some() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut store = Self::empty();
        for file in &files {
            for entry in read_entries(file)? {
                store.push(ManualOverride::from_entry(entry)?)?;
            }
        }
        store.source = OverrideSource::Directory(path.to_path_buf());
        Ok(store)
    }

    fn push(&mut self, ovr: ManualOverride) -> Result<()> {
        let name = ovr.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(StoreError::DuplicateOverride(name));
        }
        self.by_name.insert(name, self.overrides.len());
        self.overrides.push(ovr);
        Ok(())
    }

    /// Looks up an override by entity name.
    pub fn get(&self, name: &str) -> Option<&ManualOverride> {
        self.by_name.get(name).map(|&idx| &self.overrides[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Iterates overrides in load order.
    pub fn iter(&self) -> impl Iterator<Item = &ManualOverride> {
        self.overrides.iter()
    }

    pub fn source(&self) -> &OverrideSource {
        &self.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(FileFormat::Json),
        Some("yml") | Some("yaml") => Some(FileFormat::Yaml),
        _ => None,
    }
}

fn read_entries(path: &Path) -> Result<Vec<OverrideEntry>> {
    let format = format_of(path).ok_or_else(|| StoreError::UnsupportedFormat(path.to_path_buf()))?;
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let entries = match format {
        FileFormat::Json => serde_json::from_reader(reader)?,
        FileFormat::Yaml => serde_yaml::with::singleton_map_recursive::deserialize(
            serde_yaml::Deserializer::from_reader(reader),
        )?,
    };
    Ok(entries)
}

/// Builder for a [`ManualOverrideStore`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`StoreError::NoSourcesAvailable`] is returned.
///
/// ```no_run
/// use api_decl_store::ManualOverrideStore;
///
/// let store = ManualOverrideStore::builder()
///     .from_dir("overrides/")
///     .from_file("overrides.yml")
///     .build()
///     .unwrap();
/// ```
pub struct OverrideStoreBuilder {
    sources: Vec<OverrideSource>,
}

impl OverrideStoreBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory of override files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(OverrideSource::Directory(path.into()));
        self
    }

    /// Adds a single override file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(OverrideSource::File(path.into()));
        self
    }

    /// Attempts the configured sources in order.
    pub fn build(self) -> Result<ManualOverrideStore> {
        if self.sources.is_empty() {
            return Err(StoreError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                OverrideSource::File(path) => ManualOverrideStore::from_file(path),
                OverrideSource::Directory(path) => ManualOverrideStore::from_dir(path),
                OverrideSource::Inline | OverrideSource::Multiple(_) => continue,
            };

            if let Ok(mut store) = result {
                store.source = OverrideSource::Multiple(all_sources);
                return Ok(store);
            }
        }

        Err(StoreError::NoSourcesAvailable)
    }
}

impl Default for OverrideStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
