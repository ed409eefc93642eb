//! Generator configuration.
//!
//! Loaded from a YAML file; every field has a default, so an empty file (or
//! no file at all) yields [`GeneratorConfig::default`].
//!
//! # Example YAML
//!
//! ```yaml
//! doc_base_url: "https://lua-api.factorio.com/1.1.110/"
//! constants_root: defines
//! marker_supertype: LuaObjectBase
//! shared_page_suffix: ControlBehavior
//! shared_page: LuaControlBehavior
//! native_builtins: [string, boolean, number]
//! numeric_builtins: [double, float, int, int8, uint, uint8, uint16, uint64]
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for one synthesis run.
///
/// # Examples
///
/// ```
/// # use api_decl_store::GeneratorConfig;
/// let config: GeneratorConfig = serde_yaml::from_str("constants_root: consts").unwrap();
/// assert_eq!(config.constants_root, "consts");
/// assert!(config.is_numeric_builtin("uint"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of the online API documentation, with trailing slash.
    pub doc_base_url: String,
    /// Name of the implicit namespace rooting the constants tree.
    pub constants_root: String,
    /// Supertype that replaces the `help` / `valid` / `object_name` triad.
    pub marker_supertype: String,
    /// Class-name suffix whose classes share one documentation page.
    pub shared_page_suffix: String,
    /// The page classes ending in [`shared_page_suffix`](Self::shared_page_suffix) link to.
    pub shared_page: String,
    /// Builtins that already exist in the target language.
    pub native_builtins: Vec<String>,
    /// Builtins that alias the target number type.
    pub numeric_builtins: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            doc_base_url: "https://lua-api.factorio.com/latest/".to_string(),
            constants_root: "defines".to_string(),
            marker_supertype: "LuaObjectBase".to_string(),
            shared_page_suffix: "ControlBehavior".to_string(),
            shared_page: "LuaControlBehavior".to_string(),
            native_builtins: ["string", "boolean", "number"]
                .map(String::from)
                .to_vec(),
            numeric_builtins: [
                "double", "float", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
                "uint16", "uint32", "uint64",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::StoreError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::StoreError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn is_native_builtin(&self, name: &str) -> bool {
        self.native_builtins.iter().any(|b| b == name)
    }

    pub fn is_numeric_builtin(&self, name: &str) -> bool {
        self.numeric_builtins.iter().any(|b| b == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config: GeneratorConfig = serde_yaml::from_str("{}").unwrap();
        let default = GeneratorConfig::default();
        assert_eq!(config.doc_base_url, default.doc_base_url);
        assert_eq!(config.constants_root, "defines");
        assert_eq!(config.numeric_builtins, default.numeric_builtins);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config: GeneratorConfig =
            serde_yaml::from_str("doc_base_url: \"https://example.com/api/\"\n").unwrap();
        assert_eq!(config.doc_base_url, "https://example.com/api/");
        assert_eq!(config.marker_supertype, "LuaObjectBase");
    }

    #[test]
    fn test_builtin_classification() {
        let config = GeneratorConfig::default();
        assert!(config.is_native_builtin("string"));
        assert!(!config.is_native_builtin("uint"));
        assert!(config.is_numeric_builtin("uint8"));
        assert!(!config.is_numeric_builtin("LuaObject"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut original = GeneratorConfig::default();
        original.marker_supertype = "ObjectBase".to_string();
        original.save(&path).unwrap();

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded.marker_supertype, "ObjectBase");
        assert_eq!(loaded.shared_page, original.shared_page);
    }
}
