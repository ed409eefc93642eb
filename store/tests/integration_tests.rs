use std::path::Path;

use api_decl_core::{Declaration, Member, TypeNode};
use api_decl_store::{
    GeneratorConfig, ManualOverrideStore, OverrideKind, OverrideSource, StoreError, load_schema,
};

const INVENTORY_YAML: &str = "\
- declaration:
    kind: interface
    name: LuaInventory
    doc: Hand-written inventory.
    extends:
      - reference:
          name: ReadonlyArray
          args:
            - reference: { name: LuaItemStack }
    members:
      - kind: method
        name: clear
  index_shape:
    reference: { name: InventoryIndex }
- declaration:
    kind: namespace
    name: defines.events
    body: []
";

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_yaml_override_file_with_index_shape() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "overrides.yml", INVENTORY_YAML);

    let store = ManualOverrideStore::from_file(dir.path().join("overrides.yml")).unwrap();
    assert_eq!(store.len(), 2);
    assert!(matches!(store.source(), OverrideSource::File(_)));

    let inventory = store.get("LuaInventory").unwrap();
    assert_eq!(inventory.kind(), OverrideKind::StructuralType);
    assert_eq!(inventory.doc(), Some("Hand-written inventory."));
    assert_eq!(inventory.declaration().doc(), None);
    assert_eq!(
        inventory.index_shape(),
        Some(&TypeNode::reference("InventoryIndex"))
    );
    assert_eq!(
        inventory.supertypes(),
        &[TypeNode::generic(
            "ReadonlyArray",
            vec![TypeNode::reference("LuaItemStack")]
        )]
    );
    assert!(matches!(inventory.member("clear"), Some(Member::Method(_))));

    let events = store.get("defines.events").unwrap();
    assert_eq!(events.kind(), OverrideKind::NamespaceOrEnumeration);
    assert!(matches!(events.declaration(), Declaration::Namespace(_)));
}

#[test]
fn test_duplicate_across_directory_files_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.yml", INVENTORY_YAML);
    write(
        dir.path(),
        "b.json",
        r#"[{"declaration":{"kind":"interface","name":"LuaInventory"}}]"#,
    );

    let err = ManualOverrideStore::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateOverride(ref name) if name == "LuaInventory"));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "overrides.toml", "");

    let err = ManualOverrideStore::from_file(dir.path().join("overrides.toml")).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedFormat(_)));
}

#[test]
fn test_schema_and_config_load_together() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "runtime-api.json",
        r#"{"application":"factorio","stage":"runtime","application_version":"1.1.110","api_version":3,
            "builtin_types":[{"name":"uint","order":0,"description":""}],
            "defines":[{"name":"events","order":0,"description":"",
                        "values":[{"name":"on_tick","order":0,"description":""}]}]}"#,
    );
    write(dir.path(), "api-decl.yml", "constants_root: consts\nnumeric_builtins: [uint]\n");

    let schema = load_schema(dir.path().join("runtime-api.json")).unwrap();
    let config = GeneratorConfig::load(dir.path().join("api-decl.yml")).unwrap();

    assert_eq!(schema.application_version, "1.1.110");
    assert_eq!(schema.define_paths(&config.constants_root), vec!["consts.events", "consts.events.on_tick"]);
    assert!(config.is_numeric_builtin("uint"));
    assert!(!config.is_numeric_builtin("double"));
    assert_eq!(config.marker_supertype, "LuaObjectBase");
}

#[test]
fn test_stage_mismatch_is_invalid_schema() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "prototype-api.json",
        r#"{"application":"factorio","stage":"prototype","api_version":3}"#,
    );

    let err = load_schema(dir.path().join("prototype-api.json")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidSchema(_)));
}
