use std::path::PathBuf;

use api_decl_core::{Declaration, Member, SchemaDocument};
use api_decl_gen::{Advisory, GenerateError, GenerationRun, OutputFormat, format_report, generate};
use api_decl_store::{GeneratorConfig, ManualOverrideStore, OverrideEntry, load_schema};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load() -> (SchemaDocument, ManualOverrideStore) {
    let schema = load_schema(fixture("runtime-api.json")).expect("schema fixture should load");
    let overrides =
        ManualOverrideStore::from_file(fixture("overrides.json")).expect("override fixture should load");
    (schema, overrides)
}

fn run_fixture() -> GenerationRun {
    let (schema, overrides) = load();
    generate(&schema, &overrides, &GeneratorConfig::default()).expect("fixture should generate")
}

#[test]
fn test_categories_are_emitted_in_fixed_order() {
    let run = run_fixture();
    let names: Vec<&str> = run.declarations.iter().map(Declaration::name).collect();
    assert_eq!(
        names,
        vec![
            // builtins (native ones emit nothing)
            "uint",
            "double",
            "table",
            // constants tree
            "defines",
            // events
            "OnTickEvent",
            // classes, then the marker supertype
            "LuaControl",
            "LuaEntity",
            "LuaInventoryMembers",
            "LuaInventoryIndex",
            "LuaInventory",
            "LuaObjectBase",
            // concepts
            "MapPosition",
            "Alignment",
            "MouseButtonFlags",
            "LocalisedString",
            "BaseEntityFilter",
            "TypeEntityFilter",
            "NameEntityFilter",
            "EntityFilter",
            // globals
            "game",
            // unmatched overrides
            "EventData",
        ]
    );

    let counts = &run.report.counts;
    assert_eq!(counts.builtins, 3);
    assert_eq!(counts.defines, 1);
    assert_eq!(counts.events, 1);
    assert_eq!(counts.classes, 6);
    assert_eq!(counts.concepts, 8);
    assert_eq!(counts.globals, 1);
    assert_eq!(counts.unmatched_overrides, 1);
    assert_eq!(counts.total(), run.declarations.len());
    assert_eq!(run.report.application_version, "1.1.110");
}

#[test]
fn test_constants_are_numbered_by_sorted_position() {
    let run = run_fixture();
    assert!(run.printed.contains(
        "declare namespace defines {\n    \
         /** @see https://lua-api.factorio.com/latest/defines.html#defines.alert_type */\n    \
         enum alert_type {\n        Y = 0,\n        Z = 1,\n        X = 2,\n    }\n"
    ));
}

#[test]
fn test_array_like_class_is_split() {
    let run = run_fixture();
    assert!(run.printed.contains(
        "interface LuaInventoryMembers extends LuaObjectBase {\n    \
         clear(): void;\n    \
         readonly length: uint;\n}\n"
    ));
    assert!(run
        .printed
        .contains("type LuaInventoryIndex = { readonly [index: number]: LuaItemStack }\n"));
    assert!(run.printed.contains(
        "@see https://lua-api.factorio.com/latest/LuaInventory.html\n */\n\
         type LuaInventory = LuaInventoryMembers & LuaInventoryIndex\n"
    ));
}

#[test]
fn test_class_merges_override_members() {
    let run = run_fixture();
    assert!(run.printed.contains(
        "interface LuaEntity extends LuaControl, LuaObjectBase {\n    \
         /** Destroys the entity. */\n    \
         destroy(params?: { raise_destroy?: boolean }): boolean;\n    \
         /** Current health. */\n    \
         health: number;\n    \
         readonly name: string;\n    \
         get_health_ratio(): number;\n}\n"
    ));
    assert!(run.printed.contains(
        " * An entity. See {@link https://lua-api.factorio.com/latest/LuaEntity.html#health | health}.\n"
    ));
    assert!(run.printed.contains(" * **Note:** Entities can become invalid.\n"));
}

#[test]
fn test_triad_marker_is_synthesized_once() {
    let run = run_fixture();
    assert_eq!(run.printed.matches("interface LuaObjectBase").count(), 1);
    assert!(run.printed.contains(
        "    help(): string;\n    readonly valid: boolean;\n    readonly object_name: string;\n"
    ));
}

#[test]
fn test_concept_categories() {
    let run = run_fixture();
    let printed = &run.printed;
    assert!(printed.contains("type Alignment = \"left\" | \"center\" | \"right\"\n"));
    assert!(printed.contains("type MapPosition = { x: double; y: double } | [x: double, y: double]\n"));
    assert!(printed.contains(
        "interface MouseButtonFlags {\n    left?: boolean;\n    right?: boolean;\n}\n"
    ));
    assert!(printed.contains("type LocalisedString = string | LocalisedString[]\n"));
    assert!(printed.contains(
        "interface TypeEntityFilter extends BaseEntityFilter {\n    filter: \"type\";\n    type: string;\n}\n"
    ));
    assert!(printed.contains("type EntityFilter = TypeEntityFilter | NameEntityFilter\n"));
}

#[test]
fn test_unmatched_override_is_last_with_doc_restored() {
    let run = run_fixture();
    assert!(run.printed.ends_with(
        "/** Common event fields. */\ninterface EventData {\n    tick: uint;\n}\n"
    ));
}

#[test]
fn test_verbatim_override_prefers_schema_doc() {
    let run = run_fixture();
    let table = run
        .declarations
        .iter()
        .find(|decl| decl.name() == "table")
        .expect("table builtin");
    assert!(table.doc().is_some_and(|doc| doc.starts_with("A Lua table.")));
}

#[test]
fn test_unresolved_link_is_advisory() {
    let run = run_fixture();
    assert_eq!(
        run.report.advisories,
        vec![Advisory::UnresolvedLink {
            context: "on_tick".into(),
            reference: "NotAThing".into(),
        }]
    );
    assert_eq!(run.report.advisory_summary.get("unresolved_link"), Some(&1));
    assert!(run.printed.contains(
        "See {@link https://lua-api.factorio.com/latest/ | the wiki}."
    ));
}

#[test]
fn test_generation_is_idempotent() {
    let first = run_fixture();
    let second = run_fixture();
    assert_eq!(first.printed, second.printed);
    assert_eq!(first.report.output_sha256, second.report.output_sha256);
    assert_eq!(first.declarations, second.declarations);
}

#[test]
fn test_report_formats() {
    let run = run_fixture();
    let json = format_report(&run.report, OutputFormat::Json).expect("json report");
    let value: serde_json::Value = serde_json::from_str(&json).expect("report is valid JSON");
    assert_eq!(value["counts"]["classes"], 6);
    assert_eq!(value["advisories"][0]["code"], "unresolved_link");

    let text = format_report(&run.report, OutputFormat::Declarations).expect("text report");
    assert!(text.contains(&run.report.output_sha256));
}

#[test]
fn test_member_shape_conflict_aborts_run() {
    let (schema, _) = load();
    let entries: Vec<OverrideEntry> = serde_json::from_str(
        r#"[{"declaration":{"kind":"interface","name":"LuaEntity","members":[
            {"kind":"method","name":"health"}]}}]"#,
    )
    .unwrap();
    let overrides = ManualOverrideStore::from_entries(entries).unwrap();

    let err = generate(&schema, &overrides, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::MemberShapeMismatch { ref entity, ref member, .. }
            if entity == "LuaEntity" && member == "health"
    ));
    assert_eq!(
        err.to_string(),
        "LuaEntity.health: manual override member is a method, expected a property"
    );
}

#[test]
fn test_override_members_keep_their_shape() {
    let run = run_fixture();
    let Some(Declaration::Interface(entity)) = run
        .declarations
        .iter()
        .find(|decl| decl.name() == "LuaEntity")
    else {
        panic!("LuaEntity should be an interface");
    };
    assert!(matches!(
        entity.find_member("get_health_ratio"),
        Some(Member::Method(_))
    ));
}
