use pretty_assertions::assert_eq;
use salt2type_extractor::{ExtractorConfig, Pipeline, ReconciledModel};
use salt2type_model::{ClassDefinition, ClassKind, Protection};
use std::io::Write;

const DUMP: &str = include_str!("fixtures/widgets.js");
const DOCS: &str = include_str!("fixtures/widgets.xml");

fn config() -> ExtractorConfig {
    ExtractorConfig {
        ignore: vec![
            "Acme.Ui.Legacy".to_string(),
            "Acme.Ui.Control:debugDump".to_string(),
        ],
        ..Default::default()
    }
}

fn fused() -> ReconciledModel {
    Pipeline::new(config()).run(DUMP, Some(DOCS)).unwrap()
}

fn class<'m>(model: &'m ReconciledModel, qualified: &str) -> &'m ClassDefinition {
    let id = model.classes.find_by_qualified_name(qualified).unwrap();
    model.classes.get(id).unwrap()
}

#[test]
fn documentation_types_the_constructor_and_factories() {
    let model = fused();
    let control = class(&model, "Acme.Ui.Control");

    assert_eq!(control.doc_id.as_deref(), Some("class_acme_1_1_ui_1_1_control"));
    assert_eq!(control.kind(), ClassKind::AbstractClass);

    let ctor = control.constructor().unwrap();
    assert_eq!(ctor.return_type.as_deref(), Some("Control"));
    assert_eq!(ctor.params[0].type_name.as_deref(), Some("string"));
    assert_eq!(
        ctor.description.as_deref(),
        Some("Creates a control bound to the element with the given id.")
    );

    let create = &control.methods[1];
    assert_eq!(create.return_type.as_deref(), Some("Control | undefined"));
    assert_eq!(create.is_static, Some(true));
    assert_eq!(create.description.as_deref(), Some("Factory for Control."));
}

#[test]
fn overloads_resolve_by_arity() {
    let model = fused();
    let control = class(&model, "Acme.Ui.Control");

    let resize = control.methods.iter().find(|m| m.name == "$resize").unwrap();
    assert_eq!(resize.protection, Some(Protection::Private));
    assert_eq!(resize.description.as_deref(), Some("Resizes to an explicit box."));
    let types: Vec<_> = resize
        .params
        .iter()
        .map(|p| p.type_name.as_deref())
        .collect();
    assert_eq!(types, vec![Some("number"), Some("number | undefined")]);

    let square = control
        .methods
        .iter()
        .find(|m| m.name == "$resize$1")
        .unwrap();
    assert_eq!(square.description.as_deref(), Some("Resizes to a square."));
}

#[test]
fn accessors_and_properties() {
    let model = fused();
    let control = class(&model, "Acme.Ui.Control");

    let get_id = control.methods.iter().find(|m| m.name == "get_id").unwrap();
    assert_eq!(get_id.return_type.as_deref(), Some("string"));
    assert_eq!(get_id.is_static, Some(false));

    let props: Vec<_> = control
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_deref()))
        .collect();
    assert_eq!(
        props,
        vec![
            ("__typeName", None),
            ("isVisible", Some("boolean")),
            ("id", Some("string")),
        ]
    );
    assert_eq!(
        control
            .properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case("id"))
            .count(),
        1
    );
}

#[test]
fn static_fields_keep_structural_defaults() {
    let model = fused();
    let button = class(&model, "Acme.Ui.Button");

    let clicked = &button.properties[0];
    assert_eq!(clicked.name, "clicked");
    assert_eq!(clicked.default_value.as_deref(), Some("0"));
    assert_eq!(clicked.type_name.as_deref(), Some("number"));
    assert_eq!(clicked.description.as_deref(), Some("Total clicks."));
    assert_eq!(clicked.is_static, Some(true));

    assert_eq!(
        button.methods[1].description.as_deref(),
        Some("Simulates a click.")
    );
}

#[test]
fn links_resolve_softly() {
    let model = fused();
    let id = model
        .classes
        .find_by_qualified_name("Acme.Ui.Control")
        .unwrap();

    let linked = model.classes.linked_classes(id);
    assert_eq!(linked.len(), 2);
    assert!(linked
        .iter()
        .all(|(_, target)| target.map(|c| c.name.as_str()) == Some("Control")));

    assert_eq!(
        model.unresolved_links(),
        vec![(
            "Acme.Ui.Button".to_string(),
            "class_acme_1_1_ui_1_1_theme".to_string()
        )]
    );
}

#[test]
fn class_kinds_survive_reconciliation() {
    let model = fused();
    let kinds: Vec<_> = model
        .classes
        .iter()
        .map(|(_, class)| (class.name.as_str(), class.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Color", ClassKind::Enum),
            ("IRenderable", ClassKind::Interface),
            ("Control", ClassKind::AbstractClass),
            ("Button", ClassKind::ConcreteClass),
            ("Box", ClassKind::ConcreteClass),
        ]
    );
}

#[test]
fn undocumented_classes_stay_untyped() {
    let model = fused();
    let color = class(&model, "Acme.Ui.Color");
    assert_eq!(color.doc_id, None);
    assert!(color.properties.iter().all(|p| p.type_name.is_none()));
}

#[test]
fn run_files_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("widgets.js");
    let docs = dir.path().join("widgets.xml");
    std::fs::File::create(&source)
        .unwrap()
        .write_all(DUMP.as_bytes())
        .unwrap();
    std::fs::File::create(&docs)
        .unwrap()
        .write_all(DOCS.as_bytes())
        .unwrap();

    let from_disk = Pipeline::new(config())
        .run_files(&source, Some(&docs))
        .unwrap();
    let in_memory = fused();
    assert_eq!(
        from_disk.to_json(false).unwrap(),
        in_memory.to_json(false).unwrap()
    );
}

#[test]
fn config_file_drives_the_ignore_list() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ignore.txt"), "Acme.Ui.Legacy\n").unwrap();
    let config_path = dir.path().join("salt2type.toml");
    std::fs::write(&config_path, "ignore_file = \"ignore.txt\"\n").unwrap();

    let config = ExtractorConfig::load(&config_path).unwrap();
    let model = Pipeline::new(config).run(DUMP, None).unwrap();
    assert_eq!(model.classes.len(), 5);
    assert!(model
        .classes
        .find_by_qualified_name("Acme.Ui.Legacy")
        .is_none());
}
