use pretty_assertions::assert_eq;
use salt2type_extractor::{ExtractError, IgnoreList, StructuralExtractor, StructuralModel};
use salt2type_model::{ClassDefinition, ClassKind};

const DUMP: &str = include_str!("fixtures/widgets.js");

fn extract() -> StructuralModel {
    let ignore = IgnoreList::parse("Acme.Ui.Legacy\nAcme.Ui.Control:debugDump\n");
    StructuralExtractor::new(ignore).extract_str(DUMP).unwrap()
}

fn class<'m>(model: &'m StructuralModel, qualified: &str) -> &'m ClassDefinition {
    let id = model
        .classes
        .find_by_qualified_name(qualified)
        .unwrap_or_else(|| panic!("{qualified} not extracted"));
    model.classes.get(id).unwrap()
}

fn method_names(class: &ClassDefinition) -> Vec<&str> {
    class.methods.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn registers_every_class_but_the_ignored_one() {
    let model = extract();
    assert_eq!(model.assembly_name, "Acme.Ui");

    let names: Vec<_> = model
        .classes
        .iter()
        .map(|(_, class)| class.qualified_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "Acme.Ui.Color",
            "Acme.Ui.IRenderable",
            "Acme.Ui.Control",
            "Acme.Ui.Button",
            "Acme.Ui.Box",
        ]
    );
    assert!(model.classes.find_by_var_id("$Acme_Ui_Legacy").is_none());
}

#[test]
fn control_members() {
    let model = extract();
    let control = class(&model, "Acme.Ui.Control");

    assert_eq!(
        method_names(control),
        vec!["", "create", "cast", "get_id", "$resize", "$resize$1"]
    );
    assert_eq!(control.interfaces, vec!["$Acme_Ui_IRenderable"]);
    assert_eq!(control.base_class, None);

    let ctor = control.constructor().unwrap();
    assert_eq!(ctor.arity(), 1);
    assert_eq!(
        ctor.body,
        Some(vec![
            "\t\tthis.$id = null;".to_string(),
            "\t\tthis.$id = id;".to_string()
        ])
    );

    let create = &control.methods[1];
    assert_eq!(create.is_static, Some(true));
    assert_eq!(
        create.body,
        Some(vec!["\t\treturn new Control(id);".to_string()])
    );

    let cast = &control.methods[2];
    assert_eq!(cast.type_params, Some(vec!["T".to_string()]));
    assert_eq!(cast.params[0].name, "value");

    let resize = &control.methods[4];
    assert_eq!(resize.arity(), 2);
    assert_eq!(
        resize.body,
        Some(vec!["\t\t\tthis.$layout(ss.cast<number>(width));".to_string()])
    );

    let props: Vec<_> = control
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_deref(), p.is_static))
        .collect();
    assert_eq!(
        props,
        vec![
            ("__typeName", Some("'Acme.Ui.Control'"), Some(true)),
            ("isVisible", Some("true"), None),
        ]
    );
}

#[test]
fn button_inherits_and_gets_static_state() {
    let model = extract();
    let button = class(&model, "Acme.Ui.Button");

    assert_eq!(button.base_class.as_deref(), Some("$Acme_Ui_Control"));
    assert_eq!(method_names(button), vec!["", "click"]);
    assert_eq!(
        button.methods[1].body,
        Some(vec!["\t\t\tButton.clicked++;".to_string()])
    );

    let base = model
        .classes
        .resolve_link(button.base_class.as_deref().unwrap())
        .unwrap();
    assert_eq!(base.name, "Control");

    let statics: Vec<_> = button
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_deref()))
        .collect();
    assert_eq!(statics, vec![("clicked", Some("0")), ("theme", None)]);
    assert!(button.properties.iter().all(|p| p.is_static == Some(true)));
}

#[test]
fn enums_and_generics() {
    let model = extract();

    let color = class(&model, "Acme.Ui.Color");
    assert_eq!(color.kind(), ClassKind::Enum);
    assert_eq!(color.is_flags, None);
    let members: Vec<_> = color.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(members, vec!["red", "green", "blue"]);

    let boxed = class(&model, "Acme.Ui.Box");
    assert_eq!(boxed.generic_arity, 1);
    assert_eq!(boxed.kind(), ClassKind::ConcreteClass);
    assert!(boxed.properties.is_empty());

    let renderable = class(&model, "Acme.Ui.IRenderable");
    assert_eq!(renderable.properties[0].name, "render");
    assert_eq!(renderable.properties[0].default_value.as_deref(), Some("null"));
    assert!(renderable.constructor().is_some());
    assert_eq!(renderable.kind(), ClassKind::Interface);
}

#[test]
fn globals_skip_ignored_receivers() {
    let model = extract();
    assert_eq!(
        model.globals,
        vec![
            "\tglobal.Acme = global.Acme || {};",
            "\tglobal.Acme.Ui = global.Acme.Ui || {};",
            "\tglobal.Acme.Ui.Color = $Acme_Ui_Color;",
            "\tglobal.Acme.Ui.IRenderable = $Acme_Ui_IRenderable;",
            "\tglobal.Acme.Ui.Control = $Acme_Ui_Control;",
            "\tglobal.Acme.Ui.Button = $Acme_Ui_Button;",
            "\tglobal.Acme.Ui.Box = $Acme_Ui_Box;",
            "",
            "\t\t$Acme_Ui_Button.theme = $.extend({}, defaults);",
            "\t\tss.registerAll();",
        ]
    );
}

#[test]
fn without_ignore_list_everything_is_kept() {
    let model = StructuralExtractor::default().extract_str(DUMP).unwrap();
    assert_eq!(model.classes.len(), 6);

    let control = class(&model, "Acme.Ui.Control");
    assert!(control.methods.iter().any(|m| m.name == "debugDump"));

    let legacy = class(&model, "Acme.Ui.Legacy");
    assert_eq!(legacy.properties.len(), 3);
}

#[test]
fn truncated_dump_reports_unterminated_block() {
    let cut = DUMP
        .lines()
        .take_while(|line| !line.starts_with("\t}, null, ["))
        .collect::<Vec<_>>()
        .join("\n");

    let err = StructuralExtractor::default().extract_str(&cut).unwrap_err();
    match err {
        ExtractError::UnterminatedBlock { terminator, .. } => assert_eq!(terminator, "\\t}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_statement_is_rejected_with_its_line() {
    let mut lines: Vec<&str> = DUMP.lines().collect();
    lines.insert(3, "\tdebugger;");

    let err = StructuralExtractor::default()
        .extract_lines(&lines)
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported line 4: \tdebugger;");
}
