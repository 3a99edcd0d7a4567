//! End to end: metadata definitions to API trees, documents, diffs and reports.

use std::sync::Arc;

use apiscope::{
    compare::{compare, xml::to_xml as diff_to_xml, NodeKind, Presence},
    extract::Extractor,
    metadata::{
        customattributes::{CustomAttribute, CustomAttributeArgument},
        definitions::{
            AssemblyDefinition, Constant, FieldDefinition, MethodDefinition, ParameterDefinition,
            PropertyDefinition, TypeDefinition,
        },
        flags::{FieldAttributes, TypeAttributes},
        resolver::AssemblySet,
        signatures::{TypeName, TypeSignature},
    },
    report::{render, MarkdownFormatter},
    tree::{
        xml::{from_xml, to_xml},
        AssemblyTree, MemberDetail, TypeKind,
    },
    CompareConfig, ExtractorConfig, ReportConfig,
};

const PUBLIC: u32 = 0x0006;
const SPECIAL: u32 = 0x0800;
const RTSPECIAL: u32 = 0x1000;

fn method(name: &str, flags: u32, params: &[&str]) -> Arc<MethodDefinition> {
    Arc::new(MethodDefinition {
        name: name.into(),
        flags,
        params: params
            .iter()
            .zip(0u32..)
            .map(|(name, position)| ParameterDefinition::new(name, position, TypeSignature::I4))
            .collect(),
        ..Default::default()
    })
}

/// Version 1 has `Stop()`, version 2 replaces it with `Start()` and changes a few details.
fn library(version: u32) -> AssemblyDefinition {
    let v2 = version == 2;

    let inner = Arc::new(TypeDefinition {
        name: "Options".into(),
        flags: TypeAttributes::NESTED_PUBLIC | TypeAttributes::SEALED,
        base_type: Some(TypeSignature::Object),
        declaring_type: Some(TypeName::new("N", "Widget")),
        ..Default::default()
    });

    let mut methods = vec![
        method(".ctor", PUBLIC | SPECIAL | RTSPECIAL, &[]),
        method("Run", PUBLIC, &[if v2 { "count" } else { "times" }]),
        method(if v2 { "Start" } else { "Stop" }, PUBLIC, &[]),
        method("Reset", 0x0001, &[]),
    ];
    let size = method("get_Size", PUBLIC | SPECIAL, &[]);
    methods.push(size.clone());

    let mut todo = CustomAttribute::new(TypeName::new("System", "MonoTODOAttribute"));
    todo = todo.with_fixed(
        TypeSignature::String,
        CustomAttributeArgument::String("needs a real layout".into()),
    );

    let widget = Arc::new(TypeDefinition {
        namespace: "N".into(),
        name: "Widget".into(),
        flags: TypeAttributes::PUBLIC,
        base_type: Some(TypeSignature::Object),
        fields: vec![FieldDefinition {
            name: "Max".into(),
            flags: FieldAttributes::PUBLIC
                | FieldAttributes::STATIC
                | FieldAttributes::LITERAL
                | FieldAttributes::HAS_DEFAULT,
            field_type: TypeSignature::I4,
            constant: Some(Constant::I4(if v2 { 2 } else { 1 })),
            ..Default::default()
        }],
        methods,
        properties: vec![PropertyDefinition {
            name: "Size".into(),
            property_type: TypeSignature::I4,
            getter: Some(size),
            ..Default::default()
        }],
        nested_types: vec![inner.clone()],
        custom_attributes: if v2 {
            vec![CustomAttribute::new(TypeName::new("System", "ObsoleteAttribute"))]
        } else {
            vec![]
        },
        ..Default::default()
    });

    let pending = Arc::new(TypeDefinition {
        namespace: "N".into(),
        name: "Pending".into(),
        flags: TypeAttributes::PUBLIC,
        base_type: Some(TypeSignature::Object),
        custom_attributes: vec![todo],
        ..Default::default()
    });

    let hidden = Arc::new(TypeDefinition {
        namespace: "N".into(),
        name: "Hidden".into(),
        flags: TypeAttributes::NOT_PUBLIC,
        base_type: Some(TypeSignature::Object),
        ..Default::default()
    });

    let mut types = vec![widget, inner, hidden];
    if !v2 {
        types.push(pending);
    }

    AssemblyDefinition {
        name: "Lib".into(),
        version: format!("{version}.0.0.0"),
        types,
        ..Default::default()
    }
}

fn extract(assembly: &AssemblyDefinition) -> AssemblyTree {
    let set = AssemblySet::from_assemblies([assembly]);
    let config = ExtractorConfig::default();
    Extractor::new(&config, &set).extract(assembly).unwrap()
}

#[test]
fn public_surface() {
    let tree = extract(&library(1));
    assert_eq!(tree.name, "Lib");
    assert_eq!(tree.version, "1.0.0.0");
    assert_eq!(tree.namespaces.len(), 1);

    let types: Vec<&str> = tree.namespaces[0].types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(types, vec!["Pending", "Widget"]);

    let widget = &tree.namespaces[0].types[1];
    assert_eq!(widget.kind, TypeKind::Class);
    assert_eq!(widget.base.as_deref(), Some("System.Object"));
    assert_eq!(widget.nested.len(), 1);
    assert_eq!(widget.nested[0].name, "Options");
    assert!(widget.nested[0].is_sealed);

    let ctors: Vec<&str> = widget.constructors.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(ctors, vec![".ctor()"]);
    let methods: Vec<&str> = widget.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Run(System.Int32)", "Stop()"]);
    assert_eq!(widget.properties.len(), 1);

    let MemberDetail::Field(max) = &widget.fields[0].detail else {
        panic!("expected a field");
    };
    assert_eq!(max.value.as_deref(), Some("1"));

    let pending = &tree.namespaces[0].types[0];
    assert_eq!(pending.attributes.len(), 1);
    assert_eq!(pending.attributes[0].first_value(), Some("needs a real layout"));
}

#[test]
fn document_round_trip() {
    let tree = extract(&library(1));
    let document = to_xml(&tree).unwrap();
    assert_eq!(from_xml(&document).unwrap(), tree);
}

#[test]
fn version_diff() {
    let reference = extract(&library(1));
    let target = extract(&library(2));
    let diff = compare(&reference, &target, &CompareConfig::default());

    assert_eq!(
        diff.assembly.warnings,
        vec!["Assembly version is 1.0.0.0 and should be 2.0.0.0"]
    );

    let ns = diff.assembly.child(NodeKind::Namespace, "N").unwrap();
    let pending = ns.child(NodeKind::Class, "Pending").unwrap();
    assert_eq!(pending.presence, Presence::Matched);
    assert!(pending.todo);
    assert_eq!(pending.comment.as_deref(), Some("needs a real layout"));

    let widget = ns.child(NodeKind::Class, "Widget").unwrap();
    assert_eq!(widget.child(NodeKind::Method, "Stop()").unwrap().presence, Presence::Missing);
    assert_eq!(widget.child(NodeKind::Method, "Start()").unwrap().presence, Presence::Extra);
    assert_eq!(
        widget.child(NodeKind::Field, "Max").unwrap().warnings,
        vec!["Field value is 1 and should be 2"]
    );
    assert_eq!(
        widget.child(NodeKind::Attribute, "System.ObsoleteAttribute").unwrap().presence,
        Presence::Extra
    );
    let times = widget
        .child(NodeKind::Method, "Run(System.Int32)")
        .and_then(|run| run.child(NodeKind::Parameter, "times"))
        .unwrap();
    assert_eq!(times.warnings, vec!["Parameter name is times and should be count"]);

    let document = diff_to_xml(&diff).unwrap();
    assert!(document.contains("name=\"Lib\""));
    assert!(document.contains("<method name=\"Stop()\" presence=\"missing\""));

    let report = render(&diff, &ReportConfig::default(), &MarkdownFormatter);
    assert!(report.starts_with("# API diff: Lib.dll"));
    assert!(report.contains("~~`Stop()`~~ **[breaking]**"));
    assert!(report.contains("`Start()`"));
    assert!(report.contains("Field value is 1 and should be 2"));
    assert!(!report.contains("Pending"));

    let breaking = render(&diff, &ReportConfig::breaking_only(), &MarkdownFormatter);
    assert!(breaking.contains("Stop()"));
    assert!(!breaking.contains("`Start()`"));
}
