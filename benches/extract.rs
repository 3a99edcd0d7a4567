//! Benchmarks for API tree extraction and the tree document.

extern crate apiscope;

use std::sync::Arc;

use apiscope::{
    extract::Extractor,
    metadata::{
        definitions::{
            AssemblyDefinition, FieldDefinition, MethodDefinition, ParameterDefinition,
            PropertyDefinition, TypeDefinition,
        },
        flags::{FieldAttributes, TypeAttributes},
        resolver::AssemblySet,
        signatures::TypeSignature,
    },
    tree::xml::{from_xml, to_xml},
    ExtractorConfig,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const PUBLIC: u32 = 0x0006;
const SPECIAL: u32 = 0x0800;

fn method(name: &str, flags: u32, params: usize) -> Arc<MethodDefinition> {
    Arc::new(MethodDefinition {
        name: name.into(),
        flags,
        params: (0..params)
            .map(|p| ParameterDefinition::new(&format!("p{p}"), p as u32, TypeSignature::I4))
            .collect(),
        ..Default::default()
    })
}

/// An assembly of 200 classes with overloads, a property and a field each.
fn synthetic() -> AssemblyDefinition {
    let types = (0..200)
        .map(|t| {
            let getter = method("get_Count", PUBLIC | SPECIAL, 0);
            let mut methods: Vec<_> = (0..10)
                .flat_map(|m| (0..3).map(move |arity| method(&format!("M{m}"), PUBLIC, arity)))
                .collect();
            methods.push(getter.clone());
            Arc::new(TypeDefinition {
                namespace: format!("Bench.N{}", t % 10),
                name: format!("T{t}"),
                flags: TypeAttributes::PUBLIC,
                base_type: Some(TypeSignature::Object),
                fields: vec![FieldDefinition {
                    name: "Value".into(),
                    flags: FieldAttributes::PUBLIC,
                    field_type: TypeSignature::String,
                    ..Default::default()
                }],
                methods,
                properties: vec![PropertyDefinition {
                    name: "Count".into(),
                    property_type: TypeSignature::I4,
                    getter: Some(getter),
                    ..Default::default()
                }],
                ..Default::default()
            })
        })
        .collect();

    AssemblyDefinition {
        name: "Bench".into(),
        version: "1.0.0.0".into(),
        types,
        ..Default::default()
    }
}

/// Extracting the API tree of one assembly.
fn bench_extract(c: &mut Criterion) {
    let assembly = synthetic();
    let set = AssemblySet::from_assemblies([&assembly]);
    let config = ExtractorConfig::default();
    let extractor = Extractor::new(&config, &set);

    c.bench_function("extract_200_types", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&assembly)).unwrap()));
    });
}

/// Writing and reading back the tree document.
fn bench_document(c: &mut Criterion) {
    let assembly = synthetic();
    let set = AssemblySet::from_assemblies([&assembly]);
    let config = ExtractorConfig::default();
    let tree = Extractor::new(&config, &set).extract(&assembly).unwrap();
    let document = to_xml(&tree).unwrap();

    c.bench_function("tree_to_xml", |b| {
        b.iter(|| black_box(to_xml(black_box(&tree)).unwrap()));
    });
    c.bench_function("tree_from_xml", |b| {
        b.iter(|| black_box(from_xml(black_box(&document)).unwrap()));
    });
}

criterion_group!(benches, bench_extract, bench_document);
criterion_main!(benches);
