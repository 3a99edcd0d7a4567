//! API tree fixtures shared by the integration tests.
#![allow(dead_code)]

use apiscope::tree::{
    AssemblyTree, AttributeRecord, FieldDetail, MemberDetail, MemberRecord, MethodDetail,
    NamespaceRecord, ParameterRecord, TypeKind, TypeRecord,
};

pub const TODO_MARKER: &str = "System.MonoTODOAttribute";

pub fn method(name: &str, parameter_types: &[&str]) -> MemberRecord {
    MemberRecord {
        name: format!("{name}({})", parameter_types.join(", ")),
        attrib: 0x0086,
        attributes: vec![],
        detail: MemberDetail::Method(MethodDetail {
            return_type: Some("System.Void".into()),
            parameters: parameter_types
                .iter()
                .zip(0u32..)
                .map(|(ty, position)| ParameterRecord {
                    name: format!("p{position}"),
                    position,
                    param_type: (*ty).into(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }),
    }
}

pub fn operator(name: &str, parameter: &str, return_type: &str) -> MemberRecord {
    let mut record = method(name, &[parameter]);
    record.attrib = 0x0896;
    if let MemberDetail::Method(detail) = &mut record.detail {
        detail.return_type = Some(return_type.into());
        detail.flags.is_static = true;
    }
    record
}

pub fn constant(name: &str, value: &str) -> MemberRecord {
    MemberRecord {
        name: name.into(),
        attrib: 0x8056,
        attributes: vec![],
        detail: MemberDetail::Field(FieldDetail {
            field_type: "System.Int32".into(),
            value: Some(value.into()),
        }),
    }
}

pub fn todo(comment: &str) -> AttributeRecord {
    AttributeRecord::new(TODO_MARKER).with_property("Comment", Some(comment))
}

pub fn class(name: &str) -> TypeRecord {
    TypeRecord {
        name: name.into(),
        kind: TypeKind::Class,
        base: Some("System.Object".into()),
        ..Default::default()
    }
}

pub fn assembly(version: &str, namespaces: Vec<(&str, Vec<TypeRecord>)>) -> AssemblyTree {
    AssemblyTree {
        name: "Lib".into(),
        version: version.into(),
        attributes: vec![],
        namespaces: namespaces
            .into_iter()
            .map(|(name, types)| NamespaceRecord {
                name: name.into(),
                types,
            })
            .collect(),
    }
}
