//! Builders for API tree fixtures.
//!
//! Unit tests describe the two sides of a comparison as small [`AssemblyTree`]s; these
//! helpers keep the fixtures short.

use crate::tree::{
    AssemblyTree, MemberDetail, MemberRecord, MethodDetail, NamespaceRecord, ParameterRecord,
    PropertyDetail, SignatureFlags, TypeKind, TypeRecord,
};

/// Public instance method returning void; every parameter is an `int`.
pub fn method(name: &str, flags: SignatureFlags, parameters: &[&str]) -> MemberRecord {
    MemberRecord {
        name: name.into(),
        attrib: 0x0086,
        attributes: vec![],
        detail: MemberDetail::Method(MethodDetail {
            return_type: Some("System.Void".into()),
            parameters: parameters
                .iter()
                .zip(0u32..)
                .map(|(name, position)| ParameterRecord {
                    name: (*name).into(),
                    position,
                    param_type: "System.Int32".into(),
                    ..Default::default()
                })
                .collect(),
            flags,
            ..Default::default()
        }),
    }
}

/// `int` property with the given accessors.
pub fn property(name: &str, accessors: Vec<MemberRecord>) -> MemberRecord {
    MemberRecord {
        name: name.into(),
        attrib: 0,
        attributes: vec![],
        detail: MemberDetail::Property(PropertyDetail {
            property_type: "System.Int32".into(),
            params: None,
            accessors,
        }),
    }
}

/// Abstract virtual signature flags.
pub fn abstract_flags() -> SignatureFlags {
    SignatureFlags {
        is_abstract: true,
        is_virtual: true,
        ..Default::default()
    }
}

/// Virtual signature flags.
pub fn virtual_flags() -> SignatureFlags {
    SignatureFlags {
        is_virtual: true,
        ..Default::default()
    }
}

/// Type deriving from `System.Object` (or nothing, for interfaces).
pub fn type_record(name: &str, kind: TypeKind) -> TypeRecord {
    TypeRecord {
        name: name.into(),
        kind,
        base: (kind != TypeKind::Interface).then(|| "System.Object".to_string()),
        ..Default::default()
    }
}

/// Assembly `Lib` 1.0.0.0 with one namespace `N`.
pub fn assembly(types: Vec<TypeRecord>) -> AssemblyTree {
    AssemblyTree {
        name: "Lib".into(),
        version: "1.0.0.0".into(),
        attributes: vec![],
        namespaces: vec![NamespaceRecord {
            name: "N".into(),
            types,
        }],
    }
}
