//! Comparison of members, accessors, parameters and generic parameters.

use crate::{
    compare::{
        node::{DiffNode, NodeKind},
        Comparer,
    },
    metadata::flags::{
        describe_event_flags, describe_field_flags, describe_generic_param_flags,
        describe_method_flags, describe_param_flags, normalize_method_flags,
    },
    tree::{
        GenericParameterRecord, MemberDetail, MemberKind, MemberRecord, ParameterRecord,
        SignatureFlags,
    },
};

/// Subject of the warning raised for a renamed parameter.
pub const PARAMETER_NAME: &str = "Parameter name";

/// Warning raised for a method that gains only the `Virtual` signature flag.
pub const BECAME_VIRTUAL: &str = "should be Virtual";

const NONE: &str = "(none)";
const NO_DEFAULT: &str = "(no default value)";

/// Diff node kind of a member kind.
#[must_use]
pub fn node_kind(kind: MemberKind) -> NodeKind {
    match kind {
        MemberKind::Field => NodeKind::Field,
        MemberKind::Constructor => NodeKind::Constructor,
        MemberKind::Property => NodeKind::Property,
        MemberKind::Event => NodeKind::Event,
        MemberKind::Method => NodeKind::Method,
    }
}

/// Text of the attribute word of a member as it is compared; `None` for kinds whose
/// attribute words are not compared.
fn access_text(member: &MemberRecord) -> Option<String> {
    match member.detail {
        MemberDetail::Field(_) => Some(describe_field_flags(member.attrib)),
        MemberDetail::Event(_) => Some(describe_event_flags(member.attrib)),
        MemberDetail::Method(_) | MemberDetail::Constructor(_) => {
            Some(describe_method_flags(normalize_method_flags(member.attrib)))
        }
        MemberDetail::Property(_) => None,
    }
}

fn flags_warning(reference: SignatureFlags, target: SignatureFlags) -> Option<String> {
    if reference == target {
        None
    } else if target.is_empty() {
        Some(format!("should not be {reference}"))
    } else if reference.is_empty() {
        Some(format!("should be {target}"))
    } else {
        Some(format!("{reference} and should be {target}"))
    }
}

impl Comparer<'_> {
    /// Compare the members of one kind into a group of `parent`.
    pub(crate) fn compare_members(
        &self,
        parent: &mut DiffNode,
        kind: MemberKind,
        reference: &[MemberRecord],
        target: &[MemberRecord],
    ) {
        self.compare_group(
            parent,
            node_kind(kind),
            reference,
            target,
            MemberRecord::signature_key,
            |expected, found| self.compare_member(node_kind(kind), expected, found),
        );
    }

    /// Compare one member found on both sides.
    pub(crate) fn compare_member(&self, kind: NodeKind, reference: &MemberRecord, target: &MemberRecord) -> DiffNode {
        let mut node = DiffNode::new(kind, &reference.name);
        self.compare_attributes(&mut node, &reference.attributes, &target.attributes);

        if let Some(expected) = access_text(reference) {
            let found = access_text(target).unwrap_or_default();
            if expected != found {
                node.warn(format!("Attributes are '{expected}' and should be '{found}'"));
            }
        }

        match (&reference.detail, &target.detail) {
            (MemberDetail::Field(expected), MemberDetail::Field(found)) => {
                node.warn_changed("Field type", expected.field_type.as_str(), found.field_type.as_str());
                node.warn_changed(
                    "Field value",
                    expected.value.as_deref().unwrap_or(NONE),
                    found.value.as_deref().unwrap_or(NONE),
                );
            }
            (MemberDetail::Property(expected), MemberDetail::Property(found)) => {
                self.compare_group(
                    &mut node,
                    NodeKind::Method,
                    &expected.accessors,
                    &found.accessors,
                    MemberRecord::signature_key,
                    |a, b| self.compare_member(NodeKind::Method, a, b),
                );
            }
            (MemberDetail::Event(expected), MemberDetail::Event(found)) => {
                node.warn_changed("Event type", expected.event_type.as_str(), found.event_type.as_str());
                self.compare_group(
                    &mut node,
                    NodeKind::Method,
                    &expected.accessors,
                    &found.accessors,
                    MemberRecord::signature_key,
                    |a, b| self.compare_member(NodeKind::Method, a, b),
                );
            }
            (
                MemberDetail::Method(expected) | MemberDetail::Constructor(expected),
                MemberDetail::Method(found) | MemberDetail::Constructor(found),
            ) => {
                if let Some(warning) = flags_warning(expected.flags, found.flags) {
                    node.warn(warning);
                }
                node.warn_changed(
                    "Return type",
                    expected.return_type.as_deref().unwrap_or(NONE),
                    found.return_type.as_deref().unwrap_or(NONE),
                );
                self.compare_group(
                    &mut node,
                    NodeKind::Parameter,
                    &expected.parameters,
                    &found.parameters,
                    |parameter| parameter.position.to_string(),
                    |a, b| self.compare_parameter(a, b),
                );
                self.compare_generic_parameters(&mut node, &expected.generic_parameters, &found.generic_parameters);
            }
            _ => node.warn(format!(
                "Member kind is {} and should be {}",
                reference.kind(),
                target.kind()
            )),
        }
        node
    }

    fn compare_parameter(&self, reference: &ParameterRecord, target: &ParameterRecord) -> DiffNode {
        let mut node = DiffNode::new(NodeKind::Parameter, &reference.name);
        node.warn_changed(PARAMETER_NAME, reference.name.as_str(), target.name.as_str());
        node.warn_changed("Parameter type", reference.param_type.as_str(), target.param_type.as_str());
        node.warn_changed(
            "Parameter attributes",
            describe_param_flags(reference.attrib),
            describe_param_flags(target.attrib),
        );
        node.warn_changed("Parameter direction", reference.direction, target.direction);
        node.warn_changed("Parameter optional", reference.optional, target.optional);
        node.warn_changed(
            "Parameter default value",
            reference.default_value.as_deref().unwrap_or(NO_DEFAULT),
            target.default_value.as_deref().unwrap_or(NO_DEFAULT),
        );
        self.compare_attributes(&mut node, &reference.attributes, &target.attributes);
        node
    }

    /// Compare generic parameter lists, keyed by name.
    pub(crate) fn compare_generic_parameters(
        &self,
        parent: &mut DiffNode,
        reference: &[GenericParameterRecord],
        target: &[GenericParameterRecord],
    ) {
        self.compare_group(
            parent,
            NodeKind::GenericParameter,
            reference,
            target,
            |parameter| parameter.name.clone(),
            |expected, found| {
                let mut node = DiffNode::new(NodeKind::GenericParameter, &expected.name);
                node.warn_changed(
                    "Generic parameter attributes",
                    describe_generic_param_flags(expected.attributes),
                    describe_generic_param_flags(found.attributes),
                );
                node.warn_changed(
                    "Constraints",
                    expected.constraints.join(", "),
                    found.constraints.join(", "),
                );
                self.compare_attributes(&mut node, &expected.custom_attributes, &found.custom_attributes);
                node
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::node::Presence,
        config::CompareConfig,
        tree::{FieldDetail, MethodDetail},
    };

    fn method(name: &str, flags: SignatureFlags, parameters: Vec<ParameterRecord>) -> MemberRecord {
        MemberRecord {
            name: name.into(),
            attrib: 0x0086,
            attributes: vec![],
            detail: MemberDetail::Method(MethodDetail {
                return_type: Some("System.Void".into()),
                parameters,
                flags,
                ..Default::default()
            }),
        }
    }

    fn int(name: &str, position: u32) -> ParameterRecord {
        ParameterRecord {
            name: name.into(),
            position,
            param_type: "System.Int32".into(),
            ..Default::default()
        }
    }

    #[test]
    fn signature_flag_messages() {
        let none = SignatureFlags::default();
        let virt = SignatureFlags {
            is_virtual: true,
            ..Default::default()
        };
        let abstract_virtual = SignatureFlags {
            is_abstract: true,
            is_virtual: true,
            ..Default::default()
        };
        assert_eq!(flags_warning(none, none), None);
        assert_eq!(flags_warning(virt, none).as_deref(), Some("should not be Virtual"));
        assert_eq!(flags_warning(none, virt).as_deref(), Some(BECAME_VIRTUAL));
        assert_eq!(
            flags_warning(virt, abstract_virtual).as_deref(),
            Some("Virtual and should be Abstract, Virtual")
        );
    }

    #[test]
    fn overloads_and_parameters() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let reference = vec![
            method("M()", SignatureFlags::default(), vec![]),
            method("N(System.Int32)", SignatureFlags::default(), vec![int("a", 0)]),
            method("P(System.Int32)", SignatureFlags::default(), vec![int("value", 0)]),
        ];
        let target = vec![
            method("M()", SignatureFlags::default(), vec![]),
            method("N(System.Int32, System.Int32)", SignatureFlags::default(), vec![int("a", 0), int("b", 1)]),
            method("P(System.Int32)", SignatureFlags::default(), vec![int("v", 0)]),
        ];

        let mut parent = DiffNode::new(NodeKind::Class, "Foo");
        comparer.compare_members(&mut parent, MemberKind::Method, &reference, &target);

        let m = parent.child(NodeKind::Method, "M()").unwrap();
        assert_eq!(m.presence, Presence::Matched);
        assert!(m.warnings.is_empty());
        assert_eq!(
            parent.child(NodeKind::Method, "N(System.Int32)").unwrap().presence,
            Presence::Missing
        );
        assert_eq!(
            parent.child(NodeKind::Method, "N(System.Int32, System.Int32)").unwrap().presence,
            Presence::Extra
        );

        let p = parent.child(NodeKind::Method, "P(System.Int32)").unwrap();
        let value = p.child(NodeKind::Parameter, "value").unwrap();
        assert_eq!(value.warnings, vec!["Parameter name is value and should be v"]);
        assert_eq!(p.counters.present, 1);
        assert_eq!(p.counters.warning_total, 1);
    }

    #[test]
    fn field_value_and_access() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let field = |value: &str, attrib: u32| MemberRecord {
            name: "X".into(),
            attrib,
            attributes: vec![],
            detail: MemberDetail::Field(FieldDetail {
                field_type: "System.Int32".into(),
                value: Some(value.into()),
            }),
        };

        let node = comparer.compare_member(NodeKind::Field, &field("1", 0x8056), &field("2", 0x8056));
        assert_eq!(node.warnings, vec!["Field value is 1 and should be 2"]);

        let node = comparer.compare_member(NodeKind::Field, &field("1", 0x8056), &field("1", 0x8054));
        assert_eq!(
            node.warnings,
            vec!["Attributes are 'Public, Static, Literal, HasDefault' and should be 'Family, Static, Literal, HasDefault'"]
        );
    }

    #[test]
    fn method_access_is_normalized() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let mut a = method("M()", SignatureFlags::default(), vec![]);
        let mut b = a.clone();
        a.attrib = 0x0085;
        b.attrib = 0x0084 | 0x4000 | 0x0100;
        let node = comparer.compare_member(NodeKind::Method, &a, &b);
        assert!(node.warnings.iter().all(|w| !w.starts_with("Attributes")), "{:?}", node.warnings);
    }
}
