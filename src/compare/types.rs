//! Comparison of namespaces and types.

use strum::IntoEnumIterator;

use crate::{
    compare::{
        node::{DiffNode, NodeKind},
        Comparer,
    },
    tree::{MemberKind, NamespaceRecord, TypeRecord},
};

impl Comparer<'_> {
    /// Compare the namespaces of two assemblies into a group of `parent`.
    pub(crate) fn compare_namespaces(
        &self,
        parent: &mut DiffNode,
        reference: &[NamespaceRecord],
        target: &[NamespaceRecord],
    ) {
        self.compare_group(
            parent,
            NodeKind::Namespace,
            reference,
            target,
            |ns| ns.name.clone(),
            |expected, found| {
                let mut node = DiffNode::new(NodeKind::Namespace, &expected.name);
                self.compare_types(&mut node, &expected.types, &found.types);
                node
            },
        );
    }

    /// Compare sibling types, keyed by name, into a `classes` group of `parent`.
    pub(crate) fn compare_types(&self, parent: &mut DiffNode, reference: &[TypeRecord], target: &[TypeRecord]) {
        self.compare_group(
            parent,
            NodeKind::Class,
            reference,
            target,
            |ty| ty.name.clone(),
            |expected, found| self.compare_type(expected, found),
        );
    }

    /// Compare one type found on both sides, members and nested types included.
    pub fn compare_type(&self, reference: &TypeRecord, target: &TypeRecord) -> DiffNode {
        let mut node = DiffNode::new(NodeKind::Class, &reference.name);
        node.type_kind = Some(reference.kind);

        self.compare_attributes(&mut node, &reference.attributes, &target.attributes);

        node.warn_changed("Class type", reference.kind, target.kind);
        node.warn_changed(
            "Base class",
            reference.base.as_deref().unwrap_or("(none)"),
            target.base.as_deref().unwrap_or("(none)"),
        );

        if reference.is_static() != target.is_static() {
            node.warn(format!("Should {}be static", if target.is_static() { "" } else { "not " }));
        } else {
            if reference.is_abstract != target.is_abstract {
                node.warn(format!("Should {}be abstract", if target.is_abstract { "" } else { "not " }));
            }
            if reference.is_sealed != target.is_sealed {
                node.warn(format!("Should {}be sealed", if target.is_sealed { "" } else { "not " }));
            }
        }
        if reference.is_serializable != target.is_serializable {
            node.warn(format!(
                "Should {}be serializable",
                if target.is_serializable { "" } else { "not " }
            ));
        }

        node.warn_changed("CharSet", reference.charset, target.charset);
        node.warn_changed(
            "Layout",
            reference.layout.map_or_else(|| "(none)".to_string(), |l| l.to_string()),
            target.layout.map_or_else(|| "(none)".to_string(), |l| l.to_string()),
        );

        self.compare_group(
            &mut node,
            NodeKind::Interface,
            &reference.interfaces,
            &target.interfaces,
            |name| name.clone(),
            |expected, _| DiffNode::new(NodeKind::Interface, expected.as_str()),
        );
        self.compare_generic_parameters(&mut node, &reference.generic_parameters, &target.generic_parameters);

        for kind in MemberKind::iter() {
            self.compare_members(&mut node, kind, reference.members(kind), target.members(kind));
        }

        self.compare_types(&mut node, &reference.nested, &target.nested);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::node::Presence,
        config::CompareConfig,
        tree::{AttributeRecord, TypeKind},
    };

    fn class(name: &str) -> TypeRecord {
        TypeRecord {
            name: name.into(),
            kind: TypeKind::Class,
            base: Some("System.Object".into()),
            ..Default::default()
        }
    }

    #[test]
    fn static_pair_is_one_warning() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);

        let mut before = class("Helpers");
        before.is_abstract = true;
        let mut after = before.clone();
        after.is_sealed = true;
        let node = comparer.compare_type(&before, &after);
        assert_eq!(node.warnings, vec!["Should be static"]);

        let node = comparer.compare_type(&after, &before);
        assert_eq!(node.warnings, vec!["Should not be static"]);

        let sealed = TypeRecord {
            is_sealed: true,
            ..class("Helpers")
        };
        let node = comparer.compare_type(&class("Helpers"), &sealed);
        assert_eq!(node.warnings, vec!["Should be sealed"]);
    }

    #[test]
    fn scalar_differences() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let before = class("Widget");
        let after = TypeRecord {
            kind: TypeKind::Struct,
            base: Some("System.ValueType".into()),
            is_serializable: true,
            ..class("Widget")
        };
        let node = comparer.compare_type(&before, &after);
        assert_eq!(
            node.warnings,
            vec![
                "Class type is class and should be struct",
                "Base class is System.Object and should be System.ValueType",
                "Should be serializable",
            ]
        );
        assert_eq!(node.counters.warning, 3);
    }

    #[test]
    fn nested_types_and_interfaces() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let mut before = class("Outer");
        before.interfaces = vec!["System.IDisposable".into()];
        before.nested = vec![class("Gone"), class("Kept")];
        let mut after = class("Outer");
        after.nested = vec![
            class("Kept"),
            TypeRecord {
                attributes: vec![AttributeRecord::new("System.MonoTODOAttribute")],
                ..class("Unfinished")
            },
            class("Added"),
        ];

        let node = comparer.compare_type(&before, &after);
        assert_eq!(
            node.child(NodeKind::Interface, "System.IDisposable").unwrap().presence,
            Presence::Missing
        );
        let nested: Vec<(&str, Presence, bool)> = node
            .children(NodeKind::Class)
            .map(|n| (n.name.as_str(), n.presence, n.todo))
            .collect();
        assert_eq!(
            nested,
            vec![
                ("Added", Presence::Extra, false),
                ("Gone", Presence::Missing, false),
                ("Kept", Presence::Matched, false),
                ("Unfinished", Presence::Matched, true),
            ]
        );
        assert_eq!(node.counters.missing, 2);
        assert_eq!(node.counters.extra, 1);
        assert_eq!(node.counters.present, 2);
        assert_eq!(node.counters.todo, 1);
    }
}
