//! Comparison of attribute lists and attribute property bags.

use std::collections::HashMap;

use crate::{
    compare::{
        group::GroupItem,
        node::{DiffNode, NodeKind},
        Comparer,
    },
    tree::AttributeRecord,
};

/// An attribute with its key among its siblings
struct KeyedAttribute<'a> {
    key: String,
    record: &'a AttributeRecord,
}

impl GroupItem for KeyedAttribute<'_> {
    fn name(&self) -> &str {
        &self.record.name
    }
}

/// Key attributes by type name, or by type name and property values when the same type is
/// applied more than once.
fn keyed(attributes: Vec<&AttributeRecord>) -> Vec<KeyedAttribute<'_>> {
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for attribute in attributes.iter().copied() {
        *uses.entry(attribute.name.as_str()).or_default() += 1;
    }

    attributes
        .into_iter()
        .map(|record| {
            let key = if uses.get(record.name.as_str()).copied().unwrap_or(0) > 1 {
                let mut parts: Vec<String> = record
                    .properties
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value.as_deref().unwrap_or_default()))
                    .collect();
                parts.sort();
                let mut key = format!("{};", record.name);
                for part in parts {
                    key.push_str(&part);
                    key.push(';');
                }
                key
            } else {
                record.name.clone()
            };
            KeyedAttribute { key, record }
        })
        .collect()
}

impl Comparer<'_> {
    /// Compare two attribute lists into an `attributes` group of `parent`.
    ///
    /// Meaningless attributes and TODO markers take no part; markers are reported as the
    /// owner's TODO flag instead.
    pub(crate) fn compare_attributes(
        &self,
        parent: &mut DiffNode,
        reference: &[AttributeRecord],
        target: &[AttributeRecord],
    ) {
        let reference = keyed(self.comparable(reference));
        let target = keyed(self.comparable(target));
        self.compare_group(
            parent,
            NodeKind::Attribute,
            &reference,
            &target,
            |attribute| attribute.key.clone(),
            |expected, found| self.compare_properties(expected.record, found.record),
        );
    }

    fn comparable<'r>(&self, attributes: &'r [AttributeRecord]) -> Vec<&'r AttributeRecord> {
        let policy = &self.config.attributes;
        attributes
            .iter()
            .filter(|attribute| !policy.is_meaningless(&attribute.name) && !policy.is_todo(&attribute.name))
            .collect()
    }

    /// Compare the property bags of one attribute applied on both sides.
    fn compare_properties(&self, reference: &AttributeRecord, target: &AttributeRecord) -> DiffNode {
        let mut node = DiffNode::new(NodeKind::Attribute, &reference.name);
        let policy = &self.config.attributes;

        let mut names: Vec<&str> = reference.properties.iter().map(|(name, _)| name.as_str()).collect();
        for (name, _) in &target.properties {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }

        for name in names {
            if policy.is_ignored_property(&reference.name, name) {
                continue;
            }
            let expected = reference.property(name).flatten().unwrap_or("null");
            let found = target.property(name).flatten().unwrap_or("null");
            if expected != found {
                node.warn(format!("Property '{name}' is '{expected}' and should be '{found}'"));
            }
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare::node::Presence, config::CompareConfig};

    fn usage(on: &str) -> AttributeRecord {
        AttributeRecord::new("System.AttributeUsageAttribute")
            .with_property("AllowMultiple", Some("False"))
            .with_property("ValidOn", Some(on))
    }

    #[test]
    fn repeated_attributes_are_keyed_by_properties() {
        let a = usage("Class");
        let b = usage("Method");
        let keys: Vec<String> = keyed(vec![&a, &b]).into_iter().map(|k| k.key).collect();
        assert_eq!(
            keys,
            vec![
                "System.AttributeUsageAttribute;AllowMultiple=False;ValidOn=Class;",
                "System.AttributeUsageAttribute;AllowMultiple=False;ValidOn=Method;",
            ]
        );
        let single: Vec<String> = keyed(vec![&a]).into_iter().map(|k| k.key).collect();
        assert_eq!(single, vec!["System.AttributeUsageAttribute"]);
    }

    #[test]
    fn property_differences() {
        let config = CompareConfig::default();
        let comparer = Comparer::new(&config);
        let reference = vec![
            usage("Class"),
            AttributeRecord::new("System.ObsoleteAttribute").with_property("Message", Some("old")),
            AttributeRecord::new("System.Runtime.CompilerServices.CompilerGeneratedAttribute"),
        ];
        let target = vec![
            usage("All"),
            AttributeRecord::new("System.ObsoleteAttribute").with_property("Message", Some("new")),
            AttributeRecord::new("System.SerializableAttribute"),
            AttributeRecord::new("System.MonoTODOAttribute"),
        ];

        let mut parent = DiffNode::new(NodeKind::Class, "C");
        comparer.compare_attributes(&mut parent, &reference, &target);
        let group = parent.group(NodeKind::Attribute).unwrap();
        assert_eq!(group.nodes.len(), 3);

        let usage = parent.child(NodeKind::Attribute, "System.AttributeUsageAttribute").unwrap();
        assert_eq!(usage.warnings, vec!["Property 'ValidOn' is 'Class' and should be 'All'"]);
        let obsolete = parent.child(NodeKind::Attribute, "System.ObsoleteAttribute").unwrap();
        assert!(obsolete.warnings.is_empty());
        let serializable = parent.child(NodeKind::Attribute, "System.SerializableAttribute").unwrap();
        assert_eq!(serializable.presence, Presence::Extra);

        assert_eq!(parent.counters.present, 2);
        assert_eq!(parent.counters.extra, 1);
        assert_eq!(parent.counters.warning_total, 1);
    }
}
