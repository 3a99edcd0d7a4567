//! Keyed matching of sibling collections.
//!
//! Every level of the tree (namespaces in an assembly, types in a namespace, members in a
//! type, parameters in a method, attributes on anything) is compared the same way: both
//! sides are keyed, reference keys found in the target are matched and compared, reference
//! keys absent from the target are missing, and target keys left over are extra.

use std::collections::BTreeMap;

use crate::{
    compare::{
        node::{DiffGroup, DiffNode, NodeKind, Presence},
        Comparer,
    },
    tree::{
        AttributeRecord, GenericParameterRecord, MemberDetail, MemberRecord, NamespaceRecord,
        ParameterRecord, SignatureFlags, TypeKind, TypeRecord,
    },
};

/// Something that appears in a keyed sibling collection
pub(crate) trait GroupItem {
    /// Display name of the node
    fn name(&self) -> &str;

    /// Attributes that may carry a TODO marker
    fn attributes(&self) -> &[AttributeRecord] {
        &[]
    }

    /// Kind of type nodes
    fn type_kind(&self) -> Option<TypeKind> {
        None
    }

    /// Signature flags of methods and accessor-bearing members
    fn flags(&self) -> SignatureFlags {
        SignatureFlags::default()
    }

    /// Primary sort position among siblings; equal positions sort by name
    fn ordinal(&self) -> u32 {
        0
    }
}

impl GroupItem for NamespaceRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GroupItem for TypeRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeRecord] {
        &self.attributes
    }

    fn type_kind(&self) -> Option<TypeKind> {
        Some(self.kind)
    }
}

impl GroupItem for MemberRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeRecord] {
        &self.attributes
    }

    fn flags(&self) -> SignatureFlags {
        let accessors = match &self.detail {
            MemberDetail::Property(property) => &property.accessors,
            MemberDetail::Event(event) => &event.accessors,
            _ => return self.method().map(|method| method.flags).unwrap_or_default(),
        };
        accessors
            .first()
            .and_then(MemberRecord::method)
            .map(|method| method.flags)
            .unwrap_or_default()
    }
}

impl GroupItem for ParameterRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeRecord] {
        &self.attributes
    }

    fn ordinal(&self) -> u32 {
        self.position
    }
}

impl GroupItem for GenericParameterRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeRecord] {
        &self.custom_attributes
    }
}

impl GroupItem for AttributeRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GroupItem for String {
    fn name(&self) -> &str {
        self
    }
}

/// Outcome of keyed matching for one key
#[derive(Debug)]
pub(crate) enum Pairing<'a, T> {
    Matched(&'a T, &'a T),
    Missing(&'a T),
    Extra(&'a T),
}

/// Pair two collections by key.
///
/// When several items of one side share a key, the last one wins. Pairings come out in key
/// order: matched and missing keys first, then extra keys.
pub(crate) fn pair<'a, T>(
    reference: &'a [T],
    target: &'a [T],
    key: impl Fn(&T) -> String,
) -> Vec<Pairing<'a, T>> {
    let keyed = |items: &'a [T]| -> BTreeMap<String, &'a T> {
        items.iter().map(|item| (key(item), item)).collect()
    };
    let expected = keyed(reference);
    let mut found = keyed(target);

    let mut pairings = Vec::with_capacity(expected.len() + found.len());
    for (key, item) in expected {
        match found.remove(&key) {
            Some(other) => pairings.push(Pairing::Matched(item, other)),
            None => pairings.push(Pairing::Missing(item)),
        }
    }
    pairings.extend(found.into_values().map(Pairing::Extra));
    pairings
}

impl Comparer<'_> {
    /// Comment of the TODO marker among `attributes`; outer `None` when there is no marker.
    pub(crate) fn todo_marker(&self, attributes: &[AttributeRecord]) -> Option<Option<String>> {
        attributes
            .iter()
            .find(|attribute| self.config.attributes.is_todo(&attribute.name))
            .map(|marker| marker.first_value().map(str::to_string))
    }

    /// Compare two sibling collections and attach the resulting group to `parent`.
    ///
    /// `matched` builds the node of an item found on both sides. The TODO flag, the type
    /// kind, the signature flags, the counters and the ordering are handled here. Unmatched
    /// items carrying a TODO marker are not reported as missing or extra: they count as
    /// present TODOs. The group is only attached when it has nodes.
    pub(crate) fn compare_group<T: GroupItem>(
        &self,
        parent: &mut DiffNode,
        kind: NodeKind,
        reference: &[T],
        target: &[T],
        key: impl Fn(&T) -> String,
        mut matched: impl FnMut(&T, &T) -> DiffNode,
    ) {
        let mut nodes: Vec<(u32, DiffNode)> = Vec::new();

        for pairing in pair(reference, target, key) {
            let (item, mut node) = match pairing {
                Pairing::Matched(expected, found) => {
                    let mut node = matched(expected, found);
                    if let Some(comment) = self
                        .todo_marker(found.attributes())
                        .or_else(|| self.todo_marker(expected.attributes()))
                    {
                        node.todo = true;
                        node.comment = comment;
                    }
                    (expected, node)
                }
                Pairing::Missing(item) => (item, self.unmatched(kind, item, Presence::Missing)),
                Pairing::Extra(item) => (item, self.unmatched(kind, item, Presence::Extra)),
            };

            node.type_kind = item.type_kind();
            node.flags = item.flags();
            match node.presence {
                Presence::Matched => parent.counters.present += 1,
                Presence::Missing => parent.counters.missing += 1,
                Presence::Extra => parent.counters.extra += 1,
            }
            if node.todo {
                parent.counters.todo += 1;
                parent.counters.error_total += 1;
            }

            node.seal();
            parent.counters.add_total_to_total(&node.counters);
            nodes.push((item.ordinal(), node));
        }

        if nodes.is_empty() {
            return;
        }
        nodes.sort_by(|(a, left), (b, right)| a.cmp(b).then_with(|| left.name.cmp(&right.name)));
        parent.groups.push(DiffGroup {
            kind,
            nodes: nodes.into_iter().map(|(_, node)| node).collect(),
        });
    }

    fn unmatched<T: GroupItem>(&self, kind: NodeKind, item: &T, presence: Presence) -> DiffNode {
        let mut node = DiffNode::new(kind, item.name());
        match self.todo_marker(item.attributes()) {
            Some(comment) => {
                node.todo = true;
                node.comment = comment;
            }
            None => node.presence = presence,
        }
        node
    }
}
