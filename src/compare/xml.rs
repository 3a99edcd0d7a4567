//! The XML document form of a [`DiffTree`].
//!
//! Diff documents mirror the API document layout (`assembly/namespaces/namespace/classes/...`)
//! and annotate every element with its comparison result:
//!
//! - `presence="missing"` or `presence="extra"` on unmatched entities
//! - `error="todo"` plus an optional `comment`, or `error="warning"` with a
//!   `<warnings><warning text="..."/></warnings>` child
//! - counter attributes (`present`, `missing`, `extra`, `ok`, `complete`, `todo`, `warning`,
//!   their `_total` variants and `error_total`), each written only when non-zero

use crate::{
    compare::{
        counters::Counters,
        node::{DiffNode, DiffTree, NodeKind, Presence},
    },
    xml::{self, Element},
    Result,
};

/// Serialize a diff tree to a document.
///
/// # Errors
/// Returns [`crate::Error::Xml`] if the writer fails.
pub fn to_xml(tree: &DiffTree) -> Result<String> {
    xml::write(&to_element(tree))
}

/// Build the `<assemblies>` element of a diff tree.
#[must_use]
pub fn to_element(tree: &DiffTree) -> Element {
    let mut assembly = Element::new(NodeKind::Assembly.item_tag())
        .attr("name", &tree.assembly.name)
        .attr("version", &tree.version);
    assembly = annotate(assembly, &tree.assembly);
    push_children(&mut assembly, &tree.assembly);
    Element::new(NodeKind::Assembly.group_tag()).child(assembly)
}

fn node_element(node: &DiffNode) -> Element {
    let mut element = Element::new(node.kind.item_tag())
        .attr("name", &node.name)
        .attr_opt("type", node.type_kind);
    element = annotate(element, node);
    push_children(&mut element, node);
    element
}

fn annotate(element: Element, node: &DiffNode) -> Element {
    let presence = (node.presence != Presence::Matched).then_some(node.presence);
    let element = element
        .attr_opt("presence", presence)
        .attr_opt("error", node.error())
        .attr_opt("comment", node.comment.as_ref());
    counter_attributes(element, &node.counters)
}

/// Append the non-zero counter attributes of `counters`.
#[must_use]
pub fn counter_attributes(element: Element, counters: &Counters) -> Element {
    let nonzero = |value: u32| (value > 0).then_some(value);
    let complete = (counters.total() > 0).then(|| counters.complete());
    let complete_total = (counters.abs_total() > 0).then(|| counters.complete_total());

    element
        .attr_opt("missing", nonzero(counters.missing))
        .attr_opt("present", nonzero(counters.present))
        .attr_opt("extra", nonzero(counters.extra))
        .attr_opt("ok", nonzero(counters.ok()))
        .attr_opt("complete", complete)
        .attr_opt("todo", nonzero(counters.todo))
        .attr_opt("warning", nonzero(counters.warning))
        .attr_opt("missing_total", nonzero(counters.missing_total))
        .attr_opt("present_total", nonzero(counters.present_total))
        .attr_opt("extra_total", nonzero(counters.extra_total))
        .attr_opt("ok_total", nonzero(counters.ok_total()))
        .attr_opt("complete_total", complete_total)
        .attr_opt("todo_total", nonzero(counters.todo_total))
        .attr_opt("error_total", nonzero(counters.error_total))
        .attr_opt("warning_total", nonzero(counters.warning_total))
}

fn push_children(element: &mut Element, node: &DiffNode) {
    if !node.warnings.is_empty() {
        let mut warnings = Element::new("warnings");
        for warning in &node.warnings {
            warnings.push(Element::new("warning").attr("text", warning));
        }
        element.push(warnings);
    }

    for group in &node.groups {
        let mut children = Element::new(group.kind.group_tag());
        for child in &group.nodes {
            children.push(node_element(child));
        }
        element.push(children);
    }
}
