//! The diff tree produced by a comparison.

use strum::{Display, EnumString};

use crate::{
    compare::counters::Counters,
    tree::{SignatureFlags, TypeKind},
};

/// Entity a diff node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    /// An assembly
    Assembly,
    /// A namespace
    Namespace,
    /// A type
    Class,
    /// A field
    Field,
    /// A constructor
    Constructor,
    /// A property
    Property,
    /// An event
    Event,
    /// A method, including property and event accessors
    Method,
    /// A method parameter
    Parameter,
    /// An applied attribute
    Attribute,
    /// An implemented interface
    Interface,
    /// A generic parameter
    GenericParameter,
}

impl NodeKind {
    /// Element name of a group of nodes of this kind.
    #[must_use]
    pub fn group_tag(self) -> &'static str {
        match self {
            NodeKind::Assembly => "assemblies",
            NodeKind::Namespace => "namespaces",
            NodeKind::Class => "classes",
            NodeKind::Field => "fields",
            NodeKind::Constructor => "constructors",
            NodeKind::Property => "properties",
            NodeKind::Event => "events",
            NodeKind::Method => "methods",
            NodeKind::Parameter => "parameters",
            NodeKind::Attribute => "attributes",
            NodeKind::Interface => "interfaces",
            NodeKind::GenericParameter => "generic-parameters",
        }
    }

    /// Element name of one node of this kind.
    #[must_use]
    pub fn item_tag(self) -> &'static str {
        match self {
            NodeKind::Assembly => "assembly",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Field => "field",
            NodeKind::Constructor => "constructor",
            NodeKind::Property => "property",
            NodeKind::Event => "event",
            NodeKind::Method => "method",
            NodeKind::Parameter => "parameter",
            NodeKind::Attribute => "attribute",
            NodeKind::Interface => "interface",
            NodeKind::GenericParameter => "generic-parameter",
        }
    }

    /// Kind whose group uses the element name `tag`.
    #[must_use]
    pub fn from_group_tag(tag: &str) -> Option<NodeKind> {
        [
            NodeKind::Namespace,
            NodeKind::Class,
            NodeKind::Field,
            NodeKind::Constructor,
            NodeKind::Property,
            NodeKind::Event,
            NodeKind::Method,
            NodeKind::Parameter,
            NodeKind::Attribute,
            NodeKind::Interface,
            NodeKind::GenericParameter,
        ]
        .into_iter()
        .find(|kind| kind.group_tag() == tag)
    }
}

/// How an entity was found across the two trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    /// Found on both sides
    #[default]
    Matched,
    /// Only in the reference
    Missing,
    /// Only in the target
    Extra,
}

/// Error flag of a diff node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// The entity carries a TODO marker
    Todo,
    /// The entity differs between the two sides
    Warning,
}

/// Children of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffGroup {
    /// Kind of every node in the group
    pub kind: NodeKind,
    /// Nodes in emission order
    pub nodes: Vec<DiffNode>,
}

/// One compared entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffNode {
    /// Entity kind
    pub kind: NodeKind,
    /// Display name
    pub name: String,
    /// Kind of a type node
    pub type_kind: Option<TypeKind>,
    /// Signature flags of a method node, or of the first accessor of a property or event;
    /// taken from the reference unless the node is extra
    pub flags: SignatureFlags,
    /// Presence classification
    pub presence: Presence,
    /// The entity carries a TODO marker
    pub todo: bool,
    /// Free text of the TODO marker
    pub comment: Option<String>,
    /// Field-level differences, in detection order
    pub warnings: Vec<String>,
    /// Child groups, in tree order
    pub groups: Vec<DiffGroup>,
    /// Counts of this level and of the subtree
    pub counters: Counters,
}

impl DiffNode {
    /// A matched node without children.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        DiffNode {
            kind,
            name: name.into(),
            type_kind: None,
            flags: SignatureFlags::default(),
            presence: Presence::Matched,
            todo: false,
            comment: None,
            warnings: Vec::new(),
            groups: Vec::new(),
            counters: Counters::default(),
        }
    }

    /// Record a field-level difference.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
        self.counters.warning += 1;
    }

    /// Record a difference of a scalar value as "`what` is `reference` and should be `target`".
    pub fn warn_changed<T: PartialEq + std::fmt::Display>(&mut self, what: &str, reference: T, target: T) {
        if reference != target {
            self.warn(format!("{what} is {reference} and should be {target}"));
        }
    }

    /// The error flag written for this node; a TODO marker outranks warnings.
    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        if self.todo {
            Some(ErrorKind::Todo)
        } else if self.warnings.is_empty() {
            None
        } else {
            Some(ErrorKind::Warning)
        }
    }

    /// Child group of `kind`.
    #[must_use]
    pub fn group(&self, kind: NodeKind) -> Option<&DiffGroup> {
        self.groups.iter().find(|group| group.kind == kind)
    }

    /// Children of `kind`; empty when the group is absent.
    pub fn children(&self, kind: NodeKind) -> impl Iterator<Item = &DiffNode> {
        self.group(kind).into_iter().flat_map(|group| group.nodes.iter())
    }

    /// Child of `kind` named `name`.
    #[must_use]
    pub fn child(&self, kind: NodeKind, name: &str) -> Option<&DiffNode> {
        self.children(kind).find(|node| node.name == name)
    }

    /// `true` when nothing in the subtree differs: no missing or extra entity and no warning.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        let c = &self.counters;
        c.missing_total == 0 && c.extra_total == 0 && c.warning_total == 0
    }

    /// Promote the node's own counts into its totals.
    ///
    /// Called exactly once, after every child has been absorbed.
    pub(crate) fn seal(&mut self) {
        let own = self.counters;
        self.counters.add_partial_to_total(&own);
    }
}

/// The result of comparing two assemblies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTree {
    /// Version of the reference assembly
    pub version: String,
    /// The assembly node; its children are the assembly attributes and the namespaces
    pub assembly: DiffNode,
}

impl DiffTree {
    /// Name of the reference assembly.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.assembly.name
    }

    /// Counters of the assembly node.
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.assembly.counters
    }

    /// Namespace nodes, ordered by name.
    pub fn namespaces(&self) -> impl Iterator<Item = &DiffNode> {
        self.assembly.children(NodeKind::Namespace)
    }

    /// Depth-first walk over every node, the assembly included.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![&self.assembly],
        }
    }
}

/// Pre-order iterator over a diff tree
pub struct Walk<'a> {
    stack: Vec<&'a DiffNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DiffNode;

    fn next(&mut self) -> Option<&'a DiffNode> {
        let node = self.stack.pop()?;
        for group in node.groups.iter().rev() {
            self.stack.extend(group.nodes.iter().rev());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags() {
        assert_eq!(NodeKind::GenericParameter.item_tag(), "generic-parameter");
        assert_eq!(NodeKind::Property.group_tag(), "properties");
        assert_eq!(NodeKind::from_group_tag("classes"), Some(NodeKind::Class));
        assert_eq!(NodeKind::from_group_tag("warnings"), None);
        assert_eq!(Presence::Extra.to_string(), "extra");
        assert_eq!("todo".parse::<ErrorKind>().unwrap(), ErrorKind::Todo);
    }

    #[test]
    fn warnings_and_error_flag() {
        let mut node = DiffNode::new(NodeKind::Field, "X");
        assert_eq!(node.error(), None);
        node.warn_changed("Field value", "1", "1");
        assert!(node.warnings.is_empty());
        node.warn_changed("Field value", "1", "2");
        assert_eq!(node.warnings, vec!["Field value is 1 and should be 2"]);
        assert_eq!(node.counters.warning, 1);
        assert_eq!(node.error(), Some(ErrorKind::Warning));
        node.todo = true;
        assert_eq!(node.error(), Some(ErrorKind::Todo));
    }

    #[test]
    fn walk_is_preorder() {
        let mut root = DiffNode::new(NodeKind::Assembly, "A");
        let mut ns = DiffNode::new(NodeKind::Namespace, "N");
        ns.groups.push(DiffGroup {
            kind: NodeKind::Class,
            nodes: vec![DiffNode::new(NodeKind::Class, "C"), DiffNode::new(NodeKind::Class, "D")],
        });
        root.groups.push(DiffGroup {
            kind: NodeKind::Namespace,
            nodes: vec![ns],
        });
        let tree = DiffTree {
            version: "1.0".into(),
            assembly: root,
        };
        let names: Vec<&str> = tree.walk().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["A", "N", "C", "D"]);
        assert_eq!(tree.namespaces().count(), 1);
    }
}
