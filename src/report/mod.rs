//! Human-readable API change reports.
//!
//! [`render`] walks a [`DiffTree`] and turns it into a document of added, removed and
//! modified API, grouped by namespace, type and member kind, and marks each change as
//! breaking or not. The output language is chosen by the [`Formatter`] passed in:
//! [`MarkdownFormatter`] for release notes, [`HtmlFormatter`] for a standalone page.
//!
//! # Classification
//!
//! - Removals are breaking.
//! - Additions are not, except abstract members and members added to interfaces.
//! - Modifications are breaking, except renamed parameters and methods that become virtual.
//!
//! [`ReportConfig`] filters changes by kind and by pattern.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use apiscope::{compare::compare, report::{render, MarkdownFormatter}, CompareConfig, ReportConfig};
//!
//! let diff = compare(&old, &new, &CompareConfig::default());
//! let text = render(&diff, &ReportConfig::breaking_only(), &MarkdownFormatter);
//! if !text.is_empty() {
//!     println!("{text}");
//! }
//! ```

use crate::{
    compare::{
        members::{BECAME_VIRTUAL, PARAMETER_NAME},
        DiffNode, DiffTree, NodeKind, Presence,
    },
    config::ReportConfig,
    tree::TypeKind,
};

pub mod formatter;

pub use formatter::{Formatter, HtmlFormatter, MarkdownFormatter, Section};

/// Kinds reported inside a type section, in report order
const REPORTED_KINDS: [NodeKind; 6] = [
    NodeKind::Interface,
    NodeKind::Field,
    NodeKind::Constructor,
    NodeKind::Property,
    NodeKind::Event,
    NodeKind::Method,
];

/// The rendered changes of one entity
pub struct ApiChange<'f> {
    /// Header of the group the change is listed under, e.g. `Removed methods`
    pub header: String,
    /// Rendered change lines
    pub member: String,
    /// At least one appended change is breaking
    pub breaking: bool,
    /// At least one change was appended
    pub any_change: bool,
    formatter: &'f dyn Formatter,
}

impl<'f> ApiChange<'f> {
    /// An empty change listed under `header`.
    pub fn new(header: impl Into<String>, formatter: &'f dyn Formatter) -> Self {
        ApiChange {
            header: header.into(),
            member: String::new(),
            breaking: false,
            any_change: false,
            formatter,
        }
    }

    /// Append an added entity; not breaking unless `breaking` says otherwise.
    pub fn append_added(&mut self, text: &str, breaking: Option<bool>) -> &mut Self {
        let breaking = breaking.unwrap_or(false);
        self.formatter.diff_addition(&mut self.member, text, breaking);
        self.record(breaking)
    }

    /// Append a removed entity; breaking unless `breaking` says otherwise.
    pub fn append_removed(&mut self, text: &str, breaking: Option<bool>) -> &mut Self {
        let breaking = breaking.unwrap_or(true);
        self.formatter.diff_removal(&mut self.member, text, breaking);
        self.record(breaking)
    }

    /// Append a change of `text`; breaking unless `breaking` says otherwise.
    pub fn append_modified(&mut self, text: &str, change: &str, breaking: Option<bool>) -> &mut Self {
        let breaking = breaking.unwrap_or(true);
        self.formatter.diff_modification(&mut self.member, text, change, breaking);
        self.record(breaking)
    }

    /// Append free text; does not count as a change.
    pub fn append_plain(&mut self, text: &str) -> &mut Self {
        self.formatter.plain(&mut self.member, text);
        self
    }

    fn record(&mut self, breaking: bool) -> &mut Self {
        self.breaking |= breaking;
        self.any_change = true;
        self
    }
}

/// Changes of one type, grouped by header in insertion order
#[derive(Default)]
pub struct ApiChanges<'f> {
    groups: Vec<(String, Vec<ApiChange<'f>>)>,
}

impl<'f> ApiChanges<'f> {
    /// Add a change under its header; changes without content are dropped.
    pub fn add(&mut self, change: ApiChange<'f>) {
        if !change.any_change {
            return;
        }
        match self.groups.iter_mut().find(|(header, _)| *header == change.header) {
            Some((_, changes)) => changes.push(change),
            None => self.groups.push((change.header.clone(), vec![change])),
        }
    }

    /// `true` when nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `true` when any change is breaking.
    #[must_use]
    pub fn breaking(&self) -> bool {
        self.groups
            .iter()
            .flat_map(|(_, changes)| changes)
            .any(|change| change.breaking)
    }

    fn write(&self, out: &mut String, formatter: &dyn Formatter) {
        for (header, changes) in &self.groups {
            let breaking = changes.iter().any(|change| change.breaking);
            formatter.begin_member_group(out, header, breaking);
            for change in changes {
                out.push_str(&change.member);
            }
            formatter.end_member_group(out);
        }
    }
}

/// Render a diff tree; the result is empty when no change survives the filters.
#[must_use]
pub fn render(diff: &DiffTree, config: &ReportConfig, formatter: &dyn Formatter) -> String {
    let renderer = Renderer { config, formatter };

    let mut body = String::new();
    for namespace in diff.namespaces() {
        renderer.namespace(&mut body, namespace);
    }
    if body.is_empty() {
        log::debug!("no reportable changes in {}", diff.name());
        return body;
    }

    let mut out = String::new();
    formatter.begin_document(&mut out, &format!("API diff: {}.dll", diff.name()));
    formatter.begin_assembly(&mut out, diff.name());
    out.push_str(&body);
    formatter.end_assembly(&mut out);
    formatter.end_document(&mut out);
    out
}

struct Renderer<'a> {
    config: &'a ReportConfig,
    formatter: &'a dyn Formatter,
}

impl<'a> Renderer<'a> {
    fn keep(&self, breaking: bool) -> bool {
        breaking || !self.config.ignore_nonbreaking
    }

    fn namespace(&self, out: &mut String, node: &DiffNode) {
        let f = self.formatter;
        match node.presence {
            Presence::Extra => {
                if self.keep(false) && !self.config.ignores_new(&node.name) {
                    f.begin_namespace(out, &node.name, Section::Added);
                    f.end_namespace(out);
                }
            }
            Presence::Missing => {
                if !self.config.ignores_removed(&node.name) {
                    f.begin_namespace(out, &node.name, Section::Removed);
                    f.end_namespace(out);
                }
            }
            Presence::Matched => {
                let mut body = String::new();
                for ty in node.children(NodeKind::Class) {
                    self.type_section(&mut body, &format!("{}.{}", node.name, ty.name), ty);
                }
                if !body.is_empty() {
                    f.begin_namespace(out, &node.name, Section::Modified);
                    out.push_str(&body);
                    f.end_namespace(out);
                }
            }
        }
    }

    fn type_section(&self, out: &mut String, qualified: &str, node: &DiffNode) {
        let f = self.formatter;
        match node.presence {
            Presence::Extra => {
                if self.keep(false) && !self.config.ignores_new(qualified) {
                    f.begin_type(out, qualified, node.type_kind, Section::Added, false);
                    f.end_type(out);
                }
            }
            Presence::Missing => {
                if !self.config.ignores_removed(qualified) {
                    f.begin_type(out, qualified, node.type_kind, Section::Removed, true);
                    f.end_type(out);
                }
            }
            Presence::Matched => {
                let changes = self.type_changes(qualified, node);
                if !changes.is_empty() {
                    f.begin_type(out, qualified, node.type_kind, Section::Modified, changes.breaking());
                    changes.write(out, f);
                    f.end_type(out);
                }
                for nested in node.children(NodeKind::Class) {
                    self.type_section(out, &format!("{qualified}+{}", nested.name), nested);
                }
            }
        }
    }

    fn type_changes(&self, qualified: &str, node: &DiffNode) -> ApiChanges<'a> {
        let mut changes = ApiChanges::default();

        let mut own = ApiChange::new("Modified type", self.formatter);
        for warning in &node.warnings {
            own.append_modified(&node.name, warning, None);
        }
        self.attribute_changes(&mut own, &node.name, node);
        changes.add(own);

        for kind in REPORTED_KINDS {
            let plural = kind.group_tag();
            for presence in [Presence::Missing, Presence::Extra, Presence::Matched] {
                let header = match presence {
                    Presence::Missing => format!("Removed {plural}"),
                    Presence::Extra => format!("Added {plural}"),
                    Presence::Matched => format!("Modified {plural}"),
                };
                for member in node.children(kind).filter(|member| member.presence == presence) {
                    let description = format!("{qualified}: {header}: {}", member.name);
                    let mut change = ApiChange::new(header.as_str(), self.formatter);
                    match presence {
                        Presence::Missing => {
                            if !self.config.ignores_removed(&description) {
                                change.append_removed(&member.name, None);
                            }
                        }
                        Presence::Extra => {
                            let breaking = kind != NodeKind::Interface
                                && (node.type_kind == Some(TypeKind::Interface) || member.flags.is_abstract);
                            if self.keep(breaking) && !self.config.ignores_added(&description) {
                                change.append_added(&member.name, Some(breaking));
                            }
                        }
                        Presence::Matched => self.modifications(&mut change, member),
                    }
                    changes.add(change);
                }
            }
        }
        changes
    }

    /// Append attributes applied to only one side of `node`, and property differences of
    /// attributes applied to both. None of these break callers.
    fn attribute_changes(&self, change: &mut ApiChange<'_>, text: &str, node: &DiffNode) {
        for attribute in node.children(NodeKind::Attribute) {
            match attribute.presence {
                Presence::Missing => {
                    self.modified(change, text, &format!("Attribute {} removed", attribute.name), false);
                }
                Presence::Extra => {
                    self.modified(change, text, &format!("Attribute {} added", attribute.name), false);
                }
                Presence::Matched => {
                    for warning in &attribute.warnings {
                        self.modified(change, text, &format!("Attribute {}: {warning}", attribute.name), false);
                    }
                }
            }
        }
    }

    /// Append the changes inside a matched member: its own warnings, its attributes, its
    /// parameters, generic parameters and accessors.
    fn modifications(&self, change: &mut ApiChange<'_>, member: &DiffNode) {
        let text = member.name.as_str();
        let renamed = format!("{PARAMETER_NAME} is ");

        for warning in &member.warnings {
            let became_virtual = warning == BECAME_VIRTUAL;
            if became_virtual && self.config.ignore_virtual {
                continue;
            }
            self.modified(change, text, warning, !became_virtual);
        }

        self.attribute_changes(change, text, member);

        for parameter in member.children(NodeKind::Parameter) {
            match parameter.presence {
                Presence::Missing => self.modified(change, text, &format!("Parameter {} removed", parameter.name), true),
                Presence::Extra => self.modified(change, text, &format!("Parameter {} added", parameter.name), true),
                Presence::Matched => {
                    for warning in &parameter.warnings {
                        let is_rename = warning.starts_with(&renamed);
                        if is_rename && self.config.ignore_parameter_names {
                            continue;
                        }
                        self.modified(change, text, warning, !is_rename);
                    }
                }
            }
        }

        for generic in member.children(NodeKind::GenericParameter) {
            match generic.presence {
                Presence::Missing => {
                    self.modified(change, text, &format!("Generic parameter {} removed", generic.name), true);
                }
                Presence::Extra => {
                    self.modified(change, text, &format!("Generic parameter {} added", generic.name), true);
                }
                Presence::Matched => {
                    for warning in &generic.warnings {
                        self.modified(change, text, warning, true);
                    }
                }
            }
        }

        for accessor in member.children(NodeKind::Method) {
            match accessor.presence {
                Presence::Missing => {
                    change.append_removed(&accessor.name, None);
                }
                Presence::Extra => {
                    if self.config.ignore_added_setters && accessor.name.starts_with("set_") {
                        continue;
                    }
                    let breaking = accessor.flags.is_abstract;
                    if self.keep(breaking) {
                        change.append_added(&accessor.name, Some(breaking));
                    }
                }
                Presence::Matched => self.modifications(change, accessor),
            }
        }
    }

    fn modified(&self, change: &mut ApiChange<'_>, text: &str, detail: &str, breaking: bool) {
        if self.keep(breaking) {
            change.append_modified(text, detail, Some(breaking));
        }
    }
}
