//! Output styles of the formatted diff.
//!
//! A [`Formatter`] only knows how to spell document structure and individual changes; the
//! walk over the diff tree and the breaking-change classification live in
//! [`render`](super::render).

use quick_xml::escape::escape;

use crate::tree::TypeKind;

/// How a namespace or type section relates to the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Present on both sides with changes inside
    Modified,
    /// Only in the target
    Added,
    /// Only in the reference
    Removed,
}

/// Spells a formatted diff in one output language
pub trait Formatter {
    /// Open the document.
    fn begin_document(&self, out: &mut String, title: &str);

    /// Close the document.
    fn end_document(&self, out: &mut String);

    /// Open the section of one assembly.
    fn begin_assembly(&self, out: &mut String, name: &str);

    /// Close the section of one assembly.
    fn end_assembly(&self, out: &mut String);

    /// Open the section of one namespace.
    fn begin_namespace(&self, out: &mut String, name: &str, section: Section);

    /// Close the section of one namespace.
    fn end_namespace(&self, out: &mut String);

    /// Open the section of one type; `name` is namespace-qualified.
    fn begin_type(&self, out: &mut String, name: &str, kind: Option<TypeKind>, section: Section, breaking: bool);

    /// Close the section of one type.
    fn end_type(&self, out: &mut String);

    /// Open a group of changes under `header`.
    fn begin_member_group(&self, out: &mut String, header: &str, breaking: bool);

    /// Close a group of changes.
    fn end_member_group(&self, out: &mut String);

    /// Spell an added entity.
    fn diff_addition(&self, out: &mut String, text: &str, breaking: bool);

    /// Spell a removed entity.
    fn diff_removal(&self, out: &mut String, text: &str, breaking: bool);

    /// Spell a change of an entity present on both sides.
    fn diff_modification(&self, out: &mut String, text: &str, change: &str, breaking: bool);

    /// Spell free text.
    fn plain(&self, out: &mut String, text: &str);
}

/// GitHub flavoured markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn marker(breaking: bool) -> &'static str {
        if breaking {
            " **[breaking]**"
        } else {
            ""
        }
    }
}

impl Formatter for MarkdownFormatter {
    fn begin_document(&self, out: &mut String, title: &str) {
        out.push_str(&format!("# {title}\n\n"));
    }

    fn end_document(&self, _out: &mut String) {}

    fn begin_assembly(&self, out: &mut String, name: &str) {
        out.push_str(&format!("## {name}.dll\n\n"));
    }

    fn end_assembly(&self, _out: &mut String) {}

    fn begin_namespace(&self, out: &mut String, name: &str, section: Section) {
        let label = match section {
            Section::Modified => "Namespace",
            Section::Added => "New Namespace",
            Section::Removed => "Removed Namespace",
        };
        out.push_str(&format!("### {label} {name}\n\n"));
    }

    fn end_namespace(&self, _out: &mut String) {}

    fn begin_type(&self, out: &mut String, name: &str, kind: Option<TypeKind>, section: Section, breaking: bool) {
        let kind = kind.unwrap_or_default();
        let heading = match section {
            Section::Modified => format!("Type Changed: {name}"),
            Section::Added => format!("New {kind}: {name}"),
            Section::Removed => format!("Removed {kind}: {name}"),
        };
        out.push_str(&format!("#### {heading}{}\n\n", Self::marker(breaking)));
    }

    fn end_type(&self, _out: &mut String) {}

    fn begin_member_group(&self, out: &mut String, header: &str, breaking: bool) {
        out.push_str(&format!("{header}:{}\n\n", Self::marker(breaking)));
    }

    fn end_member_group(&self, out: &mut String) {
        out.push('\n');
    }

    fn diff_addition(&self, out: &mut String, text: &str, breaking: bool) {
        out.push_str(&format!("* `+` `{text}`{}\n", Self::marker(breaking)));
    }

    fn diff_removal(&self, out: &mut String, text: &str, breaking: bool) {
        out.push_str(&format!("* `-` ~~`{text}`~~{}\n", Self::marker(breaking)));
    }

    fn diff_modification(&self, out: &mut String, text: &str, change: &str, breaking: bool) {
        out.push_str(&format!("* `~` `{text}`: {change}{}\n", Self::marker(breaking)));
    }

    fn plain(&self, out: &mut String, text: &str) {
        out.push_str(text);
        out.push('\n');
    }
}

/// Standalone HTML page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    fn class(base: &str, breaking: bool) -> String {
        if breaking {
            format!("{base} {base}-breaking-inline")
        } else {
            base.to_string()
        }
    }
}

impl Formatter for HtmlFormatter {
    fn begin_document(&self, out: &mut String, title: &str) {
        let title = escape(title);
        out.push_str(&format!(
            "<html>\n<head>\n<title>{title}</title>\n<style>\n\
             .added {{ color: green; }}\n\
             .removed {{ color: red; text-decoration: line-through; }}\n\
             .modified {{ color: darkorange; }}\n\
             .added-breaking-inline, .removed-breaking-inline, .modified-breaking-inline {{ font-weight: bold; }}\n\
             </style>\n</head>\n<body>\n<h1>{title}</h1>\n"
        ));
    }

    fn end_document(&self, out: &mut String) {
        out.push_str("</body>\n</html>\n");
    }

    fn begin_assembly(&self, out: &mut String, name: &str) {
        out.push_str(&format!("<div data-assembly=\"{}\">\n", escape(name)));
    }

    fn end_assembly(&self, out: &mut String) {
        out.push_str("</div>\n");
    }

    fn begin_namespace(&self, out: &mut String, name: &str, section: Section) {
        let (label, class) = match section {
            Section::Modified => ("Namespace", "modified"),
            Section::Added => ("New Namespace", "added"),
            Section::Removed => ("Removed Namespace", "removed"),
        };
        out.push_str(&format!(
            "<h2 class=\"{class}\">{label} {}</h2>\n<div>\n",
            escape(name)
        ));
    }

    fn end_namespace(&self, out: &mut String) {
        out.push_str("</div>\n");
    }

    fn begin_type(&self, out: &mut String, name: &str, kind: Option<TypeKind>, section: Section, breaking: bool) {
        let kind = kind.unwrap_or_default();
        let (heading, base) = match section {
            Section::Modified => (format!("Type Changed: {name}"), "modified"),
            Section::Added => (format!("New {kind}: {name}"), "added"),
            Section::Removed => (format!("Removed {kind}: {name}"), "removed"),
        };
        out.push_str(&format!(
            "<h3 class=\"{}\">{}</h3>\n",
            Self::class(base, breaking),
            escape(heading.as_str())
        ));
    }

    fn end_type(&self, _out: &mut String) {}

    fn begin_member_group(&self, out: &mut String, header: &str, breaking: bool) {
        let class = if breaking { " class=\"breaking\"" } else { "" };
        out.push_str(&format!("<p{class}>{}:</p>\n<pre>\n", escape(header)));
    }

    fn end_member_group(&self, out: &mut String) {
        out.push_str("</pre>\n");
    }

    fn diff_addition(&self, out: &mut String, text: &str, breaking: bool) {
        out.push_str(&format!(
            "<span class=\"{}\">{}</span>\n",
            Self::class("added", breaking),
            escape(text)
        ));
    }

    fn diff_removal(&self, out: &mut String, text: &str, breaking: bool) {
        out.push_str(&format!(
            "<span class=\"{}\">{}</span>\n",
            Self::class("removed", breaking),
            escape(text)
        ));
    }

    fn diff_modification(&self, out: &mut String, text: &str, change: &str, breaking: bool) {
        out.push_str(&format!(
            "{}: <span class=\"{}\">{}</span>\n",
            escape(text),
            Self::class("modified", breaking),
            escape(change)
        ));
    }

    fn plain(&self, out: &mut String, text: &str) {
        out.push_str(&escape(text));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_changes() {
        let mut out = String::new();
        let f = MarkdownFormatter;
        f.diff_addition(&mut out, "M()", false);
        f.diff_removal(&mut out, "N(System.Int32)", true);
        f.diff_modification(&mut out, "X", "Field value is 1 and should be 2", true);
        assert_eq!(
            out,
            "* `+` `M()`\n\
             * `-` ~~`N(System.Int32)`~~ **[breaking]**\n\
             * `~` `X`: Field value is 1 and should be 2 **[breaking]**\n"
        );
    }

    #[test]
    fn markdown_sections() {
        let mut out = String::new();
        let f = MarkdownFormatter;
        f.begin_namespace(&mut out, "N", Section::Added);
        f.begin_type(&mut out, "N.Foo", Some(TypeKind::Struct), Section::Removed, true);
        assert_eq!(out, "### New Namespace N\n\n#### Removed struct: N.Foo **[breaking]**\n\n");
    }

    #[test]
    fn html_escapes() {
        let mut out = String::new();
        let f = HtmlFormatter;
        f.diff_addition(&mut out, "List`1[T] <Get>()", true);
        assert_eq!(
            out,
            "<span class=\"added added-breaking-inline\">List`1[T] &lt;Get&gt;()</span>\n"
        );

        let mut doc = String::new();
        f.begin_document(&mut doc, "API diff: Lib.dll");
        f.end_document(&mut doc);
        assert!(doc.starts_with("<html>"));
        assert!(doc.contains("<h1>API diff: Lib.dll</h1>"));
        assert!(doc.ends_with("</html>\n"));
    }
}
