//! Configuration of extraction and comparison.
//!
//! All configuration is immutable once built and passed in by the caller; nothing in the
//! crate keeps process-wide state. The attribute blocklists that both the extractor and the
//! comparison engine consult live in [`AttributePolicy`].

use regex::Regex;

use crate::Result;

/// Attribute type suffixes that mark an API as intentionally incomplete.
pub const DEFAULT_TODO_SUFFIXES: &[&str] = &[
    "TODOAttribute",
    "MonoDocumentationNoteAttribute",
    "MonoExtensionAttribute",
    "MonoLimitationAttribute",
    "MonoNotSupportedAttribute",
];

/// Attribute types that carry no API information.
pub const DEFAULT_MEANINGLESS_ATTRIBUTES: &[&str] =
    &["System.Runtime.CompilerServices.CompilerGeneratedAttribute"];

/// `(attribute type, property)` pairs whose values are informational only.
pub const DEFAULT_IGNORED_PROPERTIES: &[(&str, &str)] = &[
    ("System.Reflection.AssemblyKeyFileAttribute", "KeyFile"),
    ("System.Reflection.AssemblyCompanyAttribute", "Company"),
    ("System.Reflection.AssemblyConfigurationAttribute", "Configuration"),
    ("System.Reflection.AssemblyCopyrightAttribute", "Copyright"),
    ("System.Reflection.AssemblyProductAttribute", "Product"),
    ("System.Reflection.AssemblyTrademarkAttribute", "Trademark"),
    (
        "System.Reflection.AssemblyInformationalVersionAttribute",
        "InformationalVersion",
    ),
    ("System.ObsoleteAttribute", "Message"),
    ("System.IO.IODescriptionAttribute", "Description"),
    ("System.Diagnostics.MonitoringDescriptionAttribute", "Description"),
];

/// Which attributes are noise, which mark TODOs, and which properties are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePolicy {
    /// Name suffixes of TODO-marker attribute types
    pub todo_suffixes: Vec<String>,
    /// Full names of attribute types that are skipped entirely
    pub meaningless: Vec<String>,
    /// `(attribute type, property)` pairs that are never emitted or compared
    pub ignored_properties: Vec<(String, String)>,
}

impl Default for AttributePolicy {
    fn default() -> Self {
        AttributePolicy {
            todo_suffixes: DEFAULT_TODO_SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
            meaningless: DEFAULT_MEANINGLESS_ATTRIBUTES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ignored_properties: DEFAULT_IGNORED_PROPERTIES
                .iter()
                .map(|(ty, prop)| ((*ty).to_string(), (*prop).to_string()))
                .collect(),
        }
    }
}

impl AttributePolicy {
    /// `true` when `name` is a TODO-marker attribute type.
    #[must_use]
    pub fn is_todo(&self, name: &str) -> bool {
        self.todo_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// `true` when `name` carries no API information.
    #[must_use]
    pub fn is_meaningless(&self, name: &str) -> bool {
        self.meaningless.iter().any(|m| m == name)
    }

    /// `true` when property `property` of attribute `attribute` is informational only.
    ///
    /// `TypeId` is ignored on every attribute.
    #[must_use]
    pub fn is_ignored_property(&self, attribute: &str, property: &str) -> bool {
        property == "TypeId"
            || self
                .ignored_properties
                .iter()
                .any(|(ty, prop)| ty == attribute && prop == property)
    }
}

/// Extraction switches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractorConfig {
    /// Extract the serialization surface: all non-transient instance fields of all types,
    /// and no constructors, properties, events or methods
    pub abi_mode: bool,
    /// Extract forwarded types as if declared locally instead of recording forwarders
    pub follow_forwarders: bool,
    /// Merge inherited properties and methods into each type
    pub full_api_set: bool,
    /// Omit forwarded types whose destination cannot be resolved instead of failing
    pub ignore_resolution_errors: bool,
    /// Only list interfaces a type implements directly
    pub ignore_inherited_interfaces: bool,
    /// Attribute filtering rules
    pub attributes: AttributePolicy,
}

impl ExtractorConfig {
    /// Serialization-surface extraction.
    #[must_use]
    pub fn abi() -> Self {
        ExtractorConfig {
            abi_mode: true,
            ..Default::default()
        }
    }

    /// Contract extraction: inherited members merged, forwarders followed.
    #[must_use]
    pub fn full_api() -> Self {
        ExtractorConfig {
            full_api_set: true,
            follow_forwarders: true,
            ..Default::default()
        }
    }
}

/// Comparison switches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompareConfig {
    /// Attribute filtering rules, usually the same as the extractor's
    pub attributes: AttributePolicy,
}

/// Filters of the formatted diff.
///
/// Patterns are matched against a change description of the form
/// `Namespace.Type: Header: Member`; types and namespaces are described by their
/// qualified name alone.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReportConfig {
    /// Additions of members and interfaces to drop
    pub ignore_added: Vec<Regex>,
    /// Removals to drop
    pub ignore_removed: Vec<Regex>,
    /// New types and namespaces to drop
    pub ignore_new: Vec<Regex>,
    /// Drop every change that is not breaking
    pub ignore_nonbreaking: bool,
    /// Drop parameter renames
    pub ignore_parameter_names: bool,
    /// Drop methods becoming virtual
    pub ignore_virtual: bool,
    /// Drop setters added to existing properties
    pub ignore_added_setters: bool,
}

impl ReportConfig {
    /// Breaking changes only.
    #[must_use]
    pub fn breaking_only() -> Self {
        ReportConfig {
            ignore_nonbreaking: true,
            ignore_parameter_names: true,
            ignore_virtual: true,
            ignore_added_setters: true,
            ..Default::default()
        }
    }

    /// Compile command-line patterns.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] for the first pattern that is not a valid regex.
    pub fn patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
        patterns
            .iter()
            .map(|pattern| Ok(Regex::new(pattern.as_ref())?))
            .collect()
    }

    /// `true` when the addition described by `description` is filtered out.
    #[must_use]
    pub fn ignores_added(&self, description: &str) -> bool {
        self.ignore_added.iter().any(|re| re.is_match(description))
    }

    /// `true` when the removal described by `description` is filtered out.
    #[must_use]
    pub fn ignores_removed(&self, description: &str) -> bool {
        self.ignore_removed.iter().any(|re| re.is_match(description))
    }

    /// `true` when the new type or namespace described by `description` is filtered out.
    #[must_use]
    pub fn ignores_new(&self, description: &str) -> bool {
        self.ignore_new.iter().any(|re| re.is_match(description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = AttributePolicy::default();
        assert!(policy.is_todo("System.MonoTODOAttribute"));
        assert!(policy.is_todo("System.MonoLimitationAttribute"));
        assert!(!policy.is_todo("System.ObsoleteAttribute"));
        assert!(policy.is_meaningless("System.Runtime.CompilerServices.CompilerGeneratedAttribute"));
        assert!(policy.is_ignored_property("System.ObsoleteAttribute", "Message"));
        assert!(!policy.is_ignored_property("System.ObsoleteAttribute", "IsError"));
        assert!(policy.is_ignored_property("Anything", "TypeId"));
    }

    #[test]
    fn presets() {
        assert!(ExtractorConfig::abi().abi_mode);
        let full = ExtractorConfig::full_api();
        assert!(full.full_api_set && full.follow_forwarders && !full.abi_mode);
    }

    #[test]
    fn report_patterns() {
        let config = ReportConfig {
            ignore_removed: ReportConfig::patterns(&["^System\\.Obsolete\\."]).unwrap(),
            ..Default::default()
        };
        assert!(config.ignores_removed("System.Obsolete.Thing: Removed methods: M()"));
        assert!(!config.ignores_removed("System.Thing: Removed methods: M()"));
        assert!(!config.ignores_added("anything"));
        assert!(ReportConfig::patterns(&["("]).is_err());
        assert!(ReportConfig::breaking_only().ignore_nonbreaking);
    }
}
