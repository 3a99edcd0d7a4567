//! # apiscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the apiscope library: extraction, comparison, documents and reports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all apiscope operations
pub use crate::Error;

/// The result type used throughout apiscope
pub use crate::Result;

/// Configuration of extraction, comparison and reports
pub use crate::config::{AttributePolicy, CompareConfig, ExtractorConfig, ReportConfig};

// ================================================================================================
// Metadata Input
// ================================================================================================

/// The metadata object model handed to the extractor
pub use crate::metadata::definitions::{
    AssemblyDefinition, EventDefinition, ExportedType, FieldDefinition, MethodDefinition,
    MethodDefinitionRc, ParameterDefinition, PropertyDefinition, TypeDefinition,
    TypeDefinitionRc,
};

/// Applied custom attributes
pub use crate::metadata::customattributes::{CustomAttribute, CustomAttributeArgument};

/// Type references
pub use crate::metadata::signatures::{TypeName, TypeSignature};

/// Loading assemblies from PE files
pub use crate::metadata::reader::{load_assembly, read_assembly};

/// Cross-assembly type resolution
pub use crate::metadata::resolver::{AssemblySet, TypeResolver};

// ================================================================================================
// Extraction and API Trees
// ================================================================================================

/// Builds API trees from assembly definitions
pub use crate::extract::Extractor;

/// The canonical API tree
pub use crate::tree::{
    AssemblyTree, AttributeRecord, MemberDetail, MemberKind, MemberRecord, NamespaceRecord,
    TypeKind, TypeRecord,
};

/// API tree documents
pub use crate::tree::xml::{from_xml, to_xml};

// ================================================================================================
// Comparison and Reports
// ================================================================================================

/// Tree comparison
pub use crate::compare::{compare, compare_all, Comparer};

/// The diff tree
pub use crate::compare::{Counters, DiffNode, DiffTree, NodeKind, Presence};

/// Formatted change reports
pub use crate::report::{render, Formatter, HtmlFormatter, MarkdownFormatter};
