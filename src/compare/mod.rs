//! Hierarchical comparison of two API trees.
//!
//! [`compare`] matches a *reference* [`AssemblyTree`] (the baseline) against a *target* tree
//! (the API being validated) and produces a [`DiffTree`]: one [`DiffNode`] per compared
//! entity, classified as matched, missing (reference only) or extra (target only), with
//! field-level warnings on matched entities and [`Counters`] rolled up through the tree.
//!
//! # Architecture
//!
//! - `group` - keyed matching shared by every level of the tree
//! - [`types`] - namespaces, types, interfaces and nested types
//! - [`members`] - fields, constructors, properties, events, methods, parameters
//! - `attributes` - attribute lists and property bags
//! - [`counters`] - the two-tier presence counters
//! - [`node`] - the diff tree itself
//! - [`xml`] - the diff document
//!
//! Warnings read "X is *reference* and should be *target*". Items carrying a TODO marker
//! attribute are flagged `error=todo` and are never reported missing or extra.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use apiscope::{compare::compare, tree::xml::from_xml, CompareConfig};
//!
//! let reference = from_xml(&std::fs::read_to_string("mscorlib-4.0.xml")?)?;
//! let target = from_xml(&std::fs::read_to_string("mscorlib-mono.xml")?)?;
//! let diff = compare(&reference, &target, &CompareConfig::default());
//! println!("{}% complete", diff.counters().complete_total());
//! ```
//!
//! # Thread Safety
//!
//! Comparison is a pure function of its inputs. [`compare_all`] compares independent
//! assembly pairs in parallel.

use rayon::prelude::*;

use crate::{config::CompareConfig, tree::AssemblyTree};

mod attributes;
pub mod counters;
mod group;
pub mod members;
pub mod node;
pub mod types;
pub mod xml;

pub use counters::Counters;
pub use node::{DiffGroup, DiffNode, DiffTree, ErrorKind, NodeKind, Presence};

/// Compares API trees under one configuration
#[derive(Clone, Copy)]
pub struct Comparer<'a> {
    config: &'a CompareConfig,
}

impl<'a> Comparer<'a> {
    /// Create a comparer.
    #[must_use]
    pub fn new(config: &'a CompareConfig) -> Self {
        Comparer { config }
    }

    /// Compare two assemblies.
    #[must_use]
    pub fn compare(&self, reference: &AssemblyTree, target: &AssemblyTree) -> DiffTree {
        let mut assembly = DiffNode::new(NodeKind::Assembly, &reference.name);
        assembly.warn_changed("Assembly name", reference.name.as_str(), target.name.as_str());
        assembly.warn_changed("Assembly version", reference.version.as_str(), target.version.as_str());

        self.compare_attributes(&mut assembly, &reference.attributes, &target.attributes);
        self.compare_namespaces(&mut assembly, &reference.namespaces, &target.namespaces);

        if let Some(comment) = self
            .todo_marker(&target.attributes)
            .or_else(|| self.todo_marker(&reference.attributes))
        {
            assembly.todo = true;
            assembly.comment = comment;
            assembly.counters.todo += 1;
            assembly.counters.error_total += 1;
        }
        assembly.seal();

        let counters = &assembly.counters;
        log::debug!(
            "compared {}: {} present, {} missing, {} extra, {} warnings",
            reference.name,
            counters.present_total,
            counters.missing_total,
            counters.extra_total,
            counters.warning_total
        );

        DiffTree {
            version: reference.version.clone(),
            assembly,
        }
    }
}

/// Compare a reference tree against a target tree.
#[must_use]
pub fn compare(reference: &AssemblyTree, target: &AssemblyTree, config: &CompareConfig) -> DiffTree {
    Comparer::new(config).compare(reference, target)
}

/// Compare independent `(reference, target)` pairs in parallel.
///
/// Results keep the order of `pairs`.
#[must_use]
pub fn compare_all(pairs: &[(AssemblyTree, AssemblyTree)], config: &CompareConfig) -> Vec<DiffTree> {
    let comparer = Comparer::new(config);
    pairs
        .par_iter()
        .map(|(reference, target)| comparer.compare(reference, target))
        .collect()
}
