//! Extraction of canonical API trees from assembly definitions.
//!
//! An [`Extractor`] walks one [`AssemblyDefinition`] and produces the [`AssemblyTree`] that
//! describes its externally visible surface: public (and protected) types and members,
//! normalized type keys, and materialized attribute property bags. Everything that is not
//! part of the loaded assembly is looked up through a [`TypeResolver`].
//!
//! # Architecture
//!
//! The extractor is split along the levels of the tree:
//!
//! - [`attributes`] - turns custom attribute blobs into named property bags
//! - [`members`] - fields, constructors, properties, events, methods and their parameters
//! - [`types`] - type classification, interfaces, layout and nested types
//! - [`assembly`] - namespaces, assembly attributes and type forwarders
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use apiscope::{extract::Extractor, metadata::resolver::AssemblySet, ExtractorConfig};
//!
//! let resolver = AssemblySet::from_assemblies([&assembly, &corlib]);
//! let config = ExtractorConfig::default();
//! let tree = Extractor::new(&config, &resolver).extract(&assembly)?;
//! println!("{} types", tree.type_count());
//! ```
//!
//! # Thread Safety
//!
//! Extraction only reads its inputs. An [`Extractor`] can be shared between threads, and
//! [`Extractor::extract_all`] processes independent assemblies in parallel.

use rayon::prelude::*;

use crate::{
    config::ExtractorConfig,
    metadata::{definitions::AssemblyDefinition, resolver::TypeResolver},
    tree::AssemblyTree,
    Result,
};

pub mod assembly;
pub mod attributes;
pub mod members;
pub mod types;

pub use attributes::Materialized;

/// Builds [`AssemblyTree`]s from assembly definitions.
#[derive(Clone, Copy)]
pub struct Extractor<'a> {
    config: &'a ExtractorConfig,
    resolver: &'a dyn TypeResolver,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over `resolver` with the given switches.
    #[must_use]
    pub fn new(config: &'a ExtractorConfig, resolver: &'a dyn TypeResolver) -> Self {
        Extractor { config, resolver }
    }

    /// The switches this extractor runs with.
    #[must_use]
    pub fn config(&self) -> &ExtractorConfig {
        self.config
    }

    /// Extract several independent assemblies in parallel.
    ///
    /// Results keep the order of `assemblies`.
    ///
    /// # Errors
    /// Returns the first error any of the extractions reports.
    pub fn extract_all(&self, assemblies: &[AssemblyDefinition]) -> Result<Vec<AssemblyTree>> {
        assemblies
            .par_iter()
            .map(|assembly| self.extract(assembly))
            .collect()
    }
}
