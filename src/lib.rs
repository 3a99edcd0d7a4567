// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # apiscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/apiscope.svg)](https://crates.io/crates/apiscope)
//! [![Documentation](https://docs.rs/apiscope/badge.svg)](https://docs.rs/apiscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/apiscope/blob/main/LICENSE-APACHE)
//!
//! Public API extraction and comparison for .NET assemblies. `apiscope` turns the metadata of
//! an assembly into a canonical, order-independent API tree, compares two such trees, and
//! reports every namespace, type and member as present, missing, extra, changed or marked as
//! unfinished, with completeness counters rolled up through the hierarchy.
//!
//! ## Features
//!
//! - **Canonical API trees** - Normalized type names, sorted members, materialized attribute values
//! - **Keyed hierarchical diff** - Overloads, conversion operators and generic arities kept apart
//! - **Completeness tracking** - Present/missing/extra/todo/warning counters per node and subtree
//! - **TODO markers** - APIs flagged as unfinished are reported as such instead of as missing
//! - **Documents** - API trees and diffs persist as XML and load back unchanged
//! - **Reports** - Markdown and HTML change reports with breaking-change classification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apiscope::prelude::*;
//!
//! let reference = from_xml(&std::fs::read_to_string("Lib-1.0.xml")?)?;
//! let target = from_xml(&std::fs::read_to_string("Lib-2.0.xml")?)?;
//!
//! let diff = compare(&reference, &target, &CompareConfig::default());
//! println!("{}% complete", diff.counters().complete_total());
//!
//! let report = render(&diff, &ReportConfig::default(), &MarkdownFormatter);
//! println!("{report}");
//! # Ok::<(), apiscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The metadata object model handed to the extractor, and a `dotscope`-backed reader filling it from PE files
//! - [`typename`] - Canonical type keys
//! - [`extract`] - Assembly definitions to [`tree::AssemblyTree`]s
//! - [`tree`] - The canonical API tree and its document form
//! - [`compare`] - The tree diff, its counters and its document form
//! - [`report`] - Formatted change reports
//! - [`xml`] - The element model shared by both document forms
//! - [`prelude`] - Convenient re-exports of commonly used types
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust,no_run
//! use apiscope::{Error, tree::xml::from_xml};
//!
//! match from_xml(&std::fs::read_to_string("Lib.xml")?) {
//!     Ok(tree) => println!("{} namespaces", tree.namespaces.len()),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed document: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#[macro_use]
pub(crate) mod error;

/// Shared fixtures for unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use apiscope::prelude::*;
///
/// let tree = from_xml(&std::fs::read_to_string("Lib.xml")?)?;
/// let diff = compare(&tree, &tree, &CompareConfig::default());
/// assert!(diff.assembly.is_clean());
/// # Ok::<(), apiscope::Error>(())
/// ```
pub mod prelude;

pub mod compare;
pub mod config;
pub mod extract;
pub mod metadata;
pub mod report;
pub mod tree;
pub mod typename;
pub mod xml;

/// `apiscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `apiscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use config::{AttributePolicy, CompareConfig, ExtractorConfig, ReportConfig};
