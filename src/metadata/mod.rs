//! The metadata object model consumed by the extractor.
//!
//! The binary CLI metadata format is parsed by `dotscope`; [`reader`] converts what it loads
//! into the plain owned data the rest of the crate works on, so extraction and comparison
//! never see metadata tokens.
//!
//! # Key Components
//!
//! - [`definitions`] - Assemblies, types, methods, fields, properties, events, parameters
//! - [`signatures`] - [`signatures::TypeSignature`] and [`signatures::TypeName`]
//! - [`customattributes`] - Applied custom attributes with decoded arguments
//! - [`flags`] - Attribute flag words and their textual rendering
//! - [`reader`] - Loading assemblies from PE files through `dotscope`
//! - [`resolver`] - The [`resolver::TypeResolver`] trait and the [`resolver::AssemblySet`] index

pub mod customattributes;
pub mod definitions;
pub mod flags;
pub mod reader;
pub mod resolver;
pub mod signatures;
