//! Cross-assembly type resolution.
//!
//! The extractor needs to look behind type references in a few places: base-type chains
//! (delegate detection, inherited interfaces, override detection, full-API merging),
//! attribute types (visibility, constructor bodies) and enum types (symbolic names for
//! attribute arguments). A [`TypeResolver`] answers those lookups. [`AssemblySet`] is the
//! stock implementation over a set of already loaded assemblies.

use std::collections::HashMap;

use crate::{
    metadata::{
        definitions::{AssemblyDefinition, TypeDefinitionRc},
        signatures::{TypeName, TypeSignature},
    },
    Error, Result,
};

/// Maximum depth of base-type chains and declaring-type chains that are walked.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Resolves type references to their definitions.
///
/// Implementations must be cheap to call repeatedly and must not mutate shared state in a
/// way that is observable to callers; extraction of independent assemblies runs in parallel
/// against the same resolver.
pub trait TypeResolver: Send + Sync {
    /// Find the definition of `name`, or `None` when it cannot be loaded.
    fn resolve(&self, name: &TypeName) -> Option<TypeDefinitionRc>;

    /// Resolve the named type at the root of a signature.
    fn resolve_signature(&self, signature: &TypeSignature) -> Option<TypeDefinitionRc> {
        signature.type_name().and_then(|name| self.resolve(name))
    }
}

/// An in-memory index of the types of several assemblies, keyed by metadata full name.
#[derive(Debug, Default, Clone)]
pub struct AssemblySet {
    types: HashMap<String, TypeDefinitionRc>,
}

impl AssemblySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a collection of assemblies.
    pub fn from_assemblies<'a>(assemblies: impl IntoIterator<Item = &'a AssemblyDefinition>) -> Self {
        let mut set = Self::new();
        for assembly in assemblies {
            set.add(assembly);
        }
        set
    }

    /// Index every type (nested types included) of `assembly`.
    ///
    /// When two assemblies define the same full name, the first one registered wins.
    pub fn add(&mut self, assembly: &AssemblyDefinition) {
        for ty in &assembly.types {
            self.index(ty);
        }
    }

    fn index(&mut self, ty: &TypeDefinitionRc) {
        let key = ty.full_name();
        if self.types.contains_key(&key) {
            log::debug!("duplicate type definition {key}, keeping the first one");
        } else {
            self.types.insert(key, ty.clone());
        }
        for nested in &ty.nested_types {
            self.index(nested);
        }
    }

    /// Number of indexed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// `true` when no type has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for AssemblySet {
    fn resolve(&self, name: &TypeName) -> Option<TypeDefinitionRc> {
        self.types.get(&name.full_name()).cloned()
    }
}

/// Walk the base-type chain of `ty`, nearest base first.
///
/// The walk stops at the first base that cannot be resolved.
///
/// # Errors
/// Returns [`Error::RecursionLimit`] for chains deeper than [`MAX_HIERARCHY_DEPTH`], which
/// only happens for cyclic hierarchies.
pub fn base_types(
    resolver: &dyn TypeResolver,
    ty: &TypeDefinitionRc,
) -> Result<Vec<TypeDefinitionRc>> {
    let mut chain = Vec::new();
    let mut current = ty.clone();
    while let Some(base) = current.base_type.as_ref() {
        let Some(resolved) = resolver.resolve_signature(base) else {
            log::debug!("could not resolve base type of {}", current.full_name());
            break;
        };
        if chain.len() >= MAX_HIERARCHY_DEPTH {
            return Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH));
        }
        chain.push(resolved.clone());
        current = resolved;
    }
    Ok(chain)
}

/// Visibility of a referenced type from outside its assembly.
///
/// Top-level types must be public; nested types must be nested-public, protected or
/// protected-internal inside a visible declaring type. Returns `None` when the type (or one
/// of its declaring types) cannot be resolved.
pub fn is_visible(resolver: &dyn TypeResolver, name: &TypeName) -> Option<bool> {
    let mut current = name.clone();
    for _ in 0..MAX_HIERARCHY_DEPTH {
        let ty = resolver.resolve(&current)?;
        match &ty.declaring_type {
            None => return Some(ty.is_public()),
            Some(declaring) => {
                if !ty.is_nested_visible() {
                    return Some(false);
                }
                current = declaring.clone();
            }
        }
    }
    Some(false)
}
