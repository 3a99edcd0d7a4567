//! Type references as handed over by the metadata reader.
//!
//! These mirror the element types of ECMA-335 §II.23.2.12 with one difference to a raw
//! signature blob: references to `TypeDef`/`TypeRef` rows are already resolved into a
//! [`TypeName`] carrying the namespace, name and declaring-type chain. Nothing in here depends
//! on table ordering or tokens, so two readers of the same assembly produce equal values.

use std::fmt;

/// The identity of a named type: namespace, name and the chain of declaring types.
///
/// `scope` records the assembly (or module) the reference points into. It is informational
/// only and never part of a type key: a reference keeps the same identity whether or not its
/// scope could be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeName {
    /// Namespace of the outermost declaring type (empty for nested types)
    pub namespace: String,
    /// Simple name, including the generic arity suffix (e.g. ``List`1``)
    pub name: String,
    /// The declaring type, for nested types
    pub declaring: Option<Box<TypeName>>,
    /// Resolution scope (assembly name), if known
    pub scope: Option<String>,
}

impl TypeName {
    /// Create a top-level type name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            namespace: namespace.into(),
            name: name.into(),
            declaring: None,
            scope: None,
        }
    }

    /// Create the name of a type nested in `declaring`.
    pub fn nested(declaring: TypeName, name: impl Into<String>) -> Self {
        TypeName {
            namespace: String::new(),
            name: name.into(),
            declaring: Some(Box::new(declaring)),
            scope: None,
        }
    }

    /// Attach a resolution scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Metadata full name: `Namespace.Name`, nested types joined with `/`.
    ///
    /// This is the lookup key used by resolvers and the name recorded for attributes.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.declaring {
            Some(declaring) => format!("{}/{}", declaring.full_name(), self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }

    /// Namespace of the outermost declaring type.
    #[must_use]
    pub fn root_namespace(&self) -> &str {
        match &self.declaring {
            Some(declaring) => declaring.root_namespace(),
            None => &self.namespace,
        }
    }

    /// `true` when this names `Namespace.Name` as a top-level type.
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.declaring.is_none() && self.namespace == namespace && self.name == name
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Represents a type in a field, parameter, return, property or constraint position
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    #[default]
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// System.String
    String,
    /// System.Object
    Object,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// Type is referenced during runtime
    TypedByRef,
    /// CIL value-type
    ValueType(TypeName),
    /// CIL Class
    Class(TypeName),
    /// Generic type parameter, by position and declared name
    GenericParamType {
        /// Position in the declaring type's generic parameter list
        index: u32,
        /// Declared name (e.g. `T`)
        name: String,
    },
    /// Generic method parameter, by position and declared name
    GenericParamMethod {
        /// Position in the declaring method's generic parameter list
        index: u32,
        /// Declared name (e.g. `TResult`)
        name: String,
    },
    /// Generic type and its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// A pointer to a type
    Ptr(Box<TypeSignature>),
    /// Type by reference
    ByRef(Box<TypeSignature>),
    /// Single dimension array
    SzArray(Box<TypeSignature>),
    /// Array
    Array(SignatureArray),
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// Required modifier
    ModifiedRequired {
        /// The modifier type
        modifier: TypeName,
        /// The modified type
        base: Box<TypeSignature>,
    },
    /// Optional modifier
    ModifiedOptional {
        /// The modifier type
        modifier: TypeName,
        /// The modified type
        base: Box<TypeSignature>,
    },
    /// A pinned type
    Pinned(Box<TypeSignature>),
    /// Sentinel for vararg method signature
    Sentinel,
}

/// Size and lower bound of one array dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayDimensions {
    /// The size of this dimension
    pub size: Option<u32>,
    /// The lower bound of this dimension (lowest index that can be used to access an element)
    pub lower_bound: Option<u32>,
}

/// A general (possibly multi-dimensional) array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// The type in the array
    pub base: Box<TypeSignature>,
    /// The number of dimensions
    pub rank: u32,
    /// The dimensions (can be less than 'rank', are in order from 0..count)
    pub dimensions: Vec<ArrayDimensions>,
}

/// A function pointer signature (II.23.2.1)
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Used to encode the keyword instance in the calling convention
    pub has_this: bool,
    /// Used to encode the keyword explicit in the calling convention
    pub explicit_this: bool,
    /// Used to encode the keyword vararg in the calling convention
    pub vararg: bool,
    /// Uses native 'cdecl' calling convention
    pub cdecl: bool,
    /// Uses native 'stdcall' calling convention
    pub stdcall: bool,
    /// Uses native 'thiscall' calling convention
    pub thiscall: bool,
    /// Uses native 'fastcall' calling convention
    pub fastcall: bool,
    /// Number of generic parameters of the pointed-to method
    pub param_count_generic: u32,
    /// The return type
    pub return_type: TypeSignature,
    /// The parameter types
    pub params: Vec<TypeSignature>,
}

impl TypeSignature {
    /// Shorthand for a class reference `Namespace.Name`.
    pub fn class(namespace: &str, name: &str) -> Self {
        TypeSignature::Class(TypeName::new(namespace, name))
    }

    /// Shorthand for a value-type reference `Namespace.Name`.
    pub fn value_type(namespace: &str, name: &str) -> Self {
        TypeSignature::ValueType(TypeName::new(namespace, name))
    }

    /// The named type at the root of this signature, if there is one.
    ///
    /// Generic instantiations report their generic type definition; wrappers (arrays, by-ref,
    /// pointers, modifiers) are not looked through.
    #[must_use]
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => Some(name),
            TypeSignature::GenericInst(base, _) => base.type_name(),
            _ => None,
        }
    }

    /// `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSignature::Void)
    }

    /// `true` for a by-ref type, looking through custom modifiers.
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        match self {
            TypeSignature::ByRef(_) => true,
            TypeSignature::ModifiedRequired { base, .. }
            | TypeSignature::ModifiedOptional { base, .. } => base.is_by_ref(),
            _ => false,
        }
    }

    /// `true` when the type involves an unmanaged pointer or function pointer.
    #[must_use]
    pub fn is_unsafe(&self) -> bool {
        match self {
            TypeSignature::Ptr(_) | TypeSignature::FnPtr(_) => true,
            TypeSignature::ByRef(base)
            | TypeSignature::SzArray(base)
            | TypeSignature::Pinned(base)
            | TypeSignature::ModifiedRequired { base, .. }
            | TypeSignature::ModifiedOptional { base, .. } => base.is_unsafe(),
            TypeSignature::Array(array) => array.base.is_unsafe(),
            TypeSignature::GenericInst(base, args) => {
                base.is_unsafe() || args.iter().any(TypeSignature::is_unsafe)
            }
            _ => false,
        }
    }

    /// The simple name of the type, without namespace, as used by the loose member
    /// de-duplication of inherited members.
    #[must_use]
    pub fn short_name(&self) -> String {
        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => name.name.clone(),
            TypeSignature::GenericInst(base, _) => base.short_name(),
            TypeSignature::GenericParamType { name, .. }
            | TypeSignature::GenericParamMethod { name, .. } => name.clone(),
            TypeSignature::ByRef(base) => format!("{}&", base.short_name()),
            TypeSignature::Ptr(base) => format!("{}*", base.short_name()),
            TypeSignature::SzArray(base) => format!("{}[]", base.short_name()),
            TypeSignature::Array(array) => format!("{}[]", array.base.short_name()),
            TypeSignature::Pinned(base)
            | TypeSignature::ModifiedRequired { base, .. }
            | TypeSignature::ModifiedOptional { base, .. } => base.short_name(),
            TypeSignature::FnPtr(_) => "method".to_string(),
            TypeSignature::Sentinel => "...".to_string(),
            primitive => primitive
                .primitive_name()
                .map(|(_, name)| name.to_string())
                .unwrap_or_default(),
        }
    }

    /// `(namespace, name)` of the corlib type behind a primitive element type.
    #[must_use]
    pub fn primitive_name(&self) -> Option<(&'static str, &'static str)> {
        let name = match self {
            TypeSignature::Void => "Void",
            TypeSignature::Boolean => "Boolean",
            TypeSignature::Char => "Char",
            TypeSignature::I1 => "SByte",
            TypeSignature::U1 => "Byte",
            TypeSignature::I2 => "Int16",
            TypeSignature::U2 => "UInt16",
            TypeSignature::I4 => "Int32",
            TypeSignature::U4 => "UInt32",
            TypeSignature::I8 => "Int64",
            TypeSignature::U8 => "UInt64",
            TypeSignature::R4 => "Single",
            TypeSignature::R8 => "Double",
            TypeSignature::String => "String",
            TypeSignature::Object => "Object",
            TypeSignature::I => "IntPtr",
            TypeSignature::U => "UIntPtr",
            TypeSignature::TypedByRef => "TypedReference",
            _ => return None,
        };
        Some(("System", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_of_nested_types() {
        let outer = TypeName::new("System.Collections", "Outer");
        let inner = TypeName::nested(outer, "Inner");
        assert_eq!(inner.full_name(), "System.Collections.Outer/Inner");
        assert_eq!(inner.root_namespace(), "System.Collections");
        assert_eq!(TypeName::new("", "Global").full_name(), "Global");
    }

    #[test]
    fn by_ref_looks_through_modifiers() {
        let sig = TypeSignature::ModifiedRequired {
            modifier: TypeName::new("System.Runtime.InteropServices", "InAttribute"),
            base: Box::new(TypeSignature::ByRef(Box::new(TypeSignature::I4))),
        };
        assert!(sig.is_by_ref());
        assert!(!TypeSignature::I4.is_by_ref());
    }

    #[test]
    fn unsafe_detection() {
        let ptr = TypeSignature::SzArray(Box::new(TypeSignature::Ptr(Box::new(TypeSignature::U1))));
        assert!(ptr.is_unsafe());
        assert!(!TypeSignature::class("System", "Object").is_unsafe());
    }

    #[test]
    fn short_names() {
        let list = TypeSignature::GenericInst(
            Box::new(TypeSignature::class("System.Collections.Generic", "List`1")),
            vec![TypeSignature::I4],
        );
        assert_eq!(list.short_name(), "List`1");
        assert_eq!(TypeSignature::I4.short_name(), "Int32");
        assert_eq!(
            TypeSignature::ByRef(Box::new(TypeSignature::String)).short_name(),
            "String&"
        );
    }
}
