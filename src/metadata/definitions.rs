//! Assembly, type and member definitions in the shape the extractor consumes them.
//!
//! A metadata reader populates these structures once per assembly. Types and methods are
//! shared through [`Arc`] so properties and events can point at their accessor methods and
//! resolvers can hand out types of other assemblies without copying them.

use std::sync::Arc;

use crate::metadata::{
    customattributes::CustomAttribute,
    flags::{
        FieldAttributes, MethodAccessFlags, MethodModifiers, MethodVtableFlags, ParamAttributes,
        TypeAttributes, EXPORTED_TYPE_FORWARDER,
    },
    signatures::{TypeName, TypeSignature},
};

/// A reference to a `TypeDefinition`
pub type TypeDefinitionRc = Arc<TypeDefinition>;
/// A reference to a `MethodDefinition`
pub type MethodDefinitionRc = Arc<MethodDefinition>;

/// A compile-time constant attached to a field or parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// A null reference
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
}

impl Constant {
    /// Render the constant the way the invariant culture prints it; `None` for null.
    #[must_use]
    pub fn to_invariant_string(&self) -> Option<String> {
        let text = match self {
            Constant::Null => return None,
            Constant::Bool(true) => "True".to_string(),
            Constant::Bool(false) => "False".to_string(),
            Constant::Char(v) => v.to_string(),
            Constant::I1(v) => v.to_string(),
            Constant::U1(v) => v.to_string(),
            Constant::I2(v) => v.to_string(),
            Constant::U2(v) => v.to_string(),
            Constant::I4(v) => v.to_string(),
            Constant::U4(v) => v.to_string(),
            Constant::I8(v) => v.to_string(),
            Constant::U8(v) => v.to_string(),
            Constant::R4(v) => v.to_string(),
            Constant::R8(v) => v.to_string(),
            Constant::String(v) => v.clone(),
        };
        Some(text)
    }

    /// The integral value of an integer constant.
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        let value = match self {
            Constant::Bool(v) => i128::from(*v),
            Constant::Char(v) => i128::from(u32::from(*v)),
            Constant::I1(v) => i128::from(*v),
            Constant::U1(v) => i128::from(*v),
            Constant::I2(v) => i128::from(*v),
            Constant::U2(v) => i128::from(*v),
            Constant::I4(v) => i128::from(*v),
            Constant::U4(v) => i128::from(*v),
            Constant::I8(v) => i128::from(*v),
            Constant::U8(v) => i128::from(*v),
            _ => return None,
        };
        Some(value)
    }
}

/// A field named by an IL operand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRef {
    /// The type declaring the field
    pub declaring: TypeName,
    /// Field name
    pub name: String,
}

/// The subset of CIL instructions needed to correlate constructor arguments with fields.
///
/// Readers map every `ldarg` form (`ldarg.0`-`ldarg.3`, `ldarg.s`, `ldarg`) onto
/// [`Instruction::Ldarg`] with the raw argument index, where index 0 is `this` for instance
/// methods. Everything else that is irrelevant here becomes [`Instruction::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Load argument by raw index
    Ldarg(u16),
    /// Store into an instance field
    Stfld(FieldRef),
    /// Load an instance field
    Ldfld(FieldRef),
    /// Any other instruction, by mnemonic
    Other(String),
}

/// A decoded method body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodBody {
    /// Instructions in stream order
    pub instructions: Vec<Instruction>,
}

/// A generic parameter of a type or method
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericParameter {
    /// Declared name
    pub name: String,
    /// `GenericParamAttributes`
    pub flags: u32,
    /// Constraint types
    pub constraints: Vec<TypeSignature>,
    /// Attributes applied to the parameter
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A parameter of a method
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDefinition {
    /// Declared name
    pub name: String,
    /// Zero-based position in the parameter list
    pub position: u32,
    /// `ParamAttributes`
    pub flags: u32,
    /// Parameter type
    pub param_type: TypeSignature,
    /// Default value, for optional parameters
    pub constant: Option<Constant>,
    /// Attributes applied to the parameter
    pub custom_attributes: Vec<CustomAttribute>,
}

impl ParameterDefinition {
    /// A parameter without flags or default value.
    pub fn new(name: &str, position: u32, param_type: TypeSignature) -> Self {
        ParameterDefinition {
            name: name.to_string(),
            position,
            param_type,
            ..Default::default()
        }
    }

    /// Parameter carries `[In]`.
    #[must_use]
    pub fn is_in(&self) -> bool {
        self.flags & ParamAttributes::IN != 0
    }

    /// Parameter carries `[Out]`.
    #[must_use]
    pub fn is_out(&self) -> bool {
        self.flags & ParamAttributes::OUT != 0
    }

    /// Parameter is optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.flags & ParamAttributes::OPTIONAL != 0
    }
}

/// A method or constructor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodDefinition {
    /// Method name (`.ctor` for instance constructors)
    pub name: String,
    /// `MethodAttributes`
    pub flags: u32,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameters, in order
    pub params: Vec<ParameterDefinition>,
    /// Generic parameters
    pub generic_params: Vec<GenericParameter>,
    /// Attributes applied to the method
    pub custom_attributes: Vec<CustomAttribute>,
    /// Decoded body, if the reader provides one
    pub body: Option<MethodBody>,
}

impl MethodDefinition {
    /// Access part of the flags.
    #[must_use]
    pub fn access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }

    fn modifiers(&self) -> MethodModifiers {
        MethodModifiers::from_method_flags(self.flags)
    }

    /// Method is `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(MethodModifiers::STATIC)
    }

    /// Method is `virtual`.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.modifiers().contains(MethodModifiers::VIRTUAL)
    }

    /// Method is `abstract`.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(MethodModifiers::ABSTRACT)
    }

    /// Method is `final`.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers().contains(MethodModifiers::FINAL)
    }

    /// Method has a special name (accessors, operators, constructors).
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.modifiers().contains(MethodModifiers::SPECIAL_NAME)
    }

    /// Method reuses an inherited vtable slot.
    #[must_use]
    pub fn is_reuse_slot(&self) -> bool {
        !MethodVtableFlags::from_method_flags(self.flags).contains(MethodVtableFlags::NEW_SLOT)
    }

    /// Method is an instance or type constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.modifiers().contains(MethodModifiers::RTSPECIAL_NAME)
            && (self.name == ".ctor" || self.name == ".cctor")
    }

    /// Method is a finalizer (`Finalize()` overriding `Object.Finalize`).
    #[must_use]
    pub fn is_finalizer(&self) -> bool {
        self.name == "Finalize" && self.params.is_empty() && self.is_virtual() && !self.is_static()
    }
}

/// A field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// `FieldAttributes`
    pub flags: u32,
    /// Field type
    pub field_type: TypeSignature,
    /// Constant value, for literal fields
    pub constant: Option<Constant>,
    /// Attributes applied to the field
    pub custom_attributes: Vec<CustomAttribute>,
}

impl FieldDefinition {
    /// Access part of the flags.
    #[must_use]
    pub fn access(&self) -> u32 {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK
    }

    /// Field is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags & FieldAttributes::STATIC != 0
    }

    /// Field is a compile-time constant.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.flags & FieldAttributes::LITERAL != 0
    }

    /// Field has a special name.
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.flags & FieldAttributes::SPECIAL_NAME != 0
    }

    /// Field is excluded from serialization.
    #[must_use]
    pub fn is_not_serialized(&self) -> bool {
        self.flags & FieldAttributes::NOT_SERIALIZED != 0
    }
}

/// A property with its accessors
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDefinition {
    /// Property name
    pub name: String,
    /// `PropertyAttributes`
    pub flags: u32,
    /// Property type
    pub property_type: TypeSignature,
    /// The `get_` accessor
    pub getter: Option<MethodDefinitionRc>,
    /// The `set_` accessor
    pub setter: Option<MethodDefinitionRc>,
    /// Attributes applied to the property
    pub custom_attributes: Vec<CustomAttribute>,
}

/// An event with its accessors
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventDefinition {
    /// Event name
    pub name: String,
    /// `EventAttributes`
    pub flags: u32,
    /// Delegate type of the event
    pub event_type: TypeSignature,
    /// The `add_` accessor
    pub add_method: Option<MethodDefinitionRc>,
    /// The `remove_` accessor
    pub remove_method: Option<MethodDefinitionRc>,
    /// Attributes applied to the event
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A type definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeDefinition {
    /// Namespace (empty for nested types)
    pub namespace: String,
    /// Simple name, including the generic arity suffix
    pub name: String,
    /// `TypeAttributes`
    pub flags: u32,
    /// Base type; `None` for interfaces and `System.Object`
    pub base_type: Option<TypeSignature>,
    /// Declaring type, for nested types
    pub declaring_type: Option<TypeName>,
    /// Fields
    pub fields: Vec<FieldDefinition>,
    /// Methods, including constructors and accessors
    pub methods: Vec<MethodDefinitionRc>,
    /// Properties
    pub properties: Vec<PropertyDefinition>,
    /// Events
    pub events: Vec<EventDefinition>,
    /// Directly implemented interfaces
    pub interfaces: Vec<TypeSignature>,
    /// Nested types
    pub nested_types: Vec<TypeDefinitionRc>,
    /// Generic parameters
    pub generic_params: Vec<GenericParameter>,
    /// Attributes applied to the type
    pub custom_attributes: Vec<CustomAttribute>,
    /// `ClassLayout` packing size, if the type has a layout row
    pub packing_size: Option<u16>,
    /// `ClassLayout` class size, if the type has a layout row
    pub class_size: Option<u32>,
    /// The assembly defining this type
    pub scope: Option<String>,
}

impl TypeDefinition {
    /// The identity of this type as a [`TypeName`].
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        let mut name = match &self.declaring_type {
            Some(declaring) => TypeName::nested(declaring.clone(), self.name.clone()),
            None => TypeName::new(self.namespace.clone(), self.name.clone()),
        };
        name.scope = self.scope.clone();
        name
    }

    /// Metadata full name (`Namespace.Name`, nested types joined with `/`).
    #[must_use]
    pub fn full_name(&self) -> String {
        self.type_name().full_name()
    }

    /// Visibility bits.
    #[must_use]
    pub fn visibility(&self) -> u32 {
        self.flags & TypeAttributes::VISIBILITY_MASK
    }

    /// Top-level public type.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility() == TypeAttributes::PUBLIC
    }

    /// Nested type visible outside its assembly through its declaring type
    /// (public, protected or protected internal).
    #[must_use]
    pub fn is_nested_visible(&self) -> bool {
        matches!(
            self.visibility(),
            TypeAttributes::NESTED_PUBLIC
                | TypeAttributes::NESTED_FAMILY
                | TypeAttributes::NESTED_FAM_OR_ASSEM
        )
    }

    /// Type is an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags & TypeAttributes::INTERFACE != 0
    }

    /// Type is abstract.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags & TypeAttributes::ABSTRACT != 0
    }

    /// Type is sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags & TypeAttributes::SEALED != 0
    }

    /// Type carries the serializable flag.
    #[must_use]
    pub fn is_serializable(&self) -> bool {
        self.flags & TypeAttributes::SERIALIZABLE != 0
    }

    fn base_is(&self, namespace: &str, name: &str) -> bool {
        self.base_type
            .as_ref()
            .and_then(TypeSignature::type_name)
            .is_some_and(|base| base.is(namespace, name))
    }

    /// Type derives from `System.Enum`.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.base_is("System", "Enum")
    }

    /// Type is a value type (struct or enum), `System.Enum` itself excluded.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        if self.namespace == "System" && self.name == "Enum" {
            return false;
        }
        self.base_is("System", "ValueType") || self.is_enum()
    }

    /// Type derives directly from a delegate base.
    #[must_use]
    pub fn is_delegate(&self) -> bool {
        self.base_is("System", "MulticastDelegate")
            || (self.base_is("System", "Delegate") && self.name != "MulticastDelegate")
    }

    /// Look up a method by name.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MethodDefinitionRc> + 'a {
        self.methods.iter().filter(move |method| method.name == name)
    }
}

/// A row of the `ExportedType` table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportedType {
    /// Namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// `TypeAttributes` plus the forwarder bit
    pub flags: u32,
    /// The assembly the type lives in
    pub scope: Option<String>,
}

impl ExportedType {
    /// The row is a type forwarder.
    #[must_use]
    pub fn is_forwarder(&self) -> bool {
        self.flags & EXPORTED_TYPE_FORWARDER != 0
    }

    /// Identity of the exported type.
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        let name = TypeName::new(self.namespace.clone(), self.name.clone());
        match &self.scope {
            Some(scope) => name.with_scope(scope.clone()),
            None => name,
        }
    }
}

/// One loaded assembly
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyDefinition {
    /// Simple assembly name
    pub name: String,
    /// Version, `major.minor.build.revision`
    pub version: String,
    /// Assembly-level attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Types of the manifest module (top-level; nested types may also be listed)
    pub types: Vec<TypeDefinitionRc>,
    /// Exported types, including forwarders
    pub exported_types: Vec<ExportedType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_classification() {
        let enum_type = TypeDefinition {
            namespace: "N".into(),
            name: "E".into(),
            base_type: Some(TypeSignature::class("System", "Enum")),
            ..Default::default()
        };
        assert!(enum_type.is_enum());
        assert!(enum_type.is_value_type());

        let system_enum = TypeDefinition {
            namespace: "System".into(),
            name: "Enum".into(),
            base_type: Some(TypeSignature::class("System", "ValueType")),
            ..Default::default()
        };
        assert!(!system_enum.is_value_type());

        let delegate = TypeDefinition {
            namespace: "N".into(),
            name: "Handler".into(),
            base_type: Some(TypeSignature::class("System", "MulticastDelegate")),
            ..Default::default()
        };
        assert!(delegate.is_delegate());
    }

    #[test]
    fn method_flags() {
        let ctor = MethodDefinition {
            name: ".ctor".into(),
            flags: 0x0006 | 0x0800 | 0x1000,
            ..Default::default()
        };
        assert!(ctor.is_constructor());
        assert_eq!(ctor.access(), MethodAccessFlags::PUBLIC);

        let finalizer = MethodDefinition {
            name: "Finalize".into(),
            flags: 0x0004 | 0x0040,
            ..Default::default()
        };
        assert!(finalizer.is_finalizer());
        assert!(finalizer.is_reuse_slot());
    }

    #[test]
    fn constants() {
        assert_eq!(Constant::Null.to_invariant_string(), None);
        assert_eq!(Constant::Bool(false).to_invariant_string(), Some("False".into()));
        assert_eq!(Constant::U2(7).as_integer(), Some(7));
    }

    #[test]
    fn nested_type_names() {
        let nested = TypeDefinition {
            name: "Inner".into(),
            declaring_type: Some(TypeName::new("N", "Outer")),
            ..Default::default()
        };
        assert_eq!(nested.full_name(), "N.Outer/Inner");
    }
}
