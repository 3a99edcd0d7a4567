//! Attribute flag words attached to metadata definitions.
//!
//! Flag values follow ECMA-335 §II.23.1. Types, fields, parameters, properties, events and
//! generic parameters use plain `u32` constants grouped in modules named after the metadata
//! enumeration; method flags are split into [`bitflags`] groups (access, vtable layout,
//! modifiers) the same way the raw `MethodAttributes` word is commonly decomposed.
//!
//! The `describe_*` helpers render a flag word as a stable, comma-separated list of names.
//! They are used for the "Incorrect attributes" warnings of the comparison engine, so the
//! rendering must only depend on the flag value.

use bitflags::bitflags;

/// Mask for the access bits of a method attribute word.
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Mask for the vtable layout bit of a method attribute word.
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;
/// Runtime-reserved method bits (`RTSpecialName`, `HasSecurity`, `RequireSecObject`).
pub const METHOD_RESERVED_MASK: u32 = 0xd000;

/// Flag on an exported type row marking it as a type forwarder.
pub const EXPORTED_TYPE_FORWARDER: u32 = 0x0020_0000;

#[allow(non_snake_case)]
/// `TypeAttributes` flags of a type definition.
pub mod TypeAttributes {
    /// Mask for extracting type visibility information.
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Type has no public scope (internal to assembly).
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Type has public scope (visible outside assembly).
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested type with public visibility.
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested type with private visibility.
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Nested type visible to derived types (protected).
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Nested type visible within the assembly (internal).
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Nested type visible to derived types within the assembly.
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Nested type visible to derived types or within the assembly.
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;

    /// Mask for extracting class layout information.
    pub const LAYOUT_MASK: u32 = 0x0000_0018;
    /// Class fields are auto-laid out.
    pub const AUTO_LAYOUT: u32 = 0x0000_0000;
    /// Class fields are laid out sequentially.
    pub const SEQUENTIAL_LAYOUT: u32 = 0x0000_0008;
    /// Layout is supplied explicitly.
    pub const EXPLICIT_LAYOUT: u32 = 0x0000_0010;

    /// Type is an interface.
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Class is abstract.
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Class is concrete and may not be extended.
    pub const SEALED: u32 = 0x0000_0100;
    /// Class name is special.
    pub const SPECIAL_NAME: u32 = 0x0000_0400;
    /// Class is serializable.
    pub const SERIALIZABLE: u32 = 0x0000_2000;

    /// Mask for string interop format.
    pub const STRING_FORMAT_MASK: u32 = 0x0003_0000;
    /// LPTSTR is interpreted as ANSI.
    pub const ANSI_CLASS: u32 = 0x0000_0000;
    /// LPTSTR is interpreted as UNICODE.
    pub const UNICODE_CLASS: u32 = 0x0001_0000;
    /// LPTSTR is interpreted automatically.
    pub const AUTO_CLASS: u32 = 0x0002_0000;
    /// A non-standard encoding specified by `CUSTOM_STRING_FORMAT_MASK`.
    pub const CUSTOM_FORMAT_CLASS: u32 = 0x0003_0000;
}

#[allow(non_snake_case)]
/// `FieldAttributes` flags of a field definition.
pub mod FieldAttributes {
    /// Mask for the access bits.
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable.
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type.
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this assembly.
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessible by anyone in the assembly.
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types.
    pub const FAMILY: u32 = 0x0004;
    /// Accessible by sub-types anywhere, plus anyone in the assembly.
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessible by anyone who has visibility to this scope.
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance.
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init.
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant.
    pub const LITERAL: u32 = 0x0040;
    /// Field does not have to be serialized when the type is remoted.
    pub const NOT_SERIALIZED: u32 = 0x0080;
    /// Field is special.
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Implementation is forwarded through PInvoke.
    pub const PINVOKE_IMPL: u32 = 0x2000;
    /// CLI provides 'special' behavior, depending upon the name of the field.
    pub const RTSPECIAL_NAME: u32 = 0x0400;
    /// Field has marshalling information.
    pub const HAS_FIELD_MARSHAL: u32 = 0x1000;
    /// Field has a default value.
    pub const HAS_DEFAULT: u32 = 0x8000;
    /// Field has an RVA.
    pub const HAS_FIELD_RVA: u32 = 0x0100;
}

#[allow(non_snake_case)]
/// `ParamAttributes` flags of a parameter definition.
pub mod ParamAttributes {
    /// Parameter is `[In]`.
    pub const IN: u32 = 0x0001;
    /// Parameter is `[Out]`.
    pub const OUT: u32 = 0x0002;
    /// Parameter is optional.
    pub const OPTIONAL: u32 = 0x0010;
    /// Parameter has a default value.
    pub const HAS_DEFAULT: u32 = 0x1000;
    /// Parameter has marshalling information.
    pub const HAS_FIELD_MARSHAL: u32 = 0x2000;
}

#[allow(non_snake_case)]
/// `PropertyAttributes` flags of a property definition.
pub mod PropertyAttributes {
    /// Property is special.
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime should check name encoding.
    pub const RTSPECIAL_NAME: u32 = 0x0400;
    /// Property has a default value.
    pub const HAS_DEFAULT: u32 = 0x1000;
}

#[allow(non_snake_case)]
/// `EventAttributes` flags of an event definition.
pub mod EventAttributes {
    /// Event is special.
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime should check name encoding.
    pub const RTSPECIAL_NAME: u32 = 0x0400;
}

#[allow(non_snake_case)]
/// `GenericParamAttributes` flags of a generic parameter.
pub mod GenericParamAttributes {
    /// Mask for the variance bits.
    pub const VARIANCE_MASK: u32 = 0x0003;
    /// The generic parameter is covariant.
    pub const COVARIANT: u32 = 0x0001;
    /// The generic parameter is contravariant.
    pub const CONTRAVARIANT: u32 = 0x0002;
    /// The generic parameter has the `class` special constraint.
    pub const REFERENCE_TYPE_CONSTRAINT: u32 = 0x0004;
    /// The generic parameter has the `struct` special constraint.
    pub const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT: u32 = 0x0008;
    /// The generic parameter has the `new()` special constraint.
    pub const DEFAULT_CONSTRUCTOR_CONSTRAINT: u32 = 0x0010;
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    /// Method vtable layout flags
    pub struct MethodVtableFlags: u32 {
        /// Method reuses existing slot in vtable
        const REUSE_SLOT = 0x0000;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
    }
}

impl MethodVtableFlags {
    /// Extract vtable layout flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_VTABLE_LAYOUT_MASK)
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associate with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
        /// Reserved: shall be zero for conforming implementations
        const UNMANAGED_EXPORT = 0x0008;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK)
    }
}

/// Normalize a method attribute word before two versions are compared.
///
/// Drops the runtime-reserved and vtable-layout bits, collapses `FamORAssem` into `Family`
/// and removes `HasSecurity`, `RequireSecObject` and `PinvokeImpl`.
#[must_use]
pub fn normalize_method_flags(flags: u32) -> u32 {
    let mut access = flags & METHOD_ACCESS_MASK;
    if access == MethodAccessFlags::FAM_OR_ASSEM.bits() {
        access = MethodAccessFlags::FAMILY.bits();
    }

    let modifiers = MethodModifiers::from_method_flags(flags & !METHOD_RESERVED_MASK)
        - MethodModifiers::PINVOKE_IMPL
        - MethodModifiers::HAS_SECURITY
        - MethodModifiers::REQUIRE_SEC_OBJECT;

    access | modifiers.bits()
}

fn access_name(access: u32) -> &'static str {
    match access {
        0 => "CompilerControlled",
        1 => "Private",
        2 => "FamANDAssem",
        3 => "Assembly",
        4 => "Family",
        5 => "FamORAssem",
        _ => "Public",
    }
}

fn join_names(head: Option<&str>, flags: u32, table: &[(u32, &str)]) -> String {
    let mut names: Vec<&str> = head.into_iter().collect();
    names.extend(
        table
            .iter()
            .filter(|(bit, _)| flags & bit != 0)
            .map(|(_, name)| *name),
    );
    if names.is_empty() {
        return flags.to_string();
    }
    names.join(", ")
}

/// Render a (normalized) method attribute word.
#[must_use]
pub fn describe_method_flags(flags: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (0x0008, "UnmanagedExport"),
        (0x0010, "Static"),
        (0x0020, "Final"),
        (0x0040, "Virtual"),
        (0x0080, "HideBySig"),
        (0x0100, "NewSlot"),
        (0x0200, "CheckAccessOnOverride"),
        (0x0400, "Abstract"),
        (0x0800, "SpecialName"),
        (0x1000, "RTSpecialName"),
        (0x2000, "PInvokeImpl"),
        (0x4000, "HasSecurity"),
        (0x8000, "RequireSecObject"),
    ];
    join_names(Some(access_name(flags & METHOD_ACCESS_MASK)), flags, TABLE)
}

/// Render a field attribute word.
#[must_use]
pub fn describe_field_flags(flags: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (FieldAttributes::STATIC, "Static"),
        (FieldAttributes::INIT_ONLY, "InitOnly"),
        (FieldAttributes::LITERAL, "Literal"),
        (FieldAttributes::NOT_SERIALIZED, "NotSerialized"),
        (FieldAttributes::HAS_FIELD_RVA, "HasFieldRVA"),
        (FieldAttributes::SPECIAL_NAME, "SpecialName"),
        (FieldAttributes::RTSPECIAL_NAME, "RTSpecialName"),
        (FieldAttributes::HAS_FIELD_MARSHAL, "HasFieldMarshal"),
        (FieldAttributes::PINVOKE_IMPL, "PinvokeImpl"),
        (FieldAttributes::HAS_DEFAULT, "HasDefault"),
    ];
    join_names(
        Some(access_name(flags & FieldAttributes::FIELD_ACCESS_MASK)),
        flags,
        TABLE,
    )
}

/// Render an event attribute word.
#[must_use]
pub fn describe_event_flags(flags: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (EventAttributes::SPECIAL_NAME, "SpecialName"),
        (EventAttributes::RTSPECIAL_NAME, "RTSpecialName"),
    ];
    if flags == 0 {
        return "None".to_string();
    }
    join_names(None, flags, TABLE)
}

/// Render a parameter attribute word.
#[must_use]
pub fn describe_param_flags(flags: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (ParamAttributes::IN, "In"),
        (ParamAttributes::OUT, "Out"),
        (ParamAttributes::OPTIONAL, "Optional"),
        (ParamAttributes::HAS_DEFAULT, "HasDefault"),
        (ParamAttributes::HAS_FIELD_MARSHAL, "HasFieldMarshal"),
    ];
    if flags == 0 {
        return "None".to_string();
    }
    join_names(None, flags, TABLE)
}

/// Render a generic parameter attribute word.
#[must_use]
pub fn describe_generic_param_flags(flags: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (GenericParamAttributes::COVARIANT, "Covariant"),
        (GenericParamAttributes::CONTRAVARIANT, "Contravariant"),
        (
            GenericParamAttributes::REFERENCE_TYPE_CONSTRAINT,
            "ReferenceTypeConstraint",
        ),
        (
            GenericParamAttributes::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT,
            "NotNullableValueTypeConstraint",
        ),
        (
            GenericParamAttributes::DEFAULT_CONSTRUCTOR_CONSTRAINT,
            "DefaultConstructorConstraint",
        ),
    ];
    if flags == 0 {
        return "NonVariant".to_string();
    }
    join_names(None, flags, TABLE)
}
