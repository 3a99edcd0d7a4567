//! The canonical API tree produced by extraction and consumed by comparison.
//!
//! An [`AssemblyTree`] is plain data: namespaces, types, members, parameters and attributes,
//! each carrying only normalized strings and flag words. Two trees built from the same API
//! are equal regardless of how the metadata was laid out, and a tree survives a round trip
//! through its XML document form ([`xml`]) unchanged.

use strum::{Display, EnumIter, EnumString};

pub mod xml;

/// Kind of a type, in classification order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TypeKind {
    /// Reference type
    #[default]
    Class,
    /// Value type
    Struct,
    /// Interface
    Interface,
    /// Enumeration
    Enum,
    /// Delegate
    Delegate,
    /// Pointer type
    Pointer,
}

/// Interop string format of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
pub enum CharSet {
    /// No string format is recorded (custom format)
    #[default]
    None,
    /// ANSI strings
    Ansi,
    /// Platform dependent
    Auto,
    /// UTF-16 strings
    Unicode,
}

/// Field layout of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
pub enum Layout {
    /// Runtime chooses the layout
    #[default]
    AutoLayout,
    /// Fields are laid out in declaration order
    SequentialLayout,
    /// Offsets are given explicitly
    ExplicitLayout,
}

/// Direction of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Passed by value
    #[default]
    In,
    /// `out` parameter
    Out,
    /// `ref` parameter
    Ref,
    /// Receiver of an extension method
    This,
}

/// An attribute applied to an API element, with its logical property bag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeRecord {
    /// Full name of the attribute type
    pub name: String,
    /// Properties in emission order; `None` is a null value
    pub properties: Vec<(String, Option<String>)>,
}

impl AttributeRecord {
    /// An attribute without properties.
    pub fn new(name: impl Into<String>) -> Self {
        AttributeRecord {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Option<&str>) -> Self {
        self.properties
            .push((name.to_string(), value.map(str::to_string)));
        self
    }

    /// Value of property `name`; outer `None` when the property is absent.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Option<&str>> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }

    /// First non-null property value, used as the comment of TODO markers.
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.properties.iter().find_map(|(_, value)| value.as_deref())
    }
}

/// A generic parameter of a type or method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenericParameterRecord {
    /// Declared name
    pub name: String,
    /// `GenericParamAttributes`
    pub attributes: u32,
    /// Constraint type keys, in declaration order
    pub constraints: Vec<String>,
    /// Attributes applied to the parameter
    pub custom_attributes: Vec<AttributeRecord>,
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterRecord {
    /// Declared name
    pub name: String,
    /// Zero-based position
    pub position: u32,
    /// `ParamAttributes`
    pub attrib: u32,
    /// Type key
    pub param_type: String,
    /// Passing direction
    pub direction: Direction,
    /// Parameter is optional
    pub optional: bool,
    /// Default value; `NULL` for a null constant
    pub default_value: Option<String>,
    /// Attributes applied to the parameter
    pub attributes: Vec<AttributeRecord>,
}

/// Method signature flags compared between versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureFlags {
    /// Method is abstract
    pub is_abstract: bool,
    /// Method is virtual
    pub is_virtual: bool,
    /// Method is static
    pub is_static: bool,
    /// Method is a sealed override (`final`, virtual, reusing its slot)
    pub is_final: bool,
}

impl SignatureFlags {
    /// `true` when no flag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.is_abstract || self.is_virtual || self.is_static || self.is_final)
    }
}

impl std::fmt::Display for SignatureFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (self.is_abstract, "Abstract"),
            (self.is_virtual, "Virtual"),
            (self.is_static, "Static"),
            (self.is_final, "Final"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        if names.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

/// Method and constructor specific data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodDetail {
    /// Return type key; `None` for constructors returning void
    pub return_type: Option<String>,
    /// Parameters, by position
    pub parameters: Vec<ParameterRecord>,
    /// Signature flags
    pub flags: SignatureFlags,
    /// The method overrides a base method
    pub is_override: bool,
    /// Generic parameters
    pub generic_parameters: Vec<GenericParameterRecord>,
}

/// Field specific data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDetail {
    /// Field type key
    pub field_type: String,
    /// Constant value of literal fields
    pub value: Option<String>,
}

/// Property specific data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyDetail {
    /// Property type key
    pub property_type: String,
    /// Index parameter signature
    pub params: Option<String>,
    /// Documented accessors (getter, setter)
    pub accessors: Vec<MemberRecord>,
}

/// Event specific data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventDetail {
    /// Delegate type key
    pub event_type: String,
    /// Documented accessors (add, remove)
    pub accessors: Vec<MemberRecord>,
}

/// Variant data of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDetail {
    /// A field
    Field(FieldDetail),
    /// A property
    Property(PropertyDetail),
    /// An event
    Event(EventDetail),
    /// A method
    Method(MethodDetail),
    /// A constructor
    Constructor(MethodDetail),
}

/// Member kinds, in tree order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// Fields
    Field,
    /// Constructors
    Constructor,
    /// Properties
    Property,
    /// Events
    Event,
    /// Methods
    Method,
}

/// A field, property, event, method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Name; methods and constructors include the parameter list (`M(System.Int32)`)
    pub name: String,
    /// Raw attribute flags of the member
    pub attrib: u32,
    /// Attributes applied to the member
    pub attributes: Vec<AttributeRecord>,
    /// Kind specific data
    pub detail: MemberDetail,
}

impl MemberRecord {
    /// Kind of the member.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self.detail {
            MemberDetail::Field(_) => MemberKind::Field,
            MemberDetail::Property(_) => MemberKind::Property,
            MemberDetail::Event(_) => MemberKind::Event,
            MemberDetail::Method(_) => MemberKind::Method,
            MemberDetail::Constructor(_) => MemberKind::Constructor,
        }
    }

    /// Method data of methods and constructors.
    #[must_use]
    pub fn method(&self) -> Option<&MethodDetail> {
        match &self.detail {
            MemberDetail::Method(detail) | MemberDetail::Constructor(detail) => Some(detail),
            _ => None,
        }
    }

    /// The key that identifies this member among its siblings across versions.
    ///
    /// Fields and events are keyed by name. Methods by name and parameter list, with the
    /// return type in front for operators (conversion operators differ only by return type)
    /// and the generic arity appended for generic methods. Properties by
    /// `name:type:index-parameters`.
    #[must_use]
    pub fn signature_key(&self) -> String {
        match &self.detail {
            MemberDetail::Field(_) | MemberDetail::Event(_) => self.name.clone(),
            MemberDetail::Property(detail) => format!(
                "{}:{}:{}",
                self.name,
                detail.property_type,
                detail.params.as_deref().unwrap_or_default()
            ),
            MemberDetail::Method(detail) | MemberDetail::Constructor(detail) => {
                let mut key = match (&detail.return_type, self.name.starts_with("op_")) {
                    (Some(return_type), true) => format!("{} {}", return_type, self.name),
                    _ => self.name.clone(),
                };
                if !detail.generic_parameters.is_empty() {
                    key.push_str(&format!("`{}", detail.generic_parameters.len()));
                }
                key
            }
        }
    }
}

/// A type with its members and nested types
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TypeRecord {
    /// Simple name (with generic arity suffix)
    pub name: String,
    /// Classification
    pub kind: TypeKind,
    /// Base type key
    pub base: Option<String>,
    /// Type is sealed
    pub is_sealed: bool,
    /// Type is abstract
    pub is_abstract: bool,
    /// Type is serializable
    pub is_serializable: bool,
    /// Interop string format
    pub charset: CharSet,
    /// Field layout; `None` for interfaces
    pub layout: Option<Layout>,
    /// Packing size
    pub pack: Option<u16>,
    /// Class size
    pub size: Option<u32>,
    /// Underlying type key of enums
    pub enum_type: Option<String>,
    /// Attributes applied to the type
    pub attributes: Vec<AttributeRecord>,
    /// Public implemented interface keys, ordinal order
    pub interfaces: Vec<String>,
    /// Generic parameters
    pub generic_parameters: Vec<GenericParameterRecord>,
    /// Fields
    pub fields: Vec<MemberRecord>,
    /// Constructors
    pub constructors: Vec<MemberRecord>,
    /// Properties
    pub properties: Vec<MemberRecord>,
    /// Events
    pub events: Vec<MemberRecord>,
    /// Methods
    pub methods: Vec<MemberRecord>,
    /// Visible nested types
    pub nested: Vec<TypeRecord>,
}

impl TypeRecord {
    /// Member list of one kind.
    #[must_use]
    pub fn members(&self, kind: MemberKind) -> &[MemberRecord] {
        match kind {
            MemberKind::Field => &self.fields,
            MemberKind::Constructor => &self.constructors,
            MemberKind::Property => &self.properties,
            MemberKind::Event => &self.events,
            MemberKind::Method => &self.methods,
        }
    }

    /// Mutable member list of one kind.
    pub fn members_mut(&mut self, kind: MemberKind) -> &mut Vec<MemberRecord> {
        match kind {
            MemberKind::Field => &mut self.fields,
            MemberKind::Constructor => &mut self.constructors,
            MemberKind::Property => &mut self.properties,
            MemberKind::Event => &mut self.events,
            MemberKind::Method => &mut self.methods,
        }
    }

    /// Type is static (abstract and sealed).
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_abstract && self.is_sealed
    }
}

/// A namespace and its top-level types
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceRecord {
    /// Namespace name
    pub name: String,
    /// Types, ordered by name
    pub types: Vec<TypeRecord>,
}

/// The API of one assembly
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssemblyTree {
    /// Assembly name
    pub name: String,
    /// Assembly version
    pub version: String,
    /// Assembly-level attributes
    pub attributes: Vec<AttributeRecord>,
    /// Namespaces, ordered by name
    pub namespaces: Vec<NamespaceRecord>,
}

impl AssemblyTree {
    /// Number of types, nested types included.
    #[must_use]
    pub fn type_count(&self) -> usize {
        fn count(ty: &TypeRecord) -> usize {
            1 + ty.nested.iter().map(count).sum::<usize>()
        }
        self.namespaces
            .iter()
            .flat_map(|ns| ns.types.iter())
            .map(count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, return_type: &str, arity: usize) -> MemberRecord {
        MemberRecord {
            name: name.into(),
            attrib: 0x0016,
            attributes: vec![],
            detail: MemberDetail::Method(MethodDetail {
                return_type: Some(return_type.into()),
                generic_parameters: (0..arity)
                    .map(|i| GenericParameterRecord {
                        name: format!("T{i}"),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn conversion_operators_are_keyed_by_return_type() {
        let to_int = method("op_Explicit(N.Money)", "System.Int32", 0);
        let to_long = method("op_Explicit(N.Money)", "System.Int64", 0);
        assert_ne!(to_int.signature_key(), to_long.signature_key());
        assert_eq!(to_int.signature_key(), "System.Int32 op_Explicit(N.Money)");
    }

    #[test]
    fn generic_arity_disambiguates() {
        let plain = method("M(System.Int32)", "System.Void", 0);
        let generic = method("M(System.Int32)", "System.Void", 1);
        assert_eq!(plain.signature_key(), "M(System.Int32)");
        assert_eq!(generic.signature_key(), "M(System.Int32)`1");
    }

    #[test]
    fn property_keys() {
        let item = MemberRecord {
            name: "Item".into(),
            attrib: 0,
            attributes: vec![],
            detail: MemberDetail::Property(PropertyDetail {
                property_type: "System.String".into(),
                params: Some("System.Int32".into()),
                accessors: vec![],
            }),
        };
        assert_eq!(item.signature_key(), "Item:System.String:System.Int32");
        assert_eq!(item.kind(), MemberKind::Property);
    }

    #[test]
    fn enum_text_forms() {
        assert_eq!(TypeKind::Delegate.to_string(), "delegate");
        assert_eq!("struct".parse::<TypeKind>().unwrap(), TypeKind::Struct);
        assert_eq!(Layout::SequentialLayout.to_string(), "SequentialLayout");
        assert_eq!(Direction::Ref.to_string(), "ref");
        assert_eq!(
            SignatureFlags {
                is_abstract: true,
                is_virtual: true,
                ..Default::default()
            }
            .to_string(),
            "Abstract, Virtual"
        );
    }
}
