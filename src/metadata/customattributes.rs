//! Decoded custom attribute instances.
//!
//! A [`CustomAttribute`] is one attribute applied to an assembly, type, member, parameter or
//! generic parameter: the attribute type, the parameter types of the constructor that was
//! called, and the decoded fixed and named arguments (ECMA-335 §II.23.3).

use crate::metadata::signatures::{TypeName, TypeSignature};

/// One applied custom attribute
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAttribute {
    /// The attribute type (the constructor's declaring type)
    pub attribute_type: TypeName,
    /// Parameter types of the invoked constructor
    pub constructor_params: Vec<TypeSignature>,
    /// The decoded argument blob
    pub value: CustomAttributeValue,
}

impl CustomAttribute {
    /// An attribute applied through its parameterless constructor.
    pub fn new(attribute_type: TypeName) -> Self {
        CustomAttribute {
            attribute_type,
            constructor_params: Vec::new(),
            value: CustomAttributeValue::default(),
        }
    }

    /// Add a fixed (constructor) argument together with its declared parameter type.
    #[must_use]
    pub fn with_fixed(mut self, param_type: TypeSignature, arg: CustomAttributeArgument) -> Self {
        self.constructor_params.push(param_type);
        self.value.fixed_args.push(arg);
        self
    }

    /// Add a named property argument.
    #[must_use]
    pub fn with_property(mut self, name: &str, arg: CustomAttributeArgument) -> Self {
        self.value.named_args.push(CustomAttributeNamedArgument {
            is_field: false,
            name: name.to_string(),
            value: arg,
        });
        self
    }

    /// Metadata full name of the attribute type.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.attribute_type.full_name()
    }
}

/// Represents a parsed custom attribute value with fixed and named arguments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAttributeValue {
    /// Fixed arguments, in constructor parameter order
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Named arguments (fields and properties)
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

/// Represents a single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// A null string, type or array
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
    /// Type reference, by serialized type name
    Type(String),
    /// Array of arguments
    Array(Vec<CustomAttributeArgument>),
    /// Enum value with its enum type and underlying integral value
    Enum(TypeName, Box<CustomAttributeArgument>),
}

/// Represents a named argument (field or property) in a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument {
    /// Whether this is a field (true) or property (false)
    pub is_field: bool,
    /// Name of the field or property
    pub name: String,
    /// The argument value
    pub value: CustomAttributeArgument,
}

impl CustomAttributeArgument {
    /// The integral value of a numeric argument (enums look through to their underlying value).
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        let value = match self {
            CustomAttributeArgument::Bool(v) => i128::from(*v),
            CustomAttributeArgument::Char(v) => i128::from(u32::from(*v)),
            CustomAttributeArgument::I1(v) => i128::from(*v),
            CustomAttributeArgument::U1(v) => i128::from(*v),
            CustomAttributeArgument::I2(v) => i128::from(*v),
            CustomAttributeArgument::U2(v) => i128::from(*v),
            CustomAttributeArgument::I4(v) => i128::from(*v),
            CustomAttributeArgument::U4(v) => i128::from(*v),
            CustomAttributeArgument::I8(v) => i128::from(*v),
            CustomAttributeArgument::U8(v) => i128::from(*v),
            CustomAttributeArgument::Enum(_, inner) => return inner.as_integer(),
            _ => return None,
        };
        Some(value)
    }

    /// The string payload of a string argument.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomAttributeArgument::String(s) | CustomAttributeArgument::Type(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way the invariant culture prints it.
    ///
    /// Returns `None` for [`CustomAttributeArgument::Null`]. Enum values print their raw
    /// integral value here; symbolic names are resolved by the attribute materializer.
    #[must_use]
    pub fn to_invariant_string(&self) -> Option<String> {
        let text = match self {
            CustomAttributeArgument::Null => return None,
            CustomAttributeArgument::Bool(true) => "True".to_string(),
            CustomAttributeArgument::Bool(false) => "False".to_string(),
            CustomAttributeArgument::Char(v) => v.to_string(),
            CustomAttributeArgument::I1(v) => v.to_string(),
            CustomAttributeArgument::U1(v) => v.to_string(),
            CustomAttributeArgument::I2(v) => v.to_string(),
            CustomAttributeArgument::U2(v) => v.to_string(),
            CustomAttributeArgument::I4(v) => v.to_string(),
            CustomAttributeArgument::U4(v) => v.to_string(),
            CustomAttributeArgument::I8(v) => v.to_string(),
            CustomAttributeArgument::U8(v) => v.to_string(),
            CustomAttributeArgument::R4(v) => v.to_string(),
            CustomAttributeArgument::R8(v) => v.to_string(),
            CustomAttributeArgument::String(v) | CustomAttributeArgument::Type(v) => v.clone(),
            CustomAttributeArgument::Array(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| item.to_invariant_string().unwrap_or_else(|| "null".into()))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            CustomAttributeArgument::Enum(_, inner) => return inner.to_invariant_string(),
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_rendering() {
        assert_eq!(
            CustomAttributeArgument::Bool(true).to_invariant_string(),
            Some("True".into())
        );
        assert_eq!(CustomAttributeArgument::Null.to_invariant_string(), None);
        let array = CustomAttributeArgument::Array(vec![
            CustomAttributeArgument::I4(1),
            CustomAttributeArgument::Null,
        ]);
        assert_eq!(array.to_invariant_string(), Some("[1, null]".into()));
    }

    #[test]
    fn integers_look_through_enums() {
        let value = CustomAttributeArgument::Enum(
            TypeName::new("System", "AttributeTargets"),
            Box::new(CustomAttributeArgument::I4(4)),
        );
        assert_eq!(value.as_integer(), Some(4));
        assert_eq!(CustomAttributeArgument::U8(u64::MAX).as_integer(), Some(u64::MAX.into()));
        assert_eq!(CustomAttributeArgument::String("x".into()).as_integer(), None);
    }
}
