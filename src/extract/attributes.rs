//! Materialization of custom attributes into named property bags.
//!
//! A custom attribute blob only records constructor arguments by position, yet an API tree
//! describes attributes by their logical properties (`Obsolete.IsError`,
//! `AttributeUsage.AllowMultiple`, ...). Named arguments map directly. Constructor arguments
//! are mapped through a small strategy table: a few framework attributes get dedicated
//! handling and everything else goes through IL inference, which correlates each constructor
//! argument with the field it is stored in and the property getter that loads that field.
//!
//! Enum-typed values render as their symbolic names (`[Flags]` enums as a `", "` separated
//! list), so a tree does not change when only the numeric value behind a name does.

use crate::{
    extract::Extractor,
    metadata::{
        customattributes::{CustomAttribute, CustomAttributeArgument},
        definitions::{FieldRef, Instruction, MethodDefinition, TypeDefinition},
        resolver,
        signatures::{TypeName, TypeSignature},
    },
    tree::AttributeRecord,
    typename::{cleanup, normalize},
    Result,
};

/// Name of the assembly attribute that records a type forwarder.
pub const TYPE_FORWARDED_TO_ATTRIBUTE: &str =
    "System.Runtime.CompilerServices.TypeForwardedToAttribute";

/// Name of the property carrying the comment of a TODO marker.
pub const TODO_COMMENT_PROPERTY: &str = "Comment";

const FLAGS_ATTRIBUTE: &str = "System.FlagsAttribute";

/// Outcome of materializing one custom attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// The attribute carries no API information and is not recorded
    Skipped,
    /// The attribute marks its target as incomplete
    Todo {
        /// Cleaned attribute type name
        name: String,
        /// Explanation given by the marker, if any
        comment: Option<String>,
    },
    /// A regular attribute with its logical properties
    Record(AttributeRecord),
}

type Properties = Vec<(String, Option<String>)>;

/// Maps constructor arguments of one specific attribute type onto properties.
///
/// Returns `None` when the constructor overload is not handled, in which case the generic IL
/// inference runs instead.
type ConstructorMapping =
    fn(&Extractor<'_>, &CustomAttribute) -> Result<Option<Properties>>;

const CONSTRUCTOR_STRATEGIES: &[(&str, ConstructorMapping)] = &[
    (
        "System.Runtime.CompilerServices.DecimalConstantAttribute",
        map_decimal_constant,
    ),
    ("System.ComponentModel.BindableAttribute", map_bindable),
];

fn push_unique(properties: &mut Properties, name: &str, value: Option<String>) {
    if properties.iter().all(|(key, _)| key != name) {
        properties.push((name.to_string(), value));
    }
}

impl Extractor<'_> {
    /// Materialize a single custom attribute.
    ///
    /// TODO markers are recognised by name before anything else, since marker attribute
    /// types are commonly internal to the assembly that uses them. Other attributes are
    /// skipped when their type is not visible outside its assembly (unresolvable types are
    /// assumed visible) or when the policy lists them as meaningless.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for constructor arguments that do not fit the
    /// attribute's known layout, or for type signatures that cannot be normalized.
    pub fn materialize(&self, attribute: &CustomAttribute) -> Result<Materialized> {
        let full_name = attribute.full_name();
        let name = cleanup(&full_name).into_owned();
        let policy = &self.config.attributes;

        if policy.is_todo(&full_name) {
            return Ok(Materialized::Todo {
                name,
                comment: todo_comment(attribute),
            });
        }
        if policy.is_meaningless(&full_name) {
            return Ok(Materialized::Skipped);
        }
        if resolver::is_visible(self.resolver, &attribute.attribute_type) == Some(false) {
            return Ok(Materialized::Skipped);
        }

        let Some(attribute_type) = self.resolver.resolve(&attribute.attribute_type) else {
            log::debug!("could not resolve attribute type {full_name}, recording it without properties");
            return Ok(Materialized::Record(AttributeRecord::new(name)));
        };

        let mut properties = Properties::new();
        for named in &attribute.value.named_args {
            if named.is_field {
                continue;
            }
            let value = self.argument_value(&named.value, None)?;
            push_unique(&mut properties, &named.name, value);
        }

        if !attribute.constructor_params.is_empty() {
            let strategy = CONSTRUCTOR_STRATEGIES
                .iter()
                .find(|(type_name, _)| *type_name == full_name)
                .map(|(_, strategy)| *strategy);
            let special = match strategy {
                Some(strategy) => strategy(self, attribute)?,
                None => None,
            };
            let mapped = match special {
                Some(mapped) => mapped,
                None => self.infer_from_constructor(attribute, &attribute_type)?,
            };
            for (key, value) in mapped {
                push_unique(&mut properties, &key, value);
            }
        }

        let uppercase = name.ends_with("GuidAttribute");
        let properties = properties
            .into_iter()
            .filter(|(key, _)| !policy.is_ignored_property(&full_name, key))
            .map(|(key, value)| {
                let value = if uppercase {
                    value.map(|v| v.to_uppercase())
                } else {
                    value
                };
                (key, value)
            })
            .collect();

        Ok(Materialized::Record(AttributeRecord { name, properties }))
    }

    /// Materialize a list of attributes in ordinal order of their type names.
    ///
    /// TODO markers are kept as records with a single [`TODO_COMMENT_PROPERTY`] property so
    /// the comparison engine can recognise them.
    ///
    /// # Errors
    /// Propagates [`Extractor::materialize`] failures.
    pub fn attribute_records(&self, attributes: &[CustomAttribute]) -> Result<Vec<AttributeRecord>> {
        let mut ordered: Vec<(String, &CustomAttribute)> = attributes
            .iter()
            .map(|attribute| (attribute.full_name(), attribute))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records = Vec::with_capacity(ordered.len());
        for (_, attribute) in ordered {
            match self.materialize(attribute)? {
                Materialized::Skipped => {}
                Materialized::Todo { name, comment } => records.push(
                    AttributeRecord::new(name)
                        .with_property(TODO_COMMENT_PROPERTY, comment.as_deref()),
                ),
                Materialized::Record(record) => records.push(record),
            }
        }
        Ok(records)
    }

    /// Render an argument value, resolving enum values to their names.
    ///
    /// `declared` is the parameter type the argument was passed for; it identifies the enum
    /// type when the blob stored the plain underlying value.
    fn argument_value(
        &self,
        argument: &CustomAttributeArgument,
        declared: Option<&TypeSignature>,
    ) -> Result<Option<String>> {
        let enum_type = match argument {
            CustomAttributeArgument::Enum(type_name, _) => self.resolver.resolve(type_name),
            _ => declared.and_then(|signature| self.resolver.resolve_signature(signature)),
        };

        let Some(enum_type) = enum_type.filter(|ty| ty.is_enum()) else {
            return Ok(argument.to_invariant_string());
        };
        let Some(value) = argument.as_integer() else {
            return Ok(argument.to_invariant_string());
        };

        let is_flags = enum_type
            .custom_attributes
            .iter()
            .any(|attribute| attribute.full_name() == FLAGS_ATTRIBUTE);
        if is_flags {
            Ok(Some(flags_enum_names(&enum_type, value)))
        } else {
            Ok(Some(enum_name(&enum_type, value).unwrap_or_else(|| value.to_string())))
        }
    }

    /// Correlate constructor arguments with properties through the constructor body.
    ///
    /// `ldarg N` followed by `stfld F` maps argument `N - 1` to field `F` (the first store
    /// of a field wins); a property whose getter loads `F` with `ldfld` then receives that
    /// argument.
    fn infer_from_constructor(
        &self,
        attribute: &CustomAttribute,
        attribute_type: &TypeDefinition,
    ) -> Result<Properties> {
        let Some(constructor) = find_constructor(attribute_type, &attribute.constructor_params)?
        else {
            log::debug!(
                "no matching constructor for {} found, constructor arguments are not mapped",
                attribute.full_name()
            );
            return Ok(Properties::new());
        };
        let Some(body) = constructor.body.as_ref() else {
            return Ok(Properties::new());
        };

        let owner = attribute_type.type_name();
        let mut field_mapping: Vec<(&FieldRef, usize)> = Vec::new();
        let mut argument: Option<u16> = None;
        for instruction in &body.instructions {
            match instruction {
                Instruction::Ldarg(index) if *index >= 1 => argument = Some(*index),
                Instruction::Stfld(field) => {
                    if field.declaring.full_name() != owner.full_name() {
                        continue;
                    }
                    let Some(index) = argument.take() else {
                        continue;
                    };
                    if field_mapping.iter().all(|(known, _)| *known != field) {
                        field_mapping.push((field, usize::from(index) - 1));
                    }
                }
                _ => {}
            }
        }
        if field_mapping.is_empty() {
            return Ok(Properties::new());
        }

        let mut properties = Properties::new();
        for property in &attribute_type.properties {
            let Some(field) = getter_field(property.getter.as_deref(), &owner) else {
                continue;
            };
            let Some(&(_, index)) = field_mapping.iter().find(|(known, _)| *known == field) else {
                continue;
            };
            let Some(arg) = attribute.value.fixed_args.get(index) else {
                continue;
            };
            let value = self.argument_value(arg, attribute.constructor_params.get(index))?;
            push_unique(&mut properties, &property.name, value);
        }
        Ok(properties)
    }
}

fn todo_comment(attribute: &CustomAttribute) -> Option<String> {
    attribute
        .value
        .fixed_args
        .iter()
        .chain(attribute.value.named_args.iter().map(|named| &named.value))
        .find_map(|arg| arg.as_str().map(str::to_string))
}

fn find_constructor<'t>(
    attribute_type: &'t TypeDefinition,
    params: &[TypeSignature],
) -> Result<Option<&'t MethodDefinition>> {
    let mut wanted = Vec::with_capacity(params.len());
    for param in params {
        wanted.push(normalize(param)?);
    }

    for method in attribute_type.methods_named(".ctor") {
        if !method.is_constructor() || method.is_static() || method.params.len() != params.len() {
            continue;
        }
        let mut matches = true;
        for (param, expected) in method.params.iter().zip(&wanted) {
            if normalize(&param.param_type)? != *expected {
                matches = false;
                break;
            }
        }
        if matches {
            return Ok(Some(method.as_ref()));
        }
    }
    Ok(None)
}

fn getter_field<'m>(getter: Option<&'m MethodDefinition>, owner: &TypeName) -> Option<&'m FieldRef> {
    getter?.body.as_ref()?.instructions.iter().find_map(|instruction| match instruction {
        Instruction::Ldfld(field) if field.declaring.full_name() == owner.full_name() => Some(field),
        _ => None,
    })
}

fn enum_name(enum_type: &TypeDefinition, value: i128) -> Option<String> {
    enum_type
        .fields
        .iter()
        .find(|field| {
            field
                .constant
                .as_ref()
                .and_then(|constant| constant.as_integer())
                == Some(value)
        })
        .map(|field| field.name.clone())
}

/// Greedy decomposition of a `[Flags]` value, walking the enum fields from last to first.
fn flags_enum_names(enum_type: &TypeDefinition, value: i128) -> String {
    let mut remaining = value;
    let mut names = Vec::new();
    for field in enum_type.fields.iter().rev() {
        let Some(flag) = field.constant.as_ref().and_then(|c| c.as_integer()) else {
            continue;
        };
        if flag == 0 {
            continue;
        }
        if remaining & flag == flag {
            names.push(field.name.as_str());
            remaining -= flag;
        }
    }
    names.join(", ")
}

fn map_decimal_constant(
    _extractor: &Extractor<'_>,
    attribute: &CustomAttribute,
) -> Result<Option<Properties>> {
    let args = &attribute.value.fixed_args;
    if args.len() != 5 {
        return Err(malformed_error!(
            "DecimalConstantAttribute expects 5 arguments, found {}",
            args.len()
        ));
    }

    let mut parts = [0_i128; 5];
    for (part, arg) in parts.iter_mut().zip(args) {
        *part = arg.as_integer().ok_or_else(|| {
            malformed_error!("DecimalConstantAttribute argument is not an integer - {:?}", arg)
        })?;
    }
    let scale = u8::try_from(parts[0])
        .map_err(|_| malformed_error!("Invalid decimal scale - {}", parts[0]))?;

    // The int and uint overloads share the bit pattern of the 96-bit mantissa.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (hi, mid, lo) = (parts[2] as u32, parts[3] as u32, parts[4] as u32);
    let text = decimal_text(scale, parts[1] != 0, hi, mid, lo)?;
    Ok(Some(vec![("Value".to_string(), Some(text))]))
}

/// Format a decimal from its components, keeping the trailing zeros the scale implies.
pub(crate) fn decimal_text(scale: u8, negative: bool, hi: u32, mid: u32, lo: u32) -> Result<String> {
    if scale > 28 {
        return Err(malformed_error!("Decimal scale {} is out of range", scale));
    }

    let mantissa = (u128::from(hi) << 64) | (u128::from(mid) << 32) | u128::from(lo);
    let mut digits = mantissa.to_string();
    let scale = usize::from(scale);
    if scale > 0 {
        if digits.len() <= scale {
            digits = format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits);
        }
        digits.insert(digits.len() - scale, '.');
    }
    if negative && mantissa != 0 {
        digits.insert(0, '-');
    }
    Ok(digits)
}

fn map_bindable(_extractor: &Extractor<'_>, attribute: &CustomAttribute) -> Result<Option<Properties>> {
    let args = &attribute.value.fixed_args;
    if args.len() != 1 {
        return Ok(None);
    }

    let value = match attribute.constructor_params.first() {
        Some(TypeSignature::Boolean) => args[0].to_invariant_string(),
        Some(param)
            if param
                .type_name()
                .is_some_and(|name| name.is("System.ComponentModel", "BindableSupport")) =>
        {
            match args[0].as_integer() {
                Some(0) => Some("False".to_string()),
                Some(1) => Some("True".to_string()),
                _ => return Ok(None),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(vec![("Bindable".to_string(), value)]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::ExtractorConfig,
        metadata::{
            customattributes::CustomAttributeNamedArgument,
            definitions::{
                AssemblyDefinition, Constant, FieldDefinition, MethodBody, ParameterDefinition,
                PropertyDefinition,
            },
            flags::TypeAttributes,
            resolver::{AssemblySet, TypeResolver},
        },
    };

    fn field_ref(owner: &TypeName, name: &str) -> FieldRef {
        FieldRef {
            declaring: owner.clone(),
            name: name.into(),
        }
    }

    /// `class DescAttribute { DescAttribute(string text, Level level) { _text = text; _level = level; } }`
    fn desc_attribute() -> TypeDefinition {
        let owner = TypeName::new("N", "DescAttribute");
        let ctor = MethodDefinition {
            name: ".ctor".into(),
            flags: 0x0006 | 0x0800 | 0x1000,
            params: vec![
                ParameterDefinition::new("text", 0, TypeSignature::String),
                ParameterDefinition::new("level", 1, TypeSignature::value_type("N", "Level")),
            ],
            body: Some(MethodBody {
                instructions: vec![
                    Instruction::Ldarg(0),
                    Instruction::Other("call".into()),
                    Instruction::Ldarg(0),
                    Instruction::Ldarg(1),
                    Instruction::Stfld(field_ref(&owner, "_text")),
                    Instruction::Ldarg(0),
                    Instruction::Ldarg(2),
                    Instruction::Stfld(field_ref(&owner, "_level")),
                    Instruction::Other("ret".into()),
                ],
            }),
            ..Default::default()
        };
        let getter = |field: &str| {
            Some(Arc::new(MethodDefinition {
                name: format!("get_{field}"),
                flags: 0x0006 | 0x0800,
                body: Some(MethodBody {
                    instructions: vec![
                        Instruction::Ldarg(0),
                        Instruction::Ldfld(field_ref(&owner, field)),
                    ],
                }),
                ..Default::default()
            }))
        };
        TypeDefinition {
            namespace: "N".into(),
            name: "DescAttribute".into(),
            flags: TypeAttributes::PUBLIC,
            base_type: Some(TypeSignature::class("System", "Attribute")),
            methods: vec![Arc::new(ctor)],
            properties: vec![
                PropertyDefinition {
                    name: "Text".into(),
                    getter: getter("_text"),
                    ..Default::default()
                },
                PropertyDefinition {
                    name: "Level".into(),
                    getter: getter("_level"),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn enum_type(name: &str, flags: bool, values: &[(&str, i32)]) -> TypeDefinition {
        let mut fields = vec![FieldDefinition {
            name: "value__".into(),
            flags: 0x0006 | 0x0200 | 0x0400,
            field_type: TypeSignature::I4,
            ..Default::default()
        }];
        fields.extend(values.iter().map(|(field, value)| FieldDefinition {
            name: (*field).into(),
            flags: 0x0006 | 0x0010 | 0x0040,
            field_type: TypeSignature::value_type("N", name),
            constant: Some(Constant::I4(*value)),
            ..Default::default()
        }));
        TypeDefinition {
            namespace: "N".into(),
            name: name.into(),
            flags: TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            base_type: Some(TypeSignature::class("System", "Enum")),
            fields,
            custom_attributes: if flags {
                vec![CustomAttribute::new(TypeName::new("System", "FlagsAttribute"))]
            } else {
                vec![]
            },
            ..Default::default()
        }
    }

    fn resolver() -> AssemblySet {
        let assembly = AssemblyDefinition {
            name: "N".into(),
            types: vec![
                Arc::new(desc_attribute()),
                Arc::new(enum_type("Level", false, &[("Low", 0), ("High", 1)])),
                Arc::new(enum_type(
                    "Access",
                    true,
                    &[("None", 0), ("Read", 1), ("Write", 2), ("ReadWrite", 3)],
                )),
                Arc::new(TypeDefinition {
                    namespace: "N".into(),
                    name: "HiddenAttribute".into(),
                    flags: TypeAttributes::NOT_PUBLIC,
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };
        AssemblySet::from_assemblies([&assembly])
    }

    fn record(materialized: Materialized) -> AttributeRecord {
        match materialized {
            Materialized::Record(record) => record,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn constructor_arguments_through_il() {
        let set = resolver();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let attribute = CustomAttribute::new(TypeName::new("N", "DescAttribute"))
            .with_fixed(TypeSignature::String, CustomAttributeArgument::String("hello".into()))
            .with_fixed(
                TypeSignature::value_type("N", "Level"),
                CustomAttributeArgument::I4(1),
            );
        let record = record(extractor.materialize(&attribute).unwrap());
        assert_eq!(record.name, "N.DescAttribute");
        assert_eq!(record.property("Text"), Some(Some("hello")));
        assert_eq!(record.property("Level"), Some(Some("High")));
    }

    #[test]
    fn named_arguments_come_first_and_win() {
        let set = resolver();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let mut attribute = CustomAttribute::new(TypeName::new("N", "DescAttribute"))
            .with_fixed(TypeSignature::String, CustomAttributeArgument::String("ctor".into()))
            .with_fixed(
                TypeSignature::value_type("N", "Level"),
                CustomAttributeArgument::I4(0),
            )
            .with_property("Text", CustomAttributeArgument::String("named".into()));
        attribute.value.named_args.push(CustomAttributeNamedArgument {
            is_field: true,
            name: "_hidden".into(),
            value: CustomAttributeArgument::I4(3),
        });
        let record = record(extractor.materialize(&attribute).unwrap());
        assert_eq!(record.properties[0], ("Text".to_string(), Some("named".to_string())));
        assert_eq!(record.property("Level"), Some(Some("Low")));
        assert_eq!(record.property("_hidden"), None);
    }

    #[test]
    fn flags_enums_decompose_greedily() {
        let set = resolver();
        let access = set.resolve(&TypeName::new("N", "Access")).unwrap();
        assert_eq!(flags_enum_names(&access, 3), "ReadWrite");
        assert_eq!(flags_enum_names(&access, 2), "Write");
        assert_eq!(flags_enum_names(&access, 0), "");

        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);
        let value = CustomAttributeArgument::Enum(
            TypeName::new("N", "Access"),
            Box::new(CustomAttributeArgument::I4(1)),
        );
        assert_eq!(extractor.argument_value(&value, None).unwrap(), Some("Read".into()));

        let unknown = CustomAttributeArgument::Enum(
            TypeName::new("N", "Level"),
            Box::new(CustomAttributeArgument::I4(7)),
        );
        assert_eq!(extractor.argument_value(&unknown, None).unwrap(), Some("7".into()));
    }

    #[test]
    fn skipped_and_todo_attributes() {
        let set = resolver();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let hidden = CustomAttribute::new(TypeName::new("N", "HiddenAttribute"));
        assert_eq!(extractor.materialize(&hidden).unwrap(), Materialized::Skipped);

        let generated = CustomAttribute::new(TypeName::new(
            "System.Runtime.CompilerServices",
            "CompilerGeneratedAttribute",
        ));
        assert_eq!(extractor.materialize(&generated).unwrap(), Materialized::Skipped);

        let todo = CustomAttribute::new(TypeName::new("System", "MonoTODOAttribute"))
            .with_fixed(TypeSignature::String, CustomAttributeArgument::String("later".into()));
        assert_eq!(
            extractor.materialize(&todo).unwrap(),
            Materialized::Todo {
                name: "System.MonoTODOAttribute".into(),
                comment: Some("later".into()),
            }
        );

        let records = extractor.attribute_records(&[todo, hidden]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].property(TODO_COMMENT_PROPERTY), Some(Some("later")));
    }

    #[test]
    fn unresolved_attributes_have_no_properties() {
        let set = resolver();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let attribute = CustomAttribute::new(TypeName::new("Ext", "ThingAttribute"))
            .with_property("Flag", CustomAttributeArgument::Bool(true));
        let record = record(extractor.materialize(&attribute).unwrap());
        assert_eq!(record.name, "Ext.ThingAttribute");
        assert!(record.properties.is_empty());
    }

    #[test]
    fn decimal_constants() {
        assert_eq!(decimal_text(2, false, 0, 0, 100).unwrap(), "1.00");
        assert_eq!(decimal_text(3, true, 0, 0, 5).unwrap(), "-0.005");
        assert_eq!(decimal_text(0, false, 0, 1, 0).unwrap(), "4294967296");
        assert_eq!(decimal_text(1, true, 0, 0, 0).unwrap(), "0.0");
        assert!(decimal_text(29, false, 0, 0, 1).is_err());
    }

    #[test]
    fn bindable_strategy() {
        let set = resolver();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let plain = CustomAttribute::new(TypeName::new("System.ComponentModel", "BindableAttribute"))
            .with_fixed(TypeSignature::Boolean, CustomAttributeArgument::Bool(true));
        assert_eq!(
            map_bindable(&extractor, &plain).unwrap(),
            Some(vec![("Bindable".to_string(), Some("True".to_string()))])
        );

        let support = TypeSignature::value_type("System.ComponentModel", "BindableSupport");
        let no = CustomAttribute::new(TypeName::new("System.ComponentModel", "BindableAttribute"))
            .with_fixed(support.clone(), CustomAttributeArgument::I4(0));
        assert_eq!(
            map_bindable(&extractor, &no).unwrap(),
            Some(vec![("Bindable".to_string(), Some("False".to_string()))])
        );

        let default = CustomAttribute::new(TypeName::new("System.ComponentModel", "BindableAttribute"))
            .with_fixed(support, CustomAttributeArgument::I4(2));
        assert_eq!(map_bindable(&extractor, &default).unwrap(), None);
    }

    #[test]
    fn guid_values_are_uppercased() {
        let guid_type = TypeDefinition {
            namespace: "System.Runtime.InteropServices".into(),
            name: "GuidAttribute".into(),
            flags: TypeAttributes::PUBLIC,
            ..Default::default()
        };
        let assembly = AssemblyDefinition {
            types: vec![Arc::new(guid_type)],
            ..Default::default()
        };
        let set = AssemblySet::from_assemblies([&assembly]);
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let attribute = CustomAttribute::new(TypeName::new("System.Runtime.InteropServices", "GuidAttribute"))
            .with_property("Value", CustomAttributeArgument::String("ab-cd".into()));
        let record = record(extractor.materialize(&attribute).unwrap());
        assert_eq!(record.property("Value"), Some(Some("AB-CD")));
    }
}
