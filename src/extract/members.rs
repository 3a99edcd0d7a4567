//! Extraction of fields, constructors, properties, events and methods.
//!
//! Only members reachable from outside the assembly are documented: public, protected and
//! protected-internal ones. Accessor methods appear under their property or event, never as
//! methods of their own; operator methods are the one kind of special-name method that is
//! listed. With [`crate::ExtractorConfig::full_api_set`] inherited properties and methods
//! are merged into each type, so a type's tree describes its whole callable surface.

use std::cmp::Ordering;

use crate::{
    extract::Extractor,
    metadata::{
        definitions::{
            Constant, EventDefinition, FieldDefinition, GenericParameter, MethodDefinition,
            ParameterDefinition, PropertyDefinition, TypeDefinition, TypeDefinitionRc,
        },
        flags::{FieldAttributes, MethodAccessFlags},
        resolver::{base_types, MAX_HIERARCHY_DEPTH},
        signatures::TypeSignature,
    },
    tree::{
        Direction, EventDetail, FieldDetail, GenericParameterRecord, MemberDetail, MemberRecord,
        MethodDetail, ParameterRecord, PropertyDetail, SignatureFlags,
    },
    typename::{normalize, parameter_signature},
    Error, Result,
};

const EXTENSION_ATTRIBUTE: &str = "System.Runtime.CompilerServices.ExtensionAttribute";

/// `true` for methods callable from outside the assembly: public, protected or protected
/// internal.
#[must_use]
pub fn is_documentable(method: &MethodDefinition) -> bool {
    let access = method.access();
    access == MethodAccessFlags::PUBLIC
        || access == MethodAccessFlags::FAMILY
        || access == MethodAccessFlags::FAM_OR_ASSEM
}

fn is_documentable_field(field: &FieldDefinition) -> bool {
    matches!(
        field.access(),
        FieldAttributes::PUBLIC | FieldAttributes::FAMILY | FieldAttributes::FAM_OR_ASSEM
    )
}

/// Index parameters of a property, taken from its accessors.
fn property_parameters(property: &PropertyDefinition) -> &[ParameterDefinition] {
    if let Some(getter) = &property.getter {
        return &getter.params;
    }
    match &property.setter {
        Some(setter) if !setter.params.is_empty() => &setter.params[..setter.params.len() - 1],
        _ => &[],
    }
}

/// A method picked for output, together with what its ordering needs.
struct MethodCandidate<'t> {
    name: String,
    method: &'t MethodDefinition,
    owner: &'t TypeDefinitionRc,
    signature: String,
    return_key: String,
}

impl<'t> MethodCandidate<'t> {
    fn new(name: String, method: &'t MethodDefinition, owner: &'t TypeDefinitionRc) -> Result<Self> {
        Ok(MethodCandidate {
            name,
            method,
            owner,
            signature: parameter_signature(&method.params)?,
            return_key: normalize(&method.return_type)?,
        })
    }
}

fn compare_parameter_lists(a: (usize, &str), b: (usize, &str)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1))
}

/// Ordering of methods: name, parameters, generic arity, then return type (operators can
/// differ only by return type).
fn compare_methods(a: &MethodCandidate<'_>, b: &MethodCandidate<'_>) -> Ordering {
    let by_name = a.name.cmp(&b.name);
    if by_name != Ordering::Equal {
        return by_name;
    }
    match (a.method.params.is_empty(), b.method.params.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let by_params = compare_parameter_lists(
        (a.method.params.len(), a.signature.as_str()),
        (b.method.params.len(), b.signature.as_str()),
    );
    if by_params != Ordering::Equal {
        return by_params;
    }
    let (a_generic, b_generic) = (a.method.generic_params.len(), b.method.generic_params.len());
    match (a_generic > 0, b_generic > 0) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    a_generic
        .cmp(&b_generic)
        .then_with(|| a.return_key.cmp(&b.return_key))
}

fn same_short_parameters(a: &MethodDefinition, b: &MethodDefinition) -> bool {
    a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(x, y)| x.param_type.short_name() == y.param_type.short_name())
}

fn strip_arity(name: &str) -> &str {
    match name.find('`') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

impl Extractor<'_> {
    /// The type followed by the base types whose members are merged into it.
    ///
    /// Without the full-API switch this is just the type. Otherwise the base chain is walked
    /// until an interface, an enum, a `System.Object` base or an unresolvable base.
    fn api_hierarchy(&self, ty: &TypeDefinitionRc) -> Result<Vec<TypeDefinitionRc>> {
        let mut chain = vec![ty.clone()];
        if !self.config.full_api_set {
            return Ok(chain);
        }

        let mut current = ty.clone();
        loop {
            if current.is_interface() || current.is_enum() {
                break;
            }
            let Some(base) = current.base_type.as_ref() else {
                break;
            };
            if base.type_name().is_some_and(|name| name.is("System", "Object")) {
                break;
            }
            let Some(resolved) = self.resolver.resolve_signature(base) else {
                log::debug!(
                    "could not resolve base type of {}, inherited members are incomplete",
                    current.full_name()
                );
                break;
            };
            if chain.len() > MAX_HIERARCHY_DEPTH {
                return Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH));
            }
            chain.push(resolved.clone());
            current = resolved;
        }
        Ok(chain)
    }

    /// Fields of `ty`, ordered by name.
    ///
    /// In ABI mode static fields are skipped and every field that takes part in
    /// serialization is listed regardless of its access.
    ///
    /// # Errors
    /// Propagates type normalization and attribute materialization failures.
    pub fn fields(&self, ty: &TypeDefinition) -> Result<Vec<MemberRecord>> {
        let abi = self.config.abi_mode;
        let mut records = Vec::new();
        for field in &ty.fields {
            if field.is_special_name() || (abi && field.is_static()) {
                continue;
            }
            let include = if abi && !field.is_not_serialized() {
                true
            } else {
                is_documentable_field(field)
            };
            if !include {
                continue;
            }

            let value = if field.is_literal() {
                match &field.constant {
                    Some(Constant::Null) => Some(String::new()),
                    Some(constant) => constant.to_invariant_string(),
                    None => None,
                }
            } else {
                None
            };
            records.push(MemberRecord {
                name: field.name.clone(),
                attrib: field.flags,
                attributes: self.attribute_records(&field.custom_attributes)?,
                detail: MemberDetail::Field(FieldDetail {
                    field_type: normalize(&field.field_type)?,
                    value,
                }),
            });
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// Documentable instance and type constructors of `ty`, in method order.
    ///
    /// # Errors
    /// Propagates type normalization and attribute materialization failures.
    pub fn constructors(&self, ty: &TypeDefinitionRc) -> Result<Vec<MemberRecord>> {
        let mut candidates = Vec::new();
        for method in &ty.methods {
            if method.is_constructor() && is_documentable(method) {
                candidates.push(MethodCandidate::new(method.name.clone(), method, ty)?);
            }
        }
        candidates.sort_by(compare_methods);
        candidates
            .iter()
            .map(|candidate| self.method_record(candidate, true))
            .collect()
    }

    /// Methods of `ty` (and, for the full API set, of its bases), in method order.
    ///
    /// A finalizer declared by the type itself is listed as `~Name`.
    ///
    /// # Errors
    /// Propagates type normalization, attribute materialization and hierarchy failures.
    pub fn methods(&self, ty: &TypeDefinitionRc) -> Result<Vec<MemberRecord>> {
        let hierarchy = self.api_hierarchy(ty)?;
        let mut candidates: Vec<MethodCandidate<'_>> = Vec::new();

        for (depth, owner) in hierarchy.iter().enumerate() {
            for method in &owner.methods {
                if method.is_special_name() && !method.name.starts_with("op_") {
                    continue;
                }
                if !is_documentable(method) {
                    continue;
                }

                let name = if depth == 0 && method.is_finalizer() {
                    format!("~{}", strip_arity(&ty.name))
                } else {
                    method.name.clone()
                };

                if depth > 0
                    && candidates.iter().any(|known| {
                        !std::sync::Arc::ptr_eq(known.owner, owner)
                            && known.name == name
                            && same_short_parameters(known.method, method)
                    })
                {
                    continue;
                }
                candidates.push(MethodCandidate::new(name, method, owner)?);
            }
        }

        candidates.sort_by(compare_methods);
        candidates
            .iter()
            .map(|candidate| self.method_record(candidate, false))
            .collect()
    }

    /// Properties with at least one documentable accessor, in property order.
    ///
    /// For the full API set, inherited properties are merged in unless a property of the
    /// same name is already listed.
    ///
    /// # Errors
    /// Propagates type normalization, attribute materialization and hierarchy failures.
    pub fn properties(&self, ty: &TypeDefinitionRc) -> Result<Vec<MemberRecord>> {
        let hierarchy = self.api_hierarchy(ty)?;
        let mut picked: Vec<(&PropertyDefinition, &TypeDefinitionRc, String)> = Vec::new();

        for (depth, owner) in hierarchy.iter().enumerate() {
            for property in &owner.properties {
                let has_getter = property.getter.as_deref().is_some_and(is_documentable);
                let has_setter = property.setter.as_deref().is_some_and(is_documentable);
                if !has_getter && !has_setter {
                    continue;
                }
                if depth > 0 && picked.iter().any(|(known, _, _)| known.name == property.name) {
                    continue;
                }
                picked.push((property, owner, parameter_signature(property_parameters(property))?));
            }
        }

        picked.sort_by(|(a, _, a_sig), (b, _, b_sig)| {
            a.name.cmp(&b.name).then_with(|| {
                let (a_params, b_params) = (property_parameters(a), property_parameters(b));
                match (a_params.is_empty(), b_params.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => compare_parameter_lists(
                        (a_params.len(), a_sig.as_str()),
                        (b_params.len(), b_sig.as_str()),
                    ),
                }
            })
        });

        picked
            .into_iter()
            .map(|(property, owner, _)| self.property_record(property, owner))
            .collect()
    }

    fn property_record(
        &self,
        property: &PropertyDefinition,
        owner: &TypeDefinitionRc,
    ) -> Result<MemberRecord> {
        let getter = property.getter.as_deref().filter(|m| is_documentable(m));
        let setter = property.setter.as_deref().filter(|m| is_documentable(m));

        // A getter always decides the index parameters; a lone setter only when it takes
        // more than the value.
        let has_parameters = getter.is_some() || setter.is_some_and(|s| s.params.len() > 1);
        let accessors: Vec<&MethodDefinition> = getter.into_iter().chain(setter).collect();
        let params = match accessors.first() {
            Some(first) if has_parameters => {
                Some(parameter_signature(&first.params)?).filter(|p| !p.is_empty())
            }
            _ => None,
        };

        let mut accessor_records = Vec::with_capacity(accessors.len());
        for accessor in accessors {
            let candidate = MethodCandidate::new(accessor.name.clone(), accessor, owner)?;
            accessor_records.push(self.method_record(&candidate, false)?);
        }

        Ok(MemberRecord {
            name: property.name.clone(),
            attrib: property.flags,
            attributes: self.attribute_records(&property.custom_attributes)?,
            detail: MemberDetail::Property(PropertyDetail {
                property_type: normalize(&property.property_type)?,
                params,
                accessors: accessor_records,
            }),
        })
    }

    /// Events whose add accessor is documentable, ordered by name.
    ///
    /// # Errors
    /// Propagates type normalization and attribute materialization failures.
    pub fn events(&self, ty: &TypeDefinitionRc) -> Result<Vec<MemberRecord>> {
        let mut records = Vec::new();
        for event in &ty.events {
            if !event.add_method.as_deref().is_some_and(is_documentable) {
                continue;
            }
            records.push(self.event_record(event, ty)?);
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    fn event_record(&self, event: &EventDefinition, owner: &TypeDefinitionRc) -> Result<MemberRecord> {
        let mut accessors = Vec::new();
        for accessor in [&event.add_method, &event.remove_method].into_iter().flatten() {
            if is_documentable(accessor) {
                let candidate = MethodCandidate::new(accessor.name.clone(), accessor, owner)?;
                accessors.push(self.method_record(&candidate, false)?);
            }
        }

        Ok(MemberRecord {
            name: event.name.clone(),
            attrib: event.flags,
            attributes: self.attribute_records(&event.custom_attributes)?,
            detail: MemberDetail::Event(EventDetail {
                event_type: normalize(&event.event_type)?,
                accessors,
            }),
        })
    }

    fn method_record(&self, candidate: &MethodCandidate<'_>, constructor: bool) -> Result<MemberRecord> {
        let method = candidate.method;
        let return_type = if candidate.return_key != "System.Void" || !constructor {
            Some(candidate.return_key.clone())
        } else {
            None
        };

        let detail = MethodDetail {
            return_type,
            parameters: self.parameters(method)?,
            flags: SignatureFlags {
                is_abstract: method.is_abstract(),
                is_virtual: method.is_virtual(),
                is_static: method.is_static(),
                is_final: method.is_final() && method.is_virtual() && method.is_reuse_slot(),
            },
            is_override: self.is_override(method, candidate.owner)?,
            generic_parameters: self.generic_parameters(&method.generic_params)?,
        };

        Ok(MemberRecord {
            name: format!("{}({})", candidate.name, candidate.signature),
            attrib: method.flags,
            attributes: self.attribute_records(&method.custom_attributes)?,
            detail: if constructor {
                MemberDetail::Constructor(detail)
            } else {
                MemberDetail::Method(detail)
            },
        })
    }

    /// `true` when `method` reuses the slot of a virtual method with the same signature
    /// somewhere up the base-type chain of `owner`.
    fn is_override(&self, method: &MethodDefinition, owner: &TypeDefinitionRc) -> Result<bool> {
        if !method.is_virtual() || !method.is_reuse_slot() {
            return Ok(false);
        }

        let signature = parameter_signature(&method.params)?;
        for base in base_types(self.resolver, owner)? {
            for candidate in base.methods_named(&method.name) {
                if candidate.is_virtual()
                    && candidate.params.len() == method.params.len()
                    && parameter_signature(&candidate.params)? == signature
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn parameters(&self, method: &MethodDefinition) -> Result<Vec<ParameterRecord>> {
        let is_extension = method
            .custom_attributes
            .iter()
            .any(|attribute| attribute.full_name() == EXTENSION_ATTRIBUTE);

        let mut records = Vec::with_capacity(method.params.len());
        for (index, param) in method.params.iter().enumerate() {
            let (direction, param_type) = match &param.param_type {
                TypeSignature::ByRef(element) => {
                    let direction = if param.is_out() {
                        Direction::Out
                    } else {
                        Direction::Ref
                    };
                    (direction, element.as_ref())
                }
                other if index == 0 && is_extension => (Direction::This, other),
                other => (Direction::In, other),
            };

            let optional = param.is_optional();
            let default_value = match (&param.constant, optional) {
                (Some(Constant::Null), true) => Some("NULL".to_string()),
                (Some(constant), true) => constant.to_invariant_string(),
                _ => None,
            };

            records.push(ParameterRecord {
                name: param.name.clone(),
                position: u32::try_from(index)
                    .map_err(|_| malformed_error!("Too many parameters in {}", method.name))?,
                attrib: param.flags,
                param_type: normalize(param_type)?,
                direction,
                optional,
                default_value,
                attributes: self.attribute_records(&param.custom_attributes)?,
            });
        }
        Ok(records)
    }

    /// Records for the generic parameters of a type or method.
    ///
    /// # Errors
    /// Propagates type normalization and attribute materialization failures.
    pub fn generic_parameters(
        &self,
        params: &[GenericParameter],
    ) -> Result<Vec<GenericParameterRecord>> {
        let mut records = Vec::with_capacity(params.len());
        for param in params {
            let mut constraints = Vec::with_capacity(param.constraints.len());
            for constraint in &param.constraints {
                constraints.push(normalize(constraint)?);
            }
            records.push(GenericParameterRecord {
                name: param.name.clone(),
                attributes: param.flags,
                constraints,
                custom_attributes: self.attribute_records(&param.custom_attributes)?,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::ExtractorConfig,
        metadata::{
            customattributes::CustomAttribute,
            definitions::AssemblyDefinition,
            flags::{ParamAttributes, TypeAttributes},
            resolver::AssemblySet,
            signatures::TypeName,
        },
    };

    const PUBLIC: u32 = 0x0006;
    const FAMILY: u32 = 0x0004;
    const PRIVATE: u32 = 0x0001;
    const VIRTUAL: u32 = 0x0040;
    const NEW_SLOT: u32 = 0x0100;
    const SPECIAL: u32 = 0x0800;
    const STATIC: u32 = 0x0010;

    fn method(name: &str, flags: u32, params: Vec<ParameterDefinition>) -> Arc<MethodDefinition> {
        Arc::new(MethodDefinition {
            name: name.into(),
            flags,
            params,
            ..Default::default()
        })
    }

    fn class(name: &str, base: &str, methods: Vec<Arc<MethodDefinition>>) -> TypeDefinitionRc {
        Arc::new(TypeDefinition {
            namespace: "N".into(),
            name: name.into(),
            flags: TypeAttributes::PUBLIC,
            base_type: Some(if base == "Object" {
                TypeSignature::Object
            } else {
                TypeSignature::class("N", base)
            }),
            methods,
            ..Default::default()
        })
    }

    fn extract_names(records: &[MemberRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn methods_are_filtered_and_ordered() {
        let int = |name: &str, pos| ParameterDefinition::new(name, pos, TypeSignature::I4);
        let ty = class(
            "Widget",
            "Object",
            vec![
                method("Run", PUBLIC, vec![int("a", 0), int("b", 1)]),
                method("Run", PUBLIC, vec![int("a", 0)]),
                method("Run", PUBLIC, vec![]),
                method("Hidden", PRIVATE, vec![]),
                method("get_Size", PUBLIC | SPECIAL, vec![]),
                method("op_Addition", PUBLIC | SPECIAL | STATIC, vec![]),
                method("Finalize", FAMILY | VIRTUAL, vec![]),
            ],
        );
        let set = AssemblySet::new();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let methods = extractor.methods(&ty).unwrap();
        assert_eq!(
            extract_names(&methods),
            vec![
                "Run()",
                "Run(System.Int32)",
                "Run(System.Int32, System.Int32)",
                "op_Addition()",
                "~Widget()",
            ]
        );
        let finalizer = methods[4].method().unwrap();
        assert!(finalizer.flags.is_virtual);
        assert_eq!(finalizer.return_type.as_deref(), Some("System.Void"));
    }

    #[test]
    fn overrides_and_inherited_methods() {
        let base = class(
            "Base",
            "Object",
            vec![
                method("Draw", PUBLIC | VIRTUAL | NEW_SLOT, vec![]),
                method("Reset", PUBLIC, vec![]),
            ],
        );
        let derived = class(
            "Derived",
            "Base",
            vec![method("Draw", PUBLIC | VIRTUAL, vec![])],
        );
        let assembly = AssemblyDefinition {
            types: vec![base, derived.clone()],
            ..Default::default()
        };
        let set = AssemblySet::from_assemblies([&assembly]);

        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);
        let methods = extractor.methods(&derived).unwrap();
        assert_eq!(extract_names(&methods), vec!["Draw()"]);
        assert!(methods[0].method().unwrap().is_override);

        let config = ExtractorConfig {
            full_api_set: true,
            ..Default::default()
        };
        let extractor = Extractor::new(&config, &set);
        let methods = extractor.methods(&derived).unwrap();
        assert_eq!(extract_names(&methods), vec!["Draw()", "Reset()"]);
    }

    #[test]
    fn parameters_and_extension_methods() {
        let mut target = ParameterDefinition::new(
            "result",
            1,
            TypeSignature::ByRef(Box::new(TypeSignature::I4)),
        );
        target.flags = ParamAttributes::OUT;
        let mut fallback = ParameterDefinition::new("fallback", 2, TypeSignature::String);
        fallback.flags = ParamAttributes::OPTIONAL | ParamAttributes::HAS_DEFAULT;
        fallback.constant = Some(Constant::Null);

        let parse = MethodDefinition {
            name: "TryParse".into(),
            flags: PUBLIC | STATIC,
            return_type: TypeSignature::Boolean,
            params: vec![
                ParameterDefinition::new("text", 0, TypeSignature::String),
                target,
                fallback,
            ],
            custom_attributes: vec![CustomAttribute::new(TypeName::new(
                "System.Runtime.CompilerServices",
                "ExtensionAttribute",
            ))],
            ..Default::default()
        };
        let ty = class("Parsers", "Object", vec![Arc::new(parse)]);
        let set = AssemblySet::new();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let methods = extractor.methods(&ty).unwrap();
        assert_eq!(
            methods[0].name,
            "TryParse(System.String, out System.Int32&, System.String)"
        );
        let params = &methods[0].method().unwrap().parameters;
        assert_eq!(params[0].direction, Direction::This);
        assert_eq!(params[1].direction, Direction::Out);
        assert_eq!(params[1].param_type, "System.Int32");
        assert!(params[2].optional);
        assert_eq!(params[2].default_value.as_deref(), Some("NULL"));
    }

    #[test]
    fn properties_and_indexers() {
        let getter = method("get_Item", PUBLIC | SPECIAL, vec![ParameterDefinition::new(
            "index",
            0,
            TypeSignature::I4,
        )]);
        let private_setter = method("set_Name", PRIVATE | SPECIAL, vec![ParameterDefinition::new(
            "value",
            0,
            TypeSignature::String,
        )]);
        let name_getter = method("get_Name", PUBLIC | SPECIAL, vec![]);
        let ty = Arc::new(TypeDefinition {
            namespace: "N".into(),
            name: "Bag".into(),
            flags: TypeAttributes::PUBLIC,
            properties: vec![
                PropertyDefinition {
                    name: "Name".into(),
                    property_type: TypeSignature::String,
                    getter: Some(name_getter),
                    setter: Some(private_setter),
                    ..Default::default()
                },
                PropertyDefinition {
                    name: "Item".into(),
                    property_type: TypeSignature::Object,
                    getter: Some(getter),
                    ..Default::default()
                },
                PropertyDefinition {
                    name: "Secret".into(),
                    property_type: TypeSignature::Object,
                    setter: Some(method("set_Secret", PRIVATE | SPECIAL, vec![])),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        let set = AssemblySet::new();
        let config = ExtractorConfig::default();
        let extractor = Extractor::new(&config, &set);

        let properties = extractor.properties(&ty).unwrap();
        assert_eq!(extract_names(&properties), vec!["Item", "Name"]);
        let MemberDetail::Property(item) = &properties[0].detail else {
            panic!("expected a property");
        };
        assert_eq!(item.params.as_deref(), Some("System.Int32"));
        assert_eq!(item.property_type, "System.Object");
        let MemberDetail::Property(name) = &properties[1].detail else {
            panic!("expected a property");
        };
        assert_eq!(name.params, None);
        assert_eq!(name.accessors.len(), 1);
        assert_eq!(name.accessors[0].name, "get_Name()");
    }

    #[test]
    fn abi_fields() {
        let field = |name: &str, flags: u32| FieldDefinition {
            name: name.into(),
            flags,
            field_type: TypeSignature::I4,
            ..Default::default()
        };
        let ty = TypeDefinition {
            namespace: "N".into(),
            name: "Point".into(),
            fields: vec![
                field("y", FieldAttributes::PRIVATE),
                field("x", FieldAttributes::PRIVATE),
                field("cache", FieldAttributes::PRIVATE | FieldAttributes::NOT_SERIALIZED),
                field("Origin", FieldAttributes::PUBLIC | FieldAttributes::STATIC),
                FieldDefinition {
                    constant: Some(Constant::I4(3)),
                    ..field("Max", FieldAttributes::PUBLIC | FieldAttributes::STATIC | FieldAttributes::LITERAL)
                },
            ],
            ..Default::default()
        };
        let set = AssemblySet::new();

        let config = ExtractorConfig::default();
        let fields = Extractor::new(&config, &set).fields(&ty).unwrap();
        assert_eq!(extract_names(&fields), vec!["Max", "Origin"]);
        let MemberDetail::Field(max) = &fields[0].detail else {
            panic!("expected a field");
        };
        assert_eq!(max.value.as_deref(), Some("3"));

        let config = ExtractorConfig::abi();
        let fields = Extractor::new(&config, &set).fields(&ty).unwrap();
        assert_eq!(extract_names(&fields), vec!["x", "y"]);
    }
}
