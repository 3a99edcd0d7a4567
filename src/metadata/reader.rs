//! Reading assembly definitions out of .NET PE files.
//!
//! [`load_assembly`] opens a file with `dotscope` and [`read_assembly`] converts an already
//! loaded [`CilObject`] into an [`AssemblyDefinition`].
//!
//! dotscope keeps references as metadata tokens: signatures name their types by
//! `TypeDef`/`TypeRef`/`TypeSpec` token, custom attributes by parent and constructor token.
//! The conversion resolves every token once into the name-based model of this crate, so
//! nothing downstream depends on table layout. Nesting comes from the `NestedClass` table,
//! which lists every nested type exactly once with its immediate enclosing type.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use apiscope::{
//!     extract::Extractor,
//!     metadata::{reader::load_assembly, resolver::AssemblySet},
//!     ExtractorConfig,
//! };
//! use std::path::Path;
//!
//! let assembly = load_assembly(Path::new("Lib.dll"))?;
//! let resolver = AssemblySet::from_assemblies([&assembly]);
//! let tree = Extractor::new(&ExtractorConfig::default(), &resolver).extract(&assembly)?;
//! println!("{} types", tree.type_count());
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::{Arc, OnceLock},
};

use dotscope::{
    disassembler::{self, Immediate, Operand},
    metadata::{
        customattributes::{
            parse_custom_attribute_blob, CustomAttributeArgument as CilArgument,
            CustomAttributeValue as CilAttributeValue,
        },
        method::{Method, MethodRef},
        signatures::{
            parse_type_spec_signature, SignatureMethod as CilMethodSignature, SignatureParameter,
            TypeSignature as CilSignature,
        },
        tables::{
            CustomAttributeRaw, GenericParamRc, MemberRefSignature, NestedClassRaw, ParamRc,
            TableId, TypeSpecRaw,
        },
        token::Token,
        typesystem::{CilPrimitive, CilPrimitiveData, CilTypeRc, CilTypeReference},
    },
    Blob, CilObject,
};

use crate::{
    metadata::{
        customattributes::{
            CustomAttribute, CustomAttributeArgument, CustomAttributeNamedArgument,
            CustomAttributeValue,
        },
        definitions::{
            AssemblyDefinition, Constant, EventDefinition, ExportedType, FieldDefinition, FieldRef,
            GenericParameter, Instruction, MethodBody, MethodDefinition, MethodDefinitionRc,
            ParameterDefinition, PropertyDefinition, TypeDefinition, TypeDefinitionRc,
        },
        resolver::MAX_HIERARCHY_DEPTH,
        signatures::{ArrayDimensions, SignatureArray, SignatureMethod, TypeName, TypeSignature},
    },
    Error, Result,
};

const TABLE_TYPEREF: u8 = 0x01;
const TABLE_TYPEDEF: u8 = 0x02;
const TABLE_FIELD: u8 = 0x04;
const TABLE_METHODDEF: u8 = 0x06;
const TABLE_MEMBERREF: u8 = 0x0A;
const TABLE_TYPESPEC: u8 = 0x1B;

/// Load the assembly at `path` and convert it.
///
/// # Errors
/// Returns [`Error::Load`] when the file is not a .NET assembly, and the errors of
/// [`read_assembly`].
pub fn load_assembly(path: &Path) -> Result<AssemblyDefinition> {
    log::debug!("loading {}", path.display());
    let object = CilObject::from_file(path)?;
    read_assembly(&object)
}

/// Convert a loaded [`CilObject`] into an [`AssemblyDefinition`].
///
/// Custom attributes whose blob cannot be decoded are kept without arguments and logged.
///
/// # Errors
/// Returns [`Error::Malformed`] for tokens that do not resolve and signatures that use
/// element types which cannot appear in a member signature, and
/// [`Error::RecursionLimit`] for cyclic nesting.
pub fn read_assembly(object: &CilObject) -> Result<AssemblyDefinition> {
    Reader::new(object)?.assembly()
}

/// Declared names of the generic parameters in scope of a signature.
#[derive(Clone, Copy, Default)]
struct Generics<'g> {
    type_params: &'g [String],
    method_params: &'g [String],
}

struct Reader<'a> {
    object: &'a CilObject,
    assembly_name: String,
    types: BTreeMap<Token, CilTypeRc>,
    enclosing: HashMap<Token, Token>,
    method_owner: HashMap<Token, Token>,
    fields: HashMap<Token, FieldRef>,
    attributes: HashMap<Token, Vec<CustomAttribute>>,
    type_specs: OnceLock<HashMap<Token, u32>>,
}

impl<'a> Reader<'a> {
    fn new(object: &'a CilObject) -> Result<Self> {
        let registry = object.types();
        let types: BTreeMap<Token, CilTypeRc> = registry
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut reader = Reader {
            object,
            assembly_name: object
                .assembly()
                .map(|assembly| assembly.name.clone())
                .unwrap_or_default(),
            types,
            enclosing: nesting(object),
            method_owner: HashMap::new(),
            fields: HashMap::new(),
            attributes: HashMap::new(),
            type_specs: OnceLock::new(),
        };

        let mut method_owner = HashMap::new();
        for (token, ty) in reader.definitions() {
            for (_, method) in ty.methods.iter() {
                if let Some(method) = method.upgrade() {
                    method_owner.insert(method.token, token);
                }
            }
        }
        reader.method_owner = method_owner;

        let mut fields = HashMap::new();
        for (token, ty) in reader.definitions() {
            let declaring = reader.type_name(token, 0)?;
            for (_, field) in ty.fields.iter() {
                fields.insert(
                    field.token,
                    FieldRef {
                        declaring: declaring.clone(),
                        name: field.name.clone(),
                    },
                );
            }
        }
        reader.fields = fields;
        reader.attributes = reader.read_attributes();
        Ok(reader)
    }

    /// `TypeDef` rows of the manifest module, in token order.
    fn definitions(&self) -> impl Iterator<Item = (Token, &CilTypeRc)> + '_ {
        self.types
            .iter()
            .filter(|(token, _)| token.table() == TABLE_TYPEDEF)
            .map(|(token, ty)| (*token, ty))
    }

    fn assembly(&self) -> Result<AssemblyDefinition> {
        let mut types = Vec::new();
        for (token, ty) in self.definitions() {
            if !self.enclosing.contains_key(&token) {
                types.push(self.type_definition(token, ty, 0)?);
            }
        }

        let (version, custom_attributes) = match self.object.assembly() {
            Some(assembly) => (
                format!(
                    "{}.{}.{}.{}",
                    assembly.major_version,
                    assembly.minor_version,
                    assembly.build_number,
                    assembly.revision_number
                ),
                self.attributes_of(assembly.token),
            ),
            None => ("0.0.0.0".to_string(), Vec::new()),
        };

        log::debug!(
            "read {} with {} top-level types",
            self.assembly_name,
            types.len()
        );
        Ok(AssemblyDefinition {
            name: self.assembly_name.clone(),
            version,
            custom_attributes,
            types,
            exported_types: self.exported_types(),
        })
    }

    fn type_definition(&self, token: Token, ty: &CilTypeRc, depth: usize) -> Result<TypeDefinitionRc> {
        if depth > MAX_HIERARCHY_DEPTH {
            return Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH));
        }

        let name = self.type_name(token, 0)?;
        let generic_rows = sorted_generic_params(ty.generic_params.iter().map(|(_, p)| p.clone()));
        let type_params: Vec<String> = generic_rows.iter().map(|p| p.name.clone()).collect();
        let generics = Generics {
            type_params: &type_params,
            method_params: &[],
        };

        let mut methods = Vec::new();
        let mut by_token: HashMap<Token, MethodDefinitionRc> = HashMap::new();
        for (_, method) in ty.methods.iter() {
            let Some(method) = method.upgrade() else {
                continue;
            };
            let definition = Arc::new(self.method_definition(&method, generics)?);
            by_token.insert(method.token, definition.clone());
            methods.push(definition);
        }

        let mut fields = Vec::new();
        for (_, field) in ty.fields.iter() {
            fields.push(FieldDefinition {
                name: field.name.clone(),
                flags: field.flags,
                field_type: self.modified(
                    self.signature(&field.signature.base, generics)?,
                    &field.signature.modifiers,
                )?,
                constant: field.default.get().and_then(constant),
                custom_attributes: self.attributes_of(field.token),
            });
        }

        let mut properties = Vec::new();
        for (_, property) in ty.properties.iter() {
            properties.push(PropertyDefinition {
                name: property.name.clone(),
                flags: property.flags,
                property_type: self.modified(
                    self.signature(&property.signature.base, generics)?,
                    &property.signature.modifiers,
                )?,
                getter: accessor(&property.fn_getter, &by_token),
                setter: accessor(&property.fn_setter, &by_token),
                custom_attributes: self.attributes_of(property.token),
            });
        }

        let mut events = Vec::new();
        for (_, event) in ty.events.iter() {
            let event_type = match event.event_type.upgrade() {
                Some(delegate) => self.token_signature(delegate.token, generics)?,
                None => TypeSignature::Object,
            };
            events.push(EventDefinition {
                name: event.name.clone(),
                flags: event.flags,
                event_type,
                add_method: accessor(&event.fn_on_add, &by_token),
                remove_method: accessor(&event.fn_on_remove, &by_token),
                custom_attributes: self.attributes_of(event.token),
            });
        }

        let mut interfaces = Vec::new();
        for (_, interface) in ty.interfaces.iter() {
            if let Some(interface) = interface.upgrade() {
                interfaces.push(self.token_signature(interface.token, generics)?);
            }
        }

        let mut nested_types = Vec::new();
        for (nested_token, nested) in self.definitions() {
            if self.enclosing.get(&nested_token) == Some(&token) {
                nested_types.push(self.type_definition(nested_token, nested, depth + 1)?);
            }
        }

        let base_type = match ty.base() {
            Some(base) => Some(self.token_signature(base.token, generics)?),
            None => None,
        };

        Ok(Arc::new(TypeDefinition {
            namespace: name.namespace.clone(),
            name: name.name.clone(),
            flags: ty.flags,
            base_type,
            declaring_type: name.declaring.as_deref().cloned(),
            fields,
            methods,
            properties,
            events,
            interfaces,
            nested_types,
            generic_params: self.generic_params(&generic_rows, generics)?,
            custom_attributes: self.attributes_of(token),
            packing_size: ty.packing_size.get().copied(),
            class_size: ty.class_size.get().copied(),
            scope: Some(self.assembly_name.clone()),
        }))
    }

    fn method_definition(&self, method: &Method, outer: Generics<'_>) -> Result<MethodDefinition> {
        let generic_rows =
            sorted_generic_params(method.generic_params.iter().map(|(_, p)| p.clone()));
        let method_params: Vec<String> = generic_rows.iter().map(|p| p.name.clone()).collect();
        let generics = Generics {
            type_params: outer.type_params,
            method_params: &method_params,
        };

        let rows: HashMap<u32, ParamRc> = method
            .params
            .iter()
            .map(|(_, param)| (param.sequence, param.clone()))
            .collect();

        let mut params = Vec::with_capacity(method.signature.params.len());
        for (sequence, signature) in (1u32..).zip(&method.signature.params) {
            let row = rows.get(&sequence);
            params.push(ParameterDefinition {
                name: row.and_then(|row| row.name.clone()).unwrap_or_default(),
                position: sequence - 1,
                flags: row.map_or(0, |row| row.flags),
                param_type: self.parameter(signature, generics)?,
                constant: row.and_then(|row| row.default.get()).and_then(constant),
                custom_attributes: row
                    .map(|row| self.attributes_of(row.token))
                    .unwrap_or_default(),
            });
        }

        Ok(MethodDefinition {
            name: method.name.clone(),
            flags: method.flags_access.bits()
                | method.flags_vtable.bits()
                | method.flags_modifiers.bits(),
            return_type: self.parameter(&method.signature.return_type, generics)?,
            params,
            generic_params: self.generic_params(&generic_rows, generics)?,
            custom_attributes: self.attributes_of(method.token),
            body: self.method_body(method),
        })
    }

    fn generic_params(
        &self,
        rows: &[GenericParamRc],
        generics: Generics<'_>,
    ) -> Result<Vec<GenericParameter>> {
        let mut params = Vec::with_capacity(rows.len());
        for row in rows {
            let mut constraints = Vec::new();
            for (_, constraint) in row.constraints.iter() {
                if let Some(constraint) = constraint.upgrade() {
                    constraints.push(self.token_signature(constraint.token, generics)?);
                }
            }
            params.push(GenericParameter {
                name: row.name.clone(),
                flags: row.flags,
                constraints,
                custom_attributes: self.attributes_of(row.token),
            });
        }
        Ok(params)
    }

    /// Instructions of all basic blocks, back in stream order.
    fn method_body(&self, method: &Method) -> Option<MethodBody> {
        let blocks = method.blocks.get()?;
        let mut instructions: Vec<&disassembler::Instruction> = blocks
            .iter()
            .flat_map(|block| block.instructions.iter())
            .collect();
        instructions.sort_by_key(|instruction| instruction.offset);
        Some(MethodBody {
            instructions: instructions
                .into_iter()
                .map(|instruction| self.instruction(instruction))
                .collect(),
        })
    }

    fn instruction(&self, instruction: &disassembler::Instruction) -> Instruction {
        let other = || Instruction::Other(instruction.mnemonic.to_string());
        match instruction.mnemonic {
            "ldarg.0" => Instruction::Ldarg(0),
            "ldarg.1" => Instruction::Ldarg(1),
            "ldarg.2" => Instruction::Ldarg(2),
            "ldarg.3" => Instruction::Ldarg(3),
            "ldarg.s" | "ldarg" => match &instruction.operand {
                Operand::Immediate(Immediate::UInt8(index)) => Instruction::Ldarg(u16::from(*index)),
                Operand::Immediate(Immediate::UInt16(index)) => Instruction::Ldarg(*index),
                _ => other(),
            },
            "stfld" | "ldfld" => {
                let field = match &instruction.operand {
                    Operand::Token(token) => self.field_ref(*token),
                    _ => None,
                };
                match (instruction.mnemonic, field) {
                    ("stfld", Some(field)) => Instruction::Stfld(field),
                    ("ldfld", Some(field)) => Instruction::Ldfld(field),
                    _ => other(),
                }
            }
            _ => other(),
        }
    }

    fn field_ref(&self, token: Token) -> Option<FieldRef> {
        match token.table() {
            TABLE_FIELD => self.fields.get(&token).cloned(),
            TABLE_MEMBERREF => {
                let entry = self.object.refs_members().get(&token)?;
                let member = entry.value();
                let declaring = self.named(reference_token(&member.declaredby)?).ok()?;
                Some(FieldRef {
                    declaring,
                    name: member.name.clone(),
                })
            }
            _ => None,
        }
    }

    fn exported_types(&self) -> Vec<ExportedType> {
        self.object
            .exports()
            .iter()
            .filter_map(|entry| {
                let export = entry.value();
                let scope = match &export.implementation {
                    CilTypeReference::AssemblyRef(reference) => Some(reference.name.clone()),
                    // rows for nested types ride along with their declaring type
                    CilTypeReference::ExportedType(_) => return None,
                    _ => None,
                };
                Some(ExportedType {
                    namespace: export.namespace.clone().unwrap_or_default(),
                    name: export.name.clone(),
                    flags: export.flags,
                    scope,
                })
            })
            .collect()
    }

    fn attributes_of(&self, token: Token) -> Vec<CustomAttribute> {
        self.attributes.get(&token).cloned().unwrap_or_default()
    }

    /// Index the `CustomAttribute` table by parent token.
    fn read_attributes(&self) -> HashMap<Token, Vec<CustomAttribute>> {
        let mut attributes: HashMap<Token, Vec<CustomAttribute>> = HashMap::new();
        let (Some(tables), Some(blob)) = (self.object.tables(), self.object.blob()) else {
            return attributes;
        };
        let Some(table) = tables.table::<CustomAttributeRaw>(TableId::CustomAttribute) else {
            return attributes;
        };

        for row in table.iter() {
            match self.custom_attribute(&row, blob) {
                Ok(Some(attribute)) => attributes
                    .entry(row.parent.token)
                    .or_default()
                    .push(attribute),
                Ok(None) => {}
                Err(error) => log::warn!(
                    "skipping custom attribute 0x{:08X} - {error}",
                    row.token.value()
                ),
            }
        }
        attributes
    }

    fn custom_attribute(
        &self,
        row: &CustomAttributeRaw,
        blob: &Blob,
    ) -> Result<Option<CustomAttribute>> {
        let constructor = row.constructor.token;
        match constructor.table() {
            TABLE_METHODDEF => {
                let Some(entry) = self.object.methods().get(&constructor) else {
                    return Ok(None);
                };
                let Some(owner) = self.method_owner.get(&constructor) else {
                    return Ok(None);
                };
                let method = entry.value();
                let value = self.attribute_value(parse_custom_attribute_blob(
                    blob,
                    row.value,
                    &method.params,
                ));
                self.attribute(*owner, &method.signature, value).map(Some)
            }
            TABLE_MEMBERREF => {
                let Some(entry) = self.object.refs_members().get(&constructor) else {
                    return Ok(None);
                };
                let member = entry.value();
                let MemberRefSignature::Method(signature) = &member.signature else {
                    return Ok(None);
                };
                let Some(owner) = reference_token(&member.declaredby) else {
                    return Ok(None);
                };
                let value = self.attribute_value(parse_custom_attribute_blob(
                    blob,
                    row.value,
                    &member.params,
                ));
                self.attribute(owner, signature, value).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn attribute(
        &self,
        owner: Token,
        constructor: &CilMethodSignature,
        value: CustomAttributeValue,
    ) -> Result<CustomAttribute> {
        let mut constructor_params = Vec::with_capacity(constructor.params.len());
        for param in &constructor.params {
            constructor_params.push(self.parameter(param, Generics::default())?);
        }
        Ok(CustomAttribute {
            attribute_type: self.named(owner)?,
            constructor_params,
            value,
        })
    }

    fn attribute_value(&self, parsed: dotscope::Result<CilAttributeValue>) -> CustomAttributeValue {
        match parsed {
            Ok(value) => CustomAttributeValue {
                fixed_args: value.fixed_args.iter().map(argument).collect(),
                named_args: value
                    .named_args
                    .iter()
                    .map(|named| CustomAttributeNamedArgument {
                        is_field: named.is_field,
                        name: named.name.clone(),
                        value: argument(&named.value),
                    })
                    .collect(),
            },
            Err(error) => {
                log::warn!("undecodable custom attribute blob in {} - {error}", self.assembly_name);
                CustomAttributeValue::default()
            }
        }
    }

    /// The [`TypeName`] behind a `TypeDef` or `TypeRef` token.
    fn type_name(&self, token: Token, depth: usize) -> Result<TypeName> {
        if depth > MAX_HIERARCHY_DEPTH {
            return Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH));
        }
        let Some(ty) = self.types.get(&token) else {
            return Err(malformed_error!(
                "Type token 0x{:08X} does not resolve",
                token.value()
            ));
        };

        match token.table() {
            TABLE_TYPEDEF => match self.enclosing.get(&token) {
                Some(outer) => {
                    let declaring = self.type_name(*outer, depth + 1)?;
                    let name = nested_name(&ty.name, &declaring.name);
                    Ok(TypeName::nested(declaring, name))
                }
                None => Ok(TypeName::new(ty.namespace.clone(), ty.name.clone())),
            },
            TABLE_TYPEREF => match &ty.external {
                Some(CilTypeReference::TypeRef(outer) | CilTypeReference::TypeDef(outer)) => {
                    let Some(outer) = outer.upgrade() else {
                        return Err(malformed_error!(
                            "Declaring type of {} is gone",
                            ty.name
                        ));
                    };
                    let declaring = self.type_name(outer.token, depth + 1)?;
                    let scope = declaring.scope.clone();
                    let mut name = TypeName::nested(declaring, ty.name.clone());
                    name.scope = scope;
                    Ok(name)
                }
                Some(CilTypeReference::AssemblyRef(assembly)) => {
                    Ok(TypeName::new(ty.namespace.clone(), ty.name.clone())
                        .with_scope(assembly.name.clone()))
                }
                _ => Ok(TypeName::new(ty.namespace.clone(), ty.name.clone())),
            },
            _ => Ok(TypeName::new(ty.namespace.clone(), ty.name.clone())),
        }
    }

    /// The [`TypeName`] of a type reference, looking through generic instantiations.
    fn named(&self, token: Token) -> Result<TypeName> {
        if token.table() != TABLE_TYPESPEC {
            return self.type_name(token, 0);
        }
        let signature = self.type_spec(token, Generics::default())?;
        signature.type_name().cloned().ok_or_else(|| {
            malformed_error!(
                "Type specification 0x{:08X} does not name a type",
                token.value()
            )
        })
    }

    /// Signature of a type referenced by token outside a signature blob.
    fn token_signature(&self, token: Token, generics: Generics<'_>) -> Result<TypeSignature> {
        if token.table() == TABLE_TYPESPEC {
            return self.type_spec(token, generics);
        }
        Ok(TypeSignature::Class(self.type_name(token, 0)?))
    }

    fn type_spec(&self, token: Token, generics: Generics<'_>) -> Result<TypeSignature> {
        let (Some(tables), Some(blob)) = (self.object.tables(), self.object.blob()) else {
            return Err(malformed_error!("Assembly has no metadata tables"));
        };
        let rows = self.type_specs.get_or_init(|| {
            tables
                .table::<TypeSpecRaw>(TableId::TypeSpec)
                .map(|table| table.iter().map(|row| (row.token, row.signature)).collect())
                .unwrap_or_default()
        });
        let Some(index) = rows.get(&token) else {
            return Err(malformed_error!(
                "Type specification 0x{:08X} does not resolve",
                token.value()
            ));
        };
        let spec = parse_type_spec_signature(blob.get(*index as usize)?)?;
        self.signature(&spec.base, generics)
    }

    fn parameter(&self, param: &SignatureParameter, generics: Generics<'_>) -> Result<TypeSignature> {
        let mut signature = self.signature(&param.base, generics)?;
        if param.by_ref {
            signature = TypeSignature::ByRef(Box::new(signature));
        }
        self.modified(signature, &param.modifiers)
    }

    /// Wrap `base` in the custom modifiers of its position.
    ///
    /// The reader does not keep required and optional modifiers apart; both become
    /// `modreq`.
    fn modified(&self, base: TypeSignature, modifiers: &[Token]) -> Result<TypeSignature> {
        let mut signature = base;
        for modifier in modifiers {
            signature = TypeSignature::ModifiedRequired {
                modifier: self.named(*modifier)?,
                base: Box::new(signature),
            };
        }
        Ok(signature)
    }

    fn method_signature(
        &self,
        method: &CilMethodSignature,
        generics: Generics<'_>,
    ) -> Result<SignatureMethod> {
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            params.push(self.parameter(param, generics)?);
        }
        Ok(SignatureMethod {
            has_this: method.has_this,
            explicit_this: method.explicit_this,
            vararg: method.vararg,
            cdecl: method.cdecl,
            stdcall: method.stdcall,
            thiscall: method.thiscall,
            fastcall: method.fastcall,
            param_count_generic: method.param_count_generic,
            return_type: self.parameter(&method.return_type, generics)?,
            params,
        })
    }

    fn signature(&self, signature: &CilSignature, generics: Generics<'_>) -> Result<TypeSignature> {
        let boxed = |inner: &CilSignature| -> Result<Box<TypeSignature>> {
            Ok(Box::new(self.signature(inner, generics)?))
        };

        let converted = match signature {
            CilSignature::Void => TypeSignature::Void,
            CilSignature::Boolean => TypeSignature::Boolean,
            CilSignature::Char => TypeSignature::Char,
            CilSignature::I1 => TypeSignature::I1,
            CilSignature::U1 => TypeSignature::U1,
            CilSignature::I2 => TypeSignature::I2,
            CilSignature::U2 => TypeSignature::U2,
            CilSignature::I4 => TypeSignature::I4,
            CilSignature::U4 => TypeSignature::U4,
            CilSignature::I8 => TypeSignature::I8,
            CilSignature::U8 => TypeSignature::U8,
            CilSignature::R4 => TypeSignature::R4,
            CilSignature::R8 => TypeSignature::R8,
            CilSignature::String => TypeSignature::String,
            CilSignature::Object => TypeSignature::Object,
            CilSignature::I => TypeSignature::I,
            CilSignature::U => TypeSignature::U,
            CilSignature::TypedByRef => TypeSignature::TypedByRef,
            CilSignature::Sentinel => TypeSignature::Sentinel,
            CilSignature::Class(token) if token.table() == TABLE_TYPESPEC => {
                self.type_spec(*token, generics)?
            }
            CilSignature::ValueType(token) if token.table() == TABLE_TYPESPEC => {
                self.type_spec(*token, generics)?
            }
            CilSignature::Class(token) => TypeSignature::Class(self.type_name(*token, 0)?),
            CilSignature::ValueType(token) => TypeSignature::ValueType(self.type_name(*token, 0)?),
            CilSignature::GenericParamType(index) => TypeSignature::GenericParamType {
                index: *index,
                name: generic_name(generics.type_params, *index),
            },
            CilSignature::GenericParamMethod(index) => TypeSignature::GenericParamMethod {
                index: *index,
                name: generic_name(generics.method_params, *index),
            },
            CilSignature::GenericInst(base, args) => {
                let mut converted = Vec::with_capacity(args.len());
                for arg in args {
                    converted.push(self.signature(arg, generics)?);
                }
                TypeSignature::GenericInst(boxed(base)?, converted)
            }
            CilSignature::Ptr(pointer) => TypeSignature::Ptr(Box::new(self.modified(
                self.signature(&pointer.base, generics)?,
                &pointer.modifiers,
            )?)),
            CilSignature::SzArray(array) => TypeSignature::SzArray(Box::new(self.modified(
                self.signature(&array.base, generics)?,
                &array.modifiers,
            )?)),
            CilSignature::Array(array) => TypeSignature::Array(SignatureArray {
                base: boxed(&array.base)?,
                rank: array.rank,
                dimensions: array
                    .dimensions
                    .iter()
                    .map(|dimension| ArrayDimensions {
                        size: dimension.size,
                        lower_bound: dimension.lower_bound,
                    })
                    .collect(),
            }),
            CilSignature::ByRef(inner) => TypeSignature::ByRef(boxed(inner)?),
            CilSignature::Pinned(inner) => TypeSignature::Pinned(boxed(inner)?),
            CilSignature::FnPtr(method) => {
                TypeSignature::FnPtr(Box::new(self.method_signature(method, generics)?))
            }
            other => {
                return Err(malformed_error!(
                    "Unexpected element type in signature - {:?}",
                    other
                ))
            }
        };
        Ok(converted)
    }
}

/// Map every nested `TypeDef` to its immediate enclosing type.
fn nesting(object: &CilObject) -> HashMap<Token, Token> {
    let Some(table) = object
        .tables()
        .and_then(|tables| tables.table::<NestedClassRaw>(TableId::NestedClass))
    else {
        return HashMap::new();
    };
    table
        .iter()
        .map(|row| {
            (
                Token::new(0x0200_0000 | row.nested_class),
                Token::new(0x0200_0000 | row.enclosing_class),
            )
        })
        .collect()
}

fn sorted_generic_params(rows: impl Iterator<Item = GenericParamRc>) -> Vec<GenericParamRc> {
    let mut rows: Vec<GenericParamRc> = rows.collect();
    rows.sort_by_key(|row| row.number);
    rows
}

fn generic_name(names: &[String], index: u32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|index| names.get(index))
        .cloned()
        .unwrap_or_default()
}

fn accessor(
    slot: &OnceLock<MethodRef>,
    methods: &HashMap<Token, MethodDefinitionRc>,
) -> Option<MethodDefinitionRc> {
    let method = slot.get()?.upgrade()?;
    methods.get(&method.token).cloned()
}

fn reference_token(reference: &CilTypeReference) -> Option<Token> {
    match reference {
        CilTypeReference::TypeDef(ty)
        | CilTypeReference::TypeRef(ty)
        | CilTypeReference::TypeSpec(ty) => ty.upgrade().map(|ty| ty.token),
        _ => None,
    }
}

/// Simple name of a nested type, without any `Outer+` or `Outer/` prefix.
fn nested_name(name: &str, declaring: &str) -> String {
    name.strip_prefix(declaring)
        .and_then(|rest| rest.strip_prefix('+').or_else(|| rest.strip_prefix('/')))
        .unwrap_or(name)
        .to_string()
}

fn constant(primitive: &CilPrimitive) -> Option<Constant> {
    let constant = match &primitive.data {
        CilPrimitiveData::None => Constant::Null,
        CilPrimitiveData::Boolean(v) => Constant::Bool(*v),
        CilPrimitiveData::Char(v) => Constant::Char(*v),
        CilPrimitiveData::I1(v) => Constant::I1(*v),
        CilPrimitiveData::U1(v) => Constant::U1(*v),
        CilPrimitiveData::I2(v) => Constant::I2(*v),
        CilPrimitiveData::U2(v) => Constant::U2(*v),
        CilPrimitiveData::I4(v) => Constant::I4(*v),
        CilPrimitiveData::U4(v) => Constant::U4(*v),
        CilPrimitiveData::I8(v) => Constant::I8(*v),
        CilPrimitiveData::U8(v) => Constant::U8(*v),
        CilPrimitiveData::I(v) => Constant::I8(i64::try_from(*v).ok()?),
        CilPrimitiveData::U(v) => Constant::U8(u64::try_from(*v).ok()?),
        CilPrimitiveData::R4(v) => Constant::R4(*v),
        CilPrimitiveData::R8(v) => Constant::R8(*v),
        CilPrimitiveData::String(v) => Constant::String(v.clone()),
        CilPrimitiveData::Bytes(_) => return None,
    };
    Some(constant)
}

fn argument(argument: &CilArgument) -> CustomAttributeArgument {
    match argument {
        CilArgument::Void => CustomAttributeArgument::Null,
        CilArgument::Bool(v) => CustomAttributeArgument::Bool(*v),
        CilArgument::Char(v) => CustomAttributeArgument::Char(*v),
        CilArgument::I1(v) => CustomAttributeArgument::I1(*v),
        CilArgument::U1(v) => CustomAttributeArgument::U1(*v),
        CilArgument::I2(v) => CustomAttributeArgument::I2(*v),
        CilArgument::U2(v) => CustomAttributeArgument::U2(*v),
        CilArgument::I4(v) => CustomAttributeArgument::I4(*v),
        CilArgument::U4(v) => CustomAttributeArgument::U4(*v),
        CilArgument::I8(v) => CustomAttributeArgument::I8(*v),
        CilArgument::U8(v) => CustomAttributeArgument::U8(*v),
        CilArgument::R4(v) => CustomAttributeArgument::R4(*v),
        CilArgument::R8(v) => CustomAttributeArgument::R8(*v),
        CilArgument::I(v) => i64::try_from(*v)
            .map_or(CustomAttributeArgument::Null, CustomAttributeArgument::I8),
        CilArgument::U(v) => u64::try_from(*v)
            .map_or(CustomAttributeArgument::Null, CustomAttributeArgument::U8),
        CilArgument::String(v) => CustomAttributeArgument::String(v.clone()),
        CilArgument::Type(v) => CustomAttributeArgument::Type(v.clone()),
        CilArgument::Array(items) => {
            CustomAttributeArgument::Array(items.iter().map(self::argument).collect())
        }
        CilArgument::Enum(enum_type, value) => CustomAttributeArgument::Enum(
            serialized_type_name(enum_type),
            Box::new(self::argument(value)),
        ),
    }
}

/// Parse a serialized (reflection-style) type name such as
/// `System.AttributeTargets, mscorlib` or `N.Outer+Inner`.
fn serialized_type_name(serialized: &str) -> TypeName {
    let qualified = serialized.split(',').next().unwrap_or(serialized).trim();
    let mut parts = qualified.split('+');
    let outer = parts.next().unwrap_or(qualified);
    let mut name = match outer.rsplit_once('.') {
        Some((namespace, name)) => TypeName::new(namespace, name),
        None => TypeName::new("", outer),
    };
    for nested in parts {
        name = TypeName::nested(name, nested);
    }
    name
}
