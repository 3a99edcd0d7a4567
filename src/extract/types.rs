//! Extraction of type records.

use std::collections::HashSet;

use crate::{
    extract::Extractor,
    metadata::{
        definitions::{TypeDefinition, TypeDefinitionRc},
        flags::TypeAttributes,
        resolver::{base_types, is_visible},
        signatures::TypeSignature,
    },
    tree::{CharSet, Layout, TypeKind, TypeRecord},
    typename::normalize,
    Result,
};

/// Classify a type definition.
///
/// Checks run in the order enum, struct, interface, delegate, class. Definitions never
/// classify as [`TypeKind::Pointer`]; that kind only exists for trees read from documents
/// written by other producers.
#[must_use]
pub fn classify(ty: &TypeDefinition) -> TypeKind {
    if ty.is_enum() {
        TypeKind::Enum
    } else if ty.is_value_type() {
        TypeKind::Struct
    } else if ty.is_interface() {
        TypeKind::Interface
    } else if ty.is_delegate() {
        TypeKind::Delegate
    } else {
        TypeKind::Class
    }
}

fn charset(ty: &TypeDefinition) -> CharSet {
    match ty.flags & TypeAttributes::STRING_FORMAT_MASK {
        TypeAttributes::ANSI_CLASS => CharSet::Ansi,
        TypeAttributes::AUTO_CLASS => CharSet::Auto,
        TypeAttributes::UNICODE_CLASS => CharSet::Unicode,
        _ => CharSet::None,
    }
}

fn layout(ty: &TypeDefinition) -> Option<Layout> {
    if ty.is_interface() {
        return None;
    }
    match ty.flags & TypeAttributes::LAYOUT_MASK {
        TypeAttributes::AUTO_LAYOUT => Some(Layout::AutoLayout),
        TypeAttributes::SEQUENTIAL_LAYOUT => Some(Layout::SequentialLayout),
        TypeAttributes::EXPLICIT_LAYOUT => Some(Layout::ExplicitLayout),
        _ => None,
    }
}

impl Extractor<'_> {
    /// Build the record of one type, its members and its visible nested types.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for enums without a `value__` field and for
    /// signatures that cannot be normalized; propagates hierarchy and attribute failures.
    pub fn type_record(&self, ty: &TypeDefinitionRc) -> Result<TypeRecord> {
        let kind = classify(ty);
        let base = ty.base_type.as_ref().map(normalize).transpose()?;

        let enum_type = if kind == TypeKind::Enum {
            let value_field = ty
                .fields
                .iter()
                .find(|field| field.name == "value__")
                .ok_or_else(|| malformed_error!("Enum {} has no value__ field", ty.full_name()))?;
            Some(normalize(&value_field.field_type)?)
        } else {
            None
        };

        let mut record = TypeRecord {
            name: ty.name.clone(),
            kind,
            base,
            is_sealed: ty.is_sealed(),
            is_abstract: ty.is_abstract(),
            is_serializable: ty.is_serializable() || kind == TypeKind::Enum,
            charset: charset(ty),
            layout: layout(ty),
            pack: ty.packing_size,
            size: ty.class_size,
            enum_type,
            attributes: self.attribute_records(&ty.custom_attributes)?,
            interfaces: self.interfaces(ty)?,
            generic_parameters: self.generic_parameters(&ty.generic_params)?,
            fields: self.fields(ty)?,
            ..Default::default()
        };

        if !self.config.abi_mode {
            record.constructors = self.constructors(ty)?;
            record.properties = self.properties(ty)?;
            record.events = self.events(ty)?;
            record.methods = self.methods(ty)?;
        }

        let owner = ty.full_name();
        let mut nested: Vec<&TypeDefinitionRc> = ty
            .nested_types
            .iter()
            .filter(|inner| inner.is_nested_visible())
            .filter(|inner| {
                inner
                    .declaring_type
                    .as_ref()
                    .is_some_and(|declaring| declaring.full_name() == owner)
            })
            .collect();
        nested.sort_by(|a, b| a.name.cmp(&b.name));
        for inner in nested {
            record.nested.push(self.type_record(inner)?);
        }

        Ok(record)
    }

    /// Keys of the visible interfaces `ty` implements, in ordinal order.
    ///
    /// Interfaces declared by base types and interfaces inherited by other interfaces are
    /// included unless the extractor only lists directly implemented ones.
    fn interfaces(&self, ty: &TypeDefinitionRc) -> Result<Vec<String>> {
        let inherited = !self.config.ignore_inherited_interfaces;
        let mut pending: Vec<TypeSignature> = ty.interfaces.clone();
        if inherited {
            for base in base_types(self.resolver, ty)? {
                pending.extend(base.interfaces.iter().cloned());
            }
        }

        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        while let Some(signature) = pending.pop() {
            let key = normalize(&signature)?;
            if !seen.insert(key.clone()) {
                continue;
            }

            let visible = signature
                .type_name()
                .map_or(true, |name| is_visible(self.resolver, name) != Some(false));
            if visible {
                keys.push(key);
            }
            if inherited {
                if let Some(definition) = self.resolver.resolve_signature(&signature) {
                    pending.extend(definition.interfaces.iter().cloned());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
