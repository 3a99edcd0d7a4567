//! Extraction of whole assemblies.

use crate::{
    extract::{attributes::TYPE_FORWARDED_TO_ATTRIBUTE, Extractor},
    metadata::definitions::{AssemblyDefinition, TypeDefinitionRc},
    tree::{AssemblyTree, AttributeRecord, NamespaceRecord},
    typename::cleanup,
    Error, Result,
};

impl Extractor<'_> {
    /// Extract the API tree of `assembly`.
    ///
    /// Top-level types with a namespace are listed, grouped by namespace and ordered by
    /// namespace and name; outside ABI mode only public types qualify. Type forwarders are
    /// either recorded as `TypeForwardedToAttribute` assembly attributes or, when the
    /// extractor follows them, resolved and listed as if they were declared locally.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] for a followed forwarder whose destination cannot be
    /// resolved (unless resolution errors are ignored), and propagates failures of the type
    /// and attribute extraction.
    pub fn extract(&self, assembly: &AssemblyDefinition) -> Result<AssemblyTree> {
        let mut attributes = Vec::new();
        if !self.config.follow_forwarders {
            attributes.extend(forwarder_records(assembly));
        }
        attributes.extend(self.attribute_records(&assembly.custom_attributes)?);

        let mut types: Vec<TypeDefinitionRc> = assembly
            .types
            .iter()
            .filter(|ty| ty.declaring_type.is_none())
            .cloned()
            .collect();
        if self.config.follow_forwarders {
            for exported in &assembly.exported_types {
                let name = exported.type_name();
                match self.resolver.resolve(&name) {
                    Some(forwarded) => types.push(forwarded),
                    None if self.config.ignore_resolution_errors => {
                        log::warn!(
                            "could not resolve forwarded type {} in {}, omitting it",
                            name.full_name(),
                            assembly.name
                        );
                    }
                    None => {
                        return Err(Error::TypeNotFound(format!(
                            "{} (forwarded from {})",
                            name.full_name(),
                            assembly.name
                        )))
                    }
                }
            }
        }
        types.sort_by(|a, b| a.namespace.cmp(&b.namespace).then_with(|| a.name.cmp(&b.name)));

        let mut namespaces: Vec<NamespaceRecord> = Vec::new();
        for ty in &types {
            if ty.namespace.is_empty() || ty.declaring_type.is_some() {
                continue;
            }
            if !self.config.abi_mode && !ty.is_public() {
                continue;
            }

            let record = self.type_record(ty)?;
            match namespaces.last_mut() {
                Some(current) if current.name == ty.namespace => current.types.push(record),
                _ => namespaces.push(NamespaceRecord {
                    name: ty.namespace.clone(),
                    types: vec![record],
                }),
            }
        }

        log::debug!(
            "extracted {} namespaces from {} {}",
            namespaces.len(),
            assembly.name,
            assembly.version
        );

        Ok(AssemblyTree {
            name: assembly.name.clone(),
            version: assembly.version.clone(),
            attributes,
            namespaces,
        })
    }
}

/// `TypeForwardedToAttribute` records for the forwarders of `assembly`.
fn forwarder_records(assembly: &AssemblyDefinition) -> impl Iterator<Item = AttributeRecord> + '_ {
    assembly
        .exported_types
        .iter()
        .filter(|exported| exported.is_forwarder())
        .map(|exported| {
            let destination = cleanup(&exported.type_name().full_name()).into_owned();
            AttributeRecord::new(TYPE_FORWARDED_TO_ATTRIBUTE)
                .with_property("Destination", Some(destination.as_str()))
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::ExtractorConfig,
        metadata::{
            definitions::{ExportedType, TypeDefinition},
            flags::{TypeAttributes, EXPORTED_TYPE_FORWARDER},
            resolver::AssemblySet,
            signatures::TypeSignature,
        },
    };

    fn ty(namespace: &str, name: &str, flags: u32) -> TypeDefinitionRc {
        Arc::new(TypeDefinition {
            namespace: namespace.into(),
            name: name.into(),
            flags,
            base_type: Some(TypeSignature::Object),
            ..Default::default()
        })
    }

    fn assembly() -> AssemblyDefinition {
        AssemblyDefinition {
            name: "Lib".into(),
            version: "1.0.0.0".into(),
            types: vec![
                ty("B", "Second", TypeAttributes::PUBLIC),
                ty("A", "Zeta", TypeAttributes::PUBLIC),
                ty("A", "Alpha", TypeAttributes::PUBLIC),
                ty("A", "Internal", TypeAttributes::NOT_PUBLIC),
                ty("", "<Module>", TypeAttributes::NOT_PUBLIC),
            ],
            exported_types: vec![ExportedType {
                namespace: "C".into(),
                name: "Moved".into(),
                flags: TypeAttributes::PUBLIC | EXPORTED_TYPE_FORWARDER,
                scope: Some("Other".into()),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn namespaces_and_forwarder_records() {
        let assembly = assembly();
        let set = AssemblySet::from_assemblies([&assembly]);
        let config = ExtractorConfig::default();
        let tree = Extractor::new(&config, &set).extract(&assembly).unwrap();

        assert_eq!(tree.name, "Lib");
        let names: Vec<&str> = tree.namespaces.iter().map(|ns| ns.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        let a: Vec<&str> = tree.namespaces[0].types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(a, vec!["Alpha", "Zeta"]);

        assert_eq!(tree.attributes.len(), 1);
        assert_eq!(tree.attributes[0].name, TYPE_FORWARDED_TO_ATTRIBUTE);
        assert_eq!(tree.attributes[0].property("Destination"), Some(Some("C.Moved")));
    }

    #[test]
    fn abi_mode_lists_internal_types() {
        let assembly = assembly();
        let set = AssemblySet::from_assemblies([&assembly]);
        let config = ExtractorConfig::abi();
        let tree = Extractor::new(&config, &set).extract(&assembly).unwrap();
        let a: Vec<&str> = tree.namespaces[0].types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(a, vec!["Alpha", "Internal", "Zeta"]);
    }

    #[test]
    fn followed_forwarders() {
        let assembly = assembly();
        let other = AssemblyDefinition {
            name: "Other".into(),
            types: vec![ty("C", "Moved", TypeAttributes::PUBLIC)],
            ..Default::default()
        };
        let config = ExtractorConfig {
            follow_forwarders: true,
            ..Default::default()
        };

        let lonely = AssemblySet::from_assemblies([&assembly]);
        let error = Extractor::new(&config, &lonely).extract(&assembly).unwrap_err();
        assert!(matches!(error, Error::TypeNotFound(_)));

        let lenient = ExtractorConfig {
            ignore_resolution_errors: true,
            ..config.clone()
        };
        let tree = Extractor::new(&lenient, &lonely).extract(&assembly).unwrap();
        assert_eq!(tree.namespaces.len(), 2);

        let set = AssemblySet::from_assemblies([&assembly, &other]);
        let tree = Extractor::new(&config, &set).extract(&assembly).unwrap();
        assert!(tree.attributes.is_empty());
        assert_eq!(tree.namespaces.len(), 3);
        assert_eq!(tree.namespaces[2].types[0].name, "Moved");
    }

    #[test]
    fn parallel_extraction_keeps_order() {
        let first = assembly();
        let mut second = assembly();
        second.name = "Lib2".into();
        let set = AssemblySet::from_assemblies([&first]);
        let config = ExtractorConfig::default();
        let trees = Extractor::new(&config, &set)
            .extract_all(&[first, second])
            .unwrap();
        assert_eq!(trees[0].name, "Lib");
        assert_eq!(trees[1].name, "Lib2");
    }
}
