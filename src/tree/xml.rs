//! The XML document form of an [`AssemblyTree`].
//!
//! ```xml
//! <assemblies>
//!   <assembly name="Contoso.Sample" version="1.0.0.0">
//!     <attributes>...</attributes>
//!     <namespaces>
//!       <namespace name="Contoso.Sample">
//!         <classes>
//!           <class name="Foo" type="class" base="System.Object" charset="Ansi" layout="AutoLayout">
//!             <interfaces/> <generic-parameters/> <fields/> <constructors/>
//!             <properties/> <events/> <methods/> <classes/>
//!           </class>
//!         </classes>
//!       </namespace>
//!     </namespaces>
//!   </assembly>
//! </assemblies>
//! ```
//!
//! Empty groups are not written. A null attribute property value is a `<property>` without a
//! `value` attribute, so the string `"null"` stays a string.

use crate::{
    tree::{
        AssemblyTree, AttributeRecord, Direction, EventDetail, FieldDetail,
        GenericParameterRecord, MemberDetail, MemberKind, MemberRecord, MethodDetail,
        NamespaceRecord, ParameterRecord, PropertyDetail, SignatureFlags, TypeKind, TypeRecord,
    },
    xml::{self, Element},
    Result,
};

/// Group and item element names of a member kind.
#[must_use]
pub fn member_tags(kind: MemberKind) -> (&'static str, &'static str) {
    match kind {
        MemberKind::Field => ("fields", "field"),
        MemberKind::Constructor => ("constructors", "constructor"),
        MemberKind::Property => ("properties", "property"),
        MemberKind::Event => ("events", "event"),
        MemberKind::Method => ("methods", "method"),
    }
}

const MEMBER_KINDS: [MemberKind; 5] = [
    MemberKind::Field,
    MemberKind::Constructor,
    MemberKind::Property,
    MemberKind::Event,
    MemberKind::Method,
];

/// Serialize a tree to a document.
///
/// # Errors
/// Returns [`crate::Error::Xml`] if the writer fails.
pub fn to_xml(tree: &AssemblyTree) -> Result<String> {
    xml::write(&to_element(tree))
}

/// Build the `<assemblies>` element of a tree.
#[must_use]
pub fn to_element(tree: &AssemblyTree) -> Element {
    let mut assembly = Element::new("assembly")
        .attr("name", &tree.name)
        .attr("version", &tree.version);
    push_attributes(&mut assembly, &tree.attributes);

    if !tree.namespaces.is_empty() {
        let mut namespaces = Element::new("namespaces");
        for ns in &tree.namespaces {
            let mut namespace = Element::new("namespace").attr("name", &ns.name);
            if !ns.types.is_empty() {
                let mut classes = Element::new("classes");
                for ty in &ns.types {
                    classes.push(type_element(ty));
                }
                namespace.push(classes);
            }
            namespaces.push(namespace);
        }
        assembly.push(namespaces);
    }

    Element::new("assemblies").child(assembly)
}

/// Build the `<attributes>` group of an attribute list; no-op for an empty list.
pub fn push_attributes(parent: &mut Element, attributes: &[AttributeRecord]) {
    if attributes.is_empty() {
        return;
    }
    let mut group = Element::new("attributes");
    for attribute in attributes {
        let mut element = Element::new("attribute").attr("name", &attribute.name);
        if !attribute.properties.is_empty() {
            let mut properties = Element::new("properties");
            for (name, value) in &attribute.properties {
                properties.push(
                    Element::new("property")
                        .attr("name", name)
                        .attr_opt("value", value.as_deref()),
                );
            }
            element.push(properties);
        }
        group.push(element);
    }
    parent.push(group);
}

fn push_generic_parameters(parent: &mut Element, parameters: &[GenericParameterRecord]) {
    if parameters.is_empty() {
        return;
    }
    let mut group = Element::new("generic-parameters");
    for parameter in parameters {
        let mut element = Element::new("generic-parameter")
            .attr("name", &parameter.name)
            .attr("attributes", parameter.attributes);
        if !parameter.constraints.is_empty() {
            let mut constraints = Element::new("generic-parameter-constraints");
            for constraint in &parameter.constraints {
                constraints.push(Element::new("generic-parameter-constraint").attr("name", constraint));
            }
            element.push(constraints);
        }
        push_attributes(&mut element, &parameter.custom_attributes);
        group.push(element);
    }
    parent.push(group);
}

fn type_element(ty: &TypeRecord) -> Element {
    let mut element = Element::new("class")
        .attr("name", &ty.name)
        .attr("type", ty.kind)
        .attr_opt("base", ty.base.as_ref())
        .flag("sealed", ty.is_sealed)
        .flag("abstract", ty.is_abstract)
        .flag("serializable", ty.is_serializable)
        .attr("charset", ty.charset)
        .attr_opt("layout", ty.layout)
        .attr_opt("pack", ty.pack)
        .attr_opt("size", ty.size)
        .attr_opt("enumtype", ty.enum_type.as_ref());

    push_attributes(&mut element, &ty.attributes);

    if !ty.interfaces.is_empty() {
        let mut interfaces = Element::new("interfaces");
        for interface in &ty.interfaces {
            interfaces.push(Element::new("interface").attr("name", interface));
        }
        element.push(interfaces);
    }

    push_generic_parameters(&mut element, &ty.generic_parameters);

    for kind in MEMBER_KINDS {
        push_members(&mut element, kind, ty.members(kind));
    }

    if !ty.nested.is_empty() {
        let mut classes = Element::new("classes");
        for nested in &ty.nested {
            classes.push(type_element(nested));
        }
        element.push(classes);
    }
    element
}

fn push_members(parent: &mut Element, kind: MemberKind, members: &[MemberRecord]) {
    if members.is_empty() {
        return;
    }
    let (group_tag, item_tag) = member_tags(kind);
    let mut group = Element::new(group_tag);
    for member in members {
        group.push(member_element(item_tag, member));
    }
    parent.push(group);
}

fn member_element(tag: &str, member: &MemberRecord) -> Element {
    let mut element = Element::new(tag)
        .attr("name", &member.name)
        .attr("attrib", member.attrib);

    match &member.detail {
        MemberDetail::Field(field) => {
            element = element
                .attr("fieldtype", &field.field_type)
                .attr_opt("value", field.value.as_ref());
            push_attributes(&mut element, &member.attributes);
        }
        MemberDetail::Property(property) => {
            element = element
                .attr("ptype", &property.property_type)
                .attr_opt("params", property.params.as_ref());
            push_attributes(&mut element, &member.attributes);
            push_accessors(&mut element, &property.accessors);
        }
        MemberDetail::Event(event) => {
            element = element.attr("eventtype", &event.event_type);
            push_attributes(&mut element, &member.attributes);
            push_accessors(&mut element, &event.accessors);
        }
        MemberDetail::Method(method) | MemberDetail::Constructor(method) => {
            element = element
                .flag("abstract", method.flags.is_abstract)
                .flag("virtual", method.flags.is_virtual)
                .flag("sealed", method.flags.is_final)
                .flag("static", method.flags.is_static)
                .flag("is-override", method.is_override)
                .attr_opt("returntype", method.return_type.as_ref());
            push_attributes(&mut element, &member.attributes);
            push_parameters(&mut element, &method.parameters);
            push_generic_parameters(&mut element, &method.generic_parameters);
        }
    }
    element
}

fn push_accessors(parent: &mut Element, accessors: &[MemberRecord]) {
    if accessors.is_empty() {
        return;
    }
    let mut group = Element::new("methods");
    for accessor in accessors {
        group.push(member_element("method", accessor));
    }
    parent.push(group);
}

fn push_parameters(parent: &mut Element, parameters: &[ParameterRecord]) {
    if parameters.is_empty() {
        return;
    }
    let mut group = Element::new("parameters");
    for parameter in parameters {
        let mut element = Element::new("parameter")
            .attr("name", &parameter.name)
            .attr("position", parameter.position)
            .attr("attrib", parameter.attrib)
            .attr("direction", parameter.direction)
            .attr("type", &parameter.param_type)
            .flag("optional", parameter.optional)
            .attr_opt("defaultValue", parameter.default_value.as_ref());
        push_attributes(&mut element, &parameter.attributes);
        group.push(element);
    }
    parent.push(group);
}

/// Load a tree from a document.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] when required elements or attributes are missing or
/// hold invalid values, and [`crate::Error::Xml`] for syntax errors.
pub fn from_xml(text: &str) -> Result<AssemblyTree> {
    from_element(&xml::parse(text)?)
}

/// Load a tree from an `<assemblies>` (or bare `<assembly>`) element.
///
/// # Errors
/// See [`from_xml`].
pub fn from_element(root: &Element) -> Result<AssemblyTree> {
    let assembly = if root.name == "assembly" {
        root
    } else {
        root.find("assembly")
            .ok_or_else(|| malformed_error!("Document has no <assembly> element"))?
    };

    let mut namespaces = Vec::new();
    for ns in assembly.group("namespaces", "namespace") {
        let types = ns
            .group("classes", "class")
            .map(read_type)
            .collect::<Result<Vec<_>>>()?;
        namespaces.push(NamespaceRecord {
            name: ns.require("name")?.to_string(),
            types,
        });
    }

    Ok(AssemblyTree {
        name: assembly.require("name")?.to_string(),
        version: assembly.get("version").unwrap_or_default().to_string(),
        attributes: read_attributes(assembly)?,
        namespaces,
    })
}

/// Read the `<attributes>` group of an element.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for attributes or properties without a name.
pub fn read_attributes(element: &Element) -> Result<Vec<AttributeRecord>> {
    let mut attributes = Vec::new();
    for attribute in element.group("attributes", "attribute") {
        let mut record = AttributeRecord::new(attribute.require("name")?);
        for property in attribute.group("properties", "property") {
            let value = property.get("value").map(str::to_string);
            record.properties.push((property.require("name")?.to_string(), value));
        }
        attributes.push(record);
    }
    Ok(attributes)
}

fn read_generic_parameters(element: &Element) -> Result<Vec<GenericParameterRecord>> {
    let mut parameters = Vec::new();
    for parameter in element.group("generic-parameters", "generic-parameter") {
        let constraints = parameter
            .group("generic-parameter-constraints", "generic-parameter-constraint")
            .map(|c| c.require("name").map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        parameters.push(GenericParameterRecord {
            name: parameter.require("name")?.to_string(),
            attributes: parameter.get_parsed("attributes")?.unwrap_or(0),
            constraints,
            custom_attributes: read_attributes(parameter)?,
        });
    }
    Ok(parameters)
}

fn read_type(element: &Element) -> Result<TypeRecord> {
    let kind: TypeKind = element.get_parsed("type")?.unwrap_or_default();
    let mut ty = TypeRecord {
        name: element.require("name")?.to_string(),
        kind,
        base: element.get("base").map(str::to_string),
        is_sealed: element.get_flag("sealed"),
        is_abstract: element.get_flag("abstract"),
        is_serializable: element.get_flag("serializable"),
        charset: element.get_parsed("charset")?.unwrap_or_default(),
        layout: element.get_parsed("layout")?,
        pack: element.get_parsed("pack")?,
        size: element.get_parsed("size")?,
        enum_type: element.get("enumtype").map(str::to_string),
        attributes: read_attributes(element)?,
        interfaces: element
            .group("interfaces", "interface")
            .map(|i| i.require("name").map(str::to_string))
            .collect::<Result<Vec<_>>>()?,
        generic_parameters: read_generic_parameters(element)?,
        ..Default::default()
    };

    for kind in MEMBER_KINDS {
        let (group_tag, item_tag) = member_tags(kind);
        let members = element
            .group(group_tag, item_tag)
            .map(|member| read_member(kind, member))
            .collect::<Result<Vec<_>>>()?;
        *ty.members_mut(kind) = members;
    }

    ty.nested = element
        .group("classes", "class")
        .map(read_type)
        .collect::<Result<Vec<_>>>()?;
    Ok(ty)
}

fn read_accessors(element: &Element) -> Result<Vec<MemberRecord>> {
    element
        .group("methods", "method")
        .map(|method| read_member(MemberKind::Method, method))
        .collect()
}

fn read_member(kind: MemberKind, element: &Element) -> Result<MemberRecord> {
    let detail = match kind {
        MemberKind::Field => MemberDetail::Field(FieldDetail {
            field_type: element.require("fieldtype")?.to_string(),
            value: element.get("value").map(str::to_string),
        }),
        MemberKind::Property => MemberDetail::Property(PropertyDetail {
            property_type: element.require("ptype")?.to_string(),
            params: element.get("params").map(str::to_string),
            accessors: read_accessors(element)?,
        }),
        MemberKind::Event => MemberDetail::Event(EventDetail {
            event_type: element.require("eventtype")?.to_string(),
            accessors: read_accessors(element)?,
        }),
        MemberKind::Method => MemberDetail::Method(read_method(element)?),
        MemberKind::Constructor => MemberDetail::Constructor(read_method(element)?),
    };

    Ok(MemberRecord {
        name: element.require("name")?.to_string(),
        attrib: element.get_parsed("attrib")?.unwrap_or(0),
        attributes: read_attributes(element)?,
        detail,
    })
}

fn read_method(element: &Element) -> Result<MethodDetail> {
    let mut parameters = Vec::new();
    for parameter in element.group("parameters", "parameter") {
        let direction: Direction = parameter.get_parsed("direction")?.unwrap_or_default();
        parameters.push(ParameterRecord {
            name: parameter.get("name").unwrap_or_default().to_string(),
            position: parameter
                .get_parsed("position")?
                .ok_or_else(|| malformed_error!("<parameter> is missing its position"))?,
            attrib: parameter.get_parsed("attrib")?.unwrap_or(0),
            param_type: parameter.require("type")?.to_string(),
            direction,
            optional: parameter.get_flag("optional"),
            default_value: parameter.get("defaultValue").map(str::to_string),
            attributes: read_attributes(parameter)?,
        });
    }

    Ok(MethodDetail {
        return_type: element.get("returntype").map(str::to_string),
        parameters,
        flags: SignatureFlags {
            is_abstract: element.get_flag("abstract"),
            is_virtual: element.get_flag("virtual"),
            is_static: element.get_flag("static"),
            is_final: element.get_flag("sealed"),
        },
        is_override: element.get_flag("is-override"),
        generic_parameters: read_generic_parameters(element)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tree::{CharSet, Layout},
        Error,
    };

    fn sample() -> AssemblyTree {
        let method = MemberRecord {
            name: "TryGet(System.Int32, out System.String&)".into(),
            attrib: 0x0086,
            attributes: vec![],
            detail: MemberDetail::Method(MethodDetail {
                return_type: Some("System.Boolean".into()),
                parameters: vec![
                    ParameterRecord {
                        name: "key".into(),
                        position: 0,
                        param_type: "System.Int32".into(),
                        ..Default::default()
                    },
                    ParameterRecord {
                        name: "value".into(),
                        position: 1,
                        attrib: 2,
                        param_type: "System.String&".into(),
                        direction: Direction::Out,
                        ..Default::default()
                    },
                ],
                flags: SignatureFlags {
                    is_virtual: true,
                    ..Default::default()
                },
                is_override: false,
                generic_parameters: vec![],
            }),
        };
        let ty = TypeRecord {
            name: "Lookup".into(),
            kind: TypeKind::Class,
            base: Some("System.Object".into()),
            is_serializable: true,
            charset: CharSet::Ansi,
            layout: Some(Layout::AutoLayout),
            attributes: vec![AttributeRecord::new("System.ObsoleteAttribute")
                .with_property("IsError", Some("False"))
                .with_property("Message", None)],
            interfaces: vec!["System.IDisposable".into()],
            methods: vec![method],
            ..Default::default()
        };
        AssemblyTree {
            name: "Contoso.Sample".into(),
            version: "1.0.0.0".into(),
            attributes: vec![],
            namespaces: vec![NamespaceRecord {
                name: "Contoso.Sample".into(),
                types: vec![ty],
            }],
        }
    }

    #[test]
    fn document_round_trip() {
        let tree = sample();
        let text = to_xml(&tree).unwrap();
        assert!(text.contains("returntype=\"System.Boolean\""));
        assert!(text.contains("<property name=\"Message\"/>"), "{text}");
        assert_eq!(from_xml(&text).unwrap(), tree);
    }

    #[test]
    fn null_and_null_string_properties_stay_apart() {
        let mut tree = sample();
        tree.attributes = vec![AttributeRecord::new("System.Reflection.AssemblyTitleAttribute")
            .with_property("Title", Some("null"))
            .with_property("Description", None)];

        let text = to_xml(&tree).unwrap();
        assert!(text.contains("<property name=\"Title\" value=\"null\"/>"), "{text}");

        let reloaded = from_xml(&text).unwrap();
        assert_eq!(reloaded.attributes[0].property("Title"), Some(Some("null")));
        assert_eq!(reloaded.attributes[0].property("Description"), Some(None));
        assert_eq!(reloaded, tree);
    }

    #[test]
    fn missing_required_attribute_is_fatal() {
        let text = r#"<assemblies><assembly name="A"><namespaces><namespace name="N"><classes><class type="class"/></classes></namespace></namespaces></assembly></assemblies>"#;
        assert!(matches!(from_xml(text), Err(Error::Malformed { .. })));
        assert!(matches!(from_xml("<assemblies/>"), Err(Error::Malformed { .. })));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let text = r#"<assembly name="A"><namespaces><namespace name="N"><classes><class name="C" type="record"/></classes></namespace></namespaces></assembly>"#;
        assert!(from_xml(text).is_err());
    }
}
