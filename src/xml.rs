//! A minimal element model for the XML documents this crate reads and writes.
//!
//! API trees and diff trees are small enough to be built completely in memory, so both
//! document formats go through [`Element`]: builders produce an element tree and [`write`]
//! serializes it, and [`parse`] turns a document back into elements for the tree loader.
//! Text content is not used by either format and is dropped while parsing.

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, Event},
    Reader, Writer,
};

use crate::{Error, Result};

/// An XML element with attributes and child elements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    /// Append an attribute when `value` is present.
    #[must_use]
    pub fn attr_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    /// Append an attribute with value `true` when `flag` is set.
    #[must_use]
    pub fn flag(self, key: &str, flag: bool) -> Self {
        if flag {
            self.attr(key, "true")
        } else {
            self
        }
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element in place.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Value of attribute `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a mandatory attribute.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] when the attribute is absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            malformed_error!("<{}> is missing required attribute '{}'", self.name, key)
        })
    }

    /// `true` when attribute `key` is `true` (case-insensitive).
    #[must_use]
    pub fn get_flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Parse attribute `key` with [`std::str::FromStr`].
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] when the value does not parse.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                malformed_error!("<{}> has invalid value '{}' for '{}'", self.name, raw, key)
            }),
        }
    }

    /// First child named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Children named `name`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Children of the group element `group` that are named `item`.
    ///
    /// `<fields><field/><field/></fields>` style groups are optional: a missing group yields
    /// no items.
    pub fn group<'a>(&'a self, group: &'a str, item: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.find(group).into_iter().flat_map(move |g| g.find_all(item))
    }
}

/// Serialize an element tree as an indented UTF-8 document with an XML declaration.
///
/// # Errors
/// Returns [`Error::Xml`] if the writer fails.
pub fn write(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(Error::xml)?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(Error::xml)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(Error::xml);
    }

    writer.write_event(Event::Start(start)).map_err(Error::xml)?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(Error::xml)
}

fn read_start(start: &BytesStart) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(Error::xml)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Parse a document into its root element.
///
/// # Errors
/// Returns [`Error::Xml`] for syntax errors and [`Error::Malformed`] for documents without a
/// root element or with unbalanced tags.
pub fn parse(text: &str) -> Result<Element> {
    let mut reader = Reader::from_reader(text.as_bytes());
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(Error::xml)?;
        match event {
            Event::Start(start) => stack.push(read_start(&start)?),
            Event::Empty(start) => {
                let element = read_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(malformed_error!("Document has more than one root")),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed_error!("Unbalanced closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(malformed_error!("Document has more than one root")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(malformed_error!("Document ended inside <{}>", stack[stack.len() - 1].name));
    }
    root.ok_or_else(|| malformed_error!("Document has no root element"))
}
