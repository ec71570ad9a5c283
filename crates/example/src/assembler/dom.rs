//! XML output.

use super::naming::QName;
use super::{ExampleTree, NodeId, TreeAssembler};
use crate::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Assembler producing an [`XmlDocument`].
pub type DomAssembler<'m> = TreeAssembler<'m, XmlDocument>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    pub name: QName,
    /// Unqualified attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Arena of XML elements with a single root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlDocument {
    elements: Vec<XmlElement>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, node: NodeId) -> Option<&XmlElement> {
        self.elements.get(node.index())
    }

    pub fn root_element(&self) -> Option<&XmlElement> {
        self.root.and_then(|root| self.element(root))
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = &XmlElement> {
        self.element(node)
            .map(|element| element.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.element(*child))
    }

    /// Every element with the given local name, in document order.
    pub fn find_all(&self, local: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, local, &mut found);
        }
        found
    }

    fn collect<'a>(&'a self, node: NodeId, local: &str, found: &mut Vec<&'a XmlElement>) {
        if let Some(element) = self.element(node) {
            if element.name.local == local {
                found.push(element);
            }
            for child in &element.children {
                self.collect(*child, local, found);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// `(prefix, namespace)` pairs used by the document, in first-use order.
    ///
    /// Every namespace is declared once. A prefix already bound to another
    /// namespace gets a numeric suffix (`c`, `c2`, `c3`), and serialization
    /// writes element names with these prefixes.
    pub fn namespaces(&self) -> Vec<(String, String)> {
        let mut namespaces: Vec<(String, String)> = Vec::new();
        for element in &self.elements {
            let name = &element.name;
            if name.namespace.is_empty() || namespaces.iter().any(|(_, namespace)| *namespace == name.namespace) {
                continue;
            }

            let base = if name.prefix.is_empty() { "ns" } else { name.prefix.as_str() };
            let mut prefix = name.prefix.clone();
            let mut suffix = 1;
            while namespaces.iter().any(|(taken, _)| *taken == prefix) {
                suffix += 1;
                prefix = format!("{}{}", base, suffix);
            }
            namespaces.push((prefix, name.namespace.clone()));
        }
        namespaces
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(writer, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if let Some(root) = self.root {
            let namespaces = self.namespaces();
            self.write_element(&mut writer, root, &namespaces, true)?;
        }
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_element<W: Write>(
        &self,
        writer: &mut Writer<W>,
        node: NodeId,
        namespaces: &[(String, String)],
        is_root: bool,
    ) -> Result<()> {
        let Some(element) = self.element(node) else {
            return Ok(());
        };

        let qualified = qualified_name(&element.name, namespaces);
        let mut start = BytesStart::new(qualified.as_str());
        if is_root {
            for (prefix, namespace) in namespaces {
                let key = if prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{}", prefix)
                };
                start.push_attribute((key.as_str(), namespace.as_str()));
            }
        }
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let text = element.text.as_deref().filter(|text| !text.is_empty());
        if element.children.is_empty() && text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &element.children {
            self.write_element(writer, *child, namespaces, false)?;
        }
        writer.write_event(Event::End(BytesEnd::new(qualified.as_str())))?;
        Ok(())
    }
}

/// `name` qualified with the prefix its namespace was declared under.
fn qualified_name(name: &QName, namespaces: &[(String, String)]) -> String {
    match namespaces.iter().find(|(_, namespace)| *namespace == name.namespace) {
        Some((prefix, _)) if prefix.is_empty() => name.local.clone(),
        Some((prefix, _)) => format!("{}:{}", prefix, name.local),
        None => name.qualified(),
    }
}

impl ExampleTree for XmlDocument {
    fn add_element(&mut self, parent: Option<NodeId>, name: QName) -> NodeId {
        let node = NodeId::new(self.elements.len());
        self.elements.push(XmlElement {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent,
        });
        match parent.and_then(|parent| self.elements.get_mut(parent.index())) {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
        node
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.elements.get_mut(node.index()) {
            element.text = Some(text.to_string());
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(node.index()) {
            match element.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => element.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(|element| element.parent)
    }

    fn element_name(&self, node: NodeId) -> Option<&QName> {
        self.element(node).map(|element| &element.name)
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.root = None;
    }
}
