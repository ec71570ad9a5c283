//! JSON output.
//!
//! Elements become object keys by local name. Attributes sit beside child
//! elements, and an element with both attributes and text keeps the text
//! under `"value"`. A key seen a second time under the same parent turns
//! into an array.

use super::naming::QName;
use super::{ExampleTree, NodeId, TreeAssembler};
use crate::Result;
use serde_json::{Map, Value};

/// Assembler producing a [`JsonTree`].
pub type JsonAssembler<'m> = TreeAssembler<'m, JsonTree>;

/// Key under which text content is stored when a node also has attributes
/// or children.
pub const TEXT_KEY: &str = "value";

#[derive(Clone, Debug, PartialEq, Eq)]
enum JsonMember {
    One(NodeId),
    Many(Vec<NodeId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct JsonNode {
    name: QName,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    members: Vec<(String, JsonMember)>,
    parent: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonTree {
    nodes: Vec<JsonNode>,
    root: Option<NodeId>,
}

impl JsonTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local name of the root element, used as the outermost key.
    pub fn root_name(&self) -> Option<&str> {
        self.root
            .and_then(|root| self.nodes.get(root.index()))
            .map(|node| node.name.local.as_str())
    }

    /// The document as `{rootName: content}`, or `null` when empty.
    pub fn to_value(&self) -> Value {
        let Some(root) = self.root else {
            return Value::Null;
        };
        let mut document = Map::new();
        if let Some(node) = self.nodes.get(root.index()) {
            document.insert(node.name.local.clone(), self.node_value(root));
        }
        Value::Object(document)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    fn node_value(&self, id: NodeId) -> Value {
        let Some(node) = self.nodes.get(id.index()) else {
            return Value::Null;
        };

        if node.attributes.is_empty() && node.members.is_empty() {
            return Value::String(node.text.clone().unwrap_or_default());
        }

        let mut object = Map::new();
        for (key, value) in &node.attributes {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        for (key, member) in &node.members {
            let value = match member {
                JsonMember::One(child) => self.node_value(*child),
                JsonMember::Many(children) => {
                    Value::Array(children.iter().map(|child| self.node_value(*child)).collect())
                }
            };
            object.insert(key.clone(), value);
        }
        if let Some(text) = &node.text {
            object.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
        }
        Value::Object(object)
    }
}

impl ExampleTree for JsonTree {
    fn add_element(&mut self, parent: Option<NodeId>, name: QName) -> NodeId {
        let node = NodeId::new(self.nodes.len());
        let key = name.local.clone();
        self.nodes.push(JsonNode {
            name,
            attributes: Vec::new(),
            text: None,
            members: Vec::new(),
            parent,
        });

        let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(parent.index())) else {
            self.root = Some(node);
            return node;
        };
        match parent.members.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, member)) => {
                *member = match std::mem::replace(member, JsonMember::Many(Vec::new())) {
                    JsonMember::One(previous) => JsonMember::Many(vec![previous, node]),
                    JsonMember::Many(mut nodes) => {
                        nodes.push(node);
                        JsonMember::Many(nodes)
                    }
                };
            }
            None => parent.members.push((key, JsonMember::One(node))),
        }
        node
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(node.index()) {
            node.text = Some(text.to_string());
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(node.index()) {
            match node.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => node.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|node| node.parent)
    }

    fn element_name(&self, node: NodeId) -> Option<&QName> {
        self.nodes.get(node.index()).map(|node| &node.name)
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}
