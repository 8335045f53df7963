use std::fmt;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};
use crate::tree::{Node, NodeId, Tree};

/// Borrowed view of one value inside a validated tree.
///
/// Only handed out by `Search`, whose tree is known to be acyclic, so every recursive
/// operation here terminates.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub(crate) fn node(&self) -> &'t Node {
        self.tree.node(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// "object" | "array" | "string" | "number" | "boolean" | "null" | "undefined"
    pub fn type_name(&self) -> &'static str {
        match self.node() {
            Node::Object(_) => "object",
            Node::Array(_) => "array",
            Node::String(_) => "string",
            Node::Number(_) => "number",
            Node::Bool(_) => "boolean",
            Node::Null => "null",
            Node::Undefined => "undefined",
        }
    }

    pub fn is_container(&self) -> bool {
        self.node().is_container()
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.node(), Node::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node(), Node::Null)
    }

    pub fn as_str(&self) -> Option<&'t str> {
        match self.node() {
            Node::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&'t Number> {
        match self.node() {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Entry count of a container, 0 for primitives.
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Array(items) => items.len(),
            Node::Object(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Own-key lookup on an object.
    pub fn get(&self, key: &str) -> Option<NodeRef<'t>> {
        self.node().get(key).map(|id| NodeRef::new(self.tree, id))
    }

    pub fn index(&self, index: usize) -> Option<NodeRef<'t>> {
        match self.node() {
            Node::Array(items) => items.get(index).map(|id| NodeRef::new(self.tree, *id)),
            _ => None,
        }
    }

    /// Container entries in traversal order, array indices stringified.
    pub fn entries(&self) -> Vec<(String, NodeRef<'t>)> {
        match self.node() {
            Node::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, id)| (i.to_string(), NodeRef::new(self.tree, *id)))
                .collect(),
            Node::Object(entries) => entries
                .iter()
                .map(|(k, id)| (k.clone(), NodeRef::new(self.tree, *id)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Deep copy into a `serde_json::Value`; undefined becomes `null`.
    pub fn to_json(&self) -> Value {
        match self.node() {
            Node::Undefined | Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Array(items) => Value::Array(
                items.iter().map(|id| NodeRef::new(self.tree, *id).to_json()).collect(),
            ),
            Node::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, id)| (k.clone(), NodeRef::new(self.tree, *id).to_json()))
                    .collect(),
            ),
        }
    }

    /// Short one-line rendering for listings.
    pub fn preview(&self, max: usize) -> String {
        match self.node() {
            Node::Object(m) if m.is_empty() => format!("{{}} {} keys", m.len()),
            Node::Object(m) => format!("{{…}} {} keys", m.len()),
            Node::Array(a) if a.is_empty() => format!("[] {} items", a.len()),
            Node::Array(a) => format!("[…] {} items", a.len()),
            Node::String(s) => truncate(s, max),
            Node::Number(n) => n.to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Null => "null".into(),
            Node::Undefined => "undefined".into(),
        }
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

// Structural equality; also holds across different trees.
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self.tree, other.tree) && self.id == other.id {
            return true;
        }
        match (self.node(), other.node()) {
            (Node::Undefined, Node::Undefined) | (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        NodeRef::new(self.tree, *x) == NodeRef::new(other.tree, *y)
                    })
            }
            (Node::Object(a), Node::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, x)| {
                        other.node().get(k).is_some_and(|y| {
                            NodeRef::new(self.tree, *x) == NodeRef::new(other.tree, y)
                        })
                    })
            }
            _ => false,
        }
    }
}

impl PartialEq<Value> for NodeRef<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (self.node(), other) {
            (Node::Null, Value::Null) => true,
            (Node::Bool(a), Value::Bool(b)) => a == b,
            (Node::Number(a), Value::Number(b)) => a == b,
            (Node::String(a), Value::String(b)) => a == b,
            (Node::Array(a), Value::Array(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| NodeRef::new(self.tree, *x) == *y)
            }
            (Node::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, x)| {
                        b.get(k).is_some_and(|y| NodeRef::new(self.tree, *x) == *y)
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return f.write_str("undefined");
        }
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node() {
            Node::Undefined | Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for id in items {
                    seq.serialize_element(&NodeRef::new(self.tree, *id))?;
                }
                seq.end()
            }
            Node::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, id) in entries {
                    map.serialize_entry(k, &NodeRef::new(self.tree, *id))?;
                }
                map.end()
            }
        }
    }
}
