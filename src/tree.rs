use serde_json::{Number, Value};
use crate::error::{Result, SearchError};

/// Handle to a node inside one [`Tree`] / [`TreeBuilder`].
///
/// Containers are identified by their id, so two parents holding the same id share one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<NodeId>),
    // insertion order is traversal order
    Object(Vec<(String, NodeId)>),
}

impl Node {
    pub(crate) fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }

    /// Own-key lookup on an object; `None` for anything else.
    pub(crate) fn get(&self, key: &str) -> Option<NodeId> {
        match self {
            Node::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, id)| *id),
            _ => None,
        }
    }
}

/// An immutable tree of JSON-shaped values.
///
/// Nodes live in one arena; containers refer to children by [`NodeId`]. A tree built from
/// `serde_json::Value` is always acyclic, one assembled through [`TreeBuilder`] may alias
/// subtrees or even contain cycles, which `Search` rejects at construction.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of distinct nodes, shared nodes counted once.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        let mut builder = TreeBuilder::new();
        let root = builder.value(value);
        Tree { nodes: builder.nodes, root }
    }
}

/// Assembles a [`Tree`] node by node.
///
/// ```
/// use json_probe::TreeBuilder;
/// use serde_json::json;
///
/// let mut b = TreeBuilder::new();
/// let root = b.object();
/// let shared = b.value(json!({"id": 7}));
/// b.insert(root, "left", shared).unwrap();
/// b.insert(root, "right", shared).unwrap();
/// let tree = b.build(root).unwrap();
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(SearchError::Type(format!("Node {} does not belong to this tree", id.0)))
        }
    }

    pub fn object(&mut self) -> NodeId {
        self.add(Node::Object(Vec::new()))
    }

    pub fn array(&mut self) -> NodeId {
        self.add(Node::Array(Vec::new()))
    }

    /// An absent value; distinct from `null` but rendered as `null` in JSON.
    pub fn undefined(&mut self) -> NodeId {
        self.add(Node::Undefined)
    }

    /// Import a JSON value, recursively, as fresh nodes.
    pub fn value(&mut self, value: Value) -> NodeId {
        match value {
            Value::Null => self.add(Node::Null),
            Value::Bool(b) => self.add(Node::Bool(b)),
            Value::Number(n) => self.add(Node::Number(n)),
            Value::String(s) => self.add(Node::String(s)),
            Value::Array(items) => {
                let children = items.into_iter().map(|item| self.value(item)).collect();
                self.add(Node::Array(children))
            }
            Value::Object(map) => {
                let entries = map.into_iter().map(|(k, v)| (k, self.value(v))).collect();
                self.add(Node::Object(entries))
            }
        }
    }

    /// Set `key` on `object`. An existing key keeps its position and takes the new child.
    pub fn insert(&mut self, object: NodeId, key: impl Into<String>, child: NodeId) -> Result<()> {
        self.check(object)?;
        self.check(child)?;
        let key = key.into();
        match &mut self.nodes[object.0] {
            Node::Object(entries) => {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = child,
                    None => entries.push((key, child)),
                }
                Ok(())
            }
            _ => Err(SearchError::Type(format!("Cannot insert \"{key}\": node {} is not an object", object.0))),
        }
    }

    pub fn push(&mut self, array: NodeId, child: NodeId) -> Result<()> {
        self.check(array)?;
        self.check(child)?;
        match &mut self.nodes[array.0] {
            Node::Array(items) => {
                items.push(child);
                Ok(())
            }
            _ => Err(SearchError::Type(format!("Cannot push: node {} is not an array", array.0))),
        }
    }

    pub fn build(self, root: NodeId) -> Result<Tree> {
        self.check(root)?;
        Ok(Tree { nodes: self.nodes, root })
    }
}
