//! Delimiter-joined path lookup.
//!
//! A path like `user.addresses.0.city` is split on the delimiter and walked one segment at
//! a time. Object keys may themselves contain the delimiter: at each object the whole
//! remaining suffix is tried as one key first, then the single current segment, and only
//! then the runs in between (longest first). A `(node, segment)` state that failed once is
//! never walked again, so lookups stay polynomial in the path length.

use std::collections::HashSet;

use crate::error::{Result, SearchError};
use crate::node::NodeRef;
use crate::tree::{Node, NodeId, Tree};

/// Segment names that reach inherited prototype state in JavaScript-shaped data. They never
/// resolve, even when the data has an own key with that name.
pub const RESERVED_SEGMENTS: [&str; 3] = ["__proto__", "constructor", "prototype"];

pub fn is_reserved(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

/// Reject paths with no usable segment: empty, blank, one delimiter or two delimiters.
pub fn validate_path(path: &str, delimiter: &str) -> Result<()> {
    if path.is_empty() || path == delimiter || path == format!("{delimiter}{delimiter}") {
        return Err(SearchError::path(path, "Invalid path"));
    }
    if path.trim().is_empty() {
        return Err(SearchError::path(path, "Path cannot be empty"));
    }
    Ok(())
}

/// Resolve `path` from the root. `None` means not found, including any reserved segment.
pub fn resolve<'t>(tree: &'t Tree, path: &str, delimiter: &str) -> Option<NodeRef<'t>> {
    let segments: Vec<&str> = path.split(delimiter).collect();
    if segments.iter().any(|s| is_reserved(s)) {
        return None;
    }
    Resolver::new(tree, &segments, delimiter)
        .resolve_at(tree.root(), 0)
        .map(|id| NodeRef::new(tree, id))
}

struct Resolver<'a> {
    tree: &'a Tree,
    segments: &'a [&'a str],
    delimiter: &'a str,
    failed: HashSet<(NodeId, usize)>,
}

impl<'a> Resolver<'a> {
    fn new(tree: &'a Tree, segments: &'a [&'a str], delimiter: &'a str) -> Self {
        Self {
            tree,
            segments,
            delimiter,
            failed: HashSet::new(),
        }
    }

    /// Resolve `segments[at..]` starting at node `id`.
    fn resolve_at(&mut self, id: NodeId, at: usize) -> Option<NodeId> {
        if at == self.segments.len() {
            return Some(id);
        }
        if self.failed.contains(&(id, at)) {
            return None;
        }

        let tree = self.tree;
        let node = tree.node(id);
        let found = match node {
            Node::Array(items) => parse_index(self.segments[at])
                .and_then(|index| items.get(index).copied())
                .and_then(|child| self.resolve_at(child, at + 1)),
            Node::Object(_) => run_lengths(self.segments.len() - at).find_map(|take| {
                let key = self.segments[at..at + take].join(self.delimiter);
                let child = node.get(&key)?;
                self.resolve_at(child, at + take)
            }),
            _ => None,
        };

        if found.is_none() {
            self.failed.insert((id, at));
        }
        found
    }
}

/// Candidate key lengths at an object with `remaining` segments left: the whole suffix,
/// then the single segment, then the runs in between from longest to shortest.
fn run_lengths(remaining: usize) -> impl Iterator<Item = usize> {
    std::iter::once(remaining)
        .chain((remaining > 1).then_some(1))
        .chain((2..remaining).rev())
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
