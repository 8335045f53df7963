use std::collections::HashSet;
use crate::error::{Result, SearchError};
use crate::tree::{Node, NodeId, Tree};

/// Reject trees where a container is its own descendant.
///
/// Only containers on the current descent are tracked, so a subtree reached from two
/// different parents is accepted; only re-entering an active ancestor is an error. The
/// error names the path, joined with `delimiter`, at which the ancestor was reached again.
/// A container whose subtree was already checked is not descended into again.
pub fn detect_circular(tree: &Tree, delimiter: &str) -> Result<()> {
    let mut marks = Marks::default();
    let mut path = Vec::new();
    visit(tree, tree.root(), &mut path, &mut marks, delimiter)
}

#[derive(Default)]
struct Marks {
    ancestors: HashSet<NodeId>,
    finished: HashSet<NodeId>,
}

fn visit(
    tree: &Tree,
    id: NodeId,
    path: &mut Vec<String>,
    marks: &mut Marks,
    delimiter: &str,
) -> Result<()> {
    let node = tree.node(id);
    if !node.is_container() || marks.finished.contains(&id) {
        return Ok(());
    }
    if !marks.ancestors.insert(id) {
        return Err(SearchError::CircularReference { path: path.join(delimiter) });
    }

    match node {
        Node::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                visit(tree, *child, path, marks, delimiter)?;
                path.pop();
            }
        }
        Node::Object(entries) => {
            for (key, child) in entries {
                path.push(key.clone());
                visit(tree, *child, path, marks, delimiter)?;
                path.pop();
            }
        }
        _ => {}
    }

    marks.ancestors.remove(&id);
    marks.finished.insert(id);
    Ok(())
}
