use std::convert::Infallible;
use crate::config::MaxDepth;
use crate::node::NodeRef;
use crate::tree::{Node, NodeId, Tree};

/// Depth-first, pre-order walk over every entry below the root.
///
/// `visit` receives the entry's value, its own key (array indices as strings) and the full
/// key path from the root, ending with that key. Entries are visited in array index order
/// and object insertion order. A container whose path already has `max_depth` segments is
/// visited but not descended into. The first error returned by `visit` stops the walk and
/// is handed back unchanged.
pub fn walk<'t, E, F>(tree: &'t Tree, max_depth: MaxDepth, mut visit: F) -> Result<(), E>
where
    F: FnMut(NodeRef<'t>, &str, &[String]) -> Result<(), E>,
{
    let mut path = Vec::new();
    descend(tree, tree.root(), &mut path, max_depth, &mut visit)
}

/// [`walk`] for visitors that cannot fail.
pub fn visit_all<'t, F>(tree: &'t Tree, max_depth: MaxDepth, mut visit: F)
where
    F: FnMut(NodeRef<'t>, &str, &[String]),
{
    let outcome = walk(tree, max_depth, |value, key, path| {
        visit(value, key, path);
        Ok::<_, Infallible>(())
    });
    if let Err(never) = outcome {
        match never {}
    }
}

fn descend<'t, E, F>(
    tree: &'t Tree,
    id: NodeId,
    path: &mut Vec<String>,
    max_depth: MaxDepth,
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(NodeRef<'t>, &str, &[String]) -> Result<(), E>,
{
    if max_depth.reached(path.len()) {
        return Ok(());
    }

    match tree.node(id) {
        Node::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                entry(tree, *child, path, max_depth, visit)?;
                path.pop();
            }
        }
        Node::Object(entries) => {
            for (key, child) in entries {
                path.push(key.clone());
                entry(tree, *child, path, max_depth, visit)?;
                path.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn entry<'t, E, F>(
    tree: &'t Tree,
    id: NodeId,
    path: &mut Vec<String>,
    max_depth: MaxDepth,
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(NodeRef<'t>, &str, &[String]) -> Result<(), E>,
{
    let value = NodeRef::new(tree, id);
    if let Some(key) = path.last() {
        visit(value, key, path.as_slice())?;
    }
    if value.is_container() {
        descend(tree, id, path, max_depth, visit)?;
    }
    Ok(())
}
