//! Tag editing, in two deliberately different flavours.
//!
//! ## Substring editing (global operations)
//!
//! [`strip_tag_marker`] and [`replace_tag_marker`] work on raw content with
//! plain substring replacement of the marker (`#work`). They do not look at
//! markdown structure at all: a marker inside a code block is edited too, and
//! so is the front of a longer tag sharing the same text (`#workshop`).
//! Stripping trims the whole result.
//!
//! ## Structural editing (single-memo operations)
//!
//! [`remove_tag_from_nodes`] and [`rename_tag_in_nodes`] work on the parsed
//! tree and only touch real [`Leaf::Tag`] nodes whose canonical path matches.
//! Removal drops the node and nothing else; the text on either side is kept
//! as is, so `a #x b` becomes `a  b`.

use super::{normalize_tag_path, tag_marker};
use crate::content::{walk_leaves_mut, Leaf, Node};

/// Removes every `marker + " "`, then every bare marker, then trims.
///
/// ```
/// use memotag::tags::remove::strip_tag_marker;
///
/// assert_eq!(
///     strip_tag_marker("This is a memo with #work #project tags", "/work"),
///     "This is a memo with #project tags"
/// );
/// ```
pub fn strip_tag_marker(content: &str, path: &str) -> String {
    let marker = tag_marker(path);
    content
        .replace(&format!("{} ", marker), "")
        .replace(&marker, "")
        .trim()
        .to_string()
}

/// Replaces every occurrence of the old marker with the new one.
pub fn replace_tag_marker(content: &str, old_path: &str, new_path: &str) -> String {
    content.replace(&tag_marker(old_path), &tag_marker(new_path))
}

fn is_tag_on(node: &Node, path: &str) -> bool {
    matches!(node, Node::Leaf(Leaf::Tag(raw)) if normalize_tag_path(raw) == path)
}

/// Drops the tag leaves whose canonical path is `path`. Returns how many went.
pub fn remove_tag_from_nodes(nodes: &mut Vec<Node>, path: &str) -> usize {
    let before = nodes.len();
    nodes.retain(|node| !is_tag_on(node, path));
    let mut removed = before - nodes.len();
    for node in nodes.iter_mut() {
        if let Some(children) = node.children_mut() {
            removed += remove_tag_from_nodes(children, path);
        }
    }
    removed
}

/// Points every tag leaf on `old_path` at `new_path`. Returns how many changed.
pub fn rename_tag_in_nodes(nodes: &mut [Node], old_path: &str, new_path: &str) -> usize {
    let replacement = new_path.strip_prefix('/').unwrap_or(new_path).to_string();
    let mut renamed = 0;
    walk_leaves_mut(nodes, &mut |leaf: &mut Leaf| {
        if let Leaf::Tag(raw) = leaf {
            if normalize_tag_path(raw) == old_path {
                *raw = replacement.clone();
                renamed += 1;
            }
        }
    });
    renamed
}
