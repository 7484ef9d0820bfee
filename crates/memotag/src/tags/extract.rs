//! Tag and property extraction from a content tree.

use super::normalize_tag_path;
use crate::content::{walk, ContainerKind, Leaf, Node};
use crate::model::MemoPayload;

/// Canonical tag paths in pre-order, first occurrence wins.
pub fn extract_tags(nodes: &[Node]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    walk(nodes, &mut |node: &Node| {
        if let Node::Leaf(Leaf::Tag(raw)) = node {
            push_unique(&mut tags, normalize_tag_path(raw));
        }
    });
    tags
}

/// Computes the full payload for a memo from its parsed content.
///
/// The result replaces whatever payload the memo had before.
pub fn build_payload(nodes: &[Node]) -> MemoPayload {
    let mut payload = MemoPayload::default();
    walk(nodes, &mut |node: &Node| match node {
        Node::Leaf(Leaf::Tag(raw)) => push_unique(&mut payload.tags, normalize_tag_path(raw)),
        Node::Leaf(Leaf::Link { .. }) | Node::Leaf(Leaf::AutoLink { .. }) => {
            payload.property.has_link = true;
        }
        Node::Leaf(Leaf::CodeBlock { .. }) => payload.property.has_code = true,
        Node::Leaf(Leaf::EmbeddedContent { resource }) => {
            payload.property.references.push(resource.clone());
        }
        Node::Container(c) => {
            if let ContainerKind::TaskListItem { complete } = c.kind {
                payload.property.has_task_list = true;
                if !complete {
                    payload.property.has_incomplete_tasks = true;
                }
            }
        }
        _ => {}
    });
    payload
}

fn push_unique(tags: &mut Vec<String>, path: String) {
    if !tags.contains(&path) {
        tags.push(path);
    }
}
