//! Parent/child links and rolled-up counts over a [`TagMap`].
//!
//! Links only connect paths present in the map. A node's parent is its path
//! minus the last segment, and only when that path is itself a node; missing
//! ancestors are not synthesized.

use super::{is_direct_child, parent_path, TagMap};
use std::collections::HashSet;

/// Fills `child_paths`, `parent_path` and `total_count` on every node.
pub fn build_hierarchy(map: &mut TagMap) {
    let mut links: Vec<(String, Vec<String>, Option<String>)> = Vec::with_capacity(map.len());
    let view: &TagMap = map;
    for path in view.keys() {
        let prefix = format!("{}/", path);
        let children: Vec<String> = view
            .range(prefix.clone()..)
            .take_while(|(other, _)| other.starts_with(&prefix))
            .filter(|(other, _)| is_direct_child(path, other))
            .map(|(other, _)| other.clone())
            .collect();
        let parent = parent_path(path)
            .filter(|p| view.contains_key(*p))
            .map(str::to_string);
        links.push((path.clone(), children, parent));
    }

    for (path, children, parent) in links {
        if let Some(node) = map.get_mut(&path) {
            node.child_paths = children;
            node.parent_path = parent;
        }
    }

    let linked: &TagMap = map;
    let totals: Vec<(String, usize)> = linked
        .keys()
        .map(|path| (path.clone(), total_count(linked, path)))
        .collect();
    for (path, total) in totals {
        if let Some(node) = map.get_mut(&path) {
            node.total_count = total;
        }
    }
}

/// `direct_count` of `path` plus the totals of its `child_paths`, recursively.
///
/// Each path is counted at most once per call, so a map whose links form a
/// cycle still yields a finite result. Missing paths count as zero.
pub fn total_count(map: &TagMap, path: &str) -> usize {
    let mut visited = HashSet::new();
    count_subtree(map, path, &mut visited)
}

fn count_subtree<'a>(map: &'a TagMap, path: &'a str, visited: &mut HashSet<&'a str>) -> usize {
    if !visited.insert(path) {
        return 0;
    }
    let Some(node) = map.get(path) else {
        return 0;
    };
    let mut total = node.direct_count;
    for child in &node.child_paths {
        total += count_subtree(map, child, visited);
    }
    total
}
