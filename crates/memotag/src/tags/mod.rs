//! # Hierarchical Tags
//!
//! Tags are written inline in memo content as `#work/project1/backend`. Each
//! one maps to a canonical **tag path**: a leading `/`, segments separated by
//! `/`, no empty segments, no trailing slash (`/work/project1/backend`).
//! Paths compare byte for byte, so `/Work` and `/work` are different tags.
//!
//! ## Pipeline
//!
//! - [`extract`]: content tree → ordered unique paths + memo properties.
//! - [`aggregate`]: many memos' cached paths → ephemeral [`TagMap`].
//! - [`hierarchy`]: parent/child links and rolled-up counts over a map.
//! - [`remove`]: the two tag editing strategies. The substring editor works on
//!   raw text and trims the result. The structural remover works on the node
//!   tree and leaves whitespace alone. They are kept apart on purpose since
//!   their output differs.
//!
//! ## Ancestors
//!
//! A path appears in a [`TagMap`] only if at least one memo carries it
//! directly. `/work/a` tagged alone produces no `/work` node.

pub mod aggregate;
pub mod extract;
pub mod hierarchy;
pub mod remove;
pub mod validation;

pub use aggregate::{aggregate, filter_by_prefix, TagMap, TagNode};
pub use extract::{build_payload, extract_tags};
pub use hierarchy::{build_hierarchy, total_count};

/// Canonical form of a raw tag: leading `/`, empty segments dropped.
///
/// ```
/// use memotag::tags::normalize_tag_path;
///
/// assert_eq!(normalize_tag_path("work/project"), "/work/project");
/// assert_eq!(normalize_tag_path("/work//project/"), "/work/project");
/// assert_eq!(normalize_tag_path("///"), "/");
/// ```
pub fn normalize_tag_path(raw: &str) -> String {
    format!("/{}", path_segments(raw).join("/"))
}

/// Non-empty `/`-separated components. Empty for an all-slash input.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The text form of a tag as written in content: `/a/b` → `#a/b`.
pub fn tag_marker(path: &str) -> String {
    format!("#{}", path.strip_prefix('/').unwrap_or(path))
}

/// `/a/b/c` → `/a/b`. Top-level paths have no parent.
pub fn parent_path(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(idx) if idx > 0 => Some(&path[..idx]),
        _ => None,
    }
}

/// `other` sits exactly one level below `parent`.
pub fn is_direct_child(parent: &str, other: &str) -> bool {
    other
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// `path` equals `ancestor` or lives anywhere below it.
pub fn is_same_or_descendant(ancestor: &str, path: &str) -> bool {
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}
