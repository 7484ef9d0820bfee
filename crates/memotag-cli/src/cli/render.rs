//! Text rendering for command results.
//!
//! Every function returns a `String`; printing happens in `commands.rs`.

use colored::Colorize;
use memotag::api::{
    BatchDeleteResponse, DeleteTagResponse, ListTagsResponse, MemoTagResponse, RebuildReport,
    RenameTagResponse,
};
use memotag::model::Memo;
use memotag::tags::TagNode;
use std::collections::HashSet;

const DEFAULT_WIDTH: usize = 80;
const ID_WIDTH: usize = 8;

fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

fn short_id(memo: &Memo) -> String {
    memo.id.to_string()[..ID_WIDTH].to_string()
}

fn first_line(content: &str) -> &str {
    content.lines().find(|l| !l.trim().is_empty()).unwrap_or("")
}

pub fn render_memo_list(memos: &[Memo]) -> String {
    if memos.is_empty() {
        return format!("{}\n", "No memos.".dimmed());
    }
    let width = terminal_width();
    let mut out = String::new();
    for memo in memos {
        let tags = memo.payload.tags.join(" ");
        let room = width.saturating_sub(ID_WIDTH + 2 + console::measure_text_width(&tags) + 2);
        let preview = console::truncate_str(first_line(&memo.content), room.max(10), "…");
        out.push_str(&format!(
            "{}  {}  {}\n",
            short_id(memo).dimmed(),
            preview,
            tags.cyan()
        ));
    }
    out
}

pub fn render_memo(memo: &Memo) -> String {
    let mut out = format!("{}\n", memo.name().bold());
    if let Some(parent) = memo.parent_id {
        out.push_str(&format!("{} memos/{}\n", "comment on".dimmed(), parent));
    }
    out.push_str(&format!(
        "{} {}\n",
        "updated".dimmed(),
        memo.updated_at.format("%Y-%m-%d %H:%M")
    ));
    if !memo.payload.tags.is_empty() {
        out.push_str(&format!("{} {}\n", "tags".dimmed(), memo.payload.tags.join(" ").cyan()));
    }
    out.push('\n');
    out.push_str(&memo.content);
    if !memo.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn counts(node: &TagNode) -> String {
    if node.total_count == node.direct_count {
        format!("{}", node.direct_count)
    } else {
        format!("{}/{}", node.direct_count, node.total_count)
    }
}

fn ids_suffix(node: &TagNode) -> String {
    if node.memo_ids.is_empty() {
        return String::new();
    }
    let ids: Vec<String> = node.memo_ids.iter().map(|id| id.to_string()).collect();
    format!("  {}", ids.join(" ").dimmed())
}

/// Tree view when hierarchy is present, one path per line otherwise.
///
/// A node is nested under the nearest listed ancestor; paths without a
/// listed parent start at column zero with their full path.
pub fn render_tag_list(resp: &ListTagsResponse, flat: bool) -> String {
    if resp.tags.is_empty() {
        return format!("{}\n", "No tags.".dimmed());
    }
    let listed: HashSet<&str> = resp.tags.iter().map(|t| t.path.as_str()).collect();
    let mut out = String::new();
    for node in &resp.tags {
        let (depth, label) = if flat {
            (0, node.path.clone())
        } else {
            let depth = ancestor_depth(node, &resp.tags, &listed);
            let label = if depth == 0 {
                node.path.clone()
            } else {
                node.segments.last().cloned().unwrap_or_default()
            };
            (depth, label)
        };
        out.push_str(&format!(
            "{}{} {}{}\n",
            "  ".repeat(depth),
            label.bold(),
            counts(node).dimmed(),
            ids_suffix(node)
        ));
    }
    out.push_str(&format!("{}\n", format!("{} tags", resp.total_count).dimmed()));
    out
}

fn ancestor_depth(node: &TagNode, all: &[TagNode], listed: &HashSet<&str>) -> usize {
    let mut depth = 0;
    let mut parent = node.parent_path.as_deref();
    let mut seen = HashSet::new();
    while let Some(p) = parent {
        if !listed.contains(p) || !seen.insert(p) {
            break;
        }
        depth += 1;
        parent = all
            .iter()
            .find(|t| t.path == p)
            .and_then(|t| t.parent_path.as_deref());
    }
    depth
}

pub fn render_tag(node: &TagNode) -> String {
    let mut out = format!("{}\n", node.path.bold());
    out.push_str(&format!(
        "  direct {}  total {}\n",
        node.direct_count, node.total_count
    ));
    if let Some(parent) = &node.parent_path {
        out.push_str(&format!("  parent {}\n", parent));
    }
    if !node.child_paths.is_empty() {
        out.push_str(&format!("  children {}\n", node.child_paths.join(" ")));
    }
    for id in &node.memo_ids {
        out.push_str(&format!("  memos/{}\n", id));
    }
    out
}

pub fn render_rename(resp: &RenameTagResponse) -> String {
    let mut out = String::new();
    for (old, new) in &resp.renamed_paths {
        out.push_str(&format!("{} {} → {}\n", "Renamed".green(), old, new));
    }
    out.push_str(&format!(
        "{} memo(s) updated\n",
        resp.affected_memo_ids.len()
    ));
    out
}

pub fn render_delete(resp: &DeleteTagResponse) -> String {
    if resp.deleted_tag_paths.is_empty() {
        return format!("{}\n", "No memos carried that tag.".dimmed());
    }
    format!(
        "{} {} from {} memo(s)\n",
        "Deleted".green(),
        resp.deleted_tag_paths.join(" "),
        resp.affected_memo_ids.len()
    )
}

pub fn render_batch_delete(resp: &BatchDeleteResponse) -> String {
    let verb = if resp.dry_run {
        "Would delete".yellow()
    } else {
        "Deleted".green()
    };
    let mut out = format!("{} {} memo(s)\n", verb, resp.deleted_count);
    for id in &resp.deleted_memo_ids {
        out.push_str(&format!("  memos/{}\n", id));
    }
    if !resp.affected_tag_paths.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            "tags".dimmed(),
            resp.affected_tag_paths.join(" ")
        ));
    }
    out
}

pub fn render_memo_tag(resp: &MemoTagResponse) -> String {
    if resp.changed {
        format!("{} memos/{}\n", "Updated".green(), resp.memo_id)
    } else {
        format!(
            "{}\n",
            format!("memos/{} does not carry that tag", resp.memo_id).dimmed()
        )
    }
}

pub fn render_rebuild(report: &RebuildReport) -> String {
    let failed = if report.failed > 0 {
        format!("{} failed", report.failed).red().to_string()
    } else {
        "0 failed".to_string()
    };
    format!(
        "{} {} memo(s): {} ok, {}\n",
        "Rebuilt".green(),
        report.processed,
        report.succeeded,
        failed
    )
}
