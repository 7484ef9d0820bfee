//! Markdown to [`Node`] conversion.
//!
//! [`MarkdownParser`] drives pulldown-cmark's offset iterator and folds its
//! event stream into a node forest. Every source byte ends up in exactly one
//! leaf. Text runs keep their source slice and structured leaves their raw
//! markdown; whatever lies between events (markers, delimiters, escape
//! backslashes, indentation, blank lines) becomes [`Leaf::Syntax`].
//!
//! Contiguous text is buffered until the next structural event, then scanned
//! for two memo-specific inline forms that CommonMark does not know:
//!
//! - `#tag/path` becomes [`Leaf::Tag`]. The `#` must open the text run or
//!   follow whitespace or an opening bracket/quote, and must be directly
//!   followed by a tag character (alphanumeric, `-`, `_` or `/`). An escaped
//!   `\#` is never a tag.
//! - `![[resource]]` becomes [`Leaf::EmbeddedContent`].
//!
//! Code spans and fenced blocks are never scanned, so `#` inside code is text.
//! Markdown constructs without a node kind of their own (HTML blocks, for
//! instance) are flattened into their parent.

use super::{ContainerKind, Leaf, Node};
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unbalanced end event at offset {0}")]
    UnbalancedEnd(usize),

    #[error("{0} container(s) left open at end of input")]
    Unclosed(usize),
}

/// Turns raw memo text into a node forest.
pub trait ContentParser {
    fn parse(&self, content: &str) -> Result<Vec<Node>, ParseError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str) -> Result<Vec<Node>, ParseError> {
        let mut builder = TreeBuilder::new(content);
        for (event, range) in Parser::new_ext(content, Self::options()).into_offset_iter() {
            builder.handle(event, range)?;
        }
        builder.finish()
    }
}

enum FrameKind {
    Root,
    Container(ContainerKind),
    Link {
        url: String,
        title: String,
        auto: bool,
    },
    Image {
        url: String,
        title: String,
    },
    CodeBlock {
        language: String,
        content: String,
    },
    Passthrough,
}

struct Frame {
    kind: FrameKind,
    start: usize,
    children: Vec<Node>,
    /// Source range of text not yet scanned.
    pending: Option<Range<usize>>,
}

impl Frame {
    fn new(kind: FrameKind, start: usize) -> Self {
        Self {
            kind,
            start,
            children: Vec::new(),
            pending: None,
        }
    }
}

struct TreeBuilder<'s> {
    source: &'s str,
    /// Every byte before this offset is already in the tree.
    cursor: usize,
    stack: Vec<Frame>,
    /// Next item number for each open list, `None` for bullet lists.
    list_counters: Vec<Option<u64>>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: 0,
            stack: vec![Frame::new(FrameKind::Root, 0)],
            list_counters: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), ParseError> {
        match event {
            Event::Start(tag) => {
                let kind = self.frame_kind(tag);
                self.open(kind, range.start)
            }
            Event::End(_) => self.close(range.end),
            Event::Text(text) if self.in_code_block() => self.push_code(&text, range),
            Event::Text(_) | Event::SoftBreak => self.push_text(range),
            Event::Code(code) => {
                let raw = self.unread(range.clone()).to_string();
                self.push_leaf(
                    Leaf::Code {
                        code: code.to_string(),
                        raw,
                    },
                    range,
                )
            }
            Event::Html(_) | Event::InlineHtml(_) => {
                let html = self.unread(range.clone()).to_string();
                self.push_leaf(Leaf::Text(html), range)
            }
            Event::HardBreak => self.syntax_until(range.end),
            Event::Rule => {
                let raw = self.unread(range.clone()).to_string();
                self.push_leaf(Leaf::HorizontalRule { raw }, range)
            }
            Event::TaskListMarker(complete) => {
                self.mark_task(complete);
                self.syntax_until(range.end)
            }
            _ => Ok(()),
        }
    }

    fn frame_kind(&mut self, tag: Tag<'_>) -> FrameKind {
        match tag {
            Tag::Paragraph => FrameKind::Container(ContainerKind::Paragraph),
            Tag::Heading { level, .. } => FrameKind::Container(ContainerKind::Heading {
                level: level as u8,
            }),
            Tag::BlockQuote(..) => FrameKind::Container(ContainerKind::Blockquote),
            Tag::CodeBlock(kind) => FrameKind::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                },
                content: String::new(),
            },
            Tag::List(start) => {
                self.list_counters.push(start);
                FrameKind::Container(ContainerKind::List {
                    ordered: start.is_some(),
                })
            }
            Tag::Item => {
                let kind = match self.list_counters.last_mut() {
                    Some(Some(next)) => {
                        let number = *next;
                        *next += 1;
                        ContainerKind::OrderedListItem { number }
                    }
                    _ => ContainerKind::UnorderedListItem,
                };
                FrameKind::Container(kind)
            }
            Tag::Emphasis => FrameKind::Container(ContainerKind::Italic),
            Tag::Strong => FrameKind::Container(ContainerKind::Bold),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => FrameKind::Link {
                url: dest_url.to_string(),
                title: title.to_string(),
                auto: matches!(link_type, LinkType::Autolink | LinkType::Email),
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                url: dest_url.to_string(),
                title: title.to_string(),
            },
            _ => FrameKind::Passthrough,
        }
    }

    fn slice(&self, range: Range<usize>) -> &'s str {
        self.source.get(range).unwrap_or("")
    }

    /// The part of `range` not yet in the tree.
    fn unread(&self, range: Range<usize>) -> &'s str {
        self.slice(range.start.max(self.cursor)..range.end)
    }

    fn top(&mut self) -> Result<&mut Frame, ParseError> {
        let offset = self.cursor;
        self.stack
            .last_mut()
            .ok_or(ParseError::UnbalancedEnd(offset))
    }

    fn in_code_block(&self) -> bool {
        matches!(
            self.stack.last().map(|frame| &frame.kind),
            Some(FrameKind::CodeBlock { .. })
        )
    }

    /// Records the source between the cursor and `end` as markup.
    fn syntax_until(&mut self, end: usize) -> Result<(), ParseError> {
        if end <= self.cursor {
            return Ok(());
        }
        let markup = self.slice(self.cursor..end);
        self.flush()?;
        self.top()?.children.push(Node::syntax(markup));
        self.cursor = end;
        Ok(())
    }

    fn push_text(&mut self, range: Range<usize>) -> Result<(), ParseError> {
        self.syntax_until(range.start)?;
        let start = range.start.max(self.cursor);
        if range.end <= start {
            return Ok(());
        }
        let contiguous = matches!(&self.top()?.pending, Some(p) if p.end == start);
        if contiguous {
            if let Some(pending) = self.top()?.pending.as_mut() {
                pending.end = range.end;
            }
        } else {
            self.flush()?;
            self.top()?.pending = Some(start..range.end);
        }
        self.cursor = range.end;
        Ok(())
    }

    fn push_code(&mut self, text: &str, range: Range<usize>) -> Result<(), ParseError> {
        self.syntax_until(range.start)?;
        if let FrameKind::CodeBlock { content, .. } = &mut self.top()?.kind {
            content.push_str(text);
        }
        self.cursor = self.cursor.max(range.end);
        Ok(())
    }

    fn push_leaf(&mut self, leaf: Leaf, range: Range<usize>) -> Result<(), ParseError> {
        self.syntax_until(range.start)?;
        self.flush()?;
        self.top()?.children.push(Node::Leaf(leaf));
        self.cursor = self.cursor.max(range.end);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        let source = self.source;
        let frame = self.top()?;
        if let Some(range) = frame.pending.take() {
            let escaped = source
                .get(..range.start)
                .is_some_and(|before| before.ends_with('\\'));
            let text = source.get(range).unwrap_or("");
            scan_inline(text, escaped, &mut frame.children);
        }
        Ok(())
    }

    fn open(&mut self, kind: FrameKind, start: usize) -> Result<(), ParseError> {
        self.syntax_until(start)?;
        self.flush()?;
        let start = start.max(self.cursor);
        self.stack.push(Frame::new(kind, start));
        Ok(())
    }

    fn close(&mut self, end: usize) -> Result<(), ParseError> {
        self.syntax_until(end)?;
        self.flush()?;
        if self.stack.len() <= 1 {
            return Err(ParseError::UnbalancedEnd(end));
        }
        let frame = self.stack.pop().ok_or(ParseError::UnbalancedEnd(end))?;
        let raw = self.slice(frame.start..end.max(frame.start)).to_string();
        let nodes = match frame.kind {
            FrameKind::Container(kind) => {
                if matches!(kind, ContainerKind::List { .. }) {
                    self.list_counters.pop();
                }
                vec![Node::container(kind, frame.children)]
            }
            FrameKind::Link { url, auto: true, .. } => {
                vec![Node::Leaf(Leaf::AutoLink { url, raw })]
            }
            FrameKind::Link {
                url,
                title,
                auto: false,
            } => vec![Node::Leaf(Leaf::Link {
                text: plain_text(&frame.children),
                url,
                title,
                raw,
            })],
            FrameKind::Image { url, title } => vec![Node::Leaf(Leaf::Image {
                alt: plain_text(&frame.children),
                url,
                title,
                raw,
            })],
            FrameKind::CodeBlock {
                language,
                mut content,
            } => {
                if content.ends_with('\n') {
                    content.pop();
                }
                vec![Node::Leaf(Leaf::CodeBlock {
                    language,
                    content,
                    raw,
                })]
            }
            FrameKind::Passthrough | FrameKind::Root => frame.children,
        };
        self.top()?.children.extend(nodes);
        self.cursor = self.cursor.max(end);
        Ok(())
    }

    fn mark_task(&mut self, complete: bool) {
        let item = self.stack.iter_mut().rev().find(|frame| {
            matches!(
                frame.kind,
                FrameKind::Container(
                    ContainerKind::UnorderedListItem | ContainerKind::OrderedListItem { .. }
                )
            )
        });
        if let Some(frame) = item {
            frame.kind = FrameKind::Container(ContainerKind::TaskListItem { complete });
        }
    }

    fn finish(mut self) -> Result<Vec<Node>, ParseError> {
        self.syntax_until(self.source.len())?;
        self.flush()?;
        if self.stack.len() != 1 {
            return Err(ParseError::Unclosed(self.stack.len() - 1));
        }
        Ok(self
            .stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default())
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '/'
}

fn opens_tag(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '"' | '\''),
    }
}

/// Splits a run of source text into text, tag and embed leaves.
///
/// `escaped` means the run starts right after an escape backslash.
fn scan_inline(text: &str, escaped: bool, out: &mut Vec<Node>) {
    let mut plain = String::new();
    let mut prev: Option<char> = escaped.then_some('\\');
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '#' && opens_tag(prev) {
            let after = &rest[1..];
            let end = after
                .char_indices()
                .find(|(_, ch)| !is_tag_char(*ch))
                .map(|(i, _)| i)
                .unwrap_or(after.len());
            if end > 0 {
                let raw = &after[..end];
                flush_plain(&mut plain, out);
                out.push(Node::tag(raw));
                prev = raw.chars().last();
                rest = &after[end..];
                continue;
            }
        }

        if let Some(inner) = rest.strip_prefix("![[") {
            if let Some(end) = inner.find("]]") {
                let resource = &inner[..end];
                if !resource.is_empty() && !resource.contains('\n') {
                    flush_plain(&mut plain, out);
                    out.push(Node::Leaf(Leaf::EmbeddedContent {
                        resource: resource.to_string(),
                    }));
                    prev = Some(']');
                    rest = &inner[end + 2..];
                    continue;
                }
            }
        }

        plain.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    flush_plain(&mut plain, out);
}

fn flush_plain(plain: &mut String, out: &mut Vec<Node>) {
    if !plain.is_empty() {
        out.push(Node::Leaf(Leaf::Text(std::mem::take(plain))));
    }
}

/// Flattens inline nodes to the text a reader would see, markup dropped.
fn plain_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        match node {
            Node::Leaf(Leaf::Text(t)) | Node::Leaf(Leaf::Code { code: t, .. }) => {
                text.push_str(t)
            }
            Node::Leaf(Leaf::Tag(raw)) => {
                text.push('#');
                text.push_str(raw);
            }
            Node::Leaf(Leaf::EmbeddedContent { resource }) => {
                text.push_str("![[");
                text.push_str(resource);
                text.push_str("]]");
            }
            Node::Leaf(Leaf::Link { text: t, .. }) => text.push_str(t),
            Node::Leaf(Leaf::AutoLink { url, .. }) => text.push_str(url),
            Node::Leaf(Leaf::Image { alt, .. }) => text.push_str(alt),
            Node::Leaf(Leaf::CodeBlock { content, .. }) => text.push_str(content),
            Node::Leaf(Leaf::HorizontalRule { .. }) | Node::Leaf(Leaf::Syntax(_)) => {}
            Node::Container(_) => text.push_str(&plain_text(node.children())),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{walk, NodeKind};

    fn parse(text: &str) -> Vec<Node> {
        MarkdownParser::new().parse(text).unwrap()
    }

    fn tags(nodes: &[Node]) -> Vec<String> {
        let mut out = Vec::new();
        walk(nodes, &mut |n: &Node| {
            if let Node::Leaf(Leaf::Tag(raw)) = n {
                out.push(raw.clone());
            }
        });
        out
    }

    fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
        let mut out = Vec::new();
        walk(nodes, &mut |n: &Node| out.push(n.kind()));
        out
    }

    #[test]
    fn test_paragraph_with_tag() {
        let nodes = parse("Meeting notes #work are important");
        assert_eq!(
            nodes,
            vec![Node::container(
                ContainerKind::Paragraph,
                vec![
                    Node::text("Meeting notes "),
                    Node::tag("work"),
                    Node::text(" are important"),
                ],
            )]
        );
    }

    #[test]
    fn test_hierarchical_tag_at_start() {
        assert_eq!(tags(&parse("#work/project1/backend done")), vec!["work/project1/backend"]);
    }

    #[test]
    fn test_hash_inside_word_is_not_a_tag() {
        assert!(tags(&parse("issue a#b and c##d")).is_empty());
    }

    #[test]
    fn test_lone_hash_is_not_a_tag() {
        assert!(tags(&parse("price # 5")).is_empty());
    }

    #[test]
    fn test_tag_in_heading() {
        let nodes = parse("## Plan #q3");
        assert_eq!(kinds(&nodes)[0], NodeKind::Heading);
        assert_eq!(tags(&nodes), vec!["q3"]);
        match &nodes[0] {
            Node::Container(c) => assert_eq!(c.kind, ContainerKind::Heading { level: 2 }),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_code_is_never_scanned() {
        let nodes = parse("`#inline`\n\n```rust\n#fenced\n```");
        assert!(tags(&nodes).is_empty());
        assert!(nodes.iter().any(|n| matches!(
            n,
            Node::Leaf(Leaf::CodeBlock { language, content, .. })
                if language == "rust" && content == "#fenced"
        )));
    }

    #[test]
    fn test_task_list_items() {
        let nodes = parse("- [ ] todo #a\n- [x] done");
        let mut states = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Container(c) = n {
                if let ContainerKind::TaskListItem { complete } = c.kind {
                    states.push(complete);
                }
            }
        });
        assert_eq!(states, vec![false, true]);
        assert_eq!(tags(&nodes), vec!["a"]);
    }

    #[test]
    fn test_ordered_list_numbers() {
        let nodes = parse("3. c\n4. d");
        let mut numbers = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Container(c) = n {
                if let ContainerKind::OrderedListItem { number } = c.kind {
                    numbers.push(number);
                }
            }
        });
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_links_and_autolinks() {
        let nodes = parse("[site](https://example.com) and <https://rust-lang.org>");
        let k = kinds(&nodes);
        assert!(k.contains(&NodeKind::Link));
        assert!(k.contains(&NodeKind::AutoLink));
    }

    #[test]
    fn test_tag_inside_link_text_is_not_a_tag() {
        assert!(tags(&parse("[#nope](https://example.com)")).is_empty());
    }

    #[test]
    fn test_embedded_content() {
        let nodes = parse("see ![[memos/abc]] here");
        let mut resources = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Leaf(Leaf::EmbeddedContent { resource }) = n {
                resources.push(resource.clone());
            }
        });
        assert_eq!(resources, vec!["memos/abc"]);
    }

    #[test]
    fn test_tags_in_nested_containers() {
        let nodes = parse("> quote **#bold** and *#italic*\n\n- item #listed");
        assert_eq!(tags(&nodes), vec!["bold", "italic", "listed"]);
    }

    #[test]
    fn test_escaped_hash_is_not_a_tag() {
        assert!(tags(&parse("issue \\#123 is open")).is_empty());
        assert_eq!(tags(&parse("\\#not but #yes")), vec!["yes"]);
    }

    #[test]
    fn test_escape_backslash_is_kept_as_syntax() {
        let nodes = parse("a \\*b");
        assert_eq!(
            nodes,
            vec![Node::container(
                ContainerKind::Paragraph,
                vec![Node::text("a "), Node::syntax("\\"), Node::text("*b")],
            )]
        );
    }

    #[test]
    fn test_list_markers_are_syntax() {
        let nodes = parse("- one #a");
        let mut markup = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Leaf(Leaf::Syntax(s)) = n {
                markup.push(s.clone());
            }
        });
        assert_eq!(markup, vec!["- "]);
        assert_eq!(tags(&nodes), vec!["a"]);
    }

    #[test]
    fn test_link_keeps_title_and_source() {
        let nodes = parse("[doc](https://x.io \"Title\")");
        let mut links = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Leaf(leaf @ Leaf::Link { .. }) = n {
                links.push(leaf.clone());
            }
        });
        assert_eq!(
            links,
            vec![Leaf::Link {
                text: "doc".into(),
                url: "https://x.io".into(),
                title: "Title".into(),
                raw: "[doc](https://x.io \"Title\")".into(),
            }]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }
}
