//! [`Node`] to markdown serialization.
//!
//! Leaves are written in document order and containers add nothing of their
//! own: their markers are [`Leaf::Syntax`] children. A tree from
//! [`super::MarkdownParser`] therefore restores byte for byte, and an edit
//! only changes the text of the leaves it touched.
//!
//! Structured leaves built in code have no raw markdown. Those are written
//! from their fields with pulldown-cmark-to-cmark.

use super::{Leaf, Node};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;
use std::fmt::{self, Write};

/// Turns a node forest back into memo text.
pub trait ContentRestorer {
    fn restore(&self, nodes: &[Node]) -> Result<String, fmt::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRestorer;

impl MarkdownRestorer {
    pub fn new() -> Self {
        Self
    }
}

impl ContentRestorer for MarkdownRestorer {
    fn restore(&self, nodes: &[Node]) -> Result<String, fmt::Error> {
        let mut out = String::new();
        write_nodes(&mut out, nodes)?;
        Ok(out)
    }
}

fn write_nodes(out: &mut String, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        if let Node::Leaf(leaf) = node {
            write_leaf(out, leaf)?;
        }
        write_nodes(out, node.children())?;
    }
    Ok(())
}

fn write_leaf(out: &mut String, leaf: &Leaf) -> fmt::Result {
    let source = leaf.raw();
    if !source.is_empty() {
        return out.write_str(source);
    }
    match leaf {
        Leaf::Tag(raw) => write!(out, "#{}", raw),
        Leaf::Text(text) | Leaf::Syntax(text) => out.write_str(text),
        Leaf::EmbeddedContent { resource } => write!(out, "![[{}]]", resource),
        _ => write_events(out, &leaf_events(leaf)),
    }
}

fn write_events(out: &mut String, events: &[Event<'_>]) -> fmt::Result {
    cmark(events.iter(), &mut *out)
        .map(|_| ())
        .map_err(|_| fmt::Error)
}

fn link_events<'a>(
    image: bool,
    link_type: LinkType,
    text: &'a str,
    url: &'a str,
    title: &'a str,
) -> Vec<Event<'a>> {
    let dest_url = CowStr::from(url);
    let title = CowStr::from(title);
    let id = CowStr::from("");
    let (start, end) = if image {
        (
            Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            },
            TagEnd::Image,
        )
    } else {
        (
            Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            },
            TagEnd::Link,
        )
    };
    vec![
        Event::Start(start),
        Event::Text(text.into()),
        Event::End(end),
    ]
}

fn leaf_events(leaf: &Leaf) -> Vec<Event<'_>> {
    match leaf {
        Leaf::Code { code, .. } => vec![Event::Code(code.as_str().into())],
        Leaf::Link {
            text, url, title, ..
        } => link_events(false, LinkType::Inline, text, url, title),
        Leaf::AutoLink { url, .. } => link_events(false, LinkType::Autolink, url, url, ""),
        Leaf::Image { alt, url, title, .. } => {
            link_events(true, LinkType::Inline, alt, url, title)
        }
        Leaf::CodeBlock {
            language, content, ..
        } => vec![
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                language.as_str().into(),
            ))),
            Event::Text(format!("{}\n", content).into()),
            Event::End(TagEnd::CodeBlock),
        ],
        Leaf::HorizontalRule { .. } => vec![Event::Rule],
        Leaf::Tag(_) | Leaf::Text(_) | Leaf::EmbeddedContent { .. } | Leaf::Syntax(_) => {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{walk, ContainerKind, ContentParser, MarkdownParser};
    use crate::tags::remove::remove_tag_from_nodes;

    fn round_trip(text: &str) -> String {
        let nodes = MarkdownParser::new().parse(text).unwrap();
        MarkdownRestorer::new().restore(&nodes).unwrap()
    }

    fn assert_unchanged(text: &str) {
        assert_eq!(round_trip(text), text);
    }

    fn restore_built(leaf: Leaf) -> Vec<Node> {
        let text = MarkdownRestorer::new()
            .restore(&[Node::Leaf(leaf)])
            .unwrap();
        MarkdownParser::new().parse(text.trim()).unwrap()
    }

    #[test]
    fn test_plain_paragraph_is_unchanged() {
        assert_unchanged("Meeting notes #work are important");
    }

    #[test]
    fn test_blocks_are_unchanged() {
        assert_unchanged("# Title\n\nBody with #tag\n\n---");
        assert_unchanged("Setext\n======\n\n***\n\n1) one\n2) two\n");
    }

    #[test]
    fn test_inline_formatting_is_unchanged() {
        assert_unchanged("__bold__ and _it_ and ``co`de`` [a](https://x.io) <https://y.io>");
    }

    #[test]
    fn test_escapes_titles_and_hard_breaks_are_unchanged() {
        assert_unchanged("Use \\*stars\\* and [doc](https://x.io \"Title\")  \nnext #x");
        assert_unchanged("line one\\\nline two &amp; more");
    }

    #[test]
    fn test_lists_and_quotes_are_unchanged() {
        assert_unchanged("* a #x\n* [ ] b\n    * nested\n\n> quoted #q\n> more");
    }

    #[test]
    fn test_code_block_is_unchanged() {
        assert_unchanged("```sh\necho #hi\n```\n\n    indented #no\n");
    }

    #[test]
    fn test_embedded_content() {
        assert_unchanged("see ![[memos/1]]");
    }

    #[test]
    fn test_tag_removal_touches_only_the_tag() {
        let mut nodes = MarkdownParser::new()
            .parse("Use \\*stars\\* and [doc](https://x.io \"Title\")  \nnext #x")
            .unwrap();
        remove_tag_from_nodes(&mut nodes, "/x");
        assert_eq!(
            MarkdownRestorer::new().restore(&nodes).unwrap(),
            "Use \\*stars\\* and [doc](https://x.io \"Title\")  \nnext "
        );
    }

    #[test]
    fn test_restore_hand_built_list() {
        let nodes = vec![Node::container(
            ContainerKind::List { ordered: false },
            vec![
                Node::container(
                    ContainerKind::TaskListItem { complete: true },
                    vec![Node::syntax("- [x] "), Node::text("done\n")],
                ),
                Node::container(
                    ContainerKind::UnorderedListItem,
                    vec![Node::syntax("- "), Node::tag("x")],
                ),
            ],
        )];
        assert_eq!(
            MarkdownRestorer::new().restore(&nodes).unwrap(),
            "- [x] done\n- #x"
        );
    }

    #[test]
    fn test_built_link_is_written_from_fields() {
        let nodes = restore_built(Leaf::Link {
            text: "site".into(),
            url: "https://example.com".into(),
            title: "Home".into(),
            raw: String::new(),
        });
        let mut found = Vec::new();
        walk(&nodes, &mut |n: &Node| {
            if let Node::Leaf(Leaf::Link { url, title, .. }) = n {
                found.push((url.clone(), title.clone()));
            }
        });
        assert_eq!(found, vec![("https://example.com".to_string(), "Home".to_string())]);
    }

    #[test]
    fn test_built_code_block_is_written_from_fields() {
        let nodes = restore_built(Leaf::CodeBlock {
            language: "rust".into(),
            content: "let x = 1;".into(),
            raw: String::new(),
        });
        assert!(nodes.iter().any(|n| matches!(
            n,
            Node::Leaf(Leaf::CodeBlock { language, content, .. })
                if language == "rust" && content == "let x = 1;"
        )));
    }
}
