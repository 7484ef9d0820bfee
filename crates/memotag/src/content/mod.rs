//! # Content Tree
//!
//! Memo content is parsed into a forest of [`Node`]s. The node type is closed:
//! a node is either a [`Leaf`] carrying one payload, or a [`Container`] with an
//! ordered list of children. Everything that walks content (tag extraction,
//! structural tag removal, tag renaming) goes through [`Node::children`] /
//! [`Node::children_mut`] and [`walk`] instead of matching container kinds
//! one by one.
//!
//! Children are owned `Vec`s, so a tree is always finite and acyclic.
//!
//! Trees built by [`parser::MarkdownParser`] are lossless. Markup between
//! content (list markers, emphasis delimiters, escapes, blank lines) lives in
//! [`Leaf::Syntax`] leaves and structured leaves keep the markdown they were
//! written as in `raw`, so writing every leaf in order gives back the input.
//!
//! ## Seams
//!
//! - [`parser::ContentParser`] turns text into nodes ([`parser::MarkdownParser`]).
//! - [`restore::ContentRestorer`] turns nodes back into text
//!   ([`restore::MarkdownRestorer`]).

pub mod parser;
pub mod restore;

pub use parser::{ContentParser, MarkdownParser, ParseError};
pub use restore::{ContentRestorer, MarkdownRestorer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// Raw tag text as written after the `#` sigil, e.g. `work/project`.
    Tag(String),
    /// Text as written in the source, entities and all.
    Text(String),
    /// Inline code span.
    Code { code: String, raw: String },
    Link {
        text: String,
        url: String,
        title: String,
        raw: String,
    },
    AutoLink { url: String, raw: String },
    Image {
        alt: String,
        url: String,
        title: String,
        raw: String,
    },
    CodeBlock {
        language: String,
        content: String,
        raw: String,
    },
    /// `![[resource]]` embed.
    EmbeddedContent { resource: String },
    HorizontalRule { raw: String },
    /// Markdown markup with no meaning of its own for tags.
    Syntax(String),
}

impl Leaf {
    /// Markdown this leaf was parsed from; empty for leaves built in code.
    pub fn raw(&self) -> &str {
        match self {
            Leaf::Code { raw, .. }
            | Leaf::Link { raw, .. }
            | Leaf::AutoLink { raw, .. }
            | Leaf::Image { raw, .. }
            | Leaf::CodeBlock { raw, .. }
            | Leaf::HorizontalRule { raw } => raw,
            Leaf::Tag(_) | Leaf::Text(_) | Leaf::EmbeddedContent { .. } | Leaf::Syntax(_) => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Paragraph,
    Heading { level: u8 },
    Blockquote,
    List { ordered: bool },
    OrderedListItem { number: u64 },
    UnorderedListItem,
    TaskListItem { complete: bool },
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Container(Container),
}

/// Flat enumeration of every node kind, for callers that only need to
/// classify nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Tag,
    Text,
    Code,
    Link,
    AutoLink,
    Image,
    CodeBlock,
    EmbeddedContent,
    HorizontalRule,
    Syntax,
    Paragraph,
    Heading,
    Blockquote,
    List,
    OrderedListItem,
    UnorderedListItem,
    TaskListItem,
    Bold,
    Italic,
}

impl Node {
    pub fn container(kind: ContainerKind, children: Vec<Node>) -> Self {
        Node::Container(Container { kind, children })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Leaf(Leaf::Text(text.into()))
    }

    pub fn tag(raw: impl Into<String>) -> Self {
        Node::Leaf(Leaf::Tag(raw.into()))
    }

    pub fn syntax(markup: impl Into<String>) -> Self {
        Node::Leaf(Leaf::Syntax(markup.into()))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(leaf) => match leaf {
                Leaf::Tag(_) => NodeKind::Tag,
                Leaf::Text(_) => NodeKind::Text,
                Leaf::Code { .. } => NodeKind::Code,
                Leaf::Link { .. } => NodeKind::Link,
                Leaf::AutoLink { .. } => NodeKind::AutoLink,
                Leaf::Image { .. } => NodeKind::Image,
                Leaf::CodeBlock { .. } => NodeKind::CodeBlock,
                Leaf::EmbeddedContent { .. } => NodeKind::EmbeddedContent,
                Leaf::HorizontalRule { .. } => NodeKind::HorizontalRule,
                Leaf::Syntax(_) => NodeKind::Syntax,
            },
            Node::Container(c) => match c.kind {
                ContainerKind::Paragraph => NodeKind::Paragraph,
                ContainerKind::Heading { .. } => NodeKind::Heading,
                ContainerKind::Blockquote => NodeKind::Blockquote,
                ContainerKind::List { .. } => NodeKind::List,
                ContainerKind::OrderedListItem { .. } => NodeKind::OrderedListItem,
                ContainerKind::UnorderedListItem => NodeKind::UnorderedListItem,
                ContainerKind::TaskListItem { .. } => NodeKind::TaskListItem,
                ContainerKind::Bold => NodeKind::Bold,
                ContainerKind::Italic => NodeKind::Italic,
            },
        }
    }

    /// Children of a container, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container(c) => &c.children,
            Node::Leaf(_) => &[],
        }
    }

    /// Mutable children of a container, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Container(c) => Some(&mut c.children),
            Node::Leaf(_) => None,
        }
    }
}

/// Pre-order, depth-first visit of every node in the forest.
pub fn walk<'a, F>(nodes: &'a [Node], visit: &mut F)
where
    F: FnMut(&'a Node),
{
    for node in nodes {
        visit(node);
        walk(node.children(), visit);
    }
}

/// Pre-order, depth-first visit with mutable access to every leaf.
pub fn walk_leaves_mut<F>(nodes: &mut [Node], visit: &mut F)
where
    F: FnMut(&mut Leaf),
{
    for node in nodes.iter_mut() {
        if let Node::Leaf(leaf) = node {
            visit(leaf);
        }
        if let Some(children) = node.children_mut() {
            walk_leaves_mut(children, visit);
        }
    }
}
