//! The document AST.

use crate::tree::Node;
use std::cell::RefCell;

/// The core AST node enum.  Variants up to and including `ThematicBreak` are
/// blocks; the rest are inlines.
#[derive(Debug, Clone)]
pub enum NodeValue {
    /// The root of every document.  Contains blocks.
    Document,

    /// A block quote.  Contains other blocks.
    BlockQuote,

    /// A list.  Contains `Item`s only.
    List(NodeList),

    /// A list item.  Carries a copy of the owning list's metadata and
    /// contains other blocks.
    Item(NodeList),

    /// A code block, fenced or indented.  The contents are never parsed as
    /// Markdown.
    CodeBlock(NodeCodeBlock),

    /// A leaf block of raw HTML.
    HtmlBlock(NodeHtmlBlock),

    /// A paragraph.  Contains inlines.
    Paragraph,

    /// An ATX or setext heading.  Contains inlines.
    Heading(NodeHeading),

    /// A thematic break.  Has no children.
    ThematicBreak,

    /// Textual content.
    Text(String),

    /// A soft line break.
    SoftBreak,

    /// A hard line break.
    LineBreak,

    /// An inline code span.  The literal is stored here rather than in a
    /// child, as it is never parsed further.
    Code(String),

    /// Raw HTML contained inline.
    HtmlInline(String),

    /// Emphasised text.  Contains inlines.
    Emph,

    /// Strong text.  Contains inlines.
    Strong,

    /// Struck-through text, produced by the `STRIKETHROUGH` extension.
    Strikethrough,

    /// A link.  The children are the link text.
    Link(NodeLink),

    /// An image.  The children are flattened into the alt text.
    Image(NodeLink),
}

/// The metadata of a list or list item.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeList {
    /// Bullet or ordered.
    pub list_type: ListType,

    /// Number of spaces before the marker.
    pub marker_offset: usize,

    /// Number of columns from the start of the marker to the item text.
    pub padding: usize,

    /// For ordered lists, the ordinal the list starts at.
    pub start: usize,

    /// For ordered lists, the delimiter after each number.
    pub delimiter: ListDelimType,

    /// For bullet lists, the bullet character used.
    pub bullet_char: u8,

    /// Whether item paragraphs render without `<p>` wrappers.  Finalised
    /// before any rendering observes it.
    pub tight: bool,
}

/// The type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    #[default]
    Bullet,
    Ordered,
}

/// The delimiter after an ordered list marker's number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListDelimType {
    #[default]
    Period,
    Paren,
}

/// The metadata and contents of a code block.
#[derive(Debug, Default, Clone)]
pub struct NodeCodeBlock {
    /// Fenced, as opposed to indented.
    pub fenced: bool,

    /// The fence character (`` ` `` or `~`), for fenced blocks.
    pub fence_char: u8,

    /// The length of the opening fence.
    pub fence_length: usize,

    /// The indentation of the opening fence.
    pub fence_offset: usize,

    /// The info string after the opening fence, entity-unescaped.
    pub info: String,

    /// The literal contents.
    pub literal: String,
}

/// The metadata of a heading.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeHeading {
    /// 1–6 for ATX headings, 1 or 2 for setext.
    pub level: u8,

    /// Whether the heading is setext.
    pub setext: bool,
}

/// The contents of a raw HTML block.
#[derive(Debug, Default, Clone)]
pub struct NodeHtmlBlock {
    /// Block kind 1–7; determines the end condition.
    pub block_type: u8,

    /// The literal contents.
    pub literal: String,
}

/// A link destination and title, for `Link` and `Image` nodes.
#[derive(Debug, Default, Clone)]
pub struct NodeLink {
    /// The destination URL, or image source.
    pub url: String,

    /// The title, rendered into the `title` attribute.  Empty for none.
    pub title: String,
}

impl NodeValue {
    /// Whether this node is a block.
    pub fn block(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::CodeBlock(..)
                | NodeValue::HtmlBlock(..)
                | NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::ThematicBreak
        )
    }

    /// Whether the block parser may append line content to this node.
    pub(crate) fn accepts_lines(&self) -> bool {
        matches!(
            *self,
            NodeValue::Paragraph | NodeValue::Heading(..) | NodeValue::CodeBlock(..)
        )
    }

    /// Whether this node's `content` is parsed into inline children.
    pub(crate) fn contains_inlines(&self) -> bool {
        matches!(*self, NodeValue::Paragraph | NodeValue::Heading(..))
    }

    /// A reference to the text of a `Text` inline, if this is one.
    pub fn text(&self) -> Option<&String> {
        match *self {
            NodeValue::Text(ref t) => Some(t),
            _ => None,
        }
    }

    /// A mutable reference to the text of a `Text` inline, if this is one.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match *self {
            NodeValue::Text(ref mut t) => Some(t),
            _ => None,
        }
    }
}

/// The payload of a document tree node: the variant itself plus the state the
/// block parser keeps per node.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node value.
    pub value: NodeValue,

    /// Raw line content accumulated by the block parser, consumed by the
    /// inline parser.  Empty on nodes that do not accept lines.
    pub(crate) content: String,

    pub(crate) start_line: usize,
    pub(crate) start_column: usize,

    /// True while the block parser may still append to this node.
    pub(crate) open: bool,

    /// Whether the last line processed inside this node was blank; input to
    /// tight-list classification.
    pub(crate) last_line_blank: bool,
}

impl Ast {
    pub(crate) fn new(value: NodeValue, start_line: usize, start_column: usize) -> Self {
        Ast {
            value,
            content: String::new(),
            start_line,
            start_column,
            open: true,
            last_line_blank: false,
        }
    }
}

/// The concrete tree node type.  `'a` is the arena lifetime.
pub type AstNode<'a> = Node<'a, RefCell<Ast>>;

pub(crate) fn last_child_is_open<'a>(node: &'a AstNode<'a>) -> bool {
    node.last_child().map_or(false, |n| n.data.borrow().open)
}

/// Whether `node` can accept a child of the given value.  Consulted before
/// every append; the block parser finalises upward until it holds.
pub fn can_contain_type<'a>(node: &'a AstNode<'a>, child: &NodeValue) -> bool {
    if matches!(*child, NodeValue::Document) {
        return false;
    }

    match node.data.borrow().value {
        NodeValue::Document | NodeValue::BlockQuote | NodeValue::Item(..) => {
            child.block() && !matches!(*child, NodeValue::Item(..))
        }

        NodeValue::List(..) => matches!(*child, NodeValue::Item(..)),

        NodeValue::Paragraph
        | NodeValue::Heading(..)
        | NodeValue::Emph
        | NodeValue::Strong
        | NodeValue::Strikethrough
        | NodeValue::Link(..)
        | NodeValue::Image(..) => !child.block(),

        _ => false,
    }
}

/// Whether a (list) node's trailing content ends with a blank line, looking
/// through nested sublists.
pub(crate) fn ends_with_blank_line<'a>(node: &'a AstNode<'a>) -> bool {
    let mut it = Some(node);
    while let Some(cur) = it {
        if cur.data.borrow().last_line_blank {
            return true;
        }
        match cur.data.borrow().value {
            NodeValue::List(..) | NodeValue::Item(..) => it = cur.last_child(),
            _ => it = None,
        }
    }
    false
}
