//! The block parser: a line-oriented state machine over a tree of open
//! containers.  Each line is matched against the open container chain, new
//! blocks are opened from a fixed trigger list, and remaining content is
//! appended to the innermost leaf.  Finalisation runs per-variant handlers
//! and, once the tree is complete, hands every paragraph and heading to the
//! inline parser.

pub(crate) mod autolink;
pub(crate) mod inlines;

use crate::ctype::{isdigit, isspace};
use crate::entity;
use crate::nodes::{
    self, Ast, AstNode, ListDelimType, ListType, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeList, NodeValue,
};
use crate::scanners;
use crate::strings;
use crate::tree::Node;
use bitflags::bitflags;
use std::cell::RefCell;
use std::collections::HashMap;
use std::mem;
use typed_arena::Arena;

const CODE_INDENT: usize = 4;

// Very deeply nested lists cause quadratic behaviour in the continuation
// walk; no non-contrived document nests this deep.
const MAX_LIST_DEPTH: usize = 100;

bitflags! {
    /// Dialect extensions.  All bits are off by default, leaving plain
    /// CommonMark.
    pub struct Extensions: u32 {
        /// Forbid emphasis openers and closers inside words for `*` as well
        /// as `_`.
        const NO_INTRA_EMPHASIS = 1 << 0;

        /// `~~text~~` produces struck-through text.
        const STRIKETHROUGH = 1 << 1;

        /// Link bare URLs, `www.` domains and email addresses found in
        /// plain text.
        const AUTOLINK = 1 << 2;

        /// Render every soft line break as a hard break.
        const HARD_LINE_BREAK = 1 << 3;

        /// Expand tabs to 8-column stops instead of 4.
        const TAB_SIZE_EIGHT = 1 << 4;
    }
}

bitflags! {
    /// HTML renderer behaviour.  All bits are off by default.
    pub struct RenderFlags: u32 {
        /// Suppress raw HTML blocks and inline HTML.
        const SKIP_HTML = 1 << 0;

        /// Suppress raw `<style>` elements.
        const SKIP_STYLE = 1 << 1;

        /// Suppress images.
        const SKIP_IMAGES = 1 << 2;

        /// Suppress links, rendering only their text.
        const SKIP_LINKS = 1 << 3;

        /// Only link http, https, ftp, mailto and relative destinations;
        /// anything else renders its text in `<tt>`.
        const SAFE_LINK = 1 << 4;

        /// Add `rel="nofollow"` to links.
        const NOFOLLOW_LINKS = 1 << 5;

        /// Add `rel="noreferrer"` to links.
        const NOREFERRER_LINKS = 1 << 6;

        /// Add `target="_blank"` to absolute links.
        const HREF_TARGET_BLANK = 1 << 7;

        /// Emit an XHTML doctype and namespace for `COMPLETE_PAGE`.
        const USE_XHTML = 1 << 8;

        /// Wrap the output in a complete HTML page.
        const COMPLETE_PAGE = 1 << 9;

        /// Replace straight quotes with curly ones.
        const USE_SMARTYPANTS = 1 << 10;
    }
}

/// Parse and render options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Dialect extensions to enable.
    pub extensions: Extensions,

    /// HTML renderer flags.
    pub render: RenderFlags,

    /// Document title, emitted by `COMPLETE_PAGE`.
    pub title: String,

    /// Stylesheet URL, emitted by `COMPLETE_PAGE` when non-empty.
    pub css: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            extensions: Extensions::empty(),
            render: RenderFlags::empty(),
            title: String::new(),
            css: String::new(),
        }
    }
}

impl Options {
    pub(crate) fn smart(&self) -> bool {
        self.render.contains(RenderFlags::USE_SMARTYPANTS)
    }

    pub(crate) fn tab_stop(&self) -> usize {
        if self.extensions.contains(Extensions::TAB_SIZE_EIGHT) {
            8
        } else {
            4
        }
    }
}

/// A reference link's resolved destination and title.
#[derive(Debug, Clone)]
pub struct Reference {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkType {
    Uri,
    Email,
}

/// Parse a Markdown document to an AST.
///
/// Nodes are allocated in (and borrow from) the given arena.  NUL bytes in
/// the input are replaced with U+FFFD; `\r\n` and lone `\r` line endings are
/// normalised to `\n`.
pub fn parse_document<'a>(
    arena: &'a Arena<AstNode<'a>>,
    buffer: &str,
    options: &Options,
) -> &'a AstNode<'a> {
    let root: &'a AstNode<'a> = arena.alloc(Node::new(RefCell::new(Ast::new(
        NodeValue::Document,
        0,
        0,
    ))));
    let mut parser = Parser::new(arena, root, options);
    parser.feed(buffer, true);
    parser.finish()
}

pub struct Parser<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    refmap: HashMap<String, Reference>,
    root: &'a AstNode<'a>,
    current: &'a AstNode<'a>,
    line_number: usize,
    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    thematic_break_kill_pos: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,
    linebuf: String,
    last_buffer_ended_with_cr: bool,
    options: &'o Options,
}

enum ContainerKind {
    BlockQuote,
    Item(NodeList),
    CodeBlock,
    HtmlBlock(u8),
    Paragraph,
    Heading,
    Other,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>, options: &'o Options) -> Self {
        Parser {
            arena,
            refmap: HashMap::new(),
            root,
            current: root,
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            thematic_break_kill_pos: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
            linebuf: String::new(),
            last_buffer_ended_with_cr: false,
            options,
        }
    }

    fn feed(&mut self, s: &str, eof: bool) {
        let sb = s.as_bytes();
        let end = s.len();

        let mut buffer = 0;
        if self.last_buffer_ended_with_cr && !s.is_empty() && sb[0] == b'\n' {
            buffer += 1;
        }
        self.last_buffer_ended_with_cr = false;

        while buffer < end {
            let mut process = false;
            let mut eol = buffer;
            let mut ate_line_end = false;
            while eol < end {
                if strings::is_line_end_char(sb[eol]) {
                    process = true;
                    ate_line_end = true;
                    eol += 1;
                    break;
                }
                if sb[eol] == 0 {
                    break;
                }
                eol += 1;
            }

            if eol >= end && eof {
                process = true;
            }

            if process {
                if !self.linebuf.is_empty() {
                    self.linebuf.push_str(&s[buffer..eol]);
                    let line = mem::take(&mut self.linebuf);
                    self.process_line(&line);
                } else {
                    self.process_line(&s[buffer..eol]);
                }
            } else if eol < end && sb[eol] == 0 {
                self.linebuf.push_str(&s[buffer..eol]);
                self.linebuf.push('\u{fffd}');
            } else {
                self.linebuf.push_str(&s[buffer..eol]);
            }

            buffer = eol;
            if buffer < end {
                if sb[buffer] == 0 {
                    buffer += 1;
                } else {
                    if ate_line_end {
                        buffer -= 1;
                    }
                    if sb[buffer] == b'\r' {
                        buffer += 1;
                        if buffer == end {
                            self.last_buffer_ended_with_cr = true;
                        }
                    }
                    if buffer < end && sb[buffer] == b'\n' {
                        buffer += 1;
                    }
                }
            }
        }
    }

    fn process_line(&mut self, line: &str) {
        let mut line_owned;
        let line: &str = match line.as_bytes().last() {
            None => {
                line_owned = String::from("\n");
                &line_owned
            }
            Some(&b'\r') => {
                line_owned = line.to_string();
                line_owned.pop();
                line_owned.push('\n');
                &line_owned
            }
            Some(&b'\n') => line,
            Some(_) => {
                line_owned = line.to_string();
                line_owned.push('\n');
                &line_owned
            }
        };

        self.offset = 0;
        self.column = 0;
        self.first_nonspace = 0;
        self.first_nonspace_column = 0;
        self.thematic_break_kill_pos = 0;
        self.indent = 0;
        self.blank = false;
        self.partially_consumed_tab = false;

        if self.line_number == 0 && line.starts_with('\u{feff}') {
            self.offset += 3;
        }

        self.line_number += 1;

        if let Some((last_matched_container, all_matched)) = self.check_open_blocks(line) {
            let mut container = last_matched_container;
            let current = self.current;
            self.open_new_blocks(&mut container, line, all_matched);

            if current.same_node(self.current) {
                self.add_text_to_container(container, last_matched_container, line);
            }
        }
    }

    ///////////////////////
    // Check open blocks //
    ///////////////////////

    fn check_open_blocks(&mut self, line: &str) -> Option<(&'a AstNode<'a>, bool)> {
        let (all_matched, mut container) = self.check_open_blocks_inner(self.root, line)?;

        if !all_matched {
            container = container.parent().unwrap();
        }

        Some((container, all_matched))
    }

    fn check_open_blocks_inner(
        &mut self,
        mut container: &'a AstNode<'a>,
        line: &str,
    ) -> Option<(bool, &'a AstNode<'a>)> {
        let mut all_matched = false;

        loop {
            if !nodes::last_child_is_open(container) {
                all_matched = true;
                break;
            }
            container = container.last_child().unwrap();

            self.find_first_nonspace(line);

            let kind = {
                let data = container.data.borrow();
                match data.value {
                    NodeValue::BlockQuote => ContainerKind::BlockQuote,
                    NodeValue::Item(nl) => ContainerKind::Item(nl),
                    NodeValue::CodeBlock(..) => ContainerKind::CodeBlock,
                    NodeValue::HtmlBlock(ref nhb) => ContainerKind::HtmlBlock(nhb.block_type),
                    NodeValue::Paragraph => ContainerKind::Paragraph,
                    NodeValue::Heading(..) => ContainerKind::Heading,
                    _ => ContainerKind::Other,
                }
            };

            match kind {
                ContainerKind::BlockQuote => {
                    if !self.parse_block_quote_prefix(line) {
                        break;
                    }
                }
                ContainerKind::Item(nl) => {
                    if !self.parse_node_item_prefix(line, container, &nl) {
                        break;
                    }
                }
                ContainerKind::CodeBlock => {
                    if !self.parse_code_block_prefix(line, container)? {
                        break;
                    }
                }
                ContainerKind::HtmlBlock(t) => {
                    if !self.parse_html_block_prefix(t) {
                        break;
                    }
                }
                ContainerKind::Paragraph => {
                    if self.blank {
                        break;
                    }
                }
                ContainerKind::Heading => {
                    break;
                }
                ContainerKind::Other => {}
            }
        }

        Some((all_matched, container))
    }

    fn find_first_nonspace(&mut self, line: &str) {
        let tab_stop = self.options.tab_stop();
        let mut chars_to_tab = tab_stop - (self.column % tab_stop);
        let bytes = line.as_bytes();

        if self.first_nonspace <= self.offset {
            self.first_nonspace = self.offset;
            self.first_nonspace_column = self.column;

            loop {
                if self.first_nonspace >= line.len() {
                    break;
                }
                match bytes[self.first_nonspace] {
                    b' ' => {
                        self.first_nonspace += 1;
                        self.first_nonspace_column += 1;
                        chars_to_tab -= 1;
                        if chars_to_tab == 0 {
                            chars_to_tab = tab_stop;
                        }
                    }
                    b'\t' => {
                        self.first_nonspace += 1;
                        self.first_nonspace_column += chars_to_tab;
                        chars_to_tab = tab_stop;
                    }
                    _ => break,
                }
            }
        }

        self.indent = self.first_nonspace_column - self.column;
        self.blank = self.first_nonspace < line.len()
            && strings::is_line_end_char(bytes[self.first_nonspace]);
    }

    fn parse_block_quote_prefix(&mut self, line: &str) -> bool {
        let indent = self.indent;
        if indent <= 3 && line.as_bytes()[self.first_nonspace] == b'>' {
            self.advance_offset(line, indent + 1, true);

            if strings::is_space_or_tab(line.as_bytes()[self.offset]) {
                self.advance_offset(line, 1, true);
            }

            return true;
        }

        false
    }

    fn parse_node_item_prefix(
        &mut self,
        line: &str,
        container: &'a AstNode<'a>,
        nl: &NodeList,
    ) -> bool {
        if self.indent >= nl.marker_offset + nl.padding {
            self.advance_offset(line, nl.marker_offset + nl.padding, true);
            true
        } else if self.blank && container.first_child().is_some() {
            let offset = self.first_nonspace - self.offset;
            self.advance_offset(line, offset, false);
            true
        } else {
            false
        }
    }

    fn parse_code_block_prefix(&mut self, line: &str, container: &'a AstNode<'a>) -> Option<bool> {
        let (fenced, fence_char, fence_length, fence_offset) = {
            let data = container.data.borrow();
            match data.value {
                NodeValue::CodeBlock(ref ncb) => (
                    ncb.fenced,
                    ncb.fence_char,
                    ncb.fence_length,
                    ncb.fence_offset,
                ),
                _ => unreachable!(),
            }
        };

        if !fenced {
            if self.indent >= CODE_INDENT {
                self.advance_offset(line, CODE_INDENT, true);
                return Some(true);
            } else if self.blank {
                let offset = self.first_nonspace - self.offset;
                self.advance_offset(line, offset, false);
                return Some(true);
            }
            return Some(false);
        }

        let bytes = line.as_bytes();
        let matched = if self.indent <= 3 && bytes[self.first_nonspace] == fence_char {
            scanners::close_code_fence(&line[self.first_nonspace..]).unwrap_or(0)
        } else {
            0
        };

        if matched >= fence_length {
            // The closing fence consumes the whole line.
            self.advance_offset(line, matched, false);
            self.current = self.finalize(container).unwrap();
            return None;
        }

        let mut i = fence_offset;
        while i > 0 && strings::is_space_or_tab(bytes[self.offset]) {
            self.advance_offset(line, 1, true);
            i -= 1;
        }
        Some(true)
    }

    fn parse_html_block_prefix(&self, t: u8) -> bool {
        match t {
            1..=5 => true,
            6 | 7 => !self.blank,
            _ => unreachable!(),
        }
    }

    /////////////////////
    // Open new blocks //
    /////////////////////

    fn open_new_blocks(&mut self, container: &mut &'a AstNode<'a>, line: &str, all_matched: bool) {
        let mut maybe_lazy = matches!(self.current.data.borrow().value, NodeValue::Paragraph);
        let mut depth = 0;

        while !matches!(
            container.data.borrow().value,
            NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..)
        ) {
            depth += 1;
            self.find_first_nonspace(line);
            let indented = self.indent >= CODE_INDENT;

            if !((!indented
                && (self.handle_blockquote(container, line)
                    || self.handle_atx_heading(container, line)
                    || self.handle_code_fence(container, line)
                    || self.handle_html_block(container, line)
                    || self.handle_setext_heading(container, line)
                    || self.handle_thematic_break(container, line, all_matched)))
                || self.handle_list(container, line, indented, depth)
                || self.handle_code_block(container, line, indented, maybe_lazy))
            {
                break;
            }

            if container.data.borrow().value.accepts_lines() {
                break;
            }

            maybe_lazy = false;
        }
    }

    fn handle_blockquote(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        if line.as_bytes()[self.first_nonspace] != b'>' {
            return false;
        }

        let blockquote_startpos = self.first_nonspace;

        let offset = self.first_nonspace + 1 - self.offset;
        self.advance_offset(line, offset, false);
        if strings::is_space_or_tab(line.as_bytes()[self.offset]) {
            self.advance_offset(line, 1, true);
        }
        *container = self.add_child(*container, NodeValue::BlockQuote, blockquote_startpos + 1);

        true
    }

    fn handle_atx_heading(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        let Some(matched) = scanners::atx_heading_start(&line[self.first_nonspace..]) else {
            return false;
        };

        let heading_startpos = self.first_nonspace;
        let offset = self.offset;
        self.advance_offset(line, heading_startpos + matched - offset, false);
        *container = self.add_child(
            *container,
            NodeValue::Heading(NodeHeading::default()),
            heading_startpos + 1,
        );

        let bytes = line.as_bytes();
        let mut hashpos = bytes[self.first_nonspace..]
            .iter()
            .position(|&c| c == b'#')
            .unwrap()
            + self.first_nonspace;
        let mut level = 0;
        while bytes[hashpos] == b'#' {
            level += 1;
            hashpos += 1;
        }

        container.data.borrow_mut().value = NodeValue::Heading(NodeHeading {
            level,
            setext: false,
        });

        true
    }

    fn handle_code_fence(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        let Some(matched) = scanners::open_code_fence(&line[self.first_nonspace..]) else {
            return false;
        };

        let first_nonspace = self.first_nonspace;
        let offset = self.offset;
        let ncb = NodeCodeBlock {
            fenced: true,
            fence_char: line.as_bytes()[first_nonspace],
            fence_length: matched,
            fence_offset: first_nonspace - offset,
            info: String::new(),
            literal: String::new(),
        };
        *container = self.add_child(
            *container,
            NodeValue::CodeBlock(ncb),
            self.first_nonspace + 1,
        );
        self.advance_offset(line, first_nonspace + matched - offset, false);

        true
    }

    fn handle_html_block(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        let start = scanners::html_block_start(&line[self.first_nonspace..]).or_else(|| {
            if !matches!(container.data.borrow().value, NodeValue::Paragraph) {
                scanners::html_block_start_7(&line[self.first_nonspace..])
            } else {
                None
            }
        });
        let Some(matched) = start else {
            return false;
        };

        let nhb = NodeHtmlBlock {
            block_type: matched as u8,
            literal: String::new(),
        };

        *container = self.add_child(
            *container,
            NodeValue::HtmlBlock(nhb),
            self.first_nonspace + 1,
        );

        true
    }

    fn handle_setext_heading(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        if !matches!(container.data.borrow().value, NodeValue::Paragraph) {
            return false;
        }
        let Some(sc) = scanners::setext_heading_line(&line[self.first_nonspace..]) else {
            return false;
        };

        let has_content = self.resolve_reference_link_definitions(*container);
        if has_content {
            container.data.borrow_mut().value = NodeValue::Heading(NodeHeading {
                level: match sc {
                    scanners::SetextChar::Equals => 1,
                    scanners::SetextChar::Hyphen => 2,
                },
                setext: true,
            });
            let adv = line.len() - 1 - self.offset;
            self.advance_offset(line, adv, false);
        }

        true
    }

    fn handle_thematic_break(
        &mut self,
        container: &mut &'a AstNode<'a>,
        line: &str,
        all_matched: bool,
    ) -> bool {
        if matches!(container.data.borrow().value, NodeValue::Paragraph) && !all_matched {
            return false;
        }
        if self.thematic_break_kill_pos > self.first_nonspace {
            return false;
        }

        let (offset, found) = self.scan_thematic_break(line);
        if !found {
            self.thematic_break_kill_pos = offset;
            return false;
        }

        *container = self.add_child(*container, NodeValue::ThematicBreak, self.first_nonspace + 1);

        let adv = line.len() - 1 - self.offset;
        self.advance_offset(line, adv, false);

        true
    }

    fn scan_thematic_break(&self, line: &str) -> (usize, bool) {
        let mut i = self.first_nonspace;

        if i >= line.len() {
            return (i, false);
        }

        let bytes = line.as_bytes();
        let c = bytes[i];
        if c != b'*' && c != b'_' && c != b'-' {
            return (i, false);
        }

        let mut count = 1;
        let mut nextc;
        loop {
            i += 1;
            if i >= line.len() {
                return (i, false);
            }
            nextc = bytes[i];

            if nextc == c {
                count += 1;
            } else if nextc != b' ' && nextc != b'\t' {
                break;
            }
        }

        if count >= 3 && (nextc == b'\r' || nextc == b'\n') {
            ((i - self.first_nonspace) + 1, true)
        } else {
            (i, false)
        }
    }

    fn handle_list(
        &mut self,
        container: &mut &'a AstNode<'a>,
        line: &str,
        indented: bool,
        depth: usize,
    ) -> bool {
        if (indented && !matches!(container.data.borrow().value, NodeValue::List(..)))
            || self.indent >= 4
            || depth >= MAX_LIST_DEPTH
        {
            return false;
        }
        let Some((matched, mut nl)) = parse_list_marker(
            line,
            self.first_nonspace,
            matches!(container.data.borrow().value, NodeValue::Paragraph),
        ) else {
            return false;
        };

        let offset = self.first_nonspace + matched - self.offset;
        self.advance_offset(line, offset, false);
        let (save_partially_consumed_tab, save_offset, save_column) =
            (self.partially_consumed_tab, self.offset, self.column);

        let bytes = line.as_bytes();
        while self.column - save_column <= 5 && strings::is_space_or_tab(bytes[self.offset]) {
            self.advance_offset(line, 1, true);
        }

        let i = self.column - save_column;
        if !(1..5).contains(&i) || strings::is_line_end_char(bytes[self.offset]) {
            nl.padding = matched + 1;
            self.offset = save_offset;
            self.column = save_column;
            self.partially_consumed_tab = save_partially_consumed_tab;
            if i > 0 {
                self.advance_offset(line, 1, true);
            }
        } else {
            nl.padding = matched + i;
        }

        nl.marker_offset = self.indent;

        if match container.data.borrow().value {
            NodeValue::List(ref mnl) => !lists_match(&nl, mnl),
            _ => true,
        } {
            *container = self.add_child(*container, NodeValue::List(nl), self.first_nonspace + 1);
        }

        *container = self.add_child(*container, NodeValue::Item(nl), self.first_nonspace + 1);

        true
    }

    fn handle_code_block(
        &mut self,
        container: &mut &'a AstNode<'a>,
        line: &str,
        indented: bool,
        maybe_lazy: bool,
    ) -> bool {
        if !indented || maybe_lazy || self.blank {
            return false;
        }

        self.advance_offset(line, CODE_INDENT, true);
        let ncb = NodeCodeBlock {
            fenced: false,
            ..NodeCodeBlock::default()
        };
        *container = self.add_child(*container, NodeValue::CodeBlock(ncb), self.offset + 1);

        true
    }

    //////////
    // Core //
    //////////

    fn advance_offset(&mut self, line: &str, mut count: usize, columns: bool) {
        let bytes = line.as_bytes();
        let tab_stop = self.options.tab_stop();
        while count > 0 {
            match bytes[self.offset] {
                b'\t' => {
                    let chars_to_tab = tab_stop - (self.column % tab_stop);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let chars_to_advance = std::cmp::min(count, chars_to_tab);
                        self.column += chars_to_advance;
                        self.offset += if self.partially_consumed_tab { 0 } else { 1 };
                        count -= chars_to_advance;
                    } else {
                        self.partially_consumed_tab = false;
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                _ => {
                    self.partially_consumed_tab = false;
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
            }
        }
    }

    fn add_child(
        &mut self,
        mut parent: &'a AstNode<'a>,
        value: NodeValue,
        start_column: usize,
    ) -> &'a AstNode<'a> {
        while !nodes::can_contain_type(parent, &value) {
            parent = self.finalize(parent).unwrap();
        }

        let child = Ast::new(value, self.line_number, start_column);
        let node = self.arena.alloc(Node::new(RefCell::new(child)));
        parent.append(node);
        node
    }

    fn add_text_to_container(
        &mut self,
        mut container: &'a AstNode<'a>,
        last_matched_container: &'a AstNode<'a>,
        line: &str,
    ) {
        self.find_first_nonspace(line);

        if self.blank {
            if let Some(last_child) = container.last_child() {
                last_child.data.borrow_mut().last_line_blank = true;
            }
        }

        let last_line_blank = self.blank
            && match container.data.borrow().value {
                NodeValue::BlockQuote | NodeValue::Heading(..) | NodeValue::ThematicBreak => false,
                NodeValue::CodeBlock(ref ncb) => !ncb.fenced,
                NodeValue::Item(..) => {
                    container.first_child().is_some()
                        || container.data.borrow().start_line != self.line_number
                }
                _ => true,
            };
        container.data.borrow_mut().last_line_blank = last_line_blank;

        let mut tmp = container;
        while let Some(parent) = tmp.parent() {
            parent.data.borrow_mut().last_line_blank = false;
            tmp = parent;
        }

        // Lazy continuation: a non-blank line may extend an open paragraph
        // even when the outer containers did not all match.
        if !self.current.same_node(last_matched_container)
            && container.same_node(last_matched_container)
            && !self.blank
            && matches!(self.current.data.borrow().value, NodeValue::Paragraph)
        {
            self.add_line(self.current, line);
        } else {
            while !self.current.same_node(last_matched_container) {
                self.current = self.finalize(self.current).unwrap();
            }

            let (is_code, html_block_type) = {
                let data = container.data.borrow();
                match data.value {
                    NodeValue::CodeBlock(..) => (true, None),
                    NodeValue::HtmlBlock(ref nhb) => (false, Some(nhb.block_type)),
                    _ => (false, None),
                }
            };

            if is_code {
                self.add_line(container, line);
            } else if let Some(block_type) = html_block_type {
                self.add_line(container, line);

                let tail = &line[self.first_nonspace..];
                let matches_end_condition = match block_type {
                    1 => scanners::html_block_end_1(tail),
                    2 => scanners::html_block_end_2(tail),
                    3 => scanners::html_block_end_3(tail),
                    4 => scanners::html_block_end_4(tail),
                    5 => scanners::html_block_end_5(tail),
                    _ => false,
                };

                if matches_end_condition {
                    container = self.finalize(container).unwrap();
                }
            } else if self.blank {
                // do nothing
            } else if container.data.borrow().value.accepts_lines() {
                let mut line_to_add = line;
                let chop = match container.data.borrow().value {
                    NodeValue::Heading(ref nh) => !nh.setext,
                    _ => false,
                };
                if chop {
                    line_to_add = strings::chop_trailing_hashes(line);
                }
                // Chopping can leave the line shorter than first_nonspace
                // when an ATX line holds nothing but hashes and spaces; there
                // is no text to add then.
                if self.first_nonspace <= line_to_add.len() {
                    let count = self.first_nonspace - self.offset;
                    self.advance_offset(line, count, false);
                    self.add_line(container, line_to_add);
                }
            } else {
                container = self.add_child(container, NodeValue::Paragraph, self.first_nonspace + 1);
                let count = self.first_nonspace - self.offset;
                self.advance_offset(line, count, false);
                self.add_line(container, line);
            }

            self.current = container;
        }
    }

    fn add_line(&mut self, node: &'a AstNode<'a>, line: &str) {
        let mut ast = node.data.borrow_mut();
        assert!(ast.open);
        if self.partially_consumed_tab {
            self.offset += 1;
            let tab_stop = self.options.tab_stop();
            let chars_to_tab = tab_stop - (self.column % tab_stop);
            for _ in 0..chars_to_tab {
                ast.content.push(' ');
            }
        }
        if self.offset < line.len() {
            ast.content.push_str(&line[self.offset..]);
        }
    }

    fn finish(&mut self) -> &'a AstNode<'a> {
        if !self.linebuf.is_empty() {
            let linebuf = mem::take(&mut self.linebuf);
            self.process_line(&linebuf);
        }

        loop {
            match self.finalize(self.current) {
                Some(parent) => self.current = parent,
                None => break,
            }
        }

        self.process_inlines();

        self.root
    }

    fn finalize(&mut self, node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
        let parent = node.parent();

        enum Kind {
            Paragraph,
            CodeBlock,
            HtmlBlock,
            List,
            Other,
        }

        let kind = {
            let mut ast = node.data.borrow_mut();
            assert!(ast.open);
            ast.open = false;
            match ast.value {
                NodeValue::Paragraph => Kind::Paragraph,
                NodeValue::CodeBlock(..) => Kind::CodeBlock,
                NodeValue::HtmlBlock(..) => Kind::HtmlBlock,
                NodeValue::List(..) => Kind::List,
                _ => Kind::Other,
            }
        };

        match kind {
            Kind::Paragraph => {
                // A paragraph consisting solely of reference definitions is
                // unlinked entirely.
                if !self.resolve_reference_link_definitions(node) {
                    node.detach();
                }
            }
            Kind::CodeBlock => {
                let mut ast = node.data.borrow_mut();
                let mut content = mem::take(&mut ast.content);
                let NodeValue::CodeBlock(ref mut ncb) = ast.value else {
                    unreachable!()
                };

                if !ncb.fenced {
                    strings::remove_trailing_blank_lines(&mut content);
                    content.push('\n');
                } else {
                    // The first line is the info string.
                    let mut pos = 0;
                    while pos < content.len() {
                        if strings::is_line_end_char(content.as_bytes()[pos]) {
                            break;
                        }
                        pos += 1;
                    }
                    assert!(pos < content.len());

                    let mut info = entity::unescape_html(&content[..pos]);
                    strings::trim(&mut info);
                    strings::unescape(&mut info);
                    ncb.info = info;

                    if content.as_bytes()[pos] == b'\r' {
                        pos += 1;
                    }
                    if pos < content.len() && content.as_bytes()[pos] == b'\n' {
                        pos += 1;
                    }
                    content.drain(..pos);
                }
                ncb.literal = content;
            }
            Kind::HtmlBlock => {
                let mut ast = node.data.borrow_mut();
                let mut content = mem::take(&mut ast.content);
                strings::remove_trailing_blank_lines(&mut content);
                content.push('\n');
                let NodeValue::HtmlBlock(ref mut nhb) = ast.value else {
                    unreachable!()
                };
                nhb.literal = content;
            }
            Kind::List => {
                let tight = self.determine_list_tight(node);
                let mut ast = node.data.borrow_mut();
                let NodeValue::List(ref mut nl) = ast.value else {
                    unreachable!()
                };
                nl.tight = tight;
            }
            Kind::Other => (),
        }

        parent
    }

    /// A list is loose when any non-final item, or any item child followed
    /// by further content, ends with a blank line.
    fn determine_list_tight(&self, node: &'a AstNode<'a>) -> bool {
        let mut ch = node.first_child();

        while let Some(item) = ch {
            if item.data.borrow().last_line_blank && item.next_sibling().is_some() {
                return false;
            }

            let mut subch = item.first_child();
            while let Some(subitem) = subch {
                if (item.next_sibling().is_some() || subitem.next_sibling().is_some())
                    && nodes::ends_with_blank_line(subitem)
                {
                    return false;
                }
                subch = subitem.next_sibling();
            }

            ch = item.next_sibling();
        }

        true
    }

    /////////////
    // Inlines //
    /////////////

    fn process_inlines(&mut self) {
        self.process_inlines_node(self.root);
    }

    fn process_inlines_node(&mut self, node: &'a AstNode<'a>) {
        if node.data.borrow().value.contains_inlines() {
            self.parse_inlines(node);

            if self.options.extensions.contains(Extensions::AUTOLINK) {
                let mut text_nodes = vec![];
                collect_text_nodes(node, &mut text_nodes);
                for text_node in text_nodes {
                    autolink::process_autolinks(self.arena, text_node);
                }
            }
            return;
        }

        for child in node.children() {
            self.process_inlines_node(child);
        }
    }

    fn parse_inlines(&mut self, node: &'a AstNode<'a>) {
        let delimiter_arena = Arena::new();
        let mut content = mem::take(&mut node.data.borrow_mut().content);
        strings::rtrim(&mut content);

        let mut subj = inlines::Subject::new(
            self.arena,
            self.options,
            &content,
            &mut self.refmap,
            &delimiter_arena,
        );

        while subj.parse_inline(node) {}
        subj.process_emphasis(None);
        while subj.pop_bracket() {}
    }

    ////////////////
    // References //
    ////////////////

    /// Extract reference definitions from the head of a paragraph's content.
    /// Returns whether any content remains afterwards.
    fn resolve_reference_link_definitions(&mut self, node: &'a AstNode<'a>) -> bool {
        let mut seeked = 0;
        let mut refs_to_add = vec![];

        {
            let ast = node.data.borrow();
            let content = &ast.content;
            while seeked < content.len() && content.as_bytes()[seeked] == b'[' {
                if let Some((offset, rr)) = self.parse_reference_inline(&content[seeked..]) {
                    seeked += offset;
                    if let Some(rr) = rr {
                        refs_to_add.push(rr);
                    }
                } else {
                    break;
                }
            }
        }

        for (lab, rr) in refs_to_add {
            self.refmap.entry(lab).or_insert(rr);
        }

        if seeked != 0 {
            strings::remove_from_start(&mut node.data.borrow_mut().content, seeked);
        }

        !strings::is_blank(&node.data.borrow().content)
    }

    fn parse_reference_inline(
        &self,
        content: &str,
    ) -> Option<(usize, Option<(String, Reference)>)> {
        let (mut pos, lab) = inlines::scan_link_label(content)?;
        if lab.is_empty() {
            return None;
        }

        if content.as_bytes().get(pos) != Some(&b':') {
            return None;
        }
        pos += 1;
        pos = spnl(content, pos);

        let (url, matchlen) = inlines::manual_scan_link_url(&content[pos..])?;
        let url = strings::clean_url(url);
        pos += matchlen;

        let beforetitle = pos;
        pos = spnl(content, pos);
        let title_search = if pos == beforetitle {
            None
        } else {
            scanners::link_title(&content[pos..])
        };
        let title = match title_search {
            Some(matchlen) => {
                let t = content[pos..pos + matchlen].to_string();
                pos += matchlen;
                t
            }
            None => {
                pos = beforetitle;
                String::new()
            }
        };

        pos = skip_spaces(content, pos);
        let (afterward, seen_line_end) = skip_line_end(content, pos);
        if seen_line_end {
            pos = afterward;
        } else if !title.is_empty() {
            // The title must end the line; if it does not, retry without it.
            pos = skip_spaces(content, beforetitle);
            let (afterward, seen_line_end) = skip_line_end(content, pos);
            if !seen_line_end {
                return None;
            }
            pos = afterward;
        } else {
            return None;
        }

        let lab = strings::normalize_label(lab);
        let mut rr = None;
        if !lab.is_empty() && !self.refmap.contains_key(&lab) {
            rr = Some((
                lab,
                Reference {
                    url,
                    title: strings::clean_title(&title),
                },
            ));
        }

        Some((pos, rr))
    }
}

fn skip_spaces(s: &str, mut pos: usize) -> usize {
    let bytes = s.as_bytes();
    while pos < s.len() && strings::is_space_or_tab(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn skip_line_end(s: &str, mut pos: usize) -> (usize, bool) {
    let old_pos = pos;
    let bytes = s.as_bytes();
    if pos < s.len() && bytes[pos] == b'\r' {
        pos += 1;
    }
    if pos < s.len() && bytes[pos] == b'\n' {
        pos += 1;
    }
    (pos, pos > old_pos || pos >= s.len())
}

fn spnl(s: &str, pos: usize) -> usize {
    let pos = skip_spaces(s, pos);
    let (afterward, seen_line_end) = skip_line_end(s, pos);
    if seen_line_end {
        skip_spaces(s, afterward)
    } else {
        pos
    }
}

fn collect_text_nodes<'a>(node: &'a AstNode<'a>, out: &mut Vec<&'a AstNode<'a>>) {
    for child in node.children() {
        match child.data.borrow().value {
            NodeValue::Text(..) => out.push(child),
            // Autolinks never nest inside completed links or images.
            NodeValue::Link(..) | NodeValue::Image(..) => (),
            _ => collect_text_nodes(child, out),
        }
    }
}

fn parse_list_marker(
    line: &str,
    mut pos: usize,
    interrupts_paragraph: bool,
) -> Option<(usize, NodeList)> {
    let bytes = line.as_bytes();
    let mut c = bytes[pos];
    let startpos = pos;

    if c == b'*' || c == b'-' || c == b'+' {
        pos += 1;
        if !isspace(bytes[pos]) {
            return None;
        }

        if interrupts_paragraph {
            let mut i = pos;
            while strings::is_space_or_tab(bytes[i]) {
                i += 1;
            }
            if bytes[i] == b'\n' {
                return None;
            }
        }

        return Some((
            pos - startpos,
            NodeList {
                list_type: ListType::Bullet,
                marker_offset: 0,
                padding: 0,
                start: 1,
                delimiter: ListDelimType::Period,
                bullet_char: c,
                tight: false,
            },
        ));
    }

    if isdigit(c) {
        let mut start: usize = 0;
        let mut digits = 0;

        loop {
            start = (10 * start) + (bytes[pos] - b'0') as usize;
            pos += 1;
            digits += 1;

            if !(digits < 9 && isdigit(bytes[pos])) {
                break;
            }
        }

        // An ordered marker interrupting a paragraph must start at 1.
        if interrupts_paragraph && start != 1 {
            return None;
        }

        c = bytes[pos];
        if c != b'.' && c != b')' {
            return None;
        }

        pos += 1;

        if !isspace(bytes[pos]) {
            return None;
        }

        if interrupts_paragraph {
            let mut i = pos;
            while strings::is_space_or_tab(bytes[i]) {
                i += 1;
            }
            if strings::is_line_end_char(bytes[i]) {
                return None;
            }
        }

        return Some((
            pos - startpos,
            NodeList {
                list_type: ListType::Ordered,
                marker_offset: 0,
                padding: 0,
                start,
                delimiter: if c == b'.' {
                    ListDelimType::Period
                } else {
                    ListDelimType::Paren
                },
                bullet_char: 0,
                tight: false,
            },
        ));
    }

    None
}

fn lists_match(list_data: &NodeList, item_data: &NodeList) -> bool {
    list_data.list_type == item_data.list_type
        && list_data.delimiter == item_data.delimiter
        && list_data.bullet_char == item_data.bullet_char
}
