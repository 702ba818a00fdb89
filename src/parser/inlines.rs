//! The inline parser.  A `Subject` scans one block's accumulated content,
//! appending inline nodes to the block and keeping a doubly linked delimiter
//! stack which a second pass (`process_emphasis`) resolves into `Emph`,
//! `Strong` and friends.

use crate::ctype::ispunct;
use crate::entity;
use crate::nodes::{Ast, AstNode, NodeLink, NodeValue};
use crate::parser::{AutolinkType, Extensions, Options, Reference};
use crate::scanners;
use crate::strings;
use crate::tree::Node;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ptr;
use typed_arena::Arena;
use unicode_categories::UnicodeCategories;

const MAX_BACKTICKS: usize = 80;
const MAX_LINK_LABEL_LENGTH: usize = 1000;

pub struct Subject<'a: 'd, 'r, 'o, 'd, 'i> {
    pub arena: &'a Arena<AstNode<'a>>,
    options: &'o Options,
    pub input: &'i str,
    pub pos: usize,
    pub refmap: &'r mut HashMap<String, Reference>,
    delimiter_arena: &'d Arena<Delimiter<'a, 'd>>,
    last_delimiter: Option<&'d Delimiter<'a, 'd>>,
    brackets: Vec<Bracket<'a, 'd>>,
    backticks: [usize; MAX_BACKTICKS + 1],
    scanned_for_backticks: bool,
    special_chars: [bool; 256],
}

/// One record of the delimiter stack.  `length` keeps the original run
/// length; the text node shrinks as emphasis consumes characters.
pub struct Delimiter<'a: 'd, 'd> {
    inl: &'a AstNode<'a>,
    length: usize,
    delim_char: u8,
    can_open: bool,
    can_close: bool,
    prev: Cell<Option<&'d Delimiter<'a, 'd>>>,
    next: Cell<Option<&'d Delimiter<'a, 'd>>>,
}

struct Bracket<'a: 'd, 'd> {
    previous_delimiter: Option<&'d Delimiter<'a, 'd>>,
    inl_text: &'a AstNode<'a>,
    position: usize,
    image: bool,
    active: bool,
    bracket_after: bool,
}

impl<'a, 'r, 'o, 'd, 'i> Subject<'a, 'r, 'o, 'd, 'i> {
    pub fn new(
        arena: &'a Arena<AstNode<'a>>,
        options: &'o Options,
        input: &'i str,
        refmap: &'r mut HashMap<String, Reference>,
        delimiter_arena: &'d Arena<Delimiter<'a, 'd>>,
    ) -> Self {
        let mut s = Subject {
            arena,
            options,
            input,
            pos: 0,
            refmap,
            delimiter_arena,
            last_delimiter: None,
            brackets: vec![],
            backticks: [0; MAX_BACKTICKS + 1],
            scanned_for_backticks: false,
            special_chars: [false; 256],
        };
        for &c in &[
            b'\n', b'\r', b'_', b'*', b'`', b'\\', b'&', b'<', b'[', b']', b'!',
        ] {
            s.special_chars[c as usize] = true;
        }
        if options.extensions.contains(Extensions::STRIKETHROUGH) {
            s.special_chars[b'~' as usize] = true;
        }
        if options.smart() {
            s.special_chars[b'\'' as usize] = true;
            s.special_chars[b'"' as usize] = true;
        }
        s
    }

    /// Consume one inline construct, appending the produced node to `node`.
    /// Returns false at end of input.
    pub fn parse_inline(&mut self, node: &'a AstNode<'a>) -> bool {
        let c = match self.peek_char() {
            None => return false,
            Some(ch) => *ch as char,
        };

        let new_inl: Option<&'a AstNode<'a>> = match c {
            '\r' | '\n' => Some(self.handle_newline()),
            '`' => Some(self.handle_backticks()),
            '\\' => Some(self.handle_backslash()),
            '&' => Some(self.handle_entity()),
            '<' => Some(self.handle_pointy_brace()),
            '*' | '_' => Some(self.handle_delim(c as u8)),
            '~' if self.options.extensions.contains(Extensions::STRIKETHROUGH) => {
                Some(self.handle_delim(b'~'))
            }
            '\'' | '"' if self.options.smart() => Some(self.handle_delim(c as u8)),
            '[' => {
                self.pos += 1;
                let inl = make_inline(self.arena, NodeValue::Text("[".to_string()));
                self.push_bracket(false, inl);
                Some(inl)
            }
            ']' => self.handle_close_bracket(),
            '!' => {
                self.pos += 1;
                if self.peek_char() == Some(&b'[') {
                    self.pos += 1;
                    let inl = make_inline(self.arena, NodeValue::Text("![".to_string()));
                    self.push_bracket(true, inl);
                    Some(inl)
                } else {
                    Some(make_inline(self.arena, NodeValue::Text("!".to_string())))
                }
            }
            _ => {
                let endpos = self.find_special_char();
                let mut contents = self.input[self.pos..endpos].to_string();
                self.pos = endpos;

                if self
                    .peek_char()
                    .map_or(false, |&c| strings::is_line_end_char(c))
                {
                    strings::rtrim(&mut contents);
                }

                Some(make_inline(self.arena, NodeValue::Text(contents)))
            }
        };

        if let Some(inl) = new_inl {
            node.append(inl);
        }

        true
    }

    fn del_ref_eq(lhs: Option<&'d Delimiter<'a, 'd>>, rhs: Option<&'d Delimiter<'a, 'd>>) -> bool {
        match (lhs, rhs) {
            (None, None) => true,
            (Some(l), Some(r)) => ptr::eq(l, r),
            _ => false,
        }
    }

    /// Resolve emphasis over the delimiters above `stack_bottom`, which must
    /// be either `None` (the whole stack) or a delimiter that remains in the
    /// stack.
    pub fn process_emphasis(&mut self, stack_bottom: Option<&'d Delimiter<'a, 'd>>) {
        // For each (closer length % 3, delimiter char): the position below
        // which no opener search need ever look again.
        let mut openers_bottom: [[Option<&'d Delimiter<'a, 'd>>; 128]; 3] = [[None; 128]; 3];
        for row in &mut openers_bottom {
            for &ch in &[b'*', b'_', b'\'', b'"', b'~'] {
                row[ch as usize] = stack_bottom;
            }
        }

        let mut closer = self.last_delimiter;
        while let Some(c) = closer {
            if Self::del_ref_eq(c.prev.get(), stack_bottom) {
                break;
            }
            closer = c.prev.get();
        }

        while let Some(c) = closer {
            if !c.can_close {
                closer = c.next.get();
                continue;
            }

            let bottom = openers_bottom[c.length % 3][c.delim_char as usize];
            let mut opener = c.prev.get();
            let mut opener_found = None;

            while let Some(o) = opener {
                if Self::del_ref_eq(Some(o), stack_bottom) || Self::del_ref_eq(Some(o), bottom) {
                    break;
                }
                if o.can_open && o.delim_char == c.delim_char {
                    // The "multiple of 3" rule: a closer that could also
                    // open (or vice versa) must not pair up when the two run
                    // lengths sum to a multiple of 3, unless both already
                    // are multiples of 3.
                    let odd_match = (c.can_open || o.can_close)
                        && (o.length + c.length) % 3 == 0
                        && !(o.length % 3 == 0 && c.length % 3 == 0);
                    if !odd_match {
                        opener_found = Some(o);
                        break;
                    }
                }
                opener = o.prev.get();
            }

            let old_closer = c;

            match c.delim_char {
                b'*' | b'_' | b'~' => {
                    if let Some(o) = opener_found {
                        closer = self.insert_emph(o, c);
                    } else {
                        closer = c.next.get();
                    }
                }
                b'\'' | b'"' => {
                    let quotes = if c.delim_char == b'\'' {
                        ("’", "‘")
                    } else {
                        ("”", "“")
                    };
                    *c.inl.data.borrow_mut().value.text_mut().unwrap() = quotes.0.to_string();
                    if let Some(o) = opener_found {
                        *o.inl.data.borrow_mut().value.text_mut().unwrap() = quotes.1.to_string();
                    }
                    closer = c.next.get();
                }
                _ => unreachable!(),
            }

            if opener_found.is_none() {
                openers_bottom[old_closer.length % 3][old_closer.delim_char as usize] =
                    old_closer.prev.get();
                if !old_closer.can_open {
                    self.remove_delimiter(old_closer);
                }
            }
        }

        while let Some(d) = self.last_delimiter {
            if Self::del_ref_eq(Some(d), stack_bottom) {
                break;
            }
            self.remove_delimiter(d);
        }
    }

    fn remove_delimiter(&mut self, delimiter: &'d Delimiter<'a, 'd>) {
        match delimiter.next.get() {
            None => {
                assert!(ptr::eq(delimiter, self.last_delimiter.unwrap()));
                self.last_delimiter = delimiter.prev.get();
            }
            Some(next) => next.prev.set(delimiter.prev.get()),
        }
        if let Some(prev) = delimiter.prev.get() {
            prev.next.set(delimiter.next.get());
        }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek_char(&self) -> Option<&u8> {
        if self.eof() {
            None
        } else {
            let c = &self.input.as_bytes()[self.pos];
            assert!(*c > 0);
            Some(c)
        }
    }

    fn find_special_char(&self) -> usize {
        for n in self.pos..self.input.len() {
            if self.special_chars[self.input.as_bytes()[n] as usize] {
                return n;
            }
        }
        self.input.len()
    }

    fn handle_newline(&mut self) -> &'a AstNode<'a> {
        let nlpos = self.pos;
        let bytes = self.input.as_bytes();
        if bytes[self.pos] == b'\r' {
            self.pos += 1;
        }
        if self.pos < self.input.len() && bytes[self.pos] == b'\n' {
            self.pos += 1;
        }
        self.skip_spaces();
        if nlpos > 1 && bytes[nlpos - 1] == b' ' && bytes[nlpos - 2] == b' ' {
            make_inline(self.arena, NodeValue::LineBreak)
        } else {
            make_inline(self.arena, NodeValue::SoftBreak)
        }
    }

    fn take_while(&mut self, c: u8) -> usize {
        let start = self.pos;
        while self.peek_char() == Some(&c) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn scan_to_closing_backtick(&mut self, openticklength: usize) -> Option<usize> {
        if openticklength > MAX_BACKTICKS {
            return None;
        }

        if self.scanned_for_backticks && self.backticks[openticklength] <= self.pos {
            return None;
        }

        loop {
            while self.peek_char().map_or(false, |&c| c != b'`') {
                self.pos += 1;
            }
            if self.eof() {
                self.scanned_for_backticks = true;
                return None;
            }
            let numticks = self.take_while(b'`');
            if numticks <= MAX_BACKTICKS {
                self.backticks[numticks] = self.pos - numticks;
            }
            if numticks == openticklength {
                return Some(self.pos);
            }
        }
    }

    fn handle_backticks(&mut self) -> &'a AstNode<'a> {
        let startpos = self.pos;
        let openticks = self.take_while(b'`');
        let afteropen = self.pos;

        match self.scan_to_closing_backtick(openticks) {
            None => {
                self.pos = afteropen;
                make_inline(
                    self.arena,
                    NodeValue::Text(self.input[startpos..afteropen].to_string()),
                )
            }
            Some(endpos) => {
                let buf = &self.input[afteropen..endpos - openticks];
                let buf = strings::normalize_code(buf);
                make_inline(self.arena, NodeValue::Code(buf))
            }
        }
    }

    pub fn skip_spaces(&mut self) -> bool {
        let mut skipped = false;
        while self.peek_char().map_or(false, |&c| c == b' ' || c == b'\t') {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn handle_delim(&mut self, c: u8) -> &'a AstNode<'a> {
        let (numdelims, can_open, can_close) = self.scan_delims(c);

        let contents = self.input[self.pos - numdelims..self.pos].to_string();
        let inl = make_inline(self.arena, NodeValue::Text(contents));

        if (can_open || can_close) && (!matches!(c, b'\'' | b'"') || self.options.smart()) {
            self.push_delimiter(c, numdelims, can_open, can_close, inl);
        }

        inl
    }

    fn scan_delims(&mut self, c: u8) -> (usize, bool, bool) {
        let bytes = self.input.as_bytes();

        let before_char = if self.pos == 0 {
            '\n'
        } else {
            let mut before_char_pos = self.pos - 1;
            while before_char_pos > 0 && bytes[before_char_pos] >> 6 == 2 {
                before_char_pos -= 1;
            }
            self.input[before_char_pos..].chars().next().unwrap()
        };

        let mut numdelims = 0;
        if c == b'\'' || c == b'"' {
            numdelims += 1;
            self.pos += 1;
        } else {
            while self.peek_char() == Some(&c) {
                numdelims += 1;
                self.pos += 1;
            }
        }

        let after_char = if self.eof() {
            '\n'
        } else {
            self.input[self.pos..].chars().next().unwrap()
        };

        let left_flanking = numdelims > 0
            && !after_char.is_whitespace()
            && !(after_char.is_punctuation()
                && !before_char.is_whitespace()
                && !before_char.is_punctuation());
        let right_flanking = numdelims > 0
            && !before_char.is_whitespace()
            && !(before_char.is_punctuation()
                && !after_char.is_whitespace()
                && !after_char.is_punctuation());

        // `_` may not open or close intraword emphasis; under
        // NO_INTRA_EMPHASIS the same restriction applies to `*`.
        if c == b'_'
            || (c == b'*'
                && self
                    .options
                    .extensions
                    .contains(Extensions::NO_INTRA_EMPHASIS))
        {
            (
                numdelims,
                left_flanking && (!right_flanking || before_char.is_punctuation()),
                right_flanking && (!left_flanking || after_char.is_punctuation()),
            )
        } else if c == b'\'' || c == b'"' {
            (numdelims, left_flanking && !right_flanking, right_flanking)
        } else {
            (numdelims, left_flanking, right_flanking)
        }
    }

    fn push_delimiter(
        &mut self,
        c: u8,
        length: usize,
        can_open: bool,
        can_close: bool,
        inl: &'a AstNode<'a>,
    ) {
        let d = self.delimiter_arena.alloc(Delimiter {
            prev: Cell::new(self.last_delimiter),
            next: Cell::new(None),
            inl,
            length,
            delim_char: c,
            can_open,
            can_close,
        });
        if let Some(prev) = d.prev.get() {
            prev.next.set(Some(d));
        }
        self.last_delimiter = Some(d);
    }

    /// Wrap the inlines between `opener` and `closer` in an emphasis node,
    /// consuming delimiter characters from both ends.  Returns the next
    /// closer candidate.
    fn insert_emph(
        &mut self,
        opener: &'d Delimiter<'a, 'd>,
        closer: &'d Delimiter<'a, 'd>,
    ) -> Option<&'d Delimiter<'a, 'd>> {
        let opener_char = opener.inl.data.borrow().value.text().unwrap().as_bytes()[0];
        let mut opener_num_chars = opener.inl.data.borrow().value.text().unwrap().len();
        let mut closer_num_chars = closer.inl.data.borrow().value.text().unwrap().len();
        let use_delims = if closer_num_chars >= 2 && opener_num_chars >= 2 {
            2
        } else {
            1
        };

        opener_num_chars -= use_delims;
        closer_num_chars -= use_delims;

        // A strikethrough run is consumed whole.
        if opener_char == b'~' {
            opener_num_chars = 0;
            closer_num_chars = 0;
        }

        opener
            .inl
            .data
            .borrow_mut()
            .value
            .text_mut()
            .unwrap()
            .truncate(opener_num_chars);
        closer
            .inl
            .data
            .borrow_mut()
            .value
            .text_mut()
            .unwrap()
            .truncate(closer_num_chars);

        let mut delim = closer.prev.get();
        while let Some(d) = delim {
            if Self::del_ref_eq(Some(d), Some(opener)) {
                break;
            }
            self.remove_delimiter(d);
            delim = d.prev.get();
        }

        let emph = make_inline(
            self.arena,
            if opener_char == b'~' {
                NodeValue::Strikethrough
            } else if use_delims == 1 {
                NodeValue::Emph
            } else {
                NodeValue::Strong
            },
        );

        let mut tmp = opener.inl.next_sibling().unwrap();
        while !tmp.same_node(closer.inl) {
            let next = tmp.next_sibling();
            emph.append(tmp);
            match next {
                Some(n) => tmp = n,
                None => break,
            }
        }
        opener.inl.insert_after(emph);

        if opener_num_chars == 0 {
            opener.inl.detach();
            self.remove_delimiter(opener);
        }

        if closer_num_chars == 0 {
            closer.inl.detach();
            self.remove_delimiter(closer);
            closer.next.get()
        } else {
            Some(closer)
        }
    }

    fn handle_backslash(&mut self) -> &'a AstNode<'a> {
        self.pos += 1;
        if self.peek_char().map_or(false, |&c| ispunct(c)) {
            self.pos += 1;
            make_inline(
                self.arena,
                NodeValue::Text((self.input.as_bytes()[self.pos - 1] as char).to_string()),
            )
        } else if !self.eof() && self.skip_line_end() {
            make_inline(self.arena, NodeValue::LineBreak)
        } else {
            make_inline(self.arena, NodeValue::Text("\\".to_string()))
        }
    }

    pub fn skip_line_end(&mut self) -> bool {
        let old_pos = self.pos;
        if self.peek_char() == Some(&b'\r') {
            self.pos += 1;
        }
        if self.peek_char() == Some(&b'\n') {
            self.pos += 1;
        }
        self.pos > old_pos || self.eof()
    }

    fn handle_entity(&mut self) -> &'a AstNode<'a> {
        self.pos += 1;

        match entity::unescape(&self.input[self.pos..]) {
            None => make_inline(self.arena, NodeValue::Text("&".to_string())),
            Some((entity, len)) => {
                self.pos += len;
                make_inline(self.arena, NodeValue::Text(entity))
            }
        }
    }

    fn handle_pointy_brace(&mut self) -> &'a AstNode<'a> {
        self.pos += 1;

        if let Some(matchlen) = scanners::autolink_uri(&self.input[self.pos..]) {
            let inl = make_autolink(
                self.arena,
                &self.input[self.pos..self.pos + matchlen - 1],
                AutolinkType::Uri,
            );
            self.pos += matchlen;
            return inl;
        }

        if let Some(matchlen) = scanners::autolink_email(&self.input[self.pos..]) {
            let inl = make_autolink(
                self.arena,
                &self.input[self.pos..self.pos + matchlen - 1],
                AutolinkType::Email,
            );
            self.pos += matchlen;
            return inl;
        }

        if let Some(matchlen) = scanners::html_tag(&self.input[self.pos..]) {
            let contents = &self.input[self.pos - 1..self.pos + matchlen];
            let inl = make_inline(self.arena, NodeValue::HtmlInline(contents.to_string()));
            self.pos += matchlen;
            return inl;
        }

        make_inline(self.arena, NodeValue::Text("<".to_string()))
    }

    fn push_bracket(&mut self, image: bool, inl_text: &'a AstNode<'a>) {
        let len = self.brackets.len();
        if len > 0 {
            self.brackets[len - 1].bracket_after = true;
        }
        self.brackets.push(Bracket {
            previous_delimiter: self.last_delimiter,
            inl_text,
            position: self.pos,
            image,
            active: true,
            bracket_after: false,
        });
    }

    pub fn pop_bracket(&mut self) -> bool {
        self.brackets.pop().is_some()
    }

    fn handle_close_bracket(&mut self) -> Option<&'a AstNode<'a>> {
        self.pos += 1;
        let initial_pos = self.pos;

        let brackets_len = self.brackets.len();
        if brackets_len == 0 {
            return Some(make_inline(self.arena, NodeValue::Text("]".to_string())));
        }

        if !self.brackets[brackets_len - 1].active {
            self.brackets.pop();
            return Some(make_inline(self.arena, NodeValue::Text("]".to_string())));
        }

        let is_image = self.brackets[brackets_len - 1].image;
        let after_link_text_pos = self.pos;

        // Try an inline link: `(`, optional spaces, destination, optional
        // title, optional spaces, `)`.
        if self.peek_char() == Some(&b'(') {
            let sps = scanners::spacechars(&self.input[self.pos + 1..]).unwrap_or(0);
            if let Some((url, n)) = manual_scan_link_url(&self.input[self.pos + 1 + sps..]) {
                let starturl = self.pos + 1 + sps;
                let endurl = starturl + n;
                let starttitle =
                    endurl + scanners::spacechars(&self.input[endurl..]).unwrap_or(0);
                let endtitle = if starttitle == endurl {
                    starttitle
                } else {
                    starttitle + scanners::link_title(&self.input[starttitle..]).unwrap_or(0)
                };
                let endall = endtitle + scanners::spacechars(&self.input[endtitle..]).unwrap_or(0);

                if self.input.as_bytes().get(endall) == Some(&b')') {
                    self.pos = endall + 1;
                    let url = strings::clean_url(url);
                    let title = strings::clean_title(&self.input[starttitle..endtitle]);
                    self.close_bracket_match(is_image, url, title);
                    return None;
                }
            }
            self.pos = after_link_text_pos;
        }

        // Then a reference link: a following `[label]`, or the bracketed
        // text itself as a shortcut reference.
        let (mut lab, mut found_label) = match self.link_label() {
            Some(lab) => (lab.to_string(), true),
            None => (String::new(), false),
        };

        if !found_label {
            self.pos = initial_pos;
        }

        if (!found_label || lab.is_empty()) && !self.brackets[brackets_len - 1].bracket_after {
            lab = self.input[self.brackets[brackets_len - 1].position..initial_pos - 1].to_string();
            found_label = true;
        }

        let reff: Option<Reference> = if found_label {
            lab = strings::normalize_label(&lab);
            self.refmap.get(&lab).cloned()
        } else {
            None
        };

        if let Some(reff) = reff {
            self.close_bracket_match(is_image, reff.url, reff.title);
            return None;
        }

        self.brackets.pop();
        self.pos = initial_pos;
        Some(make_inline(self.arena, NodeValue::Text("]".to_string())))
    }

    fn close_bracket_match(&mut self, is_image: bool, url: String, title: String) {
        let nl = NodeLink { url, title };
        let inl = make_inline(
            self.arena,
            if is_image {
                NodeValue::Image(nl)
            } else {
                NodeValue::Link(nl)
            },
        );

        let mut brackets_len = self.brackets.len();
        self.brackets[brackets_len - 1].inl_text.insert_before(inl);
        let mut tmpch = self.brackets[brackets_len - 1].inl_text.next_sibling();
        while let Some(tmp) = tmpch {
            tmpch = tmp.next_sibling();
            inl.append(tmp);
        }
        self.brackets[brackets_len - 1].inl_text.detach();
        let previous_delimiter = self.brackets[brackets_len - 1].previous_delimiter;
        self.process_emphasis(previous_delimiter);
        self.brackets.pop();
        brackets_len -= 1;

        // Links may not nest: deactivate every pending `[` below a completed
        // link so later `]`s fall through to literal text.
        if !is_image {
            let mut i = brackets_len as i32 - 1;
            while i >= 0 {
                if !self.brackets[i as usize].image {
                    if !self.brackets[i as usize].active {
                        break;
                    }
                    self.brackets[i as usize].active = false;
                }
                i -= 1;
            }
        }
    }

    fn link_label(&mut self) -> Option<&'i str> {
        let (len, label) = scan_link_label(&self.input[self.pos..])?;
        self.pos += len;
        Some(label)
    }
}

/// Scan a `[label]` at the start of `input`.  Returns the bytes consumed
/// (including both brackets) and the trimmed label.  Labels longer than 1000
/// bytes or containing an unescaped bracket do not match.
pub fn scan_link_label(input: &str) -> Option<(usize, &str)> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let mut i = 1;
    let mut length = 0;
    while i < input.len() && bytes[i] != b'[' && bytes[i] != b']' {
        if bytes[i] == b'\\' {
            i += 1;
            length += 1;
            if i < input.len() && ispunct(bytes[i]) {
                i += 1;
                length += 1;
            }
        } else {
            i += 1;
            length += 1;
        }
        if length > MAX_LINK_LABEL_LENGTH {
            return None;
        }
    }

    if bytes.get(i) == Some(&b']') {
        Some((i + 1, strings::trim_slice(&input[1..i])))
    } else {
        None
    }
}

/// Scan a link destination: either `<...>` with no unescaped newlines or
/// angle brackets, or a bare run with balanced parentheses.  Returns the
/// destination (without any angle brackets) and the bytes consumed.
pub fn manual_scan_link_url(input: &str) -> Option<(&str, usize)> {
    let len = input.len();
    let bytes = input.as_bytes();

    if len > 0 && bytes[0] == b'<' {
        let mut i = 1;
        while i < len {
            match bytes[i] {
                b'>' => return Some((&input[1..i], i + 1)),
                b'\\' => i += 2,
                b'<' | b'\n' | b'\r' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut i = 0;
    let mut nb_p = 0;
    while i < len {
        match bytes[i] {
            b'\\' => i += 2,
            b'(' => {
                nb_p += 1;
                i += 1;
                if nb_p > 32 {
                    return None;
                }
            }
            b')' => {
                if nb_p == 0 {
                    break;
                }
                nb_p -= 1;
                i += 1;
            }
            c if crate::ctype::isspace(c) => break,
            _ => i += 1,
        }
    }

    if i >= len {
        None
    } else {
        Some((&input[..i], i))
    }
}

pub fn make_inline<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    let ast = Ast {
        value,
        content: String::new(),
        start_line: 0,
        start_column: 0,
        open: false,
        last_line_blank: false,
    };
    arena.alloc(Node::new(RefCell::new(ast)))
}

fn make_autolink<'a>(
    arena: &'a Arena<AstNode<'a>>,
    url: &str,
    kind: AutolinkType,
) -> &'a AstNode<'a> {
    let inl = make_inline(
        arena,
        NodeValue::Link(NodeLink {
            url: strings::clean_autolink(url, kind),
            title: String::new(),
        }),
    );
    inl.append(make_inline(
        arena,
        NodeValue::Text(entity::unescape_html(url)),
    ));
    inl
}
