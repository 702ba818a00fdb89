//! The HTML renderer.  Walks the finished tree depth-first, entering and
//! leaving each node, and writes UTF-8 HTML to any `io::Write`.

use crate::ctype::isspace;
use crate::nodes::{AstNode, ListType, NodeValue};
use crate::parser::{Extensions, Options, RenderFlags};
use once_cell::sync::Lazy;
use std::cell::Cell;
use std::io::{self, Write};

/// Render a document tree as HTML, honouring the given options.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    let mut writer = WriteWithLast {
        output,
        last_was_lf: Cell::new(true),
    };
    let mut f = HtmlFormatter::new(options, &mut writer);
    f.document_header()?;
    f.format(root, false)?;
    f.document_footer()?;
    Ok(())
}

struct WriteWithLast<'w> {
    output: &'w mut dyn Write,
    last_was_lf: Cell<bool>,
}

impl<'w> Write for WriteWithLast<'w> {
    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let l = buf.len();
        if l > 0 {
            self.last_was_lf.set(buf[l - 1] == b'\n');
        }
        self.output.write(buf)
    }
}

struct HtmlFormatter<'o, 'w> {
    output: &'o mut WriteWithLast<'w>,
    options: &'o Options,
}

fn is_relative_link(url: &str) -> bool {
    url.starts_with('/') || url.starts_with("./") || url.starts_with("../") || url.starts_with('#')
}

fn is_safe_link(url: &str) -> bool {
    const SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "mailto:"];

    is_relative_link(url)
        || SCHEMES.iter().any(|prefix| {
            url.len() > prefix.len()
                && url.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        })
}

fn is_style_tag(literal: &str) -> bool {
    let trimmed = literal.trim_start();
    trimmed.len() >= 6 && trimmed.as_bytes()[..6].eq_ignore_ascii_case(b"<style")
}

impl<'o, 'w> HtmlFormatter<'o, 'w> {
    fn new(options: &'o Options, output: &'o mut WriteWithLast<'w>) -> Self {
        HtmlFormatter { options, output }
    }

    /// Write a newline unless the last byte written was one already.
    fn cr(&mut self) -> io::Result<()> {
        if !self.output.last_was_lf.get() {
            self.output.write_all(b"\n")?;
        }
        Ok(())
    }

    fn escape(&mut self, buffer: &str) -> io::Result<()> {
        let src = buffer.as_bytes();
        let size = src.len();
        let mut i = 0;

        while i < size {
            let org = i;
            while i < size && !matches!(src[i], b'"' | b'&' | b'<' | b'>') {
                i += 1;
            }

            if i > org {
                self.output.write_all(&src[org..i])?;
            }

            if i >= size {
                break;
            }

            match src[i] {
                b'"' => self.output.write_all(b"&quot;")?,
                b'&' => self.output.write_all(b"&amp;")?,
                b'<' => self.output.write_all(b"&lt;")?,
                b'>' => self.output.write_all(b"&gt;")?,
                _ => unreachable!(),
            }

            i += 1;
        }

        Ok(())
    }

    fn escape_href(&mut self, buffer: &str) -> io::Result<()> {
        static HREF_SAFE: Lazy<[bool; 256]> = Lazy::new(|| {
            let mut a = [false; 256];
            for &c in
                b"-_.+!*'(),%#@?=;:/,+&$abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
            {
                a[c as usize] = true;
            }
            a
        });

        let src = buffer.as_bytes();
        let size = src.len();
        let mut i = 0;

        while i < size {
            let org = i;
            while i < size && HREF_SAFE[src[i] as usize] {
                i += 1;
            }

            if i > org {
                self.output.write_all(&src[org..i])?;
            }

            if i >= size {
                break;
            }

            match src[i] {
                b'&' => self.output.write_all(b"&amp;")?,
                b'\'' => self.output.write_all(b"&#x27;")?,
                _ => write!(self.output, "%{:02X}", src[i])?,
            }

            i += 1;
        }

        Ok(())
    }

    fn link_attrs(&mut self, url: &str) -> io::Result<()> {
        let mut rels = vec![];
        if self.options.render.contains(RenderFlags::NOFOLLOW_LINKS) {
            rels.push("nofollow");
        }
        if self.options.render.contains(RenderFlags::NOREFERRER_LINKS) {
            rels.push("noreferrer");
        }
        if !rels.is_empty() {
            write!(self.output, " rel=\"{}\"", rels.join(" "))?;
        }
        if self.options.render.contains(RenderFlags::HREF_TARGET_BLANK) && !is_relative_link(url) {
            self.output.write_all(b" target=\"_blank\"")?;
        }
        Ok(())
    }

    fn document_header(&mut self) -> io::Result<()> {
        if !self.options.render.contains(RenderFlags::COMPLETE_PAGE) {
            return Ok(());
        }

        let ending = if self.options.render.contains(RenderFlags::USE_XHTML) {
            self.output.write_all(
                b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
                  \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n",
            )?;
            self.output
                .write_all(b"<html xmlns=\"http://www.w3.org/1999/xhtml\">\n")?;
            " /"
        } else {
            self.output.write_all(b"<!DOCTYPE html>\n<html>\n")?;
            ""
        };

        self.output.write_all(b"<head>\n  <title>")?;
        let title = self.options.title.clone();
        self.escape(&title)?;
        self.output.write_all(b"</title>\n")?;
        write!(self.output, "  <meta charset=\"utf-8\"{}>\n", ending)?;
        if !self.options.css.is_empty() {
            self.output
                .write_all(b"  <link rel=\"stylesheet\" type=\"text/css\" href=\"")?;
            let css = self.options.css.clone();
            self.escape(&css)?;
            write!(self.output, "\"{}>\n", ending)?;
        }
        self.output.write_all(b"</head>\n<body>\n\n")?;

        Ok(())
    }

    fn document_footer(&mut self) -> io::Result<()> {
        if !self.options.render.contains(RenderFlags::COMPLETE_PAGE) {
            return Ok(());
        }
        self.output.write_all(b"\n</body>\n</html>\n")
    }

    fn format_children<'a>(&mut self, node: &'a AstNode<'a>, plain: bool) -> io::Result<()> {
        for n in node.children() {
            self.format(n, plain)?;
        }
        Ok(())
    }

    fn format<'a>(&mut self, node: &'a AstNode<'a>, plain: bool) -> io::Result<()> {
        if plain {
            // Plain mode flattens a subtree to text, for image alt
            // attributes.
            match node.data.borrow().value {
                NodeValue::Text(ref literal) | NodeValue::Code(ref literal) => {
                    self.escape(literal)?;
                }
                NodeValue::LineBreak | NodeValue::SoftBreak => {
                    self.output.write_all(b" ")?;
                }
                _ => (),
            }
            self.format_children(node, true)?;
        } else {
            if self.options.render.contains(RenderFlags::SKIP_IMAGES)
                && matches!(node.data.borrow().value, NodeValue::Image(..))
            {
                return Ok(());
            }

            let new_plain = self.format_node(node, true)?;
            self.format_children(node, new_plain)?;
            self.format_node(node, false)?;
        }

        Ok(())
    }

    fn format_node<'a>(&mut self, node: &'a AstNode<'a>, entering: bool) -> io::Result<bool> {
        match node.data.borrow().value {
            NodeValue::Document => (),
            NodeValue::BlockQuote => {
                if entering {
                    self.cr()?;
                    self.output.write_all(b"<blockquote>\n")?;
                } else {
                    self.cr()?;
                    self.output.write_all(b"</blockquote>\n")?;
                }
            }
            NodeValue::List(ref nl) => {
                if entering {
                    self.cr()?;
                    if nl.list_type == ListType::Bullet {
                        self.output.write_all(b"<ul>\n")?;
                    } else if nl.start == 1 {
                        self.output.write_all(b"<ol>\n")?;
                    } else {
                        write!(self.output, "<ol start=\"{}\">\n", nl.start)?;
                    }
                } else if nl.list_type == ListType::Bullet {
                    self.output.write_all(b"</ul>\n")?;
                } else {
                    self.output.write_all(b"</ol>\n")?;
                }
            }
            NodeValue::Item(..) => {
                if entering {
                    self.cr()?;
                    self.output.write_all(b"<li>")?;
                } else {
                    self.output.write_all(b"</li>\n")?;
                }
            }
            NodeValue::Heading(ref nh) => {
                if entering {
                    self.cr()?;
                    write!(self.output, "<h{}>", nh.level)?;
                } else {
                    write!(self.output, "</h{}>\n", nh.level)?;
                }
            }
            NodeValue::CodeBlock(ref ncb) => {
                if entering {
                    self.cr()?;

                    if ncb.info.is_empty() {
                        self.output.write_all(b"<pre><code>")?;
                    } else {
                        let mut first_tag = 0;
                        while first_tag < ncb.info.len()
                            && !isspace(ncb.info.as_bytes()[first_tag])
                        {
                            first_tag += 1;
                        }

                        self.output.write_all(b"<pre><code class=\"language-")?;
                        self.escape(&ncb.info[..first_tag])?;
                        self.output.write_all(b"\">")?;
                    }
                    self.escape(&ncb.literal)?;
                    self.output.write_all(b"</code></pre>\n")?;
                }
            }
            NodeValue::HtmlBlock(ref nhb) => {
                if entering
                    && !self.options.render.contains(RenderFlags::SKIP_HTML)
                    && !(self.options.render.contains(RenderFlags::SKIP_STYLE)
                        && is_style_tag(&nhb.literal))
                {
                    self.cr()?;
                    self.output.write_all(nhb.literal.as_bytes())?;
                    self.cr()?;
                }
            }
            NodeValue::ThematicBreak => {
                if entering {
                    self.cr()?;
                    self.output.write_all(b"<hr />\n")?;
                }
            }
            NodeValue::Paragraph => {
                let tight = match node
                    .parent()
                    .and_then(|n| n.parent())
                    .map(|n| n.data.borrow().value.clone())
                {
                    Some(NodeValue::List(nl)) => nl.tight,
                    _ => false,
                };

                if entering {
                    if !tight {
                        self.cr()?;
                        self.output.write_all(b"<p>")?;
                    }
                } else if !tight {
                    self.output.write_all(b"</p>\n")?;
                }
            }
            NodeValue::Text(ref literal) => {
                if entering {
                    self.escape(literal)?;
                }
            }
            NodeValue::LineBreak => {
                if entering {
                    self.output.write_all(b"<br />\n")?;
                }
            }
            NodeValue::SoftBreak => {
                if entering {
                    if self
                        .options
                        .extensions
                        .contains(Extensions::HARD_LINE_BREAK)
                    {
                        self.output.write_all(b"<br />\n")?;
                    } else {
                        self.output.write_all(b"\n")?;
                    }
                }
            }
            NodeValue::Code(ref literal) => {
                if entering {
                    self.output.write_all(b"<code>")?;
                    self.escape(literal)?;
                    self.output.write_all(b"</code>")?;
                }
            }
            NodeValue::HtmlInline(ref literal) => {
                if entering
                    && !self.options.render.contains(RenderFlags::SKIP_HTML)
                    && !(self.options.render.contains(RenderFlags::SKIP_STYLE)
                        && is_style_tag(literal))
                {
                    self.output.write_all(literal.as_bytes())?;
                }
            }
            NodeValue::Strong => {
                if entering {
                    self.output.write_all(b"<strong>")?;
                } else {
                    self.output.write_all(b"</strong>")?;
                }
            }
            NodeValue::Emph => {
                if entering {
                    self.output.write_all(b"<em>")?;
                } else {
                    self.output.write_all(b"</em>")?;
                }
            }
            NodeValue::Strikethrough => {
                if entering {
                    self.output.write_all(b"<del>")?;
                } else {
                    self.output.write_all(b"</del>")?;
                }
            }
            NodeValue::Link(ref nl) => {
                if self.options.render.contains(RenderFlags::SKIP_LINKS) {
                    // Only the link text renders.
                } else if self.options.render.contains(RenderFlags::SAFE_LINK)
                    && !is_safe_link(&nl.url)
                {
                    if entering {
                        self.output.write_all(b"<tt>")?;
                    } else {
                        self.output.write_all(b"</tt>")?;
                    }
                } else if entering {
                    self.output.write_all(b"<a href=\"")?;
                    self.escape_href(&nl.url)?;
                    if !nl.title.is_empty() {
                        self.output.write_all(b"\" title=\"")?;
                        self.escape(&nl.title)?;
                    }
                    self.output.write_all(b"\"")?;
                    self.link_attrs(&nl.url)?;
                    self.output.write_all(b">")?;
                } else {
                    self.output.write_all(b"</a>")?;
                }
            }
            NodeValue::Image(ref nl) => {
                if entering {
                    self.output.write_all(b"<img src=\"")?;
                    self.escape_href(&nl.url)?;
                    self.output.write_all(b"\" alt=\"")?;
                    return Ok(true);
                } else {
                    if !nl.title.is_empty() {
                        self.output.write_all(b"\" title=\"")?;
                        self.escape(&nl.title)?;
                    }
                    self.output.write_all(b"\" />")?;
                }
            }
        }
        Ok(false)
    }
}
