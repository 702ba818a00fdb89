//! The LaTeX renderer, driven by the same entering/leaving walk as the HTML
//! renderer.

use crate::nodes::{AstNode, ListType, NodeValue};
use crate::parser::Options;
use crate::tree::NodeEdge;
use std::io::{self, Write};

/// Render a document tree as LaTeX.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    _options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    // Depth of image nesting; an image renders as \includegraphics and its
    // alt-text subtree is dropped.
    let mut suppress_depth = 0usize;

    for edge in root.traverse() {
        let (node, entering) = match edge {
            NodeEdge::Start(node) => (node, true),
            NodeEdge::End(node) => (node, false),
        };

        if matches!(node.data.borrow().value, NodeValue::Image(..)) {
            if entering {
                if suppress_depth == 0 {
                    let data = node.data.borrow();
                    if let NodeValue::Image(ref nl) = data.value {
                        write!(output, "\\includegraphics{{{}}}", escape_url(&nl.url))?;
                    }
                }
                suppress_depth += 1;
            } else {
                suppress_depth -= 1;
            }
            continue;
        }

        if suppress_depth > 0 {
            continue;
        }

        format_node(node, entering, output)?;
    }

    Ok(())
}

fn format_node<'a>(
    node: &'a AstNode<'a>,
    entering: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    match node.data.borrow().value {
        NodeValue::Document => (),
        NodeValue::BlockQuote => {
            if entering {
                out.write_all(b"\\begin{quotation}\n")?;
            } else {
                out.write_all(b"\\end{quotation}\n")?;
            }
        }
        NodeValue::List(ref nl) => {
            let env = if nl.list_type == ListType::Ordered {
                "enumerate"
            } else {
                "itemize"
            };
            if entering {
                write!(out, "\\begin{{{}}}\n", env)?;
            } else {
                write!(out, "\\end{{{}}}\n", env)?;
            }
        }
        NodeValue::Item(..) => {
            if entering {
                out.write_all(b"\\item ")?;
            }
        }
        NodeValue::Heading(ref nh) => {
            if entering {
                let cmd = match nh.level {
                    1 => "\\section{",
                    2 => "\\subsection{",
                    3 => "\\subsubsection{",
                    4 => "\\paragraph{",
                    5 => "\\subparagraph{",
                    _ => "\\textbf{",
                };
                out.write_all(cmd.as_bytes())?;
            } else {
                out.write_all(b"}\n")?;
            }
        }
        NodeValue::CodeBlock(ref ncb) => {
            if entering {
                let lang = ncb.info.split_whitespace().next().unwrap_or("");
                if lang.is_empty() {
                    out.write_all(b"\\begin{verbatim}\n")?;
                    out.write_all(ncb.literal.as_bytes())?;
                    out.write_all(b"\\end{verbatim}\n")?;
                } else {
                    write!(out, "\\begin{{lstlisting}}[language={}]\n", lang)?;
                    out.write_all(ncb.literal.as_bytes())?;
                    out.write_all(b"\\end{lstlisting}\n")?;
                }
            }
        }
        NodeValue::HtmlBlock(ref nhb) => {
            // Raw HTML has no LaTeX form; keep it visible rather than lose
            // content.
            if entering {
                out.write_all(b"\\begin{verbatim}\n")?;
                out.write_all(nhb.literal.as_bytes())?;
                out.write_all(b"\\end{verbatim}\n")?;
            }
        }
        NodeValue::HtmlInline(..) => (),
        NodeValue::ThematicBreak => {
            if entering {
                out.write_all(b"\\HRule\n")?;
            }
        }
        NodeValue::Paragraph => {
            if !entering {
                if node.next_sibling().is_some() {
                    out.write_all(b"\n\n")?;
                } else {
                    out.write_all(b"\n")?;
                }
            }
        }
        NodeValue::Text(ref literal) => {
            if entering {
                out.write_all(escape_text(literal).as_bytes())?;
            }
        }
        NodeValue::SoftBreak => {
            if entering {
                out.write_all(b"\n")?;
            }
        }
        NodeValue::LineBreak => {
            if entering {
                out.write_all(b" \\\\\n")?;
            }
        }
        NodeValue::Code(ref literal) => {
            if entering {
                write!(out, "\\texttt{{{}}}", escape_text(literal))?;
            }
        }
        NodeValue::Emph => {
            if entering {
                out.write_all(b"\\textit{")?;
            } else {
                out.write_all(b"}")?;
            }
        }
        NodeValue::Strong => {
            if entering {
                out.write_all(b"\\textbf{")?;
            } else {
                out.write_all(b"}")?;
            }
        }
        NodeValue::Strikethrough => {
            if entering {
                out.write_all(b"\\sout{")?;
            } else {
                out.write_all(b"}")?;
            }
        }
        NodeValue::Link(ref nl) => {
            if entering {
                write!(out, "\\href{{{}}}{{", escape_url(&nl.url))?;
            } else {
                out.write_all(b"}")?;
            }
        }
        NodeValue::Image(..) => unreachable!("handled by the walk driver"),
    }
    Ok(())
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' | '#' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
