//! A CommonMark parser and renderer.
//!
//! Input is parsed line by line into a document tree; a second pass rewrites
//! paragraph and heading contents into inline nodes, resolving emphasis and
//! links through a delimiter stack.  Renderers consume the finished tree
//! through an entering/leaving walk.
//!
//! ```
//! use cormark::{markdown_to_html, Options};
//!
//! assert_eq!(
//!     markdown_to_html("Hello, **world**!\n", &Options::default()),
//!     "<p>Hello, <strong>world</strong>!</p>\n"
//! );
//! ```
//!
//! For access to the tree itself, allocate an arena and parse into it:
//!
//! ```
//! use cormark::{html, parse_document, Arena, Options};
//!
//! let arena = Arena::new();
//! let options = Options::default();
//! let root = parse_document(&arena, "# Title\n", &options);
//!
//! let mut out = vec![];
//! html::format_document(root, &options, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "<h1>Title</h1>\n");
//! ```

mod ctype;
mod entity;
pub mod html;
pub mod latex;
pub mod nodes;
mod parser;
mod scanners;
mod strings;
pub mod tree;

#[cfg(test)]
mod tests;

pub use parser::{parse_document, Extensions, Options, Reference, RenderFlags};
pub use typed_arena::Arena;

/// Render Markdown to HTML in one call.
pub fn markdown_to_html(md: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, md, options);
    let mut out = vec![];
    html::format_document(root, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Render Markdown to LaTeX in one call.
pub fn markdown_to_latex(md: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, md, options);
    let mut out = vec![];
    latex::format_document(root, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}
