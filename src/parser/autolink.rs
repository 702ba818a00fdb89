//! Bare autolink detection for the `AUTOLINK` extension: `www.` domains,
//! `http(s)`/`ftp` URLs and email addresses appearing in plain text, without
//! any angle-bracket delimiters.

use crate::ctype::{isalnum, isalpha, isspace};
use crate::nodes::{AstNode, NodeLink, NodeValue};
use crate::parser::inlines::make_inline;
use typed_arena::Arena;
use unicode_categories::UnicodeCategories;

/// Rewrite one `Text` node, splitting every autolink found in it into a
/// `Link` sibling.  `node` must be a `Text` node outside any link.
pub fn process_autolinks<'a>(arena: &'a Arena<AstNode<'a>>, node: &'a AstNode<'a>) {
    let mut current = node;

    loop {
        // (link node, match position, rewind, skip)
        let mut found: Option<(&'a AstNode<'a>, usize, usize, usize)> = None;
        {
            let data = current.data.borrow();
            let contents = match data.value.text() {
                Some(t) => t,
                None => return,
            };
            let bytes = contents.as_bytes();
            let mut i = 0;
            while i < contents.len() {
                let m = match bytes[i] {
                    b':' => url_match(arena, contents, i),
                    b'w' => www_match(arena, contents, i),
                    b'@' => email_match(arena, contents, i),
                    _ => None,
                };
                if let Some((post, reverse, skip)) = m {
                    found = Some((post, i, reverse, skip));
                    break;
                }
                i += 1;
            }
        }

        let (post, i, reverse, skip) = match found {
            Some(f) => f,
            None => return,
        };
        let start = i - reverse;

        current.insert_after(post);

        let remain = {
            let data = current.data.borrow();
            let contents = data.value.text().unwrap();
            if start + skip < contents.len() {
                Some(contents[start + skip..].to_string())
            } else {
                None
            }
        };
        current
            .data
            .borrow_mut()
            .value
            .text_mut()
            .unwrap()
            .truncate(start);

        match remain {
            Some(remain) => {
                let remain_node = make_inline(arena, NodeValue::Text(remain));
                post.insert_after(remain_node);
                current = remain_node;
            }
            None => return,
        }
    }
}

fn make_link<'a>(arena: &'a Arena<AstNode<'a>>, url: String, text: String) -> &'a AstNode<'a> {
    let inl = make_inline(
        arena,
        NodeValue::Link(NodeLink {
            url,
            title: String::new(),
        }),
    );
    inl.append(make_inline(arena, NodeValue::Text(text)));
    inl
}

fn is_valid_hostchar(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_punctuation()
}

/// Validate a domain: period-separated components of host characters, where
/// underscores may appear only in components other than the last two.
/// Returns the length of the domain part.
fn check_domain(data: &str) -> Option<usize> {
    let mut np = 0;
    let mut uscore1 = 0;
    let mut uscore2 = 0;

    for (i, c) in data.char_indices() {
        if c == '_' {
            uscore2 += 1;
        } else if c == '.' {
            uscore1 = uscore2;
            uscore2 = 0;
            np += 1;
        } else if !is_valid_hostchar(c) && c != '-' {
            if uscore1 == 0 && uscore2 == 0 && np > 0 {
                return Some(i);
            }
            return None;
        }
    }

    if uscore1 == 0 && uscore2 == 0 && np > 0 {
        Some(data.len())
    } else {
        None
    }
}

/// Trim trailing punctuation, entity remnants, and unbalanced closing
/// parentheses from a candidate link.
fn autolink_delim(data: &str, mut link_end: usize) -> usize {
    let bytes = data.as_bytes();

    for (i, &b) in bytes.iter().enumerate().take(link_end) {
        if b == b'<' {
            link_end = i;
            break;
        }
    }

    while link_end > 0 {
        let cclose = bytes[link_end - 1];

        if matches!(
            cclose,
            b'?' | b'!' | b'.' | b',' | b':' | b'*' | b'_' | b'~' | b'\'' | b'"'
        ) {
            link_end -= 1;
        } else if cclose == b';' {
            let mut new_end = link_end - 2;

            while new_end > 0 && isalpha(bytes[new_end]) {
                new_end -= 1;
            }

            if new_end < link_end - 2 && bytes[new_end] == b'&' {
                link_end = new_end;
            } else {
                link_end -= 1;
            }
        } else if cclose == b')' {
            let mut opening = 0;
            let mut closing = 0;
            for &b in bytes.iter().take(link_end) {
                if b == b'(' {
                    opening += 1;
                } else if b == b')' {
                    closing += 1;
                }
            }

            if closing <= opening {
                break;
            }

            link_end -= 1;
        } else {
            break;
        }
    }

    link_end
}

fn www_match<'a>(
    arena: &'a Arena<AstNode<'a>>,
    contents: &str,
    i: usize,
) -> Option<(&'a AstNode<'a>, usize, usize)> {
    let bytes = contents.as_bytes();

    if i > 0
        && !isspace(bytes[i - 1])
        && !matches!(bytes[i - 1], b'*' | b'_' | b'~' | b'(' | b'[')
    {
        return None;
    }

    if contents.len() - i < 4 || &contents[i..i + 4] != "www." {
        return None;
    }

    let mut link_end = check_domain(&contents[i..])?;

    while i + link_end < contents.len() && !isspace(bytes[i + link_end]) {
        link_end += 1;
    }

    link_end = autolink_delim(&contents[i..], link_end);

    let url = format!("http://{}", &contents[i..link_end + i]);
    let inl = make_link(arena, url, contents[i..link_end + i].to_string());

    Some((inl, 0, link_end))
}

fn url_match<'a>(
    arena: &'a Arena<AstNode<'a>>,
    contents: &str,
    i: usize,
) -> Option<(&'a AstNode<'a>, usize, usize)> {
    const SCHEMES: [&str; 3] = ["http", "https", "ftp"];

    let bytes = contents.as_bytes();
    let size = contents.len();

    if size - i < 4 || bytes[i + 1] != b'/' || bytes[i + 2] != b'/' {
        return None;
    }

    let mut rewind = 0;
    while rewind < i && isalpha(bytes[i - rewind - 1]) {
        rewind += 1;
    }

    if !SCHEMES.iter().any(|s| &contents[i - rewind..i] == *s) {
        return None;
    }

    let mut link_end = check_domain(&contents[i + 3..])?;

    while link_end < size - i && !isspace(bytes[i + link_end]) {
        link_end += 1;
    }

    link_end = autolink_delim(&contents[i..], link_end);

    let url = contents[i - rewind..i + link_end].to_string();
    let inl = make_link(arena, url.clone(), url);

    Some((inl, rewind, rewind + link_end))
}

fn email_match<'a>(
    arena: &'a Arena<AstNode<'a>>,
    contents: &str,
    i: usize,
) -> Option<(&'a AstNode<'a>, usize, usize)> {
    let bytes = contents.as_bytes();
    let size = contents.len();

    let mut rewind = 0;
    let mut ns = 0;

    while rewind < i {
        let c = bytes[i - rewind - 1];

        if isalnum(c) || matches!(c, b'.' | b'+' | b'-' | b'_') {
            rewind += 1;
            continue;
        }

        if c == b'/' {
            ns += 1;
        }

        break;
    }

    if rewind == 0 || ns > 0 {
        return None;
    }

    let mut link_end = 0;
    let mut nb = 0;
    let mut np = 0;

    while link_end < size - i {
        let c = bytes[i + link_end];

        if isalnum(c) {
            // part of the address
        } else if c == b'@' {
            nb += 1;
        } else if c == b'.' && link_end < size - i - 1 {
            np += 1;
        } else if c != b'-' && c != b'_' {
            break;
        }

        link_end += 1;
    }

    if link_end < 2
        || nb != 1
        || np == 0
        || (!isalpha(bytes[i + link_end - 1]) && bytes[i + link_end - 1] != b'.')
    {
        return None;
    }

    link_end = autolink_delim(&contents[i..], link_end);

    let url = format!("mailto:{}", &contents[i - rewind..link_end + i]);
    let inl = make_link(arena, url, contents[i - rewind..link_end + i].to_string());

    Some((inl, rewind, rewind + link_end))
}
