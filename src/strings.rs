//! Small buffer utilities shared by the block and inline parsers.

use crate::ctype::{ispunct, isspace};
use crate::entity;
use crate::parser::AutolinkType;

pub fn is_line_end_char(ch: u8) -> bool {
    matches!(ch, b'\n' | b'\r')
}

pub fn is_space_or_tab(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t')
}

/// True if `s` holds nothing before its first line ending.
pub fn is_blank(s: &str) -> bool {
    for &c in s.as_bytes() {
        match c {
            b'\n' | b'\r' => return true,
            b' ' | b'\t' => (),
            _ => return false,
        }
    }
    true
}

pub fn ltrim(s: &mut String) {
    let spaces = s.bytes().take_while(|&b| isspace(b)).count();
    s.drain(..spaces);
}

pub fn rtrim(s: &mut String) {
    let spaces = s.bytes().rev().take_while(|&b| isspace(b)).count();
    s.truncate(s.len() - spaces);
}

pub fn trim(s: &mut String) {
    ltrim(s);
    rtrim(s);
}

pub fn ltrim_slice(mut s: &str) -> &str {
    while let Some(&first) = s.as_bytes().first() {
        if !isspace(first) {
            break;
        }
        s = &s[1..];
    }
    s
}

pub fn rtrim_slice(mut s: &str) -> &str {
    while let Some(&last) = s.as_bytes().last() {
        if !isspace(last) {
            break;
        }
        s = &s[..s.len() - 1];
    }
    s
}

pub fn trim_slice(s: &str) -> &str {
    rtrim_slice(ltrim_slice(s))
}

pub fn remove_from_start(s: &mut String, n: usize) {
    s.drain(..n);
}

/// Strip an ATX heading's closing hash run: trailing whitespace, then a run
/// of `#` preceded by a space or tab.  `## foo ##` content becomes `## foo`;
/// callers slice past the opening marker themselves.
pub fn chop_trailing_hashes(line: &str) -> &str {
    let line = rtrim_slice(line);
    let bytes = line.as_bytes();

    let mut n = line.len();
    while n > 0 && bytes[n - 1] == b'#' {
        n -= 1;
    }

    if n == line.len() {
        line
    } else if n == 0 {
        ""
    } else if is_space_or_tab(bytes[n - 1]) {
        rtrim_slice(&line[..n])
    } else {
        line
    }
}

/// Truncate `s` after the last line holding any non-blank content, dropping
/// that line's terminator as well.
pub fn remove_trailing_blank_lines(s: &mut String) {
    let bytes = s.as_bytes();
    let mut i = s.len();
    loop {
        if i == 0 {
            s.clear();
            return;
        }
        let c = bytes[i - 1];
        if c != b' ' && c != b'\t' && !is_line_end_char(c) {
            break;
        }
        i -= 1;
    }

    for (pos, &c) in s.as_bytes().iter().enumerate().skip(i) {
        if is_line_end_char(c) {
            s.truncate(pos);
            return;
        }
    }
}

/// Normalise the contents of a code span: line endings become spaces, and a
/// single space is stripped from both ends when present and the span holds
/// any non-space content.
pub fn normalize_code(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut r = Vec::with_capacity(s.len());
    let mut contains_nonspace = false;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if i + 1 == bytes.len() || bytes[i + 1] != b'\n' {
                    r.push(b' ');
                }
            }
            b'\n' => r.push(b' '),
            c => r.push(c),
        }
        if !matches!(bytes[i], b' ' | b'\r' | b'\n') {
            contains_nonspace = true;
        }
        i += 1;
    }

    if contains_nonspace && r.first() == Some(&b' ') && r.last() == Some(&b' ') {
        r.remove(0);
        r.pop();
    }

    // Only line endings were replaced, one byte for one byte.
    String::from_utf8(r).unwrap()
}

/// Normalise a link label for reference-map lookup: trim, fold interior
/// whitespace runs to a single space, case-fold.
pub fn normalize_label(s: &str) -> String {
    let s = trim_slice(s);

    let mut v = String::with_capacity(s.len());
    let mut last_was_whitespace = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                last_was_whitespace = true;
                v.push(' ');
            }
        } else {
            last_was_whitespace = false;
            for e in c.to_lowercase() {
                v.push(e);
            }
        }
    }
    v
}

/// Remove backslash escapes before ASCII punctuation, in place.
pub fn unescape(s: &mut String) {
    if !s.contains('\\') {
        return;
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && ispunct(bytes[i + 1]) {
            i += 1;
        }
        out.push(bytes[i]);
        i += 1;
    }

    // Dropping a backslash before ASCII punctuation cannot break a UTF-8
    // sequence.
    *s = String::from_utf8(out).unwrap();
}

pub fn clean_url(url: &str) -> String {
    let url = trim_slice(url);
    if url.is_empty() {
        return String::new();
    }

    let mut b = entity::unescape_html(url);
    unescape(&mut b);
    b
}

pub fn clean_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let bytes = title.as_bytes();
    let first = bytes[0];
    let last = bytes[title.len() - 1];

    let mut b = if (first == b'\'' && last == b'\'')
        || (first == b'(' && last == b')')
        || (first == b'"' && last == b'"')
    {
        entity::unescape_html(&title[1..title.len() - 1])
    } else {
        entity::unescape_html(title)
    };

    unescape(&mut b);
    b
}

pub fn clean_autolink(url: &str, kind: AutolinkType) -> String {
    let url = trim_slice(url);
    if url.is_empty() {
        return String::new();
    }

    let mut buf = String::with_capacity(url.len());
    if kind == AutolinkType::Email {
        buf.push_str("mailto:");
    }
    buf.push_str(&entity::unescape_html(url));
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_normalization() {
        assert_eq!(normalize_code("\n"), " ");
        assert_eq!(normalize_code(" a "), "a");
        assert_eq!(normalize_code("  "), "  ");
        assert_eq!(normalize_code("a\nb"), "a b");
    }

    #[test]
    fn label_normalization() {
        assert_eq!(normalize_label("  FoO \t Bar "), "foo bar");
        assert_eq!(normalize_label("ẞ"), "ß".to_lowercase());
    }

    #[test]
    fn trailing_hashes() {
        assert_eq!(chop_trailing_hashes("foo ###\n"), "foo");
        assert_eq!(chop_trailing_hashes("foo#\n"), "foo#");
        assert_eq!(chop_trailing_hashes("###\n"), "");
    }

    #[test]
    fn trailing_blank_lines() {
        let mut s = "code\n   \n\t\n".to_string();
        remove_trailing_blank_lines(&mut s);
        assert_eq!(s, "code");
    }

    #[test]
    fn backslash_unescape() {
        let mut s = "a\\*b\\\\c\\d".to_string();
        unescape(&mut s);
        assert_eq!(s, "a*b\\c\\d");
    }
}
