//! Anchored lexical scanners.  Each pattern is compiled once and reused
//! across parses; every function matches at the start of its input and
//! returns the byte length of the match.

use once_cell::sync::Lazy;
use regex::Regex;

pub fn atx_heading_start(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}([ \t]+|[\r\n])").unwrap());
    RE.find(line).map(|m| m.end())
}

pub enum SetextChar {
    Equals,
    Hyphen,
}

pub fn setext_heading_line(line: &str) -> Option<SetextChar> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(=+|-+)[ \t]*[\r\n]").unwrap());
    if RE.is_match(line) {
        if line.as_bytes()[0] == b'=' {
            Some(SetextChar::Equals)
        } else {
            Some(SetextChar::Hyphen)
        }
    } else {
        None
    }
}

pub fn open_code_fence(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(`{3,}|~{3,})[^`\r\n\x00]*[\r\n]").unwrap());
    RE.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.end() - m.start())
}

pub fn close_code_fence(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(`{3,}|~{3,})[ \t]*[\r\n]").unwrap());
    RE.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.end() - m.start())
}

const BLOCK_TAG_NAMES: &str = "address|article|aside|base|basefont|blockquote|body|caption\
     |center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer\
     |form|frame|frameset|h1|h2|h3|h4|h5|h6|head|header|hr|html|iframe|legend|li|link|main\
     |menu|menuitem|meta|nav|noframes|ol|optgroup|option|p|param|section|source|summary\
     |table|tbody|td|tfoot|th|thead|title|tr|track|ul";

const SPACE_CHAR: &str = r"[ \t\n\x0B\x0C\r]";
const TAG_NAME: &str = r"[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE_NAME: &str = r"[a-zA-Z_:][a-zA-Z0-9:._-]*";
const ATTRIBUTE_VALUE: &str = r#"(?:[^ \t\r\n"'=<>`\x00]+|'[^'\x00]*'|"[^"\x00]*")"#;

static OPEN_TAG: Lazy<String> = Lazy::new(|| {
    let attribute_value_spec = format!(r"(?:{SPACE_CHAR}*={SPACE_CHAR}*{ATTRIBUTE_VALUE})");
    let attribute = format!(r"(?:{SPACE_CHAR}+{ATTRIBUTE_NAME}{attribute_value_spec}?)");
    format!(r"{TAG_NAME}{attribute}*{SPACE_CHAR}*/?>")
});
static CLOSE_TAG: Lazy<String> = Lazy::new(|| format!(r"/{TAG_NAME}{SPACE_CHAR}*>"));

/// Try the HTML block start conditions for kinds 1 through 6 in order.
pub fn html_block_start(line: &str) -> Option<usize> {
    static RE1: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^<(?i:script|pre|style)([ \t\n\x0B\x0C\r]|>)").unwrap());
    static RE2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!--").unwrap());
    static RE3: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<\?").unwrap());
    static RE4: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<![A-Z]").unwrap());
    static RE5: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!\[CDATA\[").unwrap());
    static RE6: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^</?(?i:{BLOCK_TAG_NAMES})([ \t\n\x0B\x0C\r]|/?>)"
        ))
        .unwrap()
    });

    if RE1.is_match(line) {
        Some(1)
    } else if RE2.is_match(line) {
        Some(2)
    } else if RE3.is_match(line) {
        Some(3)
    } else if RE4.is_match(line) {
        Some(4)
    } else if RE5.is_match(line) {
        Some(5)
    } else if RE6.is_match(line) {
        Some(6)
    } else {
        None
    }
}

/// The kind 7 start condition: a complete open or close tag alone on the
/// line.
pub fn html_block_start_7(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^<(?:{}|{})[ \t]*[\r\n]",
            &*OPEN_TAG, &*CLOSE_TAG
        ))
        .unwrap()
    });

    if RE.is_match(line) {
        Some(7)
    } else {
        None
    }
}

// Kind 1 through 5 end conditions may fire anywhere in the line, including
// the line the block opened on.

pub fn html_block_end_1(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i:</(?:script|pre|style)>)").unwrap());
    RE.is_match(line)
}

pub fn html_block_end_2(line: &str) -> bool {
    line.contains("-->")
}

pub fn html_block_end_3(line: &str) -> bool {
    line.contains("?>")
}

pub fn html_block_end_4(line: &str) -> bool {
    line.contains('>')
}

pub fn html_block_end_5(line: &str) -> bool {
    line.contains("]]>")
}

/// A raw inline tag, matched just past a `<`: an open or close tag, comment,
/// processing instruction, declaration, or CDATA section.
pub fn html_tag(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^(?:{}|{}|!---->|!--(?:-?[^>-])(?:-?[^-])*-->|\?(?s:.*?)\?>|![A-Z][^>\x00]*>|!\[CDATA\[(?s:.*?)\]\]>)",
            &*OPEN_TAG, &*CLOSE_TAG
        ))
        .unwrap()
    });
    RE.find(line).map(|m| m.end())
}

/// A URI autolink body, matched just past a `<`.  The length includes the
/// closing `>`.
pub fn autolink_uri(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9.+-]{1,31}:[^\x00-\x20<>]*>").unwrap());
    RE.find(line).map(|m| m.end())
}

/// An email autolink body, matched just past a `<`.  The length includes the
/// closing `>`.
pub fn autolink_email(line: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*>",
        )
        .unwrap()
    });
    RE.find(line).map(|m| m.end())
}

/// A link title in any of its three quoting styles.
pub fn link_title(s: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"^(?s:"(?:\\.|[^"\x00])*"|'(?:\\.|[^'\x00])*'|\((?:\\.|[^()\x00])*\))"#)
            .unwrap()
    });
    RE.find(s).map(|m| m.end())
}

pub fn spacechars(s: &str) -> Option<usize> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t\n\x0B\x0C\r]+").unwrap());
    RE.find(s).map(|m| m.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx() {
        assert_eq!(atx_heading_start("# h\n"), Some(2));
        assert_eq!(atx_heading_start("###\n"), Some(4));
        assert_eq!(atx_heading_start("####### no\n"), None);
        assert_eq!(atx_heading_start("#no\n"), None);
    }

    #[test]
    fn fences() {
        assert_eq!(open_code_fence("```rust\n"), Some(3));
        assert_eq!(open_code_fence("~~~~\n"), Some(4));
        assert_eq!(open_code_fence("``\n"), None);
        assert_eq!(close_code_fence("```  \n"), Some(3));
        assert_eq!(close_code_fence("``` x\n"), None);
    }

    #[test]
    fn html_starts() {
        assert_eq!(html_block_start("<pre>\n"), Some(1));
        assert_eq!(html_block_start("<!-- c\n"), Some(2));
        assert_eq!(html_block_start("<div class=x>\n"), Some(6));
        assert_eq!(html_block_start("<span>\n"), None);
        assert_eq!(html_block_start_7("<span>\n"), Some(7));
        assert_eq!(html_block_start_7("<span>text\n"), None);
    }

    #[test]
    fn tags() {
        assert_eq!(html_tag("a href=\"x\">rest"), Some(11));
        assert_eq!(html_tag("/div>"), Some(5));
        assert_eq!(html_tag("!--ok-->"), Some(8));
        assert_eq!(html_tag("3>"), None);
    }

    #[test]
    fn autolinks() {
        assert_eq!(autolink_uri("https://e.com/x>"), Some(16));
        assert_eq!(autolink_uri("not a uri>"), None);
        assert_eq!(autolink_email("some@one.com>"), Some(13));
    }

    #[test]
    fn titles() {
        assert_eq!(link_title("\"a b\""), Some(5));
        assert_eq!(link_title("'a\\'b'"), Some(6));
        assert_eq!(link_title("(t)"), Some(3));
        assert_eq!(link_title("\"open"), None);
    }
}
