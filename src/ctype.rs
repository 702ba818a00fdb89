//! Byte classification helpers matching the C locale, used throughout the
//! parser.  Markdown structure is ASCII; multi-byte UTF-8 sequences never
//! match any of these.

pub fn isspace(ch: u8) -> bool {
    matches!(ch, 9..=13 | 32)
}

pub fn ispunct(ch: u8) -> bool {
    matches!(ch, 33..=47 | 58..=64 | 91..=96 | 123..=126)
}

pub fn isdigit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

pub fn isalpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn isalnum(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
}
