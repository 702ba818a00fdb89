use super::*;

#[test]
fn basic() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "<h2>Hi!</h2>\n",
            "<p>Okay.</p>\n"
        ),
    );
}

#[test]
fn atx_heading() {
    html("# Header 1\n", "<h1>Header 1</h1>\n");
    html("###### deep\n", "<h6>deep</h6>\n");
    html("####### too deep\n", "<p>####### too deep</p>\n");
    html("#no space\n", "<p>#no space</p>\n");
}

#[test]
fn atx_heading_trailing_hashes() {
    html("### foo ###\n", "<h3>foo</h3>\n");
    html("# foo#\n", "<h1>foo#</h1>\n");
    html("#\n", "<h1></h1>\n");
}

#[test]
fn setext_heading() {
    html("B\n-\n", "<h2>B</h2>\n");
    html(
        concat!("Hi\n", "==\n", "\n", "Ok\n", "-----\n"),
        concat!("<h1>Hi</h1>\n", "<h2>Ok</h2>\n"),
    );
}

#[test]
fn setext_heading_beats_thematic_break() {
    html("Foo\n---\n", "<h2>Foo</h2>\n");
}

#[test]
fn thematic_breaks() {
    html(
        concat!("---\n", "\n", "- - -\n", "\n", "\n", "_        _   _\n"),
        concat!("<hr />\n", "<hr />\n", "<hr />\n"),
    );
}

#[test]
fn indented_code() {
    html(
        "    hello\n      world\n",
        "<pre><code>hello\n  world\n</code></pre>\n",
    );
}

#[test]
fn indented_code_trailing_blanks() {
    html(
        "    code\n\n\n",
        "<pre><code>code\n</code></pre>\n",
    );
}

#[test]
fn code_with_tab() {
    html("\tcode\n", "<pre><code>code\n</code></pre>\n");
    html("  \tcode\n", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn fenced_code() {
    html(
        "```\nfunc main() {}\n```  ",
        "<pre><code>func main() {}\n</code></pre>\n",
    );
}

#[test]
fn fenced_code_info() {
    html(
        concat!("``` rust yum\n", "fn main<'a>();\n", "```\n"),
        concat!(
            "<pre><code class=\"language-rust\">fn main&lt;'a&gt;();\n",
            "</code></pre>\n"
        ),
    );
}

#[test]
fn fenced_code_unclosed_at_eof() {
    html("```\nstill code", "<pre><code>still code\n</code></pre>\n");
}

#[test]
fn fenced_code_tildes() {
    html("~~~\ntext\n~~~\n", "<pre><code>text\n</code></pre>\n");
}

#[test]
fn html_block_6() {
    html(
        "<div>\n*hello*\n</div>\n",
        "<div>\n*hello*\n</div>\n",
    );
}

#[test]
fn html_block_1() {
    html(
        "<script>\nfoo\n</script>\nbar\n",
        "<script>\nfoo\n</script>\n<p>bar</p>\n",
    );
}

#[test]
fn html_block_closed_on_opening_line() {
    html(
        "<!-- comment -->\nhello\n",
        "<!-- comment -->\n<p>hello</p>\n",
    );
}

#[test]
fn html_block_ends_at_eof() {
    html("<div>\nno close", "<div>\nno close\n");
}

#[test]
fn block_quote_lazy_continuation() {
    html("> a\nb\n", "<blockquote>\n<p>a\nb</p>\n</blockquote>\n");
}

#[test]
fn block_quotes_split_by_blank_line() {
    html(
        "> a\n\n> b\n",
        concat!(
            "<blockquote>\n",
            "<p>a</p>\n",
            "</blockquote>\n",
            "<blockquote>\n",
            "<p>b</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn block_quote_with_heading() {
    html(
        "> # Foo\n> bar\n> baz\n",
        concat!(
            "<blockquote>\n",
            "<h1>Foo</h1>\n",
            "<p>bar\nbaz</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn carriage_returns_are_normalized() {
    html("a\r\nb\r\n", "<p>a\nb</p>\n");
}

#[test]
fn nul_bytes_are_replaced() {
    html("a\0b\n", "<p>a\u{fffd}b</p>\n");
}

#[test]
fn no_trailing_newline() {
    html("hello", "<p>hello</p>\n");
}

#[test]
fn empty_input() {
    html("", "");
}

#[test]
fn rendered_output_is_a_fixed_point() {
    for input in [
        "# Header 1\n",
        "My **document**.\n",
        "* List\n* Second item\n",
        "> Yes.\n",
        "```\ncode here\n```\n",
        "a `span` and <b>tag</b>\n",
    ] {
        assert_html_fixed_point(input);
    }
}
