use super::*;

#[test]
fn emphasis() {
    html("*hello*\n", "<p><em>hello</em></p>\n");
    html("**world**\n", "<p><strong>world</strong></p>\n");
    html("***both***\n", "<p><em><strong>both</strong></em></p>\n");
}

#[test]
fn emphasis_in_strong() {
    html(
        "**foo *bar* baz**\n",
        "<p><strong>foo <em>bar</em> baz</strong></p>\n",
    );
}

#[test]
fn underscore_does_not_match_intraword() {
    html("_foo_bar_baz_\n", "<p><em>foo_bar_baz</em></p>\n");
}

#[test]
fn unmatched_delimiters_are_literal() {
    html("*foo\n", "<p>*foo</p>\n");
    html("foo*\n", "<p>foo*</p>\n");
    html("**\n", "<p>**</p>\n");
}

#[test]
fn code_spans() {
    html("`code`\n", "<p><code>code</code></p>\n");
    html("`` ` ``\n", "<p><code>`</code></p>\n");
    html("`a\nb`\n", "<p><code>a b</code></p>\n");
}

#[test]
fn unterminated_code_span() {
    html("`foo\n", "<p>`foo</p>\n");
}

#[test]
fn code_span_beats_emphasis() {
    html("*foo `bar*`\n", "<p>*foo <code>bar*</code></p>\n");
}

#[test]
fn backslash_escapes() {
    html("\\*not emph\\*\n", "<p>*not emph*</p>\n");
    html("a\\b\n", "<p>a\\b</p>\n");
}

#[test]
fn hard_breaks() {
    html("a  \nb\n", "<p>a<br />\nb</p>\n");
    html("a\\\nb\n", "<p>a<br />\nb</p>\n");
}

#[test]
fn soft_break() {
    html("a\nb\n", "<p>a\nb</p>\n");
}

#[test]
fn entities() {
    html("&amp; &#35; &#x22;\n", "<p>&amp; # &quot;</p>\n");
    html("&copy;\n", "<p>©</p>\n");
    html("&bogus;\n", "<p>&amp;bogus;</p>\n");
}

#[test]
fn entities_survive_a_decode_encode_cycle() {
    html("&amp;copy;\n", "<p>&amp;copy;</p>\n");
}

#[test]
fn uri_autolink() {
    html(
        "<https://example.com>\n",
        "<p><a href=\"https://example.com\">https://example.com</a></p>\n",
    );
    html(
        "<http://a.com?x=1&y=2>\n",
        "<p><a href=\"http://a.com?x=1&amp;y=2\">http://a.com?x=1&amp;y=2</a></p>\n",
    );
}

#[test]
fn email_autolink() {
    html(
        "an email <some@one.com>\n",
        "<p>an email <a href=\"mailto:some@one.com\">some@one.com</a></p>\n",
    );
}

#[test]
fn inline_html() {
    html("foo <b>bar</b>\n", "<p>foo <b>bar</b></p>\n");
    html("an <!-- inline --> comment\n", "<p>an <!-- inline --> comment</p>\n");
}

#[test]
fn stray_angle_bracket() {
    html("1 < 2\n", "<p>1 &lt; 2</p>\n");
}

#[test]
fn text_is_escaped() {
    html(
        "\"quotes\" & <angles>\n",
        "<p>&quot;quotes&quot; &amp; <angles></p>\n",
    );
}
