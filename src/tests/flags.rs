use super::*;
use crate::{Extensions, RenderFlags};

#[test]
fn strikethrough() {
    html_opts("~~gone~~\n", "<p><del>gone</del></p>\n", |opts| {
        opts.extensions |= Extensions::STRIKETHROUGH;
    });

    // Without the extension, tildes are plain text.
    html("~~gone~~\n", "<p>~~gone~~</p>\n");
}

#[test]
fn no_intra_emphasis() {
    html_opts("intra*word*emph\n", "<p>intra*word*emph</p>\n", |opts| {
        opts.extensions |= Extensions::NO_INTRA_EMPHASIS;
    });

    html("intra*word*emph\n", "<p>intra<em>word</em>emph</p>\n");
}

#[test]
fn hard_line_break_extension() {
    html_opts("a\nb\n", "<p>a<br />\nb</p>\n", |opts| {
        opts.extensions |= Extensions::HARD_LINE_BREAK;
    });
}

#[test]
fn tab_size_eight() {
    html_opts(
        "\tcode\n",
        "<pre><code>    code\n</code></pre>\n",
        |opts| {
            opts.extensions |= Extensions::TAB_SIZE_EIGHT;
        },
    );
}

#[test]
fn smart_quotes() {
    html_opts("'quoted'\n", "<p>\u{2018}quoted\u{2019}</p>\n", |opts| {
        opts.render |= RenderFlags::USE_SMARTYPANTS;
    });
    html_opts("\"quoted\"\n", "<p>\u{201c}quoted\u{201d}</p>\n", |opts| {
        opts.render |= RenderFlags::USE_SMARTYPANTS;
    });
    html_opts("it's\n", "<p>it\u{2019}s</p>\n", |opts| {
        opts.render |= RenderFlags::USE_SMARTYPANTS;
    });

    html("'quoted'\n", "<p>'quoted'</p>\n");
}

#[test]
fn safe_link() {
    html_opts("[x](javascript:alert())\n", "<p><tt>x</tt></p>\n", |opts| {
        opts.render |= RenderFlags::SAFE_LINK;
    });
    html_opts(
        "[x](https://ok.example)\n",
        "<p><a href=\"https://ok.example\">x</a></p>\n",
        |opts| {
            opts.render |= RenderFlags::SAFE_LINK;
        },
    );
    html_opts(
        "[x](/relative)\n",
        "<p><a href=\"/relative\">x</a></p>\n",
        |opts| {
            opts.render |= RenderFlags::SAFE_LINK;
        },
    );
}

#[test]
fn skip_links() {
    html_opts("[x](/y)\n", "<p>x</p>\n", |opts| {
        opts.render |= RenderFlags::SKIP_LINKS;
    });
}

#[test]
fn skip_images() {
    html_opts("![a](/b)\n", "<p></p>\n", |opts| {
        opts.render |= RenderFlags::SKIP_IMAGES;
    });
}

#[test]
fn skip_html() {
    html_opts(
        "<div>\nhi\n</div>\n\ntext <b>x</b>\n",
        "<p>text x</p>\n",
        |opts| {
            opts.render |= RenderFlags::SKIP_HTML;
        },
    );
}

#[test]
fn link_rel_and_target() {
    html_opts(
        "[x](http://e.com/)\n",
        "<p><a href=\"http://e.com/\" rel=\"nofollow\" target=\"_blank\">x</a></p>\n",
        |opts| {
            opts.render |= RenderFlags::NOFOLLOW_LINKS | RenderFlags::HREF_TARGET_BLANK;
        },
    );

    // Relative destinations never get a blank target.
    html_opts(
        "[x](/local)\n",
        "<p><a href=\"/local\">x</a></p>\n",
        |opts| {
            opts.render |= RenderFlags::HREF_TARGET_BLANK;
        },
    );
}

#[test]
fn complete_page() {
    html_opts(
        "hi\n",
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head>\n",
            "  <title>T</title>\n",
            "  <meta charset=\"utf-8\">\n",
            "</head>\n",
            "<body>\n",
            "\n",
            "<p>hi</p>\n",
            "\n",
            "</body>\n",
            "</html>\n"
        ),
        |opts| {
            opts.render |= RenderFlags::COMPLETE_PAGE;
            opts.title = "T".to_string();
        },
    );
}
