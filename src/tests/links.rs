use super::*;

#[test]
fn inline_link() {
    html("[foo](/url)\n", "<p><a href=\"/url\">foo</a></p>\n");
    html(
        "[foo](/url \"title\")\n",
        "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
    );
}

#[test]
fn pointy_destination() {
    html("[a](<b c>)\n", "<p><a href=\"b%20c\">a</a></p>\n");
}

#[test]
fn link_in_emphasis() {
    html(
        "**foo [bar](/url)**\n",
        "<p><strong>foo <a href=\"/url\">bar</a></strong></p>\n",
    );
}

#[test]
fn shortcut_reference() {
    html(
        "[foo]\n\n[foo]: /url\n",
        "<p><a href=\"/url\">foo</a></p>\n",
    );
}

#[test]
fn full_reference() {
    html(
        "[foo][bar]\n\n[bar]: /url \"t\"\n",
        "<p><a href=\"/url\" title=\"t\">foo</a></p>\n",
    );
}

#[test]
fn collapsed_reference() {
    html("[foo][]\n\n[foo]: /u\n", "<p><a href=\"/u\">foo</a></p>\n");
}

#[test]
fn forward_reference() {
    html(
        "[later] is fine\n\n[later]: /x\n",
        "<p><a href=\"/x\">later</a> is fine</p>\n",
    );
}

#[test]
fn undefined_reference_is_literal() {
    html("[foo][nope]\n", "<p>[foo][nope]</p>\n");
}

#[test]
fn reference_labels_fold_case_and_whitespace() {
    html("[Foo]\n\n[FOO]: /url\n", "<p><a href=\"/url\">Foo</a></p>\n");
    html(
        "[foo  bar]\n\n[foo bar]: /u\n",
        "<p><a href=\"/u\">foo  bar</a></p>\n",
    );
}

#[test]
fn first_definition_wins() {
    html(
        "[foo]: /1\n[foo]: /2\n\n[foo]\n",
        "<p><a href=\"/1\">foo</a></p>\n",
    );
}

#[test]
fn definition_only_paragraph_is_removed() {
    html("[foo]: /url\n", "");
}

#[test]
fn no_links_in_links() {
    html(
        "[a [b](/inner)](/outer)\n",
        "<p>[a <a href=\"/inner\">b</a>](/outer)</p>\n",
    );
}

#[test]
fn image() {
    html(
        "![foo](/bar/ \"title\")\n",
        "<p><img src=\"/bar/\" alt=\"foo\" title=\"title\" /></p>\n",
    );
}

#[test]
fn image_alt_text_is_flattened() {
    html(
        "![*em* text](/u)\n",
        "<p><img src=\"/u\" alt=\"em text\" /></p>\n",
    );
}

#[test]
fn image_in_link() {
    html(
        "[![alt](/img)](/page)\n",
        "<p><a href=\"/page\"><img src=\"/img\" alt=\"alt\" /></a></p>\n",
    );
}
