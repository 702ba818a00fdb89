use super::*;

#[test]
fn tight_list() {
    html(
        "* List\n* Second item\n",
        concat!(
            "<ul>\n",
            "<li>List</li>\n",
            "<li>Second item</li>\n",
            "</ul>\n"
        ),
    );

    html(
        "- Hello.\n- Hi.\n",
        concat!("<ul>\n", "<li>Hello.</li>\n", "<li>Hi.</li>\n", "</ul>\n"),
    );
}

#[test]
fn ordered_list_start() {
    html(
        "2. Hello.\n3. Hi.\n",
        concat!(
            "<ol start=\"2\">\n",
            "<li>Hello.</li>\n",
            "<li>Hi.</li>\n",
            "</ol>\n"
        ),
    );

    html(
        "1. a\n2. b\n",
        concat!("<ol>\n", "<li>a</li>\n", "<li>b</li>\n", "</ol>\n"),
    );
}

#[test]
fn ordered_list_paren_delimiter() {
    html("1) a\n", "<ol>\n<li>a</li>\n</ol>\n");
}

#[test]
fn loose_list() {
    html(
        "- a\n\n- b\n",
        concat!(
            "<ul>\n",
            "<li>\n",
            "<p>a</p>\n",
            "</li>\n",
            "<li>\n",
            "<p>b</p>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn item_with_two_paragraphs_is_loose() {
    html(
        "- a\n\n  b\n",
        concat!(
            "<ul>\n",
            "<li>\n",
            "<p>a</p>\n",
            "<p>b</p>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn trailing_blank_line_keeps_list_tight() {
    html(
        "- a\n- b\n\n",
        concat!("<ul>\n", "<li>a</li>\n", "<li>b</li>\n", "</ul>\n"),
    );
}

#[test]
fn nested_list() {
    html(
        "- a\n  - b\n",
        concat!(
            "<ul>\n",
            "<li>a\n",
            "<ul>\n",
            "<li>b</li>\n",
            "</ul>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn list_interrupts_paragraph() {
    html(
        "para\n- a\n",
        concat!("<p>para</p>\n", "<ul>\n", "<li>a</li>\n", "</ul>\n"),
    );
}

#[test]
fn ordered_list_interrupts_paragraph_only_from_one() {
    html("para\n2. a\n", "<p>para\n2. a</p>\n");
    html(
        "para\n1. a\n",
        concat!("<p>para</p>\n", "<ol>\n", "<li>a</li>\n", "</ol>\n"),
    );
}

#[test]
fn list_followed_by_paragraph() {
    html(
        "- a\n\nx\n",
        concat!("<ul>\n", "<li>a</li>\n", "</ul>\n", "<p>x</p>\n"),
    );
}

#[test]
fn changing_bullet_opens_new_list() {
    html(
        "- a\n+ b\n",
        concat!(
            "<ul>\n",
            "<li>a</li>\n",
            "</ul>\n",
            "<ul>\n",
            "<li>b</li>\n",
            "</ul>\n"
        ),
    );
}
