use super::*;
use crate::Extensions;

fn html_autolink(input: &str, expected: &str) {
    html_opts(input, expected, |opts| {
        opts.extensions |= Extensions::AUTOLINK;
    });
}

#[test]
fn www_autolink() {
    html_autolink(
        "visit www.example.com now\n",
        "<p>visit <a href=\"http://www.example.com\">www.example.com</a> now</p>\n",
    );
}

#[test]
fn url_autolink() {
    html_autolink(
        "see https://ex.org/x.\n",
        "<p>see <a href=\"https://ex.org/x\">https://ex.org/x</a>.</p>\n",
    );
}

#[test]
fn email_autolink() {
    html_autolink(
        "mail me@example.com ok\n",
        "<p>mail <a href=\"mailto:me@example.com\">me@example.com</a> ok</p>\n",
    );
}

#[test]
fn no_autolink_inside_links() {
    html_autolink(
        "[www.example.com](/elsewhere)\n",
        "<p><a href=\"/elsewhere\">www.example.com</a></p>\n",
    );
}

#[test]
fn autolinks_off_by_default() {
    html(
        "visit www.example.com now\n",
        "<p>visit www.example.com now</p>\n",
    );
}
