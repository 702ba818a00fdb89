use crate::{markdown_to_html, markdown_to_latex, Options};

mod autolinks;
mod blocks;
mod flags;
mod inlines;
mod latex;
mod links;
mod lists;
mod pathological;

fn compare_strs(output: &str, expected: &str, kind: &str) {
    if output != expected {
        println!("Running {} test", kind);
        println!("Got:");
        println!("==============================");
        println!("{}", output);
        println!("==============================");
        println!();
        println!("Expected:");
        println!("==============================");
        println!("{}", expected);
        println!("==============================");
        println!();
    }
    assert_eq!(output, expected);
}

#[track_caller]
fn html(input: &str, expected: &str) {
    html_opts(input, expected, |_| ());
}

#[track_caller]
fn html_opts<F>(input: &str, expected: &str, opts: F)
where
    F: Fn(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);

    let output = markdown_to_html(input, &options);
    compare_strs(&output, expected, "regular");
}

#[track_caller]
fn latex(input: &str, expected: &str) {
    let options = Options::default();
    let output = markdown_to_latex(input, &options);
    compare_strs(&output, expected, "latex");
}

/// Parsing a rendered document again must leave it unchanged: every line of
/// the output is either a raw HTML block or contained in one.
#[track_caller]
fn assert_html_fixed_point(input: &str) {
    let options = Options::default();
    let once = markdown_to_html(input, &options);
    let twice = markdown_to_html(&once, &options);
    compare_strs(&twice, &once, "fixed point");
}
