use super::*;
use ntest::timeout;

// input: python3 -c 'n = 20000; print("*a_ " * n)'
#[test]
#[timeout(4000)]
fn pathological_emphases() {
    let n = 20_000;
    let input = "*a_ ".repeat(n);
    let mut exp = format!("<p>{}", input);
    // The right-most space is trimmed in the output.
    exp.pop();
    exp += "</p>\n";

    html(&input, &exp);
}

// input: python3 -c 'n = 20000; print("[" * n + "]" * n)'
#[test]
#[timeout(4000)]
fn pathological_brackets() {
    let n = 20_000;
    let input = format!("{}{}", "[".repeat(n), "]".repeat(n));
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}
