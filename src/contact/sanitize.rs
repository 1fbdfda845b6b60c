//! Input sanitizer: normalizes and escapes untrusted form fields.
//!
//! Every field goes through [`sanitize_input`] before validation, logging
//! or being placed in an email. The transform never fails and is
//! idempotent: existing character references are not escaped twice.

use std::sync::LazyLock;

use regex::Regex;

/// Whitespace trimmed from both ends of a field.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// A character reference at the start of the input (`&amp;`, `&#39;`, `&#x27;`).
static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("character reference pattern is valid")
});

/// Strip backslashes, trim, then HTML-escape quotes and markup characters.
pub fn sanitize_input(raw: &str) -> String {
    let unslashed: String = raw.chars().filter(|c| *c != '\\').collect();
    escape_html(unslashed.trim_matches(TRIMMED))
}

/// Escape `& " ' < >`, leaving well-formed character references intact.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (idx, ch) in input.char_indices() {
        match ch {
            '&' if CHAR_REF.is_match(&input[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
