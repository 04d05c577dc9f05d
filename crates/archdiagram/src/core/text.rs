//! Shared text utilities for DOT output

/// Escape a string for use inside a double-quoted DOT value.
///
/// Backslashes and quotes are escaped, and line breaks become the DOT
/// `\n` (centered line) escape.
///
/// # Example
/// ```
/// use archdiagram::core::escape_dot;
///
/// assert_eq!(escape_dot("Raw Data\n(Immutable)"), r"Raw Data\n(Immutable)");
/// assert_eq!(escape_dot(r#"say "hi""#), r#"say \"hi\""#);
/// ```
pub fn escape_dot(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    escaped.push_str("\\n");
                }
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a value in double quotes, escaping it
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape_dot(text))
}

/// Number of line breaks in a label, counting `\r\n` and a lone `\r` once
/// each, the same way [`escape_dot`] turns them into `\n`
pub fn line_breaks(label: &str) -> usize {
    let mut chars = label.chars().peekable();
    let mut count = 0;
    while let Some(c) = chars.next() {
        match c {
            '\n' => count += 1,
            '\r' if chars.peek() != Some(&'\n') => count += 1,
            _ => {}
        }
    }
    count
}
