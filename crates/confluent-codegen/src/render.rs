//! Literal and comment rendering shared by the emitters.

/// Escape text for a string literal delimited by `quote`. Backslashes, the
/// delimiter, newlines, carriage returns and tabs are escaped.
pub fn escape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// `"text"` with escapes.
pub fn double_quoted(text: &str) -> String {
    format!("\"{}\"", escape(text, '"'))
}

/// `'text'` with escapes.
pub fn single_quoted(text: &str) -> String {
    format!("'{}'", escape(text, '\''))
}

/// JavaScript regular expression literal. Unescaped `/` and line breaks
/// are escaped; the empty pattern becomes `/(?:)/` since `//` starts a comment.
pub fn regex_literal(pattern: &str) -> String {
    if pattern.is_empty() {
        return "/(?:)/".to_string();
    }

    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('/');
    let mut escaped = false;
    for c in pattern.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '/' if !escaped => out.push_str("\\/"),
            c => out.push(c),
        }
        escaped = c == '\\' && !escaped;
    }
    out.push('/');
    out
}

/// Python raw string `r'text'`, or `None` if the text cannot be written as
/// one (it contains a quote or line break, or ends in an odd backslash run).
pub fn python_raw(text: &str) -> Option<String> {
    if text.contains(['\'', '\n', '\r']) {
        return None;
    }
    let trailing_backslashes = text.chars().rev().take_while(|c| *c == '\\').count();
    if trailing_backslashes % 2 == 1 {
        return None;
    }
    Some(format!("r'{text}'"))
}

/// Rust raw string literal with as few `#` as the text allows.
pub fn rust_raw(text: &str) -> String {
    let mut hashes = String::new();
    while text.contains(&format!("\"{hashes}")) {
        hashes.push('#');
    }
    format!("r{hashes}\"{text}\"{hashes}")
}

/// Collapse a comment to one line, for end-of-line comments.
pub fn inline_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One-line comment text that is safe inside `/* ... */`.
pub fn block_comment(text: &str) -> String {
    inline_comment(text).replace("*/", "* /")
}

/// `name` padded with spaces to `width` characters.
pub fn pad(name: &str, width: usize) -> String {
    format!("{name:<width$}")
}
