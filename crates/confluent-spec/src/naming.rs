use crate::types::language::NamingConvention;

const UNDERLINE: char = '_';

/// Convert a name into the given case convention.
///
/// Camel- and Pascal-cased input is split at ASCII uppercase letters, and any
/// run of characters that are neither alphanumeric nor `_` acts as a word
/// separator, so `test-config`, `test_config`, and `testConfig` all convert
/// to the same result.
pub fn convert(name: &str, convention: NamingConvention) -> String {
    let words = split_words(name);

    match convention {
        NamingConvention::Snake => words.to_lowercase(),
        NamingConvention::ScreamingSnake => words.to_uppercase(),
        NamingConvention::Camel => join_capitalized(&words),
        NamingConvention::Pascal => {
            let camel = join_capitalized(&words);
            let mut chars = camel.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => camel,
            }
        }
        NamingConvention::Kebap => {
            let mut out = String::with_capacity(words.len());
            let mut previous_underline = false;
            for c in words.chars() {
                if c == UNDERLINE {
                    if !previous_underline {
                        out.push('-');
                    }
                    previous_underline = true;
                } else {
                    out.push(c);
                    previous_underline = false;
                }
            }
            out
        }
    }
}

/// Normalize a name to underline-separated lowercase-split words, e.g.
/// `myCombinedFloat` → `my_combined_float`, `test-config` → `test_config`.
fn split_words(name: &str) -> String {
    let mut marked = String::with_capacity(name.len() * 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            marked.push(UNDERLINE);
            marked.push(c.to_ascii_lowercase());
        } else {
            marked.push(c);
        }
    }

    let mut out = String::with_capacity(marked.len());
    let mut in_separator = false;
    for c in marked.trim_start_matches(UNDERLINE).chars() {
        if c.is_alphanumeric() || c == UNDERLINE {
            out.push(c);
            in_separator = false;
        } else if !in_separator {
            out.push(UNDERLINE);
            in_separator = true;
        }
    }
    out
}

/// Drop every underline run that is followed by an ASCII alphanumeric and
/// uppercase that character. Trailing underlines are kept.
fn join_capitalized(words: &str) -> String {
    let chars: Vec<char> = words.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == UNDERLINE {
            let run_end = chars[i..]
                .iter()
                .position(|c| *c != UNDERLINE)
                .map(|offset| i + offset);
            match run_end {
                Some(next) if chars[next].is_ascii_alphanumeric() => {
                    out.push(chars[next].to_ascii_uppercase());
                    i = next + 1;
                }
                Some(next) => {
                    out.extend(&chars[i..next]);
                    i = next;
                }
                None => {
                    out.extend(&chars[i..]);
                    i = chars.len();
                }
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
