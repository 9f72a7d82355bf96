//! Relaxed WaveJSON dialect.
//!
//! WaveDrom sources are usually written as JavaScript object literals rather
//! than strict JSON:
//!
//! ```text
//! { signal: [
//!   { name: 'clk', wave: 'p...' },   // trailing comma below is fine
//! ]}
//! ```
//!
//! [`normalize`] rewrites that dialect into strict JSON in a single pass:
//! comments are blanked (newlines kept so error positions stay on the right
//! line), single-quoted strings become double-quoted, bare identifier keys
//! are quoted, and trailing commas before `]`/`}` are dropped. Text that is
//! already strict JSON passes through unchanged.
//!
//! [`write_relaxed`] goes the other way for compact sharing.

use serde_json::Value;

// ---------------------------------------------------------------
// Normalization (relaxed → strict)
// ---------------------------------------------------------------

pub fn normalize(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len() + src.len() / 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => i = copy_double_quoted(&chars, i, &mut out),
            '\'' => i = convert_single_quoted(&chars, i, &mut out),
            '/' if chars.get(i + 1) == Some(&'/') => {
                i = skip_line_comment(&chars, i);
            }
            '/' if chars.get(i + 1) == Some(&'*') => match skip_block_comment(&chars, i) {
                Some(end) => {
                    // Keep line structure for error reporting.
                    out.extend(chars[i..end].iter().filter(|c| **c == '\n'));
                    out.push(' ');
                    i = end;
                }
                None => {
                    // Unterminated: leave it for the JSON reader to reject.
                    out.extend(&chars[i..]);
                    break;
                }
            },
            ',' => {
                let next = skip_trivia(&chars, i + 1);
                if !matches!(chars.get(next), Some(']') | Some('}')) {
                    out.push(',');
                }
                i += 1;
            }
            c if is_ident_start(c) => {
                let end = scan_identifier(&chars, i);
                let next = skip_trivia(&chars, end);
                let word: String = chars[i..end].iter().collect();
                if chars.get(next) == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn scan_identifier(chars: &[char], start: usize) -> usize {
    let mut end = start + 1;
    while end < chars.len() && is_ident_continue(chars[end]) {
        end += 1;
    }
    end
}

/// Copy a `"..."` literal verbatim; returns the index after the closing quote.
fn copy_double_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        match c {
            '\\' => {
                if let Some(next) = chars.get(i + 1) {
                    out.push(*next);
                }
                i += 2;
            }
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    i
}

/// Rewrite a `'...'` literal as a `"..."` literal.
fn convert_single_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => match chars.get(i + 1) {
                Some('\'') => {
                    out.push('\'');
                    i += 2;
                }
                Some(next) => {
                    out.push('\\');
                    out.push(*next);
                    i += 2;
                }
                None => {
                    out.push('\\');
                    i += 1;
                }
            },
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            '\'' => {
                out.push('"');
                return i + 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    i
}

fn skip_line_comment(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

/// Index after the closing `*/`, or `None` when the comment never ends.
fn skip_block_comment(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// Index of the next character that is neither whitespace nor comment.
fn skip_trivia(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => i = skip_line_comment(chars, i),
            '/' if chars.get(i + 1) == Some(&'*') => match skip_block_comment(chars, i) {
                Some(end) => i = end,
                None => break,
            },
            _ => break,
        }
    }
    i
}

// ---------------------------------------------------------------
// Writing (value → compact relaxed text)
// ---------------------------------------------------------------

/// Compact relaxed rendering: identifier keys unquoted, strings in single
/// quotes. Always re-readable through [`normalize`].
pub fn write_relaxed(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_single_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_relaxed(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    write_single_quoted(key, out);
                }
                out.push(':');
                write_relaxed(item, out);
            }
            out.push('}');
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

fn write_single_quoted(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
}
