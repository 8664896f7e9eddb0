//! Whitespace and comment stripping for script sources.

use std::iter::Peekable;
use std::str::Chars;

/// Characters that never need surrounding whitespace.
const TIGHT: &[char] = &[
    '{', '}', '(', ')', '[', ']', ';', ',', '=', '+', '-', '*', '/', '<', '>', '!', '&', '|', '?',
    ':',
];

fn is_tight(c: char) -> bool {
    TIGHT.contains(&c)
}

/// Drop `import` lines and the `export` keywords in front of declarations.
pub fn strip_module_syntax(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") {
            continue;
        }
        let indent = &line[..line.len() - trimmed.len()];
        let body = trimmed
            .strip_prefix("export default ")
            .or_else(|| trimmed.strip_prefix("export "))
            .unwrap_or(trimmed);
        out.push_str(indent);
        out.push_str(body);
        out.push('\n');
    }
    out
}

fn skip_line_comment(chars: &mut Peekable<Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) {
    let mut star = false;
    for c in chars.by_ref() {
        if star && c == '/' {
            break;
        }
        star = c == '*';
    }
}

/// Copy a quoted literal through its closing quote, escapes included.
fn copy_literal(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push(quote);
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            c if c == quote => break,
            _ => {}
        }
    }
}

/// Remove comments, collapse whitespace and drop it next to punctuation.
///
/// String and template literals are copied untouched. A `;` directly before a
/// closing brace is dropped.
pub fn minify(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut gap = false;
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                skip_line_comment(&mut chars);
                gap = true;
                continue;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_block_comment(&mut chars);
                gap = true;
                continue;
            }
            c if c.is_whitespace() => {
                gap = true;
                continue;
            }
            _ => {}
        }
        if gap && let Some(last) = out.chars().last() {
            // `a - -b` must not become `a--b`.
            let merges = (last == '+' || last == '-') && last == c;
            if merges || !(is_tight(last) || is_tight(c)) {
                out.push(' ');
            }
        }
        gap = false;
        match c {
            '"' | '\'' | '`' => copy_literal(c, &mut chars, &mut out),
            '}' => {
                if out.ends_with(';') {
                    out.pop();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}
