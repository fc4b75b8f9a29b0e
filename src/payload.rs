//! Turning captured documentation lines into a tooltip payload.

use regex::Regex;

use crate::errors::{Result, TooltipError};

/// Joins documentation lines with `line_ending`, keeping each line verbatim.
pub fn assemble_documentation(lines: &[&str], line_ending: &str) -> String {
    lines.join(line_ending)
}

/// Extracts the meaningful part of assembled documentation.
///
/// Without a pattern the documentation is the payload. With one, the
/// pattern's `comment` capture is; documentation the pattern does not match
/// is reported as [`TooltipError::MalformedDocumentation`].
pub fn extract_payload(documentation: &str, pattern: Option<&Regex>) -> Result<String> {
    let Some(pattern) = pattern else {
        return Ok(documentation.to_string());
    };
    pattern
        .captures(documentation)
        .and_then(|c| c.name("comment"))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TooltipError::MalformedDocumentation {
            documentation: documentation.to_string(),
        })
}

/// Escapes text for use inside a double-quoted C# string on a single line.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [`escape`].
///
/// Unknown escape sequences and a trailing lone backslash are kept as written.
pub fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('"') => unescaped.push('"'),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
