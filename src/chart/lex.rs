//! Line classifier of the chart format.
//!
//! The format is line oriented, so the lexer yields one [`LexedLine`] per meaningful line and
//! leaves the interpretation of entries to the parser, which knows the active section.

use std::ops::Range;

/// The shape of one chart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    /// `[Name]`
    Section(&'a str),
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `key = value`, both sides trimmed.
    Entry {
        /// Text before the first `=`.
        key: &'a str,
        /// Text after the first `=`.
        value: &'a str,
        /// Byte range of `value` in the source.
        value_span: Range<usize>,
    },
    /// A line with no recognizable shape.
    Other(&'a str),
}

/// A token with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LexedLine<'a> {
    /// 1-based line number.
    pub line: usize,
    /// Byte range of the trimmed line in the source.
    pub span: Range<usize>,
    /// What the line is.
    pub token: Token<'a>,
}

/// Splits `source` into classified lines.
///
/// Blank lines and `//` comments are skipped.
pub fn lex(source: &str) -> impl Iterator<Item = LexedLine<'_>> {
    let mut offset = 0;
    source
        .split_inclusive('\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let line_start = offset;
            offset += raw.len();

            let leading = raw.len() - raw.trim_start().len();
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                return None;
            }
            let start = line_start + leading;
            Some(LexedLine {
                line: index + 1,
                span: start..start + trimmed.len(),
                token: classify(trimmed, start),
            })
        })
}

fn classify(line: &str, start: usize) -> Token<'_> {
    match line {
        "{" => return Token::OpenBrace,
        "}" => return Token::CloseBrace,
        _ => {}
    }
    if let Some(name) = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|name| !name.is_empty())
    {
        return Token::Section(name);
    }
    let Some(eq) = line.find('=') else {
        return Token::Other(line);
    };
    let key = line[..eq].trim();
    let rest = &line[eq + 1..];
    let value = rest.trim();
    if key.is_empty() || value.is_empty() {
        return Token::Other(line);
    }
    let value_start = start + eq + 1 + (rest.len() - rest.trim_start().len());
    Token::Entry {
        key,
        value,
        value_span: value_start..value_start + value.len(),
    }
}
