//! Constant extraction.
//!
//! Delimited literals are pulled out of the source before parsing and
//! replaced by placeholder identifiers (`__const0`, `__const1`, ...), so the
//! grammar never has to deal with quoting or escapes. A literal opened by
//! `b<delimiter>` becomes a byte sequence; any other becomes a string.
//!
//! A delimiter closes the literal only when it is preceded by an even number
//! of escape characters. An unterminated literal is passed through verbatim
//! and left for the parser to reject.

use crate::parser::Span;
use crate::values::Value;

pub const PLACEHOLDER_PREFIX: &str = "__const";

/// One literal lifted out of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub placeholder: String,
    pub value: Value,
    /// The literal in the original text, delimiters and prefix included.
    pub original: Span,
    /// The placeholder identifier in the rewritten text.
    pub rewritten: Span,
}

/// Rewritten source text plus the constants table.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub text: String,
    pub constants: Vec<Constant>,
}

impl Extracted {
    /// The constant whose placeholder occupies exactly `span` of the
    /// rewritten text. An identifier the user wrote that merely looks like a
    /// placeholder sits elsewhere and finds nothing.
    pub fn constant_at(&self, span: &Span) -> Option<&Constant> {
        let index = self
            .constants
            .binary_search_by_key(&span.start(), |constant| constant.rewritten.start())
            .ok()?;
        self.constants
            .get(index)
            .filter(|constant| constant.rewritten == *span)
    }

    /// Map an offset in the rewritten text back to the original text.
    ///
    /// Offsets inside a placeholder (or its padding) snap to the start or
    /// end of the literal it replaced.
    pub fn original_offset(&self, pos: usize) -> usize {
        let (mut from, mut to) = (0, 0);
        for constant in &self.constants {
            let region_start = constant.rewritten.start() - 1;
            let region_end = constant.rewritten.end() + 1;
            if pos < region_start {
                break;
            }
            if pos <= constant.rewritten.start() {
                return constant.original.start();
            }
            if pos <= region_end {
                return constant.original.end();
            }
            (from, to) = (region_end, constant.original.end());
        }
        to + (pos - from)
    }

    pub fn original_span(&self, span: &Span) -> Span {
        Span::new(
            self.original_offset(span.start()),
            self.original_offset(span.end()),
        )
    }
}

/// Replace every delimited literal in `text` with a placeholder.
pub fn extract_constants(text: &str, delimiter: char, escape: char) -> Extracted {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = String::with_capacity(text.len());
    let mut constants = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let (start, c) = chars[i];
        if c != delimiter {
            out.push(c);
            i += 1;
            continue;
        }
        let Some(close) = find_close(&chars, i, delimiter, escape) else {
            out.push_str(&text[start..]);
            break;
        };

        let bytes = has_bytes_prefix(&chars, i);
        let literal_start = if bytes {
            // The prefix was already copied as an ordinary character.
            out.pop();
            chars[i - 1].0
        } else {
            start
        };
        let body = &text[start + delimiter.len_utf8()..chars[close].0];
        let end = chars[close].0 + delimiter.len_utf8();
        let value = if bytes {
            Value::Bytes(unescape_bytes(body, delimiter, escape))
        } else {
            Value::Str(unescape_str(body, delimiter, escape))
        };

        let placeholder = format!("{}{}", PLACEHOLDER_PREFIX, constants.len());
        out.push(' ');
        let rewritten_start = out.len();
        out.push_str(&placeholder);
        let rewritten_end = out.len();
        out.push(' ');

        constants.push(Constant {
            placeholder,
            value,
            original: Span::new(literal_start, end),
            rewritten: Span::new(rewritten_start, rewritten_end),
        });
        i = close + 1;
    }

    Extracted {
        text: out,
        constants,
    }
}

/// Index of the delimiter closing the literal opened at `open`.
fn find_close(chars: &[(usize, char)], open: usize, delimiter: char, escape: char) -> Option<usize> {
    let mut run = 0usize;
    for (j, &(_, c)) in chars.iter().enumerate().skip(open + 1) {
        if c == delimiter && run % 2 == 0 {
            return Some(j);
        }
        run = if c == escape { run + 1 } else { 0 };
    }
    None
}

fn has_bytes_prefix(chars: &[(usize, char)], open: usize) -> bool {
    match open.checked_sub(1).map(|k| chars[k].1) {
        Some('b') => match open.checked_sub(2).map(|k| chars[k].1) {
            Some(c) => !(c.is_alphanumeric() || c == '_'),
            None => true,
        },
        _ => false,
    }
}

enum Unit {
    Char(char),
    Byte(u8),
}

fn unescape(body: &str, delimiter: char, escape: char, mut emit: impl FnMut(Unit)) {
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != escape {
            emit(Unit::Char(c));
            continue;
        }
        match chars.next() {
            Some(d) if d == delimiter || d == escape => emit(Unit::Char(d)),
            Some('n') => emit(Unit::Char('\n')),
            Some('r') => emit(Unit::Char('\r')),
            Some('t') => emit(Unit::Char('\t')),
            Some('0') => emit(Unit::Char('\0')),
            Some('x') => {
                let hi = chars.next_if(char::is_ascii_hexdigit);
                let lo = hi.and_then(|_| chars.next_if(char::is_ascii_hexdigit));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let digits = [hi, lo].iter().collect::<String>();
                        match u8::from_str_radix(&digits, 16) {
                            Ok(byte) => emit(Unit::Byte(byte)),
                            Err(_) => emit(Unit::Char('x')),
                        }
                    }
                    // Malformed: keep the text as written.
                    (hi, _) => {
                        emit(Unit::Char(escape));
                        emit(Unit::Char('x'));
                        if let Some(hi) = hi {
                            emit(Unit::Char(hi));
                        }
                    }
                }
            }
            // Unknown escapes are kept as written.
            Some(other) => {
                emit(Unit::Char(escape));
                emit(Unit::Char(other));
            }
            None => emit(Unit::Char(escape)),
        }
    }
}

/// Unescape a string literal body. `\xNN` yields the character U+00NN.
pub fn unescape_str(body: &str, delimiter: char, escape: char) -> String {
    let mut out = String::with_capacity(body.len());
    unescape(body, delimiter, escape, |unit| match unit {
        Unit::Char(c) => out.push(c),
        Unit::Byte(b) => out.push(char::from(b)),
    });
    out
}

/// Unescape a byte literal body. `\xNN` yields the raw byte; other characters
/// contribute their UTF-8 encoding.
pub fn unescape_bytes(body: &str, delimiter: char, escape: char) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    unescape(body, delimiter, escape, |unit| match unit {
        Unit::Char(c) => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        Unit::Byte(b) => out.push(b),
    });
    out
}
