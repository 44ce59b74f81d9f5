//! Primitive reading/writing for the text form.
//!
//! The [`Reader`] scans bytes with line/column tracking and decodes the
//! lexical elements (identifiers, numbers, quoted strings). The [`Writer`]
//! emits indented lines and quoted strings.

use crate::error::FormatError;

// =============================================================================
// READING
// =============================================================================

/// Reader for scanning text form input.
///
/// Wraps a byte slice and tracks the current line and column (both 1-based)
/// for error reporting.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes and returns the next byte.
    #[inline]
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            // Continuation bytes of a UTF-8 sequence do not advance the column.
            self.column += 1;
        }
        Some(b)
    }

    /// Consumes the next byte if it equals `expected`.
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `expected` or fails with a syntax error naming `context`.
    pub fn expect(&mut self, expected: u8, context: &str) -> Result<(), FormatError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(context))
        }
    }

    /// Skips whitespace and `#` line comments.
    pub fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.bump();
                }
                b'#' => {
                    while let Some(c) = self.bump() {
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Builds a syntax error at the current position.
    pub fn error(&self, reason: impl Into<String>) -> FormatError {
        FormatError::TextSyntax {
            line: self.line,
            column: self.column,
            reason: reason.into(),
        }
    }

    /// Builds an "unexpected input" error while reading `context`.
    pub fn unexpected(&self, context: &str) -> FormatError {
        match self.peek() {
            None => self.error(format!("unexpected end of input while reading {context}")),
            Some(b) if b.is_ascii_graphic() => {
                self.error(format!("unexpected {:?} while reading {context}", b as char))
            }
            Some(b) => self.error(format!("unexpected byte 0x{b:02x} while reading {context}")),
        }
    }

    /// Reads an identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn read_ident(&mut self, context: &str) -> Result<&'a str, FormatError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_ident_start(b) => {
                self.bump();
            }
            _ => return Err(self.unexpected(context)),
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        // Identifier bytes are ASCII, so this cannot fail.
        std::str::from_utf8(&self.data[start..self.pos]).map_err(|_| self.error("invalid identifier"))
    }

    /// Reads a numeric literal.
    ///
    /// Integers that fit in i64/u64 stay integral; anything with a fraction
    /// or exponent, or out of integer range, becomes a float.
    pub fn read_number(&mut self) -> Result<serde_json::Number, FormatError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        self.eat(b'-');
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' => is_float = true,
                b'+' | b'-' if self.pos > start && matches!(self.data[self.pos - 1], b'e' | b'E') => {}
                _ => break,
            }
            self.bump();
        }
        let text = std::str::from_utf8(&self.data[start..self.pos]).unwrap_or_default();
        let invalid = || FormatError::TextSyntax {
            line,
            column,
            reason: format!("invalid number {text:?}"),
        };

        if !is_float {
            if let Ok(v) = text.parse::<i64>() {
                return Ok(v.into());
            }
            if let Ok(v) = text.parse::<u64>() {
                return Ok(v.into());
            }
        }
        let v = text.parse::<f64>().map_err(|_| invalid())?;
        serde_json::Number::from_f64(v).ok_or_else(invalid)
    }

    /// Reads a quoted string (`"..."` or `'...'`) and decodes its escapes.
    pub fn read_quoted(&mut self) -> Result<String, FormatError> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.unexpected("string")),
        };
        let (line, column) = (self.line, self.column);
        self.bump();

        let mut out = Vec::new();
        loop {
            let b = match self.bump() {
                None | Some(b'\n') => {
                    return Err(FormatError::TextSyntax {
                        line,
                        column,
                        reason: "unterminated string".to_string(),
                    });
                }
                Some(b) => b,
            };
            if b == quote {
                break;
            }
            if b != b'\\' {
                out.push(b);
                continue;
            }
            self.read_escape(&mut out)?;
        }

        String::from_utf8(out).map_err(|_| FormatError::TextSyntax {
            line,
            column,
            reason: "string is not valid UTF-8".to_string(),
        })
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let c = self.bump().ok_or_else(|| self.unexpected("escape"))?;
        match c {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'v' => out.push(0x0B),
            b'\\' | b'\'' | b'"' | b'?' => out.push(c),
            b'x' => {
                let v = self.read_radix_digits(16, 2, "hex escape")?;
                out.push(v as u8);
            }
            b'0'..=b'7' => {
                let mut v = u32::from(c - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            self.bump();
                            v = v * 8 + u32::from(d - b'0');
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(v).map_err(|_| self.error("octal escape out of range"))?;
                out.push(byte);
            }
            b'u' => {
                let v = self.read_radix_digits(16, 4, "unicode escape")?;
                let ch = char::from_u32(v).ok_or_else(|| self.error("invalid unicode escape"))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            other => {
                return Err(self.error(format!("unknown escape \\{}", other as char)));
            }
        }
        Ok(())
    }

    /// Reads exactly `count` digits in `radix`.
    fn read_radix_digits(&mut self, radix: u32, count: usize, context: &str) -> Result<u32, FormatError> {
        let mut v = 0u32;
        for _ in 0..count {
            let d = self
                .peek()
                .and_then(|b| (b as char).to_digit(radix))
                .ok_or_else(|| self.unexpected(context))?;
            self.bump();
            v = v * radix + d;
        }
        Ok(v)
    }
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Returns true if `s` can be written as a bare field name.
pub fn is_ident(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty() && is_ident_start(bytes[0]) && bytes[1..].iter().all(|b| is_ident_continue(*b))
}

// =============================================================================
// WRITING
// =============================================================================

/// Writer for text form output.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: String,
    indent: usize,
    depth: usize,
}

impl Writer {
    /// Creates a writer that indents each level by `indent` spaces.
    pub fn new(indent: usize) -> Self {
        Self {
            buf: String::new(),
            indent,
            depth: 0,
        }
    }

    /// Returns the output written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the writer and returns the output bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }

    /// Starts a new line at the current depth.
    pub fn line_start(&mut self) {
        for _ in 0..self.depth * self.indent {
            self.buf.push(' ');
        }
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Writes a field name, quoting it unless it is a plain identifier.
    pub fn write_key(&mut self, key: &str) {
        if is_ident(key) {
            self.buf.push_str(key);
        } else {
            self.write_quoted(key);
        }
    }

    /// Writes a double-quoted string with C-style escapes.
    ///
    /// Non-ASCII characters are written verbatim; other control characters
    /// use `\uXXXX`.
    pub fn write_quoted(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if c.is_control() => {
                    self.buf.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}
