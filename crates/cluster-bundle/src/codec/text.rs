//! Structured-literal text form.
//!
//! The text form is a protobuf-text style rendering of a message, using the
//! same field names as the JSON projection:
//!
//! ```text
//! name: "my-cluster"
//! nodeConfigs: [
//!   {
//!     name: "master"
//!   }
//! ]
//! components: [
//!   {
//!     name: "etcd"
//!     objects: [
//!       {
//!         name: "etcd-pod"
//!         inlined {
//!           kind: "Pod"
//!         }
//!       }
//!     ]
//!   }
//! ]
//! ```
//!
//! Both directions pass through `serde_json::Value`, so the field mapping and
//! type rules are exactly those of the JSON projection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::codec::DecodeOptions;
use crate::codec::primitives::{Reader, Writer, is_ident_start};
use crate::error::{Encoding, FormatError};

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes any serializable record to text form.
pub fn encode_text<T: Serialize + ?Sized>(
    msg: &T,
    indent: usize,
    message_type: &'static str,
) -> Result<Vec<u8>, FormatError> {
    let value = serde_json::to_value(msg)
        .map_err(|e| FormatError::encode(Encoding::Text, message_type, e))?;
    match value {
        JsonValue::Object(fields) => {
            let mut writer = Writer::new(indent);
            write_fields(&mut writer, &fields);
            Ok(writer.into_bytes())
        }
        other => Err(FormatError::NotAMessage {
            message_type,
            found: json_kind(&other),
        }),
    }
}

fn write_fields(w: &mut Writer, fields: &Map<String, JsonValue>) {
    for (key, value) in fields {
        w.line_start();
        w.write_key(key);
        match value {
            JsonValue::Object(inner) => {
                w.push_str(" ");
                write_block(w, inner);
            }
            _ => {
                w.push_str(": ");
                write_value(w, value);
            }
        }
        w.newline();
    }
}

/// Writes `{ ... }` with the closing brace on its own line.
fn write_block(w: &mut Writer, fields: &Map<String, JsonValue>) {
    if fields.is_empty() {
        w.push_str("{}");
        return;
    }
    w.push_str("{");
    w.newline();
    w.indent();
    write_fields(w, fields);
    w.dedent();
    w.line_start();
    w.push_str("}");
}

fn write_value(w: &mut Writer, value: &JsonValue) {
    match value {
        JsonValue::Null => w.push_str("null"),
        JsonValue::Bool(b) => w.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => w.push_str(&n.to_string()),
        JsonValue::String(s) => w.write_quoted(s),
        JsonValue::Object(fields) => write_block(w, fields),
        JsonValue::Array(items) => {
            if items.is_empty() {
                w.push_str("[]");
                return;
            }
            w.push_str("[");
            w.newline();
            w.indent();
            for (i, item) in items.iter().enumerate() {
                w.line_start();
                write_value(w, item);
                if i + 1 < items.len() {
                    w.push_str(",");
                }
                w.newline();
            }
            w.dedent();
            w.line_start();
            w.push_str("]");
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "message",
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes text form into a fresh `T`.
pub fn decode_text<T: DeserializeOwned>(
    input: &[u8],
    options: &DecodeOptions,
    message_type: &'static str,
) -> Result<T, FormatError> {
    let value = parse_text(input, options)?;
    serde_json::from_value(value)
        .map_err(|e| FormatError::from_json_de(e, Encoding::Text, message_type))
}

/// Parses text form into its JSON-equivalent value tree.
///
/// The result is always an object; an empty document yields `{}`.
pub fn parse_text(input: &[u8], options: &DecodeOptions) -> Result<JsonValue, FormatError> {
    options.check_len(Encoding::Text, input.len())?;
    let mut parser = Parser {
        reader: Reader::new(input),
        max_depth: options.max_depth,
        depth: 0,
    };
    let fields = parser.parse_fields(None)?;
    Ok(JsonValue::Object(fields))
}

struct Parser<'a> {
    reader: Reader<'a>,
    max_depth: usize,
    depth: usize,
}

impl Parser<'_> {
    fn enter(&mut self) -> Result<(), FormatError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FormatError::DepthExceeded {
                encoding: Encoding::Text,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parses fields until `close` (or end of input at the top level).
    fn parse_fields(&mut self, close: Option<u8>) -> Result<Map<String, JsonValue>, FormatError> {
        let mut fields = Map::new();
        loop {
            self.reader.skip_trivia();
            match (self.reader.peek(), close) {
                (None, None) => return Ok(fields),
                (None, Some(_)) => return Err(self.reader.unexpected("message")),
                (Some(b), Some(c)) if b == c => {
                    self.reader.bump();
                    return Ok(fields);
                }
                _ => {}
            }

            let key = self.parse_key()?;
            self.reader.skip_trivia();
            let value = if self.reader.eat(b':') {
                self.reader.skip_trivia();
                self.parse_value()?
            } else if self.reader.peek() == Some(b'{') {
                self.parse_value()?
            } else {
                return Err(self.reader.unexpected("field separator"));
            };
            merge_field(&mut fields, key, value);

            self.reader.skip_trivia();
            if !self.reader.eat(b',') {
                self.reader.eat(b';');
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, FormatError> {
        match self.reader.peek() {
            Some(b'"' | b'\'') => self.reader.read_quoted(),
            _ => self.reader.read_ident("field name").map(str::to_string),
        }
    }

    fn parse_value(&mut self) -> Result<JsonValue, FormatError> {
        match self.reader.peek() {
            Some(b'{') => {
                self.reader.bump();
                self.enter()?;
                let fields = self.parse_fields(Some(b'}'))?;
                self.leave();
                Ok(JsonValue::Object(fields))
            }
            Some(b'[') => {
                self.reader.bump();
                self.enter()?;
                let items = self.parse_list()?;
                self.leave();
                Ok(JsonValue::Array(items))
            }
            Some(b'"' | b'\'') => {
                // Adjacent literals concatenate.
                let mut s = self.reader.read_quoted()?;
                loop {
                    self.reader.skip_trivia();
                    match self.reader.peek() {
                        Some(b'"' | b'\'') => s.push_str(&self.reader.read_quoted()?),
                        _ => break,
                    }
                }
                Ok(JsonValue::String(s))
            }
            Some(b'-' | b'0'..=b'9') => self.reader.read_number().map(JsonValue::Number),
            Some(b) if is_ident_start(b) => {
                let ident = self.reader.read_ident("value")?;
                Ok(match ident {
                    "true" | "True" | "t" => JsonValue::Bool(true),
                    "false" | "False" | "f" => JsonValue::Bool(false),
                    "null" => JsonValue::Null,
                    // Enum names decode as strings, as in the JSON projection.
                    other => JsonValue::String(other.to_string()),
                })
            }
            _ => Err(self.reader.unexpected("value")),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<JsonValue>, FormatError> {
        let mut items = Vec::new();
        self.reader.skip_trivia();
        if self.reader.eat(b']') {
            return Ok(items);
        }
        loop {
            self.reader.skip_trivia();
            items.push(self.parse_value()?);
            self.reader.skip_trivia();
            if self.reader.eat(b']') {
                return Ok(items);
            }
            self.reader.expect(b',', "list")?;
        }
    }
}

/// Adds a field, accumulating repeated occurrences of a key into a list.
fn merge_field(fields: &mut Map<String, JsonValue>, key: String, value: JsonValue) {
    match fields.get_mut(&key) {
        None => {
            fields.insert(key, value);
        }
        Some(JsonValue::Array(existing)) => match value {
            JsonValue::Array(more) => existing.extend(more),
            single => existing.push(single),
        },
        Some(existing) => {
            let first = existing.take();
            let mut items = vec![first];
            match value {
                JsonValue::Array(more) => items.extend(more),
                single => items.push(single),
            }
            *existing = JsonValue::Array(items);
        }
    }
}
