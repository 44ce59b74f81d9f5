//! Transcoding between messages and their wire encodings.
//!
//! JSON is the pivot: YAML is derived from JSON, and the text form is built
//! from the same field mapping. [`Transcoder`] binds the operations to one
//! message type; the free functions below accept any serializable type.

pub mod json;
pub mod primitives;
pub mod text;
pub mod transcoder;
pub mod yaml;

use std::any::type_name;

use serde::Serialize;

pub use primitives::{Reader, Writer};
pub use transcoder::{
    BUNDLE, COMPONENT, DecodeOptions, EncodeOptions, JsonStyle, NODE_CONFIG, STRUCT, Transcoder,
};
pub use yaml::{json_to_yaml, yaml_to_json};

use crate::error::FormatError;
use crate::limits::TEXT_INDENT;
use crate::model::Message;

/// Encodes any serializable value as compact JSON.
pub fn to_json<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>, FormatError> {
    json::encode_json(msg, JsonStyle::Compact, type_name::<T>())
}

/// Encodes any serializable value as YAML, by way of JSON.
pub fn to_yaml<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>, FormatError> {
    yaml::encode_yaml(msg, type_name::<T>())
}

/// Encodes any serializable record as text form.
pub fn to_text<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>, FormatError> {
    text::encode_text(msg, TEXT_INDENT, type_name::<T>())
}

/// Decodes a message from JSON with default limits.
pub fn from_json<M: Message>(input: &[u8]) -> Result<M, FormatError> {
    Transcoder::<M>::new().from_json(input)
}

/// Decodes a message from YAML with default limits.
pub fn from_yaml<M: Message>(input: &[u8]) -> Result<M, FormatError> {
    Transcoder::<M>::new().from_yaml(input)
}

/// Decodes a message from text form with default limits.
pub fn from_text<M: Message>(input: &[u8]) -> Result<M, FormatError> {
    Transcoder::<M>::new().from_text(input)
}
