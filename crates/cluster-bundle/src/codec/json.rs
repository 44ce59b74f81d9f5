//! Canonical JSON projection.
//!
//! Decoding is strict: schema records reject unknown fields, so a typo or a
//! field from a newer schema fails loudly instead of being dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::{DecodeOptions, JsonStyle};
use crate::error::{Encoding, FormatError};

/// Encodes any serializable record to JSON.
pub fn encode_json<T: Serialize + ?Sized>(
    msg: &T,
    style: JsonStyle,
    message_type: &'static str,
) -> Result<Vec<u8>, FormatError> {
    let result = match style {
        JsonStyle::Compact => serde_json::to_vec(msg),
        JsonStyle::Pretty => serde_json::to_vec_pretty(msg),
    };
    result.map_err(|e| FormatError::encode(Encoding::Json, message_type, e))
}

/// Decodes JSON into a fresh `T`, rejecting unknown fields.
///
/// A top-level `null` decodes to `T::default()`.
pub fn decode_json<T: DeserializeOwned + Default>(
    input: &[u8],
    options: &DecodeOptions,
    message_type: &'static str,
) -> Result<T, FormatError> {
    options.check_len(Encoding::Json, input.len())?;
    parse_json(input, message_type)
}

/// Decodes JSON without applying the input length limit.
pub(crate) fn parse_json<T: DeserializeOwned + Default>(
    input: &[u8],
    message_type: &'static str,
) -> Result<T, FormatError> {
    serde_json::from_slice::<Option<T>>(input)
        .map(Option::unwrap_or_default)
        .map_err(|e| FormatError::from_json_de(e, Encoding::Json, message_type))
}
