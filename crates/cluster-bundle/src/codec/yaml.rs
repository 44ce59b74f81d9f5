//! YAML, as a textual transform of the JSON projection.
//!
//! YAML never maps directly onto a schema record. Encoding renders JSON first
//! and re-emits it as block-style YAML; decoding converts YAML to JSON and
//! then runs the strict JSON decoder. Comments and anchors do not survive.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::json::{encode_json, parse_json};
use crate::codec::{DecodeOptions, JsonStyle};
use crate::error::{Encoding, FormatError};

/// Converts JSON bytes to YAML, preserving key order.
pub fn json_to_yaml(json: &[u8]) -> Result<Vec<u8>, FormatError> {
    let value: serde_json::Value = serde_json::from_slice(json).map_err(|e| FormatError::Syntax {
        encoding: Encoding::Json,
        message: e.to_string(),
    })?;
    serde_yaml::to_string(&value)
        .map(String::into_bytes)
        .map_err(|e| FormatError::encode(Encoding::Yaml, "json document", e))
}

/// Converts YAML bytes to compact JSON.
pub fn yaml_to_json(yaml: &[u8]) -> Result<Vec<u8>, FormatError> {
    let value: serde_json::Value = serde_yaml::from_slice(yaml).map_err(|e| FormatError::Syntax {
        encoding: Encoding::Yaml,
        message: e.to_string(),
    })?;
    serde_json::to_vec(&value).map_err(|e| FormatError::encode(Encoding::Json, "yaml document", e))
}

/// Encodes any serializable record to YAML by way of JSON.
pub fn encode_yaml<T: Serialize + ?Sized>(
    msg: &T,
    message_type: &'static str,
) -> Result<Vec<u8>, FormatError> {
    let json = encode_json(msg, JsonStyle::Compact, message_type).map_err(|err| match err {
        FormatError::Encode {
            message_type,
            message,
            ..
        } => FormatError::Encode {
            encoding: Encoding::Yaml,
            message_type,
            message,
        },
        other => other,
    })?;
    json_to_yaml(&json)
}

/// Decodes YAML into a fresh `T` by way of strict JSON decoding.
///
/// Schema failures and the length limit are reported against the YAML
/// encoding, since that is what the caller supplied. An empty document
/// decodes to `T::default()`.
pub fn decode_yaml<T: DeserializeOwned + Default>(
    input: &[u8],
    options: &DecodeOptions,
    message_type: &'static str,
) -> Result<T, FormatError> {
    options.check_len(Encoding::Yaml, input.len())?;
    let json = yaml_to_json(input)?;
    parse_json(&json, message_type).map_err(|err| match err {
        FormatError::Decode {
            message_type,
            message,
            ..
        } => FormatError::Decode {
            encoding: Encoding::Yaml,
            message_type,
            message,
        },
        other => other,
    })
}
