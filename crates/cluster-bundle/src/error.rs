//! Error types for bundle transcoding and identity validation.

use std::fmt;

use thiserror::Error;

/// Wire encodings handled by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Structured-literal text form.
    Text,
    /// Canonical JSON projection.
    Json,
    /// YAML, derived from the JSON projection.
    Yaml,
}

impl Encoding {
    /// Returns the lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Text => "text",
            Encoding::Json => "json",
            Encoding::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error at a transcoding boundary.
///
/// Every variant names the encoding involved; decode and encode failures also
/// name the message type that was being produced or consumed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Input is not syntactically valid JSON or YAML.
    #[error("[{encoding}] syntax error: {message}")]
    Syntax { encoding: Encoding, message: String },

    /// Input is not syntactically valid text form.
    #[error("[text] syntax error at line {line}, column {column}: {reason}")]
    TextSyntax {
        line: usize,
        column: usize,
        reason: String,
    },

    /// Input parsed, but does not match the message schema (unknown field,
    /// wrong type, ...).
    #[error("[{encoding}] cannot decode {message_type}: {message}")]
    Decode {
        encoding: Encoding,
        message_type: &'static str,
        message: String,
    },

    /// Value could not be represented in the target encoding.
    #[error("[{encoding}] cannot encode {message_type}: {message}")]
    Encode {
        encoding: Encoding,
        message_type: &'static str,
        message: String,
    },

    /// Text form requires a record at the top level.
    #[error("[text] top-level value of {message_type} is not a message (found {found})")]
    NotAMessage {
        message_type: &'static str,
        found: &'static str,
    },

    #[error("[{encoding}] nesting depth exceeds maximum {max}")]
    DepthExceeded { encoding: Encoding, max: usize },

    #[error("[{encoding}] input length {len} exceeds maximum {max}")]
    InputTooLarge {
        encoding: Encoding,
        len: usize,
        max: usize,
    },
}

impl FormatError {
    /// Returns the encoding in which this error occurred.
    pub fn encoding(&self) -> Encoding {
        match self {
            FormatError::Syntax { encoding, .. }
            | FormatError::Decode { encoding, .. }
            | FormatError::Encode { encoding, .. }
            | FormatError::DepthExceeded { encoding, .. }
            | FormatError::InputTooLarge { encoding, .. } => *encoding,
            FormatError::TextSyntax { .. } | FormatError::NotAMessage { .. } => Encoding::Text,
        }
    }

    /// Maps a serde_json error raised while reading `encoding` input.
    ///
    /// Syntax and EOF failures are reported as [`FormatError::Syntax`]; data
    /// failures (unknown fields, type mismatches) as [`FormatError::Decode`].
    pub(crate) fn from_json_de(
        err: serde_json::Error,
        encoding: Encoding,
        message_type: &'static str,
    ) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof => FormatError::Syntax {
                encoding,
                message: err.to_string(),
            },
            Category::Data | Category::Io => FormatError::Decode {
                encoding,
                message_type,
                message: err.to_string(),
            },
        }
    }

    pub(crate) fn encode(
        encoding: Encoding,
        message_type: &'static str,
        err: impl fmt::Display,
    ) -> Self {
        FormatError::Encode {
            encoding,
            message_type,
            message: err.to_string(),
        }
    }
}

/// Identity-field violation found while indexing or walking a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node configs must always have a name; name was empty for node config at index {index}")]
    EmptyNodeName { index: usize },

    #[error("components must always have a name; name was empty for component at index {index}")]
    EmptyComponentName { index: usize },

    #[error(
        "component objects must always have a name; name was empty for object at index {index} in component {component:?}"
    )]
    EmptyObjectName { component: String, index: usize },

    #[error("duplicate node config name {name:?}")]
    DuplicateNodeName { name: String },

    #[error("duplicate component name {name:?}")]
    DuplicateComponentName { name: String },

    #[error("duplicate object name {object:?} in component {component:?}")]
    DuplicateObjectName { component: String, object: String },
}
