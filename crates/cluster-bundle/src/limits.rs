//! Decoder limits for untrusted input.
//!
//! These bound the work done by the decoders before any schema check runs.
//! [`DecodeOptions`](crate::codec::DecodeOptions) starts from these values.

/// Maximum input size accepted by any decoder (64 MiB).
pub const MAX_INPUT_LEN: usize = 64 * 1024 * 1024;

/// Maximum nesting depth of messages and lists in text form.
pub const MAX_DEPTH: usize = 128;

/// Default indentation width of text form output.
pub const TEXT_INDENT: usize = 2;
