//! Type-bound transcoder between in-memory messages and wire encodings.

use std::fmt;
use std::marker::PhantomData;

use crate::codec::{json, text, yaml};
use crate::error::{Encoding, FormatError};
use crate::limits::{MAX_DEPTH, MAX_INPUT_LEN, TEXT_INDENT};
use crate::model::{Bundle, Component, Message, NodeConfig, Struct};

/// Output layout for JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Indented, one field per line.
    Pretty,
}

/// Options for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// JSON layout. YAML is always derived from compact JSON.
    pub json: JsonStyle,
    /// Spaces per nesting level in text form.
    pub text_indent: usize,
}

impl EncodeOptions {
    /// Creates default encoding options.
    pub const fn new() -> Self {
        Self {
            json: JsonStyle::Compact,
            text_indent: TEXT_INDENT,
        }
    }

    /// Creates options producing pretty-printed JSON.
    pub const fn pretty() -> Self {
        Self {
            json: JsonStyle::Pretty,
            text_indent: TEXT_INDENT,
        }
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest accepted input, in bytes.
    pub max_input_len: usize,
    /// Deepest accepted nesting in text form.
    pub max_depth: usize,
}

impl DecodeOptions {
    pub const fn new() -> Self {
        Self {
            max_input_len: MAX_INPUT_LEN,
            max_depth: MAX_DEPTH,
        }
    }

    pub(crate) fn check_len(&self, encoding: Encoding, len: usize) -> Result<(), FormatError> {
        if len > self.max_input_len {
            return Err(FormatError::InputTooLarge {
                encoding,
                len,
                max: self.max_input_len,
            });
        }
        Ok(())
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts one message type between its in-memory form and the text, JSON
/// and YAML encodings.
///
/// A transcoder holds only its options, so it is `Copy` and may be shared
/// freely across threads. Every decode produces a fresh value.
///
/// ```rust
/// use cluster_bundle::codec::BUNDLE;
///
/// let bundle = BUNDLE.from_yaml(b"components:\n- name: etcd\n").unwrap();
/// assert_eq!(bundle.components[0].name, "etcd");
///
/// let json = BUNDLE.to_json(&bundle).unwrap();
/// assert_eq!(json, br#"{"components":[{"name":"etcd"}]}"#);
/// ```
pub struct Transcoder<M> {
    encode: EncodeOptions,
    decode: DecodeOptions,
    _message: PhantomData<fn() -> M>,
}

impl<M: Message> Transcoder<M> {
    /// Creates a transcoder with default options.
    pub const fn new() -> Self {
        Self::with_options(EncodeOptions::new(), DecodeOptions::new())
    }

    pub const fn with_options(encode: EncodeOptions, decode: DecodeOptions) -> Self {
        Self {
            encode,
            decode,
            _message: PhantomData,
        }
    }

    /// Returns the schema name of the bound message type.
    pub fn message_type(&self) -> &'static str {
        M::TYPE_NAME
    }

    pub fn encode_options(&self) -> &EncodeOptions {
        &self.encode
    }

    pub fn decode_options(&self) -> &DecodeOptions {
        &self.decode
    }

    // =========================================================================
    // Text form
    // =========================================================================

    /// Parses text form into a new message.
    pub fn from_text(&self, input: &[u8]) -> Result<M, FormatError> {
        text::decode_text(input, &self.decode, M::TYPE_NAME)
    }

    /// Renders a message as text form.
    pub fn to_text(&self, msg: &M) -> Result<Vec<u8>, FormatError> {
        text::encode_text(msg, self.encode.text_indent, M::TYPE_NAME)
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Decodes JSON into a new message. Unknown fields are rejected.
    pub fn from_json(&self, input: &[u8]) -> Result<M, FormatError> {
        json::decode_json(input, &self.decode, M::TYPE_NAME)
    }

    pub fn to_json(&self, msg: &M) -> Result<Vec<u8>, FormatError> {
        json::encode_json(msg, self.encode.json, M::TYPE_NAME)
    }

    // =========================================================================
    // YAML
    // =========================================================================

    /// Decodes YAML into a new message, by way of strict JSON decoding.
    pub fn from_yaml(&self, input: &[u8]) -> Result<M, FormatError> {
        yaml::decode_yaml(input, &self.decode, M::TYPE_NAME)
    }

    /// Renders a message as YAML, by way of its JSON projection.
    pub fn to_yaml(&self, msg: &M) -> Result<Vec<u8>, FormatError> {
        yaml::encode_yaml(msg, M::TYPE_NAME)
    }
}

impl<M: Message> Default for Transcoder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Transcoder<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Transcoder<M> {}

impl<M: Message> fmt::Debug for Transcoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcoder")
            .field("message_type", &M::TYPE_NAME)
            .field("encode", &self.encode)
            .field("decode", &self.decode)
            .finish()
    }
}

/// Transcoder for [`Bundle`].
pub const BUNDLE: Transcoder<Bundle> = Transcoder::new();

/// Transcoder for [`Component`].
pub const COMPONENT: Transcoder<Component> = Transcoder::new();

/// Transcoder for [`NodeConfig`].
pub const NODE_CONFIG: Transcoder<NodeConfig> = Transcoder::new();

/// Transcoder for [`Struct`] payloads.
pub const STRUCT: Transcoder<Struct> = Transcoder::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BundleBuilder, ComponentObject, Value};

    fn sample_bundle() -> Bundle {
        BundleBuilder::new()
            .header("bundle.gke.io/v1alpha1", "ClusterBundle")
            .name("test-bundle")
            .node_config("master", |n| {
                n.os_image("cos-stable")
                    .init_file("file://init.sh")
                    .env("PROXY", "none")
            })
            .component("etcd", |c| {
                c.version("3.1.11").inlined(
                    "etcd-pod",
                    Struct::new()
                        .with("apiVersion", "v1")
                        .with("kind", "Pod")
                        .with("spec", Struct::new().with("hostNetwork", true))
                        .with("ports", vec![Value::from(2379i64), Value::from(2380i64)]),
                )
            })
            .push_component(
                Component::new("kube-dns").with_object(ComponentObject::new("svc").with_file("file://svc.yaml")),
            )
            .build()
    }

    #[test]
    fn test_json_roundtrip() {
        let bundle = sample_bundle();
        let json = BUNDLE.to_json(&bundle).unwrap();
        assert_eq!(BUNDLE.from_json(&json).unwrap(), bundle);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let bundle = sample_bundle();
        let yaml = BUNDLE.to_yaml(&bundle).unwrap();
        assert_eq!(BUNDLE.from_yaml(&yaml).unwrap(), bundle);
    }

    #[test]
    fn test_text_roundtrip() {
        let bundle = sample_bundle();
        let text = BUNDLE.to_text(&bundle).unwrap();
        assert_eq!(BUNDLE.from_text(&text).unwrap(), bundle);
    }

    #[test]
    fn test_yaml_key_order_follows_json() {
        let yaml = BUNDLE.to_yaml(&sample_bundle()).unwrap();
        let yaml = String::from_utf8(yaml).unwrap();
        let pos = |key: &str| yaml.find(key).unwrap();
        assert!(pos("apiVersion") < pos("kind"));
        assert!(pos("nodeConfigs") < pos("components"));
    }

    #[test]
    fn test_strict_json_rejection() {
        let with_unknown = br#"{"name":"master","osImage":"cos","bogus":1}"#;
        let err = NODE_CONFIG.from_json(with_unknown).unwrap_err();
        assert!(matches!(err, FormatError::Decode { encoding: Encoding::Json, .. }));

        let without = br#"{"name":"master","osImage":"cos"}"#;
        let node = NODE_CONFIG.from_json(without).unwrap();
        assert_eq!(node.os_image, "cos");
    }

    #[test]
    fn test_strict_rejection_nested() {
        let yaml = b"components:\n- name: c1\n  objects:\n  - name: o1\n    inline: {}\n";
        let err = BUNDLE.from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn test_text_decode_unknown_field() {
        let err = COMPONENT.from_text(b"name: \"c\" colour: \"red\"").unwrap_err();
        assert!(matches!(err, FormatError::Decode { encoding: Encoding::Text, .. }));
    }

    #[test]
    fn test_struct_transcoder_accepts_any_keys() {
        let s = STRUCT.from_json(br#"{"anything":{"goes":[1,2]}}"#).unwrap();
        let text = STRUCT.to_text(&s).unwrap();
        assert_eq!(STRUCT.from_text(&text).unwrap(), s);
    }

    #[test]
    fn test_pretty_options() {
        let pretty: Transcoder<Component> =
            Transcoder::with_options(EncodeOptions::pretty(), DecodeOptions::default());
        let json = pretty.to_json(&Component::new("c")).unwrap();
        assert_eq!(json, b"{\n  \"name\": \"c\"\n}");
    }

    #[test]
    fn test_decode_limits_apply_to_every_encoding() {
        let tiny: Transcoder<Component> = Transcoder::with_options(
            EncodeOptions::default(),
            DecodeOptions {
                max_input_len: 8,
                ..DecodeOptions::default()
            },
        );
        let input = br#"{"name":"long-name"}"#;
        assert!(matches!(tiny.from_json(input), Err(FormatError::InputTooLarge { .. })));
        assert!(matches!(tiny.from_yaml(input), Err(FormatError::InputTooLarge { .. })));
        assert!(matches!(tiny.from_text(input), Err(FormatError::InputTooLarge { .. })));
    }

    #[test]
    fn test_transcoder_is_send_sync_copy() {
        fn assert_traits<T: Send + Sync + Copy>() {}
        assert_traits::<Transcoder<Bundle>>();
        assert_eq!(BUNDLE.message_type(), "Bundle");
    }
}
