//! Cluster bundles: typed transcoding and indexed lookup.
//!
//! This crate converts cluster bundle messages between their in-memory form
//! and three encodings, and provides a validated read-only index over a
//! loaded bundle.
//!
//! # Overview
//!
//! A bundle describes what a cluster runs:
//! - **Node configs**: named node bootstrap settings
//! - **Components**: named groups of cluster objects
//! - **Component objects**: named units, optionally inlining a manifest
//!
//! # Quick Start
//!
//! ```rust
//! use cluster_bundle::codec::BUNDLE;
//! use cluster_bundle::BundleFinder;
//!
//! let yaml = b"
//! nodeConfigs:
//! - name: n1
//! components:
//! - name: c1
//!   objects:
//!   - name: o1
//! ";
//!
//! let bundle = BUNDLE.from_yaml(yaml).unwrap();
//!
//! // Encode to the other formats
//! let json = BUNDLE.to_json(&bundle).unwrap();
//! let text = BUNDLE.to_text(&bundle).unwrap();
//! assert_eq!(BUNDLE.from_json(&json).unwrap(), bundle);
//! assert_eq!(BUNDLE.from_text(&text).unwrap(), bundle);
//!
//! // Index it
//! let finder = BundleFinder::new(&bundle).unwrap();
//! assert!(finder.node_config("n1").is_some());
//! assert!(finder.component_object("c1", "o1").is_some());
//! assert!(finder.component_images().unwrap().is_empty());
//! ```
//!
//! # Modules
//!
//! - [`model`]: Schema records, dynamic payload values, builders
//! - [`codec`]: Text form, JSON and YAML transcoding
//! - [`find`]: Indexed read-only bundle view and image collection
//! - [`validate`]: Identity-field validation
//! - [`error`]: Error types
//! - [`limits`]: Decoder limits
//!
//! # Encodings
//!
//! JSON is the pivot format. YAML is produced from JSON and converted back
//! to JSON before decoding; the text form shares the JSON field mapping.
//! JSON decoding is strict: unknown fields are errors, not silently dropped.

pub mod codec;
pub mod error;
pub mod find;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{DecodeOptions, EncodeOptions, JsonStyle, Transcoder};
pub use error::{Encoding, FormatError, ValidationError};
pub use find::{
    BundleFinder, ComponentImage, ContainerImages, FinderOptions, ImageExtractor, ImageRef,
    NoImages, collect_component_images,
};
pub use model::{
    Bundle, BundleBuilder, Component, ComponentBuilder, ComponentObject, File, Message,
    NodeConfig, NodeConfigBuilder, ObjectKey, Struct, Value,
};
pub use validate::{DuplicatePolicy, validate_identities};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
