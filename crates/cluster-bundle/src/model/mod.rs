//! Data model types for cluster bundles.
//!
//! This module contains:
//! - Schema records (Bundle, NodeConfig, Component, ComponentObject)
//! - Dynamic payload values (Struct, Value)
//! - Composite object keys
//! - The [`Message`] bound used by transcoders
//! - Builders (ergonomic construction)

pub mod builder;
pub mod bundle;
pub mod key;
pub mod message;
pub mod value;

pub use builder::{BundleBuilder, ComponentBuilder, NodeConfigBuilder};
pub use bundle::{Bundle, Component, ComponentObject, File, NodeConfig};
pub use key::ObjectKey;
pub use message::Message;
pub use value::{Struct, Value};
