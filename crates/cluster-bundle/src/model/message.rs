//! The message bound shared by all transcoders.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{Bundle, Component, NodeConfig, Struct};

/// A schema-described record that can be transcoded.
///
/// `Default` supplies the zero value that absent fields decode to, and
/// `TYPE_NAME` is attached to codec errors.
pub trait Message: Serialize + DeserializeOwned + Clone + Default + PartialEq + Debug {
    /// Schema name of the message.
    const TYPE_NAME: &'static str;
}

impl Message for Bundle {
    const TYPE_NAME: &'static str = "Bundle";
}

impl Message for Component {
    const TYPE_NAME: &'static str = "Component";
}

impl Message for NodeConfig {
    const TYPE_NAME: &'static str = "NodeConfig";
}

impl Message for Struct {
    const TYPE_NAME: &'static str = "Struct";
}
