//! Builder API for ergonomic Bundle construction.
//!
//! # Example
//!
//! ```rust
//! use cluster_bundle::model::builder::BundleBuilder;
//! use cluster_bundle::Struct;
//!
//! let bundle = BundleBuilder::new()
//!     .name("my-cluster")
//!     .node_config("master", |n| n.os_image("cos-stable"))
//!     .component("etcd", |c| c
//!         .version("3.1.11")
//!         .inlined("etcd-pod", Struct::new().with("kind", "Pod"))
//!     )
//!     .build();
//!
//! assert_eq!(bundle.components[0].objects[0].name, "etcd-pod");
//! ```

use crate::model::{Bundle, Component, ComponentObject, File, NodeConfig, Struct};

/// Builder for constructing a Bundle.
#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    bundle: Bundle,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the apiVersion and kind header fields.
    pub fn header(mut self, api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        self.bundle.api_version = api_version.into();
        self.bundle.kind = kind.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.bundle.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.bundle.version = version.into();
        self
    }

    // =========================================================================
    // Node configs
    // =========================================================================

    /// Adds a node config using a builder function.
    pub fn node_config<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(NodeConfigBuilder) -> NodeConfigBuilder,
    {
        let builder = f(NodeConfigBuilder::new(name));
        self.bundle.node_configs.push(builder.node);
        self
    }

    /// Adds an already-built node config.
    pub fn push_node_config(mut self, node: NodeConfig) -> Self {
        self.bundle.node_configs.push(node);
        self
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Adds a component using a builder function.
    pub fn component<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ComponentBuilder) -> ComponentBuilder,
    {
        let builder = f(ComponentBuilder::new(name));
        self.bundle.components.push(builder.component);
        self
    }

    /// Adds an already-built component.
    pub fn push_component(mut self, component: Component) -> Self {
        self.bundle.components.push(component);
        self
    }

    pub fn build(self) -> Bundle {
        self.bundle
    }
}

/// Builder for a single NodeConfig.
#[derive(Debug, Clone)]
pub struct NodeConfigBuilder {
    node: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: NodeConfig::new(name),
        }
    }

    pub fn os_image(mut self, image: impl Into<String>) -> Self {
        self.node.os_image = image.into();
        self
    }

    /// Adds an init file by URL.
    pub fn init_file(mut self, url: impl Into<String>) -> Self {
        self.node.init_files.push(File { url: url.into() });
        self
    }

    pub fn external_init_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.node.external_init_cmd = cmd.into();
        self
    }

    /// Sets an environment variable; later values for the same key win.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> NodeConfig {
        self.node
    }
}

/// Builder for a single Component.
#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    component: Component,
}

impl ComponentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            component: Component::new(name),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.component.version = version.into();
        self
    }

    /// Adds an object with an inlined payload.
    pub fn inlined(mut self, name: impl Into<String>, payload: Struct) -> Self {
        self.component
            .objects
            .push(ComponentObject::new(name).with_inlined(payload));
        self
    }

    /// Adds an object referencing an external file.
    pub fn file(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.component
            .objects
            .push(ComponentObject::new(name).with_file(url));
        self
    }

    /// Adds an object with neither payload nor file.
    pub fn object(mut self, name: impl Into<String>) -> Self {
        self.component.objects.push(ComponentObject::new(name));
        self
    }

    pub fn build(self) -> Component {
        self.component
    }
}
