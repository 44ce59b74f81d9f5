//! Indexed, read-only view over a bundle.
//!
//! [`BundleFinder`] snapshots a bundle and builds lookup tables for node
//! configs, components and component objects. Construction validates that
//! every record has a name; after that the view never changes, so lookups
//! are plain hash probes and the finder can be shared across threads.

pub mod images;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::ValidationError;
use crate::model::{Bundle, Component, ComponentObject, NodeConfig, ObjectKey};
use crate::validate::{
    DuplicatePolicy, validate_component_name, validate_identities, validate_object_names,
};

pub use images::{ComponentImage, ContainerImages, ImageExtractor, ImageRef, NoImages};

/// Options for building a [`BundleFinder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinderOptions {
    /// Handling of sibling records that share a name.
    pub duplicates: DuplicatePolicy,
}

impl FinderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject duplicate names.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// Read-only lookup view over a private copy of a bundle.
///
/// Changes to the caller's bundle after construction are not visible here.
#[derive(Debug, Clone)]
pub struct BundleFinder {
    bundle: Bundle,
    node_lookup: FxHashMap<String, usize>,
    component_lookup: FxHashMap<String, usize>,
    /// (component index, object index) into `bundle`.
    object_lookup: FxHashMap<ObjectKey, (usize, usize)>,
}

impl BundleFinder {
    /// Builds a finder with default options (later duplicates win).
    pub fn new(bundle: &Bundle) -> Result<Self, ValidationError> {
        Self::with_options(bundle, FinderOptions::default())
    }

    /// Builds a finder.
    ///
    /// Fails on the first record with an empty name, or on the first
    /// duplicate name when `options.duplicates` is [`DuplicatePolicy::Reject`].
    pub fn with_options(bundle: &Bundle, options: FinderOptions) -> Result<Self, ValidationError> {
        validate_identities(bundle, options.duplicates)?;
        let bundle = bundle.clone();

        let mut node_lookup =
            FxHashMap::with_capacity_and_hasher(bundle.node_configs.len(), Default::default());
        for (index, node) in bundle.node_configs.iter().enumerate() {
            if let Some(previous) = node_lookup.insert(node.name.clone(), index) {
                debug!(name = %node.name, previous, index, "node config name repeated; later entry wins");
            }
        }

        let mut component_lookup =
            FxHashMap::with_capacity_and_hasher(bundle.components.len(), Default::default());
        let mut object_lookup = FxHashMap::default();
        for (ci, component) in bundle.components.iter().enumerate() {
            if let Some(previous) = component_lookup.insert(component.name.clone(), ci) {
                debug!(name = %component.name, previous, index = ci, "component name repeated; later entry wins");
            }

            for (oi, object) in component.objects.iter().enumerate() {
                let key = ObjectKey::new(component.name.as_str(), object.name.as_str());
                if object_lookup.insert(key, (ci, oi)).is_some() {
                    debug!(component = %component.name, object = %object.name, "object name repeated; later entry wins");
                }
            }
        }

        trace!(
            node_configs = node_lookup.len(),
            components = component_lookup.len(),
            objects = object_lookup.len(),
            "indexed bundle"
        );

        Ok(Self {
            bundle,
            node_lookup,
            component_lookup,
            object_lookup,
        })
    }

    /// Returns the finder's private snapshot of the bundle.
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Looks up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.component_lookup
            .get(name)
            .map(|&i| &self.bundle.components[i])
    }

    /// Looks up a node config by name.
    pub fn node_config(&self, name: &str) -> Option<&NodeConfig> {
        self.node_lookup
            .get(name)
            .map(|&i| &self.bundle.node_configs[i])
    }

    /// Looks up an object by component name and object name.
    pub fn component_object(&self, component: &str, object: &str) -> Option<&ComponentObject> {
        self.component_object_by_key(&ObjectKey::new(component, object))
    }

    pub fn component_object_by_key(&self, key: &ObjectKey) -> Option<&ComponentObject> {
        self.object_lookup
            .get(key)
            .map(|&(ci, oi)| &self.bundle.components[ci].objects[oi])
    }

    /// Number of distinct node config names.
    pub fn node_config_count(&self) -> usize {
        self.node_lookup.len()
    }

    /// Number of distinct component names.
    pub fn component_count(&self) -> usize {
        self.component_lookup.len()
    }

    /// Number of distinct (component, object) keys.
    pub fn component_object_count(&self) -> usize {
        self.object_lookup.len()
    }

    /// Collects the images of every inlined object using [`NoImages`].
    pub fn component_images(&self) -> Result<Vec<ComponentImage>, ValidationError> {
        self.component_images_with(&NoImages)
    }

    /// Collects the images of every inlined object, in bundle order.
    ///
    /// See [`collect_component_images`].
    pub fn component_images_with<E: ImageExtractor + ?Sized>(
        &self,
        extractor: &E,
    ) -> Result<Vec<ComponentImage>, ValidationError> {
        collect_component_images(&self.bundle, extractor)
    }
}

/// Collects the images of every inlined object in `bundle`, in bundle order.
///
/// Component and object names are checked during the walk, independently of
/// any earlier validation; the first empty name aborts with no partial
/// result. Objects without an inlined payload contribute nothing.
pub fn collect_component_images<E: ImageExtractor + ?Sized>(
    bundle: &Bundle,
    extractor: &E,
) -> Result<Vec<ComponentImage>, ValidationError> {
    let mut images = Vec::new();
    for (ci, component) in bundle.components.iter().enumerate() {
        validate_component_name(component, ci)?;
        validate_object_names(component, DuplicatePolicy::LastWins)?;

        for object in &component.objects {
            let Some(payload) = &object.inlined else {
                continue;
            };
            let key = ObjectKey::new(component.name.as_str(), object.name.as_str());
            images.extend(extractor.extract(payload).into_iter().map(|found| ComponentImage {
                key: key.clone(),
                object_path: found.path,
                image: found.image,
            }));
        }
    }
    Ok(images)
}
