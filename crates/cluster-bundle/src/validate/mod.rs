//! Identity-field validation for bundles.
//!
//! Only identity is checked here: every node config, component and component
//! object must carry a name, and (optionally) names must be unique within
//! their scope. The contents of nodes and objects are not inspected.

use rustc_hash::FxHashSet;

use crate::error::ValidationError;
use crate::model::{Bundle, Component};

/// What to do when two sibling records share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Later records replace earlier ones in lookup tables.
    #[default]
    LastWins,
    /// Duplicates are a [`ValidationError`].
    Reject,
}

/// Validates every identity field of a bundle.
///
/// Checks node configs first, then components in order, each component's
/// objects immediately after it. Returns the first violation found.
pub fn validate_identities(bundle: &Bundle, duplicates: DuplicatePolicy) -> Result<(), ValidationError> {
    let reject = duplicates == DuplicatePolicy::Reject;

    let mut seen = FxHashSet::default();
    for (index, node) in bundle.node_configs.iter().enumerate() {
        if node.name.is_empty() {
            return Err(ValidationError::EmptyNodeName { index });
        }
        if reject && !seen.insert(node.name.as_str()) {
            return Err(ValidationError::DuplicateNodeName {
                name: node.name.clone(),
            });
        }
    }

    let mut seen = FxHashSet::default();
    for (index, component) in bundle.components.iter().enumerate() {
        validate_component_name(component, index)?;
        if reject && !seen.insert(component.name.as_str()) {
            return Err(ValidationError::DuplicateComponentName {
                name: component.name.clone(),
            });
        }
        validate_object_names(component, duplicates)?;
    }

    Ok(())
}

/// Checks that a component has a name.
pub fn validate_component_name(component: &Component, index: usize) -> Result<(), ValidationError> {
    if component.name.is_empty() {
        return Err(ValidationError::EmptyComponentName { index });
    }
    Ok(())
}

/// Checks the names of a component's objects.
pub fn validate_object_names(component: &Component, duplicates: DuplicatePolicy) -> Result<(), ValidationError> {
    let mut seen = FxHashSet::default();
    for (index, object) in component.objects.iter().enumerate() {
        if object.name.is_empty() {
            return Err(ValidationError::EmptyObjectName {
                component: component.name.clone(),
                index,
            });
        }
        if duplicates == DuplicatePolicy::Reject && !seen.insert(object.name.as_str()) {
            return Err(ValidationError::DuplicateObjectName {
                component: component.name.clone(),
                object: object.name.clone(),
            });
        }
    }
    Ok(())
}
