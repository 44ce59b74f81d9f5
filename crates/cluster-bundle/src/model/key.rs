//! Composite keys for component-owned objects.

use std::fmt;

/// Identifies an object within a bundle by (component name, object name).
///
/// Object names are only unique within their component, so both parts are
/// needed. Used as a map key; never stored on the object itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub component: String,
    pub object: String,
}

impl ObjectKey {
    pub fn new(component: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.object)
    }
}
