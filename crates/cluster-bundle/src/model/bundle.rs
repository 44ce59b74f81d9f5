//! Bundle schema records.
//!
//! A bundle aggregates node bootstrap configs and components; components own
//! named objects which may inline an arbitrary manifest payload.
//!
//! All records use the camelCase JSON projection, reject unknown fields, and
//! omit zero-valued fields on output. An explicit `null` reads as the field's
//! zero value, the same as leaving the field out.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::Struct;

/// Root configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Bundle {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Optional human-readable bundle name.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub version: String,
    /// Node bootstrap configs, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub node_configs: Vec<NodeConfig>,
    /// Components, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub components: Vec<Component>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Node bootstrap configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Identity; non-empty and unique within a bundle.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub os_image: String,
    /// Files to place on the node before the init command runs.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub init_files: Vec<File>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub external_init_cmd: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub env_vars: BTreeMap<String, String>,
}

impl NodeConfig {
    /// Creates a node config with the given name and no other settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A named group of cluster objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Component {
    /// Identity; non-empty and unique within a bundle.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub objects: Vec<ComponentObject>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends an object.
    pub fn with_object(mut self, object: ComponentObject) -> Self {
        self.objects.push(object);
        self
    }
}

/// A named unit within a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ComponentObject {
    /// Identity; non-empty and unique within the owning component.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    /// Inlined manifest payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlined: Option<Struct>,
    /// Reference to an external manifest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<File>,
}

impl ComponentObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the inlined payload.
    pub fn with_inlined(mut self, payload: Struct) -> Self {
        self.inlined = Some(payload);
        self
    }

    /// Sets the external file reference.
    pub fn with_file(mut self, url: impl Into<String>) -> Self {
        self.file = Some(File { url: url.into() });
        self
    }
}

/// Reference to a file by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct File {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_projection_is_camel_case() {
        let mut nc = NodeConfig::new("master");
        nc.os_image = "cos".to_string();
        nc.external_init_cmd = "/init.sh".to_string();

        let json = serde_json::to_string(&nc).unwrap();
        assert_eq!(json, r#"{"name":"master","osImage":"cos","externalInitCmd":"/init.sh"}"#);
    }

    #[test]
    fn test_zero_values_omitted() {
        let json = serde_json::to_string(&Bundle::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<Component>(r#"{"name":"c","objcts":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let obj: ComponentObject = serde_json::from_str(r#"{"name":"o"}"#).unwrap();
        assert_eq!(obj, ComponentObject::new("o"));
    }

    #[test]
    fn test_null_fields_read_as_zero_values() {
        let nc: NodeConfig = serde_json::from_str(
            r#"{"name":null,"osImage":"cos","initFiles":null,"envVars":null}"#,
        )
        .unwrap();
        let mut expected = NodeConfig::default();
        expected.os_image = "cos".to_string();
        assert_eq!(nc, expected);

        let component: Component =
            serde_json::from_str(r#"{"name":"c1","version":null,"objects":null}"#).unwrap();
        assert_eq!(component, Component::new("c1"));

        let object: ComponentObject =
            serde_json::from_str(r#"{"name":"o1","inlined":null,"file":null}"#).unwrap();
        assert_eq!(object, ComponentObject::new("o1"));
    }

    #[test]
    fn test_null_does_not_hide_type_errors() {
        assert!(serde_json::from_str::<Component>(r#"{"name":7}"#).is_err());
        assert!(serde_json::from_str::<Component>(r#"{"objects":{}}"#).is_err());
    }
}
