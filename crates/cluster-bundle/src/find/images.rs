//! Container image references inside inlined payloads.

use crate::model::{ObjectKey, Struct, Value};

/// An image found inside one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Path from the payload root to the image field. List positions are
    /// rendered as decimal indices.
    pub path: Vec<String>,
    /// The image name, e.g. `gcr.io/google_containers/etcd:3.1.11`.
    pub image: String,
}

/// An image found in a component object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentImage {
    /// The object the image was found in.
    pub key: ObjectKey,
    /// Path within the object's inlined payload.
    pub object_path: Vec<String>,
    /// Usually `<registry>/<repository>/<image>:<tag>`.
    pub image: String,
}

/// Finds image references in a payload.
///
/// Implementations must not fail: a payload without images yields an empty
/// list.
pub trait ImageExtractor {
    fn extract(&self, payload: &Struct) -> Vec<ImageRef>;
}

impl<F> ImageExtractor for F
where
    F: Fn(&Struct) -> Vec<ImageRef>,
{
    fn extract(&self, payload: &Struct) -> Vec<ImageRef> {
        self(payload)
    }
}

/// Extractor that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageExtractor for NoImages {
    fn extract(&self, _payload: &Struct) -> Vec<ImageRef> {
        Vec::new()
    }
}

/// Extractor for Kubernetes-style manifests.
///
/// Reports the `image` string of every entry in a `containers` or
/// `initContainers` list, at any depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerImages;

const CONTAINER_LISTS: [&str; 2] = ["containers", "initContainers"];

impl ImageExtractor for ContainerImages {
    fn extract(&self, payload: &Struct) -> Vec<ImageRef> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        walk_struct(payload, &mut path, &mut out);
        out
    }
}

fn walk_struct(s: &Struct, path: &mut Vec<String>, out: &mut Vec<ImageRef>) {
    for (key, value) in s {
        path.push(key.clone());
        match value {
            Value::List(items) if CONTAINER_LISTS.contains(&key.as_str()) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(i.to_string());
                    if let Some(image) = item.as_struct().and_then(|c| c.get("image")).and_then(Value::as_str) {
                        path.push("image".to_string());
                        out.push(ImageRef {
                            path: path.clone(),
                            image: image.to_string(),
                        });
                        path.pop();
                    }
                    walk_value(item, path, out);
                    path.pop();
                }
            }
            _ => walk_value(value, path, out),
        }
        path.pop();
    }
}

fn walk_value(value: &Value, path: &mut Vec<String>, out: &mut Vec<ImageRef>) {
    match value {
        Value::Struct(s) => walk_struct(s, path, out),
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                walk_value(item, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}
