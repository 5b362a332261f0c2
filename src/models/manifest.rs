//! Manifest data structures
//!
//! The manifest is kept as an ordered JSON object rather than a typed struct:
//! the packager only touches a handful of keys and must write every other key
//! back untouched and in its original order.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

type ManifestResult<T> = std::result::Result<T, ManifestError>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestDescriptor {
    entries: Map<String, Value>,
}

impl ManifestDescriptor {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Look up a required string value
    pub fn require_str(&self, key: &str) -> ManifestResult<&str> {
        match self.entries.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ManifestError::WrongType {
                key: key.to_string(),
                expected: "a string",
            }),
            None => Err(ManifestError::MissingKey(key.to_string())),
        }
    }

    pub fn name(&self) -> ManifestResult<&str> {
        self.require_str("name")
    }

    pub fn version(&self) -> ManifestResult<&str> {
        self.require_str("version")
    }

    pub fn permissions(&self) -> ManifestResult<Vec<String>> {
        let list = match self.entries.get("permissions") {
            Some(Value::Array(list)) => list,
            Some(_) => return Err(permissions_type_error()),
            None => return Err(ManifestError::MissingKey("permissions".to_string())),
        };

        list.iter()
            .map(|p| p.as_str().map(str::to_string).ok_or_else(permissions_type_error))
            .collect()
    }

    pub fn set_permissions(&mut self, permissions: Vec<String>) {
        let list = permissions.into_iter().map(Value::String).collect::<Vec<_>>();
        self.entries.insert("permissions".to_string(), Value::Array(list));
    }

    /// Mutable access to `browser_specific_settings.gecko`
    pub fn gecko_settings_mut(&mut self) -> ManifestResult<&mut Map<String, Value>> {
        const KEY: &str = "browser_specific_settings.gecko";

        self.entries
            .get_mut("browser_specific_settings")
            .and_then(Value::as_object_mut)
            .and_then(|settings| settings.get_mut("gecko"))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ManifestError::MissingKey(KEY.to_string()))
    }

    /// Serialize for inclusion in an archive
    pub fn to_bytes(&self) -> ManifestResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.entries)?)
    }
}

fn permissions_type_error() -> ManifestError {
    ManifestError::WrongType {
        key: "permissions".to_string(),
        expected: "a list of strings",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> ManifestDescriptor {
        match value {
            Value::Object(map) => ManifestDescriptor::new(map),
            _ => panic!("test manifest must be an object"),
        }
    }

    #[test]
    fn test_serialization_keeps_key_order() {
        let manifest = descriptor(json!({
            "version": "4.0",
            "name": "DownThemAll!",
            "author": "Nils Maier",
            "permissions": ["tabs"]
        }));

        let text = String::from_utf8(manifest.to_bytes().unwrap()).unwrap();
        let version = text.find("\"version\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        let author = text.find("\"author\"").unwrap();
        assert!(version < name && name < author);
    }

    #[test]
    fn test_serialized_bytes_parse_back() {
        let manifest = descriptor(json!({
            "name": "DownThemAll!",
            "version": "4.0",
            "browser_specific_settings": { "gecko": { "id": "nightly@downthemall.org" } }
        }));

        let bytes = manifest.to_bytes().unwrap();
        let parsed: ManifestDescriptor = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_require_str_reports_missing_and_wrong_type() {
        let manifest = descriptor(json!({ "version": 4 }));

        assert!(matches!(
            manifest.name(),
            Err(ManifestError::MissingKey(key)) if key == "name"
        ));
        assert!(matches!(
            manifest.version(),
            Err(ManifestError::WrongType { .. })
        ));
    }

    #[test]
    fn test_permissions_must_be_strings() {
        let manifest = descriptor(json!({ "permissions": ["tabs", 3] }));
        assert!(manifest.permissions().is_err());
    }

    #[test]
    fn test_gecko_settings_requires_nested_block() {
        let mut manifest = descriptor(json!({ "browser_specific_settings": {} }));
        assert!(manifest.gecko_settings_mut().is_err());

        let mut manifest = descriptor(json!({
            "browser_specific_settings": { "gecko": { "id": "x@y" } }
        }));
        assert_eq!(manifest.gecko_settings_mut().unwrap()["id"], "x@y");
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut manifest = descriptor(json!({ "a": 1, "b": 2, "c": 3 }));
        manifest.remove("b");
        let keys: Vec<_> = manifest.entries().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
