// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration document store
//!
//! The document is read once, kept as an untyped YAML tree, and never
//! mutated afterwards. Lookups return `None` for absent keys so callers can
//! tell "missing" from "present but empty".

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{TopologyError, TopologyResult};

/// Immutable, load-once configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    source: Option<PathBuf>,
    document: Value,
}

impl ConfigStore {
    /// Load and parse a YAML document from disk
    pub fn load(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TopologyError::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut store = Self::parse(&content, &path.display().to_string())?;
        store.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "Loaded configuration document");
        Ok(store)
    }

    /// Parse a YAML document held in memory
    pub fn from_yaml_str(content: &str) -> TopologyResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> TopologyResult<Self> {
        let document: Value =
            serde_yaml::from_str(content).map_err(|e| TopologyError::ConfigLoad {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        if !document.is_mapping() {
            return Err(TopologyError::ConfigLoad {
                path: origin.to_string(),
                reason: "top-level document must be a mapping".to_string(),
            });
        }

        Ok(Self {
            source: None,
            document,
        })
    }

    /// Whole document when `key` is `None`, else the top-level value at `key`
    pub fn get(&self, key: Option<&str>) -> Option<&Value> {
        match key {
            None => Some(&self.document),
            Some(key) => self.document.get(key),
        }
    }

    /// The whole document
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Deserialize the value at a top-level key
    ///
    /// Absent keys give `Ok(None)`; present keys of the wrong shape give
    /// [`TopologyError::ConfigShape`].
    pub fn typed<T: DeserializeOwned>(&self, key: &str) -> TopologyResult<Option<T>> {
        match self.document.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|e| TopologyError::shape(key, e)),
        }
    }

    /// Like [`ConfigStore::typed`] but the key must be present
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> TopologyResult<T> {
        self.typed(key)?
            .ok_or_else(|| TopologyError::shape(key, "required key is missing"))
    }

    /// Path the document was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"
aws:
  region: eu-west-1
empty: []
"#;

    #[test]
    fn test_get_whole_document_and_key() {
        let store = ConfigStore::from_yaml_str(DOCUMENT).unwrap();
        assert!(store.get(None).unwrap().is_mapping());
        assert_eq!(
            store.get(Some("aws")).unwrap()["region"].as_str(),
            Some("eu-west-1")
        );
        assert!(store.get(Some("missing")).is_none());
        // present but empty is distinguishable from missing
        assert_eq!(store.get(Some("empty")).unwrap().as_sequence().map(Vec::len), Some(0));
    }

    #[test]
    fn test_typed_lookup() {
        #[derive(serde::Deserialize)]
        struct Aws {
            region: String,
        }

        let store = ConfigStore::from_yaml_str(DOCUMENT).unwrap();
        let aws: Aws = store.required("aws").unwrap();
        assert_eq!(aws.region, "eu-west-1");
        assert!(store.typed::<Aws>("nope").unwrap().is_none());
        assert!(matches!(
            store.required::<Aws>("nope"),
            Err(TopologyError::ConfigShape { ref key, .. }) if key == "nope"
        ));
        assert!(matches!(
            store.typed::<Aws>("empty"),
            Err(TopologyError::ConfigShape { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let store = ConfigStore::load(file.path()).unwrap();
        assert_eq!(store.source(), Some(file.path()));
    }

    #[test]
    fn test_load_errors() {
        let missing = ConfigStore::load("/definitely/not/here.yml");
        assert!(matches!(missing, Err(TopologyError::ConfigLoad { .. })));

        let malformed = ConfigStore::from_yaml_str("aws: [unclosed");
        assert!(matches!(malformed, Err(TopologyError::ConfigLoad { .. })));

        let scalar = ConfigStore::from_yaml_str("just a string");
        assert!(matches!(scalar, Err(TopologyError::ConfigLoad { .. })));
    }
}
