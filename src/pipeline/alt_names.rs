//! Alternate-name overlay
//!
//! A user-authored JSON object mapping FDC ids to display names, e.g.
//! `{ "321360": "grape tomatoes" }`.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Read-only FDC id to display-name map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltNameMap {
    names: HashMap<i64, String>,
}

impl AltNameMap {
    /// Load an overlay file.
    ///
    /// The file must be one flat JSON object with decimal-id keys and
    /// string values; anything else is an `AltNameFormat` error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc: Value = serde_json::from_str(&text).map_err(|e| Error::AltNameFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let map = Self::from_json(&doc).map_err(|reason| Error::AltNameFormat {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::info!("Loaded {} alternate names from {}", map.len(), path.display());
        Ok(map)
    }

    /// Build the map from an already-parsed document
    pub fn from_json(doc: &Value) -> std::result::Result<Self, String> {
        let object = doc
            .as_object()
            .ok_or_else(|| "expected a JSON object of id -> name".to_string())?;

        let mut names = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let fdc_id = parse_fdc_id(key)
                .ok_or_else(|| format!("key '{}' is not a decimal FDC id", key))?;
            let name = value
                .as_str()
                .ok_or_else(|| format!("value for '{}' is not a string", key))?;
            names.insert(fdc_id, name.to_string());
        }

        Ok(Self { names })
    }

    /// Alternate name for a food, if one was supplied
    pub fn lookup(&self, fdc_id: i64) -> Option<&str> {
        self.names.get(&fdc_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(i64, String)> for AltNameMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

fn parse_fdc_id(key: &str) -> Option<i64> {
    let trimmed = key.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
