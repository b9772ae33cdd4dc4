//! Persisted pass settings
//!
//! The graph stores every pass's settings as an ordered map of JSON values.
//! Passes write typed values under stable keys and read them back the same
//! way; the graph decides where the map ends up (scene file, editor state).

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassSerializer {
    values: Map<String, Value>,
}

impl PassSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Read the value under `key`
    ///
    /// Returns `Ok(None)` if the key is absent and an error if the stored
    /// value does not have the shape of `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Serialization(format!("key '{}': {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let values: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self { values })
    }
}
