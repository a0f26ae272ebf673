//! Key/value backends for preferences.
//!
//! A flat `key -> scalar` map. Reads never fail; writes are write-through and
//! report backend failures. Non-finite floats are rejected by every backend.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrefValue {
    Int(i32),
    Float(f32),
}

impl PrefValue {
    /// JSON has no NaN or infinity; such a float would poison the whole file.
    fn check_storable(&self, key: &str) -> Result<(), StoreError> {
        match *self {
            PrefValue::Float(value) if !value.is_finite() => {
                Err(StoreError::NonFinite { key: key.to_owned(), value })
            }
            _ => Ok(()),
        }
    }
}

pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<&PrefValue>;

    /// Write a value. Durable once this returns `Ok`.
    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), StoreError>;

    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, PrefValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&PrefValue> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        value.check_storable(key)?;
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Whole-map JSON file, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, PrefValue>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as empty
    /// (with a warning) so the schema check re-initializes it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("Discarding unreadable preferences at {}: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&PrefValue> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        value.check_storable(key)?;
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: &str) -> Option<&PrefValue> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
