//! Versioned player preferences.
//!
//! The record is either freshly initialized (every key rewritten with its
//! default) or loaded (version marker matches `SCHEMA_VERSION`). There is no
//! per-field migration: any version mismatch resets everything.
//!
//! Values are read from the store on every getter call; nothing is cached here.

use bevy::prelude::*;

use super::store::{KeyValueStore, PrefValue};
use crate::common::error::StoreError;

pub const KEY_VERSION_CODE: &str = "key_version_code";
pub const KEY_VOLUME_MUSIC: &str = "volume_music";
pub const KEY_VOLUME_SOUNDFX: &str = "volume_soundfx";

/// Compiled-in schema version. Must be -1 in release builds.
pub const SCHEMA_VERSION: i32 = -1;

pub const DEFAULT_VOLUME: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Marker was absent or stale; all keys were rewritten with defaults.
    FreshlyInitialized,
    /// Marker matched; stored values are used as-is.
    Loaded,
}

#[derive(Resource)]
pub struct Prefs {
    store: Box<dyn KeyValueStore>,
    load_state: LoadState,
}

impl Prefs {
    pub fn open(store: impl KeyValueStore) -> Result<Self, StoreError> {
        Self::open_with_version(store, SCHEMA_VERSION)
    }

    /// Open against an explicit schema version.
    pub fn open_with_version(store: impl KeyValueStore, version: i32) -> Result<Self, StoreError> {
        let mut prefs = Self {
            store: Box::new(store),
            load_state: LoadState::Loaded,
        };

        match prefs.get_int(KEY_VERSION_CODE) {
            Some(stored) if stored == version => prefs.read_data(),
            Some(stored) => {
                info!("Preference schema changed ({stored} -> {version}); resetting to defaults");
                prefs.init(version)?;
            }
            None => {
                info!("No stored preferences; initializing defaults");
                prefs.init(version)?;
            }
        }

        Ok(prefs)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Give back the backing store, e.g. to reopen it.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    // Defaults first, marker last: an interrupted init leaves no valid marker.
    fn init(&mut self, version: i32) -> Result<(), StoreError> {
        self.set_volume_music(DEFAULT_VOLUME)?;
        self.set_volume_soundfx(DEFAULT_VOLUME)?;
        self.set_int(KEY_VERSION_CODE, version)?;
        self.load_state = LoadState::FreshlyInitialized;
        Ok(())
    }

    fn read_data(&mut self) {
        debug!("Preferences loaded");
        self.load_state = LoadState::Loaded;
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        match self.store.get(key) {
            Some(PrefValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.store.set(key, PrefValue::Int(value))
    }

    /// Missing or mistyped keys read as 0.0.
    fn get_float(&self, key: &str) -> f32 {
        match self.store.get(key) {
            Some(PrefValue::Float(v)) => *v,
            _ => 0.0,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<(), StoreError> {
        self.store.set(key, PrefValue::Float(value))
    }

    pub fn volume_music(&self) -> f32 {
        self.get_float(KEY_VOLUME_MUSIC)
    }

    pub fn volume_soundfx(&self) -> f32 {
        self.get_float(KEY_VOLUME_SOUNDFX)
    }

    /// Not range-checked. NaN and infinities are rejected with
    /// `StoreError::NonFinite` and leave the stored value untouched.
    pub fn set_volume_music(&mut self, volume: f32) -> Result<(), StoreError> {
        self.set_float(KEY_VOLUME_MUSIC, volume)
    }

    pub fn set_volume_soundfx(&mut self, volume: f32) -> Result<(), StoreError> {
        self.set_float(KEY_VOLUME_SOUNDFX, volume)
    }
}
