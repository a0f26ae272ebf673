//! Preferences plugin: opens the backing store and installs `Prefs`.

pub mod record;
pub mod store;

use std::path::PathBuf;

use bevy::prelude::*;

pub use record::{LoadState, Prefs};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, PrefValue};

use crate::common::error::MusicError;

#[derive(Debug, Clone, Default)]
pub enum PrefsStorage {
    #[default]
    Memory,
    File(PathBuf),
}

#[derive(Default)]
pub struct PrefsPlugin {
    pub storage: PrefsStorage,
}

impl Plugin for PrefsPlugin {
    fn build(&self, app: &mut App) {
        let prefs = match open_prefs(&self.storage) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("{err}; preferences will not persist this session");
                Prefs::open(MemoryStore::new()).expect("in-memory preference writes cannot fail")
            }
        };
        app.insert_resource(prefs);
    }
}

fn open_prefs(storage: &PrefsStorage) -> Result<Prefs, MusicError> {
    let prefs = match storage {
        PrefsStorage::Memory => Prefs::open(MemoryStore::new())?,
        PrefsStorage::File(path) => Prefs::open(JsonFileStore::open(path.clone())?)?,
    };
    Ok(prefs)
}

#[cfg(test)]
mod tests;
