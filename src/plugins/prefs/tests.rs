use bevy::prelude::*;

use crate::common::error::StoreError;
use super::record::{KEY_VERSION_CODE, KEY_VOLUME_MUSIC, KEY_VOLUME_SOUNDFX, SCHEMA_VERSION};
use super::{
    JsonFileStore, KeyValueStore, LoadState, MemoryStore, PrefValue, Prefs, PrefsPlugin, PrefsStorage,
};

fn reopen(prefs: Prefs) -> Prefs {
    Prefs::open(prefs.into_store()).unwrap()
}

#[test]
fn fresh_store_initializes_defaults() {
    let prefs = Prefs::open(MemoryStore::new()).unwrap();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
    assert_eq!(prefs.volume_music(), 1.0);
    assert_eq!(prefs.volume_soundfx(), 1.0);

    let store = prefs.into_store();
    assert_eq!(store.get(KEY_VERSION_CODE), Some(&PrefValue::Int(SCHEMA_VERSION)));
}

#[test]
fn values_survive_reload_with_same_version() {
    let mut prefs = Prefs::open(MemoryStore::new()).unwrap();
    prefs.set_volume_music(0.35).unwrap();
    prefs.set_volume_soundfx(0.8).unwrap();

    let prefs = reopen(prefs);
    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.volume_music(), 0.35);
    assert_eq!(prefs.volume_soundfx(), 0.8);
}

#[test]
fn version_bump_resets_everything() {
    let mut prefs = Prefs::open(MemoryStore::new()).unwrap();
    prefs.set_volume_music(0.1).unwrap();
    prefs.set_volume_soundfx(0.2).unwrap();

    let prefs = Prefs::open_with_version(prefs.into_store(), SCHEMA_VERSION + 1).unwrap();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
    assert_eq!(prefs.volume_music(), 1.0);
    assert_eq!(prefs.volume_soundfx(), 1.0);
}

#[test]
fn stray_values_without_marker_are_overwritten() {
    let mut store = MemoryStore::new();
    store.set(KEY_VOLUME_MUSIC, PrefValue::Float(0.4)).unwrap();

    let prefs = Prefs::open(store).unwrap();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
    assert_eq!(prefs.volume_music(), 1.0);
}

#[test]
fn keys_added_without_init_read_as_zero() {
    // Marker present, volume keys never written.
    let mut store = MemoryStore::new();
    store.set(KEY_VERSION_CODE, PrefValue::Int(SCHEMA_VERSION)).unwrap();
    store.set(KEY_VOLUME_SOUNDFX, PrefValue::Int(1)).unwrap();

    let prefs = Prefs::open(store).unwrap();
    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.volume_music(), 0.0);
    assert_eq!(prefs.volume_soundfx(), 0.0);
}

#[test]
fn setters_do_not_clamp() {
    let mut prefs = Prefs::open(MemoryStore::new()).unwrap();
    prefs.set_volume_music(1.7).unwrap();
    assert_eq!(prefs.volume_music(), 1.7);
}

#[test]
fn json_file_store_persists_across_processes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");

    let mut prefs = Prefs::open(JsonFileStore::open(&path).unwrap()).unwrap();
    prefs.set_volume_music(0.5).unwrap();
    drop(prefs);

    let prefs = Prefs::open(JsonFileStore::open(&path).unwrap()).unwrap();
    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.volume_music(), 0.5);
    assert_eq!(prefs.volume_soundfx(), 1.0);
}

#[test]
fn corrupt_json_file_is_reinitialized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();

    let prefs = Prefs::open(JsonFileStore::open(&path).unwrap()).unwrap();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
    assert_eq!(prefs.volume_music(), 1.0);
}

#[test]
fn plugin_inserts_prefs_resource() {
    let mut app = App::new();
    app.add_plugins(PrefsPlugin::default());
    let prefs = app.world().resource::<Prefs>();
    assert_eq!(prefs.volume_music(), 1.0);
}

#[test]
fn plugin_falls_back_to_memory_when_file_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A directory is not a readable preference file.
    let mut app = App::new();
    app.add_plugins(PrefsPlugin {
        storage: PrefsStorage::File(dir.path().to_path_buf()),
    });
    let prefs = app.world().resource::<Prefs>();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
}

#[test]
fn non_finite_volume_is_rejected_and_file_stays_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut prefs = Prefs::open(JsonFileStore::open(&path).unwrap()).unwrap();
    prefs.set_volume_music(0.6).unwrap();
    prefs.set_volume_soundfx(0.3).unwrap();

    for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let err = prefs.set_volume_music(bad).unwrap_err();
        assert!(matches!(err, StoreError::NonFinite { .. }));
    }
    assert_eq!(prefs.volume_music(), 0.6);
    drop(prefs);

    let prefs = Prefs::open(JsonFileStore::open(&path).unwrap()).unwrap();
    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.volume_music(), 0.6);
    assert_eq!(prefs.volume_soundfx(), 0.3);
}

#[test]
fn memory_store_rejects_non_finite_floats_too() {
    let mut store = MemoryStore::new();
    assert!(store.set(KEY_VOLUME_MUSIC, PrefValue::Float(f32::NAN)).is_err());
    assert!(!store.has_key(KEY_VOLUME_MUSIC));
}
