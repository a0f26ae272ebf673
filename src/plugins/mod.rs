//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::music::{MusicBackend, MusicPlugin};
use crate::plugins::prefs::{PrefsPlugin, PrefsStorage};

pub mod core;
pub mod music;
pub mod prefs;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App, storage: PrefsStorage, backend: MusicBackend) {
    core::plugin(app);
    app.add_plugins((PrefsPlugin { storage }, MusicPlugin { backend }));
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}
