//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: DefaultPlugins (window/render/audio) + file-backed preferences + music
//!   played through Bevy audio.
//! - `configure_headless`: in-memory preferences, headless music output, no render plugins; for tests.
//!
//! Entering any `GameState` is announced as a `SceneLoaded` message.

use std::path::Path;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::config::MusicConfig;
use crate::common::state::GameState;
use crate::plugins;
use crate::plugins::music::{MusicBackend, SceneLoaded};
use crate::plugins::prefs::PrefsStorage;

const MUSIC_CONFIG_PATH: &str = "config/music.toml";
const PREFS_PATH: &str = "config/prefs.json";

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Bevy Music".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(MusicConfig::load_from_path(Path::new(MUSIC_CONFIG_PATH)));
    configure_game(app, PrefsStorage::File(PREFS_PATH.into()), MusicBackend::BevyAudio);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Insert a `MusicConfig` with tracks first, or no player is spawned.
pub fn configure_headless(app: &mut App) {
    configure_game(app, PrefsStorage::Memory, MusicBackend::Headless);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App, storage: PrefsStorage, backend: MusicBackend) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app, storage, backend);
    app.add_systems(OnEnter(GameState::Menu), announce_scene_load)
        .add_systems(OnEnter(GameState::InGame), announce_scene_load);
}

fn announce_scene_load(mut writer: MessageWriter<SceneLoaded>) {
    writer.write(SceneLoaded);
}
