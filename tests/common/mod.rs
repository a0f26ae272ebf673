//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - `StatesPlugin` backs `GameState` (each state entry is a scene load).
//! - we then call `bevy_music::game::configure_headless` to install the plugins.
//!
//! Time advances in fixed 125 ms steps so fade timing is deterministic.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use bevy_music::common::config::{CameraFollowMode, MusicConfig};
use bevy_music::plugins::camera::MainCamera;
use bevy_music::plugins::music::{MusicInstance, MusicPlayer};

pub const FRAME: Duration = Duration::from_millis(125);

pub fn app_headless(mode: CameraFollowMode) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    app.insert_resource(MusicConfig {
        tracks: vec!["music/menu.ogg".into(), "music/level.ogg".into()],
        camera_follow_mode: mode,
        ..default()
    });
    bevy_music::game::configure_headless(&mut app);

    app.world_mut()
        .spawn((Name::new("MainCamera"), MainCamera, Transform::from_xyz(0.0, 0.0, 999.0)));
    app
}

pub fn music_entity(app: &App) -> Entity {
    app.world()
        .resource::<MusicInstance>()
        .0
        .expect("music singleton not claimed")
}

pub fn with_player<T>(app: &mut App, f: impl FnOnce(&mut MusicPlayer) -> T) -> T {
    let e = music_entity(app);
    let mut player = app
        .world_mut()
        .get_mut::<MusicPlayer>(e)
        .expect("music entity lost its player");
    f(&mut player)
}
