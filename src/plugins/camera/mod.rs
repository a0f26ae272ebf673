//! Camera plugin (render-only).
//!
//! Spawns the main camera once at startup. The camera is not state-scoped, so
//! it survives scene changes together with the music entity that may follow it.
//!
//! `MainCamera` is the "active camera" the music plugin tracks. Headless apps
//! and tests spawn it themselves on any entity with a `Transform`.

use bevy::prelude::*;

#[derive(Component, Debug, Default)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera);
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}
