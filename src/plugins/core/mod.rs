//! Core plugin: shared resources and global settings.

use crate::common::config::MusicConfig;
use bevy::prelude::*;

/// Keeps a `MusicConfig` inserted before the plugin; installs defaults otherwise.
pub fn plugin(app: &mut App) {
    app.init_resource::<MusicConfig>();
}
