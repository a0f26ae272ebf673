//! Host notifications consumed by the music plugin.

use bevy::prelude::*;

/// A new scene (level) finished loading.
///
/// Triggers the one-shot camera attach; `Follow` mode also snaps immediately.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct SceneLoaded;
