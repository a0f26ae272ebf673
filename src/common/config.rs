//! Music configuration.
//!
//! Mirrors the per-component settings a designer tweaks in the editor. Loaded
//! leniently from TOML: a missing or broken file yields defaults and a warning.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// How the music entity tracks the active camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraFollowMode {
    None,
    /// Copy the camera position every frame.
    #[default]
    Follow,
    /// Parent to the camera at start and on every scene load.
    Child,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Clip identifiers (asset paths), indexed by `play_track`.
    pub tracks: Vec<String>,
    pub play_on_start: bool,
    pub camera_follow_mode: CameraFollowMode,
    pub default_track: usize,
    pub initial_volume_from_preference: bool,
    /// Raw volume applied at start, before the preference override.
    pub volume: f32,
    pub pitch: f32,
    /// Apply the perceptual power curve to the volume sent to the output.
    pub scale_output_volume: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            play_on_start: true,
            camera_follow_mode: CameraFollowMode::Follow,
            default_track: 0,
            initial_volume_from_preference: true,
            volume: 0.9,
            pitch: 1.0,
            scale_output_volume: true,
        }
    }
}

impl MusicConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<MusicConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    MusicConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Music config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                MusicConfig::default()
            }
        }
    }
}
