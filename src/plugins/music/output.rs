//! Playback backend seam.
//!
//! `MusicPlayer` drives exactly one `AudioOutput`. `HeadlessOutput` records the
//! commands it receives and is what tests and headless apps run against; its
//! `OutputProbe` stays readable after the output is boxed into a player.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rolloff {
    #[default]
    Logarithmic,
    Linear,
}

/// Positional parameters of the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spatial {
    pub rolloff: Rolloff,
    pub doppler_level: f32,
    /// 0 = fully 2D, 1 = fully 3D.
    pub spatial_blend: f32,
}

impl Default for Spatial {
    fn default() -> Self {
        Self { rolloff: Rolloff::Logarithmic, doppler_level: 1.0, spatial_blend: 0.0 }
    }
}

impl Spatial {
    /// Non-positional background music.
    pub fn flat() -> Self {
        Self { rolloff: Rolloff::Linear, doppler_level: 0.0, spatial_blend: 0.0 }
    }
}

pub trait AudioOutput: Send + Sync + 'static {
    fn set_clip(&mut self, clip: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_pitch(&mut self, pitch: f32);
    fn set_looping(&mut self, looping: bool);
    fn set_spatial(&mut self, spatial: Spatial);
}

/// What a `HeadlessOutput` has been told.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputState {
    pub clip: Option<String>,
    pub playing: bool,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
    pub spatial: Spatial,
    /// Number of `play` calls.
    pub play_count: u32,
}

impl Default for OutputState {
    fn default() -> Self {
        Self {
            clip: None,
            playing: false,
            volume: 1.0,
            pitch: 1.0,
            looping: false,
            spatial: Spatial::default(),
            play_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOutput {
    state: Arc<Mutex<OutputState>>,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> OutputProbe {
        OutputProbe { state: Arc::clone(&self.state) }
    }

    fn with_state(&self, f: impl FnOnce(&mut OutputState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

impl AudioOutput for HeadlessOutput {
    fn set_clip(&mut self, clip: &str) {
        self.with_state(|s| s.clip = Some(clip.to_owned()));
    }

    fn play(&mut self) {
        self.with_state(|s| {
            s.playing = true;
            s.play_count += 1;
        });
    }

    fn pause(&mut self) {
        self.with_state(|s| s.playing = false);
    }

    fn stop(&mut self) {
        self.with_state(|s| s.playing = false);
    }

    fn set_volume(&mut self, volume: f32) {
        self.with_state(|s| s.volume = volume);
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.with_state(|s| s.pitch = pitch);
    }

    fn set_looping(&mut self, looping: bool) {
        self.with_state(|s| s.looping = looping);
    }

    fn set_spatial(&mut self, spatial: Spatial) {
        self.with_state(|s| s.spatial = spatial);
    }
}

/// Read-only view of a `HeadlessOutput`.
#[derive(Debug, Clone)]
pub struct OutputProbe {
    state: Arc<Mutex<OutputState>>,
}

impl OutputProbe {
    pub fn snapshot(&self) -> OutputState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
