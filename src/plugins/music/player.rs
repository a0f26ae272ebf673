//! Music player core.
//!
//! Host-agnostic: the owner calls `update(dt)` once per frame. Fades are
//! [`Tweener`] tweens; the pause that ends a fade-out is a timed continuation
//! keyed by a generation token, so any later `play`/`pause`/`stop`/`fade`
//! invalidates it.
//!
//! # Volume asymmetry
//! `volume()` returns the raw value last set. When `scale_output_volume` is on,
//! the output receives `scale_volume(raw)` instead; read that back with
//! `applied_volume()`.

use bevy::prelude::*;

use super::output::{AudioOutput, Spatial};
use super::tween::{TweenProperty, Tweener};
use crate::common::config::{CameraFollowMode, MusicConfig};
use crate::common::error::{MusicError, StoreError};
use crate::plugins::prefs::Prefs;

/// Perceptual loudness approximation: `clamp(v^4, 0, 1)`.
#[inline]
pub fn scale_volume(v: f32) -> f32 {
    v.powi(4).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Identifies one scheduled fade-out pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeToken(u64);

#[derive(Debug, Clone, Copy)]
struct PendingPause {
    token: FadeToken,
    remaining: f32,
}

#[derive(Component)]
pub struct MusicPlayer {
    output: Box<dyn AudioOutput>,
    tracks: Vec<String>,
    current_track: usize,
    status: PlaybackStatus,
    volume: f32,
    applied_volume: f32,
    pitch: f32,
    scale_output_volume: bool,
    follow_mode: CameraFollowMode,
    play_on_start: bool,
    initial_volume_from_preference: bool,
    started: bool,
    tweens: Tweener,
    generation: u64,
    pending_pause: Option<PendingPause>,
}

impl MusicPlayer {
    /// Validates the track list; an empty list or a bad default track is fatal.
    pub fn new(config: &MusicConfig, output: Box<dyn AudioOutput>) -> Result<Self, MusicError> {
        if config.tracks.is_empty() {
            return Err(MusicError::EmptyTrackList);
        }
        if config.default_track >= config.tracks.len() {
            return Err(MusicError::InvalidTrackIndex {
                index: config.default_track,
                count: config.tracks.len(),
            });
        }

        Ok(Self {
            output,
            tracks: config.tracks.clone(),
            current_track: config.default_track,
            status: PlaybackStatus::Stopped,
            volume: config.volume,
            applied_volume: config.volume,
            pitch: config.pitch,
            scale_output_volume: config.scale_output_volume,
            follow_mode: config.camera_follow_mode,
            play_on_start: config.play_on_start,
            initial_volume_from_preference: config.initial_volume_from_preference,
            started: false,
            tweens: Tweener::default(),
            generation: 0,
            pending_pause: None,
        })
    }

    /// One-time activation: clip, volume (preference wins when enabled),
    /// output setup, then autoplay unless the volume is zero.
    pub fn start(&mut self, prefs: Option<&Prefs>) {
        if self.started {
            return;
        }
        self.started = true;

        self.output.set_clip(&self.tracks[self.current_track]);
        self.set_volume(self.volume);
        if self.initial_volume_from_preference {
            match prefs {
                Some(prefs) => self.set_volume(prefs.volume_music()),
                None => warn!("Music volume preference requested but no preferences available"),
            }
        }
        self.set_pitch(self.pitch);

        self.output.set_spatial(Spatial::flat());
        self.output.set_looping(true);

        if self.play_on_start && self.volume != 0.0 {
            self.play();
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn follow_mode(&self) -> CameraFollowMode {
        self.follow_mode
    }

    pub fn current_track(&self) -> usize {
        self.current_track
    }

    /// Raw volume, before scaling.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Volume last sent to the output.
    pub fn applied_volume(&self) -> f32 {
        self.applied_volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.applied_volume = if self.scale_output_volume { scale_volume(volume) } else { volume };
        self.output.set_volume(self.applied_volume);
        self.volume = volume;
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.output.set_pitch(pitch);
        self.pitch = pitch;
    }

    pub fn play(&mut self) {
        self.cancel_pending_pause();
        self.output.play();
        self.status = PlaybackStatus::Playing;
    }

    /// Only meaningful while playing.
    pub fn pause(&mut self) {
        self.cancel_pending_pause();
        if self.status == PlaybackStatus::Playing {
            self.output.pause();
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.cancel_pending_pause();
        self.output.stop();
        self.status = PlaybackStatus::Stopped;
    }

    pub fn play_track(&mut self, index: usize) -> Result<(), MusicError> {
        let Some(clip) = self.tracks.get(index) else {
            return Err(MusicError::InvalidTrackIndex { index, count: self.tracks.len() });
        };
        self.output.stop();
        self.output.set_clip(clip);
        debug!("Switching music to track {index} ({clip})");
        self.current_track = index;
        self.play();
        Ok(())
    }

    /// Tween the raw volume from its current value to `target`.
    pub fn fade(&mut self, target: f32, duration: f32) {
        self.cancel_pending_pause();
        if duration <= 0.0 {
            self.tweens.cancel(TweenProperty::Volume);
            self.set_volume(target);
            return;
        }
        self.tweens.start(TweenProperty::Volume, self.volume, target, duration);
    }

    /// Fade to silence, then pause once `duration` has fully elapsed.
    pub fn fade_out(&mut self, duration: f32) -> FadeToken {
        self.fade(0.0, duration);
        let token = FadeToken(self.generation);
        if duration <= 0.0 {
            self.pause();
        } else {
            self.pending_pause = Some(PendingPause { token, remaining: duration });
        }
        token
    }

    pub fn fade_in(&mut self, duration: f32) {
        self.play();
        self.fade(1.0, duration);
    }

    pub fn slide_pitch(&mut self, target: f32, duration: f32) {
        if duration <= 0.0 {
            self.tweens.cancel(TweenProperty::Pitch);
            self.set_pitch(target);
            return;
        }
        self.tweens.start(TweenProperty::Pitch, self.pitch, target, duration);
    }

    pub fn is_fading(&self) -> bool {
        self.tweens.is_active(TweenProperty::Volume)
    }

    /// Token of the fade-out pause still waiting to fire, if any.
    pub fn pending_pause(&self) -> Option<FadeToken> {
        self.pending_pause.map(|p| p.token).filter(|t| t.0 == self.generation)
    }

    /// Drop any scheduled fade-out pause. Returns whether one was pending.
    pub fn cancel_pending_pause(&mut self) -> bool {
        let was_pending = self.pending_pause().is_some();
        self.generation += 1;
        self.pending_pause = None;
        was_pending
    }

    /// Advance tweens and the fade-out continuation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let mut volume = None;
        let mut pitch = None;
        self.tweens.tick(dt, |property, value| match property {
            TweenProperty::Volume => volume = Some(value),
            TweenProperty::Pitch => pitch = Some(value),
        });
        if let Some(v) = volume {
            self.set_volume(v);
        }
        if let Some(p) = pitch {
            self.set_pitch(p);
        }

        let Some(mut pending) = self.pending_pause.take() else {
            return;
        };
        if pending.token.0 != self.generation {
            return;
        }
        pending.remaining -= dt;
        if pending.remaining <= 0.0 {
            self.pause();
        } else {
            self.pending_pause = Some(pending);
        }
    }

    pub fn volume_preference(&self, prefs: &Prefs) -> f32 {
        prefs.volume_music()
    }

    pub fn save_volume_preference(&self, prefs: &mut Prefs, volume: f32) -> Result<(), StoreError> {
        prefs.set_volume_music(volume)
    }

    pub fn save_current_volume_preference(&self, prefs: &mut Prefs) -> Result<(), StoreError> {
        self.save_volume_preference(prefs, self.volume)
    }
}
