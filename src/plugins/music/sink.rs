//! Bevy audio backend.
//!
//! `MusicPlayer` owns its output and has no world access, so `BevyAudioOutput`
//! only records the requested playback into a shared `SinkIntent`. Once per
//! frame `sync_audio_sinks` reconciles that intent onto an `AudioPlayer` child
//! of the music entity and the `AudioSink` Bevy attaches to it.
//!
//! ```text
//! set_clip / stop -> epoch += 1  old sink despawned, fresh AudioPlayer on next play
//! play / pause    -> AudioSink::play / AudioSink::pause
//! volume / pitch  -> AudioSink::set_volume(Volume::Linear) / AudioSink::set_speed
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use bevy::audio::Volume;
use bevy::prelude::*;

use super::output::{AudioOutput, Spatial};

/// Playback requested by the player, not yet applied to the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkIntent {
    pub clip: Option<String>,
    /// Bumped whenever the current sink must be thrown away.
    pub epoch: u64,
    pub playing: bool,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
}

impl Default for SinkIntent {
    fn default() -> Self {
        Self { clip: None, epoch: 0, playing: false, volume: 1.0, pitch: 1.0, looping: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BevyAudioOutput {
    intent: Arc<Mutex<SinkIntent>>,
}

impl BevyAudioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component that lets `sync_audio_sinks` follow this output.
    pub fn link(&self) -> AudioSinkLink {
        AudioSinkLink { intent: Arc::clone(&self.intent), sink: None, epoch: 0 }
    }

    fn with_intent(&self, f: impl FnOnce(&mut SinkIntent)) {
        let mut intent = self.intent.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut intent);
    }
}

impl AudioOutput for BevyAudioOutput {
    fn set_clip(&mut self, clip: &str) {
        self.with_intent(|i| {
            i.clip = Some(clip.to_owned());
            i.epoch += 1;
        });
    }

    fn play(&mut self) {
        self.with_intent(|i| i.playing = true);
    }

    fn pause(&mut self) {
        self.with_intent(|i| i.playing = false);
    }

    fn stop(&mut self) {
        self.with_intent(|i| {
            i.playing = false;
            i.epoch += 1;
        });
    }

    fn set_volume(&mut self, volume: f32) {
        self.with_intent(|i| i.volume = volume);
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.with_intent(|i| i.pitch = pitch);
    }

    fn set_looping(&mut self, looping: bool) {
        self.with_intent(|i| i.looping = looping);
    }

    // Sinks are spawned without `SpatialAudio`; music is always flat.
    fn set_spatial(&mut self, _spatial: Spatial) {}
}

#[derive(Component, Debug)]
pub struct AudioSinkLink {
    intent: Arc<Mutex<SinkIntent>>,
    sink: Option<Entity>,
    epoch: u64,
}

impl AudioSinkLink {
    /// Entity carrying the current `AudioPlayer`, if one is spawned.
    pub fn sink(&self) -> Option<Entity> {
        self.sink
    }

    pub fn intent(&self) -> SinkIntent {
        self.intent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub fn sync_audio_sinks(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut q_links: Query<(Entity, &mut AudioSinkLink)>,
    mut q_sinks: Query<&mut AudioSink>,
) {
    for (owner, mut link) in &mut q_links {
        let intent = link.intent();

        if link.epoch != intent.epoch {
            if let Some(old) = link.sink.take() {
                commands.entity(old).despawn();
            }
            link.epoch = intent.epoch;
        }

        let current = link.sink;
        match current {
            None => {
                if !intent.playing {
                    continue;
                }
                let Some(clip) = intent.clip else {
                    continue;
                };
                let settings = if intent.looping { PlaybackSettings::LOOP } else { PlaybackSettings::ONCE };
                let sink = commands
                    .spawn((
                        Name::new("MusicSink"),
                        AudioPlayer::new(asset_server.load(clip)),
                        settings
                            .with_volume(Volume::Linear(intent.volume))
                            .with_speed(intent.pitch),
                        ChildOf(owner),
                    ))
                    .id();
                link.sink = Some(sink);
            }
            Some(sink) => {
                // `AudioSink` only appears once the clip has loaded.
                let Ok(mut sink) = q_sinks.get_mut(sink) else {
                    continue;
                };
                if intent.playing && sink.is_paused() {
                    sink.play();
                } else if !intent.playing && !sink.is_paused() {
                    sink.pause();
                }
                sink.set_volume(Volume::Linear(intent.volume));
                sink.set_speed(intent.pitch);
            }
        }
    }
}
