//! Music plugin: one long-lived background music entity.
//!
//! # Data flow
//! ```text
//! Startup:    spawn_music_player (MusicConfig + MusicBackend)
//! Update:     claim_singleton -> start_music_player -> tick_music(dt)
//! PostUpdate: attach_to_camera (start / SceneLoaded) -> follow_camera
//!             sync_audio_sinks (BevyAudio backend only)
//! ```
//!
//! # Singleton
//! The first `MusicPlayer` entity claims `MusicInstance`; any later one is
//! despawned as soon as it appears. The claimed entity has no state-scoped
//! despawn, so it outlives `GameState` transitions until the host despawns it.
//!
//! Game code reaches the player through `MusicInstance` + `Query<&mut MusicPlayer>`
//! and its preferences through `ResMut<Prefs>`; nothing is global.

pub mod follow;
pub mod messages;
pub mod output;
pub mod player;
pub mod sink;
pub mod tween;

use bevy::prelude::*;

use crate::common::config::MusicConfig;
use crate::plugins::prefs::Prefs;

pub use messages::SceneLoaded;
pub use output::{AudioOutput, HeadlessOutput};
pub use player::{FadeToken, MusicPlayer, PlaybackStatus, scale_volume};
pub use sink::{AudioSinkLink, BevyAudioOutput};

/// Entity currently holding the music singleton.
#[derive(Resource, Default, Debug)]
pub struct MusicInstance(pub Option<Entity>);

/// Where new players send their audio.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicBackend {
    /// Records playback only; for headless apps and tests.
    #[default]
    Headless,
    /// Spawns `AudioPlayer` sinks; needs `AssetPlugin` and `AudioPlugin`.
    BevyAudio,
}

#[derive(Default)]
pub struct MusicPlugin {
    pub backend: MusicBackend,
}

impl Plugin for MusicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MusicInstance>()
            .insert_resource(self.backend)
            .add_message::<SceneLoaded>()
            .add_systems(Startup, spawn_music_player)
            .add_systems(
                Update,
                (claim_singleton, start_music_player, tick_music).chain(),
            )
            .add_systems(
                PostUpdate,
                (follow::attach_to_camera, follow::follow_camera)
                    .chain()
                    .before(TransformSystems::Propagate),
            );

        if self.backend == MusicBackend::BevyAudio {
            app.add_systems(PostUpdate, sink::sync_audio_sinks.after(follow::follow_camera));
        }
    }
}

pub fn spawn_music_player(
    mut commands: Commands,
    config: Res<MusicConfig>,
    backend: Res<MusicBackend>,
) {
    let (output, link): (Box<dyn AudioOutput>, Option<AudioSinkLink>) = match *backend {
        MusicBackend::Headless => (Box::new(HeadlessOutput::new()), None),
        MusicBackend::BevyAudio => {
            let output = BevyAudioOutput::new();
            let link = output.link();
            (Box::new(output), Some(link))
        }
    };

    match MusicPlayer::new(&config, output) {
        Ok(player) => {
            let mut entity = commands.spawn((
                Name::new("MusicPlayer"),
                player,
                Transform::default(),
                follow::PendingCameraSync,
            ));
            if let Some(link) = link {
                entity.insert(link);
            }
        }
        Err(err) => error!("Music player not created: {err}"),
    }
}

/// First writer wins; later players are despawned.
pub fn claim_singleton(
    mut commands: Commands,
    mut instance: ResMut<MusicInstance>,
    q_new: Query<Entity, Added<MusicPlayer>>,
    q_all: Query<(), With<MusicPlayer>>,
) {
    for e in &q_new {
        match instance.0 {
            Some(existing) if existing != e && q_all.contains(existing) => {
                warn!("Music player {e} rejected: {existing} already owns the music");
                commands.entity(e).despawn();
            }
            _ => instance.0 = Some(e),
        }
    }
}

pub fn start_music_player(
    prefs: Option<Res<Prefs>>,
    instance: Res<MusicInstance>,
    mut q: Query<(Entity, &mut MusicPlayer)>,
) {
    for (e, mut player) in &mut q {
        if instance.0 != Some(e) || player.is_started() {
            continue;
        }
        player.start(prefs.as_deref());
        info!(
            "Music started on track {} at volume {} ({:?})",
            player.current_track(),
            player.volume(),
            player.status()
        );
    }
}

pub fn tick_music(time: Res<Time>, mut q: Query<&mut MusicPlayer>) {
    let dt = time.delta_secs();
    for mut player in &mut q {
        player.update(dt);
    }
}
