//! Camera tracking for the music entity.
//!
//! ```text
//! Follow: every frame      music.translation = camera.translation
//! Child:  start/scene load  ChildOf(camera), local transform kept
//! ```
//!
//! `Follow` re-syncs continuously; `Child` relies on the hierarchy and only
//! touches the parent on events. The local `Transform` is left as it was, so a
//! freshly parented entity sits at that offset from the camera.
//!
//! Disjointness of the camera and music queries is proven with `Without<...>`
//! filters (B0001).

use bevy::prelude::*;

use super::messages::SceneLoaded;
use super::player::MusicPlayer;
use crate::common::config::CameraFollowMode;
use crate::plugins::camera::MainCamera;

/// The music entity has not been placed relative to the camera yet.
#[derive(Component, Debug, Default)]
pub struct PendingCameraSync;

/// Start/scene-load sync. Runs for entities still marked `PendingCameraSync`,
/// or for every music entity when a `SceneLoaded` message arrived.
pub fn attach_to_camera(
    mut commands: Commands,
    mut scene_loads: MessageReader<SceneLoaded>,
    q_cam: Query<(Entity, &Transform), (With<MainCamera>, Without<MusicPlayer>)>,
    mut q_music: Query<
        (
            Entity,
            &MusicPlayer,
            &mut Transform,
            Option<&ChildOf>,
            Has<PendingCameraSync>,
        ),
        Without<MainCamera>,
    >,
) {
    let scene_loaded = scene_loads.read().count() > 0;
    let camera = q_cam.single().ok();

    for (e, player, mut tf, parent, pending) in &mut q_music {
        if !pending && !scene_loaded {
            continue;
        }
        if pending {
            commands.entity(e).remove::<PendingCameraSync>();
        }
        let Some((cam_e, cam_tf)) = camera else {
            continue;
        };

        match player.follow_mode() {
            CameraFollowMode::Follow => tf.translation = cam_tf.translation,
            CameraFollowMode::Child => {
                if parent.map(ChildOf::parent) != Some(cam_e) {
                    commands.entity(e).insert(ChildOf(cam_e));
                }
            }
            CameraFollowMode::None => {}
        }
    }
}

pub fn follow_camera(
    q_cam: Query<&Transform, (With<MainCamera>, Without<MusicPlayer>)>,
    mut q_music: Query<(&MusicPlayer, &mut Transform), Without<MainCamera>>,
) {
    let Ok(cam_tf) = q_cam.single() else {
        return;
    };
    for (player, mut tf) in &mut q_music {
        if player.follow_mode() == CameraFollowMode::Follow {
            tf.translation = cam_tf.translation;
        }
    }
}
