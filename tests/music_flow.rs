mod common;

use bevy::prelude::*;
use bevy_music::common::config::{CameraFollowMode, MusicConfig};
use bevy_music::plugins::music::{HeadlessOutput, MusicPlayer, PlaybackStatus};
use bevy_music::plugins::prefs::{LoadState, MemoryStore, Prefs};
use bevy_music::plugins::prefs::record::SCHEMA_VERSION;

#[test]
fn preference_volume_flows_into_player_and_resets_on_schema_bump() {
    let mut prefs = Prefs::open(MemoryStore::new()).unwrap();
    assert_eq!(prefs.load_state(), LoadState::FreshlyInitialized);
    assert_eq!(prefs.volume_music(), 1.0);
    assert_eq!(prefs.volume_soundfx(), 1.0);

    prefs.set_volume_music(0.5).unwrap();

    let config = MusicConfig { tracks: vec!["music/theme.ogg".into()], ..default() };
    let output = HeadlessOutput::new();
    let probe = output.probe();
    let mut player = MusicPlayer::new(&config, Box::new(output)).unwrap();
    player.start(Some(&prefs));
    assert_eq!(player.volume(), 0.5);
    assert!((probe.snapshot().volume - 0.0625).abs() < 1e-6);

    let prefs = Prefs::open_with_version(prefs.into_store(), SCHEMA_VERSION + 1).unwrap();
    assert_eq!(prefs.volume_music(), 1.0);
    assert_eq!(prefs.volume_soundfx(), 1.0);
}

#[test]
fn fade_out_pauses_after_duration_in_running_app() {
    let mut app = common::app_headless(CameraFollowMode::None);
    app.update();

    // 1 s = 8 frames of 125 ms.
    common::with_player(&mut app, |p| p.fade_out(1.0));
    for _ in 0..7 {
        app.update();
        assert_eq!(common::with_player(&mut app, |p| p.status()), PlaybackStatus::Playing);
    }
    for _ in 0..2 {
        app.update();
    }

    let (status, volume, pending) =
        common::with_player(&mut app, |p| (p.status(), p.volume(), p.pending_pause()));
    assert_eq!(status, PlaybackStatus::Paused);
    assert_eq!(volume, 0.0);
    assert!(pending.is_none());
}

#[test]
fn volume_saved_from_game_code_persists_in_prefs_resource() {
    let mut app = common::app_headless(CameraFollowMode::None);
    app.update();

    let e = common::music_entity(&app);
    app.world_mut().resource_scope(|world, mut prefs: Mut<Prefs>| {
        let mut player = world.get_mut::<MusicPlayer>(e).unwrap();
        player.set_volume(0.3);
        player.save_current_volume_preference(&mut prefs).unwrap();
    });

    assert_eq!(app.world().resource::<Prefs>().volume_music(), 0.3);
}

#[test]
fn play_track_out_of_range_leaves_playback_untouched() {
    let mut app = common::app_headless(CameraFollowMode::None);
    app.update();

    let result = common::with_player(&mut app, |p| p.play_track(5));
    assert!(result.is_err());
    let (track, status) = common::with_player(&mut app, |p| (p.current_track(), p.status()));
    assert_eq!(track, 0);
    assert_eq!(status, PlaybackStatus::Playing);

    common::with_player(&mut app, |p| p.play_track(1)).unwrap();
    assert_eq!(common::with_player(&mut app, |p| p.current_track()), 1);
}
