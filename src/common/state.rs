//! Global state machine.
//!
//! Each state stands in for a scene: entering one is reported to the music
//! plugin as a scene load.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Menu,
    InGame,
}
