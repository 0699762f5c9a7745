//! Display collaborator
//!
//! The game state manager pushes every score/lives/pause change to a [`Hud`]
//! synchronously, one call per mutation, never batched. The core does not
//! render anything itself; these are the hooks a real HUD hangs off.

use log::info;

/// Receives score, lives and pause-state updates.
pub trait Hud {
    fn refresh_score(&mut self, score: f32);
    fn refresh_lives(&mut self, lives: i32);
    fn set_pause_visual(&mut self, paused: bool);
}

/// HUD that logs updates, for headless runs.
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn refresh_score(&mut self, score: f32) {
        info!("score: {score:.0}");
    }

    fn refresh_lives(&mut self, lives: i32) {
        info!("lives: {lives}");
    }

    fn set_pause_visual(&mut self, paused: bool) {
        info!("paused: {paused}");
    }
}

/// HUD that discards updates.
#[derive(Debug, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn refresh_score(&mut self, _score: f32) {}
    fn refresh_lives(&mut self, _lives: i32) {}
    fn set_pause_visual(&mut self, _paused: bool) {}
}
