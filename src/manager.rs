//! Game status, lives, score and time-scale authority
//!
//! One `GameManager` exists per session, owned by the simulation driver and
//! passed by reference wherever the game status gates behavior. The shared
//! time-scale is the single mechanism by which "paused" is expressed: any
//! component scaling its motion by it is implicitly frozen at zero.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::SCORE_TICK;
use crate::error::EventError;
use crate::events::{EventBus, EventKind};
use crate::hud::Hud;

/// The states the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    #[default]
    BeforeGameStart,
    GameInProgress,
    Paused,
    GameOver,
    LifeLost,
}

/// Single authority for game progress.
pub struct GameManager {
    status: GameStatus,
    lives: i32,
    points: f32,
    time_scale: f32,
    saved_time_scale: f32,
    points_per_second: f32,
    auto_increment: bool,
    /// Simulated seconds accumulated toward the next score increment.
    score_accumulator: f32,
    hud: Box<dyn Hud>,
}

impl GameManager {
    pub fn new(total_lives: i32, mut hud: Box<dyn Hud>) -> Self {
        hud.refresh_lives(total_lives);
        hud.refresh_score(0.0);
        Self {
            status: GameStatus::BeforeGameStart,
            lives: total_lives,
            points: 0.0,
            time_scale: 1.0,
            saved_time_scale: 1.0,
            points_per_second: 0.0,
            auto_increment: false,
            score_accumulator: 0.0,
            hud,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn points(&self) -> f32 {
        self.points
    }

    /// Global simulation speed multiplier. Zero while paused.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Start a new session: clear the score, restore full speed, move to
    /// `GameInProgress` and broadcast `GameStart`.
    pub fn reset(&mut self, bus: &mut EventBus) -> Result<(), EventError> {
        self.points = 0.0;
        self.score_accumulator = 0.0;
        self.time_scale = 1.0;
        self.set_status(GameStatus::GameInProgress);
        bus.publish(EventKind::GameStart)?;
        self.hud.refresh_score(self.points);
        Ok(())
    }

    /// Directly assign the status. Used by surrounding gameplay logic, e.g.
    /// to move to `LifeLost` when a character dies.
    pub fn set_status(&mut self, status: GameStatus) {
        if status != self.status {
            debug!("status {:?} -> {:?}", self.status, status);
        }
        self.status = status;
    }

    /// Move to `GameOver` and broadcast it.
    pub fn game_over(&mut self, bus: &mut EventBus) -> Result<(), EventError> {
        self.set_status(GameStatus::GameOver);
        bus.publish(EventKind::GameOver)?;
        Ok(())
    }

    /// Pause the game if time is running; if it is already stopped, this
    /// unpauses instead (pause acts as a toggle while paused).
    pub fn pause(&mut self) {
        if self.time_scale > 0.0 {
            self.set_time_scale(0.0);
            self.set_status(GameStatus::Paused);
            self.hud.set_pause_visual(true);
        } else {
            self.un_pause();
        }
    }

    /// Restore the pre-pause time scale and resume.
    pub fn un_pause(&mut self) {
        self.reset_time_scale();
        self.set_status(GameStatus::GameInProgress);
        self.hud.set_pause_visual(false);
    }

    /// Explicit toggle, same behavior as calling [`GameManager::pause`].
    pub fn toggle_pause(&mut self) {
        self.pause();
    }

    /// Set the time scale, remembering the previous value for restore.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.saved_time_scale = self.time_scale;
        self.time_scale = scale;
    }

    /// Restore the last saved time scale.
    pub fn reset_time_scale(&mut self) {
        self.time_scale = self.saved_time_scale;
    }

    pub fn set_lives(&mut self, lives: i32) {
        self.lives = lives;
        self.hud.refresh_lives(self.lives);
    }

    pub fn lose_lives(&mut self, lives: i32) {
        self.lives -= lives;
        self.hud.refresh_lives(self.lives);
    }

    pub fn add_points(&mut self, points: f32) {
        self.points += points;
        self.hud.refresh_score(self.points);
    }

    pub fn set_points(&mut self, points: f32) {
        self.points = points;
        self.hud.refresh_score(self.points);
    }

    pub fn set_points_per_second(&mut self, points_per_second: f32) {
        self.points_per_second = points_per_second;
    }

    /// Enable or disable continuous scoring.
    pub fn auto_increment_score(&mut self, enabled: bool) {
        self.auto_increment = enabled;
    }

    /// Advance continuous scoring by one fixed step.
    ///
    /// Every 0.01 accumulated seconds adds 1/100th of the per-second rate.
    /// Steps taken in any status other than `GameInProgress` are skipped
    /// outright, never accumulated or deferred.
    pub fn tick(&mut self, dt: f32) {
        if !self.auto_increment || self.status != GameStatus::GameInProgress {
            return;
        }
        self.score_accumulator += dt;
        while self.score_accumulator >= SCORE_TICK {
            self.score_accumulator -= SCORE_TICK;
            self.add_points(self.points_per_second * SCORE_TICK);
        }
    }
}
