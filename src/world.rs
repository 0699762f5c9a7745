//! Top-level fixed-step simulation driver
//!
//! Owns the single instance of every component - event bus, game manager,
//! entity pool, distance spawner, RNG - and wires them together once per
//! step. This is the explicit-context replacement for ambient singletons:
//! anything that needs the bus or the game status gets it passed in.

use glam::Vec3;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Tuning;
use crate::consts::WORLD_RESET_DISTANCE;
use crate::error::CoreError;
use crate::events::{EventBus, EventKind};
use crate::hud::Hud;
use crate::manager::{GameManager, GameStatus};
use crate::pool::{EntityPool, EntityPrototype};
use crate::spawn::{DistanceSpawner, Placer, SpawnContext};

/// Input commands for a single step (deterministic).
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Start (or restart) a session
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// The character died this step
    pub lose_life: bool,
}

/// One running world: a pool, a scheduler, and the game state gating them.
pub struct World {
    tuning: Tuning,
    bus: EventBus,
    manager: GameManager,
    pool: EntityPool,
    spawner: DistanceSpawner,
    rng: Pcg32,
    time_ticks: u64,
}

impl World {
    /// Build a world from validated tuning. Everything random downstream
    /// derives from `seed`.
    pub fn new(tuning: Tuning, seed: u64, hud: Box<dyn Hud>) -> Result<Self, CoreError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let pool = EntityPool::new(
            tuning.pool_capacity,
            EntityPrototype {
                extents: tuning.entity_extents,
            },
        )?;
        let placer = Placer::new(tuning.spawn_range, tuning.only_spawn_while_in_progress)?;
        let spawner = DistanceSpawner::new(placer, tuning.gap_range, &mut rng)?;
        let manager = GameManager::new(tuning.total_lives, hud);

        info!("world created, seed {seed}, pool capacity {}", tuning.pool_capacity);
        Ok(Self {
            tuning,
            bus: EventBus::new(),
            manager,
            pool,
            spawner,
            rng,
            time_ticks: 0,
        })
    }

    /// Begin a session: announce it, then reset the manager (which broadcasts
    /// `GameStart`) and enable continuous scoring.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.bus.publish(EventKind::BeforeGameStart)?;
        self.manager.reset(&mut self.bus)?;
        self.manager.set_points_per_second(self.tuning.points_per_second);
        self.manager.auto_increment_score(true);
        Ok(())
    }

    /// Resume play after a life was lost but the session continues.
    pub fn respawn(&mut self) {
        if self.manager.status() == GameStatus::LifeLost {
            self.manager.set_status(GameStatus::GameInProgress);
        }
    }

    /// Advance the world by one fixed timestep.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<(), CoreError> {
        if input.start {
            self.start()?;
        }

        if input.pause
            && matches!(
                self.manager.status(),
                GameStatus::GameInProgress | GameStatus::Paused
            )
        {
            self.manager.toggle_pause();
        }

        if input.lose_life && self.manager.status() == GameStatus::GameInProgress {
            self.manager.lose_lives(1);
            if self.manager.lives() <= 0 {
                self.manager.game_over(&mut self.bus)?;
            } else {
                self.manager.set_status(GameStatus::LifeLost);
            }
        }

        self.time_ticks += 1;
        self.manager.tick(dt);

        // World scroll, frozen implicitly while the time scale is zero.
        let travel = self.tuning.world_speed * self.manager.time_scale() * dt;
        self.spawner.translate_x(travel);

        let mut ctx = SpawnContext {
            pool: &mut self.pool,
            rng: &mut self.rng,
            status: self.manager.status(),
        };
        self.spawner.fixed_update(&mut ctx)?;

        if self.spawner.position().x > WORLD_RESET_DISTANCE {
            self.reset_world_positions()?;
        }

        Ok(())
    }

    /// Shift the spawner and every active entity back toward the origin to
    /// keep float coordinates small, then broadcast `WorldReset`.
    fn reset_world_positions(&mut self) -> Result<(), CoreError> {
        let dx = self.spawner.position().x;
        self.spawner.translate_x(-dx);
        for (_, entity) in self.pool.iter_mut() {
            if entity.active {
                entity.position.x -= dx;
            }
        }
        info!("world positions shifted back by {dx:.0}");
        self.bus.publish(EventKind::WorldReset)?;
        Ok(())
    }

    /// Read-only world scroll speed, for collaborators doing their own
    /// per-step translation math.
    pub fn world_speed(&self) -> f32 {
        self.tuning.world_speed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn manager(&self) -> &GameManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut GameManager {
        &mut self.manager
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn spawner(&self) -> &DistanceSpawner {
        &self.spawner
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Spawner reference position, exposed for despawn logic that culls
    /// entities the world has scrolled past.
    pub fn scroll_position(&self) -> Vec3 {
        self.spawner.position()
    }
}
