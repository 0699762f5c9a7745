//! Runner Core - procedural world generation for an endless side-scroller
//!
//! Core modules:
//! - `events`: Synchronous publish/subscribe bus for game occurrences
//! - `pool`: Fixed-capacity entity recycling pool
//! - `config`: Spawn/gap ranges and tuning, validated at setup time
//! - `manager`: Game status, lives, score and time-scale authority
//! - `spawn`: Placement algorithm and distance-triggered scheduling
//! - `world`: Top-level fixed-step simulation driver
//!
//! The whole crate is single-threaded and step-based: everything advances on
//! a fixed timestep, all randomness comes from a seeded RNG, and there are no
//! ambient singletons - the [`world::World`] driver owns the one instance of
//! each component and passes it where needed.

pub mod config;
pub mod error;
pub mod events;
pub mod hud;
pub mod manager;
pub mod pool;
pub mod spawn;
pub mod world;

pub use config::{GapRange, SpawnRange, Tuning};
pub use error::{ConfigError, CoreError, EventError, SpawnError};
pub use events::{EventBus, EventKind, HandlerId};
pub use hud::Hud;
pub use manager::{GameManager, GameStatus};
pub use pool::{EntityId, EntityPool, EntityPrototype, PooledEntity};
pub use spawn::{BoundsMeasure, DistanceSpawner, Place, Placer, ScaledExtents, SpawnContext};
pub use world::{TickInput, World};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, one "fixed update" per step)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Score auto-increment cadence in simulated seconds
    pub const SCORE_TICK: f32 = 0.01;
    /// Floor applied to recomputed spawn thresholds so the scheduler never
    /// holds a zero or negative distance
    pub const MIN_SPAWN_DISTANCE: f32 = 1e-3;
    /// Travelled x distance past which the world is shifted back toward the
    /// origin to keep float coordinates small
    pub const WORLD_RESET_DISTANCE: f32 = 10_000.0;
}
