//! Placement and scheduling of pooled entities
//!
//! Two layers, composed rather than inherited:
//! - [`Placer`] turns one target position into one placed-and-activated
//!   entity (randomized scale/rotation, vertical clamp), or no result when
//!   gated off or the pool is exhausted.
//! - [`DistanceSpawner`] wraps a `Placer` with a scheduling policy that
//!   triggers placements from horizontal travel since the last spawn.
//!
//! Both draw randomness exclusively from the [`SpawnContext`]'s seeded RNG,
//! so a seeded run is fully reproducible.

pub mod distance;
pub mod placer;

pub use distance::DistanceSpawner;
pub use placer::Placer;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::error::SpawnError;
use crate::manager::GameStatus;
use crate::pool::{EntityId, EntityPool, PooledEntity};

/// Per-step context handed to spawners by the simulation driver.
///
/// Assembled fresh each step; nothing in here is ambient or global.
pub struct SpawnContext<'a> {
    pub pool: &'a mut EntityPool,
    pub rng: &'a mut Pcg32,
    /// Gate signal derived from the game state manager.
    pub status: GameStatus,
}

impl SpawnContext<'_> {
    /// True when the gate is open for spawning.
    pub fn in_progress(&self) -> bool {
        self.status == GameStatus::GameInProgress
    }
}

/// Bounds-measurement collaborator.
///
/// A pure query for an entity's scaled footprint (width, height). Returning
/// `None` means the entity's shape contract is broken, which fails the spawn
/// attempt rather than being treated as a routine no-result.
pub trait BoundsMeasure {
    fn measure(&self, entity: &PooledEntity) -> Option<Vec2>;
}

/// Default bounds: the entity's unscaled extents multiplied by its scale.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaledExtents;

impl BoundsMeasure for ScaledExtents {
    fn measure(&self, entity: &PooledEntity) -> Option<Vec2> {
        let size = Vec2::new(
            entity.extents.x * entity.scale.x,
            entity.extents.y * entity.scale.y,
        );
        (size.x > 0.0 && size.y > 0.0).then_some(size)
    }
}

/// Capability of producing one placed entity at a requested position.
pub trait Place {
    /// Either places exactly one entity or reports why it did not: `Ok(None)`
    /// for the routine no-result paths (gate closed, pool exhausted), `Err`
    /// for contract violations. No retries happen inside one call.
    fn place(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        position: Vec3,
    ) -> Result<Option<EntityId>, SpawnError>;
}

/// Uniform sample from `[min, max]`, degenerating to `min` when the range is
/// empty or inverted at runtime.
pub(crate) fn sample(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.random_range(min..=max)
    }
}
