//! Distance-triggered spawn scheduling
//!
//! Tracks how far the world has scrolled since the last placed entity and
//! triggers a new placement once that travel exceeds a randomized threshold.
//! The threshold always includes half the footprint of the entity just
//! placed, so a wide entity pushes the next one further out and they never
//! overlap.

use glam::Vec3;
use log::debug;

use crate::config::GapRange;
use crate::consts::MIN_SPAWN_DISTANCE;
use crate::error::{ConfigError, SpawnError};
use crate::pool::EntityId;
use rand_pcg::Pcg32;

use super::{sample, Place, Placer, SpawnContext};

/// Schedules placements from accumulated horizontal travel.
///
/// Composes a [`Placer`] for the actual placement; this type only decides
/// *when* and *where* to call it. The "last spawned" field is a relation,
/// not ownership - the entity stays owned by the pool and may be recycled
/// underneath us, which simply forces a fresh first spawn.
pub struct DistanceSpawner {
    placer: Placer,
    gap: GapRange,
    /// The spawner's own reference position; advanced by the driver as the
    /// world scrolls.
    position: Vec3,
    last_spawned: Option<EntityId>,
    next_spawn_distance: f32,
}

impl DistanceSpawner {
    /// Fails fast on an invalid gap range. The initial threshold is sampled
    /// from the gap range so the very first spawn already sits one gap ahead
    /// of the spawner.
    pub fn new(placer: Placer, gap: GapRange, rng: &mut Pcg32) -> Result<Self, ConfigError> {
        gap.validate()?;
        let first = sample(rng, gap.minimum_gap.x, gap.maximum_gap.x).max(MIN_SPAWN_DISTANCE);
        Ok(Self {
            placer,
            gap,
            position: Vec3::ZERO,
            last_spawned: None,
            next_spawn_distance: first,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Advance the spawner along the scroll axis.
    pub fn translate_x(&mut self, dx: f32) {
        self.position.x += dx;
    }

    pub fn last_spawned(&self) -> Option<EntityId> {
        self.last_spawned
    }

    pub fn next_spawn_distance(&self) -> f32 {
        self.next_spawn_distance
    }

    /// One scheduling step, run once per fixed update.
    ///
    /// Returns the entity placed this step, if any. `Ok(None)` covers every
    /// routine outcome: gate closed, threshold not yet reached, or pool
    /// exhausted (in which case the attempt repeats next step - the scheduler
    /// never backs off).
    pub fn fixed_update(
        &mut self,
        ctx: &mut SpawnContext<'_>,
    ) -> Result<Option<EntityId>, SpawnError> {
        if self.placer.only_while_in_progress() && !ctx.in_progress() {
            // Dropping the relation forces a fresh first spawn when the gate
            // reopens instead of resuming a stale schedule.
            self.last_spawned = None;
            return Ok(None);
        }

        // A recycled or never-set last entity means we have no anchor to
        // measure travel from: spawn one threshold ahead of ourselves.
        let anchor = match self.last_spawned {
            Some(id) if ctx.pool.is_active(id) => {
                ctx.pool.get(id).map(|e| e.position.x)
            }
            _ => None,
        };

        let Some(anchor_x) = anchor else {
            let mut position = self.position;
            position.x += self.next_spawn_distance;
            position.y += sample(ctx.rng, self.gap.minimum_gap.y, self.gap.maximum_gap.y);
            return self.distance_spawn(ctx, position);
        };

        if self.position.x - anchor_x >= self.next_spawn_distance {
            // Anchor on the previous entity, not on our own position: the
            // spacing stays exact no matter how many steps were skipped.
            let mut position = self.position;
            position.x = anchor_x + self.next_spawn_distance;
            position.y += sample(ctx.rng, self.gap.minimum_gap.y, self.gap.maximum_gap.y);
            return self.distance_spawn(ctx, position);
        }

        Ok(None)
    }

    /// Place at `position` and recompute the threshold for the next spawn.
    fn distance_spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        position: Vec3,
    ) -> Result<Option<EntityId>, SpawnError> {
        let placed = self.placer.place(ctx, position)?;

        let gap = sample(ctx.rng, self.gap.minimum_gap.x, self.gap.maximum_gap.x);
        match placed {
            Some(id) => {
                let entity = ctx.pool.get(id).ok_or(SpawnError::StaleHandle)?;
                let footprint = self.placer.footprint(entity)?;
                self.next_spawn_distance = (gap + footprint.x / 2.0).max(MIN_SPAWN_DISTANCE);
                self.last_spawned = Some(id);
                debug!(
                    "spawned at x={:.2}, next threshold {:.2}",
                    entity.position.x, self.next_spawn_distance
                );
            }
            None => {
                // No placement (gated or exhausted): keep the old anchor and
                // resample without a footprint term.
                self.next_spawn_distance = gap.max(MIN_SPAWN_DISTANCE);
            }
        }

        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnRange;
    use crate::manager::GameStatus;
    use crate::pool::{EntityPool, EntityPrototype};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn unit_range() -> SpawnRange {
        SpawnRange {
            minimum_y_clamp: -100.0,
            maximum_y_clamp: 100.0,
            ..Default::default()
        }
    }

    fn fixed_gap(x: f32) -> GapRange {
        GapRange {
            minimum_gap: Vec3::new(x, 0.0, 0.0),
            maximum_gap: Vec3::new(x, 0.0, 0.0),
        }
    }

    fn spawner(gap: GapRange, rng: &mut Pcg32) -> DistanceSpawner {
        let placer = Placer::new(unit_range(), false).unwrap();
        DistanceSpawner::new(placer, gap, rng).unwrap()
    }

    fn ctx<'a>(
        pool: &'a mut EntityPool,
        rng: &'a mut Pcg32,
        status: GameStatus,
    ) -> SpawnContext<'a> {
        SpawnContext { pool, rng, status }
    }

    #[test]
    fn test_degenerate_gap_scenario() {
        // Gap fixed at 2, one pooled entity of footprint width 4.
        let mut rng = Pcg32::seed_from_u64(11);
        let mut pool = EntityPool::new(1, EntityPrototype {
            extents: Vec2::new(4.0, 2.0),
        })
        .unwrap();
        let mut sp = spawner(fixed_gap(2.0), &mut rng);
        assert_eq!(sp.next_spawn_distance(), 2.0);

        // First spawn: near edge lands one threshold ahead of the spawner.
        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        let first = sp.fixed_update(&mut c).unwrap().unwrap();
        let center = c.pool.get(first).unwrap().position.x;
        assert_eq!(center, 4.0); // requested 2.0 + half of the 4-wide footprint
        assert_eq!(sp.next_spawn_distance(), 4.0); // gap 2 + footprint 4 / 2

        // Scroll until due; pool is exhausted, so the next two due steps
        // produce nothing and the anchor does not move.
        sp.translate_x(10.0);
        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        assert_eq!(sp.fixed_update(&mut c), Ok(None));
        assert_eq!(sp.last_spawned(), Some(first));
        assert_eq!(sp.fixed_update(&mut c), Ok(None));
        assert_eq!(sp.next_spawn_distance(), 2.0); // gap only, no footprint term

        // External deactivation recycles the entity; the stale anchor forces
        // a fresh first spawn relative to the spawner's current position.
        c.pool.deactivate(first);
        let respawned = sp.fixed_update(&mut c).unwrap().unwrap();
        let center = c.pool.get(respawned).unwrap().position.x;
        assert_eq!(center, 10.0 + 2.0 + 2.0);
    }

    #[test]
    fn test_gate_closed_clears_anchor() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = EntityPool::new(4, EntityPrototype {
            extents: Vec2::splat(2.0),
        })
        .unwrap();
        let placer = Placer::new(unit_range(), true).unwrap();
        let mut sp = DistanceSpawner::new(placer, fixed_gap(3.0), &mut rng).unwrap();

        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        let first = sp.fixed_update(&mut c).unwrap();
        assert!(first.is_some());
        assert_eq!(sp.last_spawned(), first);

        let mut c = ctx(&mut pool, &mut rng, GameStatus::Paused);
        assert_eq!(sp.fixed_update(&mut c), Ok(None));
        assert_eq!(sp.last_spawned(), None);
    }

    #[test]
    fn test_due_spawn_anchors_on_previous_entity() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pool = EntityPool::new(4, EntityPrototype {
            extents: Vec2::splat(2.0),
        })
        .unwrap();
        let mut sp = spawner(fixed_gap(3.0), &mut rng);

        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        let first = sp.fixed_update(&mut c).unwrap().unwrap();
        let first_x = c.pool.get(first).unwrap().position.x;
        let threshold = sp.next_spawn_distance();

        // Overshoot the threshold by a lot; the new entity must still land
        // exactly one threshold past the previous one, not at the spawner.
        sp.translate_x(50.0);
        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        let second = sp.fixed_update(&mut c).unwrap().unwrap();
        let second_x = c.pool.get(second).unwrap().position.x;

        // Requested edge at first_x + threshold, center is half a footprint on.
        assert!((second_x - (first_x + threshold + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_not_due_does_nothing() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = EntityPool::new(4, EntityPrototype {
            extents: Vec2::splat(2.0),
        })
        .unwrap();
        let mut sp = spawner(fixed_gap(5.0), &mut rng);

        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        sp.fixed_update(&mut c).unwrap().unwrap();
        let active_before = c.pool.active_count();

        // Barely short of the threshold.
        sp.translate_x(sp.next_spawn_distance() - 0.1);
        let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
        assert_eq!(sp.fixed_update(&mut c), Ok(None));
        assert_eq!(c.pool.active_count(), active_before);
    }

    proptest! {
        #[test]
        fn prop_threshold_covers_gap_plus_half_footprint(
            seed in any::<u64>(),
            gap_min in 0.5f32..4.0,
            spread in 0.0f32..3.0,
        ) {
            let gap = GapRange {
                minimum_gap: Vec3::new(gap_min, 0.0, 0.0),
                maximum_gap: Vec3::new(gap_min + spread, 0.0, 0.0),
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = EntityPool::new(2, EntityPrototype {
                extents: Vec2::new(3.0, 1.0),
            })
            .unwrap();
            let mut sp = spawner(gap, &mut rng);

            let mut c = ctx(&mut pool, &mut rng, GameStatus::GameInProgress);
            let id = sp.fixed_update(&mut c).unwrap().unwrap();
            let entity = c.pool.get(id).unwrap();
            let half_width = entity.extents.x * entity.scale.x / 2.0;

            let threshold = sp.next_spawn_distance();
            prop_assert!(threshold >= gap_min + half_width - 1e-5);
            prop_assert!(threshold <= gap_min + spread + half_width + 1e-5);
        }
    }
}
