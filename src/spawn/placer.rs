//! Base placement algorithm
//!
//! Takes a target position, pulls a recyclable entity from the pool, gives it
//! a randomized scale and rotation, shifts it so its near edge (not its
//! center) lands on the requested coordinate, clamps the height, and
//! activates it.

use glam::Vec3;

use crate::config::SpawnRange;
use crate::error::{ConfigError, SpawnError};
use crate::pool::EntityId;

use super::{sample, BoundsMeasure, Place, ScaledExtents, SpawnContext};

/// Places single entities within a validated [`SpawnRange`].
pub struct Placer {
    range: SpawnRange,
    only_while_in_progress: bool,
    bounds: Box<dyn BoundsMeasure>,
}

impl Placer {
    /// Fails fast on an invalid range; uses scaled-extents bounds.
    pub fn new(range: SpawnRange, only_while_in_progress: bool) -> Result<Self, ConfigError> {
        range.validate()?;
        Ok(Self {
            range,
            only_while_in_progress,
            bounds: Box::new(ScaledExtents),
        })
    }

    /// Swap in a different bounds-measurement collaborator.
    pub fn with_bounds(mut self, bounds: impl BoundsMeasure + 'static) -> Self {
        self.bounds = Box::new(bounds);
        self
    }

    pub fn only_while_in_progress(&self) -> bool {
        self.only_while_in_progress
    }

    pub fn range(&self) -> &SpawnRange {
        &self.range
    }

    /// Measure an entity's scaled footprint through the bounds collaborator.
    pub(crate) fn footprint(
        &self,
        entity: &crate::pool::PooledEntity,
    ) -> Result<glam::Vec2, SpawnError> {
        self.bounds.measure(entity).ok_or(SpawnError::MissingBounds)
    }
}

impl Place for Placer {
    fn place(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        mut position: Vec3,
    ) -> Result<Option<EntityId>, SpawnError> {
        // Gate check comes first: no pool access, no RNG draws while closed,
        // so a gated-off step consumes nothing.
        if self.only_while_in_progress && !ctx.in_progress() {
            return Ok(None);
        }

        let Some(id) = ctx.pool.acquire() else {
            return Ok(None);
        };

        let scale = Vec3::new(
            sample(ctx.rng, self.range.minimum_size.x, self.range.maximum_size.x),
            sample(ctx.rng, self.range.minimum_size.y, self.range.maximum_size.y),
            sample(ctx.rng, self.range.minimum_size.z, self.range.maximum_size.z),
        );
        let rotation = Vec3::new(
            sample(
                ctx.rng,
                self.range.minimum_rotation.x,
                self.range.maximum_rotation.x,
            ),
            sample(
                ctx.rng,
                self.range.minimum_rotation.y,
                self.range.maximum_rotation.y,
            ),
            sample(
                ctx.rng,
                self.range.minimum_rotation.z,
                self.range.maximum_rotation.z,
            ),
        );

        let entity = ctx.pool.get_mut(id).ok_or(SpawnError::StaleHandle)?;
        entity.scale = scale;

        // The footprint reflects the scale just applied, so the requested
        // coordinate becomes the entity's near edge rather than its center.
        let footprint = self.footprint(entity)?;
        position.x += footprint.x / 2.0;
        position.y += footprint.y / 2.0;
        position.y = position
            .y
            .clamp(self.range.minimum_y_clamp, self.range.maximum_y_clamp);

        let entity = ctx.pool.get_mut(id).ok_or(SpawnError::StaleHandle)?;
        entity.position = position;
        entity.rotation = rotation;
        ctx.pool.activate(id);

        Ok(Some(id))
    }
}
