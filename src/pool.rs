//! Fixed-capacity entity recycling pool
//!
//! All entities are created up front, deactivated, and live for the whole
//! session: nothing is allocated or destroyed at runtime, entities are only
//! toggled active/inactive. Relations into the pool use copyable [`EntityId`]
//! handles; ownership never leaves the pool.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Index handle into an [`EntityPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId(usize);

/// Template the pool stamps its entities from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityPrototype {
    /// Unscaled visual size (width, height) of the entity.
    pub extents: Vec2,
}

/// A recyclable placeable object.
///
/// `extents` is the unscaled visual size; the scaled footprint is derived by
/// the bounds collaborator in [`crate::spawn`], never stored back here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledEntity {
    pub active: bool,
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub extents: Vec2,
}

impl PooledEntity {
    fn from_prototype(proto: &EntityPrototype) -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            extents: proto.extents,
        }
    }
}

/// Fixed pool of pre-created, deactivated entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPool {
    entities: Vec<PooledEntity>,
}

impl EntityPool {
    /// Create a pool of `capacity` inactive entities stamped from `proto`.
    ///
    /// Capacity is fixed for the lifetime of the pool.
    pub fn new(capacity: usize, proto: EntityPrototype) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            entities: vec![PooledEntity::from_prototype(&proto); capacity],
        })
    }

    /// Hand out the first currently-inactive entity, or `None` when every
    /// entity is active.
    ///
    /// The returned entity stays inactive: the caller finishes configuring
    /// its transform and then calls [`EntityPool::activate`]. That ordering
    /// avoids a one-step flicker of a mis-placed entity.
    pub fn acquire(&mut self) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|e| !e.active)
            .map(EntityId)
    }

    pub fn activate(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(id.0) {
            e.active = true;
        }
    }

    /// Return an entity to the recyclable set. Called by whatever despawns
    /// entities (off-screen culling, pickups); the spawning core itself never
    /// deactivates.
    pub fn deactivate(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(id.0) {
            e.active = false;
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&PooledEntity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut PooledEntity> {
        self.entities.get_mut(id.0)
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(id.0).is_some_and(|e| e.active)
    }

    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.active).count()
    }

    /// Iterate over all entities with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &PooledEntity)> {
        self.entities.iter().enumerate().map(|(i, e)| (EntityId(i), e))
    }

    /// Mutable iteration, used by the driver for bulk position shifts.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut PooledEntity)> {
        self.entities
            .iter_mut()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto() -> EntityPrototype {
        EntityPrototype {
            extents: Vec2::new(4.0, 2.0),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(EntityPool::new(0, proto()), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_acquire_does_not_activate() {
        let mut pool = EntityPool::new(2, proto()).unwrap();
        let id = pool.acquire().unwrap();
        assert!(!pool.is_active(id));

        pool.activate(id);
        assert!(pool.is_active(id));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_acquire_skips_active_entities() {
        let mut pool = EntityPool::new(2, proto()).unwrap();
        let first = pool.acquire().unwrap();
        pool.activate(first);

        let second = pool.acquire().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_exhausted_pool_returns_none_and_recovers() {
        let mut pool = EntityPool::new(1, proto()).unwrap();
        let id = pool.acquire().unwrap();
        pool.activate(id);

        assert_eq!(pool.acquire(), None);

        pool.deactivate(id);
        assert_eq!(pool.acquire(), Some(id));
    }

    #[test]
    fn test_capacity_never_grows() {
        let mut pool = EntityPool::new(3, proto()).unwrap();
        for _ in 0..3 {
            let id = pool.acquire().unwrap();
            pool.activate(id);
        }
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.capacity(), 3);
    }
}
