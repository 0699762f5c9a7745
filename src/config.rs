//! Spawn configuration and game tuning
//!
//! Everything here is validated at setup time: a minimum above its maximum is
//! an authoring mistake and construction fails instead of silently clamping.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn check_axes(field: &'static str, minimum: Vec3, maximum: Vec3) -> Result<(), ConfigError> {
    for (axis, min, max) in [
        ('x', minimum.x, maximum.x),
        ('y', minimum.y, maximum.y),
        ('z', minimum.z, maximum.z),
    ] {
        if min > max {
            return Err(ConfigError::MinAboveMax {
                field,
                axis,
                minimum: min,
                maximum: max,
            });
        }
    }
    Ok(())
}

/// Per-axis size/rotation ranges and the vertical clamp for placed entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    /// Minimum scale of a spawned entity, per axis
    pub minimum_size: Vec3,
    /// Maximum scale of a spawned entity, per axis
    pub maximum_size: Vec3,
    /// Minimum rotation (Euler degrees), per axis
    pub minimum_rotation: Vec3,
    /// Maximum rotation (Euler degrees), per axis
    pub maximum_rotation: Vec3,
    /// Lowest y position an entity may be placed at
    pub minimum_y_clamp: f32,
    /// Highest y position an entity may be placed at
    pub maximum_y_clamp: f32,
}

impl SpawnRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_axes("spawn size", self.minimum_size, self.maximum_size)?;
        check_axes("spawn rotation", self.minimum_rotation, self.maximum_rotation)?;
        if self.minimum_y_clamp > self.maximum_y_clamp {
            return Err(ConfigError::MinAboveMax {
                field: "y clamp",
                axis: 'y',
                minimum: self.minimum_y_clamp,
                maximum: self.maximum_y_clamp,
            });
        }
        Ok(())
    }
}

impl Default for SpawnRange {
    fn default() -> Self {
        Self {
            minimum_size: Vec3::ONE,
            maximum_size: Vec3::ONE,
            minimum_rotation: Vec3::ZERO,
            maximum_rotation: Vec3::ZERO,
            minimum_y_clamp: -10.0,
            maximum_y_clamp: 10.0,
        }
    }
}

/// Gap between two consecutively spawned entities.
///
/// Only x and y matter to the scheduler: x is the horizontal spacing, y the
/// vertical offset jitter. The y jitter may be negative; the horizontal
/// minimum may not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapRange {
    pub minimum_gap: Vec3,
    pub maximum_gap: Vec3,
}

impl GapRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_axes("gap", self.minimum_gap, self.maximum_gap)?;
        if self.minimum_gap.x < 0.0 {
            return Err(ConfigError::NegativeGap {
                minimum: self.minimum_gap.x,
            });
        }
        Ok(())
    }
}

impl Default for GapRange {
    fn default() -> Self {
        Self {
            minimum_gap: Vec3::new(2.0, 0.0, 0.0),
            maximum_gap: Vec3::new(6.0, 0.0, 0.0),
        }
    }
}

/// Complete tuning bundle for one world.
///
/// Loadable from JSON so spacing/sizing can be tweaked without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub spawn_range: SpawnRange,
    pub gap_range: GapRange,
    /// Number of entities pre-created in the pool
    pub pool_capacity: usize,
    /// Unscaled visual size of a pooled entity
    pub entity_extents: Vec2,
    /// Score gained per second while auto-increment is on
    pub points_per_second: f32,
    /// Lives the player starts a session with
    pub total_lives: i32,
    /// Horizontal world scroll speed, units per second
    pub world_speed: f32,
    /// If true, spawners only operate while the game is in progress
    pub only_spawn_while_in_progress: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_range: SpawnRange::default(),
            gap_range: GapRange::default(),
            pool_capacity: 16,
            entity_extents: Vec2::new(2.0, 2.0),
            points_per_second: 20.0,
            total_lives: 3,
            world_speed: 5.0,
            only_spawn_while_in_progress: true,
        }
    }
}

impl Tuning {
    /// Validate every contained range plus the pool capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_range.validate()?;
        self.gap_range.validate()?;
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
