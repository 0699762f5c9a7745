//! Error taxonomy
//!
//! Transient conditions (pool exhaustion, closed gate) are not errors and are
//! expressed as `Ok(None)` at the call sites that can hit them. The types
//! here cover the two real failure classes: configuration mistakes caught at
//! setup time, and contract violations during a spawn attempt.

use std::fmt;

use crate::events::EventKind;

/// A configuration value that fails validation.
///
/// These surface at setup time, before any simulation step runs. Silently
/// clamping would mask authoring mistakes in spacing/sizing tuning, so
/// construction fails instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A range has a minimum component above its maximum.
    MinAboveMax {
        field: &'static str,
        axis: char,
        minimum: f32,
        maximum: f32,
    },
    /// The horizontal gap minimum is negative.
    NegativeGap { minimum: f32 },
    /// A pool capacity of zero can never hand out an entity.
    ZeroCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MinAboveMax {
                field,
                axis,
                minimum,
                maximum,
            } => write!(
                f,
                "{field}: minimum {minimum} exceeds maximum {maximum} on axis {axis}"
            ),
            ConfigError::NegativeGap { minimum } => {
                write!(f, "gap range: minimum horizontal gap {minimum} is negative")
            }
            ConfigError::ZeroCapacity => write!(f, "entity pool capacity must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A contract violation during a spawn attempt.
///
/// Distinct from the routine "no result" outcomes: a spawn that hits one of
/// these was handed an entity that breaks the shape contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// The bounds collaborator could not measure the entity's footprint.
    MissingBounds,
    /// A handle that does not belong to the pool was dereferenced.
    StaleHandle,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::MissingBounds => {
                write!(f, "entity has no measurable footprint bounds")
            }
            SpawnError::StaleHandle => write!(f, "entity handle not owned by this pool"),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Event bus misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// A handler published the occurrence it is currently handling.
    ReentrantPublish(EventKind),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::ReentrantPublish(kind) => {
                write!(f, "re-entrant publish of {kind:?} during its own dispatch")
            }
        }
    }
}

impl std::error::Error for EventError {}

/// Top-level error for the simulation driver, wrapping the three classes.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    Config(ConfigError),
    Spawn(SpawnError),
    Event(EventError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Config(e) => write!(f, "configuration: {e}"),
            CoreError::Spawn(e) => write!(f, "spawn: {e}"),
            CoreError::Event(e) => write!(f, "event: {e}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Config(e) => Some(e),
            CoreError::Spawn(e) => Some(e),
            CoreError::Event(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<SpawnError> for CoreError {
    fn from(e: SpawnError) -> Self {
        CoreError::Spawn(e)
    }
}

impl From<EventError> for CoreError {
    fn from(e: EventError) -> Self {
        CoreError::Event(e)
    }
}
