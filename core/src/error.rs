use core::fmt;

/// Which pool rejected an insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Bullets,
    Asteroids,
    ParticleGroups,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullets => write!(f, "bullets"),
            Self::Asteroids => write!(f, "asteroids"),
            Self::ParticleGroups => write!(f, "particle groups"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimError {
    CapacityExceeded { pool: PoolKind, capacity: usize },
    DegenerateVector,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { pool, capacity } => {
                write!(f, "{pool} pool is full (capacity {capacity})")
            }
            Self::DegenerateVector => write!(f, "cannot normalize a zero-length vector"),
        }
    }
}

impl std::error::Error for SimError {}

/// Invariant checked by `Simulation::validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    BulletPoolBounds,
    AsteroidPoolBounds,
    ParticlePoolBounds,
    SpeedMultiplierConsistency,
    PowerupTimerRange,
    KillTimerRange,
    KillCooldownPositive,
    BlinkTimerRange,
    ParticleSizeRange,
    AsteroidState,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BulletPoolBounds => write!(f, "BULLET_POOL_BOUNDS"),
            Self::AsteroidPoolBounds => write!(f, "ASTEROID_POOL_BOUNDS"),
            Self::ParticlePoolBounds => write!(f, "PARTICLE_POOL_BOUNDS"),
            Self::SpeedMultiplierConsistency => write!(f, "SPEED_MULTIPLIER_CONSISTENCY"),
            Self::PowerupTimerRange => write!(f, "POWERUP_TIMER_RANGE"),
            Self::KillTimerRange => write!(f, "KILL_TIMER_RANGE"),
            Self::KillCooldownPositive => write!(f, "KILL_COOLDOWN_POSITIVE"),
            Self::BlinkTimerRange => write!(f, "BLINK_TIMER_RANGE"),
            Self::ParticleSizeRange => write!(f, "PARTICLE_SIZE_RANGE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be > 0, got {value}")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be in [{min}, {max}], got {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}
