use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::math::Rect;

/// Movement scheme chosen once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    /// Heading follows the pointer; directional input strafes in screen space.
    #[default]
    PointerAimed,
    /// Left/right rotate, up/down move along the heading.
    HeadingRelative,
}

/// What happens when several bullets overlap the same asteroid in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// The first overlapping bullet kills the asteroid; later bullets fly on.
    #[default]
    SingleKill,
    /// Every overlapping bullet is consumed and scores a full kill.
    ScorePerBullet,
}

/// How per-frame entity motion relates to elapsed time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionIntegration {
    /// Constant deltas per frame; translational speed depends on frame rate.
    #[default]
    PerFrame,
    /// Per-frame deltas scaled by `dt * REFERENCE_FPS`.
    ElapsedTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkDirection {
    #[default]
    Heading,
    /// Along this frame's accumulated movement; heading when standing still.
    Velocity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world_width: f32,
    pub world_height: f32,

    pub player_start_x: f32,
    pub player_start_y: f32,
    pub player_size: f32,
    pub player_move_speed: f32,
    pub player_turn_speed: f32,
    pub player_start_heading: f32,

    pub blink_distance: f32,
    pub blink_cooldown: f32,
    pub blink_direction: BlinkDirection,

    pub bullet_radius: f32,
    pub bullet_speed: f32,

    pub asteroid_base_radius: f32,
    pub asteroid_base_speed: f32,
    pub asteroid_base_points: u32,
    pub asteroid_size_spread: f32,
    pub asteroid_powerup_chance: f32,
    pub asteroid_spawn_interval: f32,

    pub kill_cooldown_start: f32,
    pub kill_cooldown_decay: f32,

    pub slow_time_multiplier: f32,
    pub slow_time_duration: f32,

    pub particle_start_speed: f32,
    pub particle_min_speed: f32,
    pub particle_speed_decay: f32,
    pub particle_start_size: f32,
    pub particle_shrink: f32,
    pub particle_min_size: f32,

    pub control_scheme: ControlScheme,
    pub hit_policy: HitPolicy,
    pub motion: MotionIntegration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            player_start_x: PLAYER_START_X,
            player_start_y: PLAYER_START_Y,
            player_size: PLAYER_SIZE,
            player_move_speed: PLAYER_MOVE_SPEED,
            player_turn_speed: PLAYER_TURN_SPEED,
            player_start_heading: PLAYER_START_HEADING,
            blink_distance: BLINK_DISTANCE,
            blink_cooldown: BLINK_COOLDOWN,
            blink_direction: BlinkDirection::Heading,
            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            asteroid_base_radius: ASTEROID_BASE_RADIUS,
            asteroid_base_speed: ASTEROID_BASE_SPEED,
            asteroid_base_points: ASTEROID_BASE_POINTS,
            asteroid_size_spread: ASTEROID_SIZE_SPREAD,
            asteroid_powerup_chance: ASTEROID_POWERUP_CHANCE,
            asteroid_spawn_interval: ASTEROID_SPAWN_INTERVAL,
            kill_cooldown_start: KILL_COOLDOWN_START,
            kill_cooldown_decay: KILL_COOLDOWN_DECAY,
            slow_time_multiplier: SLOW_TIME_MULTIPLIER,
            slow_time_duration: SLOW_TIME_DURATION,
            particle_start_speed: PARTICLE_START_SPEED,
            particle_min_speed: PARTICLE_MIN_SPEED,
            particle_speed_decay: PARTICLE_SPEED_DECAY,
            particle_start_size: PARTICLE_START_SIZE,
            particle_shrink: PARTICLE_SHRINK,
            particle_min_size: PARTICLE_MIN_SIZE,
            control_scheme: ControlScheme::PointerAimed,
            hit_policy: HitPolicy::SingleKill,
            motion: MotionIntegration::PerFrame,
        }
    }
}

impl SimConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_width, self.world_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("player_size", self.player_size),
            ("blink_cooldown", self.blink_cooldown),
            ("bullet_radius", self.bullet_radius),
            ("bullet_speed", self.bullet_speed),
            ("asteroid_base_radius", self.asteroid_base_radius),
            ("asteroid_base_speed", self.asteroid_base_speed),
            ("asteroid_spawn_interval", self.asteroid_spawn_interval),
            ("kill_cooldown_start", self.kill_cooldown_start),
            ("slow_time_duration", self.slow_time_duration),
            ("particle_start_size", self.particle_start_size),
            ("particle_shrink", self.particle_shrink),
        ];
        for (field, value) in positive {
            // Written as a negated comparison so NaN is rejected too.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.asteroid_base_points == 0 {
            return Err(ConfigError::NonPositive {
                field: "asteroid_base_points",
                value: 0.0,
            });
        }

        let unit_ranges = [
            ("asteroid_size_spread", self.asteroid_size_spread, 0.0, 0.9),
            ("asteroid_powerup_chance", self.asteroid_powerup_chance, 0.0, 1.0),
            ("kill_cooldown_decay", self.kill_cooldown_decay, 0.01, 1.0),
            ("slow_time_multiplier", self.slow_time_multiplier, 0.01, 1.0),
            ("particle_speed_decay", self.particle_speed_decay, 0.0, 1.0),
        ];
        for (field, value, min, max) in unit_ranges {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        let non_negative = [
            ("player_move_speed", self.player_move_speed),
            ("player_turn_speed", self.player_turn_speed),
            ("blink_distance", self.blink_distance),
            ("particle_start_speed", self.particle_start_speed),
            ("particle_min_speed", self.particle_min_speed),
            ("particle_min_size", self.particle_min_size),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: f32::MAX,
                });
            }
        }

        Ok(())
    }
}
