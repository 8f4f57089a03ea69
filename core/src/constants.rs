// Default tuning for Asteroid Rush. Distances are in pixels, per-frame speeds in pixels per
// frame, timers in seconds. Every value here can be overridden through `SimConfig`.

// Play area
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 800.0;

// Player
pub const PLAYER_START_X: f32 = 300.0;
pub const PLAYER_START_Y: f32 = 300.0;
pub const PLAYER_SIZE: f32 = 20.0;
pub const PLAYER_MOVE_SPEED: f32 = 5.0;
pub const PLAYER_TURN_SPEED: f32 = 0.07; // radians per frame
pub const PLAYER_START_HEADING: f32 = 0.0;

// Blink
pub const BLINK_DISTANCE: f32 = 200.0;
pub const BLINK_COOLDOWN: f32 = 5.0;

// Bullets
pub const BULLET_CAPACITY: usize = 128;
pub const BULLET_RADIUS: f32 = 5.0;
pub const BULLET_SPEED: f32 = 10.0;

// Asteroids
pub const ASTEROID_CAPACITY: usize = 128;
pub const ASTEROID_BASE_RADIUS: f32 = 15.0;
pub const ASTEROID_BASE_SPEED: f32 = 5.0;
pub const ASTEROID_BASE_POINTS: u32 = 10;
/// Radius is drawn uniformly from `base * [1 - spread, 1 + spread]`.
pub const ASTEROID_SIZE_SPREAD: f32 = 0.5;
pub const ASTEROID_POWERUP_CHANCE: f32 = 0.1;
pub const ASTEROID_SPAWN_INTERVAL: f32 = 0.5;

// Kill pressure
pub const KILL_COOLDOWN_START: f32 = 5.0;
pub const KILL_COOLDOWN_DECAY: f32 = 0.95;

// Slow-time powerup
pub const SLOW_TIME_MULTIPLIER: f32 = 0.3;
pub const SLOW_TIME_DURATION: f32 = 5.0;

// Particle bursts
pub const PARTICLE_GROUP_CAPACITY: usize = 64;
pub const PARTICLES_PER_GROUP: usize = 32;
pub const PARTICLE_START_SPEED: f32 = 4.0;
pub const PARTICLE_MIN_SPEED: f32 = 0.5;
pub const PARTICLE_SPEED_DECAY: f32 = 0.9;
pub const PARTICLE_START_SIZE: f32 = 4.0;
pub const PARTICLE_SHRINK: f32 = 6.0; // size units per second
pub const PARTICLE_MIN_SIZE: f32 = 0.5;

// Elapsed-time motion normalizes per-frame deltas against this rate.
pub const REFERENCE_FPS: f32 = 60.0;

// Autopilot frame clock
pub const FRAME_DT: f32 = 1.0 / 60.0;
