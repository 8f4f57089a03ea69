use serde::{Deserialize, Serialize};

use crate::config::{ControlScheme, MotionIntegration, SimConfig};
use crate::constants::{
    ASTEROID_CAPACITY, BULLET_CAPACITY, PARTICLES_PER_GROUP, PARTICLE_GROUP_CAPACITY,
    REFERENCE_FPS,
};
use crate::error::{ConfigError, PoolKind, RuleCode, SimError};
use crate::math::{center_of, Rect, Vec2};
use crate::pool::Pool;
use crate::rng::SeededRng;

mod collision;
mod difficulty;
mod motion;
mod particles;
mod spawn;


pub use difficulty::KillPressure;
pub use motion::{motion_model, HeadingRelative, MotionModel, PointerAimed};
pub use spawn::SpawnScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Powerup {
    SlowTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    AsteroidCollision,
    KillTimerExpired,
}

/// Result of driving one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    Running,
    GameOver,
    Closed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the player's square.
    pub position: Vec2,
    /// Movement intent accumulated this frame; reset before input is applied.
    pub velocity: Vec2,
    pub heading: f32,
    pub powerup: Option<Powerup>,
    pub powerup_remaining: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub position: Vec2,
    pub direction: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub position: Vec2,
    pub direction: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub points: u32,
    /// Latched the first frame any part of the asteroid is inside the play area.
    pub on_screen: bool,
    pub powerup: Option<Powerup>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleGroup {
    pub origin: Vec2,
    /// Simulation clock (seconds) at which the burst was created.
    pub born_at: f32,
    pub particles: [Particle; PARTICLES_PER_GROUP],
}

impl Default for ParticleGroup {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            born_at: 0.0,
            particles: [Particle::default(); PARTICLES_PER_GROUP],
        }
    }
}

/// Raw input sampled by the host once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pressed this frame (edge, not hold).
    pub fire: bool,
    /// Pressed this frame (edge, not hold).
    pub blink: bool,
    /// Pointer position; only read by the pointer-aimed scheme.
    pub pointer: Vec2,
}

/// Everything the host hands the simulation for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    /// Seconds since the previous frame. Negative values are treated as zero.
    pub dt: f32,
    pub close_requested: bool,
    pub input: FrameInput,
}

impl FrameContext {
    pub fn new(dt: f32, input: FrameInput) -> Self {
        Self {
            dt,
            close_requested: false,
            input,
        }
    }

    pub fn idle(dt: f32) -> Self {
        Self::new(dt, FrameInput::default())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    pub kills: u32,
    pub shots_fired: u32,
    pub shots_dropped: u32,
    pub blinks: u32,
    pub powerups_collected: u32,
    pub asteroids_spawned: u32,
    pub asteroids_dropped: u32,
    pub bursts_dropped: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub size: f32,
    pub heading: f32,
    pub powerup: Option<Powerup>,
    pub powerup_remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AsteroidSnapshot {
    pub position: Vec2,
    pub radius: f32,
    pub carries_powerup: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BulletSnapshot {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub size: f32,
}

/// Read-only view handed to the renderer (and to autopilot bots) after each frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub state: GameState,
    pub game_over_cause: Option<GameOverCause>,
    pub points: u32,
    pub speed_multiplier: f32,
    /// 1.0 right after a blink, 0.0 when blink is ready.
    pub blink_fraction: f32,
    /// 1.0 right after a kill, 0.0 when the kill timer runs out.
    pub kill_fraction: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub control_scheme: ControlScheme,
    pub player: PlayerSnapshot,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Checkpoint {
    pub frame_count: u32,
    pub rng_state: u32,
    pub points: u32,
    pub asteroids: usize,
    pub bullets: usize,
    pub particle_groups: usize,
    pub kill_timer: f32,
    pub kill_cooldown: f32,
    pub speed_multiplier: f32,
    pub game_over: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReplayResult {
    pub frame_count: u32,
    pub final_points: u32,
    pub final_rng_state: u32,
    pub state: GameState,
    pub game_over_cause: Option<GameOverCause>,
    pub stats: SimStats,
}

/// One game session. Owns every pool and scalar; the host drives it with `frame`.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    seed: u32,
    rng: SeededRng,
    frame_count: u32,
    clock: f32,
    state: GameState,
    game_over_cause: Option<GameOverCause>,
    player: Player,
    bullets: Pool<Bullet, BULLET_CAPACITY>,
    asteroids: Pool<Asteroid, ASTEROID_CAPACITY>,
    particles: Pool<ParticleGroup, PARTICLE_GROUP_CAPACITY>,
    points: u32,
    spawner: SpawnScheduler,
    pressure: KillPressure,
    speed_multiplier: f32,
    blink_timer: f32,
    stats: SimStats,
}

impl Simulation {
    pub fn new(seed: u32, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sim = Self::fresh(seed, config);
        tracing::debug!(seed, scheme = ?sim.config.control_scheme, "new game");
        Ok(sim)
    }

    /// Starts a new game with the same seed and configuration.
    pub fn restart(&mut self) {
        *self = Self::fresh(self.seed, self.config.clone());
        tracing::debug!(seed = self.seed, "game restarted");
    }

    fn fresh(seed: u32, config: SimConfig) -> Self {
        let player = Self::fresh_player(&config);
        let pressure = KillPressure::new(config.kill_cooldown_start, config.kill_cooldown_decay);
        Self {
            config,
            seed,
            rng: SeededRng::new(seed),
            frame_count: 0,
            clock: 0.0,
            state: GameState::Running,
            game_over_cause: None,
            player,
            bullets: Pool::new(PoolKind::Bullets),
            asteroids: Pool::new(PoolKind::Asteroids),
            particles: Pool::new(PoolKind::ParticleGroups),
            points: 0,
            spawner: SpawnScheduler::default(),
            pressure,
            speed_multiplier: 1.0,
            blink_timer: 0.0,
            stats: SimStats::default(),
        }
    }

    fn fresh_player(config: &SimConfig) -> Player {
        Player {
            position: Vec2::new(config.player_start_x, config.player_start_y),
            velocity: Vec2::ZERO,
            heading: config.player_start_heading,
            powerup: None,
            powerup_remaining: 0.0,
        }
    }

    /// Advances one frame. Close requests and game over are only honoured at frame
    /// boundaries: a frame either runs to completion or not at all.
    pub fn frame(&mut self, ctx: &FrameContext) -> FrameStatus {
        if ctx.close_requested {
            return FrameStatus::Closed;
        }
        if self.state == GameState::GameOver {
            return FrameStatus::GameOver;
        }

        let dt = if ctx.dt.is_finite() { ctx.dt.max(0.0) } else { 0.0 };
        let motion_scale = self.motion_scale(dt);
        self.frame_count += 1;
        self.clock += dt;
        self.blink_timer = (self.blink_timer - dt).max(0.0);

        self.update_player(&ctx.input, motion_scale);
        self.update_spawner(dt);
        self.update_bullets(motion_scale);
        self.update_asteroids(motion_scale);
        self.update_particles(dt, motion_scale);
        self.handle_collisions();
        self.update_timers(dt);

        match self.state {
            GameState::Running => FrameStatus::Running,
            GameState::GameOver => FrameStatus::GameOver,
        }
    }

    /// Multiplier applied to every per-frame positional delta.
    fn motion_scale(&self, dt: f32) -> f32 {
        match self.config.motion {
            MotionIntegration::PerFrame => 1.0,
            MotionIntegration::ElapsedTime => dt * REFERENCE_FPS,
        }
    }

    fn update_bullets(&mut self, motion_scale: f32) {
        let step = self.config.bullet_speed * motion_scale;
        let radius = self.config.bullet_radius;
        let bounds = self.config.bounds();
        self.bullets.retain_mut(|bullet| {
            bullet.position += bullet.direction * step;
            !crate::math::circle_fully_outside(bullet.position, radius, &bounds)
        });
    }

    fn update_asteroids(&mut self, motion_scale: f32) {
        let scale = self.speed_multiplier * motion_scale;
        for asteroid in self.asteroids.iter_mut() {
            asteroid.position += asteroid.direction * (asteroid.speed * scale);
        }
    }

    pub(crate) fn end_game(&mut self, cause: GameOverCause) {
        if self.state == GameState::GameOver {
            return;
        }
        self.state = GameState::GameOver;
        self.game_over_cause = Some(cause);
        tracing::debug!(
            frame = self.frame_count,
            points = self.points,
            ?cause,
            "game over"
        );
    }

    /// Inserts an asteroid directly, bypassing the spawn scheduler.
    pub fn insert_asteroid(&mut self, asteroid: Asteroid) -> Result<usize, SimError> {
        self.asteroids.create(asteroid)
    }

    pub fn insert_bullet(&mut self, bullet: Bullet) -> Result<usize, SimError> {
        self.bullets.create(bullet)
    }

    /// Spawns an asteroid with the base radius at `position`, aimed at `target`.
    pub fn spawn_asteroid_at(
        &mut self,
        position: Vec2,
        target: Vec2,
        powerup: Option<Powerup>,
    ) -> Result<usize, SimError> {
        let asteroid = Asteroid::aimed(
            &self.config,
            position,
            target,
            self.config.asteroid_base_radius,
            powerup,
        );
        self.asteroids.create(asteroid)
    }

    pub fn player_rect(&self) -> Rect {
        Rect::from_top_left(
            self.player.position,
            self.config.player_size,
            self.config.player_size,
        )
    }

    pub fn player_center(&self) -> Vec2 {
        center_of(
            self.player.position,
            self.config.player_size,
            self.config.player_size,
        )
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.game_over_cause
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Test and tooling hook for placing the player.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn bullets(&self) -> &[Bullet] {
        self.bullets.as_slice()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        self.asteroids.as_slice()
    }

    pub fn particle_groups(&self) -> &[ParticleGroup] {
        self.particles.as_slice()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn kill_timer(&self) -> f32 {
        self.pressure.timer()
    }

    pub fn kill_cooldown(&self) -> f32 {
        self.pressure.cooldown()
    }

    pub fn blink_timer(&self) -> f32 {
        self.blink_timer
    }

    pub fn blink_fraction(&self) -> f32 {
        (self.blink_timer / self.config.blink_cooldown).clamp(0.0, 1.0)
    }

    pub fn kill_fraction(&self) -> f32 {
        self.pressure.fraction_remaining()
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            frame_count: self.frame_count,
            rng_state: self.rng.state(),
            points: self.points,
            asteroids: self.asteroids.len(),
            bullets: self.bullets.len(),
            particle_groups: self.particles.len(),
            kill_timer: self.pressure.timer(),
            kill_cooldown: self.pressure.cooldown(),
            speed_multiplier: self.speed_multiplier,
            game_over: self.state == GameState::GameOver,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame_count: self.frame_count,
            state: self.state,
            game_over_cause: self.game_over_cause,
            points: self.points,
            speed_multiplier: self.speed_multiplier,
            blink_fraction: self.blink_fraction(),
            kill_fraction: self.kill_fraction(),
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            control_scheme: self.config.control_scheme,
            player: PlayerSnapshot {
                position: self.player.position,
                size: self.config.player_size,
                heading: self.player.heading,
                powerup: self.player.powerup,
                powerup_remaining: self.player.powerup_remaining,
            },
            asteroids: self
                .asteroids
                .iter()
                .map(|asteroid| AsteroidSnapshot {
                    position: asteroid.position,
                    radius: asteroid.radius,
                    carries_powerup: asteroid.powerup.is_some(),
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|bullet| BulletSnapshot {
                    position: bullet.position,
                    radius: self.config.bullet_radius,
                })
                .collect(),
            particles: self
                .particles
                .iter()
                .flat_map(|group| group.particles.iter())
                .map(|particle| ParticleSnapshot {
                    position: particle.position,
                    size: particle.size,
                })
                .collect(),
        }
    }

    pub fn result(&self) -> ReplayResult {
        ReplayResult {
            frame_count: self.frame_count,
            final_points: self.points,
            final_rng_state: self.rng.state(),
            state: self.state,
            game_over_cause: self.game_over_cause,
            stats: self.stats,
        }
    }

    pub fn validate(&self) -> Result<(), RuleCode> {
        if self.bullets.len() > self.bullets.capacity() {
            return Err(RuleCode::BulletPoolBounds);
        }
        if self.asteroids.len() > self.asteroids.capacity() {
            return Err(RuleCode::AsteroidPoolBounds);
        }
        if self.particles.len() > self.particles.capacity() {
            return Err(RuleCode::ParticlePoolBounds);
        }

        let expected_multiplier = match self.player.powerup {
            None => 1.0,
            Some(Powerup::SlowTime) => self.config.slow_time_multiplier,
        };
        if self.speed_multiplier != expected_multiplier {
            return Err(RuleCode::SpeedMultiplierConsistency);
        }

        let powerup_ok = match self.player.powerup {
            None => self.player.powerup_remaining == 0.0,
            Some(_) => {
                self.player.powerup_remaining > 0.0
                    && self.player.powerup_remaining <= self.config.slow_time_duration
            }
        };
        if !powerup_ok {
            return Err(RuleCode::PowerupTimerRange);
        }

        if !(self.pressure.cooldown() > 0.0) {
            return Err(RuleCode::KillCooldownPositive);
        }
        if self.state == GameState::Running
            && !(self.pressure.timer() > 0.0
                && self.pressure.timer() <= self.config.kill_cooldown_start)
        {
            return Err(RuleCode::KillTimerRange);
        }

        if !(0.0..=self.config.blink_cooldown).contains(&self.blink_timer) {
            return Err(RuleCode::BlinkTimerRange);
        }

        let sizes_ok = self
            .particles
            .iter()
            .flat_map(|group| group.particles.iter())
            .all(|particle| particle.size >= 0.0 && particle.size.is_finite());
        if !sizes_ok {
            return Err(RuleCode::ParticleSizeRange);
        }

        let asteroids_ok = self.asteroids.iter().all(|asteroid| {
            asteroid.radius > 0.0 && asteroid.speed.is_finite() && asteroid.points > 0
        });
        if !asteroids_ok {
            return Err(RuleCode::AsteroidState);
        }

        Ok(())
    }
}

/// Runs `frames` from a fresh game and reports the final state. Stops early on game over
/// or a close request.
pub fn replay(
    seed: u32,
    config: &SimConfig,
    frames: &[FrameContext],
) -> Result<ReplayResult, ConfigError> {
    let mut sim = Simulation::new(seed, config.clone())?;
    for ctx in frames {
        if sim.frame(ctx) != FrameStatus::Running {
            break;
        }
    }
    Ok(sim.result())
}

/// Like `replay`, sampling a checkpoint every `interval` frames plus the first and last.
pub fn replay_with_checkpoints(
    seed: u32,
    config: &SimConfig,
    frames: &[FrameContext],
    interval: u32,
) -> Result<Vec<Checkpoint>, ConfigError> {
    let mut sim = Simulation::new(seed, config.clone())?;
    let interval = interval.max(1);
    let mut checkpoints = vec![sim.checkpoint()];
    for ctx in frames {
        let status = sim.frame(ctx);
        if status == FrameStatus::Closed {
            break;
        }
        if sim.frame_count() % interval == 0 || status == FrameStatus::GameOver {
            checkpoints.push(sim.checkpoint());
        }
        if status == FrameStatus::GameOver {
            break;
        }
    }
    if checkpoints
        .last()
        .map(|last| last.frame_count != sim.frame_count())
        .unwrap_or(true)
    {
        checkpoints.push(sim.checkpoint());
    }
    Ok(checkpoints)
}
