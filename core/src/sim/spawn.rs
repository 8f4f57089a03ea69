use super::{Asteroid, Powerup, Simulation};
use crate::config::SimConfig;
use crate::math::Vec2;

/// Elapsed-time accumulator that releases one asteroid per interval. The interval is
/// stretched by the global speed multiplier, so slow-time also slows spawning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnScheduler {
    elapsed: f32,
}

impl SpawnScheduler {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns true when an asteroid is due. The accumulator resets to zero rather than
    /// carrying the overshoot.
    pub fn tick(&mut self, dt: f32, interval: f32, speed_multiplier: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > interval / speed_multiplier {
            self.elapsed = 0.0;
            return true;
        }
        false
    }
}

impl Asteroid {
    /// Builds an asteroid of `radius` heading from `position` toward `target`. Speed and
    /// point value scale inversely with size relative to the base radius.
    pub fn aimed(
        config: &SimConfig,
        position: Vec2,
        target: Vec2,
        radius: f32,
        powerup: Option<Powerup>,
    ) -> Self {
        let size_ratio = config.asteroid_base_radius / radius;
        let points = (config.asteroid_base_points as f32 * size_ratio).round().max(1.0) as u32;
        Self {
            position,
            // An asteroid spawned exactly on its target has nowhere to go.
            direction: Vec2::direction_between(position, target).unwrap_or(Vec2::ZERO),
            radius,
            speed: config.asteroid_base_speed * size_ratio,
            points,
            on_screen: false,
            powerup,
        }
    }
}

impl Simulation {
    pub(super) fn update_spawner(&mut self, dt: f32) {
        let due = self.spawner.tick(
            dt,
            self.config.asteroid_spawn_interval,
            self.speed_multiplier,
        );
        if due {
            self.spawn_random_asteroid();
        }
    }

    /// Places an asteroid on the ring circumscribing the play area and aims it at the
    /// player's current top-left corner.
    pub(super) fn spawn_random_asteroid(&mut self) {
        let angle = self.rng.next_degree_angle();
        let center = Vec2::new(self.config.world_width / 2.0, self.config.world_height / 2.0);
        let position = center
            + Vec2::new(
                angle.cos() * self.config.world_width,
                angle.sin() * self.config.world_height,
            );

        let spread = self.config.asteroid_size_spread;
        let radius = self.config.asteroid_base_radius
            * self.rng.next_range_f32(1.0 - spread, 1.0 + spread);
        let powerup = self
            .rng
            .chance(self.config.asteroid_powerup_chance)
            .then_some(Powerup::SlowTime);

        let asteroid = Asteroid::aimed(
            &self.config,
            position,
            self.player.position,
            radius,
            powerup,
        );
        match self.asteroids.create(asteroid) {
            Ok(_) => self.stats.asteroids_spawned += 1,
            Err(err) => {
                self.stats.asteroids_dropped += 1;
                tracing::trace!(%err, "asteroid dropped");
            }
        }
    }
}
