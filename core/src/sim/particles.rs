use super::{Particle, ParticleGroup, Simulation};
use crate::config::SimConfig;
use crate::constants::REFERENCE_FPS;
use crate::math::Vec2;
use crate::rng::SeededRng;

impl ParticleGroup {
    /// A full burst: every particle starts at `origin` with the same speed and size and its
    /// own random direction.
    pub fn burst(origin: Vec2, born_at: f32, config: &SimConfig, rng: &mut SeededRng) -> Self {
        let mut group = Self {
            origin,
            born_at,
            ..Self::default()
        };
        for particle in group.particles.iter_mut() {
            *particle = Particle {
                position: origin,
                direction: Vec2::from_angle(rng.next_angle()),
                speed: config.particle_start_speed,
                size: config.particle_start_size,
            };
        }
        group
    }

    /// Advances every particle by `dt` seconds under the global speed multiplier.
    ///
    /// Speed decays toward `particle_min_speed` and size shrinks on elapsed time, so a burst
    /// lasts as long at any frame rate; only the positional step follows `motion_scale`.
    /// Slow-time weakens the decay so a burst drifts for longer instead of stopping in place.
    pub fn advance(
        &mut self,
        config: &SimConfig,
        speed_multiplier: f32,
        dt: f32,
        motion_scale: f32,
    ) {
        let decay = config.particle_speed_decay;
        let per_frame = decay + (1.0 - decay) * (1.0 - speed_multiplier);
        let factor = per_frame.powf(dt * REFERENCE_FPS);
        let shrink = config.particle_shrink * speed_multiplier * dt;
        for particle in self.particles.iter_mut() {
            particle.speed = (particle.speed * factor).max(config.particle_min_speed);
            particle.size = (particle.size - shrink).max(0.0);
            particle.position +=
                particle.direction * (particle.speed * speed_multiplier * motion_scale);
        }
    }

    pub fn is_spent(&self, config: &SimConfig) -> bool {
        self.particles
            .iter()
            .all(|particle| particle.size <= config.particle_min_size)
    }
}

impl Simulation {
    pub(super) fn spawn_burst(&mut self, origin: Vec2) {
        let group = ParticleGroup::burst(origin, self.clock, &self.config, &mut self.rng);
        if let Err(err) = self.particles.create(group) {
            self.stats.bursts_dropped += 1;
            tracing::trace!(%err, "particle burst dropped");
        }
    }

    pub(super) fn update_particles(&mut self, dt: f32, motion_scale: f32) {
        let config = &self.config;
        let multiplier = self.speed_multiplier;
        self.particles.retain_mut(|group| {
            group.advance(config, multiplier, dt, motion_scale);
            !group.is_spent(config)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FRAME_DT, PARTICLES_PER_GROUP};

    fn burst(config: &SimConfig) -> ParticleGroup {
        let mut rng = SeededRng::new(99);
        ParticleGroup::burst(Vec2::new(100.0, 200.0), 1.5, config, &mut rng)
    }

    #[test]
    fn burst_starts_full_and_uniform() {
        let config = SimConfig::default();
        let group = burst(&config);
        assert_eq!(group.particles.len(), PARTICLES_PER_GROUP);
        assert_eq!(group.born_at, 1.5);
        for particle in &group.particles {
            assert_eq!(particle.position, Vec2::new(100.0, 200.0));
            assert_eq!(particle.speed, config.particle_start_speed);
            assert_eq!(particle.size, config.particle_start_size);
            assert!((particle.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sizes_never_increase_and_group_is_eventually_spent() {
        let config = SimConfig::default();
        let mut group = burst(&config);
        let mut previous = group.particles[0].size;
        let mut frames = 0;
        while !group.is_spent(&config) {
            group.advance(&config, 1.0, FRAME_DT, 1.0);
            let size = group.particles[0].size;
            assert!(size <= previous);
            previous = size;
            frames += 1;
            assert!(frames < 1_000, "burst never decayed");
        }
        // (4.0 - 0.5) / (6.0 / 60) frames, give or take float rounding
        assert!((34..=36).contains(&frames), "took {frames} frames");
    }

    #[test]
    fn speed_decays_to_floor() {
        let config = SimConfig::default();
        let mut group = burst(&config);
        group.advance(&config, 1.0, FRAME_DT, 1.0);
        assert!((group.particles[0].speed - 3.6).abs() < 1e-5);
        for _ in 0..100 {
            group.advance(&config, 1.0, FRAME_DT, 1.0);
        }
        assert_eq!(group.particles[0].speed, config.particle_min_speed);
    }

    #[test]
    fn slow_time_weakens_decay_and_shrink() {
        let config = SimConfig::default();
        let mut normal = burst(&config);
        let mut slowed = burst(&config);
        normal.advance(&config, 1.0, FRAME_DT, 1.0);
        slowed.advance(&config, 0.3, FRAME_DT, 1.0);
        assert!(slowed.particles[0].speed > normal.particles[0].speed);
        assert!(slowed.particles[0].size > normal.particles[0].size);
        // factor = 0.9 + 0.1 * 0.7
        assert!((slowed.particles[0].speed - 4.0 * 0.97).abs() < 1e-5);
    }

    fn lifetime_at(config: &SimConfig, dt: f32) -> f32 {
        let mut group = burst(config);
        let mut elapsed = 0.0;
        while !group.is_spent(config) {
            group.advance(config, 1.0, dt, 1.0);
            elapsed += dt;
            assert!(elapsed < 60.0, "burst never decayed at dt {dt}");
        }
        elapsed
    }

    #[test]
    fn burst_lifetime_follows_elapsed_time() {
        let config = SimConfig::default();
        let slow = lifetime_at(&config, 1.0 / 30.0);
        let fast = lifetime_at(&config, 1.0 / 120.0);
        // Both end within one coarse frame of (4.0 - 0.5) / 6.0 seconds.
        assert!((slow - fast).abs() <= 1.0 / 30.0 + 1e-4, "{slow} vs {fast}");
        assert!((slow - 3.5 / 6.0).abs() <= 1.0 / 30.0 + 1e-4, "{slow}");
    }

    #[test]
    fn speed_decay_matches_across_frame_rates() {
        let config = SimConfig::default();
        let mut coarse = burst(&config);
        let mut fine = burst(&config);
        for _ in 0..6 {
            coarse.advance(&config, 1.0, 1.0 / 30.0, 2.0);
        }
        for _ in 0..24 {
            fine.advance(&config, 1.0, 1.0 / 120.0, 0.5);
        }
        // 0.2 s is twelve reference frames of decay.
        let expected = 4.0 * 0.9f32.powi(12);
        assert!((coarse.particles[0].speed - expected).abs() < 1e-3);
        assert!((fine.particles[0].speed - expected).abs() < 1e-3);
        assert!((coarse.particles[0].size - fine.particles[0].size).abs() < 1e-3);
    }
}
