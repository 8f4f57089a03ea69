use super::{Asteroid, GameOverCause, Simulation};
use crate::config::HitPolicy;
use crate::math::{circle_fully_outside, circle_overlaps_rect, circles_overlap, Vec2};

impl Simulation {
    /// Resolves player hits, bullet hits and off-screen culling for every live asteroid.
    /// An asteroid that reaches the player is destroyed with it and scores nothing.
    ///
    /// Removing an asteroid pulls the last one into the current slot, so the index only
    /// advances when the asteroid survives.
    pub(super) fn handle_collisions(&mut self) {
        let player_rect = self.player_rect();
        let bounds = self.config.bounds();

        let mut index = 0;
        while index < self.asteroids.len() {
            let Some(asteroid) = self.asteroids.get(index).copied() else {
                break;
            };

            if circle_overlaps_rect(asteroid.position, asteroid.radius, &player_rect) {
                self.end_game(GameOverCause::AsteroidCollision);
                self.asteroids.remove_at(index);
                continue;
            }

            let hits = self.consume_bullets(&asteroid);
            if hits > 0 {
                self.score_kill(&asteroid, hits);
                self.asteroids.remove_at(index);
                continue;
            }

            if circle_fully_outside(asteroid.position, asteroid.radius, &bounds) {
                if asteroid.on_screen {
                    self.asteroids.remove_at(index);
                    continue;
                }
            } else if let Some(live) = self.asteroids.get_mut(index) {
                live.on_screen = true;
            }
            index += 1;
        }
    }

    /// Removes the bullets that hit `asteroid` and returns how many scored.
    fn consume_bullets(&mut self, asteroid: &Asteroid) -> u32 {
        let radius = self.config.bullet_radius;
        let hit = |position: Vec2| {
            circles_overlap(asteroid.position, asteroid.radius, position, radius)
        };

        match self.config.hit_policy {
            HitPolicy::SingleKill => {
                let first = self
                    .bullets
                    .iter()
                    .position(|bullet| hit(bullet.position));
                match first {
                    Some(bullet) => {
                        self.bullets.remove_at(bullet);
                        1
                    }
                    None => 0,
                }
            }
            HitPolicy::ScorePerBullet => {
                self.bullets.retain_mut(|bullet| !hit(bullet.position)) as u32
            }
        }
    }

    /// Applies the rewards for `hits` bullets landing on `asteroid`. The carried powerup is
    /// granted once, after the kill timer update, so the killing shot is judged by the state
    /// the player was in when it landed.
    fn score_kill(&mut self, asteroid: &Asteroid, hits: u32) {
        for _ in 0..hits {
            self.points = self.points.saturating_add(asteroid.points);
            let tighten = !self.slow_time_active();
            self.pressure.register_kill(tighten);
            self.stats.kills += 1;
        }
        if let Some(powerup) = asteroid.powerup {
            self.grant_powerup(powerup);
        }
        self.spawn_burst(asteroid.position);
    }
}
