use super::{GameOverCause, Powerup, Simulation};

/// Kill-timer bookkeeping. The player must score within `cooldown` seconds of the previous
/// kill; every kill resets the timer and tightens the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KillPressure {
    timer: f32,
    cooldown: f32,
    /// Value the timer was last reset to.
    window: f32,
    decay: f32,
}

impl KillPressure {
    pub fn new(start: f32, decay: f32) -> Self {
        Self {
            timer: start,
            cooldown: start,
            window: start,
            decay,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Counts down unless `frozen`. Returns true once the timer has run out.
    pub fn tick(&mut self, dt: f32, frozen: bool) -> bool {
        if !frozen {
            self.timer -= dt;
        }
        self.timer <= 0.0
    }

    /// Resets the timer to the current cooldown, then shrinks the cooldown when `tighten` is set.
    pub fn register_kill(&mut self, tighten: bool) {
        self.timer = self.cooldown;
        self.window = self.cooldown;
        if tighten {
            self.cooldown *= self.decay;
        }
    }

    /// Share of the current countdown still left; 1.0 right after a kill.
    pub fn fraction_remaining(&self) -> f32 {
        (self.timer / self.window).clamp(0.0, 1.0)
    }
}

impl Simulation {
    pub(super) fn slow_time_active(&self) -> bool {
        self.player.powerup == Some(Powerup::SlowTime)
    }

    /// Picking up a powerup while one is active restarts it; effects never stack.
    pub(super) fn grant_powerup(&mut self, powerup: Powerup) {
        match powerup {
            Powerup::SlowTime => {
                self.player.powerup = Some(Powerup::SlowTime);
                self.player.powerup_remaining = self.config.slow_time_duration;
                self.speed_multiplier = self.config.slow_time_multiplier;
            }
        }
        self.stats.powerups_collected += 1;
        tracing::debug!(frame = self.frame_count, ?powerup, "powerup collected");
    }

    fn expire_powerup(&mut self) {
        let expired = self.player.powerup.take();
        self.player.powerup_remaining = 0.0;
        self.speed_multiplier = 1.0;
        tracing::debug!(frame = self.frame_count, ?expired, "powerup expired");
    }

    pub(super) fn update_timers(&mut self, dt: f32) {
        let frozen = self.slow_time_active();
        if self.pressure.tick(dt, frozen) {
            self.end_game(GameOverCause::KillTimerExpired);
        }

        if self.player.powerup.is_some() {
            self.player.powerup_remaining -= dt;
            if self.player.powerup_remaining <= 0.0 {
                self.expire_powerup();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kills_tighten_the_window_geometrically() {
        let mut pressure = KillPressure::new(5.0, 0.95);
        pressure.register_kill(true);
        assert_eq!(pressure.timer(), 5.0);
        assert!((pressure.cooldown() - 4.75).abs() < 1e-6);
        pressure.register_kill(true);
        assert!((pressure.timer() - 4.75).abs() < 1e-6);
        assert!((pressure.cooldown() - 4.5125).abs() < 1e-5);
    }

    #[test]
    fn kills_under_slow_time_keep_the_window() {
        let mut pressure = KillPressure::new(5.0, 0.95);
        assert!(!pressure.tick(2.0, false));
        pressure.register_kill(false);
        assert_eq!(pressure.timer(), 5.0);
        assert_eq!(pressure.cooldown(), 5.0);
    }

    #[test]
    fn frozen_timer_never_expires() {
        let mut pressure = KillPressure::new(1.0, 0.95);
        for _ in 0..1_000 {
            assert!(!pressure.tick(0.1, true));
        }
        assert_eq!(pressure.timer(), 1.0);
        assert!(pressure.tick(1.0, false));
        assert_eq!(pressure.fraction_remaining(), 0.0);
    }

    #[test]
    fn fraction_is_measured_against_the_running_countdown() {
        let mut pressure = KillPressure::new(5.0, 0.95);
        assert_eq!(pressure.fraction_remaining(), 1.0);
        pressure.register_kill(true);
        assert_eq!(pressure.fraction_remaining(), 1.0);
        assert!(!pressure.tick(0.5, false));
        assert!((pressure.fraction_remaining() - 0.9).abs() < 1e-6);
        pressure.register_kill(true);
        assert!(!pressure.tick(0.475, false));
        assert!((pressure.fraction_remaining() - 0.9).abs() < 1e-5);
    }
}
