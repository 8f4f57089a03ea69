use super::{Bullet, FrameInput, Player, Simulation};
use crate::config::{BlinkDirection, ControlScheme, SimConfig};
use crate::math::{center_of, Vec2};

/// Converts a frame's held directions into player movement. Chosen once per session.
pub trait MotionModel {
    fn name(&self) -> &'static str;

    /// Updates heading, velocity and position. `velocity` has already been reset to zero.
    fn apply(&self, player: &mut Player, input: &FrameInput, config: &SimConfig, scale: f32);
}

fn axis(negative: bool, positive: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

/// Heading tracks the pointer; held directions strafe in screen space.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerAimed;

impl MotionModel for PointerAimed {
    fn name(&self) -> &'static str {
        "pointer_aimed"
    }

    fn apply(&self, player: &mut Player, input: &FrameInput, config: &SimConfig, scale: f32) {
        let center = center_of(player.position, config.player_size, config.player_size);
        // Pointer sitting on the player's center keeps the previous heading.
        if let Ok(aim) = Vec2::direction_between(center, input.pointer) {
            player.heading = aim.angle();
        }

        // Diagonals are not normalized.
        player.velocity = Vec2::new(
            axis(input.left, input.right),
            axis(input.up, input.down),
        );
        player.position += player.velocity * (config.player_move_speed * scale);
    }
}

/// Left/right rotate; up/down thrust along the heading.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadingRelative;

impl MotionModel for HeadingRelative {
    fn name(&self) -> &'static str {
        "heading_relative"
    }

    fn apply(&self, player: &mut Player, input: &FrameInput, config: &SimConfig, scale: f32) {
        player.heading += axis(input.left, input.right) * config.player_turn_speed * scale;
        let thrust = axis(input.down, input.up);
        player.velocity = Vec2::from_angle(player.heading) * thrust;
        player.position += player.velocity * (config.player_move_speed * scale);
    }
}

pub fn motion_model(scheme: ControlScheme) -> &'static dyn MotionModel {
    match scheme {
        ControlScheme::PointerAimed => &PointerAimed,
        ControlScheme::HeadingRelative => &HeadingRelative,
    }
}

impl Simulation {
    pub(super) fn update_player(&mut self, input: &FrameInput, scale: f32) {
        self.player.velocity = Vec2::ZERO;
        motion_model(self.config.control_scheme).apply(
            &mut self.player,
            input,
            &self.config,
            scale,
        );

        if input.fire {
            self.fire();
        }
        if input.blink {
            self.try_blink();
        }
    }

    fn fire(&mut self) {
        let bullet = Bullet {
            position: self.player_center(),
            direction: Vec2::from_angle(self.player.heading),
        };
        match self.bullets.create(bullet) {
            Ok(_) => self.stats.shots_fired += 1,
            Err(err) => {
                self.stats.shots_dropped += 1;
                tracing::trace!(%err, "bullet dropped");
            }
        }
    }

    fn try_blink(&mut self) {
        if self.blink_timer > 0.0 {
            return;
        }
        let heading = Vec2::from_angle(self.player.heading);
        let direction = match self.config.blink_direction {
            BlinkDirection::Heading => heading,
            BlinkDirection::Velocity => self.player.velocity.normalized().unwrap_or(heading),
        };
        self.player.position += direction * self.config.blink_distance;
        self.blink_timer = self.config.blink_cooldown;
        self.stats.blinks += 1;
    }
}
