use rush_core::rng::SeededRng;
use rush_core::sim::AsteroidSnapshot;
use rush_core::{ControlScheme, FrameInput, Vec2, WorldSnapshot};
use serde::Serialize;

pub trait AutopilotBot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput;
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

#[derive(Clone, Copy, Debug, Serialize)]
struct TurretConfig {
    id: &'static str,
    description: &'static str,
    /// Fire on frames where `frame_count % fire_period == 0`.
    fire_period: u32,
    /// Only shoot at asteroids closer than this (px from the player's center).
    fire_range: f32,
    /// Under heading-relative control, stop turning once within this many radians.
    turn_tolerance: f32,
}

#[derive(Clone, Copy, Debug, Serialize)]
struct DodgerConfig {
    id: &'static str,
    description: &'static str,
    fire_period: u32,
    fire_range: f32,
    turn_tolerance: f32,
    /// Strafe away from asteroids whose edge is within this distance.
    threat_radius: f32,
    /// Blink away from asteroids whose edge is within this distance.
    blink_radius: f32,
    /// Steer back toward the middle when this close to a wall.
    edge_margin: f32,
}

#[derive(Clone, Copy, Debug)]
struct Target {
    position: Vec2,
    /// Gap between the asteroid's edge and the player's center.
    clearance: f32,
}

fn player_center(world: &WorldSnapshot) -> Vec2 {
    let half = world.player.size / 2.0;
    world.player.position + Vec2::new(half, half)
}

fn nearest_asteroid(world: &WorldSnapshot) -> Option<Target> {
    let center = player_center(world);
    world
        .asteroids
        .iter()
        .map(|asteroid: &AsteroidSnapshot| Target {
            position: asteroid.position,
            clearance: asteroid.position.distance_squared(center).sqrt() - asteroid.radius,
        })
        .min_by(|a, b| a.clearance.total_cmp(&b.clearance))
}

fn on_screen(world: &WorldSnapshot, point: Vec2) -> bool {
    (0.0..=world.world_width).contains(&point.x) && (0.0..=world.world_height).contains(&point.y)
}

/// Wraps `angle` into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.sin().atan2(angle.cos());
    if wrapped <= -core::f32::consts::PI {
        wrapped + core::f32::consts::TAU
    } else {
        wrapped
    }
}

/// Points the ship at `point`. Pointer-aimed control only needs the pointer; heading-relative
/// control turns one step toward it. Returns true when the heading is already on target.
fn aim_at(
    world: &WorldSnapshot,
    point: Vec2,
    turn_tolerance: f32,
    input: &mut FrameInput,
) -> bool {
    input.pointer = point;
    match world.control_scheme {
        ControlScheme::PointerAimed => true,
        ControlScheme::HeadingRelative => {
            let wanted = (point - player_center(world)).angle();
            let delta = wrap_angle(wanted - world.player.heading);
            if delta.abs() <= turn_tolerance {
                return true;
            }
            if delta > 0.0 {
                input.right = true;
            } else {
                input.left = true;
            }
            false
        }
    }
}

pub struct IdleBot;

impl AutopilotBot for IdleBot {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "Never touches the controls. Baseline for survival and scoring."
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        FrameInput {
            // Keep the pointer on the ship so the heading never changes.
            pointer: player_center(world),
            ..FrameInput::default()
        }
    }
}

struct TurretBot {
    cfg: TurretConfig,
}

impl TurretBot {
    fn new(cfg: TurretConfig) -> Self {
        Self { cfg }
    }
}

fn turret_input(
    world: &WorldSnapshot,
    fire_period: u32,
    fire_range: f32,
    turn_tolerance: f32,
) -> FrameInput {
    let mut input = FrameInput {
        pointer: player_center(world),
        ..FrameInput::default()
    };
    let Some(target) = nearest_asteroid(world) else {
        return input;
    };
    let aimed = aim_at(world, target.position, turn_tolerance, &mut input);
    let due = world.frame_count % fire_period.max(1) == 0;
    input.fire = aimed && due && target.clearance <= fire_range;
    input
}

impl AutopilotBot for TurretBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        turret_input(
            world,
            self.cfg.fire_period,
            self.cfg.fire_range,
            self.cfg.turn_tolerance,
        )
    }
}

struct DodgerBot {
    cfg: DodgerConfig,
    rng: SeededRng,
    /// +1 or -1: which perpendicular to take when a threat is straight ahead.
    escape_side: f32,
}

impl DodgerBot {
    fn new(cfg: DodgerConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(0),
            escape_side: 1.0,
        }
    }

    /// Direction to leave along when `threat` is closing in: perpendicular to the threat
    /// line, on whichever side keeps the ship nearer the middle of the play area.
    fn escape_direction(&mut self, world: &WorldSnapshot, threat: Vec2) -> Vec2 {
        let center = player_center(world);
        let away = (center - threat).normalized().unwrap_or(Vec2::new(1.0, 0.0));
        let perpendicular = Vec2::new(-away.y, away.x);
        let middle = Vec2::new(world.world_width / 2.0, world.world_height / 2.0);
        let toward_middle = middle - center;
        let bias = perpendicular.dot(toward_middle);
        if bias.abs() < 1.0 {
            if self.rng.chance(0.5) {
                self.escape_side = -self.escape_side;
            }
            return perpendicular * self.escape_side;
        }
        if bias > 0.0 {
            perpendicular
        } else {
            -perpendicular
        }
    }
}

impl AutopilotBot for DodgerBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ 0x0D0D_6E55);
        self.escape_side = 1.0;
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        let mut input = turret_input(
            world,
            self.cfg.fire_period,
            self.cfg.fire_range,
            self.cfg.turn_tolerance,
        );
        let Some(threat) = nearest_asteroid(world) else {
            return input;
        };

        // Strafing and blink steering both rely on the pointer owning the heading.
        if world.control_scheme != ControlScheme::PointerAimed {
            return input;
        }

        let center = player_center(world);
        if threat.clearance <= self.cfg.blink_radius && world.blink_fraction <= 0.0 {
            let escape = self.escape_direction(world, threat.position);
            let landing = center + escape * 200.0;
            if on_screen(world, landing) {
                // Blink follows the heading, so point along the escape line this frame.
                return FrameInput {
                    blink: true,
                    pointer: center + escape * 100.0,
                    ..FrameInput::default()
                };
            }
        }

        if threat.clearance <= self.cfg.threat_radius {
            let escape = self.escape_direction(world, threat.position);
            input.right = escape.x > 0.3;
            input.left = escape.x < -0.3;
            input.down = escape.y > 0.3;
            input.up = escape.y < -0.3;
        }

        let margin = self.cfg.edge_margin;
        if center.x < margin {
            input.left = false;
            input.right = true;
        } else if center.x > world.world_width - margin {
            input.right = false;
            input.left = true;
        }
        if center.y < margin {
            input.up = false;
            input.down = true;
        } else if center.y > world.world_height - margin {
            input.down = false;
            input.up = true;
        }
        input
    }
}

mod roster;

pub use roster::{bot_fingerprint, bot_ids, bot_manifest_entries, create_bot, describe_bots};

#[cfg(test)]
mod tests {
    use super::*;
    use rush_core::{SimConfig, Simulation};

    fn world_with_asteroid_at(x: f32, y: f32, scheme: ControlScheme) -> WorldSnapshot {
        let config = SimConfig {
            control_scheme: scheme,
            asteroid_spawn_interval: 1.0e9,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(1, config).expect("valid config");
        sim.spawn_asteroid_at(Vec2::new(x, y), Vec2::new(x, y - 1.0), None)
            .expect("capacity");
        sim.snapshot()
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        use core::f32::consts::PI;
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn turret_aims_pointer_and_fires_in_range() {
        let world = world_with_asteroid_at(500.0, 310.0, ControlScheme::PointerAimed);
        let mut bot = create_bot("turret").expect("registered");
        let input = bot.next_input(&world);
        assert_eq!(input.pointer, Vec2::new(500.0, 310.0));
        assert!(input.fire);
    }

    #[test]
    fn turret_turns_under_heading_relative_control() {
        let world = world_with_asteroid_at(310.0, 600.0, ControlScheme::HeadingRelative);
        let mut bot = create_bot("turret").expect("registered");
        let input = bot.next_input(&world);
        // Target is straight down (+PI/2) and the heading starts at 0.
        assert!(input.right);
        assert!(!input.left);
        assert!(!input.fire);
    }

    #[test]
    fn dodger_blinks_away_from_close_threat() {
        let world = world_with_asteroid_at(360.0, 310.0, ControlScheme::PointerAimed);
        let mut bot = create_bot("dodger").expect("registered");
        bot.reset(9);
        let input = bot.next_input(&world);
        assert!(input.blink);
        assert!(!input.fire);
        // Escape runs perpendicular to the threat line (vertical here).
        assert!((input.pointer.x - 310.0).abs() < 1e-3);
    }

    #[test]
    fn idle_bot_does_nothing() {
        let world = world_with_asteroid_at(500.0, 500.0, ControlScheme::PointerAimed);
        let input = IdleBot.next_input(&world);
        assert!(!input.fire && !input.blink && !input.up && !input.left);
    }
}
