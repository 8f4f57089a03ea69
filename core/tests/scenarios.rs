use rush_core::constants::FRAME_DT;
use rush_core::sim::Powerup;
use rush_core::{
    replay, FrameContext, FrameInput, FrameStatus, GameOverCause, SimConfig, Simulation, Vec2,
};

fn quiet_config() -> SimConfig {
    SimConfig {
        asteroid_spawn_interval: 1.0e9,
        ..SimConfig::default()
    }
}

fn aim_at(x: f32, y: f32) -> FrameInput {
    FrameInput {
        pointer: Vec2::new(x, y),
        ..FrameInput::default()
    }
}

fn run_until_stopped(sim: &mut Simulation, input: FrameInput, limit: u32) -> FrameStatus {
    let ctx = FrameContext::new(FRAME_DT, input);
    let mut status = FrameStatus::Running;
    while status == FrameStatus::Running && sim.frame_count() < limit {
        status = sim.frame(&ctx);
    }
    status
}

#[test]
fn aimed_asteroid_reaches_idle_player() {
    let mut sim = Simulation::new(1, quiet_config()).expect("valid config");
    let target = sim.player().position;
    sim.spawn_asteroid_at(Vec2::new(-100.0, -100.0), target, None)
        .expect("capacity");

    let mut last_distance = f32::MAX;
    let ctx = FrameContext::new(FRAME_DT, aim_at(800.0, 310.0));
    while sim.frame(&ctx) == FrameStatus::Running {
        let distance = sim.asteroids()[0].position.distance_squared(target);
        assert!(distance < last_distance, "asteroid must close in every frame");
        last_distance = distance;
        assert!(sim.frame_count() < 200);
    }

    // ~566 px to the corner at 5 px per frame, minus the 15 px radius.
    assert_eq!(sim.game_over_cause(), Some(GameOverCause::AsteroidCollision));
    assert!(sim.asteroids().is_empty());
    assert!((105..=115).contains(&sim.frame_count()), "{}", sim.frame_count());
}

#[test]
fn default_game_ends_for_an_idle_player() {
    let mut sim = Simulation::new(0xC0FF_EE00, SimConfig::default()).expect("valid config");
    let status = run_until_stopped(&mut sim, aim_at(800.0, 310.0), 10_000);
    assert_eq!(status, FrameStatus::GameOver);
    assert!(sim.game_over_cause().is_some());
    assert_eq!(sim.points(), 0);
}

#[test]
fn shooting_down_an_asteroid_through_the_public_api() {
    let mut sim = Simulation::new(1, quiet_config()).expect("valid config");
    sim.spawn_asteroid_at(Vec2::new(600.0, 310.0), Vec2::new(0.0, 310.0), None)
        .expect("capacity");
    let value = sim.asteroids()[0].points;
    let origin = sim.asteroids()[0].position;

    let fire = FrameInput {
        fire: true,
        ..aim_at(800.0, 310.0)
    };
    sim.frame(&FrameContext::new(FRAME_DT, fire));

    // The gap closes by 15 px per frame: 5 from the asteroid, 10 from the bullet.
    let ctx = FrameContext::new(FRAME_DT, aim_at(800.0, 310.0));
    while !sim.asteroids().is_empty() {
        assert_eq!(sim.frame(&ctx), FrameStatus::Running);
        assert!(sim.frame_count() < 40);
    }
    assert_eq!(sim.points(), value);
    assert!(sim.bullets().is_empty());
    assert_eq!(sim.particle_groups().len(), 1);
    let burst = sim.particle_groups()[0].origin;
    assert!(burst.x < origin.x && (burst.y - origin.y).abs() < 1e-3);
}

#[test]
fn slow_time_carrier_changes_world_speed() {
    let mut sim = Simulation::new(1, quiet_config()).expect("valid config");
    sim.spawn_asteroid_at(
        Vec2::new(400.0, 310.0),
        Vec2::new(800.0, 310.0),
        Some(Powerup::SlowTime),
    )
    .expect("capacity");
    let fire = FrameInput {
        fire: true,
        ..aim_at(800.0, 310.0)
    };
    sim.frame(&FrameContext::new(FRAME_DT, fire));
    let ctx = FrameContext::new(FRAME_DT, aim_at(800.0, 310.0));
    while sim.player().powerup.is_none() && sim.frame_count() < 60 {
        sim.frame(&ctx);
    }
    assert_eq!(sim.player().powerup, Some(Powerup::SlowTime));
    assert_eq!(sim.speed_multiplier(), sim.config().slow_time_multiplier);
    sim.validate().expect("slow-time state must validate");
}

#[test]
fn identical_inputs_replay_identically() {
    let config = SimConfig::default();
    let frames: Vec<FrameContext> = (0..2_000u32)
        .map(|frame| {
            let angle = frame as f32 * 0.05;
            FrameContext::new(
                FRAME_DT,
                FrameInput {
                    fire: frame % 4 == 0,
                    blink: frame % 400 == 0,
                    up: frame % 90 < 30,
                    down: frame % 90 >= 60,
                    pointer: Vec2::new(310.0 + angle.cos() * 200.0, 310.0 + angle.sin() * 200.0),
                    ..FrameInput::default()
                },
            )
        })
        .collect();

    let first = replay(0x1234_5678, &config, &frames).expect("valid config");
    let second = replay(0x1234_5678, &config, &frames).expect("valid config");
    assert_eq!(first, second);
    assert!(first.stats.shots_fired > 0);

    let other_seed = replay(0x8765_4321, &config, &frames).expect("valid config");
    assert_ne!(first.final_rng_state, other_seed.final_rng_state);
}

#[test]
fn snapshot_serializes_for_the_renderer() {
    let mut sim = Simulation::new(3, SimConfig::default()).expect("valid config");
    run_until_stopped(&mut sim, aim_at(800.0, 310.0), 120);
    let json = serde_json::to_string(&sim.snapshot()).expect("snapshot serializes");
    assert!(json.contains("\"asteroids\""));
    assert!(json.contains("\"kill_fraction\""));
}
