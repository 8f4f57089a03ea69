use rush_autopilot::benchmark::{run_benchmark, BenchmarkConfig, Objective};
use rush_autopilot::bots::bot_ids;
use rush_autopilot::runner::{read_run, run_bot, verify_run, write_run};
use rush_core::{ControlScheme, GameOverCause, SimConfig};

#[test]
fn every_bot_runs_deterministically() {
    let config = SimConfig::default();
    for bot in bot_ids() {
        let first = run_bot(bot, 0x5EED_0001, 600, &config).expect("first run");
        let second = run_bot(bot, 0x5EED_0001, 600, &config).expect("second run");
        assert_eq!(first.inputs, second.inputs, "bot {bot} inputs diverged");
        assert_eq!(first.metrics.final_score, second.metrics.final_score);
        assert_eq!(first.metrics.frame_count, second.metrics.frame_count);
        assert_eq!(first.metrics.final_rng_state, second.metrics.final_rng_state);
        assert!(first.metrics.frame_count <= 600);
        assert_eq!(first.inputs.len() as u32, first.metrics.frame_count);
    }
}

#[test]
fn idle_bot_runs_out_the_kill_timer() {
    let artifact = run_bot("idle", 7, 600, &SimConfig::default()).expect("run");
    let metrics = &artifact.metrics;
    assert!(metrics.game_over);
    assert_eq!(metrics.shots_fired, 0);
    assert_eq!(metrics.final_score, 0);
    // Five seconds at 60 Hz, unless a spawn reaches the ship first.
    assert!(metrics.frame_count <= 302);
    if metrics.game_over_cause == Some(GameOverCause::KillTimerExpired) {
        assert!(metrics.frame_count >= 299);
    }
}

#[test]
fn huge_frame_cap_only_allocates_what_the_game_uses() {
    let artifact = run_bot("idle", 7, u32::MAX, &SimConfig::default()).expect("run");
    assert!(artifact.metrics.game_over);
    assert!(artifact.metrics.frame_count <= 302);
    assert_eq!(artifact.inputs.len() as u32, artifact.metrics.frame_count);
    assert_eq!(artifact.metrics.max_frames, u32::MAX);
}

#[test]
fn turret_scores_under_both_control_schemes() {
    for scheme in [ControlScheme::PointerAimed, ControlScheme::HeadingRelative] {
        let config = SimConfig {
            control_scheme: scheme,
            ..SimConfig::default()
        };
        let artifact = run_bot("turret", 0x5EED_0001, 1_200, &config).expect("run");
        assert!(artifact.metrics.shots_fired > 0, "{scheme:?} never fired");
        assert!(artifact.metrics.fire_frames > 0);
    }
}

#[test]
fn saved_run_verifies_after_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("runs/dodger.json");
    let artifact = run_bot("dodger", 42, 900, &SimConfig::default()).expect("run");
    write_run(&path, &artifact).expect("write");

    let loaded = read_run(&path).expect("read");
    let replayed = verify_run(&loaded).expect("verify");
    assert_eq!(replayed.final_points, artifact.metrics.final_score);
    assert_eq!(replayed.frame_count, artifact.metrics.frame_count);

    let mut tampered = loaded;
    tampered.metrics.final_score += 1;
    assert!(verify_run(&tampered).is_err());
}

#[test]
fn unknown_bot_is_rejected() {
    assert!(run_bot("no-such-bot", 1, 60, &SimConfig::default()).is_err());
    assert!(run_bot("idle", 1, 0, &SimConfig::default()).is_err());
}

#[test]
fn benchmark_writes_report_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_dir = dir.path().join("bench");
    let report = run_benchmark(BenchmarkConfig {
        bots: vec!["idle".to_string(), "turret".to_string()],
        seeds: vec![1, 2, 3],
        max_frames: 400,
        objective: Objective::Hybrid,
        sim: SimConfig::default(),
        out_dir: out_dir.clone(),
        save_top: 2,
        jobs: Some(2),
    })
    .expect("benchmark");

    assert_eq!(report.run_count, 6);
    assert_eq!(report.bot_rankings.len(), 2);
    assert!(report
        .bot_rankings
        .windows(2)
        .all(|pair| pair[0].objective_value >= pair[1].objective_value));
    // Two runs per metric, three metrics.
    assert_eq!(report.saved_runs.len(), 6);
    for saved in &report.saved_runs {
        assert!(std::path::Path::new(&saved.path).exists());
    }

    for name in ["summary.json", "runs.csv", "rankings.csv"] {
        assert!(out_dir.join(name).exists(), "missing {name}");
    }
    let runs_csv = std::fs::read_to_string(out_dir.join("runs.csv")).expect("runs.csv");
    assert_eq!(runs_csv.lines().count(), 7);
}

#[test]
fn benchmark_rejects_zero_jobs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = run_benchmark(BenchmarkConfig {
        bots: vec!["idle".to_string()],
        seeds: vec![1],
        max_frames: 60,
        objective: Objective::Score,
        sim: SimConfig::default(),
        out_dir: dir.path().to_path_buf(),
        save_top: 0,
        jobs: Some(0),
    });
    assert!(result.is_err());
}
