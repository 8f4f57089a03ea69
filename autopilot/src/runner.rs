use crate::bots::{bot_fingerprint, create_bot, AutopilotBot};
use anyhow::{anyhow, Context, Result};
use rush_core::constants::FRAME_DT;
use rush_core::{
    replay, FrameContext, FrameInput, FrameStatus, GameOverCause, ReplayResult, SimConfig,
    Simulation,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Input buffers grow past this many frames instead of reserving `max_frames` up front.
const INPUT_PREALLOC_LIMIT: u32 = 1 << 16;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_rng_state: u32,
    pub game_over: bool,
    pub game_over_cause: Option<GameOverCause>,
    pub kills: u32,
    pub shots_fired: u32,
    pub shots_dropped: u32,
    pub blinks: u32,
    pub powerups_collected: u32,
    pub asteroids_spawned: u32,
    pub final_kill_cooldown: f32,
    pub action_frames: u32,
    pub move_frames: u32,
    pub fire_frames: u32,
}

/// A finished run: enough to replay it bit-for-bit later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub config: SimConfig,
    pub inputs: Vec<FrameInput>,
}

pub fn run_bot(bot_id: &str, seed: u32, max_frames: u32, config: &SimConfig) -> Result<RunArtifact> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }

    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), seed, max_frames, config)
}

/// Drives `bot` on a fixed 60 Hz clock until game over or `max_frames`, then replays the
/// recorded inputs from scratch and checks the outcome matches.
pub fn run_bot_instance(
    bot: &mut dyn AutopilotBot,
    seed: u32,
    max_frames: u32,
    config: &SimConfig,
) -> Result<RunArtifact> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }

    bot.reset(seed);

    let mut sim = Simulation::new(seed, config.clone()).context("invalid simulation config")?;
    sim.validate()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let mut snapshot = sim.snapshot();
    let mut inputs = Vec::with_capacity(max_frames.min(INPUT_PREALLOC_LIMIT) as usize);

    while sim.frame_count() < max_frames {
        let input = bot.next_input(&snapshot);
        inputs.push(input);
        let status = sim.frame(&FrameContext::new(FRAME_DT, input));
        sim.validate().map_err(|rule| {
            anyhow!(
                "invariant failure at frame {}: {rule}",
                sim.frame_count()
            )
        })?;
        if status != FrameStatus::Running {
            break;
        }
        snapshot = sim.snapshot();
    }

    let result = sim.result();
    let replayed = replay_inputs(seed, config, &inputs)?;
    if replayed != result {
        return Err(anyhow!(
            "replay diverged for bot={} seed={seed:#x}: live score {} vs replay {}",
            bot.id(),
            result.final_points,
            replayed.final_points
        ));
    }

    let mut action_frames = 0u32;
    let mut move_frames = 0u32;
    let mut fire_frames = 0u32;
    for input in &inputs {
        let moving = input.up || input.down || input.left || input.right;
        if moving || input.fire || input.blink {
            action_frames += 1;
        }
        if moving {
            move_frames += 1;
        }
        if input.fire {
            fire_frames += 1;
        }
    }

    tracing::debug!(
        bot = bot.id(),
        seed,
        frames = result.frame_count,
        score = result.final_points,
        "run finished"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot.id().to_string(),
            bot_fingerprint: bot_fingerprint(bot.id()).unwrap_or_else(|| "unknown".to_string()),
            seed,
            max_frames,
            frame_count: result.frame_count,
            final_score: result.final_points,
            final_rng_state: result.final_rng_state,
            game_over: result.game_over_cause.is_some(),
            game_over_cause: result.game_over_cause,
            kills: result.stats.kills,
            shots_fired: result.stats.shots_fired,
            shots_dropped: result.stats.shots_dropped,
            blinks: result.stats.blinks,
            powerups_collected: result.stats.powerups_collected,
            asteroids_spawned: result.stats.asteroids_spawned,
            final_kill_cooldown: sim.kill_cooldown(),
            action_frames,
            move_frames,
            fire_frames,
        },
        config: config.clone(),
        inputs,
    })
}

fn replay_inputs(seed: u32, config: &SimConfig, inputs: &[FrameInput]) -> Result<ReplayResult> {
    let frames: Vec<FrameContext> = inputs
        .iter()
        .map(|input| FrameContext::new(FRAME_DT, *input))
        .collect();
    replay(seed, config, &frames).context("invalid simulation config")
}

/// Re-simulates a saved run and checks its recorded score, frame count and RNG state.
pub fn verify_run(artifact: &RunArtifact) -> Result<ReplayResult> {
    let metrics = &artifact.metrics;
    let replayed = replay_inputs(metrics.seed, &artifact.config, &artifact.inputs)?;
    if replayed.final_points != metrics.final_score {
        return Err(anyhow!(
            "score mismatch: recorded {} replayed {}",
            metrics.final_score,
            replayed.final_points
        ));
    }
    if replayed.frame_count != metrics.frame_count {
        return Err(anyhow!(
            "frame count mismatch: recorded {} replayed {}",
            metrics.frame_count,
            replayed.frame_count
        ));
    }
    if replayed.final_rng_state != metrics.final_rng_state {
        return Err(anyhow!(
            "rng state mismatch: recorded {:#010x} replayed {:#010x}",
            metrics.final_rng_state,
            replayed.final_rng_state
        ));
    }
    Ok(replayed)
}

pub fn read_run(path: &Path) -> Result<RunArtifact> {
    let raw = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed parsing run {}", path.display()))
}

pub fn write_run(path: &Path, artifact: &RunArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(artifact).context("failed to serialize run")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
