use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rush_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, Objective};
use rush_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use rush_autopilot::config::{load_sim_config, write_sim_config, ConfigOverrides};
use rush_autopilot::runner::{read_run, run_bot, verify_run, write_run};
use rush_autopilot::util::{parse_seed, parse_seed_csv, parse_seed_file, seed_sequence, seed_to_hex};
use rush_core::{ControlScheme, HitPolicy, MotionIntegration, SimConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::filter::EnvFilter;

const DEFAULT_SEED_START: u32 = 0x5EED_0001;

#[derive(Parser, Debug)]
#[command(name = "rush-autopilot")]
#[command(about = "Headless Asteroid Rush driver: scripted bots, verifiable runs and benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available bots
    ListBots,
    /// Dump every bot's id, description, config and fingerprint as JSON
    RosterManifest {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play one game with a bot and save the run
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 18_000)]
        max_frames: u32,
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-simulate a saved run and check its recorded outcome
    VerifyRun {
        #[arg(long)]
        input: PathBuf,
    },
    /// Play every bot against every seed and rank the bots
    Benchmark {
        /// Comma-separated bot ids (default: whole roster)
        #[arg(long)]
        bots: Option<String>,
        #[command(flatten)]
        seeds: SeedArgs,
        #[arg(long, default_value_t = 18_000)]
        max_frames: u32,
        #[arg(long, value_enum, default_value_t = CliObjective::Score)]
        objective: CliObjective,
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Runs saved per ranking metric
        #[arg(long, default_value_t = 4)]
        save_top: usize,
        /// Worker threads (default: one per core)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the default simulation config as JSON
    PrintConfig {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SimArgs {
    /// JSON simulation config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    scheme: Option<CliScheme>,
    #[arg(long, value_enum)]
    hit_policy: Option<CliHitPolicy>,
    #[arg(long, value_enum)]
    motion: Option<CliMotion>,
}

impl SimArgs {
    fn load(&self) -> Result<SimConfig> {
        let overrides = ConfigOverrides {
            control_scheme: self.scheme.map(Into::into),
            hit_policy: self.hit_policy.map(Into::into),
            motion: self.motion.map(Into::into),
        };
        load_sim_config(self.config.as_deref(), overrides)
    }
}

/// Seed selection, in priority order: file, explicit list, generated sequence.
#[derive(Args, Debug)]
struct SeedArgs {
    /// Comma-separated seeds (hex or decimal)
    #[arg(long)]
    seeds: Option<String>,
    /// File with seeds, one or more per line
    #[arg(long)]
    seed_file: Option<PathBuf>,
    #[arg(long)]
    seed_start: Option<String>,
    #[arg(long, default_value_t = 12)]
    seed_count: u32,
}

impl SeedArgs {
    fn resolve(&self) -> Result<Vec<u32>> {
        if let Some(path) = &self.seed_file {
            return parse_seed_file(path);
        }
        if let Some(list) = &self.seeds {
            return parse_seed_csv(list);
        }
        let start = match &self.seed_start {
            Some(raw) => parse_seed(raw)?,
            None => DEFAULT_SEED_START,
        };
        Ok(seed_sequence(start, self.seed_count))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Score,
    Survival,
    Hybrid,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Score => Self::Score,
            CliObjective::Survival => Self::Survival,
            CliObjective::Hybrid => Self::Hybrid,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliScheme {
    Pointer,
    Heading,
}

impl From<CliScheme> for ControlScheme {
    fn from(value: CliScheme) -> Self {
        match value {
            CliScheme::Pointer => Self::PointerAimed,
            CliScheme::Heading => Self::HeadingRelative,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliHitPolicy {
    SingleKill,
    PerBullet,
}

impl From<CliHitPolicy> for HitPolicy {
    fn from(value: CliHitPolicy) -> Self {
        match value {
            CliHitPolicy::SingleKill => Self::SingleKill,
            CliHitPolicy::PerBullet => Self::ScorePerBullet,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMotion {
    PerFrame,
    Elapsed,
}

impl From<CliMotion> for MotionIntegration {
    fn from(value: CliMotion) -> Self {
        match value {
            CliMotion::PerFrame => Self::PerFrame,
            CliMotion::Elapsed => Self::ElapsedTime,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match Cli::parse().command {
        Command::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:16} {description}");
            }
            Ok(())
        }
        Command::RosterManifest { output } => {
            let manifest = bot_manifest_entries();
            emit_json(&manifest, output.as_deref())?;
            println!("bots={}", manifest.len());
            Ok(())
        }
        Command::Run {
            bot,
            seed,
            max_frames,
            sim,
            output,
        } => cmd_run(&bot, &seed, max_frames, &sim, output),
        Command::VerifyRun { input } => cmd_verify(&input),
        Command::Benchmark {
            bots,
            seeds,
            max_frames,
            objective,
            sim,
            out_dir,
            save_top,
            jobs,
        } => {
            let objective = Objective::from(objective);
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from("benchmarks").join(format!("{}-{}", objective.as_str(), unix_now()))
            });
            cmd_benchmark(BenchmarkConfig {
                bots: resolve_bots(bots.as_deref())?,
                seeds: seeds.resolve()?,
                max_frames,
                objective,
                sim: sim.load()?,
                out_dir,
                save_top,
                jobs,
            })
        }
        Command::PrintConfig { output: Some(path) } => {
            write_sim_config(&path, &SimConfig::default())?;
            println!("wrote={}", path.display());
            Ok(())
        }
        Command::PrintConfig { output: None } => emit_json(&SimConfig::default(), None),
    }
}

/// Pretty JSON to `output` when given, stdout otherwise.
fn emit_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let encoded = serde_json::to_string_pretty(value).context("failed to encode json")?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating {}", parent.display()))?;
            }
            fs::write(path, encoded)
                .with_context(|| format!("failed writing {}", path.display()))?;
            println!("wrote={}", path.display());
        }
        None => println!("{encoded}"),
    }
    Ok(())
}

fn cmd_run(
    bot: &str,
    seed: &str,
    max_frames: u32,
    sim: &SimArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    if create_bot(bot).is_none() {
        return Err(anyhow!(
            "unknown bot '{bot}'. available: {}",
            bot_ids().join(", ")
        ));
    }
    let seed = parse_seed(seed)?;
    let config = sim.load()?;
    let artifact = run_bot(bot, seed, max_frames, &config)?;
    let m = &artifact.metrics;
    let path = output.unwrap_or_else(|| {
        PathBuf::from("runs").join(format!(
            "{bot}-{:08x}-score{}-frames{}.json",
            seed, m.final_score, m.frame_count
        ))
    });
    write_run(&path, &artifact)?;

    println!("bot={} ({})", m.bot_id, m.bot_fingerprint);
    println!("seed={}", seed_to_hex(seed));
    println!("frames={}", m.frame_count);
    println!("score={}", m.final_score);
    println!("kills={} shots={} blinks={}", m.kills, m.shots_fired, m.blinks);
    println!("powerups={}", m.powerups_collected);
    match m.game_over_cause {
        Some(cause) => println!("game_over={cause:?}"),
        None => println!("game_over=no"),
    }
    println!("kill_cooldown={:.3}", m.final_kill_cooldown);
    println!("rng={:#010x}", m.final_rng_state);
    println!("output={}", path.display());
    Ok(())
}

fn cmd_verify(input: &Path) -> Result<()> {
    let artifact = read_run(input)?;
    let replayed = verify_run(&artifact)
        .with_context(|| format!("run {} failed verification", input.display()))?;
    println!("input={}", input.display());
    println!("bot={}", artifact.metrics.bot_id);
    println!("seed={}", seed_to_hex(artifact.metrics.seed));
    println!("frames={}", replayed.frame_count);
    println!("score={}", replayed.final_points);
    println!("rng={:#010x}", replayed.final_rng_state);
    println!("verified=yes");
    Ok(())
}

fn cmd_benchmark(config: BenchmarkConfig) -> Result<()> {
    let out_dir = config.out_dir.clone();
    let report = run_benchmark(config)?;

    println!("objective={}", report.objective.as_str());
    println!("runs={}", report.run_count);
    match report.jobs {
        Some(jobs) => println!("jobs={jobs}"),
        None => println!("jobs=auto"),
    }
    println!("out_dir={}", out_dir.display());
    println!("rankings:");
    for (idx, bot) in report.bot_rankings.iter().enumerate().take(5) {
        println!(
            "  {}. {:16} value={:.1} score={:.1} frames={:.0} kills={:.1} accuracy={:.0}% blinks={:.1} survived={:.0}%",
            idx + 1,
            bot.bot_id,
            bot.objective_value,
            bot.avg_score,
            bot.avg_frames,
            bot.avg_kills,
            bot.accuracy * 100.0,
            bot.avg_blinks,
            bot.survival_rate * 100.0,
        );
    }
    if !report.saved_runs.is_empty() {
        println!("saved:");
        for saved in report.saved_runs.iter().take(10) {
            println!(
                "  {}#{} {} {} score={} frames={}",
                saved.metric, saved.rank, saved.bot_id, saved.seed_hex, saved.score, saved.frames
            );
        }
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
