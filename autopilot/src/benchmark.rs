use crate::bots::{bot_ids, create_bot};
use crate::runner::{run_bot, write_run, RunArtifact, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, ensure, Context, Result};
use rayon::prelude::*;
use rush_core::{GameOverCause, SimConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// How a single run is valued when ranking bots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Score,
    Survival,
    Hybrid,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let score = metrics.final_score as f64;
        let frames = metrics.frame_count as f64;
        let kills = metrics.kills as f64;
        match self {
            Self::Score => score + kills * 2.0 + frames * 0.02,
            Self::Survival => {
                let bonus = if metrics.game_over { 0.0 } else { 600.0 };
                frames + score * 0.15 + bonus
            }
            Self::Hybrid => {
                score * 0.75 + frames * 0.55 + metrics.powerups_collected as f64 * 15.0
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Survival => "survival",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u32,
    pub objective: Objective,
    pub sim: SimConfig,
    pub out_dir: PathBuf,
    /// Runs kept per ranking metric; 0 keeps none.
    pub save_top: usize,
    /// Worker threads; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub final_score: u32,
    pub game_over_cause: Option<GameOverCause>,
    pub objective_value: f64,
    pub kills: u32,
    pub shots_fired: u32,
    pub blinks: u32,
    pub powerups_collected: u32,
    pub final_kill_cooldown: f32,
    pub action_frames: u32,
    pub move_frames: u32,
    pub fire_frames: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub objective_value: f64,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub max_frames: u32,
    /// Share of runs still alive at the frame limit.
    pub survival_rate: f64,
    pub collision_deaths: usize,
    pub timer_deaths: usize,
    /// Kills per shot fired.
    pub accuracy: f64,
    pub avg_kills: f64,
    pub avg_blinks: f64,
    pub avg_powerups: f64,
    pub avg_action_frames: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedRunRecord {
    pub metric: String,
    pub rank: usize,
    pub bot_id: String,
    pub seed_hex: String,
    pub score: u32,
    pub frames: u32,
    pub path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub max_frames: u32,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub sim: SimConfig,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
    pub saved_runs: Vec<SavedRunRecord>,
}

struct ScoredRun {
    artifact: RunArtifact,
    value: f64,
}

impl ScoredRun {
    fn metrics(&self) -> &RunMetrics {
        &self.artifact.metrics
    }

    fn record(&self) -> RunRecord {
        let m = self.metrics();
        RunRecord {
            bot_id: m.bot_id.clone(),
            bot_fingerprint: m.bot_fingerprint.clone(),
            seed: m.seed,
            seed_hex: seed_to_hex(m.seed),
            frame_count: m.frame_count,
            final_score: m.final_score,
            game_over_cause: m.game_over_cause,
            objective_value: self.value,
            kills: m.kills,
            shots_fired: m.shots_fired,
            blinks: m.blinks,
            powerups_collected: m.powerups_collected,
            final_kill_cooldown: m.final_kill_cooldown,
            action_frames: m.action_frames,
            move_frames: m.move_frames,
            fire_frames: m.fire_frames,
        }
    }
}

/// Running sums for one bot across its seeds.
#[derive(Default)]
struct Totals {
    runs: usize,
    value: f64,
    score: u64,
    max_score: u32,
    frames: u64,
    max_frames: u32,
    survived: usize,
    collision_deaths: usize,
    timer_deaths: usize,
    kills: u64,
    shots: u64,
    blinks: u64,
    powerups: u64,
    action_frames: u64,
}

impl Totals {
    fn add(&mut self, run: &ScoredRun) {
        let m = run.metrics();
        self.runs += 1;
        self.value += run.value;
        self.score += u64::from(m.final_score);
        self.max_score = self.max_score.max(m.final_score);
        self.frames += u64::from(m.frame_count);
        self.max_frames = self.max_frames.max(m.frame_count);
        match m.game_over_cause {
            None => self.survived += 1,
            Some(GameOverCause::AsteroidCollision) => self.collision_deaths += 1,
            Some(GameOverCause::KillTimerExpired) => self.timer_deaths += 1,
        }
        self.kills += u64::from(m.kills);
        self.shots += u64::from(m.shots_fired);
        self.blinks += u64::from(m.blinks);
        self.powerups += u64::from(m.powerups_collected);
        self.action_frames += u64::from(m.action_frames);
    }

    fn into_aggregate(self, bot_id: String, bot_fingerprint: String) -> BotAggregate {
        let n = self.runs.max(1) as f64;
        BotAggregate {
            bot_id,
            bot_fingerprint,
            runs: self.runs,
            objective_value: self.value / n,
            avg_score: self.score as f64 / n,
            max_score: self.max_score,
            avg_frames: self.frames as f64 / n,
            max_frames: self.max_frames,
            survival_rate: self.survived as f64 / n,
            collision_deaths: self.collision_deaths,
            timer_deaths: self.timer_deaths,
            accuracy: if self.shots == 0 {
                0.0
            } else {
                self.kills as f64 / self.shots as f64
            },
            avg_kills: self.kills as f64 / n,
            avg_blinks: self.blinks as f64 / n,
            avg_powerups: self.powerups as f64 / n,
            avg_action_frames: self.action_frames as f64 / n,
        }
    }
}

/// Orderings under which the best runs are saved to disk.
#[derive(Clone, Copy)]
enum TopMetric {
    Objective,
    Score,
    Survival,
}

impl TopMetric {
    const ALL: [TopMetric; 3] = [Self::Objective, Self::Score, Self::Survival];

    fn label(self) -> &'static str {
        match self {
            Self::Objective => "objective",
            Self::Score => "score",
            Self::Survival => "survival",
        }
    }

    fn value(self, run: &ScoredRun) -> f64 {
        match self {
            Self::Objective => run.value,
            Self::Score => run.metrics().final_score as f64,
            Self::Survival => run.metrics().frame_count as f64,
        }
    }
}

/// Comma-separated bot ids, or the whole roster when absent. Unknown ids are rejected.
pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(bot_ids().into_iter().map(String::from).collect());
    };
    let bots: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    ensure!(!bots.is_empty(), "--bots resolved to an empty list");
    if let Some(unknown) = bots.iter().find(|id| create_bot(id).is_none()) {
        let available = bot_ids().join(", ");
        return Err(anyhow!("unknown bot '{unknown}'. available: {available}"));
    }
    Ok(bots)
}

fn execute_runs(config: &BenchmarkConfig) -> Result<Vec<ScoredRun>> {
    let jobs: Vec<(&str, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.as_str(), *seed)))
        .collect();
    tracing::info!(
        runs = jobs.len(),
        max_frames = config.max_frames,
        objective = config.objective.as_str(),
        "starting benchmark"
    );

    let play = |&(bot_id, seed): &(&str, u32)| -> Result<ScoredRun> {
        let artifact = run_bot(bot_id, seed, config.max_frames, &config.sim)
            .with_context(|| format!("run failed for bot={bot_id} seed={}", seed_to_hex(seed)))?;
        let value = config.objective.run_value(&artifact.metrics);
        Ok(ScoredRun { artifact, value })
    };

    match config.jobs {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed to build benchmark thread pool")?
            .install(|| jobs.par_iter().map(play).collect()),
        None => jobs.par_iter().map(play).collect(),
    }
}

fn rank_bots(runs: &[ScoredRun]) -> Vec<BotAggregate> {
    let mut per_bot: BTreeMap<&str, (String, Totals)> = BTreeMap::new();
    for run in runs {
        let m = run.metrics();
        per_bot
            .entry(m.bot_id.as_str())
            .or_insert_with(|| (m.bot_fingerprint.clone(), Totals::default()))
            .1
            .add(run);
    }
    let mut rankings: Vec<BotAggregate> = per_bot
        .into_iter()
        .map(|(bot_id, (fingerprint, totals))| {
            totals.into_aggregate(bot_id.to_string(), fingerprint)
        })
        .collect();
    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    ensure!(!config.bots.is_empty(), "benchmark requires at least one bot");
    ensure!(!config.seeds.is_empty(), "benchmark requires at least one seed");
    ensure!(config.jobs != Some(0), "--jobs must be at least 1");
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let runs = execute_runs(&config)?;
    let bot_rankings = rank_bots(&runs);

    let mut records: Vec<RunRecord> = runs.iter().map(ScoredRun::record).collect();
    records.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.final_score.cmp(&a.final_score))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let mut saved_runs = Vec::new();
    if config.save_top > 0 {
        for metric in TopMetric::ALL {
            saved_runs.extend(save_top_runs(&config.out_dir, &runs, metric, config.save_top)?);
        }
    }

    write_runs_csv(&config.out_dir.join("runs.csv"), &records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &bot_rankings)?;

    let summary_path = config.out_dir.join("summary.json");
    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default(),
        objective: config.objective,
        max_frames: config.max_frames,
        jobs: config.jobs,
        bots: config.bots,
        seeds: config.seeds,
        sim: config.sim,
        run_count: records.len(),
        bot_rankings,
        runs: records,
        saved_runs,
    };
    let encoded = serde_json::to_vec_pretty(&report).context("failed to encode summary")?;
    fs::write(&summary_path, encoded)
        .with_context(|| format!("failed writing {}", summary_path.display()))?;
    tracing::info!(path = %summary_path.display(), runs = report.run_count, "benchmark finished");

    Ok(report)
}

fn save_top_runs(
    out_dir: &Path,
    runs: &[ScoredRun],
    metric: TopMetric,
    count: usize,
) -> Result<Vec<SavedRunRecord>> {
    let mut order: Vec<&ScoredRun> = runs.iter().collect();
    order.sort_by(|a, b| {
        metric
            .value(b)
            .total_cmp(&metric.value(a))
            .then_with(|| a.metrics().bot_id.cmp(&b.metrics().bot_id))
            .then_with(|| a.metrics().seed.cmp(&b.metrics().seed))
    });

    let dir = out_dir.join(format!("top-{}", metric.label()));
    order
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(idx, run)| -> Result<SavedRunRecord> {
            let m = run.metrics();
            let rank = idx + 1;
            let path = dir.join(format!(
                "{rank:02}-{}-{:08x}-score{}.json",
                m.bot_id, m.seed, m.final_score
            ));
            write_run(&path, &run.artifact)?;
            Ok(SavedRunRecord {
                metric: metric.label().to_string(),
                rank,
                bot_id: m.bot_id.clone(),
                seed_hex: seed_to_hex(m.seed),
                score: m.final_score,
                frames: m.frame_count,
                path: path.display().to_string(),
            })
        })
        .collect()
}

fn write_csv(path: &Path, header: &str, rows: impl Iterator<Item = String>) -> Result<()> {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("failed writing {}", path.display()))
}

fn cause_label(cause: Option<GameOverCause>) -> &'static str {
    match cause {
        None => "",
        Some(GameOverCause::AsteroidCollision) => "asteroid_collision",
        Some(GameOverCause::KillTimerExpired) => "kill_timer_expired",
    }
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    write_csv(
        path,
        "bot_id,bot_fingerprint,seed_hex,frames,score,game_over_cause,objective_value,kills,shots_fired,blinks,powerups,final_kill_cooldown,action_frames,move_frames,fire_frames",
        rows.iter().map(|r| {
            format!(
                "{},{},{},{},{},{},{:.3},{},{},{},{},{:.4},{},{},{}",
                r.bot_id,
                r.bot_fingerprint,
                r.seed_hex,
                r.frame_count,
                r.final_score,
                cause_label(r.game_over_cause),
                r.objective_value,
                r.kills,
                r.shots_fired,
                r.blinks,
                r.powerups_collected,
                r.final_kill_cooldown,
                r.action_frames,
                r.move_frames,
                r.fire_frames
            )
        }),
    )
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    write_csv(
        path,
        "rank,bot_id,bot_fingerprint,runs,objective_value,avg_score,max_score,avg_frames,max_frames,survival_rate,collision_deaths,timer_deaths,accuracy,avg_kills,avg_blinks,avg_powerups,avg_action_frames",
        rows.iter().enumerate().map(|(idx, r)| {
            format!(
                "{},{},{},{},{:.3},{:.2},{},{:.2},{},{:.4},{},{},{:.4},{:.2},{:.2},{:.2},{:.2}",
                idx + 1,
                r.bot_id,
                r.bot_fingerprint,
                r.runs,
                r.objective_value,
                r.avg_score,
                r.max_score,
                r.avg_frames,
                r.max_frames,
                r.survival_rate,
                r.collision_deaths,
                r.timer_deaths,
                r.accuracy,
                r.avg_kills,
                r.avg_blinks,
                r.avg_powerups,
                r.avg_action_frames
            )
        }),
    )
}
