pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod pool;
pub mod rng;
pub mod sim;

pub use config::{BlinkDirection, ControlScheme, HitPolicy, MotionIntegration, SimConfig};
pub use error::{ConfigError, PoolKind, RuleCode, SimError};
pub use math::{Rect, Vec2};
pub use sim::{
    replay, replay_with_checkpoints, Checkpoint, FrameContext, FrameInput, FrameStatus,
    GameOverCause, GameState, ReplayResult, SimStats, Simulation, WorldSnapshot,
};
