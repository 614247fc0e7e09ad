//! Episodic navigation task state machine for Wayfinder.
//!
//! This crate sits between a navigation simulator and a learning agent:
//! it maps discrete action indices to simulator commands, shapes rewards
//! from geodesic distance, decides termination and drains per-episode
//! metrics. It also adapts an external path follower into expert labels.

pub mod episode;
pub mod error;
pub mod expert;
pub mod metrics;
pub mod reward;
pub mod sensors;
pub mod stats;
pub mod task;

pub mod prelude {
    pub use crate::{
        episode::{EpisodeState, Termination},
        error::TaskError,
        expert::{ExpertAction, ExpertOracle},
        metrics::{EpisodeMetrics, PathPoint, TaskInfo, Trajectory},
        reward::{GeodesicShaping, RewardShaping, ShapingInput},
        sensors::{AgentPoseSensor, FrameSensor, SensorSuite},
        stats::EpisodeStats,
        task::{MetricFields, NavTask, TaskSpec},
    };
}
