// wayfinder-core: Actions, types, traits, config and errors for episodic navigation tasks.

pub mod action;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub mod prelude {
    pub use crate::{
        action::{ActionSet, NavAction},
        config::{RewardConfig, TaskConfig, TaskKind},
        error::{ConfigError, RenderError, SimError, ValidationError, WayfinderError},
        traits::{FollowerMode, PathFollower, Sensor, Simulator},
        types::{
            AGENT_POSE_UUID, DiscreteSpace, EpisodeIdentity, Frame, FrameSet, Observations,
            Point3, Pose, RenderMode, SensorReading, StepInfo, StepResult,
        },
    };
}
