use serde::{Deserialize, Serialize};

use crate::action::NavAction;
use crate::error::SimError;
use crate::types::{EpisodeIdentity, FrameSet, Point3, Pose, SensorReading};

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// The embodied-navigation simulator a task drives.
///
/// Exclusively owned by one task and never re-entered. All feedback the task
/// needs is read through the query methods after [`step`](Self::step)
/// returns.
pub trait Simulator {
    /// Execute one action. The only call that mutates simulator state.
    fn step(&mut self, action: NavAction) -> Result<(), SimError>;

    /// Whether the most recent action succeeded (false for blocked moves).
    fn last_action_success(&self) -> bool;

    /// Raw geodesic distance to the goal. May be missing, NaN or infinite.
    fn distance_to_goal(&self) -> Option<f64>;

    /// Success-weighted path length for the current step.
    ///
    /// Zero whenever the goal is not within the success distance.
    fn spl(&self) -> Option<f64>;

    /// Whether the simulator considers the episode finished.
    fn episode_over(&self) -> bool;

    /// Latest rendered frames.
    fn current_frame(&self) -> &FrameSet;

    /// Current agent pose.
    fn agent_pose(&self) -> Pose;

    /// Scene and episode currently loaded.
    fn current_episode(&self) -> EpisodeIdentity;

    /// Release simulator resources.
    fn stop(&mut self) -> Result<(), SimError>;
}

// ---------------------------------------------------------------------------
// PathFollower
// ---------------------------------------------------------------------------

/// How the follower traverses toward the goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowerMode {
    /// Follow the geodesic shortest path.
    #[default]
    GeodesicPath,
}

/// External shortest-path oracle.
///
/// Implementations usually hold their own handle on the simulator's
/// pathfinding graph.
pub trait PathFollower {
    /// Set the goal radius and traversal mode.
    fn configure(&mut self, success_distance: f64, mode: FollowerMode);

    /// Next action toward `target` from `pose`, or `None` when no move can be
    /// produced (for example an unreachable target).
    fn next_action(&mut self, pose: &Pose, target: &Point3) -> Option<NavAction>;
}

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

/// Reads one observation entry from the simulator.
pub trait Sensor<S: Simulator> {
    /// Key of this sensor's reading in the observation mapping.
    fn uuid(&self) -> &str;

    /// Produce the reading for the simulator's current state.
    fn read(&self, sim: &S) -> SensorReading;
}
