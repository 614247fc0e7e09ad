//! Per-episode bookkeeping.
//!
//! An [`EpisodeState`] lives exactly as long as the task that owns it and is
//! only mutated from the task's `step` and `metrics` calls.

use tracing::warn;
use wayfinder_core::action::NavAction;

use crate::metrics::PathPoint;
use crate::reward::sanitize_distance;

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// Why an episode is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The agent issued the end action.
    EndAction,
    /// The simulator declared the episode over.
    SimulatorEpisodeOver,
    /// The step budget ran out.
    StepBudget,
}

// ---------------------------------------------------------------------------
// DistanceUpdate
// ---------------------------------------------------------------------------

/// Guarded distances before and after one reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceUpdate {
    pub previous: f64,
    pub current: f64,
}

// ---------------------------------------------------------------------------
// EpisodeState
// ---------------------------------------------------------------------------

/// Mutable record of one navigation episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeState {
    last_action: Option<NavAction>,
    last_action_index: Option<usize>,
    last_action_success: Option<bool>,
    took_end_action: bool,
    success: bool,
    last_geodesic_distance: f64,
    /// `None` when the variant does not track it.
    min_distance_to_goal: Option<f64>,
    rewards: Vec<f64>,
    rewards_drained: bool,
    num_invalid_actions: u32,
    actions_taken: Vec<NavAction>,
    positions: Vec<PathPoint>,
}

impl EpisodeState {
    /// Start an episode from the simulator's pre-episode distance reading.
    ///
    /// An invalid reading starts the episode at `0.0`.
    pub fn new(initial_distance: Option<f64>, track_min_distance: bool) -> Self {
        let start = sanitize_distance(initial_distance, 0.0);
        Self {
            last_action: None,
            last_action_index: None,
            last_action_success: None,
            took_end_action: false,
            success: false,
            last_geodesic_distance: start,
            min_distance_to_goal: track_min_distance.then_some(start),
            rewards: Vec::new(),
            rewards_drained: false,
            num_invalid_actions: 0,
            actions_taken: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Record the action about to be dispatched.
    pub const fn record_action(&mut self, index: usize, action: NavAction) {
        self.last_action = Some(action);
        self.last_action_index = Some(index);
        self.last_action_success = None;
    }

    /// Record the simulator's verdict on a non-end action.
    pub const fn record_action_success(&mut self, success: bool) {
        self.last_action_success = Some(success);
    }

    /// Record the end action and the episode outcome.
    ///
    /// The end flag is one-way: once set it is never cleared.
    pub const fn record_end(&mut self, success: bool) {
        self.took_end_action = true;
        self.success = success;
        self.last_action_success = Some(success);
    }

    /// Fold a raw distance reading into the state.
    ///
    /// The running minimum (when tracked) sees the raw reading, while the
    /// stored distance only ever takes finite values. A missing or NaN raw
    /// reading leaves the minimum untouched: NaN is skipped, never stored,
    /// so the minimum stays non-increasing.
    pub fn observe_distance(&mut self, reading: Option<f64>) -> DistanceUpdate {
        if let (Some(min), Some(raw)) = (self.min_distance_to_goal.as_mut(), reading) {
            *min = min.min(raw);
        }

        let previous = self.last_geodesic_distance;
        let current = sanitize_distance(reading, previous);
        if reading != Some(current) {
            warn!(?reading, fallback = previous, "invalid distance-to-goal reading");
        }
        self.last_geodesic_distance = current;
        DistanceUpdate { previous, current }
    }

    pub fn push_reward(&mut self, reward: f64) {
        self.rewards.push(reward);
    }

    /// Take every reward recorded so far, leaving the log empty.
    ///
    /// One-shot per episode: [`rewards_drained`](Self::rewards_drained)
    /// reports whether this already happened.
    pub fn drain_rewards(&mut self) -> Vec<f64> {
        self.rewards_drained = true;
        std::mem::take(&mut self.rewards)
    }

    pub const fn record_invalid_action(&mut self) {
        self.num_invalid_actions += 1;
    }

    pub fn log_action(&mut self, action: NavAction) {
        self.actions_taken.push(action);
    }

    pub fn log_position(&mut self, point: PathPoint) {
        self.positions.push(point);
    }

    pub const fn last_action(&self) -> Option<NavAction> {
        self.last_action
    }

    pub const fn last_action_index(&self) -> Option<usize> {
        self.last_action_index
    }

    pub const fn last_action_success(&self) -> Option<bool> {
        self.last_action_success
    }

    pub const fn took_end_action(&self) -> bool {
        self.took_end_action
    }

    /// Episode outcome. Only meaningful once [`took_end_action`](Self::took_end_action) is true.
    pub const fn success(&self) -> bool {
        self.success
    }

    pub const fn last_geodesic_distance(&self) -> f64 {
        self.last_geodesic_distance
    }

    pub const fn min_distance_to_goal(&self) -> Option<f64> {
        self.min_distance_to_goal
    }

    /// Rewards recorded since the last drain, in step order.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub const fn rewards_drained(&self) -> bool {
        self.rewards_drained
    }

    pub const fn num_invalid_actions(&self) -> u32 {
        self.num_invalid_actions
    }

    pub fn actions_taken(&self) -> &[NavAction] {
        &self.actions_taken
    }

    pub fn positions(&self) -> &[PathPoint] {
        &self.positions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
