//! Scripted implementations of the collaborator traits for testing.
//!
//! [`ScriptedSimulator`] replays a queue of per-step readings and applies toy
//! kinematics to the agent pose; [`ScriptedFollower`] replays a queue of
//! expert answers and records how it was called.

use std::collections::VecDeque;

use wayfinder_core::action::NavAction;
use wayfinder_core::error::SimError;
use wayfinder_core::traits::{FollowerMode, PathFollower, Simulator};
use wayfinder_core::types::{EpisodeIdentity, FrameSet, Point3, Pose};

/// Distance covered by one successful `MoveAhead`.
pub const FORWARD_STEP: f64 = 0.25;

/// Heading change of one rotate action, in degrees.
pub const TURN_ANGLE: f64 = 30.0;

// ---------------------------------------------------------------------------
// StepScript
// ---------------------------------------------------------------------------

/// What the simulator reports after one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepScript {
    /// Raw distance-to-goal reading.
    pub distance: Option<f64>,
    /// SPL reading; nonzero means the goal is in range.
    pub spl: Option<f64>,
    /// Whether the action physically succeeded. Blocked actions leave the pose untouched.
    pub action_success: bool,
    /// Force the simulator's episode-over flag.
    pub episode_over: bool,
}

impl StepScript {
    /// A successful step that reports `distance` with the goal out of range.
    pub const fn distance(distance: f64) -> Self {
        Self::reading(Some(distance))
    }

    /// A successful step with an arbitrary raw distance reading.
    pub const fn reading(distance: Option<f64>) -> Self {
        Self {
            distance,
            spl: Some(0.0),
            action_success: true,
            episode_over: false,
        }
    }

    /// Builder: report the goal as in range with the given SPL.
    #[must_use]
    pub const fn in_range(mut self, spl: f64) -> Self {
        self.spl = Some(spl);
        self
    }

    /// Builder: report a specific SPL reading (possibly missing).
    #[must_use]
    pub const fn with_spl(mut self, spl: Option<f64>) -> Self {
        self.spl = spl;
        self
    }

    /// Builder: the action was blocked.
    #[must_use]
    pub const fn blocked(mut self) -> Self {
        self.action_success = false;
        self
    }

    /// Builder: the simulator ends the episode on this step.
    #[must_use]
    pub const fn ending_episode(mut self) -> Self {
        self.episode_over = true;
        self
    }
}

// ---------------------------------------------------------------------------
// ScriptedSimulator
// ---------------------------------------------------------------------------

/// A [`Simulator`] that replays scripted readings, one [`StepScript`] per step.
///
/// When the script runs out, further steps keep the last readings and succeed.
#[derive(Clone, Debug)]
pub struct ScriptedSimulator {
    script: VecDeque<StepScript>,
    distance: Option<f64>,
    spl: Option<f64>,
    last_action_success: bool,
    episode_over: bool,
    pose: Pose,
    frames: FrameSet,
    identity: EpisodeIdentity,
    dispatched: Vec<NavAction>,
    stopped: bool,
    fail_next_step: Option<String>,
}

impl ScriptedSimulator {
    /// Create a simulator whose pre-episode distance reading is `initial_distance`.
    pub fn new(initial_distance: Option<f64>) -> Self {
        Self {
            script: VecDeque::new(),
            distance: initial_distance,
            spl: Some(0.0),
            last_action_success: true,
            episode_over: false,
            pose: Pose::new(0.0, 0.0, 0.0, 0.0),
            frames: FrameSet::blank(4, 4),
            identity: EpisodeIdentity::new("data/scenes/test/skokloster-castle.glb", "0"),
            dispatched: Vec::new(),
            stopped: false,
            fail_next_step: None,
        }
    }

    /// Builder: append one step to the script.
    #[must_use]
    pub fn then(mut self, step: StepScript) -> Self {
        self.script.push_back(step);
        self
    }

    /// Builder: append successful steps reporting each distance in turn.
    #[must_use]
    pub fn then_distances(mut self, distances: &[f64]) -> Self {
        self.script
            .extend(distances.iter().map(|&d| StepScript::distance(d)));
        self
    }

    /// Builder: set the episode identity.
    #[must_use]
    pub fn with_identity(mut self, scene_id: &str, episode_id: &str) -> Self {
        self.identity = EpisodeIdentity::new(scene_id, episode_id);
        self
    }

    /// Builder: set the starting pose.
    #[must_use]
    pub const fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    /// Builder: set the initial SPL reading.
    #[must_use]
    pub const fn with_initial_spl(mut self, spl: Option<f64>) -> Self {
        self.spl = spl;
        self
    }

    /// Make the next `step` call fail with [`SimError::StepFailed`].
    pub fn fail_next_step(&mut self, message: impl Into<String>) {
        self.fail_next_step = Some(message.into());
    }

    /// Every action dispatched so far, in order.
    pub fn dispatched(&self) -> &[NavAction] {
        &self.dispatched
    }

    /// Whether `stop` has been called.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn advance_pose(&mut self, action: NavAction) {
        match action {
            NavAction::MoveAhead => {
                let heading = self.pose.heading_deg.to_radians();
                self.pose.x += FORWARD_STEP * heading.sin();
                self.pose.z -= FORWARD_STEP * heading.cos();
            }
            NavAction::RotateLeft => {
                self.pose.heading_deg = (self.pose.heading_deg + TURN_ANGLE).rem_euclid(360.0);
            }
            NavAction::RotateRight => {
                self.pose.heading_deg = (self.pose.heading_deg - TURN_ANGLE).rem_euclid(360.0);
            }
            // Camera tilt and stopping leave the body where it is.
            NavAction::End | NavAction::LookUp | NavAction::LookDown => {}
        }
    }
}

impl Simulator for ScriptedSimulator {
    fn step(&mut self, action: NavAction) -> Result<(), SimError> {
        if let Some(message) = self.fail_next_step.take() {
            return Err(SimError::StepFailed(message));
        }
        self.dispatched.push(action);

        let step = self.script.pop_front().unwrap_or_else(|| StepScript {
            distance: self.distance,
            spl: self.spl,
            action_success: true,
            episode_over: self.episode_over,
        });

        self.distance = step.distance;
        self.spl = step.spl;
        self.last_action_success = step.action_success;
        self.episode_over |= step.episode_over || action.is_end();

        if step.action_success {
            self.advance_pose(action);
        }
        Ok(())
    }

    fn last_action_success(&self) -> bool {
        self.last_action_success
    }

    fn distance_to_goal(&self) -> Option<f64> {
        self.distance
    }

    fn spl(&self) -> Option<f64> {
        self.spl
    }

    fn episode_over(&self) -> bool {
        self.episode_over
    }

    fn current_frame(&self) -> &FrameSet {
        &self.frames
    }

    fn agent_pose(&self) -> Pose {
        self.pose
    }

    fn current_episode(&self) -> EpisodeIdentity {
        self.identity.clone()
    }

    fn stop(&mut self) -> Result<(), SimError> {
        self.stopped = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedFollower
// ---------------------------------------------------------------------------

/// A [`PathFollower`] that replays a fixed queue of answers.
///
/// Once the queue is empty every query answers `None`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedFollower {
    answers: VecDeque<Option<NavAction>>,
    configured: Option<(f64, FollowerMode)>,
    queries: Vec<(Pose, Point3)>,
}

impl ScriptedFollower {
    pub fn new(answers: impl IntoIterator<Item = Option<NavAction>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            configured: None,
            queries: Vec::new(),
        }
    }

    /// A follower that always answers `None`.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Last `configure` arguments.
    pub const fn configured(&self) -> Option<(f64, FollowerMode)> {
        self.configured
    }

    /// Every `(pose, target)` the follower was asked about.
    pub fn queries(&self) -> &[(Pose, Point3)] {
        &self.queries
    }
}

impl PathFollower for ScriptedFollower {
    fn configure(&mut self, success_distance: f64, mode: FollowerMode) {
        self.configured = Some((success_distance, mode));
    }

    fn next_action(&mut self, pose: &Pose, target: &Point3) -> Option<NavAction> {
        self.queries.push((*pose, *target));
        self.answers.pop_front().flatten()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_distances_in_order() {
        let mut sim = ScriptedSimulator::new(Some(5.0)).then_distances(&[4.0, 3.0]);
        assert_eq!(sim.distance_to_goal(), Some(5.0));
        sim.step(NavAction::MoveAhead).unwrap();
        assert_eq!(sim.distance_to_goal(), Some(4.0));
        sim.step(NavAction::MoveAhead).unwrap();
        assert_eq!(sim.distance_to_goal(), Some(3.0));
    }

    #[test]
    fn exhausted_script_keeps_last_reading() {
        let mut sim = ScriptedSimulator::new(Some(2.0)).then_distances(&[1.5]);
        sim.step(NavAction::MoveAhead).unwrap();
        sim.step(NavAction::RotateLeft).unwrap();
        assert_eq!(sim.distance_to_goal(), Some(1.5));
        assert!(sim.last_action_success());
    }

    #[test]
    fn move_ahead_changes_pose() {
        let mut sim = ScriptedSimulator::new(Some(1.0));
        let before = sim.agent_pose();
        sim.step(NavAction::MoveAhead).unwrap();
        assert!(!before.bit_identical(&sim.agent_pose()));
        assert!((sim.agent_pose().z + FORWARD_STEP).abs() < 1e-12);
    }

    #[test]
    fn rotations_wrap_heading() {
        let mut sim = ScriptedSimulator::new(Some(1.0));
        sim.step(NavAction::RotateRight).unwrap();
        assert!((sim.agent_pose().heading_deg - 330.0).abs() < 1e-12);
        sim.step(NavAction::RotateLeft).unwrap();
        assert!(sim.agent_pose().heading_deg.abs() < 1e-12);
    }

    #[test]
    fn blocked_and_tilt_keep_pose() {
        let mut sim = ScriptedSimulator::new(Some(1.0)).then(StepScript::distance(1.0).blocked());
        let before = sim.agent_pose();
        sim.step(NavAction::MoveAhead).unwrap();
        assert!(!sim.last_action_success());
        assert!(before.bit_identical(&sim.agent_pose()));
        sim.step(NavAction::LookUp).unwrap();
        assert!(before.bit_identical(&sim.agent_pose()));
    }

    #[test]
    fn end_action_ends_episode() {
        let mut sim = ScriptedSimulator::new(Some(1.0));
        assert!(!sim.episode_over());
        sim.step(NavAction::End).unwrap();
        assert!(sim.episode_over());
    }

    #[test]
    fn scripted_failure_is_returned_once() {
        let mut sim = ScriptedSimulator::new(Some(1.0));
        sim.fail_next_step("scene corrupted");
        assert!(matches!(
            sim.step(NavAction::MoveAhead),
            Err(SimError::StepFailed(_))
        ));
        assert!(sim.dispatched().is_empty());
        sim.step(NavAction::MoveAhead).unwrap();
        assert_eq!(sim.dispatched(), &[NavAction::MoveAhead]);
    }

    #[test]
    fn stop_is_recorded() {
        let mut sim = ScriptedSimulator::new(None);
        sim.stop().unwrap();
        assert!(sim.is_stopped());
    }

    #[test]
    fn follower_replays_and_records() {
        let mut follower =
            ScriptedFollower::new([Some(NavAction::RotateLeft), None, Some(NavAction::MoveAhead)]);
        follower.configure(0.2, FollowerMode::GeodesicPath);
        let pose = Pose::new(0.0, 0.0, 0.0, 0.0);
        let target = Point3::new(1.0, 0.0, 1.0);
        assert_eq!(follower.next_action(&pose, &target), Some(NavAction::RotateLeft));
        assert_eq!(follower.next_action(&pose, &target), None);
        assert_eq!(follower.next_action(&pose, &target), Some(NavAction::MoveAhead));
        assert_eq!(follower.next_action(&pose, &target), None);
        assert_eq!(follower.queries().len(), 4);
        assert_eq!(follower.configured(), Some((0.2, FollowerMode::GeodesicPath)));
    }
}
