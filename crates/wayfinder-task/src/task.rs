//! The parameterized navigation task.
//!
//! A single [`NavTask`] covers both point-goal and object-goal navigation.
//! The variant is chosen by its [`TaskSpec`]: which [`ActionSet`] it
//! exposes, which optional metric fields it tracks and which
//! [`RewardShaping`] strategy scores each step.

use tracing::{debug, trace, warn};
use wayfinder_core::action::{ActionSet, NavAction};
use wayfinder_core::config::{TaskConfig, TaskKind};
use wayfinder_core::error::{RenderError, SimError};
use wayfinder_core::traits::{PathFollower, Simulator};
use wayfinder_core::types::{
    DiscreteSpace, Frame, Observations, RenderMode, StepInfo, StepResult,
};

use crate::episode::{EpisodeState, Termination};
use crate::error::TaskError;
use crate::expert::{ExpertAction, ExpertOracle};
use crate::metrics::{EpisodeMetrics, PathPoint, TaskInfo, Trajectory};
use crate::reward::{GeodesicShaping, RewardShaping, ShapingInput};
use crate::sensors::SensorSuite;

// ---------------------------------------------------------------------------
// MetricFields
// ---------------------------------------------------------------------------

/// Optional per-episode measurements a variant tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetricFields {
    /// Running minimum of the raw distance-to-goal readings.
    pub min_distance: bool,
    /// Count of steps that left the agent pose bit-identical.
    pub invalid_actions: bool,
    /// Action and position logs merged into the task info.
    pub trajectory: bool,
}

impl MetricFields {
    pub const NONE: Self = Self {
        min_distance: false,
        invalid_actions: false,
        trajectory: false,
    };

    pub const ALL: Self = Self {
        min_distance: true,
        invalid_actions: true,
        trajectory: true,
    };
}

// ---------------------------------------------------------------------------
// TaskSpec
// ---------------------------------------------------------------------------

/// Everything that distinguishes one navigation variant from another.
pub struct TaskSpec {
    pub actions: ActionSet,
    pub fields: MetricFields,
    pub shaping: Box<dyn RewardShaping>,
    pub max_steps: u32,
    pub success_distance: f64,
}

impl TaskSpec {
    /// Point-goal navigation with default budget and shaping.
    pub fn point_nav() -> Self {
        Self::from_config(&TaskConfig::for_kind(TaskKind::PointNav))
    }

    /// Object-goal navigation with default budget and shaping.
    pub fn object_nav() -> Self {
        Self::from_config(&TaskConfig::for_kind(TaskKind::ObjectNav))
    }

    /// Build the [`TaskSpec`] described by a validated configuration.
    pub fn from_config(config: &TaskConfig) -> Self {
        let fields = match config.kind {
            TaskKind::PointNav => MetricFields::NONE,
            TaskKind::ObjectNav => MetricFields::ALL,
        };
        Self {
            actions: config.kind.action_set(),
            fields,
            shaping: Box::new(GeodesicShaping::from(config.reward)),
            max_steps: config.max_steps,
            success_distance: config.success_distance,
        }
    }

    /// Builder: replace the reward strategy.
    #[must_use]
    pub fn with_shaping(mut self, shaping: impl RewardShaping) -> Self {
        self.shaping = Box::new(shaping);
        self
    }

    /// Builder: replace the tracked metric fields.
    #[must_use]
    pub const fn with_fields(mut self, fields: MetricFields) -> Self {
        self.fields = fields;
        self
    }

    /// Builder: set the step budget.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }
}

// ---------------------------------------------------------------------------
// NavTask
// ---------------------------------------------------------------------------

/// One navigation episode driven against an exclusively owned simulator.
///
/// The caller steps the task until [`is_done`](Self::is_done), then reads
/// [`metrics`](Self::metrics) exactly once. A new episode needs a new task.
pub struct NavTask<S: Simulator, F: PathFollower> {
    sim: S,
    sensors: SensorSuite<S>,
    expert: ExpertOracle<F>,
    spec: TaskSpec,
    task_info: TaskInfo,
    state: EpisodeState,
    num_steps_taken: u32,
    episode_id: String,
}

impl<S: Simulator, F: PathFollower> NavTask<S, F> {
    /// Start an episode on `sim`, which must already have the episode loaded.
    pub fn new(
        sim: S,
        follower: F,
        sensors: SensorSuite<S>,
        spec: TaskSpec,
        task_info: TaskInfo,
    ) -> Self {
        let initial_distance = sim.distance_to_goal();
        let state = EpisodeState::new(initial_distance, spec.fields.min_distance);
        let expert = ExpertOracle::new(follower, spec.success_distance, spec.actions);
        let episode_id = sim.current_episode().persisted_id();

        debug!(
            %episode_id,
            ?initial_distance,
            actions = spec.actions.len(),
            max_steps = spec.max_steps,
            shaping = spec.shaping.name(),
            "navigation task created"
        );

        Self {
            sim,
            sensors,
            expert,
            spec,
            task_info,
            state,
            num_steps_taken: 0,
            episode_id,
        }
    }

    /// Apply the action at `index` and advance the episode by one step.
    pub fn step(&mut self, index: usize) -> Result<StepResult, TaskError> {
        let action = self.spec.actions.action_at(index)?;
        let was_done = self.is_done();
        if was_done {
            warn!(episode_id = %self.episode_id, %action, "stepping a finished episode");
        }
        self.state.record_action(index, action);

        let track_pose = self.spec.fields.invalid_actions || self.spec.fields.trajectory;
        let pose_before = if track_pose {
            self.sensors.agent_pose(&self.sim)
        } else {
            None
        };
        if self.spec.fields.trajectory {
            self.state.log_action(action);
            if let Some(pose) = pose_before {
                self.state.log_position(PathPoint::from(pose));
            }
        }

        self.sim.step(action)?;

        let newly_ended = action.is_end() && !self.state.took_end_action();
        if action.is_end() {
            // The outcome is frozen once the episode has terminated.
            let success = if was_done {
                self.state.success()
            } else {
                self.is_goal_in_range()
            };
            self.state.record_end(success);
            debug!(episode_id = %self.episode_id, success, "end action taken");
        } else {
            self.state.record_action_success(self.sim.last_action_success());
        }

        let distances = self.state.observe_distance(self.sim.distance_to_goal());
        let reward = self.spec.shaping.compute(&ShapingInput {
            previous_distance: distances.previous,
            new_distance: distances.current,
            took_end_action: newly_ended,
            success: self.state.success(),
        });
        self.state.push_reward(reward);
        trace!(step = self.num_steps_taken, %action, reward, distance = distances.current, "step");

        self.num_steps_taken = self.num_steps_taken.saturating_add(1);
        let done = self.is_done();

        if self.spec.fields.invalid_actions {
            let pose_after = self.sensors.agent_pose(&self.sim);
            if let (Some(before), Some(after)) = (pose_before, pose_after) {
                if before.bit_identical(&after) {
                    self.state.record_invalid_action();
                }
            }
        }

        if done && !was_done {
            debug!(
                episode_id = %self.episode_id,
                steps = self.num_steps_taken,
                termination = ?self.termination(),
                success = self.state.success(),
                "episode finished"
            );
        }

        Ok(StepResult {
            observation: self.sensors.observe(&self.sim),
            reward,
            done,
            info: StepInfo {
                action: index,
                last_action_success: self.state.last_action_success().unwrap_or(false),
            },
        })
    }

    /// Whether the goal is currently within the success distance.
    ///
    /// Authoritative success predicate: the simulator's SPL is nonzero exactly
    /// when the goal is reachable within the threshold.
    pub fn is_goal_in_range(&self) -> bool {
        self.sim.spl().is_some_and(|spl| spl != 0.0)
    }

    pub fn is_done(&self) -> bool {
        self.termination().is_some()
    }

    /// Why the episode ended, or `None` while it is still running.
    pub fn termination(&self) -> Option<Termination> {
        if self.state.took_end_action() {
            Some(Termination::EndAction)
        } else if self.sim.episode_over() {
            Some(Termination::SimulatorEpisodeOver)
        } else if self.num_steps_taken >= self.spec.max_steps {
            Some(Termination::StepBudget)
        } else {
            None
        }
    }

    /// Drain the finished episode's summary.
    ///
    /// Returns `None` while the episode is running (nothing is cleared) and
    /// on any read after the first successful one. Variants tracking a
    /// trajectory refresh it in the task info on every call, done or not.
    pub fn metrics(&mut self) -> Option<EpisodeMetrics> {
        if self.spec.fields.trajectory {
            self.task_info.episode_id = Some(self.episode_id.clone());
            self.task_info.trajectory = Some(Trajectory {
                taken_actions: self.state.actions_taken().to_vec(),
                action_names: self
                    .spec
                    .actions
                    .names()
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                followed_path: self.state.positions().to_vec(),
            });
        }

        if !self.is_done() || self.state.rewards_drained() {
            return None;
        }

        let total_reward: f64 = self.state.drain_rewards().iter().sum();
        let fields = self.spec.fields;
        Some(EpisodeMetrics {
            success: self.state.success(),
            ep_length: self.num_steps_taken,
            total_reward,
            spl: self.sim.spl().unwrap_or(0.0),
            min_distance_to_target: if fields.min_distance {
                self.state.min_distance_to_goal()
            } else {
                None
            },
            num_invalid_actions: fields
                .invalid_actions
                .then(|| self.state.num_invalid_actions()),
            task_info: fields.trajectory.then(|| self.task_info.clone()),
        })
    }

    /// Expert label for the current state.
    pub fn query_expert(&mut self) -> ExpertAction {
        let in_range = self.is_goal_in_range();
        let pose = self.sim.agent_pose();
        self.expert
            .next_expert_action(in_range, &pose, &self.task_info.target)
    }

    pub fn render(&self, mode: RenderMode) -> &Frame {
        self.sim.current_frame().get(mode)
    }

    /// Render by mode name. Anything but `rgb` or `depth` is rejected.
    pub fn render_named(&self, mode: &str) -> Result<&Frame, RenderError> {
        Ok(self.render(mode.parse()?))
    }

    /// Stop the underlying simulator.
    pub fn close(&mut self) -> Result<(), SimError> {
        debug!(episode_id = %self.episode_id, "closing task");
        self.sim.stop()
    }

    /// Read every sensor without stepping.
    pub fn current_observations(&self) -> Observations {
        self.sensors.observe(&self.sim)
    }

    /// The simulator's own episode-over flag.
    pub fn reached_terminal_state(&self) -> bool {
        self.sim.episode_over()
    }

    pub const fn last_action(&self) -> Option<NavAction> {
        self.state.last_action()
    }

    pub const fn last_action_success(&self) -> Option<bool> {
        self.state.last_action_success()
    }

    pub const fn action_space(&self) -> DiscreteSpace {
        self.spec.actions.action_space()
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.spec.actions.names()
    }

    pub const fn actions(&self) -> ActionSet {
        self.spec.actions
    }

    pub const fn task_info(&self) -> &TaskInfo {
        &self.task_info
    }

    /// Persisted identifier: `<scene file stem>_<episode id>`.
    pub fn episode_id(&self) -> &str {
        &self.episode_id
    }

    pub const fn num_steps_taken(&self) -> u32 {
        self.num_steps_taken
    }

    pub const fn max_steps(&self) -> u32 {
        self.spec.max_steps
    }

    pub const fn episode_state(&self) -> &EpisodeState {
        &self.state
    }

    pub const fn simulator(&self) -> &S {
        &self.sim
    }

    pub const fn expert(&self) -> &ExpertOracle<F> {
        &self.expert
    }

    /// Give back the simulator and follower, ending the task.
    pub fn into_parts(self) -> (S, F) {
        (self.sim, self.expert.into_follower())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use wayfinder_core::types::{Point3, Pose};
    use wayfinder_test_utils::{ScriptedFollower, ScriptedSimulator, StepScript};

    use crate::sensors::{AgentPoseSensor, FrameSensor};

    type TestTask = NavTask<ScriptedSimulator, ScriptedFollower>;

    fn point_nav(sim: ScriptedSimulator) -> TestTask {
        NavTask::new(
            sim,
            ScriptedFollower::silent(),
            SensorSuite::new().with(AgentPoseSensor).with(FrameSensor::rgb()),
            TaskSpec::point_nav(),
            TaskInfo::new(Point3::new(1.0, 0.0, -4.0)),
        )
    }

    fn object_nav(sim: ScriptedSimulator) -> TestTask {
        NavTask::new(
            sim,
            ScriptedFollower::silent(),
            SensorSuite::new().with(AgentPoseSensor),
            TaskSpec::object_nav(),
            TaskInfo::new(Point3::new(1.0, 0.0, -4.0)).with_extra("object_type", "chair"),
        )
    }

    // -- TaskSpec --

    #[test]
    fn presets() {
        let point = TaskSpec::point_nav();
        assert_eq!(point.actions, ActionSet::POINT_NAV);
        assert_eq!(point.fields, MetricFields::NONE);
        assert_eq!(point.max_steps, 500);

        let object = TaskSpec::object_nav();
        assert_eq!(object.actions, ActionSet::OBJECT_NAV);
        assert_eq!(object.fields, MetricFields::ALL);
        assert_eq!(object.shaping.name(), "GeodesicShaping");
    }

    #[test]
    fn from_config_uses_budget_and_radius() {
        let config = TaskConfig::for_kind(TaskKind::ObjectNav)
            .with_max_steps(20)
            .with_success_distance(1.0);
        let spec = TaskSpec::from_config(&config);
        assert_eq!(spec.max_steps, 20);
        assert_abs_diff_eq!(spec.success_distance, 1.0, epsilon = 1e-12);
    }

    // -- Construction --

    #[test]
    fn new_task_is_running() {
        let task = point_nav(ScriptedSimulator::new(Some(5.0)));
        assert!(!task.is_done());
        assert!(task.termination().is_none());
        assert_eq!(task.num_steps_taken(), 0);
        assert!(task.last_action().is_none());
        assert_abs_diff_eq!(task.episode_state().last_geodesic_distance(), 5.0, epsilon = 1e-12);
        assert_eq!(task.action_space().n(), 4);
        assert_eq!(task.action_names(), vec!["MOVE_FORWARD", "TURN_LEFT", "TURN_RIGHT", "STOP"]);
    }

    #[test]
    fn new_configures_follower() {
        let task = point_nav(ScriptedSimulator::new(Some(5.0)));
        assert_eq!(
            task.expert().follower().configured(),
            Some((0.2, wayfinder_core::traits::FollowerMode::GeodesicPath))
        );
    }

    #[test]
    fn episode_id_from_scene_stem() {
        let sim = ScriptedSimulator::new(Some(1.0))
            .with_identity("data/scene_datasets/mp3d/2azQ1b91cZZ/2azQ1b91cZZ.glb", "17");
        assert_eq!(point_nav(sim).episode_id(), "2azQ1b91cZZ_17");
    }

    // -- Step --

    #[test]
    fn step_dispatches_named_action() {
        let mut task = point_nav(ScriptedSimulator::new(Some(5.0)).then_distances(&[4.0]));
        let result = task.step(0).unwrap();
        assert_eq!(task.simulator().dispatched(), &[NavAction::MoveAhead]);
        assert_eq!(task.last_action(), Some(NavAction::MoveAhead));
        assert_abs_diff_eq!(result.reward, 0.99, epsilon = 1e-12);
        assert!(!result.done);
        assert_eq!(result.info, StepInfo { action: 0, last_action_success: true });
        assert_eq!(result.observation.len(), 2);
    }

    #[test]
    fn blocked_move_reports_failure() {
        let sim = ScriptedSimulator::new(Some(2.0)).then(StepScript::distance(2.0).blocked());
        let mut task = point_nav(sim);
        let result = task.step(0).unwrap();
        assert!(!result.info.last_action_success);
        assert_eq!(task.last_action_success(), Some(false));
        assert_abs_diff_eq!(result.reward, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_dispatch() {
        let mut task = point_nav(ScriptedSimulator::new(Some(2.0)));
        let err = task.step(4).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        assert!(task.simulator().dispatched().is_empty());
        assert_eq!(task.num_steps_taken(), 0);
    }

    #[test]
    fn camera_actions_only_in_object_nav() {
        let mut point = point_nav(ScriptedSimulator::new(Some(2.0)));
        assert!(point.step(4).is_err());
        let mut object = object_nav(ScriptedSimulator::new(Some(2.0)));
        assert!(object.step(4).is_ok());
        assert_eq!(object.last_action(), Some(NavAction::LookUp));
    }

    #[test]
    fn successful_end() {
        let sim = ScriptedSimulator::new(Some(0.1)).with_initial_spl(Some(0.8));
        let mut task = point_nav(sim);
        let result = task.step(3).unwrap();
        assert!(result.done);
        assert!(result.info.last_action_success);
        assert_abs_diff_eq!(result.reward, 9.99, epsilon = 1e-12);
        assert_eq!(task.termination(), Some(Termination::EndAction));
    }

    #[test]
    fn failed_end() {
        let mut task = point_nav(ScriptedSimulator::new(Some(3.0)));
        let result = task.step(3).unwrap();
        assert!(result.done);
        assert!(!result.info.last_action_success);
        assert_abs_diff_eq!(result.reward, -0.01, epsilon = 1e-12);
        assert!(!task.episode_state().success());
    }

    #[test]
    fn end_outcome_is_frozen() {
        let sim = ScriptedSimulator::new(Some(3.0))
            .then(StepScript::distance(3.0))
            .then(StepScript::distance(0.1).in_range(0.9));
        let mut task = point_nav(sim);
        task.step(3).unwrap();
        assert!(!task.episode_state().success());

        // A second end with the goal now in range changes nothing.
        let second = task.step(3).unwrap();
        assert!(task.episode_state().took_end_action());
        assert!(!task.episode_state().success());
        assert!(!second.info.last_action_success);
        // No bonus for the repeated end, only the distance delta.
        assert_abs_diff_eq!(second.reward, -0.01 + 2.9, epsilon = 1e-12);
    }

    #[test]
    fn end_flag_survives_later_steps() {
        let sim = ScriptedSimulator::new(Some(0.1)).with_initial_spl(Some(0.8));
        let mut task = point_nav(sim);
        assert_abs_diff_eq!(task.step(3).unwrap().reward, 9.99, epsilon = 1e-12);

        let later = task.step(0).unwrap();
        assert!(later.done);
        assert!(task.is_done());
        assert!(task.episode_state().took_end_action());
        assert!(task.episode_state().success());
        assert_eq!(task.termination(), Some(Termination::EndAction));
        // Step penalty plus a zero distance delta, no second bonus.
        assert_abs_diff_eq!(later.reward, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn step_budget_terminates() {
        let sim = ScriptedSimulator::new(Some(5.0)).then_distances(&[5.0, 5.0, 5.0]);
        let mut task = NavTask::new(
            sim,
            ScriptedFollower::silent(),
            SensorSuite::new(),
            TaskSpec::point_nav().with_max_steps(2),
            TaskInfo::new(Point3::new(0.0, 0.0, 0.0)),
        );
        assert!(!task.step(1).unwrap().done);
        assert!(task.step(1).unwrap().done);
        assert_eq!(task.termination(), Some(Termination::StepBudget));
        assert!(!task.reached_terminal_state());
    }

    #[test]
    fn simulator_episode_over_terminates() {
        let sim = ScriptedSimulator::new(Some(5.0)).then(StepScript::distance(4.0).ending_episode());
        let mut task = point_nav(sim);
        assert!(task.step(0).unwrap().done);
        assert_eq!(task.termination(), Some(Termination::SimulatorEpisodeOver));
        assert!(task.reached_terminal_state());
        assert!(!task.episode_state().took_end_action());
    }

    #[test]
    fn simulator_error_propagates() {
        let mut sim = ScriptedSimulator::new(Some(5.0));
        sim.fail_next_step("scene unloaded");
        let mut task = point_nav(sim);
        let err = task.step(0).unwrap_err();
        assert!(matches!(err, TaskError::Simulator(SimError::StepFailed(_))));
        assert!(task.episode_state().rewards().is_empty());
    }

    // -- Invalid actions and trajectory --

    #[test]
    fn unchanged_pose_counts_as_invalid() {
        let sim = ScriptedSimulator::new(Some(5.0))
            .then(StepScript::distance(4.75))
            .then(StepScript::distance(4.75).blocked())
            .then(StepScript::distance(4.75));
        let mut task = object_nav(sim);
        task.step(0).unwrap(); // moves
        task.step(0).unwrap(); // blocked
        task.step(4).unwrap(); // look up, body stays put
        assert_eq!(task.episode_state().num_invalid_actions(), 2);
    }

    #[test]
    fn point_nav_does_not_count_invalid_actions() {
        let sim = ScriptedSimulator::new(Some(5.0)).then(StepScript::distance(5.0).blocked());
        let mut task = point_nav(sim);
        task.step(0).unwrap();
        assert_eq!(task.episode_state().num_invalid_actions(), 0);
        assert!(task.episode_state().actions_taken().is_empty());
    }

    #[test]
    fn trajectory_logs_pre_action_pose() {
        let sim = ScriptedSimulator::new(Some(5.0)).with_pose(Pose::new(1.0, 0.5, 2.0, 90.0));
        let mut task = object_nav(sim);
        task.step(1).unwrap();
        task.step(0).unwrap();
        let state = task.episode_state();
        assert_eq!(state.actions_taken(), &[NavAction::RotateLeft, NavAction::MoveAhead]);
        assert_eq!(state.positions()[0], PathPoint { x: 1.0, y: 0.5, path_to_rot_degrees: 90.0 });
        assert_abs_diff_eq!(state.positions()[1].path_to_rot_degrees, 120.0, epsilon = 1e-12);
    }

    // -- Metrics --

    #[test]
    fn metrics_empty_while_running() {
        let mut task = point_nav(ScriptedSimulator::new(Some(5.0)).then_distances(&[4.0]));
        task.step(0).unwrap();
        assert!(task.metrics().is_none());
        assert_eq!(task.episode_state().rewards().len(), 1);
    }

    #[test]
    fn point_nav_metrics() {
        let sim = ScriptedSimulator::new(Some(0.5))
            .then_distances(&[0.25])
            .then(StepScript::distance(0.25).in_range(0.75));
        let mut task = point_nav(sim);
        task.step(0).unwrap();
        task.step(3).unwrap();
        let metrics = task.metrics().unwrap();
        assert!(metrics.success);
        assert_eq!(metrics.ep_length, 2);
        assert_abs_diff_eq!(metrics.total_reward, 0.24 + 9.99, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.spl, 0.75, epsilon = 1e-12);
        assert!(metrics.min_distance_to_target.is_none());
        assert!(metrics.num_invalid_actions.is_none());
        assert!(metrics.task_info.is_none());
        assert!(task.metrics().is_none());
    }

    #[test]
    fn missing_spl_reads_as_zero() {
        let sim = ScriptedSimulator::new(Some(1.0)).then(StepScript::reading(Some(1.0)).with_spl(None));
        let mut task = point_nav(sim);
        task.step(3).unwrap();
        let metrics = task.metrics().unwrap();
        assert!(!metrics.success);
        assert_abs_diff_eq!(metrics.spl, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn object_nav_metrics_carry_extras() {
        let sim = ScriptedSimulator::new(Some(3.0))
            .then_distances(&[2.75])
            .then(StepScript::distance(2.75));
        let mut task = object_nav(sim);
        task.step(0).unwrap();
        task.step(3).unwrap();
        let metrics = task.metrics().unwrap();
        assert_eq!(metrics.min_distance_to_target, Some(2.75));
        assert_eq!(metrics.num_invalid_actions, Some(1));
        let info = metrics.task_info.unwrap();
        assert_eq!(info.episode_id.as_deref(), Some("skokloster-castle_0"));
        let trajectory = info.trajectory.unwrap();
        assert_eq!(trajectory.taken_actions, vec![NavAction::MoveAhead, NavAction::End]);
        assert_eq!(trajectory.action_names, ActionSet::OBJECT_NAV.names());
        assert_eq!(trajectory.followed_path.len(), 2);
        assert_eq!(info.extra["object_type"], "chair");
    }

    #[test]
    fn trajectory_attached_before_done() {
        let mut task = object_nav(ScriptedSimulator::new(Some(3.0)).then_distances(&[2.75]));
        task.step(0).unwrap();
        assert!(task.metrics().is_none());
        let trajectory = task.task_info().trajectory.as_ref().unwrap();
        assert_eq!(trajectory.taken_actions, vec![NavAction::MoveAhead]);
        assert_eq!(
            trajectory.action_names,
            vec!["MOVE_FORWARD", "TURN_LEFT", "TURN_RIGHT", "STOP", "LOOK_UP", "LOOK_DOWN"]
        );
        assert_eq!(task.task_info().episode_id.as_deref(), Some("skokloster-castle_0"));
    }

    // -- Expert, render, lifecycle --

    #[test]
    fn query_expert_uses_current_pose_and_target() {
        let sim = ScriptedSimulator::new(Some(3.0)).with_pose(Pose::new(0.5, 0.0, 0.5, 0.0));
        let mut task = NavTask::new(
            sim,
            ScriptedFollower::new([Some(NavAction::RotateRight)]),
            SensorSuite::new(),
            TaskSpec::point_nav(),
            TaskInfo::new(Point3::new(1.0, 0.0, -4.0)),
        );
        assert_eq!(task.query_expert(), ExpertAction::valid(2));
        assert_eq!(
            task.expert().follower().queries(),
            &[(Pose::new(0.5, 0.0, 0.5, 0.0), Point3::new(1.0, 0.0, -4.0))]
        );
    }

    #[test]
    fn query_expert_in_range_returns_end() {
        let sim = ScriptedSimulator::new(Some(0.1)).with_initial_spl(Some(1.0));
        let mut task = point_nav(sim);
        assert_eq!(task.query_expert(), ExpertAction::valid(3));
        assert!(task.expert().follower().queries().is_empty());
    }

    #[test]
    fn render_modes() {
        let task = point_nav(ScriptedSimulator::new(Some(1.0)));
        assert_eq!(task.render(RenderMode::Rgb).channels, 3);
        assert_eq!(task.render(RenderMode::Depth).channels, 1);
        assert_eq!(task.render_named("depth").map(|f| f.channels), Ok(1));
        assert!(matches!(
            task.render_named("semantic"),
            Err(RenderError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn close_stops_simulator() {
        let mut task = point_nav(ScriptedSimulator::new(Some(1.0)));
        task.close().unwrap();
        assert!(task.simulator().is_stopped());
    }

    #[test]
    fn current_observations_do_not_step() {
        let task = point_nav(ScriptedSimulator::new(Some(1.0)));
        let obs = task.current_observations();
        assert_eq!(obs.agent_pose(), Some(Pose::new(0.0, 0.0, 0.0, 0.0)));
        assert!(task.simulator().dispatched().is_empty());
    }

    #[test]
    fn into_parts_returns_collaborators() {
        let mut task = point_nav(ScriptedSimulator::new(Some(1.0)).then_distances(&[0.75]));
        task.step(0).unwrap();
        let (sim, follower) = task.into_parts();
        assert_eq!(sim.dispatched(), &[NavAction::MoveAhead]);
        assert!(follower.configured().is_some());
    }
}
