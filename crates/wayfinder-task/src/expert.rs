//! Expert (oracle) action adapter over an external shortest-path follower.

use tracing::warn;
use wayfinder_core::action::{ActionSet, NavAction};
use wayfinder_core::traits::{FollowerMode, PathFollower};
use wayfinder_core::types::{Point3, Pose};

/// An expert label for the current step.
///
/// When `is_valid` is false the follower produced nothing usable and
/// `action` carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpertAction {
    pub action: usize,
    pub is_valid: bool,
}

impl ExpertAction {
    pub const fn valid(action: usize) -> Self {
        Self {
            action,
            is_valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            action: 0,
            is_valid: false,
        }
    }

    /// The action index, only when valid.
    pub const fn index(self) -> Option<usize> {
        if self.is_valid { Some(self.action) } else { None }
    }
}

/// Maps follower suggestions onto a task's action indices.
pub struct ExpertOracle<F> {
    follower: F,
    actions: ActionSet,
}

impl<F: PathFollower> ExpertOracle<F> {
    /// Wrap `follower`, configuring it for geodesic-path traversal with the
    /// given success radius.
    pub fn new(mut follower: F, success_distance: f64, actions: ActionSet) -> Self {
        follower.configure(success_distance, FollowerMode::GeodesicPath);
        Self { follower, actions }
    }

    /// Next expert action toward `target`.
    ///
    /// With the goal already in range the answer is always the end action and
    /// the follower is not consulted.
    pub fn next_expert_action(
        &mut self,
        goal_in_range: bool,
        pose: &Pose,
        target: &Point3,
    ) -> ExpertAction {
        if goal_in_range {
            return self
                .actions
                .index_of(NavAction::End)
                .map_or_else(ExpertAction::invalid, ExpertAction::valid);
        }

        let Some(action) = self.follower.next_action(pose, target) else {
            warn!(?target, "expert follower produced no action");
            return ExpertAction::invalid();
        };

        self.actions.index_of(action).map_or_else(
            || {
                warn!(%action, "expert action is not in the task's action set");
                ExpertAction::invalid()
            },
            ExpertAction::valid,
        )
    }

    pub const fn follower(&self) -> &F {
        &self.follower
    }

    pub fn into_follower(self) -> F {
        self.follower
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
