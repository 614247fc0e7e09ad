//! Discrete navigation actions and the ordered action sets of each task variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::DiscreteSpace;

// ---------------------------------------------------------------------------
// NavAction
// ---------------------------------------------------------------------------

/// A named action understood by the navigation simulator.
///
/// Serialises to (and parses from) the simulator-facing name, e.g.
/// `MoveAhead` <-> `"MOVE_FORWARD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavAction {
    #[serde(rename = "MOVE_FORWARD")]
    MoveAhead,
    #[serde(rename = "TURN_LEFT")]
    RotateLeft,
    #[serde(rename = "TURN_RIGHT")]
    RotateRight,
    /// Terminal action: the agent declares it has reached the goal.
    #[serde(rename = "STOP")]
    End,
    #[serde(rename = "LOOK_UP")]
    LookUp,
    #[serde(rename = "LOOK_DOWN")]
    LookDown,
}

impl NavAction {
    /// Simulator-facing name of this action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MoveAhead => "MOVE_FORWARD",
            Self::RotateLeft => "TURN_LEFT",
            Self::RotateRight => "TURN_RIGHT",
            Self::End => "STOP",
            Self::LookUp => "LOOK_UP",
            Self::LookDown => "LOOK_DOWN",
        }
    }

    /// Whether this is the episode-ending action.
    pub const fn is_end(self) -> bool {
        matches!(self, Self::End)
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NavAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOVE_FORWARD" => Ok(Self::MoveAhead),
            "TURN_LEFT" => Ok(Self::RotateLeft),
            "TURN_RIGHT" => Ok(Self::RotateRight),
            "STOP" => Ok(Self::End),
            "LOOK_UP" => Ok(Self::LookUp),
            "LOOK_DOWN" => Ok(Self::LookDown),
            other => Err(format!("unknown navigation action: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionSet
// ---------------------------------------------------------------------------

/// Ordered, immutable list of the actions a task variant permits.
///
/// The position of an action in the set is its discrete action index.
///
/// ```
/// use wayfinder_core::action::{ActionSet, NavAction};
///
/// let set = ActionSet::POINT_NAV;
/// assert_eq!(set.len(), 4);
/// assert_eq!(set.index_of(NavAction::End), Some(3));
/// assert_eq!(set.action_at(1), Ok(NavAction::RotateLeft));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet {
    actions: &'static [NavAction],
}

impl ActionSet {
    /// Goal-point navigation: move, turn, stop.
    pub const POINT_NAV: Self = Self {
        actions: &[
            NavAction::MoveAhead,
            NavAction::RotateLeft,
            NavAction::RotateRight,
            NavAction::End,
        ],
    };

    /// Object-goal navigation: point-nav actions plus camera tilt.
    pub const OBJECT_NAV: Self = Self {
        actions: &[
            NavAction::MoveAhead,
            NavAction::RotateLeft,
            NavAction::RotateRight,
            NavAction::End,
            NavAction::LookUp,
            NavAction::LookDown,
        ],
    };

    /// Build a set from an arbitrary static action list.
    pub const fn new(actions: &'static [NavAction]) -> Self {
        Self { actions }
    }

    /// Action at `index`.
    ///
    /// Indices outside `[0, len)` are a caller error; they are never clamped.
    pub fn action_at(&self, index: usize) -> Result<NavAction, ValidationError> {
        self.actions
            .get(index)
            .copied()
            .ok_or(ValidationError::ActionOutOfRange {
                index,
                len: self.actions.len(),
            })
    }

    /// Position of `action` in the set, if it is permitted.
    pub fn index_of(&self, action: NavAction) -> Option<usize> {
        self.actions.iter().position(|&a| a == action)
    }

    pub const fn len(&self) -> usize {
        self.actions.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub const fn as_slice(&self) -> &'static [NavAction] {
        self.actions
    }

    /// Simulator-facing names, in index order.
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Discrete action space sized to this set.
    pub const fn action_space(&self) -> DiscreteSpace {
        DiscreteSpace::new(self.actions.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
