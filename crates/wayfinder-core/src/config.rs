use serde::{Deserialize, Serialize};

use crate::action::ActionSet;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_steps() -> u32 {
    500
}
const fn default_success_distance() -> f64 {
    0.2
}
const fn default_step_penalty() -> f64 {
    -0.01
}
const fn default_success_reward() -> f64 {
    10.0
}

// ---------------------------------------------------------------------------
// TaskKind
// ---------------------------------------------------------------------------

/// Which navigation variant to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Navigate to a goal coordinate.
    #[default]
    PointNav,
    /// Navigate to an instance of an object category; tracks extra metrics.
    ObjectNav,
}

impl TaskKind {
    pub const fn action_set(self) -> ActionSet {
        match self {
            Self::PointNav => ActionSet::POINT_NAV,
            Self::ObjectNav => ActionSet::OBJECT_NAV,
        }
    }
}

// ---------------------------------------------------------------------------
// RewardConfig
// ---------------------------------------------------------------------------

/// Constants of the geodesic reward shaping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Applied on every step (default: -0.01).
    #[serde(default = "default_step_penalty")]
    pub step_penalty: f64,

    /// Bonus when the end action is taken with the goal in range (default: 10.0).
    #[serde(default = "default_success_reward")]
    pub success_reward: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_penalty: default_step_penalty(),
            success_reward: default_success_reward(),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskConfig
// ---------------------------------------------------------------------------

/// Navigation task configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub kind: TaskKind,

    /// Step budget per episode (default: 500).
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Radius around the goal that counts as success, in meters (default: 0.2).
    /// Handed to the path follower.
    #[serde(default = "default_success_distance")]
    pub success_distance: f64,

    #[serde(default)]
    pub reward: RewardConfig,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            kind: TaskKind::default(),
            max_steps: default_max_steps(),
            success_distance: default_success_distance(),
            reward: RewardConfig::default(),
        }
    }
}

impl TaskConfig {
    /// Defaults for the given variant.
    pub fn for_kind(kind: TaskKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Builder: set the step budget.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builder: set the success distance.
    #[must_use]
    pub const fn with_success_distance(mut self, success_distance: f64) -> Self {
        self.success_distance = success_distance;
        self
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if !self.success_distance.is_finite() || self.success_distance <= 0.0 {
            return Err(ConfigError::InvalidSuccessDistance(self.success_distance));
        }
        for (field, value) in [
            ("reward.step_penalty", self.reward.step_penalty),
            ("reward.success_reward", self.reward.success_reward),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
