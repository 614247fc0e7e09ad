//! Reward shaping strategies for navigation tasks.

use wayfinder_core::config::RewardConfig;

/// Replace an invalid distance reading (missing, NaN or infinite) with `fallback`.
///
/// ```
/// use wayfinder_task::reward::sanitize_distance;
///
/// assert_eq!(sanitize_distance(Some(2.5), 1.0), 2.5);
/// assert_eq!(sanitize_distance(Some(f64::NAN), 1.0), 1.0);
/// assert_eq!(sanitize_distance(None, 1.0), 1.0);
/// ```
pub fn sanitize_distance(reading: Option<f64>, fallback: f64) -> f64 {
    reading.filter(|d| d.is_finite()).unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// ShapingInput
// ---------------------------------------------------------------------------

/// Everything a shaping strategy may look at for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapingInput {
    /// Guarded distance to the goal before the step.
    pub previous_distance: f64,
    /// Guarded distance to the goal after the step.
    pub new_distance: f64,
    /// Whether the end action was issued on this step for the first time.
    pub took_end_action: bool,
    /// Episode outcome; only meaningful once `took_end_action` is set.
    pub success: bool,
}

/// Computes the scalar reward for one step.
pub trait RewardShaping: Send + Sync + 'static {
    fn compute(&self, input: &ShapingInput) -> f64;

    /// Human-readable name for this strategy.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// GeodesicShaping
// ---------------------------------------------------------------------------

/// Potential-based shaping on geodesic distance.
///
/// `step_penalty + (previous - new)`, plus `success_reward` once the end
/// action is taken with the goal in range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicShaping {
    step_penalty: f64,
    success_reward: f64,
}

impl GeodesicShaping {
    #[must_use]
    pub const fn new(step_penalty: f64, success_reward: f64) -> Self {
        Self {
            step_penalty,
            success_reward,
        }
    }

    pub const fn step_penalty(&self) -> f64 {
        self.step_penalty
    }

    pub const fn success_reward(&self) -> f64 {
        self.success_reward
    }
}

impl Default for GeodesicShaping {
    fn default() -> Self {
        Self::from(RewardConfig::default())
    }
}

impl From<RewardConfig> for GeodesicShaping {
    fn from(config: RewardConfig) -> Self {
        Self::new(config.step_penalty, config.success_reward)
    }
}

impl RewardShaping for GeodesicShaping {
    fn compute(&self, input: &ShapingInput) -> f64 {
        // Accumulation order matters for bit-exact totals.
        let mut reward = self.step_penalty;
        reward += input.previous_distance - input.new_distance;
        if input.took_end_action {
            reward += if input.success {
                self.success_reward
            } else {
                0.0
            };
        }
        reward
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "GeodesicShaping"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
