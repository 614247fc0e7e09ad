use thiserror::Error;

/// Top-level error type for wayfinder-core.
#[derive(Debug, Error)]
pub enum WayfinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulator error: {0}")]
    Simulator(#[from] SimError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid success_distance: {0} (must be finite and > 0)")]
    InvalidSuccessDistance(f64),

    #[error("max_steps must be > 0")]
    ZeroMaxSteps,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures raised by a [`Simulator`](crate::traits::Simulator) backend.
///
/// The task layer never retries or masks these; they reach the caller as-is.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Step failed: {0}")]
    StepFailed(String),

    #[error("Episode already over")]
    EpisodeOver,

    #[error("Scene unavailable: {0}")]
    SceneUnavailable(String),
}

/// Caller contract violations on the action interface.
///
/// Copy + static messages for cheap propagation in the step path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Discrete action out of range: {index} >= {len}")]
    ActionOutOfRange { index: usize, len: usize },
}

/// Rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Render mode not implemented: {0} (expected rgb or depth)")]
    UnsupportedMode(String),
}
