use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Observation key under which the agent pose sensor publishes.
pub const AGENT_POSE_UUID: &str = "agent_position_and_rotation";

// ---------------------------------------------------------------------------
// Pose / Point3
// ---------------------------------------------------------------------------

/// Agent pose as reported by the pose sensor: position plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Heading in degrees.
    pub heading_deg: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, z: f64, heading_deg: f64) -> Self {
        Self {
            x,
            y,
            z,
            heading_deg,
        }
    }

    /// `[x, y, z, heading_deg]`, the layout of the pose observation.
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.heading_deg]
    }

    /// Parse the 4-value pose observation. Returns `None` on any other length.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            &[x, y, z, heading_deg] => Some(Self::new(x, y, z, heading_deg)),
            _ => None,
        }
    }

    /// Bitwise equality on every component.
    ///
    /// Unlike `==`, two NaN components with the same bits compare equal and
    /// `0.0` differs from `-0.0`.
    pub fn bit_identical(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Goal location in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3(pub [f64; 3]);

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub const fn x(&self) -> f64 {
        self.0[0]
    }

    pub const fn y(&self) -> f64 {
        self.0[1]
    }

    pub const fn z(&self) -> f64 {
        self.0[2]
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A single rendered image, row-major, `channels` values per pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub data: Vec<f32>,
}

impl Frame {
    pub fn zeros(width: u32, height: u32, channels: u32) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![0.0; len],
        }
    }

    /// Number of pixels (`width * height`).
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// The simulator's current frame bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSet {
    pub rgb: Frame,
    pub depth: Frame,
}

impl FrameSet {
    /// Blank rgb (3-channel) and depth (1-channel) frames.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            rgb: Frame::zeros(width, height, 3),
            depth: Frame::zeros(width, height, 1),
        }
    }

    pub const fn get(&self, mode: RenderMode) -> &Frame {
        match mode {
            RenderMode::Rgb => &self.rgb,
            RenderMode::Depth => &self.depth,
        }
    }
}

/// Which frame to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Rgb,
    Depth,
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb" => Ok(Self::Rgb),
            "depth" => Ok(Self::Depth),
            other => Err(RenderError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => f.write_str("rgb"),
            Self::Depth => f.write_str("depth"),
        }
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// One sensor's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorReading {
    Values(Vec<f64>),
    Frame(Frame),
}

impl SensorReading {
    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            Self::Values(v) => Some(v),
            Self::Frame(_) => None,
        }
    }

    pub const fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(f) => Some(f),
            Self::Values(_) => None,
        }
    }
}

/// Sensor readings keyed by sensor uuid.
///
/// The task treats this mapping as opaque, apart from the agent pose entry
/// under [`AGENT_POSE_UUID`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    readings: BTreeMap<String, SensorReading>,
}

impl Observations {
    pub const fn new() -> Self {
        Self {
            readings: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, uuid: impl Into<String>, reading: SensorReading) {
        self.readings.insert(uuid.into(), reading);
    }

    pub fn get(&self, uuid: &str) -> Option<&SensorReading> {
        self.readings.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    /// The agent pose, when a pose sensor is registered.
    pub fn agent_pose(&self) -> Option<Pose> {
        self.get(AGENT_POSE_UUID)
            .and_then(SensorReading::as_values)
            .and_then(Pose::from_slice)
    }
}

// ---------------------------------------------------------------------------
// DiscreteSpace
// ---------------------------------------------------------------------------

/// Discrete action space `{0, 1, ..., n-1}`. Follows Gymnasium conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteSpace {
    n: usize,
}

impl DiscreteSpace {
    pub const fn new(n: usize) -> Self {
        Self { n }
    }

    pub const fn n(&self) -> usize {
        self.n
    }

    pub const fn contains(&self, index: usize) -> bool {
        index < self.n
    }
}

// ---------------------------------------------------------------------------
// StepResult
// ---------------------------------------------------------------------------

/// Side information returned with every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Index of the action that was taken.
    pub action: usize,
    /// Outcome of the action. For the end action this is the success flag.
    pub last_action_success: bool,
}

/// The `{observation, reward, done, info}` tuple returned by a task step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observations,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

// ---------------------------------------------------------------------------
// EpisodeIdentity
// ---------------------------------------------------------------------------

/// Scene and episode the simulator is currently running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeIdentity {
    /// Path of the scene asset, e.g. `data/scenes/mp3d/17DRP5sb8fy/17DRP5sb8fy.glb`.
    pub scene_id: String,
    pub episode_id: String,
}

impl EpisodeIdentity {
    pub fn new(scene_id: impl Into<String>, episode_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
            episode_id: episode_id.into(),
        }
    }

    /// Persisted identifier: scene file stem, underscore, episode id.
    ///
    /// ```
    /// use wayfinder_core::types::EpisodeIdentity;
    ///
    /// let ident = EpisodeIdentity::new("data/mp3d/17DRP5sb8fy/17DRP5sb8fy.glb", "42");
    /// assert_eq!(ident.persisted_id(), "17DRP5sb8fy_42");
    /// ```
    pub fn persisted_id(&self) -> String {
        let stem = Path::new(&self.scene_id)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.scene_id);
        format!("{stem}_{}", self.episode_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
