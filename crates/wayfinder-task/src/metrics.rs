//! Episode summaries and descriptive task metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wayfinder_core::action::NavAction;
use wayfinder_core::types::{Point3, Pose};

// ---------------------------------------------------------------------------
// PathPoint
// ---------------------------------------------------------------------------

/// One entry of the followed-path log.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub path_to_rot_degrees: f64,
}

impl From<Pose> for PathPoint {
    /// Keeps pose components 0, 1 and 3.
    fn from(pose: Pose) -> Self {
        Self {
            x: pose.x,
            y: pose.y,
            path_to_rot_degrees: pose.heading_deg,
        }
    }
}

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Action and position logs attached to the task metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub taken_actions: Vec<NavAction>,
    /// The variant's full action set in index order, for decoding indices.
    pub action_names: Vec<String>,
    pub followed_path: Vec<PathPoint>,
}

// ---------------------------------------------------------------------------
// TaskInfo
// ---------------------------------------------------------------------------

/// Descriptive metadata for one episode.
///
/// Carries the navigation target plus any dataset-provided fields in
/// `extra`. Variants that log trajectories fill in `episode_id` and
/// `trajectory` whenever metrics are read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub target: Point3,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,

    #[serde(flatten)]
    pub trajectory: Option<Trajectory>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskInfo {
    pub fn new(target: Point3) -> Self {
        Self {
            target,
            episode_id: None,
            trajectory: None,
            extra: Map::new(),
        }
    }

    /// Builder: attach a dataset-provided field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EpisodeMetrics
// ---------------------------------------------------------------------------

/// Summary of a finished episode.
///
/// The optional fields are only produced by variants that track them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    pub success: bool,
    pub ep_length: u32,
    pub total_reward: f64,
    pub spl: f64,

    /// Smallest raw distance reading of the episode. A `-inf` reading is
    /// kept as is, and serde_json writes non-finite numbers as `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance_to_target: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_invalid_actions: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_info: Option<TaskInfo>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wayfinder_core::action::ActionSet;

    #[test]
    fn path_point_from_pose_skips_z() {
        let point = PathPoint::from(Pose::new(1.0, 2.0, 3.0, 45.0));
        assert_eq!(
            point,
            PathPoint {
                x: 1.0,
                y: 2.0,
                path_to_rot_degrees: 45.0
            }
        );
    }

    #[test]
    fn task_info_serializes_flat() {
        let mut info = TaskInfo::new(Point3::new(1.0, 0.0, -2.0)).with_extra("object_type", "chair");
        info.episode_id = Some("Cantwell_3".into());
        info.trajectory = Some(Trajectory {
            taken_actions: vec![NavAction::MoveAhead, NavAction::End],
            action_names: ActionSet::POINT_NAV
                .names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            followed_path: vec![PathPoint {
                x: 0.0,
                y: 0.0,
                path_to_rot_degrees: 0.0,
            }],
        });

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["target"], json!([1.0, 0.0, -2.0]));
        assert_eq!(value["episode_id"], json!("Cantwell_3"));
        assert_eq!(value["object_type"], json!("chair"));
        assert_eq!(value["taken_actions"], json!(["MOVE_FORWARD", "STOP"]));
        assert_eq!(
            value["action_names"],
            json!(["MOVE_FORWARD", "TURN_LEFT", "TURN_RIGHT", "STOP"])
        );
        assert_eq!(value["followed_path"][0]["path_to_rot_degrees"], json!(0.0));
    }

    #[test]
    fn bare_task_info_has_only_target() {
        let value = serde_json::to_value(TaskInfo::new(Point3::new(0.0, 0.0, 0.0))).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("target"));
    }

    #[test]
    fn point_nav_metrics_omit_optional_fields() {
        let metrics = EpisodeMetrics {
            success: true,
            ep_length: 4,
            total_reward: 12.46,
            spl: 0.8,
            min_distance_to_target: None,
            num_invalid_actions: None,
            task_info: None,
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 4);
        assert_eq!(value["ep_length"], json!(4));
    }

    #[test]
    fn non_finite_min_distance_serializes_as_null() {
        let metrics = EpisodeMetrics {
            success: false,
            ep_length: 2,
            total_reward: -0.02,
            spl: 0.0,
            min_distance_to_target: Some(f64::NEG_INFINITY),
            num_invalid_actions: Some(0),
            task_info: None,
        };
        let line = serde_json::to_string(&metrics).unwrap();
        assert!(line.contains("\"min_distance_to_target\":null"));
    }

    #[test]
    fn object_nav_metrics_include_extras() {
        let metrics = EpisodeMetrics {
            success: false,
            ep_length: 10,
            total_reward: -0.1,
            spl: 0.0,
            min_distance_to_target: Some(1.25),
            num_invalid_actions: Some(3),
            task_info: Some(TaskInfo::new(Point3::new(0.0, 0.0, 0.0))),
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["min_distance_to_target"], json!(1.25));
        assert_eq!(value["num_invalid_actions"], json!(3));
        assert!(value["task_info"].is_object());
    }
}
