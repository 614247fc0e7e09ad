//! Built-in sensors and the per-task sensor suite.
//!
//! Sensors implement [`Sensor`] from `wayfinder-core`. A [`SensorSuite`]
//! reads every registered sensor into an [`Observations`] map keyed by uuid.

use wayfinder_core::traits::{Sensor, Simulator};
use wayfinder_core::types::{AGENT_POSE_UUID, Observations, Pose, RenderMode, SensorReading};

// ---------------------------------------------------------------------------
// AgentPoseSensor
// ---------------------------------------------------------------------------

/// Publishes `[x, y, z, heading_deg]` under `agent_position_and_rotation`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AgentPoseSensor;

impl<S: Simulator> Sensor<S> for AgentPoseSensor {
    #[allow(clippy::unnecessary_literal_bound)]
    fn uuid(&self) -> &str {
        AGENT_POSE_UUID
    }

    fn read(&self, sim: &S) -> SensorReading {
        SensorReading::Values(sim.agent_pose().to_array().to_vec())
    }
}

// ---------------------------------------------------------------------------
// FrameSensor
// ---------------------------------------------------------------------------

/// Copies the simulator's current rgb or depth frame.
#[derive(Clone, Debug)]
pub struct FrameSensor {
    uuid: String,
    mode: RenderMode,
}

impl FrameSensor {
    pub fn new(uuid: impl Into<String>, mode: RenderMode) -> Self {
        Self {
            uuid: uuid.into(),
            mode,
        }
    }

    /// Rgb frame under uuid `rgb`.
    pub fn rgb() -> Self {
        Self::new("rgb", RenderMode::Rgb)
    }

    /// Depth frame under uuid `depth`.
    pub fn depth() -> Self {
        Self::new("depth", RenderMode::Depth)
    }
}

impl<S: Simulator> Sensor<S> for FrameSensor {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn read(&self, sim: &S) -> SensorReading {
        SensorReading::Frame(sim.current_frame().get(self.mode).clone())
    }
}

// ---------------------------------------------------------------------------
// SensorSuite
// ---------------------------------------------------------------------------

/// Ordered collection of sensors attached to one task.
pub struct SensorSuite<S: Simulator> {
    sensors: Vec<Box<dyn Sensor<S>>>,
}

impl<S: Simulator> Default for SensorSuite<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Simulator> SensorSuite<S> {
    pub const fn new() -> Self {
        Self {
            sensors: Vec::new(),
        }
    }

    /// Builder: register a sensor. Returns `self` for chaining.
    #[must_use]
    pub fn with(mut self, sensor: impl Sensor<S> + 'static) -> Self {
        self.register(Box::new(sensor));
        self
    }

    /// Register a sensor. A later sensor with the same uuid shadows an earlier one.
    pub fn register(&mut self, sensor: Box<dyn Sensor<S>>) {
        self.sensors.push(sensor);
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Read every sensor.
    pub fn observe(&self, sim: &S) -> Observations {
        let mut observations = Observations::new();
        for sensor in &self.sensors {
            observations.insert(sensor.uuid(), sensor.read(sim));
        }
        observations
    }

    /// Read only the sensor registered under `uuid`.
    pub fn read(&self, uuid: &str, sim: &S) -> Option<SensorReading> {
        self.sensors
            .iter()
            .rev()
            .find(|sensor| sensor.uuid() == uuid)
            .map(|sensor| sensor.read(sim))
    }

    /// Agent pose from the pose sensor, when one is registered.
    pub fn agent_pose(&self, sim: &S) -> Option<Pose> {
        self.read(AGENT_POSE_UUID, sim)
            .as_ref()
            .and_then(SensorReading::as_values)
            .and_then(Pose::from_slice)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::action::NavAction;
    use wayfinder_test_utils::ScriptedSimulator;

    fn full_suite() -> SensorSuite<ScriptedSimulator> {
        SensorSuite::new()
            .with(AgentPoseSensor)
            .with(FrameSensor::rgb())
            .with(FrameSensor::depth())
    }

    #[test]
    fn observe_reads_all_sensors() {
        let sim = ScriptedSimulator::new(Some(1.0));
        let obs = full_suite().observe(&sim);
        assert_eq!(obs.len(), 3);
        assert_eq!(
            obs.uuids().collect::<Vec<_>>(),
            vec![AGENT_POSE_UUID, "depth", "rgb"]
        );
        assert_eq!(obs.get("rgb").and_then(SensorReading::as_frame).map(|f| f.channels), Some(3));
        assert_eq!(obs.get("depth").and_then(SensorReading::as_frame).map(|f| f.channels), Some(1));
    }

    #[test]
    fn pose_sensor_tracks_simulator() {
        let mut sim = ScriptedSimulator::new(Some(1.0)).with_pose(Pose::new(1.0, 0.5, 2.0, 90.0));
        let suite = full_suite();
        assert_eq!(suite.agent_pose(&sim), Some(Pose::new(1.0, 0.5, 2.0, 90.0)));
        sim.step(NavAction::RotateLeft).unwrap();
        assert_eq!(suite.agent_pose(&sim).map(|p| p.heading_deg), Some(120.0));
    }

    #[test]
    fn missing_pose_sensor() {
        let sim = ScriptedSimulator::new(Some(1.0));
        let suite = SensorSuite::new().with(FrameSensor::rgb());
        assert!(suite.agent_pose(&sim).is_none());
        assert!(suite.read(AGENT_POSE_UUID, &sim).is_none());
    }

    #[test]
    fn empty_suite_observes_nothing() {
        let sim = ScriptedSimulator::new(Some(1.0));
        let suite = SensorSuite::<ScriptedSimulator>::default();
        assert!(suite.is_empty());
        assert!(suite.observe(&sim).is_empty());
    }
}
