//! Built-in grid-world navigation backend.
//!
//! [`GridWorld`] is a small 4-connected occupancy grid with a goal cell.
//! Geodesic distances come from a breadth-first search over free cells, so
//! the task layer sees the same kind of readings a mesh-based simulator
//! would report. [`GridFollower`] is the matching shortest-path follower.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use wayfinder_core::action::NavAction;
use wayfinder_core::error::SimError;
use wayfinder_core::traits::{FollowerMode, PathFollower, Simulator};
use wayfinder_core::types::{EpisodeIdentity, FrameSet, Point3, Pose};

/// Side length of one cell, in meters.
pub const CELL_SIZE: f64 = 0.25;

/// Rotation per turn action, in degrees.
pub const TURN_ANGLE: f64 = 90.0;

const GENERATION_ATTEMPTS: u32 = 64;

// ---------------------------------------------------------------------------
// GridMap
// ---------------------------------------------------------------------------

/// Cell coordinates `(col, row)`.
pub type Cell = (usize, usize);

/// Immutable occupancy grid shared by the simulator and its follower.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    blocked: Vec<bool>,
}

impl GridMap {
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width * height],
        }
    }

    /// Builder: mark a cell as an obstacle.
    #[must_use]
    pub fn with_obstacle(mut self, (col, row): Cell) -> Self {
        if col < self.width && row < self.height {
            self.blocked[row * self.width + col] = true;
        }
        self
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn is_free(&self, (col, row): Cell) -> bool {
        col < self.width && row < self.height && !self.blocked[row * self.width + col]
    }

    /// Neighbor of `cell` one step along `heading_deg`, if it lies on the grid.
    pub fn neighbor(&self, (col, row): Cell, heading_deg: f64) -> Option<Cell> {
        let (dc, dr) = heading_offset(heading_deg);
        let col = col.checked_add_signed(dc)?;
        let row = row.checked_add_signed(dr)?;
        (col < self.width && row < self.height).then_some((col, row))
    }

    /// Step counts from `goal` to every reachable free cell.
    pub fn distance_field(&self, goal: Cell) -> Vec<Option<u32>> {
        let mut field = vec![None; self.width * self.height];
        if !self.is_free(goal) {
            return field;
        }
        field[goal.1 * self.width + goal.0] = Some(0);
        let mut queue = VecDeque::from([goal]);
        while let Some(cell) = queue.pop_front() {
            let Some(steps) = field[cell.1 * self.width + cell.0] else {
                continue;
            };
            for heading in [0.0, 90.0, 180.0, 270.0] {
                let Some(next) = self.neighbor(cell, heading) else {
                    continue;
                };
                let slot = &mut field[next.1 * self.width + next.0];
                if self.is_free(next) && slot.is_none() {
                    *slot = Some(steps + 1);
                    queue.push_back(next);
                }
            }
        }
        field
    }

    fn steps_at(&self, field: &[Option<u32>], (col, row): Cell) -> Option<u32> {
        field.get(row * self.width + col).copied().flatten()
    }
}

/// `(dcol, drow)` for a heading that is a multiple of 90 degrees.
///
/// Heading 0 faces decreasing rows, 90 faces increasing columns.
fn heading_offset(heading_deg: f64) -> (isize, isize) {
    #[allow(clippy::cast_possible_truncation)]
    let quadrant = (heading_deg.rem_euclid(360.0) / TURN_ANGLE).round() as i64 % 4;
    match quadrant {
        0 => (0, -1),
        1 => (1, 0),
        2 => (0, 1),
        _ => (-1, 0),
    }
}

#[allow(clippy::cast_precision_loss)]
fn cell_to_point((col, row): Cell) -> Point3 {
    Point3::new(col as f64 * CELL_SIZE, 0.0, row as f64 * CELL_SIZE)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn point_to_cell(x: f64, z: f64) -> Option<Cell> {
    let col = (x / CELL_SIZE).round();
    let row = (z / CELL_SIZE).round();
    (col >= 0.0 && row >= 0.0).then(|| (col as usize, row as usize))
}

// ---------------------------------------------------------------------------
// GridWorld
// ---------------------------------------------------------------------------

/// Grid-world [`Simulator`] with one agent and one goal cell.
#[derive(Clone, Debug)]
pub struct GridWorld {
    map: Arc<GridMap>,
    goal: Cell,
    field: Vec<Option<u32>>,
    agent: Cell,
    heading_deg: f64,
    success_distance: f64,
    optimal_length: f64,
    path_length: f64,
    last_action_success: bool,
    episode_over: bool,
    stopped: bool,
    frames: FrameSet,
    identity: EpisodeIdentity,
}

impl GridWorld {
    /// Place an agent at `start` facing heading 0 on `map`.
    pub fn new(map: GridMap, start: Cell, goal: Cell, success_distance: f64) -> Self {
        let field = map.distance_field(goal);
        let optimal_length = map
            .steps_at(&field, start)
            .map_or(f64::INFINITY, |s| f64::from(s) * CELL_SIZE);
        #[allow(clippy::cast_possible_truncation)]
        let frames = FrameSet::blank(map.width() as u32, map.height() as u32);
        let mut world = Self {
            map: Arc::new(map),
            goal,
            field,
            agent: start,
            heading_deg: 0.0,
            success_distance,
            optimal_length,
            path_length: 0.0,
            last_action_success: true,
            episode_over: false,
            stopped: false,
            frames,
            identity: EpisodeIdentity::new("grid/open.grid", "0"),
        };
        world.render_frames();
        world
    }

    /// Random `size` x `size` map with roughly `density` obstacles and a
    /// reachable goal, reproducible from `seed`.
    pub fn generate(size: usize, density: f64, seed: u64, success_distance: f64) -> Self {
        let size = size.max(2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let start = (0, size - 1);
        let goal = (size - 1, 0);

        for _ in 0..GENERATION_ATTEMPTS {
            let mut map = GridMap::open(size, size);
            for row in 0..size {
                for col in 0..size {
                    let cell = (col, row);
                    if cell != start && cell != goal && rng.random_bool(density.clamp(0.0, 1.0)) {
                        map = map.with_obstacle(cell);
                    }
                }
            }
            if map.steps_at(&map.distance_field(goal), start).is_some() {
                return Self::new(map, start, goal, success_distance)
                    .with_identity(&format!("grid/seed-{seed}.grid"), "0");
            }
        }
        Self::new(GridMap::open(size, size), start, goal, success_distance)
            .with_identity(&format!("grid/seed-{seed}.grid"), "0")
    }

    /// Builder: set the scene and episode identity.
    #[must_use]
    pub fn with_identity(mut self, scene_id: &str, episode_id: &str) -> Self {
        self.identity = EpisodeIdentity::new(scene_id, episode_id);
        self
    }

    /// Shared handle on the map, for building a [`GridFollower`].
    pub fn map(&self) -> Arc<GridMap> {
        Arc::clone(&self.map)
    }

    pub fn goal_point(&self) -> Point3 {
        cell_to_point(self.goal)
    }

    fn geodesic(&self) -> Option<f64> {
        self.map
            .steps_at(&self.field, self.agent)
            .map(|s| f64::from(s) * CELL_SIZE)
    }

    fn render_frames(&mut self) {
        let width = self.map.width();
        for row in 0..self.map.height() {
            for col in 0..width {
                let cell = (col, row);
                let color = if cell == self.agent {
                    [1.0, 0.0, 0.0]
                } else if cell == self.goal {
                    [0.0, 1.0, 0.0]
                } else if self.map.is_free(cell) {
                    [1.0, 1.0, 1.0]
                } else {
                    [0.0, 0.0, 0.0]
                };
                let i = row * width + col;
                self.frames.rgb.data[i * 3..i * 3 + 3].copy_from_slice(&color);

                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                let depth = (col.abs_diff(self.agent.0) + row.abs_diff(self.agent.1)) as f32
                    * CELL_SIZE as f32;
                self.frames.depth.data[i] = depth;
            }
        }
    }
}

impl Simulator for GridWorld {
    fn step(&mut self, action: NavAction) -> Result<(), SimError> {
        if self.stopped {
            return Err(SimError::SceneUnavailable(self.identity.scene_id.clone()));
        }
        if self.episode_over {
            return Err(SimError::EpisodeOver);
        }

        self.last_action_success = true;
        match action {
            NavAction::MoveAhead => {
                match self
                    .map
                    .neighbor(self.agent, self.heading_deg)
                    .filter(|&cell| self.map.is_free(cell))
                {
                    Some(cell) => {
                        self.agent = cell;
                        self.path_length += CELL_SIZE;
                    }
                    None => self.last_action_success = false,
                }
            }
            NavAction::RotateLeft => {
                self.heading_deg = (self.heading_deg - TURN_ANGLE).rem_euclid(360.0);
            }
            NavAction::RotateRight => {
                self.heading_deg = (self.heading_deg + TURN_ANGLE).rem_euclid(360.0);
            }
            NavAction::End => self.episode_over = true,
            // The grid has no camera pitch.
            NavAction::LookUp | NavAction::LookDown => {}
        }
        self.render_frames();
        Ok(())
    }

    fn last_action_success(&self) -> bool {
        self.last_action_success
    }

    fn distance_to_goal(&self) -> Option<f64> {
        self.geodesic()
    }

    fn spl(&self) -> Option<f64> {
        let distance = self.geodesic()?;
        if distance > self.success_distance {
            return Some(0.0);
        }
        if self.optimal_length == 0.0 {
            return Some(1.0);
        }
        Some(self.optimal_length / self.optimal_length.max(self.path_length))
    }

    fn episode_over(&self) -> bool {
        self.episode_over
    }

    fn current_frame(&self) -> &FrameSet {
        &self.frames
    }

    fn agent_pose(&self) -> Pose {
        let point = cell_to_point(self.agent);
        Pose::new(point.x(), point.y(), point.z(), self.heading_deg)
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
// GridFollower
// ---------------------------------------------------------------------------

/// Shortest-path follower over a [`GridMap`].
#[derive(Clone, Debug)]
pub struct GridFollower {
    map: Arc<GridMap>,
    success_distance: f64,
    cached: Option<(Cell, Vec<Option<u32>>)>,
}

impl GridFollower {
    pub const fn new(map: Arc<GridMap>) -> Self {
        Self {
            map,
            success_distance: 0.0,
            cached: None,
        }
    }

    fn field_for(&mut self, goal: Cell) -> &[Option<u32>] {
        if self.cached.as_ref().is_none_or(|(cell, _)| *cell != goal) {
            self.cached = Some((goal, self.map.distance_field(goal)));
        }
        match &self.cached {
            Some((_, field)) => field,
            None => &[],
        }
    }
}

impl PathFollower for GridFollower {
    /// Both modes walk the BFS shortest path on a grid.
    fn configure(&mut self, success_distance: f64, mode: FollowerMode) {
        debug!(success_distance, ?mode, "grid follower configured");
        self.success_distance = success_distance;
    }

    fn next_action(&mut self, pose: &Pose, target: &Point3) -> Option<NavAction> {
        let here = point_to_cell(pose.x, pose.z)?;
        let goal = point_to_cell(target.x(), target.z())?;
        let map = Arc::clone(&self.map);
        let success_distance = self.success_distance;
        let field = self.field_for(goal);

        let remaining = map.steps_at(field, here)?;
        if f64::from(remaining) * CELL_SIZE <= success_distance {
            return Some(NavAction::End);
        }

        // Prefer straight ahead, then left, right and behind.
        let ahead = pose.heading_deg;
        let candidates = [
            (ahead, NavAction::MoveAhead),
            (ahead - TURN_ANGLE, NavAction::RotateLeft),
            (ahead + TURN_ANGLE, NavAction::RotateRight),
            (ahead + 2.0 * TURN_ANGLE, NavAction::RotateRight),
        ];
        candidates.into_iter().find_map(|(heading, action)| {
            let next = map.neighbor(here, heading)?;
            let steps = map.steps_at(field, next)?;
            (steps < remaining).then_some(action)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
