//! Entity model: bodies and rockets sharing one registry.
//!
//! Every simulated object is a [`SimEntity`] carrying the common moving
//! state (position, velocity, mass, rotation, size, predicted trajectory).
//! Per-kind data lives in the [`EntityKind`] tag; the simulation dispatches
//! update and prediction on it.

use std::fmt;

use bevy::math::DVec2;

use crate::tasks::TaskMap;
use crate::types::{BodyState, normalize_degrees};

/// Unique entity identifier.
///
/// Ids are generated monotonically and never reused, even across level
/// reloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{}", self.0)
    }
}

/// Source of fresh entity ids.
#[derive(Clone, Debug, Default)]
pub struct EntityIdGenerator {
    next: u64,
}

impl EntityIdGenerator {
    /// Hand out the next id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Predicted future positions of an entity.
///
/// Index 0 is one physics quantum ahead. The buffer is rebuilt from scratch
/// every tick; a buffer shorter than its capacity ended in a predicted
/// collision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<DVec2>,
    capacity: usize,
}

impl Trajectory {
    /// Empty trajectory with the given sample bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::new(),
            capacity,
        }
    }

    /// Wrap already-computed samples.
    pub fn from_points(mut points: Vec<DVec2>, capacity: usize) -> Self {
        points.truncate(capacity);
        Self { points, capacity }
    }

    /// Samples in chronological order.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Sample at `index`, if the prediction reached that far.
    pub fn sample(&self, index: usize) -> Option<DVec2> {
        self.points.get(index).copied()
    }

    /// Last predicted position.
    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the prediction stopped early (predicted collision).
    pub fn is_truncated(&self) -> bool {
        self.points.len() < self.capacity
    }

    /// Drop all samples, keeping the capacity.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Which way the rocket's auto-orientation points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointingMode {
    /// Along the velocity vector.
    #[default]
    Prograde,
    /// Against the velocity vector.
    Retrograde,
}

impl PointingMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            PointingMode::Prograde => PointingMode::Retrograde,
            PointingMode::Retrograde => PointingMode::Prograde,
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            PointingMode::Prograde => "PRO",
            PointingMode::Retrograde => "RETRO",
        }
    }
}

/// Rocket-specific data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RocketData {
    pub pointing: PointingMode,
}

/// Body-specific data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BodyData {
    /// Identifier from the level file, if any.
    pub label: Option<String>,
    /// Body this one orbits. A lookup, never ownership; a dangling id means
    /// "no parent".
    pub orbit_parent: Option<EntityId>,
    /// Objectives attached to this body.
    pub tasks: TaskMap,
}

/// Kind tag for an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Body(BodyData),
    Rocket(RocketData),
}

/// A simulated object.
#[derive(Clone, Debug, PartialEq)]
pub struct SimEntity {
    pub id: EntityId,
    /// Position, velocity and mass.
    pub state: BodyState,
    /// Degrees in `[0, 360)`.
    rotation: f64,
    /// Half extents. Bodies use `(radius, radius)`.
    pub size: DVec2,
    pub trajectory: Trajectory,
    pub kind: EntityKind,
}

impl SimEntity {
    /// Create a body with the given radius.
    pub fn body(id: EntityId, state: BodyState, radius: f64, data: BodyData) -> Self {
        Self {
            id,
            state,
            rotation: 0.0,
            size: DVec2::splat(radius),
            trajectory: Trajectory::default(),
            kind: EntityKind::Body(data),
        }
    }

    /// Create a rocket. Rockets carry unit mass but never attract anything.
    pub fn rocket(id: EntityId, pos: DVec2, vel: DVec2, rotation: f64, size: DVec2) -> Self {
        Self {
            id,
            state: BodyState::new(pos, vel, 1.0),
            rotation: normalize_degrees(rotation),
            size,
            trajectory: Trajectory::default(),
            kind: EntityKind::Rocket(RocketData::default()),
        }
    }

    pub fn pos(&self) -> DVec2 {
        self.state.pos
    }

    pub fn vel(&self) -> DVec2 {
        self.state.vel
    }

    pub fn mass(&self) -> f64 {
        self.state.mass
    }

    /// Rotation in degrees, `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the rotation, normalising into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Radius used for collision checks.
    pub fn collision_radius(&self) -> f64 {
        self.size.x
    }

    pub fn is_body(&self) -> bool {
        matches!(self.kind, EntityKind::Body(_))
    }

    pub fn is_rocket(&self) -> bool {
        matches!(self.kind, EntityKind::Rocket(_))
    }

    /// Bodies with positive mass attract every other entity.
    pub fn is_gravitating(&self) -> bool {
        self.is_body() && self.state.mass > 0.0
    }

    pub fn as_body(&self) -> Option<&BodyData> {
        match &self.kind {
            EntityKind::Body(data) => Some(data),
            EntityKind::Rocket(_) => None,
        }
    }

    pub fn as_body_mut(&mut self) -> Option<&mut BodyData> {
        match &mut self.kind {
            EntityKind::Body(data) => Some(data),
            EntityKind::Rocket(_) => None,
        }
    }

    pub fn as_rocket(&self) -> Option<&RocketData> {
        match &self.kind {
            EntityKind::Rocket(data) => Some(data),
            EntityKind::Body(_) => None,
        }
    }

    pub fn as_rocket_mut(&mut self) -> Option<&mut RocketData> {
        match &mut self.kind {
            EntityKind::Rocket(data) => Some(data),
            EntityKind::Body(_) => None,
        }
    }

    /// Declared orbit parent, if this is a body with one.
    pub fn orbit_parent(&self) -> Option<EntityId> {
        self.as_body().and_then(|body| body.orbit_parent)
    }

    /// Tasks attached to this entity (empty for rockets).
    pub fn tasks(&self) -> Option<&TaskMap> {
        self.as_body().map(|body| &body.tasks)
    }
}
