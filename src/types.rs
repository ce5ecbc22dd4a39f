//! Core physics types and constants for the orbital sandbox.

use bevy::math::DVec2;

/// Fixed physics quantum in seconds.
///
/// Real-time updates are scaled by `elapsed / PHYSICS_STEP`, so the result
/// does not depend on the frame rate. Trajectory prediction advances by
/// exactly one quantum per sample.
pub const PHYSICS_STEP: f64 = 0.02;

/// Maximum number of samples in a predicted trajectory.
pub const TRAJECTORY_BUFFER_SIZE: usize = 5000;

/// Longest real frame time fed into a single tick (seconds).
pub const MAX_FRAME_SECONDS: f64 = 0.25;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Milliseconds per second.
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Physical state of an entity in the simulation.
///
/// Units are game units: distances are arbitrary, time is seconds and the
/// gravitational constant is 1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position in world units.
    pub pos: DVec2,
    /// Velocity in world units per second.
    pub vel: DVec2,
    /// Mass. Only bodies with positive mass attract anything.
    pub mass: f64,
}

impl BodyState {
    /// Create a new body state
    pub fn new(pos: DVec2, vel: DVec2, mass: f64) -> Self {
        Self { pos, vel, mass }
    }

    /// Speed (velocity magnitude).
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Distance to another point.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        (point - self.pos).length()
    }
}

/// Normalise an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit heading vector for a rotation in degrees.
///
/// Rotation 0 points along +y and increases clockwise, so 90° points
/// along +x.
pub fn heading(rotation_degrees: f64) -> DVec2 {
    let rad = rotation_degrees * DEG_TO_RAD;
    DVec2::new(rad.sin(), rad.cos())
}

/// Rotation in degrees whose heading matches the given direction.
///
/// Inverse of [`heading`] for non-zero vectors.
pub fn rotation_of(direction: DVec2) -> f64 {
    direction.x.atan2(direction.y) * RAD_TO_DEG
}

/// Convert seconds to milliseconds.
pub fn seconds_to_millis(seconds: f64) -> f64 {
    seconds * MILLIS_PER_SECOND
}
