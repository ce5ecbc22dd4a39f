//! Rocket steering: manual rotation, thrust, and prograde/retrograde hold.

use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::entity::PointingMode;
use crate::types::{heading, rotation_of};

/// Tuning for the player's rocket.
#[derive(Clone, Debug, PartialEq)]
pub struct RocketConfig {
    /// Manual and automatic turn rate (degrees per second).
    pub rotation_speed: f64,
    /// Engine acceleration while thrusting.
    pub thrust: f64,
    /// Half extents of the rocket.
    pub size: DVec2,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 120.0,
            thrust: 1.0,
            size: DVec2::new(0.5, 0.75),
        }
    }
}

/// Player intents for one tick.
///
/// `toggle_pointing_mode` and `restart` are edge-triggered: the input layer
/// sets them only on the frame the key goes down.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlIntents {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub toggle_pointing_mode: bool,
    /// Steer toward the prograde/retrograde heading.
    pub hold_pointing: bool,
    /// Reload the active level.
    pub restart: bool,
}

/// Apply manual rotation. Left wins when both are held.
pub fn apply_rotation_input(
    rotation: f64,
    intents: &ControlIntents,
    config: &RocketConfig,
    dt: f64,
) -> f64 {
    if intents.rotate_left {
        rotation - config.rotation_speed * dt
    } else if intents.rotate_right {
        rotation + config.rotation_speed * dt
    } else {
        rotation
    }
}

/// Engine acceleration along the rocket's heading.
pub fn thrust_acceleration(rotation: f64, config: &RocketConfig) -> DVec2 {
    heading(rotation) * config.thrust
}

/// Heading (degrees) the rocket should face for `mode`.
///
/// `None` when the rocket is not moving.
pub fn pointing_target(vel: DVec2, mode: PointingMode) -> Option<f64> {
    if vel.length_squared() <= f64::EPSILON {
        return None;
    }
    let direction = match mode {
        PointingMode::Prograde => vel,
        PointingMode::Retrograde => -vel,
    };
    Some(rotation_of(direction))
}

/// Turn toward the pointing target by at most `max_delta` degrees, taking
/// the short way around.
pub fn orient_toward(rotation: f64, vel: DVec2, mode: PointingMode, max_delta: f64) -> f64 {
    let Some(target) = pointing_target(vel, mode) else {
        return rotation;
    };
    let delta = (target - rotation + 180.0).rem_euclid(360.0) - 180.0;
    rotation + delta.signum() * delta.abs().min(max_delta)
}
