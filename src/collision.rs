//! Rocket impact detection.
//!
//! A rocket collides with a body when its centre is strictly inside the
//! body's collision radius, measured against live positions after the
//! rocket has moved. The simulation removes the crashed rocket and records
//! the impact as the attempt's outcome.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::entity::{EntityId, SimEntity};

/// Message fired when a rocket hits a body.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    /// The rocket that crashed (already removed from the registry).
    pub rocket: EntityId,
    /// The body that was hit.
    pub body: EntityId,
    /// Display label of the body, when the level named it.
    pub body_label: Option<String>,
    /// Rocket position at impact.
    pub impact_position: DVec2,
    /// Rocket velocity at impact.
    pub impact_velocity: DVec2,
    /// Simulation clock at impact (milliseconds).
    pub time_ms: f64,
}

impl CollisionEvent {
    /// Impact speed in world units per second.
    pub fn impact_speed(&self) -> f64 {
        self.impact_velocity.length()
    }

    /// Name to show for the body that was hit.
    pub fn body_name(&self) -> String {
        self.body_label
            .clone()
            .unwrap_or_else(|| self.body.to_string())
    }
}

/// First gravitating body (in registry order) whose radius contains `entity`.
pub fn check_collision<'a>(entities: &'a [SimEntity], entity: &SimEntity) -> Option<&'a SimEntity> {
    entities.iter().find(|body| {
        body.id != entity.id
            && body.is_gravitating()
            && body.state.distance_to(entity.pos()) < body.collision_radius()
    })
}

/// Build the impact record for `rocket` hitting `body`.
pub fn impact(rocket: &SimEntity, body: &SimEntity, time_ms: f64) -> CollisionEvent {
    CollisionEvent {
        rocket: rocket.id,
        body: body.id,
        body_label: body.as_body().and_then(|data| data.label.clone()),
        impact_position: rocket.pos(),
        impact_velocity: rocket.vel(),
        time_ms,
    }
}
