//! Real-time gravity integration.
//!
//! Bodies with an orbit parent are attracted by that parent alone, which
//! keeps planet/moon hierarchies stable regardless of update order. Every
//! other entity (rockets, root bodies) feels all gravitating bodies.

mod gravity;
mod integrator;

#[cfg(test)]
mod proptest_physics;

use bevy::math::DVec2;

pub use gravity::{
    GravitySource, GravitySources, acceleration_toward, compute_acceleration_from_sources,
    find_collision, live_sources, sources_at_step,
};
pub use integrator::{PhysicsConfig, drift, integrate_step, kick};

use crate::entity::{EntityId, SimEntity};

/// Look up an entity by id.
pub fn find_entity(entities: &[SimEntity], id: EntityId) -> Option<&SimEntity> {
    entities.iter().find(|e| e.id == id)
}

/// Resolve the orbit parent of `entity` in the registry.
///
/// A missing parent, or a body naming itself, counts as no parent.
pub fn resolve_orbit_parent<'a>(
    entities: &'a [SimEntity],
    entity: &SimEntity,
) -> Option<&'a SimEntity> {
    entity
        .orbit_parent()
        .filter(|&parent| parent != entity.id)
        .and_then(|parent| find_entity(entities, parent))
}

/// Acceleration on `entity` from live positions.
pub fn live_acceleration(entities: &[SimEntity], entity: &SimEntity) -> DVec2 {
    match resolve_orbit_parent(entities, entity) {
        Some(parent) => acceleration_toward(entity.pos(), parent.pos(), parent.mass()),
        None => {
            compute_acceleration_from_sources(entity.pos(), &live_sources(entities, entity.id))
        }
    }
}
