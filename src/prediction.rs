//! Trajectory prediction.
//!
//! Forward-simulates an entity from its current live state without touching
//! it, one physics quantum per sample. Gravitating bodies are placed at
//! their own predicted sample for the same index, so predictions computed in
//! parent-before-child order agree with each other within a tick.

use bevy::math::DVec2;

use crate::entity::{SimEntity, Trajectory};
use crate::physics::{
    PhysicsConfig, acceleration_toward, compute_acceleration_from_sources, find_collision,
    integrate_step, resolve_orbit_parent, sources_at_step,
};
use crate::types::BodyState;

/// Predict the trajectory of `entity` against the rest of the registry.
///
/// Bodies with an orbit parent follow the parent's predicted path and are
/// never cut short. Everything else sums all gravitating bodies and stops
/// at the first predicted collision.
pub fn predict_trajectory(
    entities: &[SimEntity],
    entity: &SimEntity,
    config: &PhysicsConfig,
) -> Trajectory {
    let points = match resolve_orbit_parent(entities, entity) {
        Some(parent) => predict_around_parent(&entity.state, parent, config),
        None => predict_free(entities, entity, config),
    };
    Trajectory::from_points(points, config.trajectory_buffer_size)
}

/// Prediction under the orbit parent's gravity alone.
///
/// Step `i` uses the parent's sample `i`; once the parent's prediction runs
/// out, its live position is used instead.
pub fn predict_around_parent(
    start: &BodyState,
    parent: &SimEntity,
    config: &PhysicsConfig,
) -> Vec<DVec2> {
    let mut state = start.clone();
    let mut points = Vec::with_capacity(config.trajectory_buffer_size);

    for step in 0..config.trajectory_buffer_size {
        let parent_pos = parent.trajectory.sample(step).unwrap_or(parent.pos());
        let acc = acceleration_toward(state.pos, parent_pos, parent.mass());
        integrate_step(&mut state, acc, config.step, 1.0);
        points.push(state.pos);
    }

    points
}

/// Prediction under every gravitating body except `entity` itself.
///
/// Stops before recording the first position that lies inside a body's
/// collision radius.
pub fn predict_free(
    entities: &[SimEntity],
    entity: &SimEntity,
    config: &PhysicsConfig,
) -> Vec<DVec2> {
    let mut state = entity.state.clone();
    let mut points = Vec::with_capacity(config.trajectory_buffer_size);

    for step in 0..config.trajectory_buffer_size {
        let sources = sources_at_step(entities, entity.id, step);

        let acc = compute_acceleration_from_sources(state.pos, &sources);
        integrate_step(&mut state, acc, config.step, 1.0);

        if find_collision(state.pos, &sources).is_some() {
            break;
        }
        points.push(state.pos);
    }

    points
}
