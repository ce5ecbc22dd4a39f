//! Inverse-square gravity with an implicit gravitational constant of 1.

use bevy::math::DVec2;

use crate::entity::{EntityId, SimEntity};

/// A point mass attracting other entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravitySource {
    pub id: EntityId,
    pub pos: DVec2,
    pub mass: f64,
    /// Distance below which an encounter is fatal.
    pub collision_radius: f64,
}

/// Collected sources for one acceleration evaluation.
pub type GravitySources = Vec<GravitySource>;

/// Acceleration at `pos` produced by a single mass at `source_pos`.
///
/// Magnitude is `mass / r²`, pointing from `pos` toward the source.
/// Coincident positions produce non-finite values; keeping massive bodies
/// apart is the level loader's job.
#[inline]
pub fn acceleration_toward(pos: DVec2, source_pos: DVec2, mass: f64) -> DVec2 {
    let delta = source_pos - pos;
    let r = delta.length();
    let force = mass / (r * r);
    delta * (force / r)
}

/// Net acceleration at `pos` from pre-fetched sources.
#[inline]
pub fn compute_acceleration_from_sources(pos: DVec2, sources: &[GravitySource]) -> DVec2 {
    sources
        .iter()
        .fold(DVec2::ZERO, |acc, source| {
            acc + acceleration_toward(pos, source.pos, source.mass)
        })
}

/// Every gravitating body except `exclude`, at its live position.
pub fn live_sources(entities: &[SimEntity], exclude: EntityId) -> GravitySources {
    entities
        .iter()
        .filter(|e| e.id != exclude && e.is_gravitating())
        .map(|e| GravitySource {
            id: e.id,
            pos: e.pos(),
            mass: e.mass(),
            collision_radius: e.collision_radius(),
        })
        .collect()
}

/// Every gravitating body except `exclude`, at its predicted position for
/// sample `step`.
///
/// Bodies whose trajectory does not reach `step` contribute their live
/// position.
pub fn sources_at_step(entities: &[SimEntity], exclude: EntityId, step: usize) -> GravitySources {
    entities
        .iter()
        .filter(|e| e.id != exclude && e.is_gravitating())
        .map(|e| GravitySource {
            id: e.id,
            pos: e.trajectory.sample(step).unwrap_or(e.pos()),
            mass: e.mass(),
            collision_radius: e.collision_radius(),
        })
        .collect()
}

/// First source whose collision radius contains `pos`.
pub fn find_collision(pos: DVec2, sources: &[GravitySource]) -> Option<&GravitySource> {
    sources
        .iter()
        .find(|source| (source.pos - pos).length() < source.collision_radius)
}
