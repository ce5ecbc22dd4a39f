//! Test utilities for simulation tests.
//!
//! Provides fixtures for common orbits and scenes, and assertions for
//! physical invariants like energy and angular momentum.

use bevy::math::DVec2;

use crate::types::BodyState;

/// Fixtures for creating test states and scenes.
pub mod fixtures {
    use super::*;
    use crate::entity::{BodyData, EntityId};
    use crate::physics::PhysicsConfig;
    use crate::rocket::RocketConfig;
    use crate::simulation::Simulation;

    /// Mass of the reference planet used by regression scenes.
    pub const PLANET_MASS: f64 = 100.0;

    /// Radius of the reference planet.
    pub const PLANET_RADIUS: f64 = 5.0;

    /// Unit-mass state in a circular orbit of `radius` around `mass` at the
    /// origin, starting on +x and moving along +y.
    pub fn circular_orbit(mass: f64, radius: f64) -> BodyState {
        let v = (mass / radius).sqrt();
        BodyState::new(DVec2::new(radius, 0.0), DVec2::new(0.0, v), 1.0)
    }

    /// Simulation with the reference planet at the origin and a short
    /// prediction buffer.
    pub fn planet_scene(buffer: usize) -> (Simulation, EntityId) {
        let mut sim = Simulation::new(
            PhysicsConfig {
                trajectory_buffer_size: buffer,
                ..Default::default()
            },
            RocketConfig::default(),
        );
        let planet = sim.spawn_body(
            BodyState::new(DVec2::ZERO, DVec2::ZERO, PLANET_MASS),
            PLANET_RADIUS,
            BodyData::default(),
        );
        (sim, planet)
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy around a point mass at the origin.
    ///
    /// E = v²/2 - M/r
    pub fn orbital_energy(mass: f64, pos: DVec2, vel: DVec2) -> f64 {
        0.5 * vel.length_squared() - mass / pos.length()
    }

    /// Specific angular momentum (2D scalar), L = r × v.
    pub fn angular_momentum(pos: DVec2, vel: DVec2) -> f64 {
        pos.perp_dot(vel)
    }

    /// Assert that a quantity drifted by at most `tolerance` (relative).
    ///
    /// # Panics
    /// Panics if the relative drift exceeds tolerance.
    pub fn assert_conserved(name: &str, initial: f64, last: f64, tolerance: f64) {
        let drift = if initial.abs() > 1e-12 {
            ((last - initial) / initial).abs()
        } else {
            (last - initial).abs()
        };
        assert!(
            drift <= tolerance,
            "{name} not conserved: initial={initial:.6e}, final={last:.6e}, \
             drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_fixture() {
        let state = fixtures::circular_orbit(100.0, 25.0);
        assert_relative_eq!(state.pos.length(), 25.0);
        assert_relative_eq!(state.vel.length(), 2.0);
        assert_relative_eq!(state.pos.dot(state.vel), 0.0);
    }

    #[test]
    fn test_energy_of_circular_orbit() {
        // E = -M / 2r for a circular orbit
        let state = fixtures::circular_orbit(100.0, 25.0);
        let energy = assertions::orbital_energy(100.0, state.pos, state.vel);
        assert_relative_eq!(energy, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angular_momentum_sign() {
        let state = fixtures::circular_orbit(100.0, 25.0);
        assert!(assertions::angular_momentum(state.pos, state.vel) > 0.0);
    }

    #[test]
    #[should_panic(expected = "not conserved")]
    fn test_assert_conserved_panics_on_drift() {
        assertions::assert_conserved("Energy", 1.0, 1.5, 0.01);
    }
}
