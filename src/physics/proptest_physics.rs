//! Property-based tests for the gravity law and integrator using proptest.

use bevy::math::DVec2;
use proptest::prelude::*;

use crate::physics::{PhysicsConfig, acceleration_toward, integrate_step};
use crate::test_utils::{assertions, fixtures};
use crate::types::BodyState;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// |a| = M / r² and a points from the body toward the source.
    #[test]
    fn prop_inverse_square_law(
        mass in 0.1f64..1000.0,
        r in 0.5f64..500.0,
        angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let source = DVec2::new(3.0, -7.0);
        let pos = source + DVec2::new(angle.cos(), angle.sin()) * r;

        let acc = acceleration_toward(pos, source, mass);
        let expected = mass / (r * r);
        prop_assert!(((acc.length() - expected) / expected).abs() < 1e-9);

        let toward = (source - pos).normalize();
        prop_assert!(acc.normalize().dot(toward) > 1.0 - 1e-9);
    }

    /// Splitting one frame into several updates gives the same impulse.
    #[test]
    fn prop_impulse_is_frame_rate_independent(
        acc_x in -5.0f64..5.0,
        acc_y in -5.0f64..5.0,
        frames in 1usize..10,
    ) {
        let config = PhysicsConfig::default();
        let acc = DVec2::new(acc_x, acc_y);
        let total = 0.2;

        let mut one = BodyState::default();
        integrate_step(&mut one, acc, config.step, config.delta_multiplier(total));

        let mut many = BodyState::default();
        let per_frame = total / frames as f64;
        for _ in 0..frames {
            integrate_step(&mut many, acc, config.step, config.delta_multiplier(per_frame));
        }

        prop_assert!((one.vel - many.vel).length() < 1e-9);
    }

    /// A circular orbit integrated one quantum at a time keeps its radius.
    #[test]
    fn prop_circular_orbit_radius_stable(
        mass in 50.0f64..200.0,
        radius in 20.0f64..60.0,
    ) {
        let config = PhysicsConfig::default();
        let mut state = fixtures::circular_orbit(mass, radius);
        let initial_energy = assertions::orbital_energy(mass, state.pos, state.vel);
        let initial_momentum = assertions::angular_momentum(state.pos, state.vel);

        for _ in 0..2000 {
            let acc = acceleration_toward(state.pos, DVec2::ZERO, mass);
            integrate_step(&mut state, acc, config.step, 1.0);
        }

        let drift = ((state.pos.length() - radius) / radius).abs();
        prop_assert!(drift < 0.02, "Radius drifted by {:.3}%", drift * 100.0);

        let final_energy = assertions::orbital_energy(mass, state.pos, state.vel);
        assertions::assert_conserved("Energy", initial_energy, final_energy, 0.02);

        // Kick and drift never change r × v under a central force
        let final_momentum = assertions::angular_momentum(state.pos, state.vel);
        assertions::assert_conserved("Angular momentum", initial_momentum, final_momentum, 1e-9);
    }
}
