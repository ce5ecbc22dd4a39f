//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec2;
use orbits::entity::{BodyData, EntityId};
use orbits::level::{LevelFile, LevelSource};
use orbits::physics::PhysicsConfig;
use orbits::rocket::{ControlIntents, RocketConfig};
use orbits::simulation::{Simulation, TickReport};
use orbits::types::{BodyState, PHYSICS_STEP};

pub const PLANET_MASS: f64 = 100.0;
pub const PLANET_RADIUS: f64 = 5.0;

/// Simulation with a mass-100, radius-5 planet at the origin.
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

/// Simulation with a short prediction buffer and nothing in it.
pub fn empty_sim(buffer: usize) -> Simulation {
    Simulation::new(
        PhysicsConfig {
            trajectory_buffer_size: buffer,
            ..Default::default()
        },
        RocketConfig::default(),
    )
}

/// Tick `n` times by exactly one physics quantum with no input.
///
/// Stops early on a crash and returns the index of the crashing tick.
pub fn run_until_crash(sim: &mut Simulation, n: usize) -> Option<usize> {
    let intents = ControlIntents::default();
    (0..n).find(|_| !sim.tick(PHYSICS_STEP, &intents).collisions.is_empty())
}

/// Tick `n` quanta and collect every report.
pub fn run_ticks(sim: &mut Simulation, n: usize) -> Vec<TickReport> {
    let intents = ControlIntents::default();
    (0..n).map(|_| sim.tick(PHYSICS_STEP, &intents)).collect()
}

/// Parse a level that must be valid.
pub fn level(json: &str) -> LevelFile {
    LevelFile::from_json_str(json).unwrap_or_else(|e| panic!("invalid test level: {e}"))
}

/// Inline source for a level that must be valid.
pub fn inline(json: &str) -> LevelSource {
    LevelSource::Inline(Box::new(level(json)))
}

/// A massless marker body at the origin with an orbit task of `radius` and
/// `time_ms`, and a rocket at (-10, 0) flying along +x at `speed`.
pub fn fly_through_level(radius: f64, time_ms: f64, speed: f64) -> String {
    format!(
        r#"{{
            "name": "Fly-through",
            "version": "1.0",
            "author": "tests",
            "level": {{
                "bodies": [
                    {{ "id": "beacon", "mass": 0, "radius": 0.5, "position": {{ "x": 0, "y": 0 }},
                      "tasks": {{ "orbit": {{
                          "info": "Pass the beacon", "radius": {radius}, "time": {time_ms}
                      }} }} }}
                ],
                "player": {{
                    "position": {{ "x": -10, "y": 0 }},
                    "velocity": {{ "x": {speed}, "y": 0 }}
                }}
            }}
        }}"#
    )
}

/// Sun with a moon orbiting it and a rocket on a wide orbit.
pub const MOON_LEVEL: &str = r#"{
    "name": "Moon",
    "version": "1.0",
    "author": "tests",
    "level": {
        "bodies": [
            { "id": "sun", "mass": 200, "radius": 8, "position": { "x": 0, "y": 0 } },
            { "id": "moon", "mass": 5, "radius": 1.5, "position": { "x": 60, "y": 0 },
              "velocity": { "x": 0, "y": 1.826 }, "orbits": "sun",
              "tasks": { "orbit": { "info": "Orbit the moon", "radius": 8, "time": 5000 } } }
        ],
        "player": { "position": { "x": -40, "y": 0 }, "velocity": { "x": 0, "y": -2.236 } }
    }
}"#;

/// Specific orbital energy around a point mass at the origin.
pub fn orbital_energy(mass: f64, pos: DVec2, vel: DVec2) -> f64 {
    0.5 * vel.length_squared() - mass / pos.length()
}

/// Assert that a quantity drifted by at most `tolerance` (relative).
pub fn assert_conserved(name: &str, initial: f64, last: f64, tolerance: f64) {
    let drift = ((last - initial) / initial).abs();
    assert!(
        drift <= tolerance,
        "{name} not conserved: initial={initial:.6e}, final={last:.6e}, drift={drift:.6e}"
    );
}
