//! Headless Bevy integration tests.
//!
//! These tests verify the simulation plugin, its messages and its level
//! handling run correctly without a window or GPU.

mod common;

use bevy::prelude::*;
use orbits::collision::CollisionEvent;
use orbits::level::LevelSource;
use orbits::rocket::ControlIntents;
use orbits::simulation::{LoadLevel, Simulation, SimulationPlugin, SimulationSystems, StartupLevel};

const CRASH_LEVEL: &str = r#"{
    "name": "Crash",
    "version": "1.0",
    "author": "tests",
    "level": {
        "bodies": [ { "id": "rock", "mass": 100, "radius": 5, "position": { "x": 0, "y": 0 } } ],
        "player": { "position": { "x": 1, "y": 0 } }
    }
}"#;

#[derive(Resource, Default)]
struct SeenCollisions(Vec<CollisionEvent>);

fn record_collisions(mut reader: MessageReader<CollisionEvent>, mut seen: ResMut<SeenCollisions>) {
    seen.0.extend(reader.read().cloned());
}

fn create_app(startup: LevelSource) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(StartupLevel(startup))
        .add_plugins(SimulationPlugin);
    app
}

#[test]
fn test_startup_level_loads() {
    let mut app = create_app(LevelSource::Sandbox);
    app.update();

    let sim = app.world().resource::<Simulation>();
    assert_eq!(sim.active_level().map(|l| l.definition.name.as_str()), Some("Sandbox"));
    assert_eq!(sim.entities().len(), 2);
    assert!(sim.rocket().is_some());
}

#[test]
fn test_broken_startup_level_falls_back_to_sandbox() {
    let mut app = create_app(LevelSource::File("no/such/level.json".into()));
    app.update();

    let sim = app.world().resource::<Simulation>();
    assert_eq!(sim.active_level().map(|l| l.definition.name.as_str()), Some("Sandbox"));
}

#[test]
fn test_load_level_message_swaps_registry() {
    let mut app = create_app(LevelSource::Sandbox);
    app.update();

    app.world_mut()
        .write_message(LoadLevel(common::inline(common::MOON_LEVEL)));
    app.update();

    let sim = app.world().resource::<Simulation>();
    assert_eq!(sim.active_level().map(|l| l.definition.name.as_str()), Some("Moon"));
    assert_eq!(sim.entities().len(), 3);
}

#[test]
fn test_crash_emits_collision_message() {
    let mut app = create_app(common::inline(CRASH_LEVEL));
    app.init_resource::<SeenCollisions>()
        .add_systems(Update, record_collisions.after(SimulationSystems::Tick));

    app.update();

    let seen = app.world().resource::<SeenCollisions>();
    assert_eq!(seen.0.len(), 1);
    assert_eq!(seen.0[0].body_label.as_deref(), Some("rock"));

    let sim = app.world().resource::<Simulation>();
    assert!(sim.outcome().is_crashed());
    assert!(sim.rocket().is_none());
}

#[test]
fn test_restart_intent_reloads_level() {
    let mut app = create_app(common::inline(CRASH_LEVEL));
    app.update();
    assert!(app.world().resource::<Simulation>().outcome().is_crashed());

    app.world_mut().resource_mut::<ControlIntents>().restart = true;
    app.update();
    app.world_mut().resource_mut::<ControlIntents>().restart = false;

    // The reloaded rocket starts inside the rock again and crashes in the
    // same frame, but with a fresh id
    let sim = app.world().resource::<Simulation>();
    let level = sim.active_level().expect("level active");
    assert_eq!(level.definition.name, "Crash");
    let crashed_rocket = match sim.outcome() {
        orbits::outcome::AttemptOutcome::Crashed(event) => event.rocket,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(level.entities.last().copied(), Some(crashed_rocket));
}
