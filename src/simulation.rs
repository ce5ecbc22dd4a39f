//! Simulation context and tick driver.
//!
//! [`Simulation`] owns the entity registry, the simulation clock and the
//! active level. One call to [`Simulation::tick`] advances the whole world
//! by one frame: bodies in orbit-hierarchy order (roots first), then
//! rockets. Each entity integrates and then re-predicts its trajectory
//! before the next one runs, so children and rockets always see fresh
//! samples of their attractors.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::collision::{CollisionEvent, check_collision, impact};
use crate::entity::{BodyData, EntityId, EntityIdGenerator, SimEntity, Trajectory};
use crate::level::{ActiveLevel, LevelError, LevelFile, LevelSource};
use crate::outcome::AttemptOutcome;
use crate::physics::{
    PhysicsConfig, drift, find_entity, integrate_step, kick, live_acceleration,
    resolve_orbit_parent,
};
use crate::prediction::predict_trajectory;
use crate::rocket::{
    ControlIntents, RocketConfig, apply_rotation_input, orient_toward, thrust_acceleration,
};
use crate::tasks::{Task, TaskTransition, evaluate_tasks};
use crate::types::{BodyState, seconds_to_millis};

/// A task changed state during a tick.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct TaskEvent {
    pub body: EntityId,
    pub task: String,
    pub transition: TaskTransition,
    /// Simulation clock (milliseconds).
    pub time_ms: f64,
}

/// Request to replace the running level.
#[derive(Message, Clone, Debug)]
pub struct LoadLevel(pub LevelSource);

/// Level loaded at startup.
#[derive(Resource, Clone, Debug)]
pub struct StartupLevel(pub LevelSource);

impl Default for StartupLevel {
    fn default() -> Self {
        Self(LevelSource::File(
            std::path::Path::new(crate::level::LEVELS_DIR).join("level1.json"),
        ))
    }
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub collisions: Vec<CollisionEvent>,
    pub task_events: Vec<TaskEvent>,
    /// Set on the tick the last task of the level completed.
    pub level_completed: bool,
}

/// The simulation context: registry, clock and level state.
#[derive(Resource, Debug)]
pub struct Simulation {
    physics: PhysicsConfig,
    rocket: RocketConfig,
    entities: Vec<SimEntity>,
    ids: EntityIdGenerator,
    level: Option<ActiveLevel>,
    outcome: AttemptOutcome,
    elapsed_ms: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), RocketConfig::default())
    }
}

impl Simulation {
    pub fn new(physics: PhysicsConfig, rocket: RocketConfig) -> Self {
        Self {
            physics,
            rocket,
            entities: Vec::new(),
            ids: EntityIdGenerator::default(),
            level: None,
            outcome: AttemptOutcome::InProgress,
            elapsed_ms: 0.0,
        }
    }

    pub fn physics_config(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn rocket_config(&self) -> &RocketConfig {
        &self.rocket
    }

    /// All entities in registry order.
    pub fn entities(&self) -> &[SimEntity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        find_entity(&self.entities, id)
    }

    /// The first rocket in the registry, if one is still flying.
    pub fn rocket(&self) -> Option<&SimEntity> {
        self.entities.iter().find(|e| e.is_rocket())
    }

    pub fn outcome(&self) -> &AttemptOutcome {
        &self.outcome
    }

    pub fn active_level(&self) -> Option<&ActiveLevel> {
        self.level.as_ref()
    }

    /// Simulation clock in milliseconds since the level was loaded.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Add a body to the registry.
    pub fn spawn_body(&mut self, state: BodyState, radius: f64, data: BodyData) -> EntityId {
        let id = self.ids.next_id();
        self.entities.push(SimEntity::body(id, state, radius, data));
        id
    }

    /// Add a rocket to the registry.
    pub fn spawn_rocket(&mut self, pos: DVec2, vel: DVec2, rotation: f64) -> EntityId {
        let id = self.ids.next_id();
        self.entities
            .push(SimEntity::rocket(id, pos, vel, rotation, self.rocket.size));
        id
    }

    /// Remove an entity. Returns it if it existed.
    pub fn destroy(&mut self, id: EntityId) -> Option<SimEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Load a level from `source`, replacing the registry.
    ///
    /// On error the running registry is left untouched.
    pub fn load(&mut self, source: LevelSource) -> Result<(), LevelError> {
        let definition = source.load()?;
        self.load_definition(source, definition)
    }

    /// Replace the registry with the entities of `definition`.
    pub fn load_definition(
        &mut self,
        source: LevelSource,
        definition: LevelFile,
    ) -> Result<(), LevelError> {
        let mut ids = self.ids.clone();
        let built = definition.instantiate(&mut ids, &self.rocket)?;

        self.ids = ids;
        self.entities = built.entities;
        self.outcome = AttemptOutcome::InProgress;
        self.elapsed_ms = 0.0;
        self.level = Some(ActiveLevel {
            source,
            entities: self.entities.iter().map(|e| e.id).collect(),
            tasks: built.tasks,
            definition,
        });
        Ok(())
    }

    /// Load the active level again from its source, with fresh tasks.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        let source = self
            .level
            .as_ref()
            .map(|level| level.source.clone())
            .ok_or(LevelError::NoActiveLevel)?;
        self.load(source)
    }

    /// Number of resolvable ancestors of `entity`.
    pub fn hierarchy_depth(&self, entity: &SimEntity) -> usize {
        let mut depth = 0;
        let mut current = entity;
        while let Some(parent) = resolve_orbit_parent(&self.entities, current) {
            depth += 1;
            if depth >= self.entities.len() {
                break;
            }
            current = parent;
        }
        depth
    }

    /// Per-tick update order: bodies by hierarchy depth, then rockets.
    /// Ties keep registry order.
    pub fn update_order(&self) -> Vec<EntityId> {
        let mut order: Vec<(usize, usize, EntityId)> = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, e)| {
                let rank = if e.is_rocket() {
                    usize::MAX
                } else {
                    self.hierarchy_depth(e)
                };
                (rank, index, e.id)
            })
            .collect();
        order.sort_by_key(|&(rank, index, _)| (rank, index));
        order.into_iter().map(|(_, _, id)| id).collect()
    }

    /// True when the active level has tasks and every one is completed.
    pub fn all_tasks_completed(&self) -> bool {
        let Some(level) = &self.level else {
            return false;
        };
        !level.tasks.is_empty()
            && level.tasks.iter().all(|task_ref| {
                self.entity(task_ref.entity)
                    .and_then(|e| e.tasks())
                    .and_then(|tasks| tasks.get(&task_ref.name))
                    .is_some_and(Task::is_completed)
            })
    }

    /// Advance the world by one frame of `elapsed_seconds` real time.
    ///
    /// The frame is clamped to `max_frame_seconds` first, so a long stall
    /// advances the world (and the task clock) by less than the real time
    /// that passed.
    pub fn tick(&mut self, elapsed_seconds: f64, intents: &ControlIntents) -> TickReport {
        let multiplier = self.physics.delta_multiplier(elapsed_seconds);
        let dt = multiplier * self.physics.step;
        self.elapsed_ms += seconds_to_millis(dt);

        for entity in &mut self.entities {
            entity.trajectory = Trajectory::new(self.physics.trajectory_buffer_size);
        }

        let mut report = TickReport::default();
        for id in self.update_order() {
            let Some(index) = self.entities.iter().position(|e| e.id == id) else {
                continue;
            };
            if self.entities[index].is_rocket() {
                self.update_rocket(index, multiplier, intents, &mut report);
            } else {
                self.update_body(index, multiplier);
            }
        }

        if self.outcome.is_in_progress() && self.all_tasks_completed() {
            self.outcome = AttemptOutcome::Completed {
                time_ms: self.elapsed_ms,
            };
            info!("{}", self.outcome.summary());
            report.level_completed = true;
        }

        report
    }

    fn update_body(&mut self, index: usize, multiplier: f64) {
        let acc = live_acceleration(&self.entities, &self.entities[index]);
        integrate_step(
            &mut self.entities[index].state,
            acc,
            self.physics.step,
            multiplier,
        );

        let trajectory =
            predict_trajectory(&self.entities, &self.entities[index], &self.physics);
        self.entities[index].trajectory = trajectory;
    }

    fn update_rocket(
        &mut self,
        index: usize,
        multiplier: f64,
        intents: &ControlIntents,
        report: &mut TickReport,
    ) {
        let step = self.physics.step;
        let dt = multiplier * step;
        let gravity = live_acceleration(&self.entities, &self.entities[index]);

        let rocket = &mut self.entities[index];
        kick(&mut rocket.state, gravity, step, multiplier);

        let rotation = apply_rotation_input(rocket.rotation(), intents, &self.rocket, dt);
        if intents.thrust {
            let thrust = thrust_acceleration(rotation, &self.rocket);
            kick(&mut rocket.state, thrust, step, multiplier);
        }
        rocket.set_rotation(rotation);

        if intents.toggle_pointing_mode {
            if let Some(data) = rocket.as_rocket_mut() {
                data.pointing = data.pointing.toggled();
                debug!("Pointing mode: {}", data.pointing.label());
            }
        }

        drift(&mut rocket.state, step, multiplier);

        let crash = check_collision(&self.entities, &self.entities[index])
            .map(|body| impact(&self.entities[index], body, self.elapsed_ms));
        if let Some(event) = crash {
            info!(
                "Rocket {} crashed into {} at {:.2} u/s",
                event.rocket,
                event.body_name(),
                event.impact_speed()
            );
            self.entities.remove(index);
            // A finished attempt keeps its first outcome
            if self.outcome.is_in_progress() {
                self.outcome = AttemptOutcome::Crashed(event.clone());
            }
            report.collisions.push(event);
            return;
        }

        self.evaluate_tasks_for(self.entities[index].pos(), report);

        let rocket = &mut self.entities[index];
        if intents.hold_pointing {
            let mode = rocket.as_rocket().map(|data| data.pointing).unwrap_or_default();
            let max_delta = self.rocket.rotation_speed * dt;
            let rotation = orient_toward(rocket.rotation(), rocket.vel(), mode, max_delta);
            rocket.set_rotation(rotation);
        }

        let trajectory =
            predict_trajectory(&self.entities, &self.entities[index], &self.physics);
        self.entities[index].trajectory = trajectory;
    }

    /// Run every body's task evaluator against a rocket at `rocket_pos`.
    fn evaluate_tasks_for(&mut self, rocket_pos: DVec2, report: &mut TickReport) {
        let now = self.elapsed_ms;
        for body in &mut self.entities {
            let distance = body.state.distance_to(rocket_pos);
            let id = body.id;
            let Some(data) = body.as_body_mut() else {
                continue;
            };
            if data.tasks.is_empty() {
                continue;
            }

            for (task, transition) in evaluate_tasks(&mut data.tasks, distance, now) {
                match transition {
                    TaskTransition::Completed => info!("Task '{}' on {} completed", task, id),
                    _ => debug!("Task '{}' on {}: {:?}", task, id, transition),
                }
                report.task_events.push(TaskEvent {
                    body: id,
                    task,
                    transition,
                    time_ms: now,
                });
            }
        }
    }
}

/// System sets for one frame of simulation, in order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSystems {
    /// Read player input into [`ControlIntents`].
    Input,
    /// Apply level load and restart requests.
    Load,
    /// Advance the world.
    Tick,
}

/// Plugin owning the simulation context and its tick.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Simulation>()
            .init_resource::<ControlIntents>()
            .init_resource::<StartupLevel>()
            .add_message::<LoadLevel>()
            .add_message::<CollisionEvent>()
            .add_message::<TaskEvent>()
            .configure_sets(
                Update,
                (
                    SimulationSystems::Input,
                    SimulationSystems::Load,
                    SimulationSystems::Tick,
                )
                    .chain(),
            )
            .add_systems(Startup, load_startup_level)
            .add_systems(Update, handle_level_requests.in_set(SimulationSystems::Load))
            .add_systems(Update, tick_simulation.in_set(SimulationSystems::Tick));
    }
}

/// Load the configured first level, falling back to the sandbox.
fn load_startup_level(mut simulation: ResMut<Simulation>, startup: Res<StartupLevel>) {
    match simulation.load(startup.0.clone()) {
        Ok(()) => info!("Loaded level {}", startup.0.describe()),
        Err(e) => {
            error!("Failed to load level {}: {}", startup.0.describe(), e);
            warn!("Falling back to the sandbox level");
            if let Err(e) = simulation.load(LevelSource::Sandbox) {
                error!("Failed to load the sandbox level: {}", e);
            }
        }
    }
}

/// Apply queued level loads and the restart intent.
fn handle_level_requests(
    mut simulation: ResMut<Simulation>,
    mut requests: MessageReader<LoadLevel>,
    intents: Res<ControlIntents>,
) {
    for LoadLevel(source) in requests.read() {
        match simulation.load(source.clone()) {
            Ok(()) => info!("Loaded level {}", source.describe()),
            Err(e) => error!("Failed to load level {}: {}", source.describe(), e),
        }
    }

    if intents.restart {
        match simulation.restart() {
            Ok(()) => info!("Level restarted"),
            Err(e) => error!("Failed to restart level: {}", e),
        }
    }
}

fn tick_simulation(
    mut simulation: ResMut<Simulation>,
    time: Res<Time>,
    intents: Res<ControlIntents>,
    mut collisions: MessageWriter<CollisionEvent>,
    mut task_events: MessageWriter<TaskEvent>,
) {
    let report = simulation.tick(time.delta_secs_f64(), &intents);
    collisions.write_batch(report.collisions);
    task_events.write_batch(report.task_events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use crate::types::PHYSICS_STEP;
    use approx::assert_relative_eq;

    fn sim_with_sun() -> (Simulation, EntityId) {
        fixtures::planet_scene(200)
    }

    #[test]
    fn test_update_order_roots_first_rockets_last() {
        let (mut sim, sun) = sim_with_sun();
        let rocket = sim.spawn_rocket(DVec2::new(-30.0, 0.0), DVec2::ZERO, 0.0);
        let moon_of_planet = sim.ids.next_id();
        let planet = sim.spawn_body(
            BodyState::new(DVec2::new(50.0, 0.0), DVec2::ZERO, 10.0),
            2.0,
            BodyData {
                orbit_parent: Some(sun),
                ..Default::default()
            },
        );
        let moon = sim.spawn_body(
            BodyState::new(DVec2::new(55.0, 0.0), DVec2::ZERO, 1.0),
            0.5,
            BodyData {
                orbit_parent: Some(planet),
                ..Default::default()
            },
        );
        let free = sim.spawn_body(
            BodyState::new(DVec2::new(-80.0, 0.0), DVec2::ZERO, 1.0),
            0.5,
            BodyData {
                orbit_parent: Some(moon_of_planet),
                ..Default::default()
            },
        );

        assert_eq!(sim.update_order(), vec![sun, free, planet, moon, rocket]);
    }

    #[test]
    fn test_tick_advances_clock_and_predicts() {
        let (mut sim, _) = sim_with_sun();
        let rocket = sim.spawn_rocket(DVec2::new(-30.0, 0.0), DVec2::new(0.0, 2.0), 0.0);

        sim.tick(PHYSICS_STEP, &ControlIntents::default());

        assert_relative_eq!(sim.elapsed_ms(), PHYSICS_STEP * 1000.0, epsilon = 1e-9);
        let rocket = sim.entity(rocket).expect("rocket alive");
        assert_eq!(rocket.trajectory.len(), 200);
        assert!(rocket.pos().x > -30.0);
    }

    #[test]
    fn test_crash_removes_rocket() {
        let (mut sim, sun) = sim_with_sun();
        let rocket = sim.spawn_rocket(DVec2::new(-5.01, 0.0), DVec2::new(1.0, 0.0), 0.0);

        let report = sim.tick(PHYSICS_STEP, &ControlIntents::default());

        assert!(sim.entity(rocket).is_none());
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].body, sun);
        assert!(sim.outcome().is_crashed());
    }

    #[test]
    fn test_thrust_and_rotation_intents() {
        let mut sim = Simulation::default();
        let rocket = sim.spawn_rocket(DVec2::ZERO, DVec2::ZERO, 90.0);
        let intents = ControlIntents {
            thrust: true,
            rotate_right: true,
            ..Default::default()
        };

        sim.tick(0.1, &intents);

        let rocket = sim.entity(rocket).expect("rocket alive");
        assert_relative_eq!(rocket.rotation(), 90.0 + 120.0 * 0.1, epsilon = 1e-9);
        let heading = crate::types::heading(rocket.rotation());
        assert_relative_eq!(rocket.vel().x, heading.x * 0.1, epsilon = 1e-9);
        assert_relative_eq!(rocket.vel().y, heading.y * 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_toggle_pointing_mode() {
        let mut sim = Simulation::default();
        let rocket = sim.spawn_rocket(DVec2::ZERO, DVec2::ZERO, 0.0);
        let toggle = ControlIntents {
            toggle_pointing_mode: true,
            ..Default::default()
        };

        sim.tick(PHYSICS_STEP, &toggle);
        let pointing = sim.entity(rocket).and_then(|e| e.as_rocket()).map(|d| d.pointing);
        assert_eq!(pointing, Some(crate::entity::PointingMode::Retrograde));

        sim.tick(PHYSICS_STEP, &ControlIntents::default());
        let pointing = sim.entity(rocket).and_then(|e| e.as_rocket()).map(|d| d.pointing);
        assert_eq!(pointing, Some(crate::entity::PointingMode::Retrograde));
    }

    #[test]
    fn test_failed_load_keeps_registry() {
        let (mut sim, sun) = sim_with_sun();
        let result = sim.load(LevelSource::File("does/not/exist.json".into()));

        assert!(matches!(result, Err(LevelError::Io(_))));
        assert!(sim.entity(sun).is_some());
        assert!(sim.active_level().is_none());
    }

    #[test]
    fn test_restart_without_level() {
        let mut sim = Simulation::default();
        assert!(matches!(sim.restart(), Err(LevelError::NoActiveLevel)));
    }

    #[test]
    fn test_sandbox_has_no_win() {
        let mut sim = Simulation::default();
        sim.load(LevelSource::Sandbox).expect("sandbox loads");
        sim.tick(PHYSICS_STEP, &ControlIntents::default());
        assert!(!sim.all_tasks_completed());
        assert!(sim.outcome().is_in_progress());
    }
}
