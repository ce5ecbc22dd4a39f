//! Drawing of the simulation with Bevy gizmos.
//!
//! Reads the [`Simulation`] after each tick and draws bodies, task halos,
//! predicted paths and the rocket. Nothing here mutates simulation state.

pub mod view;

use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::prelude::*;

use crate::entity::{EntityKind, SimEntity, Trajectory};
use crate::simulation::{Simulation, SimulationSystems};
use crate::tasks::{OrbitTaskState, Task};

pub use self::view::{ViewSettings, cross_marker, rocket_outline, thin_polyline, zoom_scale};

/// Only every n-th predicted sample is drawn.
const PATH_STRIDE: usize = 4;

/// Half size of the X drawn where a predicted path ends in a collision.
const CRASH_MARKER_HALF: f64 = 1.0;

const BODY_COLOR: Color = Color::srgb(0.85, 0.85, 0.8);
const BODY_PATH_COLOR: Color = Color::srgba(0.5, 0.5, 0.6, 0.5);
const ROCKET_COLOR: Color = Color::WHITE;
const ROCKET_PATH_COLOR: Color = Color::srgba(0.3, 0.7, 1.0, 0.8);
const CRASH_MARKER_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);
const HALO_IDLE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const HALO_ENTERED_COLOR: Color = Color::srgba(0.2, 1.0, 0.3, 0.6);
const HALO_DONE_COLOR: Color = Color::srgba(0.2, 1.0, 0.3, 0.15);

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Plugin aggregating camera and drawing systems.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewSettings>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_zoom, follow_rocket, draw_world)
                    .chain()
                    .after(SimulationSystems::Tick),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}

/// Zoom with the scroll wheel or +/-.
fn camera_zoom(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
) {
    let mut steps = mouse_scroll.delta.y;
    if keys.any_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        steps += 1.0;
    }
    if keys.any_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        steps -= 1.0;
    }
    if steps == 0.0 {
        return;
    }

    let Ok(mut projection) = camera_query.single_mut() else {
        return;
    };
    let Projection::Orthographic(ref mut ortho) = *projection else {
        return;
    };
    ortho.scale = zoom_scale(ortho.scale, steps);
}

fn follow_rocket(
    simulation: Res<Simulation>,
    view: Res<ViewSettings>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if !view.follow_rocket {
        return;
    }
    let Some(rocket) = simulation.rocket() else {
        return;
    };
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    let target = view.to_render(rocket.pos());
    transform.translation.x = target.x;
    transform.translation.y = target.y;
}

fn draw_world(mut gizmos: Gizmos, simulation: Res<Simulation>, view: Res<ViewSettings>) {
    for entity in simulation.entities() {
        match &entity.kind {
            EntityKind::Body(data) => {
                if view.show_body_paths {
                    draw_trajectory(
                        &mut gizmos,
                        &view,
                        &entity.trajectory,
                        BODY_PATH_COLOR,
                    );
                }
                let center = view.to_render(entity.pos());
                let radius = view.scale_length(entity.collision_radius());
                gizmos.circle_2d(center, radius, BODY_COLOR);

                for task in data.tasks.values() {
                    let Task::Orbit(orbit) = task;
                    let color = match orbit.state() {
                        OrbitTaskState::Inactive => HALO_IDLE_COLOR,
                        OrbitTaskState::Entered => HALO_ENTERED_COLOR,
                        OrbitTaskState::Completed => HALO_DONE_COLOR,
                    };
                    gizmos.circle_2d(center, view.scale_length(orbit.radius), color);
                }
            }
            EntityKind::Rocket(_) => {
                draw_trajectory(
                    &mut gizmos,
                    &view,
                    &entity.trajectory,
                    ROCKET_PATH_COLOR,
                );
                draw_rocket(&mut gizmos, &view, entity);
            }
        }
    }
}

fn draw_rocket(gizmos: &mut Gizmos, view: &ViewSettings, rocket: &SimEntity) {
    let [nose, a, b] = rocket_outline(rocket.pos(), rocket.rotation(), rocket.size);
    gizmos.linestrip_2d([nose, a, b, nose].map(|p| view.to_render(p)), ROCKET_COLOR);
}

/// Predicted path as a polyline, with an X where a truncated path ends.
fn draw_trajectory(
    gizmos: &mut Gizmos,
    view: &ViewSettings,
    trajectory: &Trajectory,
    color: Color,
) {
    if trajectory.len() < 2 {
        return;
    }
    let points = thin_polyline(trajectory.points(), PATH_STRIDE);
    gizmos.linestrip_2d(points.iter().map(|&p| view.to_render(p)), color);

    if trajectory.is_truncated() {
        if let Some(end) = trajectory.last() {
            for (a, b) in cross_marker(end, CRASH_MARKER_HALF) {
                gizmos.line_2d(
                    view.to_render(a),
                    view.to_render(b),
                    CRASH_MARKER_COLOR,
                );
            }
        }
    }
}
