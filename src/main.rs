//! Orbits - 2D orbital mechanics sandbox
//!
//! Fly a rocket through a system of orbiting bodies and complete each
//! level's tasks without crashing. The first command-line argument, if
//! given, is the path of the level to start with.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use orbits::input::InputPlugin;
use orbits::level::LevelSource;
use orbits::render::RenderPlugin;
use orbits::simulation::{SimulationPlugin, StartupLevel};
use orbits::ui::UiPlugin;

fn main() {
    let startup = std::env::args()
        .nth(1)
        .map(|path| StartupLevel(LevelSource::File(PathBuf::from(path))))
        .unwrap_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbits".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        // Insert before SimulationPlugin so its default does not apply
        .insert_resource(startup)
        .add_plugins((SimulationPlugin, InputPlugin, RenderPlugin, UiPlugin))
        .run();
}
