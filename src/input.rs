//! Keyboard controls.
//!
//! Polls the keyboard once per frame and rewrites [`ControlIntents`] before
//! the simulation ticks. Held keys map to continuous intents; the pointing
//! toggle and restart fire only on the frame their key goes down.

use bevy::prelude::*;

use crate::rocket::ControlIntents;
use crate::simulation::SimulationSystems;

/// Plugin translating keyboard state into control intents.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlIntents>()
            .add_systems(Update, read_control_keys.in_set(SimulationSystems::Input));
    }
}

fn read_control_keys(keys: Res<ButtonInput<KeyCode>>, mut intents: ResMut<ControlIntents>) {
    *intents = intents_from_keys(&keys);
}

/// Map the current keyboard state to intents.
///
/// Left/A and Right/D rotate, Up/W thrusts, Down/S toggles pointing mode,
/// Space holds the pointing direction and R restarts.
pub fn intents_from_keys(keys: &ButtonInput<KeyCode>) -> ControlIntents {
    ControlIntents {
        rotate_left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        rotate_right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        thrust: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
        toggle_pointing_mode: keys.any_just_pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
        hold_pointing: keys.pressed(KeyCode::Space),
        restart: keys.just_pressed(KeyCode::KeyR),
    }
}
