//! Phosphor icon font setup and the icons used by the UI.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Whether the icon font has been installed into the egui context.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// Install the Phosphor font once the egui context exists.
pub fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
    initialized.0 = true;

    info!("Phosphor icon fonts initialized");
}

/// Completed task
pub const CHECK: &str = egui_phosphor::regular::CHECK;
/// Flight HUD title
pub const ROCKET: &str = egui_phosphor::regular::ROCKET;
/// Dominant body / level entries
pub const PLANET: &str = egui_phosphor::regular::PLANET;
/// Elapsed time
pub const TIMER: &str = egui_phosphor::regular::TIMER;
/// Speed readout
pub const GAUGE: &str = egui_phosphor::regular::GAUGE;
/// Restart hint
pub const RESTART: &str = egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE;
/// Sandbox level
pub const SANDBOX: &str = egui_phosphor::regular::CUBE;
