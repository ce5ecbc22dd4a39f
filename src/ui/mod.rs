//! UI module providing the egui interface: task list, flight HUD, outcome
//! screens and level selection.

mod icons;
mod level_select;
mod overlays;
mod task_panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub use level_select::LevelCatalog;
pub use overlays::outcome_text;
pub use task_panel::{TaskRow, task_rows, task_status_text};

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelCatalog>()
            .init_resource::<icons::FontsInitialized>()
            .add_systems(Startup, level_select::scan_levels)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    icons::setup_fonts,
                    task_panel::task_panel_system,
                    overlays::hud_system,
                    overlays::outcome_overlay_system,
                    level_select::level_select_system,
                )
                    .chain(),
            );
    }
}
