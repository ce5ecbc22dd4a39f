//! Level selection bar.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::level::{LEVELS_DIR, LevelSource, discover_levels};
use crate::simulation::{LoadLevel, Simulation};
use super::icons;

/// Level files offered in the selection bar.
#[derive(Resource, Clone, Debug, Default)]
pub struct LevelCatalog {
    pub levels: Vec<PathBuf>,
}

impl LevelCatalog {
    /// Scan `dir` for level files. A missing directory yields an empty list.
    pub fn scan(dir: &Path) -> Self {
        match discover_levels(dir) {
            Ok(levels) => {
                info!("Found {} level(s) in {}", levels.len(), dir.display());
                Self { levels }
            }
            Err(e) => {
                warn!("Could not list levels in {}: {}", dir.display(), e);
                Self::default()
            }
        }
    }
}

pub fn scan_levels(mut commands: Commands) {
    commands.insert_resource(LevelCatalog::scan(Path::new(LEVELS_DIR)));
}

pub fn level_select_system(
    mut contexts: EguiContexts,
    catalog: Res<LevelCatalog>,
    simulation: Res<Simulation>,
    mut requests: MessageWriter<LoadLevel>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let current = simulation.active_level().map(|level| &level.source);

    egui::TopBottomPanel::bottom("level_select").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Some(level) = simulation.active_level() {
                ui.label(egui::RichText::new(&level.definition.name).strong());
                ui.separator();
            }

            for (index, path) in catalog.levels.iter().enumerate() {
                let source = LevelSource::File(path.clone());
                let selected = current == Some(&source);
                let label = format!("{} {}", icons::PLANET, index + 1);
                if ui.selectable_label(selected, label).clicked() {
                    requests.write(LoadLevel(source));
                }
            }

            let sandbox_selected = current == Some(&LevelSource::Sandbox);
            let label = format!("{} Sandbox", icons::SANDBOX);
            if ui.selectable_label(sandbox_selected, label).clicked() {
                requests.write(LoadLevel(LevelSource::Sandbox));
            }
        });
    });
}
