//! Task list panel.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::simulation::Simulation;
use crate::tasks::{OrbitTaskState, Task};
use super::icons;

/// Status column for one task: a check mark, the seconds left, or nothing.
pub fn task_status_text(task: &Task, now_ms: f64) -> String {
    match task {
        Task::Orbit(orbit) => match orbit.state() {
            OrbitTaskState::Completed => icons::CHECK.to_string(),
            OrbitTaskState::Entered => {
                let left = orbit.remaining(now_ms).unwrap_or(0.0).max(0.0);
                format!("{:.1}s", left / 1000.0)
            }
            OrbitTaskState::Inactive => String::new(),
        },
    }
}

/// One line of the task panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub info: String,
    pub status: String,
    /// Fraction of the hold time already spent inside.
    pub progress: f32,
}

/// Rows of the task panel in level order.
pub fn task_rows(simulation: &Simulation) -> Vec<TaskRow> {
    let Some(level) = simulation.active_level() else {
        return Vec::new();
    };
    let now = simulation.elapsed_ms();
    level
        .tasks
        .iter()
        .filter_map(|task_ref| {
            let task = simulation
                .entity(task_ref.entity)?
                .tasks()?
                .get(&task_ref.name)?;
            let progress = match task {
                Task::Orbit(orbit) => orbit.progress(now),
            };
            Some(TaskRow {
                info: task.info().to_string(),
                status: task_status_text(task, now),
                progress: progress as f32,
            })
        })
        .collect()
}

pub fn task_panel_system(mut contexts: EguiContexts, simulation: Res<Simulation>) {
    let rows = task_rows(&simulation);
    if rows.is_empty() {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Tasks")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("task_grid").striped(true).show(ui, |ui| {
                for row in &rows {
                    ui.label(&row.info);
                    ui.add(egui::ProgressBar::new(row.progress).desired_width(60.0));
                    ui.label(egui::RichText::new(&row.status).strong());
                    ui.end_row();
                }
            });
        });
}
