//! Outcome screens and the flight HUD.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::outcome::{AttemptOutcome, orbit_readout};
use crate::simulation::Simulation;
use super::icons;

/// Title and subtitle for a finished attempt.
pub fn outcome_text(outcome: &AttemptOutcome) -> Option<(&'static str, String)> {
    match outcome {
        AttemptOutcome::InProgress => None,
        AttemptOutcome::Crashed(event) => Some((
            "You crashed",
            format!(
                "Hit {} at {:.2} u/s. Press R to restart",
                event.body_name(),
                event.impact_speed()
            ),
        )),
        AttemptOutcome::Completed { time_ms } => Some((
            "You win",
            format!("All tasks done in {:.1} s. Press R to restart", time_ms / 1000.0),
        )),
    }
}

/// Centred fail or win screen.
pub fn outcome_overlay_system(mut contexts: EguiContexts, simulation: Res<Simulation>) {
    let Some((title, subtitle)) = outcome_text(simulation.outcome()) else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let color = if simulation.outcome().is_crashed() {
        egui::Color32::from_rgb(220, 50, 50)
    } else {
        egui::Color32::from_rgb(50, 200, 80)
    };

    egui::Area::new(egui::Id::new("outcome_overlay"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(title).size(48.0).strong().color(color));
                ui.label(
                    egui::RichText::new(format!("{} {subtitle}", icons::RESTART)).size(20.0),
                );
            });
        });
}

/// Pointing mode, speed and the rocket's orbit around its dominant body.
pub fn hud_system(mut contexts: EguiContexts, simulation: Res<Simulation>) {
    let Some(rocket) = simulation.rocket() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let pointing = rocket
        .as_rocket()
        .map(|data| data.pointing.label())
        .unwrap_or_default();
    let readout = orbit_readout(simulation.entities(), rocket);

    egui::Window::new("Flight")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{} {pointing}", icons::ROCKET))
                    .strong()
                    .monospace(),
            );
            ui.label(format!("{} Speed: {:.2}", icons::GAUGE, rocket.vel().length()));
            ui.label(format!(
                "{} Time: {:.1} s",
                icons::TIMER,
                simulation.elapsed_ms() / 1000.0
            ));

            if let Some((body, elements)) = readout {
                ui.separator();
                let name = body
                    .as_body()
                    .and_then(|data| data.label.clone())
                    .unwrap_or_else(|| body.id.to_string());
                ui.label(format!("{} Around {name}", icons::PLANET));
                ui.label(format!("Periapsis: {:.1}", elements.periapsis()));
                match elements.apoapsis() {
                    Some(apoapsis) => ui.label(format!("Apoapsis: {apoapsis:.1}")),
                    None => ui.label("Escaping"),
                };
            }
        });
}
