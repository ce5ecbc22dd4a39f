//! Orbits - 2D orbital mechanics sandbox
//!
//! A library crate providing the gravity simulation, trajectory prediction
//! and level handling, plus the Bevy plugins that drive and draw them.

pub mod collision;
pub mod entity;
pub mod input;
pub mod level;
pub mod outcome;
pub mod physics;
pub mod prediction;
pub mod render;
pub mod rocket;
pub mod simulation;
pub mod tasks;
pub mod types;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
