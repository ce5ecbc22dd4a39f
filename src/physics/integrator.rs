//! Fixed-quantum integration.
//!
//! Velocity is updated first and the new velocity moves the position
//! (semi-implicit Euler). Real-time updates scale one quantum by
//! `elapsed / step`; predictions always advance by exactly one quantum.

use bevy::math::DVec2;

use crate::types::{BodyState, MAX_FRAME_SECONDS, PHYSICS_STEP, TRAJECTORY_BUFFER_SIZE};

/// Configuration for integration and prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Physics quantum in seconds.
    pub step: f64,
    /// Maximum samples per predicted trajectory.
    pub trajectory_buffer_size: usize,
    /// Longest real frame time applied in one tick (seconds).
    pub max_frame_seconds: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            step: PHYSICS_STEP,
            trajectory_buffer_size: TRAJECTORY_BUFFER_SIZE,
            max_frame_seconds: MAX_FRAME_SECONDS,
        }
    }
}

impl PhysicsConfig {
    /// Scale factor turning one quantum into `elapsed_seconds` of motion.
    ///
    /// Negative or non-finite input yields 0; long frames are clamped to
    /// `max_frame_seconds`.
    pub fn delta_multiplier(&self, elapsed_seconds: f64) -> f64 {
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            return 0.0;
        }
        elapsed_seconds.min(self.max_frame_seconds) / self.step
    }
}

/// Apply an acceleration to the velocity over one scaled quantum.
#[inline]
pub fn kick(state: &mut BodyState, acc: DVec2, step: f64, multiplier: f64) {
    state.vel += acc * step * multiplier;
}

/// Move the position by the current velocity over one scaled quantum.
#[inline]
pub fn drift(state: &mut BodyState, step: f64, multiplier: f64) {
    state.pos += state.vel * step * multiplier;
}

/// One full update: kick then drift.
#[inline]
pub fn integrate_step(state: &mut BodyState, acc: DVec2, step: f64, multiplier: f64) {
    kick(state, acc, step, multiplier);
    drift(state, step, multiplier);
}
