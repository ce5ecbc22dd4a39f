//! World-to-screen mapping and drawing geometry.
//!
//! Everything here is pure so it can be tested without a window.

use bevy::math::{DVec2, Vec2};
use bevy::prelude::*;

use crate::types::heading;

/// Screen pixels per world unit at zoom 1.
pub const PIXELS_PER_UNIT: f64 = 10.0;

/// Closest zoom.
pub const MIN_ZOOM: f32 = 0.05;

/// Furthest zoom.
pub const MAX_ZOOM: f32 = 20.0;

/// Zoom change per scroll step or per frame of held key.
pub const ZOOM_SPEED: f32 = 0.1;

/// View configuration.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ViewSettings {
    /// World-to-render scale.
    pub pixels_per_unit: f64,
    /// Keep the camera centred on the rocket.
    pub follow_rocket: bool,
    /// Draw predicted paths for bodies as well as the rocket.
    pub show_body_paths: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            pixels_per_unit: PIXELS_PER_UNIT,
            follow_rocket: true,
            show_body_paths: true,
        }
    }
}

impl ViewSettings {
    /// Render-space position of a world point.
    pub fn to_render(&self, world: DVec2) -> Vec2 {
        (world * self.pixels_per_unit).as_vec2()
    }

    /// Render-space length of a world distance.
    pub fn scale_length(&self, world: f64) -> f32 {
        (world * self.pixels_per_unit) as f32
    }
}

/// New orthographic scale after a zoom step (`steps` > 0 zooms in).
pub fn zoom_scale(current: f32, steps: f32) -> f32 {
    (current * (1.0 - steps * ZOOM_SPEED)).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Rocket triangle in world space: nose, then the two rear corners.
///
/// `size` holds half extents: `x` across, `y` along the heading.
pub fn rocket_outline(pos: DVec2, rotation_degrees: f64, size: DVec2) -> [DVec2; 3] {
    let forward = heading(rotation_degrees);
    let right = DVec2::new(forward.y, -forward.x);
    [
        pos + forward * size.y,
        pos - forward * size.y + right * size.x,
        pos - forward * size.y - right * size.x,
    ]
}

/// The two strokes of an X centred on `center`.
pub fn cross_marker(center: DVec2, half: f64) -> [(DVec2, DVec2); 2] {
    [
        (center + DVec2::new(-half, -half), center + DVec2::new(half, half)),
        (center + DVec2::new(-half, half), center + DVec2::new(half, -half)),
    ]
}

/// Every `stride`-th point of `points`, always keeping the last one.
pub fn thin_polyline(points: &[DVec2], stride: usize) -> Vec<DVec2> {
    let stride = stride.max(1);
    let mut thinned: Vec<DVec2> = points.iter().step_by(stride).copied().collect();
    if let Some(&last) = points.last() {
        if thinned.last() != Some(&last) {
            thinned.push(last);
        }
    }
    thinned
}
