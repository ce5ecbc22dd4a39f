//! Attempt outcome and orbit readouts.
//!
//! An attempt is in progress until the rocket crashes or every task in the
//! level is completed. The orbital element helpers classify the rocket's
//! current path around a single body for the HUD.

use bevy::math::DVec2;

use crate::collision::CollisionEvent;
use crate::entity::{EntityId, SimEntity};

/// State of the current attempt at a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AttemptOutcome {
    /// Still flying.
    #[default]
    InProgress,

    /// The rocket hit a body and was removed.
    Crashed(CollisionEvent),

    /// Every task in the level was completed.
    Completed {
        /// Simulation clock when the last task completed (milliseconds).
        time_ms: f64,
    },
}

impl AttemptOutcome {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self, Self::Crashed(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Short status line.
    pub fn summary(&self) -> String {
        match self {
            Self::InProgress => "In flight".to_string(),
            Self::Crashed(event) => format!(
                "Crashed into {} at {:.2} u/s",
                event.body_name(),
                event.impact_speed()
            ),
            Self::Completed { time_ms } => {
                format!("All tasks completed in {:.1} s", time_ms / 1000.0)
            }
        }
    }
}

/// Two-body orbital elements of a state relative to one attractor (G = 1).
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis. Negative for hyperbolic paths.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Specific orbital energy. Negative when bound.
    pub energy: f64,
    /// Period in seconds, only for bound orbits.
    pub period: Option<f64>,
}

impl OrbitalElements {
    pub fn is_bound(&self) -> bool {
        self.energy < 0.0
    }

    /// Closest approach to the attractor's centre.
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Farthest distance, only for bound orbits.
    pub fn apoapsis(&self) -> Option<f64> {
        self.is_bound()
            .then(|| self.semi_major_axis * (1.0 + self.eccentricity))
    }
}

/// Specific orbital energy, E = v²/2 - M/r.
///
/// `None` at the attractor's centre.
pub fn orbital_energy(rel_pos: DVec2, rel_vel: DVec2, mass: f64) -> Option<f64> {
    let r = rel_pos.length();
    if r <= f64::EPSILON {
        return None;
    }
    Some(0.5 * rel_vel.length_squared() - mass / r)
}

/// Orbital elements from a relative state vector.
///
/// `None` at the centre, for a massless attractor, or for a parabolic path.
pub fn compute_orbital_elements(
    rel_pos: DVec2,
    rel_vel: DVec2,
    mass: f64,
) -> Option<OrbitalElements> {
    if mass <= 0.0 {
        return None;
    }
    let energy = orbital_energy(rel_pos, rel_vel, mass)?;
    if energy.abs() <= f64::EPSILON {
        return None;
    }

    let h = rel_pos.perp_dot(rel_vel);
    let semi_major_axis = -mass / (2.0 * energy);
    let eccentricity = (1.0 + 2.0 * energy * h * h / (mass * mass)).max(0.0).sqrt();
    let period = (energy < 0.0)
        .then(|| std::f64::consts::TAU * (semi_major_axis.powi(3) / mass).sqrt());

    Some(OrbitalElements {
        semi_major_axis,
        eccentricity,
        energy,
        period,
    })
}

/// The body whose gravity dominates at `pos`.
pub fn dominant_body<'a>(
    entities: &'a [SimEntity],
    pos: DVec2,
    exclude: EntityId,
) -> Option<&'a SimEntity> {
    entities
        .iter()
        .filter(|e| e.id != exclude && e.is_gravitating())
        .max_by(|a, b| {
            let pull = |e: &SimEntity| e.mass() / e.pos().distance_squared(pos).max(f64::EPSILON);
            pull(a).total_cmp(&pull(b))
        })
}

/// Orbit of `entity` around whichever body dominates it.
pub fn orbit_readout<'a>(
    entities: &'a [SimEntity],
    entity: &SimEntity,
) -> Option<(&'a SimEntity, OrbitalElements)> {
    let body = dominant_body(entities, entity.pos(), entity.id)?;
    let elements = compute_orbital_elements(
        entity.pos() - body.pos(),
        entity.vel() - body.vel(),
        body.mass(),
    )?;
    Some((body, elements))
}
