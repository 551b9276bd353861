//! Force models for N-body simulations
//!
//! This module provides the `ForceModel` trait, the all-pairs
//! `DirectGravity` kernel and the softening conventions it can use.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::state::SystemState;

pub mod gravity;


pub use gravity::DirectGravity;

/// A source of acceleration on bodies in an N-body system
///
/// Implementations must not keep state between calls; everything they need
/// comes from the borrowed `SystemState`.
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::forces::{DirectGravity, ForceModel};
/// use nbody::state::SystemState;
///
/// let state = SystemState::from_bodies(
///     vec![
///         Body::new(1.0, 0.01, [-1.0, 0.0], [0.0, 0.0]),
///         Body::new(1.0, 0.01, [1.0, 0.0], [0.0, 0.0]),
///     ],
///     1.0,
/// )
/// .unwrap();
///
/// let accels = DirectGravity::new().accelerations(&state);
/// assert!(accels[0].x > 0.0);
/// assert!(accels[1].x < 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Net acceleration on every body, indexed like `state.bodies()`
    fn accelerations(&self, state: &SystemState) -> Vec<Vector2<f64>>;

    /// Potential energy of the configuration
    ///
    /// Default implementation returns 0.0 for forces without a potential.
    fn potential_energy(&self, _state: &SystemState) -> f64 {
        0.0
    }
}

/// How the softening length ε enters the force and the potential
///
/// Both variants use one convention for force and potential so that the
/// force is the gradient of the potential outside ε.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Softening {
    /// Plummer kernel: d² = r² + ε²
    ///
    /// a = G m r⃗ / d³ and Φ = −G m₁ m₂ / d. The force is the exact gradient
    /// of the potential at every separation.
    #[default]
    Plummer,
    /// Separation floor: d = max(r, ε) in both force and potential
    Clamped,
}

impl Softening {
    /// Factor 1 / d³ multiplying the separation vector in the force law
    pub fn inverse_cube(self, r2: f64, epsilon: f64) -> f64 {
        match self {
            Softening::Plummer => {
                let d2 = r2 + epsilon * epsilon;
                1.0 / (d2 * d2.sqrt())
            }
            Softening::Clamped => {
                let d = r2.sqrt().max(epsilon);
                1.0 / (d * d * d)
            }
        }
    }

    /// Factor 1 / d in the pair potential
    pub fn inverse(self, r2: f64, epsilon: f64) -> f64 {
        match self {
            Softening::Plummer => 1.0 / (r2 + epsilon * epsilon).sqrt(),
            Softening::Clamped => 1.0 / r2.sqrt().max(epsilon),
        }
    }
}
