//! Direct N-body gravity (O(N²) implementation)

use nalgebra::Vector2;

use crate::config::SimulationConfig;
use crate::forces::{ForceModel, Softening};
use crate::state::SystemState;

/// Direct O(N²) gravitational force computation
///
/// Visits unordered pairs in ascending order (i, j) with i < j and applies
/// each pair's contribution to both bodies. The visiting order is fixed, so
/// repeated evaluations of the same state give bit-identical results.
///
/// With ε = 0 two coincident bodies produce a non-finite acceleration. The
/// collision pass removes such pairs before they can be evaluated, and the
/// step driver halts if one slips through.
///
/// # Examples
///
/// ```
/// use nbody::forces::DirectGravity;
///
/// // Use a 0.01 softening length to prevent close encounter singularities
/// let gravity = DirectGravity::with_softening(0.01);
/// assert_eq!(gravity.softening, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectGravity {
    /// Softening length ε
    pub softening: f64,
    pub kernel: Softening,
}

impl DirectGravity {
    /// Creates a new direct gravity force with no softening
    pub fn new() -> Self {
        Self {
            softening: 0.0,
            kernel: Softening::Plummer,
        }
    }

    /// Creates a new direct gravity force with specified softening length
    pub fn with_softening(softening: f64) -> Self {
        Self {
            softening,
            ..Self::new()
        }
    }

    pub fn with_kernel(mut self, kernel: Softening) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::with_softening(config.softening).with_kernel(config.softening_kernel)
    }
}

impl Default for DirectGravity {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceModel for DirectGravity {
    fn accelerations(&self, state: &SystemState) -> Vec<Vector2<f64>> {
        let bodies = state.bodies();
        let n = bodies.len();
        let g = state.gravitational_constant;
        let mut accels = vec![Vector2::zeros(); n];

        // No interaction at all, not even 0 · ∞ from coincident bodies
        if g == 0.0 {
            return accels;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let dr = bodies[j].position - bodies[i].position;
                let factor = g * self.kernel.inverse_cube(dr.magnitude_squared(), self.softening);
                accels[i] += dr * (factor * bodies[j].mass);
                accels[j] -= dr * (factor * bodies[i].mass);
            }
        }

        accels
    }

    fn potential_energy(&self, state: &SystemState) -> f64 {
        let bodies = state.bodies();
        let g = state.gravitational_constant;
        if g == 0.0 {
            return 0.0;
        }

        // Each pair counted once, same order as the force loop
        bodies
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                bodies[i + 1..].iter().map(move |b| {
                    let r2 = (a.position - b.position).magnitude_squared();
                    -g * a.mass * b.mass * self.kernel.inverse(r2, self.softening)
                })
            })
            .sum()
    }
}
