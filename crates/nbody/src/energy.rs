//! Energy bookkeeping
//!
//! A read-only pass over the registry. The potential uses the same softening
//! kernel as the force evaluation, so leapfrog conserves exactly the energy
//! reported here (up to its bounded oscillation).

use serde::Serialize;

use crate::forces::ForceModel;
use crate::state::SystemState;

/// Energies of the system at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySample {
    pub step: u64,
    pub time: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergySample {
    pub fn is_finite(&self) -> bool {
        self.kinetic.is_finite() && self.potential.is_finite() && self.total.is_finite()
    }
}

/// Measures kinetic, potential and total energy of `state`
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::energy::measure_energy;
/// use nbody::forces::DirectGravity;
/// use nbody::state::SystemState;
///
/// let state = SystemState::from_bodies(
///     vec![
///         Body::new(1.0, 0.01, [-1.0, 0.0], [0.0, -0.5]),
///         Body::new(1.0, 0.01, [1.0, 0.0], [0.0, 0.5]),
///     ],
///     1.0,
/// )
/// .unwrap();
///
/// let sample = measure_energy(&state, &DirectGravity::new());
/// assert_eq!(sample.kinetic, 0.25);
/// assert_eq!(sample.potential, -0.5);
/// assert_eq!(sample.total, -0.25);
/// ```
pub fn measure_energy(state: &SystemState, force: &dyn ForceModel) -> EnergySample {
    let kinetic = state.kinetic_energy();
    let potential = force.potential_energy(state);

    EnergySample {
        step: state.step,
        time: state.time,
        kinetic,
        potential,
        total: kinetic + potential,
    }
}

/// Append-only record of energy samples, one per step
///
/// Used for reporting only; nothing here feeds back into the dynamics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EnergyHistory {
    samples: Vec<EnergySample>,
}

impl EnergyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: EnergySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[EnergySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&EnergySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&EnergySample> {
        self.samples.last()
    }

    /// Largest |E(t) − E(0)| seen so far
    pub fn max_abs_drift(&self) -> f64 {
        let Some(initial) = self.first() else {
            return 0.0;
        };
        self.samples
            .iter()
            .map(|s| (s.total - initial.total).abs())
            .fold(0.0, f64::max)
    }

    /// (E_last − E_first) / |E_first|, or 0 when the initial energy is zero
    pub fn relative_drift(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) if first.total != 0.0 => {
                (last.total - first.total) / first.total.abs()
            }
            _ => 0.0,
        }
    }

    pub fn into_samples(self) -> Vec<EnergySample> {
        self.samples
    }
}
