//! Time integration for N-body systems
//!
//! The primary integrator is the symplectic leapfrog method, whose energy
//! error oscillates inside an envelope set by Δt instead of growing with the
//! number of steps. `Euler` exists only as a first-order reference for tests
//! that demonstrate the difference.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::forces::ForceModel;
use crate::state::SystemState;

/// A time integrator for N-body systems
///
/// Integrators advance positions and velocities in place and move the
/// system clock forward by `dt`. They never change the body count.
pub trait Integrator: Send + Sync {
    /// Advance the system by one timestep
    fn step(&self, state: &mut SystemState, dt: f64, force: &dyn ForceModel);

    /// Advance the system by multiple timesteps
    ///
    /// # Returns
    ///
    /// Final time after integration
    fn integrate(
        &self,
        state: &mut SystemState,
        dt: f64,
        n_steps: usize,
        force: &dyn ForceModel,
    ) -> f64 {
        for _ in 0..n_steps {
            self.step(state, dt, force);
        }
        state.time
    }
}

/// Ordering of kicks and drifts within one leapfrog step
///
/// Pick one per run. Switching mid-run desynchronizes the staggered
/// velocities and breaks the symplectic property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Staggering {
    /// Velocity Verlet: half kick, drift, half kick
    #[default]
    KickDriftKick,
    /// Position Verlet: half drift, kick, half drift
    DriftKickDrift,
}

/// Symplectic leapfrog integrator (2nd order)
///
/// Kick-drift-kick form, with a(x) re-evaluated after the drift:
///
/// 1. Kick: v(t + dt/2) = v(t) + a(t) * dt/2
/// 2. Drift: x(t + dt) = x(t) + v(t + dt/2) * dt
/// 3. Kick: v(t + dt) = v(t + dt/2) + a(t + dt) * dt/2
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::forces::DirectGravity;
/// use nbody::integrator::{Integrator, Leapfrog};
/// use nbody::state::SystemState;
///
/// let mut system = SystemState::from_bodies(
///     vec![
///         Body::new(1.0, 0.01, [-1.0, 0.0], [0.0, -0.5]),
///         Body::new(1.0, 0.01, [1.0, 0.0], [0.0, 0.5]),
///     ],
///     1.0,
/// )
/// .unwrap();
///
/// Leapfrog::new().step(&mut system, 0.01, &DirectGravity::with_softening(0.01));
/// assert_eq!(system.step, 1);
/// assert!(system.time > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leapfrog {
    pub staggering: Staggering,
}

impl Leapfrog {
    /// Creates a leapfrog integrator in kick-drift-kick form
    pub fn new() -> Self {
        Self {
            staggering: Staggering::KickDriftKick,
        }
    }

    /// Creates a leapfrog integrator using drift-kick-drift form
    pub fn new_dkd() -> Self {
        Self {
            staggering: Staggering::DriftKickDrift,
        }
    }

    pub fn with_staggering(staggering: Staggering) -> Self {
        Self { staggering }
    }

    /// Update velocities from accelerations at the current positions
    fn kick(&self, state: &mut SystemState, dt: f64, force: &dyn ForceModel) {
        let accelerations: Vec<Vector2<f64>> = force.accelerations(state);

        state
            .bodies_mut()
            .iter_mut()
            .zip(accelerations.iter())
            .for_each(|(body, accel)| {
                body.velocity += accel * dt;
            });
    }

    /// Update positions from current velocities
    fn drift(&self, state: &mut SystemState, dt: f64) {
        state.bodies_mut().iter_mut().for_each(|body| {
            body.position += body.velocity * dt;
        });
    }
}

impl Integrator for Leapfrog {
    fn step(&self, state: &mut SystemState, dt: f64, force: &dyn ForceModel) {
        match self.staggering {
            Staggering::KickDriftKick => {
                self.kick(state, dt / 2.0, force);
                self.drift(state, dt);
                self.kick(state, dt / 2.0, force);
            }
            Staggering::DriftKickDrift => {
                self.drift(state, dt / 2.0);
                self.kick(state, dt, force);
                self.drift(state, dt / 2.0);
            }
        }

        state.advance_clock(dt);
    }
}

/// Explicit Euler integrator (1st order, for comparison only)
///
/// Energy drifts secularly under Euler. It is kept so tests can show the
/// contrast with `Leapfrog`; the simulation driver never uses it.
pub struct Euler;

impl Integrator for Euler {
    fn step(&self, state: &mut SystemState, dt: f64, force: &dyn ForceModel) {
        let accelerations: Vec<Vector2<f64>> = force.accelerations(state);

        state
            .bodies_mut()
            .iter_mut()
            .zip(accelerations.iter())
            .for_each(|(body, accel)| {
                body.position += body.velocity * dt;
                body.velocity += accel * dt;
            });

        state.advance_clock(dt);
    }
}
