//! Step driver
//!
//! Owns the system state exclusively and advances it one step at a time:
//! leapfrog integration, finiteness check, collision merges, finiteness
//! check, energy sample, snapshot. Steps are strictly sequential; a step's
//! merges are fully applied before the next force evaluation.

use tracing::{info, trace, warn};

use crate::collisions::{CollisionDetector, DirectDetector, MergeRecord, resolve_collisions};
use crate::config::SimulationConfig;
use crate::energy::{EnergyHistory, EnergySample, measure_energy};
use crate::error::{HaltedRun, Quantity, SimulationError};
use crate::forces::DirectGravity;
use crate::integrator::{Integrator, Leapfrog};
use crate::snapshot::{RunOutput, Snapshot};
use crate::state::{InitialConditions, SystemState};

/// Upper bound on the snapshot buffer reserved up front by [`Simulation::run`]
const MAX_PREALLOCATED_SNAPSHOTS: usize = 1 << 16;

/// A configured, running N-body simulation
///
/// # Examples
///
/// ```
/// use nbody::config::SimulationConfig;
/// use nbody::simulation::Simulation;
/// use nbody::state::InitialConditions;
///
/// let initial = InitialConditions::new(
///     vec![[-1.0, 0.0], [1.0, 0.0]],
///     vec![[0.0, -0.5], [0.0, 0.5]],
///     vec![1.0, 1.0],
/// );
/// let config = SimulationConfig::default().with_steps(100);
///
/// let mut sim = Simulation::new(&initial, config).unwrap();
/// let snapshot = sim.step().unwrap();
/// assert_eq!(snapshot.step, 1);
///
/// let output = sim.run().unwrap();
/// assert_eq!(output.snapshots.len(), 101);
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    state: SystemState,
    integrator: Leapfrog,
    gravity: DirectGravity,
    history: EnergyHistory,
    merges: Vec<MergeRecord>,
    last_valid: Snapshot,
    halted: Option<SimulationError>,
}

impl Simulation {
    /// Validates config and initial conditions and takes the step-0 sample
    ///
    /// Pairs that already start closer than the collision policy allows are
    /// merged here, before any force is evaluated, and reported as step-0
    /// merges.
    pub fn new(initial: &InitialConditions, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut state = SystemState::from_initial(initial, &config)?;
        let gravity = DirectGravity::from_config(&config);

        let events = DirectDetector.detect(&state, &config.collision);
        let merges = resolve_collisions(&mut state, events);
        if !merges.is_empty() {
            info!(
                merges = merges.len(),
                bodies = state.body_count(),
                "merged bodies inside the collision threshold at setup"
            );
        }

        let energy = measure_energy(&state, &gravity);
        if !energy.is_finite() {
            return Err(SimulationError::invalid_initial("initial energy is not finite"));
        }

        info!(
            bodies = state.body_count(),
            dt = config.dt,
            g = config.gravitational_constant,
            softening = config.softening,
            "simulation initialized"
        );

        let mut history = EnergyHistory::new();
        history.push(energy);

        Ok(Self {
            integrator: Leapfrog::with_staggering(config.staggering),
            last_valid: Snapshot::capture(&state, energy),
            config,
            state,
            gravity,
            history,
            merges,
            halted: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn energy_history(&self) -> &EnergyHistory {
        &self.history
    }

    /// All merges applied so far, in the order they happened
    ///
    /// Merges resolved at setup carry step 0.
    pub fn merges(&self) -> &[MergeRecord] {
        &self.merges
    }

    /// Most recent snapshot that passed every finiteness check
    pub fn last_snapshot(&self) -> &Snapshot {
        &self.last_valid
    }

    /// Why the simulation stopped, if it did
    pub fn halt_reason(&self) -> Option<&SimulationError> {
        self.halted.as_ref()
    }

    /// Advance one step and return its snapshot
    ///
    /// After a non-finite step the simulation is halted: this and every
    /// later call return the same error, and the state is not advanced again.
    pub fn step(&mut self) -> Result<Snapshot, SimulationError> {
        if let Some(reason) = &self.halted {
            return Err(reason.clone());
        }

        match self.advance() {
            Ok(snapshot) => {
                self.last_valid = snapshot.clone();
                Ok(snapshot)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    last_valid_step = self.last_valid.step,
                    "simulation halted"
                );
                self.halted = Some(err.clone());
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Snapshot, SimulationError> {
        self.integrator
            .step(&mut self.state, self.config.dt, &self.gravity);
        self.state.check_finite()?;

        let events = DirectDetector.detect(&self.state, &self.config.collision);
        let merges = resolve_collisions(&mut self.state, events);
        // Applied merges are part of the state even if this step then halts
        self.merges.extend(merges);
        self.state.check_finite()?;

        let energy = measure_energy(&self.state, &self.gravity);
        if !energy.is_finite() {
            return Err(SimulationError::NonFiniteState {
                step: self.state.step,
                time: self.state.time,
                quantity: Quantity::Energy,
                body: None,
            });
        }

        trace!(
            step = self.state.step,
            bodies = self.state.body_count(),
            total_energy = energy.total,
            "step complete"
        );

        self.history.push(energy);
        Ok(Snapshot::capture(&self.state, energy))
    }

    /// Lazily yields up to `n` snapshots, stopping after the first error
    ///
    /// For live consumers that render each step as it is produced.
    pub fn steps(&mut self, n: u64) -> Steps<'_> {
        Steps {
            simulation: self,
            remaining: n,
            done: false,
        }
    }

    /// Run the configured number of steps and collect everything
    ///
    /// `snapshots[0]` is the state the run started from. The energy history
    /// and merge list cover the simulation's whole lifetime, so after earlier
    /// [`step`](Self::step) calls the history is longer than `snapshots`. On
    /// a non-finite step the run stops and reports the last valid snapshot.
    #[tracing::instrument(skip(self), fields(steps = self.config.steps, bodies = self.state.body_count()))]
    pub fn run(mut self) -> Result<RunOutput, HaltedRun> {
        let capacity = usize::try_from(self.config.steps)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED_SNAPSHOTS)
            + 1;
        let mut snapshots = Vec::with_capacity(capacity);
        snapshots.push(self.last_valid.clone());

        for _ in 0..self.config.steps {
            match self.step() {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(reason) => {
                    return Err(HaltedRun {
                        reason,
                        completed_steps: self.last_valid.step,
                        last_valid: self.last_valid,
                    });
                }
            }
        }

        info!(
            final_bodies = self.state.body_count(),
            merges = self.merges.len(),
            max_energy_drift = self.history.max_abs_drift(),
            "run complete"
        );

        Ok(RunOutput {
            snapshots,
            energy_history: self.history,
            merges: self.merges,
        })
    }

    /// Energy sample for the current state
    pub fn current_energy(&self) -> EnergySample {
        self.last_valid.energy
    }
}

/// Iterator returned by [`Simulation::steps`]
pub struct Steps<'a> {
    simulation: &'a mut Simulation,
    remaining: u64,
    done: bool,
}

impl Iterator for Steps<'_> {
    type Item = Result<Snapshot, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.simulation.step();
        self.done = result.is_err();
        Some(result)
    }
}
