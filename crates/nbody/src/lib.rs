//! Planar Newtonian N-body dynamics with inelastic mergers
//!
//! Bodies attract each other through a softened all-pairs gravity kernel,
//! advance with a symplectic leapfrog integrator, and merge (conserving mass
//! and momentum) when they come too close. Each step yields a [`Snapshot`]
//! with the body states and the kinetic / potential / total energy.
//!
//! ```
//! use nbody::scenarios::two_body_circular;
//! use nbody::simulation::Simulation;
//!
//! let (initial, config) = two_body_circular();
//! let output = Simulation::new(&initial, config).unwrap().run().unwrap();
//!
//! assert_eq!(output.final_snapshot().unwrap().body_count(), 2);
//! assert!(output.energy_history.max_abs_drift() < 1e-3);
//! ```

pub mod body;
pub mod collisions;
pub mod config;
pub mod energy;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod scenarios;
pub mod simulation;
pub mod snapshot;
pub mod state;

pub use config::SimulationConfig;
pub use error::{HaltedRun, SimulationError};
pub use simulation::Simulation;
pub use snapshot::{BodySnapshot, RunOutput, Snapshot};
pub use state::{InitialConditions, SystemState};

#[cfg(test)]
mod body_test;
#[cfg(test)]
mod simulation_test;
