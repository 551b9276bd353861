//! Run configuration
//!
//! Every knob that shapes the dynamics (G, Δt, softening, collision policy,
//! staggering) is fixed when a [`Simulation`](crate::simulation::Simulation)
//! is built and never changes mid-run.
//!
//! The struct deserializes with per-field defaults so a surrounding layer can
//! load a partial description:
//!
//! ```
//! use nbody::config::SimulationConfig;
//!
//! let config = SimulationConfig::default()
//!     .with_dt(0.005)
//!     .with_gravitational_constant(3.0);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.steps, 1000);
//! ```

use serde::{Deserialize, Serialize};

use crate::collisions::CollisionPolicy;
use crate::error::SimulationError;
use crate::forces::Softening;
use crate::integrator::Staggering;

/// Parameters for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Gravitational constant G (code units)
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    /// Step size Δt
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Softening length ε
    #[serde(default = "default_softening")]
    pub softening: f64,
    /// How ε enters the force and potential
    #[serde(default)]
    pub softening_kernel: Softening,
    /// Which pairs count as colliding
    #[serde(default)]
    pub collision: CollisionPolicy,
    /// Leapfrog staggering, held for the whole run
    #[serde(default)]
    pub staggering: Staggering,
    /// Surface density used to derive radii the caller did not supply
    #[serde(default = "default_density")]
    pub density: f64,
    /// Number of steps taken by `Simulation::run`
    #[serde(default = "default_steps")]
    pub steps: u64,
}

fn default_gravitational_constant() -> f64 {
    1.0
}

fn default_dt() -> f64 {
    0.01
}

fn default_softening() -> f64 {
    0.01
}

fn default_density() -> f64 {
    1.0
}

fn default_steps() -> u64 {
    1000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: default_gravitational_constant(),
            dt: default_dt(),
            softening: default_softening(),
            softening_kernel: Softening::default(),
            collision: CollisionPolicy::default(),
            staggering: Staggering::default(),
            density: default_density(),
            steps: default_steps(),
        }
    }
}

impl SimulationConfig {
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_softening_kernel(mut self, kernel: Softening) -> Self {
        self.softening_kernel = kernel;
        self
    }

    pub fn with_collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Shorthand for a fixed-distance collision policy
    pub fn with_collision_threshold(self, threshold: f64) -> Self {
        self.with_collision(CollisionPolicy::FixedDistance { threshold })
    }

    pub fn with_staggering(mut self, staggering: Staggering) -> Self {
        self.staggering = staggering;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_steps(mut self, steps: u64) -> Self {
        self.steps = steps;
        self
    }

    /// Check that the parameters can drive a simulation
    ///
    /// G = 0 is accepted: it turns the run into pure kinematic drift.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.gravitational_constant.is_finite() || self.gravitational_constant < 0.0 {
            return Err(SimulationError::invalid_config(format!(
                "gravitational constant must be finite and non-negative, got {}",
                self.gravitational_constant
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::invalid_config(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(SimulationError::invalid_config(format!(
                "softening must be finite and non-negative, got {}",
                self.softening
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(SimulationError::invalid_config(format!(
                "density must be finite and positive, got {}",
                self.density
            )));
        }
        self.collision.validate()
    }
}
