//! Error taxonomy for the simulation core
//!
//! Two classes of failure exist: a configuration or initial state that is
//! rejected before the first step, and a step that produced non-finite
//! numbers. Nothing is retried; a non-finite step halts the run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::snapshot::Snapshot;

/// Which physical quantity went non-finite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Quantity {
    Position,
    Velocity,
    Energy,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Position => write!(f, "position"),
            Quantity::Velocity => write!(f, "velocity"),
            Quantity::Energy => write!(f, "energy"),
        }
    }
}

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Malformed or non-physical initial configuration
    #[error("invalid initial state: {reason}")]
    InvalidInitialState { reason: String },

    /// Run parameters that cannot drive a simulation
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A step produced NaN or Inf
    #[error("non-finite {quantity} at step {step} (t = {time}){}", body_suffix(.body))]
    NonFiniteState {
        step: u64,
        time: f64,
        quantity: Quantity,
        body: Option<usize>,
    },
}

fn body_suffix(body: &Option<usize>) -> String {
    body.map(|i| format!(" on body {i}")).unwrap_or_default()
}

impl SimulationError {
    pub(crate) fn invalid_initial(reason: impl Into<String>) -> Self {
        Self::InvalidInitialState {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// A run that stopped before completing all requested steps
///
/// Carries the last snapshot that passed every finiteness check so the
/// caller can still show or persist a consistent state.
#[derive(Debug, Clone, Error)]
#[error("run halted after {completed_steps} steps")]
pub struct HaltedRun {
    #[source]
    pub reason: SimulationError,
    pub last_valid: Snapshot,
    pub completed_steps: u64,
}
