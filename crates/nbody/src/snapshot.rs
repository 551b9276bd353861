//! Per-step readouts handed to the visualization / reporting layer

use serde::Serialize;

use crate::body::Body;
use crate::collisions::MergeRecord;
use crate::energy::{EnergyHistory, EnergySample};
use crate::state::SystemState;

/// Body state for display
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub mass: f64,
    pub radius: f64,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            position: [body.position.x, body.position.y],
            velocity: [body.velocity.x, body.velocity.y],
            mass: body.mass,
            radius: body.radius,
        }
    }
}

/// Complete system readout after one step
///
/// The body count may be smaller than the initial count once merges happen.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub step: u64,
    pub time: f64,
    pub bodies: Vec<BodySnapshot>,
    pub energy: EnergySample,
}

impl Snapshot {
    pub fn capture(state: &SystemState, energy: EnergySample) -> Self {
        Self {
            step: state.step,
            time: state.time,
            bodies: state.bodies().iter().map(BodySnapshot::from).collect(),
            energy,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Everything a completed run produced, for replay or plotting
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    /// One snapshot per step of the run; index 0 is the state it started from
    pub snapshots: Vec<Snapshot>,
    /// Every sample since construction, including steps taken before the run
    pub energy_history: EnergyHistory,
    /// Every merge since construction, including those resolved at setup
    pub merges: Vec<MergeRecord>,
}

impl RunOutput {
    pub fn final_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}
