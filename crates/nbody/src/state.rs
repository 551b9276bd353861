//! Body registry: the ordered set of live bodies plus the simulation clock

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::body::{Body, disk_radius};
use crate::config::SimulationConfig;
use crate::error::SimulationError;

/// Caller-supplied starting configuration
///
/// Positions, velocities and masses are parallel sequences indexed by body.
/// Radii are optional; when absent they are derived from mass at the
/// configured surface density.
///
/// # Examples
///
/// ```
/// use nbody::state::InitialConditions;
///
/// let initial = InitialConditions::from_momenta(
///     vec![[0.0, 1.0], [0.0, -1.0]],
///     vec![[2.0, 0.0], [-2.0, 0.0]],
///     vec![1.0, 2.0],
/// );
///
/// assert_eq!(initial.velocities[1], [-1.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialConditions {
    pub positions: Vec<[f64; 2]>,
    pub velocities: Vec<[f64; 2]>,
    pub masses: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
}

impl InitialConditions {
    pub fn new(positions: Vec<[f64; 2]>, velocities: Vec<[f64; 2]>, masses: Vec<f64>) -> Self {
        Self {
            positions,
            velocities,
            masses,
            radii: None,
        }
    }

    /// Builds initial conditions from momenta instead of velocities (v = p / m)
    ///
    /// A zero mass yields a non-finite velocity here; validation in
    /// [`SystemState::from_initial`] rejects it before any step runs.
    pub fn from_momenta(positions: Vec<[f64; 2]>, momenta: Vec<[f64; 2]>, masses: Vec<f64>) -> Self {
        let velocities = momenta
            .iter()
            .zip(&masses)
            .map(|(p, &m)| [p[0] / m, p[1] / m])
            .collect();
        Self::new(positions, velocities, masses)
    }

    /// Builds initial conditions from loosely shaped rows
    ///
    /// Meant for surrounding layers that hold vectors as generic sequences.
    /// Every row must have exactly two components.
    pub fn try_from_rows(
        positions: &[Vec<f64>],
        velocities: &[Vec<f64>],
        masses: &[f64],
    ) -> Result<Self, SimulationError> {
        fn to_pairs(rows: &[Vec<f64>], what: &str) -> Result<Vec<[f64; 2]>, SimulationError> {
            rows.iter()
                .enumerate()
                .map(|(i, row)| match row.as_slice() {
                    [x, y] => Ok([*x, *y]),
                    _ => Err(SimulationError::invalid_initial(format!(
                        "{what} {i} has {} components, expected 2",
                        row.len()
                    ))),
                })
                .collect()
        }

        Ok(Self::new(
            to_pairs(positions, "position")?,
            to_pairs(velocities, "velocity")?,
            masses.to_vec(),
        ))
    }

    pub fn with_radii(mut self, radii: Vec<f64>) -> Self {
        self.radii = Some(radii);
        self
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let n = self.masses.len();
        if n == 0 {
            return Err(SimulationError::invalid_initial(
                "at least one body is required",
            ));
        }
        if self.positions.len() != n || self.velocities.len() != n {
            return Err(SimulationError::invalid_initial(format!(
                "mismatched lengths: {} positions, {} velocities, {} masses",
                self.positions.len(),
                self.velocities.len(),
                n
            )));
        }
        if let Some(radii) = &self.radii {
            if radii.len() != n {
                return Err(SimulationError::invalid_initial(format!(
                    "mismatched lengths: {} radii for {} bodies",
                    radii.len(),
                    n
                )));
            }
            if let Some((i, r)) = radii
                .iter()
                .enumerate()
                .find(|(_, r)| !r.is_finite() || **r <= 0.0)
            {
                return Err(SimulationError::invalid_initial(format!(
                    "body {i} has non-positive radius {r}"
                )));
            }
        }
        if let Some((i, m)) = self
            .masses
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m <= 0.0)
        {
            return Err(SimulationError::invalid_initial(format!(
                "body {i} has non-positive or non-finite mass {m}"
            )));
        }
        let finite = |v: &[f64; 2]| v[0].is_finite() && v[1].is_finite();
        if let Some(i) = self.positions.iter().position(|p| !finite(p)) {
            return Err(SimulationError::invalid_initial(format!(
                "body {i} has a non-finite position"
            )));
        }
        if let Some(i) = self.velocities.iter().position(|v| !finite(v)) {
            return Err(SimulationError::invalid_initial(format!(
                "body {i} has a non-finite velocity"
            )));
        }
        Ok(())
    }
}

/// Complete state of the system at one instant
///
/// Owns the ordered body list. Collision merges go through
/// [`remove_and_replace`](Self::remove_and_replace), which keeps every index
/// stable until [`compact`](Self::compact) renumbers the survivors.
#[derive(Debug, Clone)]
pub struct SystemState {
    /// Current simulation time
    pub time: f64,
    /// Number of completed steps
    pub step: u64,
    /// Gravitational constant, fixed for the run
    pub gravitational_constant: f64,
    bodies: Vec<Body>,
    /// Slots absorbed by a merge and awaiting compaction; empty when none are pending
    retired: Vec<bool>,
}

impl SystemState {
    /// Validates the initial conditions and populates the registry
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::config::SimulationConfig;
    /// use nbody::state::{InitialConditions, SystemState};
    ///
    /// let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[1.0, 0.0]], vec![0.0]);
    /// assert!(SystemState::from_initial(&initial, &SimulationConfig::default()).is_err());
    /// ```
    pub fn from_initial(
        initial: &InitialConditions,
        config: &SimulationConfig,
    ) -> Result<Self, SimulationError> {
        initial.validate()?;

        let bodies = (0..initial.len())
            .map(|i| {
                let mass = initial.masses[i];
                let radius = initial
                    .radii
                    .as_ref()
                    .map(|r| r[i])
                    .unwrap_or_else(|| disk_radius(mass, config.density));
                Body::new(mass, radius, initial.positions[i], initial.velocities[i])
            })
            .collect();

        Ok(Self::from_parts(bodies, config.gravitational_constant))
    }

    /// Populates the registry from already-built bodies
    pub fn from_bodies(bodies: Vec<Body>, gravitational_constant: f64) -> Result<Self, SimulationError> {
        let initial = InitialConditions {
            positions: bodies.iter().map(|b| [b.position.x, b.position.y]).collect(),
            velocities: bodies.iter().map(|b| [b.velocity.x, b.velocity.y]).collect(),
            masses: bodies.iter().map(|b| b.mass).collect(),
            radii: Some(bodies.iter().map(|b| b.radius).collect()),
        };
        initial.validate()?;
        Ok(Self::from_parts(bodies, gravitational_constant))
    }

    fn from_parts(bodies: Vec<Body>, gravitational_constant: f64) -> Self {
        Self {
            time: 0.0,
            step: 0,
            gravitational_constant,
            bodies,
            retired: Vec::new(),
        }
    }

    /// Live bodies in index order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub(crate) fn advance_clock(&mut self, dt: f64) {
        self.time += dt;
        self.step += 1;
    }

    /// Whether slot `idx` was absorbed by a merge this step
    pub fn is_retired(&self, idx: usize) -> bool {
        self.retired.get(idx).copied().unwrap_or(false)
    }

    /// Replaces body `i` with `merged` and retires body `j`
    ///
    /// Indices of all other bodies are untouched until [`compact`](Self::compact)
    /// runs, so a resolver can keep walking the pre-merge pair list.
    pub(crate) fn remove_and_replace(&mut self, i: usize, j: usize, merged: Body) {
        debug_assert!(i != j, "a body cannot merge with itself");
        debug_assert!(
            !self.is_retired(i) && !self.is_retired(j),
            "retired slot reused before compaction"
        );
        if self.retired.is_empty() {
            self.retired = vec![false; self.bodies.len()];
        }
        self.bodies[i] = merged;
        self.retired[j] = true;
    }

    /// Drops retired slots and renumbers survivors contiguously, preserving order
    ///
    /// Returns the number of bodies removed.
    pub(crate) fn compact(&mut self) -> usize {
        if self.retired.is_empty() {
            return 0;
        }
        let before = self.bodies.len();
        let retired = std::mem::take(&mut self.retired);
        self.bodies = std::mem::take(&mut self.bodies)
            .into_iter()
            .zip(retired)
            .filter_map(|(body, gone)| (!gone).then_some(body))
            .collect();
        before - self.bodies.len()
    }

    /// Fails if any body carries a NaN or Inf position or velocity
    pub fn check_finite(&self) -> Result<(), SimulationError> {
        match self
            .bodies
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.non_finite_quantity().map(|q| (i, q)))
        {
            Some((i, quantity)) => Err(SimulationError::NonFiniteState {
                step: self.step,
                time: self.time,
                quantity,
                body: Some(i),
            }),
            None => Ok(()),
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    /// Total linear momentum Σ m v
    ///
    /// Invariant across steps without merges, and across merges as well.
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies
            .iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    /// Total angular momentum about the origin (z-component)
    pub fn total_angular_momentum(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.specific_angular_momentum() * b.mass)
            .sum()
    }

    pub fn center_of_mass(&self) -> Point2<f64> {
        let weighted = self
            .bodies
            .iter()
            .map(|b| b.position.coords * b.mass)
            .fold(Vector2::zeros(), |acc, r| acc + r);
        Point2::from(weighted / self.total_mass())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}
