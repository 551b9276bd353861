//! Ready-made initial conditions
//!
//! Each preset returns the initial conditions together with the run
//! configuration it was tuned for.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::config::SimulationConfig;
use crate::forces::Softening;
use crate::state::InitialConditions;

/// Two equal masses on a circular mutual orbit
///
/// m = 1 at (∓1, 0) moving (0, ∓0.5), G = 1. The separation is 2, so each
/// body circles the origin at radius 1 with v² = G m / d² · r = 1/4.
pub fn two_body_circular() -> (InitialConditions, SimulationConfig) {
    let initial = InitialConditions::new(
        vec![[-1.0, 0.0], [1.0, 0.0]],
        vec![[0.0, -0.5], [0.0, 0.5]],
        vec![1.0, 1.0],
    );
    let config = SimulationConfig::default()
        .with_gravitational_constant(1.0)
        .with_softening(0.01)
        .with_dt(0.01)
        .with_collision_threshold(0.05)
        .with_steps(1000);
    (initial, config)
}

/// Masses 1 and 2 closing on each other along the x axis
///
/// Net momentum is (0.5, 0.2), so the merged body must move at (1/6, 1/15).
pub fn head_on_merge() -> (InitialConditions, SimulationConfig) {
    let initial = InitialConditions::new(
        vec![[-0.04, 0.0], [0.04, 0.0]],
        vec![[1.0, 0.2], [-0.25, 0.0]],
        vec![1.0, 2.0],
    );
    let config = SimulationConfig::default()
        .with_gravitational_constant(1.0)
        .with_softening(0.01)
        .with_dt(0.01)
        .with_collision_threshold(0.05)
        .with_steps(100);
    (initial, config)
}

/// Three bodies on an equilateral triangle of unit circumradius
///
/// G = 3, masses 100, 100 and 200, each body launched roughly along its
/// position vector. Softening and the collision threshold share the same
/// small length and the separation floor kernel.
pub fn three_body_triangle() -> (InitialConditions, SimulationConfig) {
    let half_root3 = 3.0_f64.sqrt() / 2.0;
    let masses = vec![100.0, 100.0, 200.0];
    let velocities = [[0.0, 1.5], [-half_root3, -0.5], [half_root3, -0.5]];
    let momenta = velocities
        .iter()
        .zip(&masses)
        .map(|(v, m)| [v[0] * m, v[1] * m])
        .collect();

    let initial = InitialConditions::from_momenta(
        vec![[0.0, 1.0], [-half_root3, -0.5], [half_root3, -0.5]],
        momenta,
        masses,
    );
    let config = SimulationConfig::default()
        .with_gravitational_constant(3.0)
        .with_softening(0.001)
        .with_softening_kernel(Softening::Clamped)
        .with_collision_threshold(0.001)
        .with_dt(0.01)
        .with_steps(2000);
    (initial, config)
}

/// A seeded random disk of `n` bodies in slow rotation
///
/// Bodies are spread uniformly over a unit disk with masses in [0.5, 1.5).
/// Velocities follow a solid-body rotation plus noise, with the mean
/// momentum removed so the cluster does not wander. The same seed always
/// yields the same bodies.
pub fn random_cluster(seed: u64, n: usize) -> (InitialConditions, SimulationConfig) {
    let mut rng = ChaChaRng::seed_from_u64(seed);

    let mut positions = Vec::with_capacity(n);
    let mut velocities = Vec::with_capacity(n);
    let mut masses = Vec::with_capacity(n);

    for _ in 0..n {
        // sqrt keeps the areal density uniform
        let r = rng.random_range(0.0_f64..1.0).sqrt();
        let theta = rng.random_range(0.0..2.0 * PI);
        let (x, y) = (r * theta.cos(), r * theta.sin());

        let spin = 0.3;
        let noise = [rng.random_range(-0.05..0.05), rng.random_range(-0.05..0.05)];

        positions.push([x, y]);
        velocities.push([-spin * y + noise[0], spin * x + noise[1]]);
        masses.push(rng.random_range(0.5..1.5));
    }

    let total_mass: f64 = masses.iter().sum();
    if total_mass > 0.0 {
        let drift = velocities
            .iter()
            .zip(&masses)
            .fold([0.0, 0.0], |acc, (v, m)| [acc[0] + v[0] * m, acc[1] + v[1] * m]);
        velocities.iter_mut().for_each(|v| {
            v[0] -= drift[0] / total_mass;
            v[1] -= drift[1] / total_mass;
        });
    }

    let config = SimulationConfig::default()
        .with_gravitational_constant(0.01)
        .with_softening(0.01)
        .with_dt(0.005)
        .with_collision_threshold(0.05)
        .with_steps(2000);
    (InitialConditions::new(positions, velocities, masses), config)
}
