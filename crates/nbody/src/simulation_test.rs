use approx::assert_relative_eq;
use nalgebra::Vector2;

use crate::collisions::CollisionPolicy;
use crate::config::SimulationConfig;
use crate::error::{Quantity, SimulationError};
use crate::scenarios::{head_on_merge, random_cluster, two_body_circular};
use crate::simulation::Simulation;
use crate::state::InitialConditions;

/// One body that overflows to an infinite position on its third step
fn make_runaway() -> Simulation {
    let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[1.0e150, 0.0]], vec![1.0]);
    let config = SimulationConfig::default()
        .with_gravitational_constant(0.0)
        .with_dt(6.0e157)
        .with_steps(10);
    Simulation::new(&initial, config).unwrap()
}

#[test]
fn test_new_rejects_invalid_config() {
    let (initial, config) = two_body_circular();
    let result = Simulation::new(&initial, config.with_dt(0.0));
    assert!(matches!(result, Err(SimulationError::InvalidConfig { .. })));
}

#[test]
fn test_new_rejects_invalid_initial_state() {
    let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[0.0, 0.0]], vec![-1.0]);
    let result = Simulation::new(&initial, SimulationConfig::default());
    assert!(matches!(result, Err(SimulationError::InvalidInitialState { .. })));
}

#[test]
fn test_new_rejects_non_finite_initial_energy() {
    // v² overflows even though every component is finite
    let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[1.4e154, 0.0]], vec![1.0]);
    let result = Simulation::new(&initial, SimulationConfig::default());
    assert!(matches!(result, Err(SimulationError::InvalidInitialState { .. })));
}

#[test]
fn test_coincident_bodies_merge_at_setup() {
    let initial = InitialConditions::new(
        vec![[0.0, 0.0], [0.0, 0.0]],
        vec![[0.0, 0.0], [0.0, 0.0]],
        vec![1.0, 1.0],
    );
    let sim = Simulation::new(&initial, SimulationConfig::default().with_softening(0.0)).unwrap();

    assert_eq!(sim.last_snapshot().body_count(), 1);
    assert!(sim.current_energy().is_finite());
}

#[test]
fn test_bodies_inside_threshold_merge_before_first_step() {
    let initial = InitialConditions::new(
        vec![[-0.02, 0.0], [0.02, 0.0]],
        vec![[1.0, 0.0], [-1.0, 0.0]],
        vec![1.0, 2.0],
    );
    let config = SimulationConfig::default().with_collision_threshold(0.05);
    let mut sim = Simulation::new(&initial, config).unwrap();

    let merges = sim.merges();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].step, 0);
    assert_eq!(merges[0].merged_mass, 3.0);

    let start = sim.last_snapshot();
    assert_eq!(start.step, 0);
    assert_eq!(start.body_count(), 1);
    assert_eq!(sim.energy_history().len(), 1);
    assert_eq!(sim.energy_history().first().unwrap().potential, 0.0);

    let snapshot = sim.step().unwrap();
    assert_eq!(snapshot.body_count(), 1);
    assert_eq!(snapshot.bodies[0].mass, 3.0);
    // (1 · 1 + 2 · -1) / 3
    assert_relative_eq!(snapshot.bodies[0].velocity[0], -1.0 / 3.0, epsilon = 1e-15);
    assert_eq!(snapshot.bodies[0].velocity[1], 0.0);
}

#[test]
fn test_initial_sample() {
    let (initial, config) = two_body_circular();
    let sim = Simulation::new(&initial, config).unwrap();

    assert_eq!(sim.energy_history().len(), 1);
    assert_eq!(sim.last_snapshot().step, 0);
    assert_eq!(sim.last_snapshot().body_count(), 2);
    assert_eq!(sim.current_energy().step, 0);
    assert!(sim.halt_reason().is_none());
}

#[test]
fn test_step_produces_snapshot() {
    let (initial, config) = two_body_circular();
    let mut sim = Simulation::new(&initial, config).unwrap();

    let snapshot = sim.step().unwrap();

    assert_eq!(snapshot.step, 1);
    assert_relative_eq!(snapshot.time, 0.01);
    assert_eq!(snapshot.body_count(), 2);
    assert_eq!(snapshot.energy.step, 1);
    assert_eq!(sim.energy_history().len(), 2);
    assert_eq!(sim.last_snapshot(), &snapshot);
}

#[test]
fn test_circular_orbit_run() {
    let (initial, config) = two_body_circular();
    let output = Simulation::new(&initial, config).unwrap().run().unwrap();

    assert_eq!(output.snapshots.len(), 1001);
    assert_eq!(output.energy_history.len(), 1001);
    assert!(output.merges.is_empty());

    let last = output.final_snapshot().unwrap();
    assert_eq!(last.step, 1000);
    assert_relative_eq!(last.time, 10.0, epsilon = 1e-9);
    assert_eq!(last.body_count(), 2);
    assert!(output.energy_history.max_abs_drift() < 1e-3);

    // Separation stays close to 2 on a circular orbit
    let [a, b] = [last.bodies[0].position, last.bodies[1].position];
    let separation = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
    assert_relative_eq!(separation, 2.0, epsilon = 1e-2);
}

#[test]
fn test_head_on_merge() {
    let (initial, config) = head_on_merge();
    let mut sim = Simulation::new(&initial, config).unwrap();

    let mut merged_at = None;
    for _ in 0..100 {
        let snapshot = sim.step().unwrap();
        if snapshot.body_count() == 1 {
            merged_at = Some(snapshot.step);
            break;
        }
        assert_eq!(snapshot.body_count(), 2);
    }
    let merged_at = merged_at.expect("bodies never merged");

    let body = sim.state().bodies()[0];
    assert_eq!(body.mass, 3.0);
    // Total momentum (0.5, 0.2) carried by the merged mass
    assert_relative_eq!(body.velocity, Vector2::new(1.0 / 6.0, 1.0 / 15.0), epsilon = 1e-12);
    assert_relative_eq!(sim.state().total_momentum(), Vector2::new(0.5, 0.2), epsilon = 1e-12);

    let merges = sim.merges();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].step, merged_at);
    assert_eq!((merges[0].survivor, merges[0].absorbed), (0, 1));
    assert_eq!(merges[0].resulting_index, 0);
    assert_eq!(merges[0].merged_mass, 3.0);
    assert!(merges[0].kinetic_energy_lost > 0.0);

    // A lone body keeps moving and is never removed
    for _ in 0..10 {
        assert_eq!(sim.step().unwrap().body_count(), 1);
    }
    assert_eq!(sim.merges().len(), 1);
}

#[test]
fn test_radius_sum_policy_merges() {
    let initial = InitialConditions::new(
        vec![[0.0, 0.0], [0.15, 0.0]],
        vec![[0.0, 0.0], [0.0, 0.0]],
        vec![1.0, 1.0],
    )
    .with_radii(vec![0.1, 0.1]);
    let config = SimulationConfig::default()
        .with_gravitational_constant(0.0)
        .with_collision(CollisionPolicy::RadiusSum);

    let sim = Simulation::new(&initial, config).unwrap();
    let snapshot = sim.last_snapshot();

    assert_eq!(snapshot.body_count(), 1);
    assert_relative_eq!(snapshot.bodies[0].position[0], 0.075);
    assert_relative_eq!(snapshot.bodies[0].radius, 0.02_f64.sqrt());
}

#[test]
fn test_fixed_distance_ignores_radii() {
    let initial = InitialConditions::new(
        vec![[0.0, 0.0], [0.15, 0.0]],
        vec![[0.0, 0.0], [0.0, 0.0]],
        vec![1.0, 1.0],
    )
    .with_radii(vec![0.1, 0.1]);
    let config = SimulationConfig::default().with_gravitational_constant(0.0);

    let mut sim = Simulation::new(&initial, config).unwrap();
    assert_eq!(sim.step().unwrap().body_count(), 2);
}

#[test]
fn test_runs_are_bit_identical() {
    let run = || {
        let (initial, config) = random_cluster(11, 40);
        Simulation::new(&initial, config.with_steps(300))
            .unwrap()
            .run()
            .unwrap()
    };

    let first = run();
    let second = run();

    assert_eq!(first.snapshots, second.snapshots);
    assert_eq!(first.merges, second.merges);
}

#[test]
fn test_single_body_energy_is_constant() {
    let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[0.3, -0.4]], vec![2.0]);
    let output = Simulation::new(&initial, SimulationConfig::default().with_steps(100))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(output.energy_history.max_abs_drift(), 0.0);
    let last = output.final_snapshot().unwrap();
    assert_relative_eq!(last.bodies[0].position[0], 0.3, epsilon = 1e-12);
    assert_relative_eq!(last.bodies[0].position[1], -0.4, epsilon = 1e-12);
}

#[test]
fn test_non_finite_step_halts() {
    let mut sim = make_runaway();

    assert!(sim.step().is_ok());
    assert!(sim.step().is_ok());

    let err = sim.step().unwrap_err();
    match &err {
        SimulationError::NonFiniteState {
            step,
            quantity,
            body,
            ..
        } => {
            assert_eq!(*step, 3);
            assert_eq!(*quantity, Quantity::Position);
            assert_eq!(*body, Some(0));
        }
        other => panic!("expected NonFiniteState, got {:?}", other),
    }

    // Halted: same error, no further advance
    assert_eq!(sim.step().unwrap_err(), err);
    assert_eq!(sim.state().step, 3);
    assert_eq!(sim.last_snapshot().step, 2);
    assert_eq!(sim.halt_reason(), Some(&err));
    assert_eq!(sim.energy_history().len(), 3);
}

#[test]
fn test_halted_run_reports_last_valid_snapshot() {
    let halted = make_runaway().run().unwrap_err();

    assert_eq!(halted.completed_steps, 2);
    assert_eq!(halted.last_valid.step, 2);
    assert!(halted.last_valid.bodies[0].position[0].is_finite());
    assert!(matches!(halted.reason, SimulationError::NonFiniteState { step: 3, .. }));
}

#[test]
fn test_steps_iterator() {
    let (initial, config) = two_body_circular();
    let mut sim = Simulation::new(&initial, config).unwrap();

    let steps: Vec<u64> = sim.steps(5).map(|s| s.unwrap().step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5]);

    // Picks up where the previous batch stopped
    let next = sim.steps(1).next().unwrap().unwrap();
    assert_eq!(next.step, 6);
}

#[test]
fn test_steps_iterator_stops_after_error() {
    let mut sim = make_runaway();
    let results: Vec<_> = sim.steps(10).collect();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
}

#[test]
fn test_run_output_serializes() {
    let (initial, config) = head_on_merge();
    let output = Simulation::new(&initial, config.with_steps(20))
        .unwrap()
        .run()
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["snapshots"].as_array().unwrap().len(), 21);
    assert!(json["energyHistory"].is_array());
    assert_eq!(json["merges"][0]["mergedMass"], 3.0);
    assert!(json["snapshots"][0]["bodies"][0]["position"].is_array());
}

#[test]
fn test_run_with_huge_step_count_does_not_preallocate() {
    let initial = InitialConditions::new(vec![[0.0, 0.0]], vec![[1.0e150, 0.0]], vec![1.0]);
    let config = SimulationConfig::default()
        .with_gravitational_constant(0.0)
        .with_dt(6.0e157)
        .with_steps(u64::MAX);
    assert!(config.validate().is_ok());

    let halted = Simulation::new(&initial, config).unwrap().run().unwrap_err();
    assert_eq!(halted.completed_steps, 2);
}

#[test]
fn test_merges_kept_when_energy_overflows() {
    // P and Q fling each other apart fast enough to overflow the kinetic
    // energy, while R and S close in and merge during the same step.
    let initial = InitialConditions::new(
        vec![[0.0, 1.0e160], [1.0, 1.0e160], [0.0, 0.0], [0.06, 0.0]],
        vec![[0.0, 0.0], [0.0, 0.0], [0.02, 0.0], [-0.02, 0.0]],
        vec![1.0, 1.0, 1.0e-310, 1.0e-310],
    );
    let config = SimulationConfig::default()
        .with_gravitational_constant(1.0e300)
        .with_dt(1.0);
    let mut sim = Simulation::new(&initial, config).unwrap();
    assert!(sim.merges().is_empty());

    let err = sim.step().unwrap_err();

    assert!(matches!(
        err,
        SimulationError::NonFiniteState {
            quantity: Quantity::Energy,
            body: None,
            ..
        }
    ));
    assert_eq!(sim.state().body_count(), 3);
    assert_eq!(sim.merges().len(), 1);
    assert_eq!((sim.merges()[0].survivor, sim.merges()[0].absorbed), (2, 3));
    assert_eq!(sim.merges()[0].step, 1);
}

#[test]
fn test_run_history_covers_earlier_steps() {
    let (initial, config) = two_body_circular();
    let mut sim = Simulation::new(&initial, config.with_steps(10)).unwrap();
    sim.step().unwrap();
    sim.step().unwrap();

    let output = sim.run().unwrap();

    assert_eq!(output.snapshots.len(), 11);
    assert_eq!(output.snapshots[0].step, 2);
    assert_eq!(output.energy_history.len(), output.snapshots.len() + 2);
}
