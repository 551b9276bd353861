//! Three bodies on an equilateral triangle
//!
//! Runs the preset to completion and prints the energy budget every few
//! hundred steps along with any merges.
//!
//! Run with: cargo run --package nbody --example three_body
//! Set RUST_LOG=nbody=debug to see each merge as it happens.

use nbody::Simulation;
use nbody::scenarios::three_body_triangle;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    println!("Three-body triangle\n");
    println!("{}", "=".repeat(60));

    let (initial, config) = three_body_triangle();
    println!(
        "G = {}, dt = {}, softening = {} ({:?}), steps = {}",
        config.gravitational_constant, config.dt, config.softening, config.softening_kernel, config.steps
    );

    let simulation = match Simulation::new(&initial, config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("cannot start: {err}");
            std::process::exit(1);
        }
    };

    let output = match simulation.run() {
        Ok(output) => output,
        Err(halted) => {
            eprintln!("{halted}: {}", halted.reason);
            eprintln!("last valid step: {}", halted.last_valid.step);
            std::process::exit(1);
        }
    };

    println!("\n{:>6} {:>8} {:>7} {:>14} {:>14} {:>14}", "step", "time", "bodies", "kinetic", "potential", "total");
    for snapshot in output.snapshots.iter().step_by(250) {
        println!(
            "{:>6} {:>8.2} {:>7} {:>14.6e} {:>14.6e} {:>14.6e}",
            snapshot.step,
            snapshot.time,
            snapshot.body_count(),
            snapshot.energy.kinetic,
            snapshot.energy.potential,
            snapshot.energy.total
        );
    }

    println!("\nMerges:");
    if output.merges.is_empty() {
        println!("  none");
    }
    for merge in &output.merges {
        println!(
            "  step {:>5}: body {} absorbed body {} (mass {:.1}, ΔKE = {:.3e})",
            merge.step, merge.survivor, merge.absorbed, merge.merged_mass, merge.kinetic_energy_lost
        );
    }

    println!("\nRelative energy drift: {:.3e}", output.energy_history.relative_drift());
}
