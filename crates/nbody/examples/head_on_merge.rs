//! Two bodies colliding head-on
//!
//! Steps the simulation one snapshot at a time, the way a live renderer
//! would, and stops once the bodies have merged.
//!
//! Run with: cargo run --package nbody --example head_on_merge

use nbody::Simulation;
use nbody::scenarios::head_on_merge;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nbody=debug")),
        )
        .try_init();

    let (initial, config) = head_on_merge();
    let steps = config.steps;
    let mut simulation = match Simulation::new(&initial, config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("cannot start: {err}");
            std::process::exit(1);
        }
    };

    let p = simulation.state().total_momentum();
    println!("Initial momentum: ({:.4}, {:.4})", p.x, p.y);

    for result in simulation.steps(steps) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                eprintln!("halted: {err}");
                std::process::exit(1);
            }
        };

        for (i, body) in snapshot.bodies.iter().enumerate() {
            println!(
                "step {:>3} body {}: x = ({:+.4}, {:+.4}) v = ({:+.4}, {:+.4}) m = {}",
                snapshot.step, i, body.position[0], body.position[1], body.velocity[0], body.velocity[1], body.mass
            );
        }

        if snapshot.body_count() == 1 {
            break;
        }
    }

    let body = simulation.state().bodies()[0];
    println!(
        "\nMerged: m = {}, v = ({:.6}, {:.6}), expected ({:.6}, {:.6})",
        body.mass,
        body.velocity.x,
        body.velocity.y,
        p.x / body.mass,
        p.y / body.mass
    );
}
