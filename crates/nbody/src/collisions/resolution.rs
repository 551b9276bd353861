//! Collision resolution through momentum-conserving mergers
//!
//! When bodies collide, they merge into a single body that conserves:
//! - Total mass
//! - Total momentum
//! - Area (constant surface density in 2D)
//!
//! Kinetic energy is not conserved. Each merge reports how much it removed.

use std::collections::HashSet;

use nalgebra::Point2;
use serde::Serialize;

use crate::body::Body;
use crate::collisions::CollisionEvent;
use crate::state::SystemState;

/// Merge two bodies, conserving mass and momentum
///
/// - Mass: m = m_a + m_b
/// - Position: center of mass
/// - Velocity: (p_a + p_b) / m
/// - Radius: r = sqrt(r_a² + r_b²), strictly larger than either input
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::collisions::merge_bodies;
///
/// let a = Body::new(1.0, 0.01, [1.0, 0.0], [0.0, 5.0]);
/// let b = Body::new(1.0, 0.01, [1.1, 0.0], [0.0, 3.0]);
///
/// let merged = merge_bodies(&a, &b);
///
/// // Mass is conserved
/// assert_eq!(merged.mass, 2.0);
///
/// // Momentum is conserved
/// let p_initial = a.momentum() + b.momentum();
/// assert!((merged.momentum() - p_initial).magnitude() < 1e-12);
/// ```
pub fn merge_bodies(a: &Body, b: &Body) -> Body {
    let total_mass = a.mass + b.mass;

    // Center of mass position
    let pos_coords = (a.position.coords * a.mass + b.position.coords * b.mass) / total_mass;
    let position = Point2::from(pos_coords);

    // Momentum-conserving velocity
    let velocity = (a.momentum() + b.momentum()) / total_mass;

    // Area-conserving radius (2D disks)
    let radius = (a.radius.powi(2) + b.radius.powi(2)).sqrt();

    Body {
        mass: total_mass,
        radius,
        position,
        velocity,
    }
}

/// One applied merge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRecord {
    /// Step at which the merge happened
    pub step: u64,
    /// Pre-merge index of the slot that now holds the merged body
    pub survivor: usize,
    /// Pre-merge index of the absorbed body
    pub absorbed: usize,
    /// Index of the merged body after renumbering
    pub resulting_index: usize,
    pub merged_mass: f64,
    /// Kinetic energy dissipated by the inelastic merge (≥ 0)
    pub kinetic_energy_lost: f64,
}

/// Apply collision events to the system
///
/// Events are processed in ascending (body_a, body_b) order over the list
/// as it stood before this pass. A body merges at most once per call: any
/// event touching an already-merged body is skipped, and that pair is
/// looked at again on the next step if still close. The merged body takes
/// the lower index; the absorbed slot is removed when the pass completes,
/// after which the survivors are renumbered contiguously in their original
/// order.
///
/// A lone body is never removed. Events naming a body index outside the
/// current list are ignored.
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::collisions::{CollisionDetector, CollisionPolicy, DirectDetector, resolve_collisions};
/// use nbody::state::SystemState;
///
/// let mut system = SystemState::from_bodies(
///     vec![
///         Body::new(1.0, 0.01, [0.0, 0.0], [1.0, 0.0]),
///         Body::new(2.0, 0.01, [0.01, 0.0], [-1.0, 0.0]),
///     ],
///     1.0,
/// )
/// .unwrap();
///
/// let events = DirectDetector.detect(&system, &CollisionPolicy::default());
/// let merges = resolve_collisions(&mut system, events);
///
/// assert_eq!(merges.len(), 1);
/// assert_eq!(system.body_count(), 1);
/// assert_eq!(system.bodies()[0].mass, 3.0);
/// ```
pub fn resolve_collisions(state: &mut SystemState, mut events: Vec<CollisionEvent>) -> Vec<MergeRecord> {
    if state.body_count() < 2 || events.is_empty() {
        return Vec::new();
    }

    events.sort_by_key(|e| (e.body_a.min(e.body_b), e.body_a.max(e.body_b)));

    // Track which bodies have been consumed
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut records = Vec::new();

    let n = state.body_count();
    for event in events {
        let (i, j) = (event.body_a.min(event.body_b), event.body_a.max(event.body_b));
        if i == j || j >= n || consumed.contains(&i) || consumed.contains(&j) {
            continue;
        }

        let a = state.bodies()[i];
        let b = state.bodies()[j];
        let merged = merge_bodies(&a, &b);
        let kinetic_energy_lost = a.kinetic_energy() + b.kinetic_energy() - merged.kinetic_energy();

        tracing::debug!(
            step = state.step,
            survivor = i,
            absorbed = j,
            separation = event.separation,
            merged_mass = merged.mass,
            kinetic_energy_lost,
            "merging bodies"
        );

        state.remove_and_replace(i, j, merged);
        consumed.insert(i);
        consumed.insert(j);

        records.push(MergeRecord {
            step: state.step,
            survivor: i,
            absorbed: j,
            resulting_index: i,
            merged_mass: merged.mass,
            kinetic_energy_lost,
        });
    }

    // Survivor index shifts down by the number of absorbed slots before it
    let absorbed: Vec<usize> = records.iter().map(|r| r.absorbed).collect();
    records.iter_mut().for_each(|record| {
        record.resulting_index -= absorbed.iter().filter(|&&j| j < record.survivor).count();
    });

    state.compact();
    records
}
