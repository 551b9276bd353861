//! Pairwise collision detection

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::error::SimulationError;
use crate::state::SystemState;

/// Default separation below which two bodies merge
pub const DEFAULT_COLLISION_THRESHOLD: f64 = 0.05;

/// What counts as a collision
///
/// The default is a fixed separation that ignores body radii. Radii then
/// only matter for display.
///
/// # Examples
///
/// ```
/// use nbody::collisions::CollisionPolicy;
///
/// let policy = CollisionPolicy::default();
/// assert_eq!(policy, CollisionPolicy::FixedDistance { threshold: 0.05 });
///
/// // Geometric contact instead
/// let contact = CollisionPolicy::RadiusSum;
/// assert!(contact.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CollisionPolicy {
    /// Merge when separation < `threshold`
    FixedDistance { threshold: f64 },
    /// Merge when separation < r_a + r_b
    RadiusSum,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy::FixedDistance {
            threshold: DEFAULT_COLLISION_THRESHOLD,
        }
    }
}

impl CollisionPolicy {
    /// Separation below which `a` and `b` collide
    pub fn collision_radius(&self, a: &Body, b: &Body) -> f64 {
        match *self {
            CollisionPolicy::FixedDistance { threshold } => threshold,
            CollisionPolicy::RadiusSum => a.radius + b.radius,
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            CollisionPolicy::FixedDistance { threshold } if !(threshold.is_finite() && threshold > 0.0) => {
                Err(SimulationError::invalid_config(format!(
                    "collision threshold must be finite and positive, got {threshold}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// A detected collision between two bodies
///
/// Indices refer to the body list at detection time, with `body_a < body_b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionEvent {
    pub body_a: usize,
    pub body_b: usize,
    /// Current separation distance
    pub separation: f64,
    /// Collision threshold that was undercut
    pub collision_radius: f64,
}

/// Check if a pair of bodies should collide
fn check_pair(
    (i, a): (usize, &Body),
    (j, b): (usize, &Body),
    policy: &CollisionPolicy,
) -> Option<CollisionEvent> {
    let separation = a.distance_to(b);
    let collision_radius = policy.collision_radius(a, b);

    (separation < collision_radius).then_some(CollisionEvent {
        body_a: i,
        body_b: j,
        separation,
        collision_radius,
    })
}

/// Collision detector trait
pub trait CollisionDetector: Send + Sync {
    /// Detect all colliding pairs, ordered by ascending (body_a, body_b)
    fn detect(&self, state: &SystemState, policy: &CollisionPolicy) -> Vec<CollisionEvent>;
}

/// Direct O(N²) collision detector
///
/// Checks every unordered pair in ascending index order.
///
/// # Examples
///
/// ```
/// use nbody::body::Body;
/// use nbody::collisions::{CollisionDetector, CollisionPolicy, DirectDetector};
/// use nbody::state::SystemState;
///
/// let system = SystemState::from_bodies(
///     vec![
///         Body::new(1.0, 0.01, [0.0, 0.0], [0.0, 0.0]),
///         Body::new(1.0, 0.01, [0.01, 0.0], [0.0, 0.0]),
///         Body::new(1.0, 0.01, [5.0, 0.0], [0.0, 0.0]),
///     ],
///     1.0,
/// )
/// .unwrap();
///
/// let collisions = DirectDetector.detect(&system, &CollisionPolicy::default());
/// assert_eq!(collisions.len(), 1);
/// assert_eq!((collisions[0].body_a, collisions[0].body_b), (0, 1));
/// ```
pub struct DirectDetector;

impl CollisionDetector for DirectDetector {
    fn detect(&self, state: &SystemState, policy: &CollisionPolicy) -> Vec<CollisionEvent> {
        let bodies = state.bodies();
        let n = bodies.len();

        (0..n)
            .flat_map(|i| {
                ((i + 1)..n).filter_map(move |j| check_pair((i, &bodies[i]), (j, &bodies[j]), policy))
            })
            .collect()
    }
}
