//! Collision detection and resolution for N-body systems
//!
//! Detection finds every pair closer than the configured policy allows;
//! resolution merges them in ascending pair order, conserving mass and
//! momentum, and renumbers the survivors.

pub mod detection;
pub mod resolution;


pub use detection::{CollisionDetector, CollisionEvent, CollisionPolicy, DirectDetector};
pub use resolution::{MergeRecord, merge_bodies, resolve_collisions};
