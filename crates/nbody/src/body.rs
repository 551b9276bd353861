use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};

use crate::error::Quantity;

/// A point mass in the plane
///
/// A body has no identity beyond its index in
/// [`SystemState::bodies`](crate::state::SystemState::bodies), and that index is
/// only stable for the duration of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f64,
    /// Collision and display radius; never enters the force law
    pub radius: f64,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
}

impl Body {
    /// Creates a body from plain arrays
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::body::Body;
    ///
    /// let body = Body::new(2.0, 0.1, [1.0, 0.0], [0.0, 3.0]);
    /// assert_eq!(body.momentum().y, 6.0);
    /// ```
    pub fn new(mass: f64, radius: f64, position: [f64; 2], velocity: [f64; 2]) -> Self {
        Body {
            mass,
            radius,
            position: Point2::new(position[0], position[1]),
            velocity: Vector2::new(velocity[0], velocity[1]),
        }
    }

    /// Creates a body whose radius follows from its mass at a fixed surface density
    pub fn with_density(mass: f64, density: f64, position: [f64; 2], velocity: [f64; 2]) -> Self {
        Self::new(mass, disk_radius(mass, density), position, velocity)
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// z-component of r × v about the origin (not multiplied by mass)
    pub fn specific_angular_momentum(&self) -> f64 {
        self.position.x * self.velocity.y - self.position.y * self.velocity.x
    }

    /// Returns the first non-finite quantity on this body, if any
    pub fn non_finite_quantity(&self) -> Option<Quantity> {
        if !(self.position.x.is_finite() && self.position.y.is_finite()) {
            Some(Quantity::Position)
        } else if !(self.velocity.x.is_finite() && self.velocity.y.is_finite()) {
            Some(Quantity::Velocity)
        } else {
            None
        }
    }
}

/// Radius of a uniform disk of mass `mass` and surface density `density`
///
/// Area is proportional to mass, so merging two disks of the same density
/// gives r = sqrt(r_a² + r_b²), which is what
/// [`merge_bodies`](crate::collisions::merge_bodies) uses.
pub fn disk_radius(mass: f64, density: f64) -> f64 {
    (mass / (PI * density)).sqrt()
}
