use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, disk_radius};
use crate::error::Quantity;

#[test]
fn test_new_from_arrays() {
    let body = Body::new(1.0, 0.1, [1.0, 2.0], [3.0, 4.0]);

    assert_eq!(body.mass, 1.0);
    assert_eq!(body.radius, 0.1);
    assert_eq!(body.position, Point2::new(1.0, 2.0));
    assert_eq!(body.velocity, Vector2::new(3.0, 4.0));
}

#[test]
fn test_momentum() {
    let body = Body::new(2.0, 0.01, [1.0, 0.0], [3.0, 4.0]);
    assert_eq!(body.momentum(), Vector2::new(6.0, 8.0));
}

#[test]
fn test_kinetic_energy() {
    let body = Body::new(2.0, 0.01, [1.0, 0.0], [3.0, 4.0]);

    // KE = 0.5 * m * v² = 0.5 * 2 * 25 = 25
    assert_eq!(body.kinetic_energy(), 25.0);
}

#[test]
fn test_distance_to() {
    let a = Body::new(1.0, 0.01, [0.0, 0.0], [0.0, 0.0]);
    let b = Body::new(1.0, 0.01, [3.0, 4.0], [0.0, 0.0]);

    assert_eq!(a.distance_to(&b), 5.0);
    assert_eq!(b.distance_to(&a), 5.0);
}

#[test]
fn test_specific_angular_momentum() {
    // Circular orbit: r × v = r * v
    let body = Body::new(1.0, 0.01, [1.0, 0.0], [0.0, 6.28]);
    assert_relative_eq!(body.specific_angular_momentum(), 6.28);

    // Retrograde orbit: negative angular momentum
    let retrograde = Body::new(1.0, 0.01, [1.0, 0.0], [0.0, -6.28]);
    assert!(retrograde.specific_angular_momentum() < 0.0);
}

#[test]
fn test_disk_radius_area_scales_with_mass() {
    let density = 2.0;
    let r = disk_radius(3.0, density);

    assert_relative_eq!(PI * r * r * density, 3.0, epsilon = 1e-12);
    assert!(disk_radius(6.0, density) > r);
}

#[test]
fn test_with_density() {
    let body = Body::with_density(PI, 1.0, [0.0, 0.0], [0.0, 0.0]);
    assert_relative_eq!(body.radius, 1.0, epsilon = 1e-12);
}

#[test]
fn test_non_finite_quantity() {
    let mut body = Body::new(1.0, 0.01, [0.0, 0.0], [0.0, 0.0]);
    assert_eq!(body.non_finite_quantity(), None);

    body.velocity.y = f64::INFINITY;
    assert_eq!(body.non_finite_quantity(), Some(Quantity::Velocity));

    body.position.x = f64::NAN;
    assert_eq!(body.non_finite_quantity(), Some(Quantity::Position));
}
