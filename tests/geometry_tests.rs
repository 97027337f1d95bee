//! Bounding Volume Tests
//!
//! Tests for:
//! - BoundingBox construction and null / infinite sentinels
//! - Union and point merging
//! - Affine transform of boxes
//! - Box/box and box/sphere intersection

use glam::{Affine3A, Quat, Vec3};

use myth_visibility::resources::geometry::{BoundingBox, BoundingSphere};

const EPSILON: f32 = 1e-4;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn new_reorders_min_max() {
    let b = BoundingBox::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 2.0, -3.0));
    assert!(approx_vec3(b.min, Vec3::new(-1.0, -2.0, -3.0)));
    assert!(approx_vec3(b.max, Vec3::new(1.0, 2.0, 3.0)));
    assert!(b.is_finite());
}

#[test]
fn center_half_size_radius() {
    let b = BoundingBox::from_center_half_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 2.0));
    assert!(approx_vec3(b.center(), Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_vec3(b.size(), Vec3::new(2.0, 4.0, 4.0)));
    assert!((b.radius() - 3.0).abs() < EPSILON);

    let sphere = BoundingSphere::from(&b);
    assert!((sphere.radius - 3.0).abs() < EPSILON);
}

#[test]
fn from_points_of_nothing_is_null() {
    assert!(BoundingBox::from_points(&[]).is_null());

    let b = BoundingBox::from_points(&[Vec3::ZERO, Vec3::new(2.0, -1.0, 4.0), Vec3::Y]);
    assert!(approx_vec3(b.min, Vec3::new(0.0, -1.0, 0.0)));
    assert!(approx_vec3(b.max, Vec3::new(2.0, 1.0, 4.0)));
}

// ============================================================================
// Union / Merge Tests
// ============================================================================

#[test]
fn union_with_sentinels() {
    let b = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::ONE);
    assert_eq!(b.union(&BoundingBox::NULL), b);
    assert_eq!(BoundingBox::NULL.union(&b), b);
    assert!(b.union(&BoundingBox::INFINITE).is_infinite());

    let other = BoundingBox::from_center_half_size(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE);
    let merged = b.union(&other);
    assert!(approx_vec3(merged.min, Vec3::new(-1.0, -1.0, -1.0)));
    assert!(approx_vec3(merged.max, Vec3::new(6.0, 1.0, 1.0)));
}

#[test]
fn merge_point_grows_box() {
    let b = BoundingBox::NULL.merge_point(Vec3::ONE).merge_point(Vec3::new(-1.0, 3.0, 1.0));
    assert!(approx_vec3(b.min, Vec3::new(-1.0, 1.0, 1.0)));
    assert!(approx_vec3(b.max, Vec3::new(1.0, 3.0, 1.0)));
    assert!(BoundingBox::INFINITE.merge_point(Vec3::ZERO).is_infinite());
}

// ============================================================================
// Transform Tests
// ============================================================================

#[test]
fn transform_translates_and_scales() {
    let b = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::ONE);
    let m = Affine3A::from_scale_rotation_translation(Vec3::splat(2.0), Quat::IDENTITY, Vec3::new(3.0, 0.0, 0.0));
    let t = b.transform(&m);
    assert!(approx_vec3(t.min, Vec3::new(1.0, -2.0, -2.0)));
    assert!(approx_vec3(t.max, Vec3::new(5.0, 2.0, 2.0)));
}

#[test]
fn transform_rotation_encloses_rotated_box() {
    let b = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
    let t = b.transform(&Affine3A::from_rotation_z(std::f32::consts::FRAC_PI_2));
    assert!(approx_vec3(t.half_size(), Vec3::new(1.0, 2.0, 1.0)));

    let t45 = b.transform(&Affine3A::from_rotation_z(std::f32::consts::FRAC_PI_4));
    let expected = (2.0 + 1.0) * std::f32::consts::FRAC_1_SQRT_2;
    assert!((t45.half_size().x - expected).abs() < EPSILON);
}

#[test]
fn transform_keeps_sentinels() {
    let m = Affine3A::from_translation(Vec3::ONE);
    assert!(BoundingBox::NULL.transform(&m).is_null());
    assert!(BoundingBox::INFINITE.transform(&m).is_infinite());
}

// ============================================================================
// Intersection Tests
// ============================================================================

#[test]
fn box_box_intersection() {
    let a = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::ONE);
    let touching = BoundingBox::from_center_half_size(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
    let apart = BoundingBox::from_center_half_size(Vec3::new(3.0, 0.0, 0.0), Vec3::ONE);

    assert!(a.intersects(&touching));
    assert!(!a.intersects(&apart));
    assert!(!a.intersects(&BoundingBox::NULL));
    assert!(a.intersects(&BoundingBox::INFINITE));
}

#[test]
fn box_sphere_intersection_uses_closest_point() {
    let b = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::ONE);

    assert!(b.intersects_sphere(Vec3::new(2.5, 0.0, 0.0), 1.6));
    assert!(!b.intersects_sphere(Vec3::new(2.5, 0.0, 0.0), 1.4));
    // Corner direction: closest point is (1, 1, 1), distance sqrt(3)
    assert!(!b.intersects_sphere(Vec3::splat(2.0), 1.7));
    assert!(b.intersects_sphere(Vec3::splat(2.0), 1.75));
    assert!(b.intersects_sphere(Vec3::ZERO, 0.0), "Sphere center inside the box");

    assert!(!BoundingBox::NULL.intersects_sphere(Vec3::ZERO, 1.0e6));
    assert!(BoundingBox::INFINITE.intersects_sphere(Vec3::splat(1.0e6), 0.0));
}

#[test]
fn contains_point_inclusive() {
    let b = BoundingBox::from_center_half_size(Vec3::ZERO, Vec3::ONE);
    assert!(b.contains_point(Vec3::new(1.0, 1.0, -1.0)));
    assert!(!b.contains_point(Vec3::new(1.01, 0.0, 0.0)));
}
