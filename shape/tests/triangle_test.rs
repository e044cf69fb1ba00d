use geometry::ray::Ray;
use math::hcm::{point3, vec3, Point3};
use shape::{intersect_dist, intersect_full, TriangleSoup};

fn unit_triangle_at(z: f32) -> [Point3; 3] {
    [
        point3(0.0, 0.0, z),
        point3(1.0, 0.0, z),
        point3(0.0, 1.0, z),
    ]
}

#[test]
fn centroid_hit_has_valid_barycentrics() {
    let [v0, v1, v2] = unit_triangle_at(0.0);
    let centroid = point3(1.0 / 3.0, 1.0 / 3.0, 0.0);
    let ray = Ray::new(point3(centroid.x, centroid.y, -2.0), vec3(0.0, 0.0, 1.0));

    let hit = intersect_full(&ray, v0, v1, v2).expect("ray through centroid must hit");
    assert!((hit.t - 2.0).abs() < 1e-5);
    assert!(hit.u >= 0.0 && hit.v >= 0.0);
    assert!(hit.u + hit.v <= 1.0);
    assert!((hit.u - 1.0 / 3.0).abs() < 1e-5);
    assert!((hit.v - 1.0 / 3.0).abs() < 1e-5);

    let t = intersect_dist(&ray, v0, v1, v2).expect("distance-only shape must agree");
    assert!((t - hit.t).abs() < 1e-6);
}

#[test]
fn facing_classification_follows_winding() {
    let [v0, v1, v2] = unit_triangle_at(0.0);
    // Winding normal of (v0, v1, v2) is +Z. A ray travelling along +Z strikes
    // the back side; one travelling along -Z strikes the front.
    let from_behind = Ray::new(point3(0.2, 0.2, -1.0), vec3(0.0, 0.0, 1.0));
    let from_ahead = Ray::new(point3(0.2, 0.2, 1.0), vec3(0.0, 0.0, -1.0));

    assert!(intersect_full(&from_behind, v0, v1, v2).unwrap().back_facing);
    assert!(!intersect_full(&from_ahead, v0, v1, v2).unwrap().back_facing);
}

#[test]
fn parallel_ray_misses() {
    let [v0, v1, v2] = unit_triangle_at(0.0);
    // Ray lies in the triangle's own plane.
    let ray = Ray::new(point3(-1.0, 0.25, 0.0), vec3(1.0, 0.0, 0.0));
    assert!(intersect_dist(&ray, v0, v1, v2).is_none());
}

#[test]
fn degenerate_triangle_misses() {
    // All three vertices colinear: zero area, determinant under epsilon.
    let v0 = point3(0.0, 0.0, 0.0);
    let v1 = point3(1.0, 1.0, 1.0);
    let v2 = point3(2.0, 2.0, 2.0);
    let ray = Ray::new(point3(0.5, 0.0, -3.0), vec3(0.0, 0.0, 1.0));
    assert!(intersect_dist(&ray, v0, v1, v2).is_none());
    assert!(intersect_full(&ray, v0, v1, v2).is_none());
}

#[test]
fn triangle_behind_origin_misses() {
    let [v0, v1, v2] = unit_triangle_at(-1.0);
    let ray = Ray::new(point3(0.2, 0.2, 0.0), vec3(0.0, 0.0, 1.0));
    assert!(intersect_dist(&ray, v0, v1, v2).is_none());
}

#[test]
fn outside_bounds_misses() {
    let [v0, v1, v2] = unit_triangle_at(0.0);
    // Aimed at the empty corner of the unit square, where u + v > 1.
    let ray = Ray::new(point3(0.9, 0.9, -1.0), vec3(0.0, 0.0, 1.0));
    assert!(intersect_dist(&ray, v0, v1, v2).is_none());
}

#[test]
fn nearest_hit_prefers_smaller_t() {
    // Farther triangle first in the buffer, so scan order alone cannot win.
    let mut positions = vec![];
    positions.extend(unit_triangle_at(5.0));
    positions.extend(unit_triangle_at(2.0));
    let soup = TriangleSoup::new(positions);

    let ray = Ray::new(point3(0.2, 0.2, 0.0), vec3(0.0, 0.0, 1.0));
    let near = soup.nearest_hit(&ray).expect("both triangles are in the path");
    assert_eq!(near.triangle, 1);
    assert!((near.t - 2.0).abs() < 1e-5);
}

#[test]
fn nearest_hit_tie_keeps_scan_order() {
    let mut positions = vec![];
    positions.extend(unit_triangle_at(3.0));
    positions.extend(unit_triangle_at(3.0));
    let soup = TriangleSoup::new(positions);

    let ray = Ray::new(point3(0.2, 0.2, 0.0), vec3(0.0, 0.0, 1.0));
    assert_eq!(soup.nearest_hit(&ray).unwrap().triangle, 0);
}

#[test]
fn empty_soup_never_hits() {
    let soup = TriangleSoup::new(vec![]);
    let ray = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, 1.0));
    assert!(soup.nearest_hit(&ray).is_none());
    assert_eq!(soup.triangle_count(), 0);
    assert!(soup.is_empty());
}

#[test]
fn miss_when_all_triangles_are_off_axis() {
    let soup = TriangleSoup::new(unit_triangle_at(1.0).to_vec());
    let away = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
    assert!(soup.nearest_hit(&away).is_none());
}
