use geometry::camera::CameraRig;
use math::hcm::{point3, vec3, Vec3};

fn assert_orthonormal(rig: &CameraRig) {
    for (name, axis) in [("front", rig.front()), ("right", rig.right()), ("up", rig.up())] {
        assert!(
            (axis.norm() - 1.0).abs() < 1e-4,
            "{} lost unit length: |{}| = {}",
            name,
            axis,
            axis.norm()
        );
    }
    assert!(rig.front().dot(rig.right()).abs() < 1e-4);
    assert!(rig.front().dot(rig.up()).abs() < 1e-4);
    assert!(rig.right().dot(rig.up()).abs() < 1e-4);
}

#[test]
fn derived_basis_is_orthonormal() {
    let rig = CameraRig::new(
        point3(40.0, 10.0, -8.0),
        vec3(-1.0, -0.15, 0.2),
        math::new_deg(40.0),
    );
    assert_orthonormal(&rig);
}

#[test]
fn rotations_preserve_orthonormality() {
    let mut rig = CameraRig::new(point3(0.0, 0.0, -5.0), Vec3::Z, math::new_deg(40.0));
    // A mix of axes and angles, including a non-unit rotation axis.
    let spins = [
        (Vec3::Y, 30.0),
        (vec3(1.0, 2.0, -0.5), 113.0),
        (Vec3::X, -77.5),
        (vec3(0.0, 0.3, 0.3), 359.0),
    ];
    for (axis, degrees) in spins {
        rig = rig.rotated(axis, math::new_deg(degrees));
        assert_orthonormal(&rig);
    }
}

#[test]
fn fan_origin_sits_behind_the_camera() {
    let rig = CameraRig::new(point3(1.0, 2.0, 3.0), Vec3::X, math::new_deg(40.0));
    let back = rig.position() - rig.light_offset();
    // Entirely along +front, and a positive distance away.
    assert!(back.cross(rig.front()).norm() < 1e-5);
    assert!(back.dot(rig.front()) > 0.0);
}

#[test]
fn center_pixel_ray_points_forward() {
    let rig = CameraRig::new(point3(0.0, 0.0, 0.0), Vec3::Z, math::new_deg(40.0));
    // Odd dimensions put pixel (50, 50) exactly at the image center.
    let ray = rig.pixel_ray(50, 50, 101, 101);
    assert!((ray.dir - rig.front()).norm() < 1e-5);
    assert!(ray.origin.distance_to(rig.position()) < 1e-5);
}

#[test]
fn pixel_rays_are_unit_length_and_diverge() {
    let rig = CameraRig::new(point3(0.0, 0.0, 0.0), Vec3::Z, math::new_deg(40.0));
    let corners = [(0, 0), (1023, 0), (0, 767), (1023, 767)];
    let mut dirs = vec![];
    for (x, y) in corners {
        let ray = rig.pixel_ray(x, y, 1024, 768);
        assert!((ray.dir.norm() - 1.0).abs() < 1e-5);
        dirs.push(ray.dir);
    }
    // A perspective fan: opposite corners do not share a direction.
    assert!((dirs[0] - dirs[3]).norm() > 1e-3);
}
