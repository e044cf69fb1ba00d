use crate::ray::Ray;
use math::hcm::{vec3, Mat3, Point3, Vec3};
use math::Angle;

/// Camera rig: a position, an orthonormal (front/right/up) basis, and the
/// distance to the ray-fan origin behind the camera.
///
/// Rays for a pixel do not start at the camera position itself. The image
/// plane is a unit square centered on the position and spanned by
/// `right`/`up`; every ray points away from a single point `fan_distance`
/// behind that plane along `-front`. That one back-projected point produces a
/// perspective-like divergent fan without a projection matrix.
pub struct CameraRig {
    position: Point3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    fan_distance: f32,
}

impl CameraRig {
    /// Builds a rig from a position and viewing direction, deriving `right`
    /// and `up` against world-down, and the fan distance from the vertical
    /// field of view.
    pub fn new(position: Point3, front: Vec3, fov: Angle) -> Self {
        let front = front.hat();
        let right = front.cross(vec3(0.0, -1.0, 0.0)).hat();
        let up = right.cross(front);
        Self::from_basis(position, front, right, up, fov)
    }

    /// Builds a rig from a caller-supplied basis. The basis is trusted to be
    /// orthonormal; only the fan distance is derived here.
    pub fn from_basis(position: Point3, front: Vec3, right: Vec3, up: Vec3, fov: Angle) -> Self {
        let fan_distance = 0.5 / (fov * 0.5).to_rad().asin();
        assert!(
            fan_distance.is_finite() && fan_distance > 0.0,
            "fov {} leaves no room for a ray-fan origin",
            fov
        );
        CameraRig {
            position,
            front,
            right,
            up,
            fan_distance,
        }
    }

    /// The common origin of all per-pixel rays, behind the camera position.
    pub fn light_offset(&self) -> Point3 {
        self.position - self.fan_distance * self.front
    }

    pub fn position(&self) -> Point3 {
        self.position
    }
    pub fn front(&self) -> Vec3 {
        self.front
    }
    pub fn right(&self) -> Vec3 {
        self.right
    }
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Applies a rigid rotation to the whole basis. The ray-fan origin moves
    /// with the basis since it is re-derived from `front` on demand.
    pub fn rotated(self, about: Vec3, amount: Angle) -> Self {
        let rot = Mat3::rotater(about, amount);
        CameraRig {
            front: rot * self.front,
            right: rot * self.right,
            up: rot * self.up,
            ..self
        }
    }

    /// Constructs the ray for pixel (x, y) of a width x height image.
    ///
    /// Pixel coordinates normalize to [-0.5, 0.5] on both axes; the ray
    /// starts on the image plane and points away from the fan origin:
    ///
    ///   origin = nx * right + ny * up + position
    ///   dir    = normalize(origin - light_offset)
    ///
    /// `fan_distance > 0` guarantees origin != light_offset, so the
    /// normalization never sees a zero vector.
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let nx = x as f32 / (width - 1) as f32 - 0.5;
        let ny = y as f32 / (height - 1) as f32 - 0.5;
        let origin = nx * self.right + ny * self.up + self.position;
        let dir = (origin - self.light_offset()).hat();
        Ray::new(origin, dir)
    }
}
