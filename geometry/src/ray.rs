use std::fmt::{Display, Formatter, Result};

use math::hcm;

/// Represents a ray:
///
///   origin + t * direction
///
/// where t is positive. The direction is unit-length by construction in all
/// the places a `Ray` is built (see `CameraRig::pixel_ray`), so `t` doubles
/// as the distance from the origin.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: hcm::Point3,
    pub dir: hcm::Vec3,
}

impl Ray {
    pub fn new(origin: hcm::Point3, dir: hcm::Vec3) -> Self {
        Ray { origin, dir }
    }

    pub fn position_at(&self, t: f32) -> hcm::Point3 {
        self.origin + t * self.dir
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "{:.precision$} + t{:.precision$}",
            self.origin,
            self.dir,
            precision = precision
        )
    }
}
