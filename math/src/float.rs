/// Represents a plane angle unambiguously: stored in radians, constructible
/// from either unit. Keeps degree/radian confusion out of call sites.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f32);

impl Angle {
    pub fn new_rad(rad: f32) -> Self {
        Angle(rad)
    }
    pub fn new_deg(deg: f32) -> Self {
        Angle(deg.to_radians())
    }
    pub fn to_rad(self) -> f32 {
        self.0
    }
    pub fn to_deg(self) -> f32 {
        self.0.to_degrees()
    }
    /// Returns (sin, cos) of the angle.
    pub fn sin_cos(self) -> (f32, f32) {
        self.0.sin_cos()
    }
    pub fn tan(self) -> f32 {
        self.0.tan()
    }
}

impl std::ops::Mul<f32> for Angle {
    type Output = Angle;
    fn mul(self, s: f32) -> Angle {
        Angle(self.0 * s)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(f, "{:.p$}deg", self.to_deg(), p = precision)
    }
}

pub fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "Assertion failed: {} <= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_ge {
    ($left:expr, $right:expr) => {
        if $left < $right {
            panic!(
                "Assertion failed: {} >= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}
