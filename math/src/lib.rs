/// Defines useful functions for common math operations, tools and constants:
/// - The `Angle` type to represent plane angles unambiguously,
/// - Macros to check if two math quantities are close, less than / greater
///   than (or equal to) each other.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3D points and vectors, 3x3 matrices.
/// - Function `normalize()` to build a normalized `Vec3`.
/// - Function `mirror()` to reflect a direction off a surface.
pub mod hcm;

pub use float::Angle;
pub fn new_rad(rad: f32) -> float::Angle {
    float::Angle::new_rad(rad)
}
pub fn new_deg(deg: f32) -> float::Angle {
    float::Angle::new_deg(deg)
}
