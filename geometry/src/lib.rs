/// The `Ray` type: origin plus unit direction, the query every intersection
/// test consumes.
pub mod ray;

/// The `CameraRig`: position, orthonormal basis, and per-pixel ray
/// construction from a back-projected ray-fan origin.
pub mod camera;
