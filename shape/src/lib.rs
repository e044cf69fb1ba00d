use geometry::ray::Ray;
use math::hcm::Point3;

/// Determinants smaller than this in magnitude mean the ray runs parallel to
/// the triangle plane. Degenerate (zero-area) triangles fail the same guard.
pub const INTERSECT_EPSILON: f32 = 1e-6;

/// Full result of a ray/triangle intersection test.
///
/// `u`/`v` locate the hit inside the triangle (`p = v0 + u*(v1-v0) +
/// v*(v2-v0)`, third weight implicitly `1-u-v`). `back_facing` classifies
/// the hit by winding: true when the ray strikes the side opposite the
/// counter-clockwise normal. Not retained beyond one pixel's evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TriHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
    pub back_facing: bool,
}

/// Distance-only ray/triangle test (Moller-Trumbore). Returns the distance
/// along the ray, or `None` on a miss. This is the call shape for the broad
/// nearest-triangle scan, where `u`/`v` and the facing bit would be wasted
/// work.
#[rustfmt::skip]
pub fn intersect_dist(r: &Ray, v0: Point3, v1: Point3, v2: Point3) -> Option<f32> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = r.dir.cross(e2);
    // det is the triple product (e1, r.dir, e2); near zero means the ray is
    // parallel to the triangle plane (or the triangle has no area).
    let det = e1.dot(p);
    if det.abs() < INTERSECT_EPSILON {
        return None;
    }
    let t_vec = r.origin - v0;
    let u = t_vec.dot(p) / det;
    if u < 0.0 || u > 1.0 {
        return None;
    }
    let q = t_vec.cross(e1);
    let v = r.dir.dot(q) / det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) / det;
    // Behind the ray origin.
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Full ray/triangle test: same arithmetic as `intersect_dist`, plus the
/// barycentric-style coordinates and the facing classification. Run once on
/// the already-identified nearest triangle.
pub fn intersect_full(r: &Ray, v0: Point3, v1: Point3, v2: Point3) -> Option<TriHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = r.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < INTERSECT_EPSILON {
        return None;
    }
    // det = -dot(r.dir, cross(e1, e2)): a negative determinant means the ray
    // travels along the winding normal, i.e. it strikes the back side.
    let back_facing = det < 0.0;
    let t_vec = r.origin - v0;
    let u = t_vec.dot(p) / det;
    if u < 0.0 || u > 1.0 {
        return None;
    }
    let q = t_vec.cross(e1);
    let v = r.dir.dot(q) / det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) / det;
    if t < 0.0 {
        return None;
    }
    Some(TriHit {
        t,
        u,
        v,
        back_facing,
    })
}

/// The nearest triangle found by a scan, identified by triangle index (the
/// first vertex sits at `3 * triangle` in the flat position list).
#[derive(Debug, Clone, Copy)]
pub struct NearestHit {
    pub triangle: usize,
    pub t: f32,
}

/// An unindexed, flattened list of triangles: every 3 consecutive positions
/// form one triangle, winding order as given by the mesh source. Built once
/// per render pass and read-only afterwards; this is the only spatial data
/// the tracer queries.
pub struct TriangleSoup {
    positions: Vec<Point3>,
}

impl TriangleSoup {
    /// Wraps a flat position list. The mesh-ingestion side owns the
    /// multiple-of-3 invariant; this assert is the last line of defense.
    pub fn new(positions: Vec<Point3>) -> Self {
        assert_eq!(positions.len() % 3, 0);
        TriangleSoup { positions }
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle(&self, i: usize) -> (Point3, Point3, Point3) {
        (
            self.positions[3 * i],
            self.positions[3 * i + 1],
            self.positions[3 * i + 2],
        )
    }

    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Scans every triangle with the distance-only test and keeps the
    /// closest. Linear, no spatial pruning. A strict `<` keeps the earliest
    /// triangle in scan order when two hits are exactly tied. `None` means
    /// the ray hit nothing at all, which the shading side maps to the
    /// background.
    pub fn nearest_hit(&self, r: &Ray) -> Option<NearestHit> {
        let mut closest: Option<NearestHit> = None;
        for (i, tri) in self.positions.chunks_exact(3).enumerate() {
            if let Some(t) = intersect_dist(r, tri[0], tri[1], tri[2]) {
                if closest.map_or(true, |c| t < c.t) {
                    closest = Some(NearestHit { triangle: i, t });
                }
            }
        }
        closest
    }
}
