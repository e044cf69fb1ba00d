use geometry::camera::CameraRig;
use geometry::ray::Ray;
use math::hcm::mirror;
use shape::{intersect_full, TriangleSoup};

use crate::image::Color;
use crate::render::RenderConfig;

/// Offset along a reflected direction so a bounced ray does not immediately
/// re-intersect the triangle it just left.
const REFLECT_NUDGE: f32 = 1e-4;

/// Evaluates the full per-pixel pipeline for pixel (x, y): camera ray,
/// nearest hit, shading. Pure with respect to everything but its inputs, so
/// any dispatch order and any parallelism is fine.
pub fn trace_pixel(
    soup: &TriangleSoup,
    rig: &CameraRig,
    config: &RenderConfig,
    x: u32,
    y: u32,
) -> Color {
    let ray = rig.pixel_ray(x, y, config.width, config.height);
    trace_ray(soup, config, &ray, config.effective_bounces())
}

/// The shading rule:
/// - no triangle hit: the configured background;
/// - back-facing hit: white attenuated by inverse-square falloff over the
///   hit distance, `1 / max(t^2, 1)` (the clamp stops near hits from
///   blowing out past white);
/// - front-facing hit: black, unless bounces remain, in which case the ray
///   mirrors off the triangle and the reflection is traced instead.
fn trace_ray(soup: &TriangleSoup, config: &RenderConfig, ray: &Ray, bounces_left: u32) -> Color {
    let near = match soup.nearest_hit(ray) {
        None => return config.background,
        Some(near) => near,
    };
    let (v0, v1, v2) = soup.triangle(near.triangle);
    // One full-shape test on the winning triangle adds (u, v) and the facing
    // bit; it repeats the scan's arithmetic and so agrees with it.
    let hit = match intersect_full(ray, v0, v1, v2) {
        None => return config.background,
        Some(hit) => hit,
    };
    if hit.back_facing {
        let falloff = 1.0 / (hit.t * hit.t).max(1.0);
        Color::opaque(falloff, falloff, falloff)
    } else if bounces_left > 0 {
        // det passed the epsilon guard, so the triangle has area and the
        // normal is safe to normalize.
        let normal = (v1 - v0).cross(v2 - v0).hat();
        let dir = mirror(normal, ray.dir);
        let origin = ray.position_at(near.t) + dir * REFLECT_NUDGE;
        trace_ray(soup, config, &Ray::new(origin, dir), bounces_left - 1)
    } else {
        Color::black()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3, Point3};

    fn soup_of(triangles: &[[Point3; 3]]) -> TriangleSoup {
        let mut positions = vec![];
        for tri in triangles {
            positions.extend_from_slice(tri);
        }
        TriangleSoup::new(positions)
    }

    fn config(bounces: u32) -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 8,
            background: Color::opaque(0.0, 0.3, 0.28),
            bounces,
        }
    }

    // Winding normal +Z; a +Z ray strikes its back side (lit), a -Z ray its
    // front (shadowed).
    fn big_triangle_at(z: f32) -> [Point3; 3] {
        [
            point3(-10.0, -10.0, z),
            point3(30.0, -10.0, z),
            point3(-10.0, 30.0, z),
        ]
    }

    #[test]
    fn miss_yields_background() {
        let soup = soup_of(&[]);
        let cfg = config(0);
        let ray = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, 1.0));
        assert_eq!(trace_ray(&soup, &cfg, &ray, 0), cfg.background);
    }

    #[test]
    fn inverse_square_falloff() {
        let cfg = config(0);
        for (dist, expected) in [(1.0f32, 1.0f32), (2.0, 0.25), (3.0, 1.0 / 9.0)] {
            let soup = soup_of(&[big_triangle_at(dist)]);
            let ray = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, 1.0));
            let color = trace_ray(&soup, &cfg, &ray, 0);
            assert!(
                (color.r - expected).abs() < 1e-5,
                "at t = {}: {} vs expected {}",
                dist,
                color.r,
                expected
            );
            assert_eq!(color.r, color.g);
            assert_eq!(color.g, color.b);
            assert_eq!(color.a, 1.0);
        }
    }

    #[test]
    fn near_hits_clamp_to_white_not_beyond() {
        let cfg = config(0);
        let soup = soup_of(&[big_triangle_at(0.5)]);
        let ray = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, 1.0));
        let color = trace_ray(&soup, &cfg, &ray, 0);
        // 1 / max(0.25, 1.0) = 1.0: white, not 4x super-white.
        assert!((color.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn front_facing_hit_is_black_without_bounces() {
        let cfg = config(0);
        let soup = soup_of(&[big_triangle_at(-2.0)]);
        let ray = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
        assert_eq!(trace_ray(&soup, &cfg, &ray, 0), Color::black());
    }

    #[test]
    fn one_bounce_reflects_into_lit_surface() {
        // Mirror at z = 0 faces the ray (front); the reflection turns the
        // ray around, back through its own origin to the far triangle at
        // z = 4, hitting that one's back side (lit).
        let soup = soup_of(&[big_triangle_at(0.0), big_triangle_at(4.0)]);
        let ray = Ray::new(point3(0.2, 0.2, 2.0), vec3(0.0, 0.0, -1.0));

        let flat = trace_ray(&soup, &config(0), &ray, 0);
        assert_eq!(flat, Color::black());

        let bounced = trace_ray(&soup, &config(1), &ray, 1);
        // Reflected leg travels from z = 0 to z = 4: 1 / 16 grey.
        assert!((bounced.r - 1.0 / 16.0).abs() < 1e-3, "got {}", bounced.r);
    }

    #[test]
    fn bounce_depth_saturates_at_two() {
        let soup = soup_of(&[big_triangle_at(0.0), big_triangle_at(4.0)]);
        let ray = Ray::new(point3(0.2, 0.2, 2.0), vec3(0.0, 0.0, -1.0));
        let at_two = trace_ray(&soup, &config(2), &ray, config(2).effective_bounces());
        let at_nine = trace_ray(&soup, &config(9), &ray, config(9).effective_bounces());
        assert_eq!(at_two, at_nine);
    }
}
