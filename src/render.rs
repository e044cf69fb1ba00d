use geometry::camera::CameraRig;
use indicatif::ProgressBar;
use rayon::prelude::*;
use shape::TriangleSoup;

use crate::image::Color;
use crate::trace;

/// Bounce counts above this saturate rather than error.
pub const MAX_BOUNCES: u32 = 2;

/// Everything one render pass needs besides the mesh and the camera rig.
/// Built once per pass and passed by shared reference; no process-wide
/// mutable render state exists anywhere.
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub bounces: u32,
}

impl RenderConfig {
    pub fn effective_bounces(&self) -> u32 {
        self.bounces.min(MAX_BOUNCES)
    }
    /// Film size in bytes: width x height x RGBA8.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// CPU backend of the per-pixel dispatcher: rows in parallel, columns
/// sequential within each row. Every worker owns a disjoint row slice of the
/// film and the soup/rig/config are all read-only, so the partitioning is
/// the only synchronization.
pub fn render_cpu(soup: &TriangleSoup, rig: &CameraRig, config: &RenderConfig) -> Vec<u8> {
    let mut film = vec![0u8; config.byte_len()];
    let progress = ProgressBar::new(config.height as u64);
    film.par_chunks_mut(config.width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..config.width {
                let color = trace::trace_pixel(soup, rig, config, x, y as u32);
                let base = x as usize * 4;
                row[base..base + 4].copy_from_slice(&color.to_u8());
            }
            progress.inc(1);
        });
    progress.finish_and_clear();
    film
}
