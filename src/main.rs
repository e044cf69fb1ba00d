mod cli_options;
mod gpu;
mod image;
mod obj;
mod render;
mod trace;

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use geometry::camera::CameraRig;
use log::info;
use math::hcm::{point3, vec3};

use crate::image::Color;
use crate::render::RenderConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options =
        cli_options::parse_args(std::env::args().collect()).map_err(anyhow::Error::msg)?;
    let obj_file = options
        .obj_file
        .clone()
        .context("missing required --obj <file.obj>")?;

    let start = Instant::now();
    let soup = obj::load_obj(Path::new(&obj_file))?;
    info!(
        "loaded {} triangles from {} in {:.2?}",
        soup.triangle_count(),
        obj_file,
        start.elapsed()
    );

    let (px, py, pz) = options.cam_pos;
    let (fx, fy, fz) = options.cam_front;
    let rig = CameraRig::new(
        point3(px, py, pz),
        vec3(fx, fy, fz),
        math::new_deg(options.fov_degrees),
    );
    let (br, bg, bb) = options.background;
    let config = RenderConfig {
        width: options.width,
        height: options.height,
        background: Color::opaque(br, bg, bb),
        bounces: options.bounces,
    };

    let start = Instant::now();
    let film = if options.use_gpu {
        gpu::render_gpu(&soup, &rig, &config)?
    } else {
        render::render_cpu(&soup, &rig, &config)
    };
    info!(
        "rendered {}x{} on the {} in {:.2?}",
        config.width,
        config.height,
        if options.use_gpu { "gpu" } else { "cpu" },
        start.elapsed()
    );

    image::write_png(Path::new(&options.out_file), config.width, config.height, &film)?;
    info!("wrote {}", options.out_file);
    Ok(())
}
