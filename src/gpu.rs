//! GPU backend of the per-pixel dispatcher: one compute work-item per pixel
//! over the same triangle soup, behind the `gpu` cargo feature.

use thiserror::Error;

#[cfg(not(feature = "gpu"))]
use {crate::render::RenderConfig, geometry::camera::CameraRig, shape::TriangleSoup};

#[cfg(not(feature = "gpu"))]
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("objtracer was compiled without the `gpu` feature; rebuild with --features gpu")]
    FeatureDisabled,
}

#[cfg(feature = "gpu")]
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("readback buffer mapping failed")]
    BufferMapping,
}

/// Stub for builds without the `gpu` feature: selecting the GPU backend is a
/// runtime error, not a compile error.
#[cfg(not(feature = "gpu"))]
pub fn render_gpu(
    _soup: &TriangleSoup,
    _rig: &CameraRig,
    _config: &RenderConfig,
) -> Result<Vec<u8>, GpuError> {
    Err(GpuError::FeatureDisabled)
}

#[cfg(feature = "gpu")]
pub use enabled::render_gpu;

#[cfg(feature = "gpu")]
mod enabled {
    use super::GpuError;
    use crate::render::RenderConfig;
    use bytemuck::{Pod, Zeroable};
    use geometry::camera::CameraRig;
    use log::info;
    use shape::TriangleSoup;

    const TRACE_SHADER: &str = include_str!("trace.wgsl");

    /// Uniform block mirrored by `Params` in trace.wgsl. Positions carry a
    /// fourth padding component because WGSL vec3 uniforms align to 16
    /// bytes.
    #[repr(C)]
    #[derive(Clone, Copy, Debug, Pod, Zeroable)]
    struct GpuParams {
        cam_pos: [f32; 4],
        cam_right: [f32; 4],
        cam_up: [f32; 4],
        fan_origin: [f32; 4],
        background: [f32; 4],
        width: u32,
        height: u32,
        vertex_count: u32,
        bounces: u32,
    }

    impl GpuParams {
        fn pack(soup: &TriangleSoup, rig: &CameraRig, config: &RenderConfig) -> Self {
            let bg = config.background;
            GpuParams {
                cam_pos: rig.position().as_vec4().to_array(),
                cam_right: rig.right().as_vec4().to_array(),
                cam_up: rig.up().as_vec4().to_array(),
                fan_origin: rig.light_offset().as_vec4().to_array(),
                background: [bg.r, bg.g, bg.b, bg.a],
                width: config.width,
                height: config.height,
                vertex_count: soup.positions().len() as u32,
                bounces: config.effective_bounces(),
            }
        }
    }

    /// Renders one frame on the GPU. The soup is uploaded once per pass as a
    /// read-only storage buffer; the dispatch covers every pixel; mapping
    /// the readback buffer blocks until the whole pass has completed, so no
    /// reader ever observes a partial film.
    pub fn render_gpu(
        soup: &TriangleSoup,
        rig: &CameraRig,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, GpuError> {
        use wgpu::util::DeviceExt;

        let (device, queue) = pollster::block_on(request_device())?;

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Trace Shader"),
            source: wgpu::ShaderSource::Wgsl(TRACE_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Trace Bind Group Layout"),
            entries: &[
                // Render parameters
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Triangle soup
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Film
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trace Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Trace Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader_module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params = GpuParams::pack(soup, rig, config);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Params Buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        // Positions padded to vec4; an empty soup still needs a non-empty
        // buffer, with vertex_count = 0 keeping the shader's scan idle.
        let mut mesh_data: Vec<[f32; 4]> = soup
            .positions()
            .iter()
            .map(|p| p.as_vec4().to_array())
            .collect();
        if mesh_data.is_empty() {
            mesh_data.push([0.0; 4]);
        }
        let mesh_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Buffer"),
            contents: bytemuck::cast_slice(&mesh_data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let (width, height) = (config.width, config.height);
        let film_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Film Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let film_view = film_texture.create_view(&Default::default());

        // Texture-to-buffer copies need rows padded to 256 bytes.
        let padded_bytes_per_row = (width * 4).div_ceil(256) * 256;
        let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Trace Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: mesh_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&film_view),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Trace Encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Trace Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(width.div_ceil(8), height.div_ceil(8), 1);
        }
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &film_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        // Mapping completes only after every in-flight work-item of the pass
        // has finished: this is the full-pass barrier before readback.
        let buffer_slice = readback_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| GpuError::BufferMapping)?
            .map_err(|_| GpuError::BufferMapping)?;

        let data = buffer_slice.get_mapped_range();
        let mut film = Vec::with_capacity(config.byte_len());
        for row in 0..height {
            let row_start = (row * padded_bytes_per_row) as usize;
            let row_end = row_start + (width * 4) as usize;
            film.extend_from_slice(&data[row_start..row_end]);
        }
        drop(data);
        readback_buffer.unmap();

        info!("gpu pass complete: {} triangles, {}x{}", soup.triangle_count(), width, height);
        Ok(film)
    }

    async fn request_device() -> Result<(wgpu::Device, wgpu::Queue), GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;
        Ok((device, queue))
    }

}
