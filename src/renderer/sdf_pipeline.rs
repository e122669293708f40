//! SDF-based WebGPU render pipeline
//!
//! The whole scene is raymarched in the fragment shader. The CPU side only
//! uploads two buffers per frame: the frame uniforms and the render queue.

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use super::gpu_types::{FrameUniforms, QueueRecord};
use super::queue::RenderQueue;
use crate::consts::{FRAME_UNIFORMS_BINDING, MAX_RENDER_QUEUE, RENDER_QUEUE_BINDING};
use crate::error::RenderError;
use crate::view::Projection;

const SHADER_SOURCE: &str = include_str!("sdf_shader.wgsl");

/// Pipeline-overridable constant holding `Projection::fov_scale`
pub const FOV_SCALE_OVERRIDE: &str = "FOV_SCALE";

pub struct SdfRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    uniforms_buffer: wgpu::Buffer,
    queue_buffer: wgpu::Buffer,
    /// Records the queue buffer was sized for
    capacity: usize,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        capacity: usize,
        projection: &Projection,
    ) -> Result<Self, RenderError> {
        let capacity = capacity.clamp(1, MAX_RENDER_QUEUE);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                // Storage buffers are not available with the webgl2 limits
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface present modes: {:?}", surface_caps.present_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        // Empty frame until the first render
        let initial = FrameUniforms::new(
            Vec2::new(width as f32, height as f32),
            0.0,
            Vec3::ZERO,
            Vec3::NEG_Z,
            0,
        );
        let uniforms_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let queue_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render_queue"),
            size: (capacity * std::mem::size_of::<QueueRecord>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::info!(
            "Render queue buffer: {} records, {} bytes",
            capacity,
            queue_buffer.size()
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: FRAME_UNIFORMS_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: RENDER_QUEUE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: FRAME_UNIFORMS_BINDING,
                    resource: uniforms_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: RENDER_QUEUE_BINDING,
                    resource: queue_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // Rays must cover the same field of view the frustum culls against
        let fov_scale = projection.fov_scale();
        log::info!("Shader field of view: {:.1} deg", projection.fov_y.to_degrees());
        let constants = [(FOV_SCALE_OVERRIDE, f64::from(fov_scale))];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &constants,
                    ..Default::default()
                },
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniforms_buffer,
            queue_buffer,
            capacity,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Upload a published frame and draw it.
    ///
    /// The queue must be Published and `uniforms` must come from the same
    /// frame. The queue is released once its records are uploaded, so a frame
    /// is drawn at most once.
    pub fn render(&mut self, uniforms: &FrameUniforms, render_queue: &mut RenderQueue) -> Result<(), RenderError> {
        upload_frame(uniforms, render_queue, self.capacity, |uniform_bytes, records| {
            self.queue.write_buffer(&self.uniforms_buffer, 0, uniform_bytes);
            self.queue.write_buffer(&self.queue_buffer, 0, records);
        })?;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Check a published frame against the GPU buffer, hand the uniform and
/// record bytes to `write`, then release the queue.
///
/// Nothing is written when any check fails.
fn upload_frame(
    uniforms: &FrameUniforms,
    render_queue: &mut RenderQueue,
    capacity: usize,
    write: impl FnOnce(&[u8], &[u8]),
) -> Result<(), RenderError> {
    let records = render_queue.gpu_bytes()?;
    if render_queue.capacity() != capacity {
        return Err(RenderError::CapacityMismatch {
            expected: capacity,
            actual: render_queue.capacity(),
        });
    }
    if uniforms.queue_count as usize != render_queue.len() {
        return Err(RenderError::CountMismatch {
            uniforms: uniforms.queue_count,
            queue: render_queue.len(),
        });
    }

    write(bytemuck::bytes_of(uniforms), records);
    render_queue.release()
}
