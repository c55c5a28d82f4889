use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::paint::Color;

use super::{DrawCall, FrameSurface, RenderCtx, TriangleScene, Vertex};

/// GPU resources for drawing a [`TriangleScene`].
///
/// Built once when the window's device is ready and then borrowed by every
/// frame. The vertex buffer is immutable after creation.
pub struct TrianglePipeline {
    topology: wgpu::PrimitiveTopology,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl TrianglePipeline {
    pub fn new(ctx: &RenderCtx<'_>, scene: &TriangleScene) -> Self {
        let topology = scene.draw_call().topology;

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hellogpu triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hellogpu triangle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hellogpu triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("basic_vertex"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("basic_fragment"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hellogpu triangle vbo"),
            contents: bytemuck::cast_slice(scene.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!("triangle pipeline ready for {:?}", ctx.surface_format);

        Self {
            topology,
            pipeline,
            vertex_buffer,
        }
    }

    /// Records a clear to `clear` followed by `draw` into `frame`.
    pub fn encode(&self, frame: &mut GpuFrame, clear: Color, draw: DrawCall) {
        debug_assert_eq!(draw.topology, self.topology, "pipeline built for another topology");

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hellogpu triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..draw.vertex_count, 0..draw.instance_count);
    }
}

/// [`FrameSurface`] over a window's swapchain.
///
/// Surface errors turn into dropped frames. Out-of-memory is also recorded as
/// fatal so the caller can stop the loop.
pub struct GpuFrameSurface<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    pipeline: &'a TrianglePipeline,
    window: Option<&'a Window>,
    fatal: bool,
}

impl<'a, 'w> GpuFrameSurface<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, pipeline: &'a TrianglePipeline) -> Self {
        Self {
            gpu,
            pipeline,
            window: None,
            fatal: false,
        }
    }

    /// Notifies `window` right before each present.
    pub fn with_window(mut self, window: &'a Window) -> Self {
        self.window = Some(window);
        self
    }

    /// Whether an unrecoverable surface error was hit.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl FrameSurface for GpuFrameSurface<'_, '_> {
    type Drawable = GpuFrame;

    fn acquire(&mut self) -> Option<GpuFrame> {
        match self.gpu.begin_frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface error is unrecoverable: out of memory");
                    self.fatal = true;
                } else {
                    log::debug!("surface not ready ({action:?})");
                }
                None
            }
        }
    }

    fn encode(&mut self, drawable: &mut GpuFrame, clear: Color, draw: DrawCall) {
        self.pipeline.encode(drawable, clear, draw);
    }

    fn present(&mut self, drawable: GpuFrame) {
        if let Some(window) = self.window {
            window.pre_present_notify();
        }
        self.gpu.present(drawable);
    }
}
