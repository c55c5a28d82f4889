//! Redraws a white triangle on a green background once per display refresh.

use anyhow::{anyhow, Result};

use hellogpu_engine::core::{App, AppControl, FrameCtx};
use hellogpu_engine::device::{Gpu, GpuInit};
use hellogpu_engine::logging::{init_logging, LoggingConfig};
use hellogpu_engine::render::{FrameLoop, RenderCtx, TrianglePipeline, TriangleScene};
use hellogpu_engine::window::{Runtime, RuntimeConfig};

/// 32-bit BGRA output, no sRGB conversion.
const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

struct TriangleDemo {
    scene: TriangleScene,
    pipeline: Option<TrianglePipeline>,
    frames: FrameLoop,
}

impl App for TriangleDemo {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        if gpu.surface_format() != OUTPUT_FORMAT {
            log::warn!("{OUTPUT_FORMAT:?} unavailable, rendering to {:?}", gpu.surface_format());
        }
        self.pipeline = Some(TrianglePipeline::new(&RenderCtx::for_gpu(gpu), &self.scene));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return AppControl::Continue;
        };

        let frame_index = ctx.time.frame_index;
        let mut surface = ctx.frame_surface(pipeline);
        self.frames.on_refresh(&self.scene, &mut surface);
        let fatal = surface.is_fatal();
        drop(surface);

        if fatal {
            ctx.runtime.fail(anyhow!("surface out of memory"));
            return AppControl::Exit;
        }

        if frame_index > 0 && frame_index % 600 == 0 {
            log::debug!(
                "frames presented: {}, dropped: {}",
                self.frames.presented(),
                self.frames.dropped()
            );
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu_init = GpuInit {
        preferred_formats: vec![OUTPUT_FORMAT],
        ..GpuInit::default()
    };

    let config = RuntimeConfig {
        title: "hellogpu triangle".to_string(),
        ..RuntimeConfig::default()
    };

    let demo = TriangleDemo {
        scene: TriangleScene::default(),
        pipeline: None,
        frames: FrameLoop::new(),
    };

    Runtime::run(config, gpu_init, demo)
}
