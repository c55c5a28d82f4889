use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::render::{GpuFrameSurface, TrianglePipeline};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Presentation surface for this window's swapchain, drawing with `pipeline`.
    pub fn frame_surface<'s>(
        &'s mut self,
        pipeline: &'s TrianglePipeline,
    ) -> GpuFrameSurface<'s, 'w> {
        GpuFrameSurface::new(self.gpu, pipeline).with_window(self.window.window)
    }
}
