/// Renderer-facing context (device/queue + surface format).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
        }
    }

    /// Context for the swapchain of `gpu`.
    #[inline]
    pub fn for_gpu(gpu: &'a crate::device::Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }
}
