use anyhow::Result;

use super::adapter;
use super::GpuInit;

/// Headless GPU context for compute work.
///
/// Unlike [`Gpu`](super::Gpu) this owns no surface, so it can be created
/// without a window (command-line tools, tests).
pub struct ComputeGpu {
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl ComputeGpu {
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = adapter::create_instance();
        let (adapter, device, queue) =
            adapter::open_device(&instance, None, &init, "hellogpu compute device").await?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`ComputeGpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
