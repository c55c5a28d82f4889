use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::device::ComputeGpu;

use super::{ChunkPlan, PartialSumDevice};

/// Lanes per workgroup when the adapter does not report a subgroup size.
pub const FALLBACK_EXECUTION_WIDTH: u32 = 64;

const ENTRY_POINT: &str = "parsum";

/// Name of the `override` constant that sets `@workgroup_size` in `parsum.wgsl`.
const WIDTH_OVERRIDE: &str = "WORKGROUP_WIDTH";

/// Scalar kernel argument padded to a 16-byte uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScalarUniform {
    value: u32,
    _pad: [u32; 3],
}

impl ScalarUniform {
    fn new(value: u32) -> Self {
        Self { value, _pad: [0; 3] }
    }
}

/// Partial-sum kernel running on a wgpu compute device.
///
/// Bindings follow the kernel's calling contract:
/// 0 = input (read-only), 1 = element count, 2 = partial sums, 3 = elements per sum.
pub struct GpuReduction {
    gpu: ComputeGpu,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    execution_width: NonZeroUsize,
}

/// Buffers for one dispatch.
pub struct GpuStaged {
    bind_group: wgpu::BindGroup,
    results: wgpu::Buffer,
    readback: wgpu::Buffer,
    results_size: wgpu::BufferAddress,
    results_count: usize,
    group_count: u32,
}

impl GpuReduction {
    /// Compiles the `parsum` pipeline on `gpu`.
    ///
    /// Workgroups are as wide as the adapter's largest subgroup, so one group
    /// maps onto one hardware SIMD unit.
    pub fn new(gpu: ComputeGpu) -> Result<Self> {
        let device = gpu.device();
        let info = gpu.adapter().get_info();
        let execution_width = choose_execution_width(info.subgroup_max_size, &device.limits());

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hellogpu parsum shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/parsum.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hellogpu parsum bgl"),
            entries: &[
                storage_entry(0, true),
                uniform_entry(1),
                storage_entry(2, false),
                uniform_entry(3),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hellogpu parsum pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("hellogpu parsum pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(ENTRY_POINT),
            compilation_options: wgpu::PipelineCompilationOptions {
                constants: &[(WIDTH_OVERRIDE, execution_width.get() as f64)],
                ..Default::default()
            },
            cache: None,
        });

        log::debug!(
            "parsum pipeline ready ({execution_width} lanes per group, adapter subgroups {}..={})",
            info.subgroup_min_size,
            info.subgroup_max_size
        );

        Ok(Self {
            gpu,
            pipeline,
            bind_group_layout,
            execution_width,
        })
    }

    /// Opens a headless device with default compute settings and builds the pipeline.
    pub fn new_default() -> Result<Self> {
        let gpu = ComputeGpu::new_blocking(crate::device::GpuInit::compute())?;
        Self::new(gpu)
    }

    pub fn gpu(&self) -> &ComputeGpu {
        &self.gpu
    }
}

impl PartialSumDevice for GpuReduction {
    type Staged = GpuStaged;

    fn execution_width(&self) -> NonZeroUsize {
        self.execution_width
    }

    fn stage(&self, input: &[i32], plan: ChunkPlan) -> Result<Self::Staged> {
        anyhow::ensure!(
            plan.len() == input.len(),
            "plan covers {} elements but input has {}",
            plan.len(),
            input.len()
        );
        anyhow::ensure!(!plan.is_empty(), "cannot dispatch an empty input");

        let data_count = u32::try_from(plan.len()).context("input length exceeds u32")?;
        let elements_per_sum =
            u32::try_from(plan.chunk_size().get()).context("chunk size exceeds u32")?;

        let limits = self.gpu.device().limits();
        let group_count = u32::try_from(plan.group_count(self.execution_width()))
            .ok()
            .filter(|&g| g <= limits.max_compute_workgroups_per_dimension)
            .context("too many partial sums for a single dispatch")?;

        let input_bytes: &[u8] = bytemuck::cast_slice(input);
        anyhow::ensure!(
            input_bytes.len() as u64 <= u64::from(limits.max_storage_buffer_binding_size),
            "input of {} bytes exceeds the device storage binding limit",
            input_bytes.len()
        );

        let device = self.gpu.device();
        let results_count = plan.results_count();
        let results_size = (results_count * std::mem::size_of::<i32>()) as wgpu::BufferAddress;

        let data = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hellogpu parsum data"),
            contents: input_bytes,
            usage: wgpu::BufferUsages::STORAGE,
        });

        let count = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hellogpu parsum count"),
            contents: bytemuck::bytes_of(&ScalarUniform::new(data_count)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let per_sum = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hellogpu parsum elements per sum"),
            contents: bytemuck::bytes_of(&ScalarUniform::new(elements_per_sum)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        // wgpu zero-initializes new buffers.
        let results = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hellogpu parsum results"),
            size: results_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hellogpu parsum readback"),
            size: results_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hellogpu parsum bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: data.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: count.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: results.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: per_sum.as_entire_binding(),
                },
            ],
        });

        Ok(GpuStaged {
            bind_group,
            results,
            readback,
            results_size,
            results_count,
            group_count,
        })
    }

    fn execute(&self, staged: Self::Staged) -> Result<Vec<i32>> {
        let device = self.gpu.device();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hellogpu parsum encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("hellogpu parsum pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &staged.bind_group, &[]);
            pass.dispatch_workgroups(staged.group_count, 1, 1);
        }

        encoder.copy_buffer_to_buffer(
            &staged.results,
            0,
            &staged.readback,
            0,
            staged.results_size,
        );

        log::debug!(
            "gpu dispatch: {} groups x {} lanes for {} partial sums",
            staged.group_count,
            self.execution_width,
            staged.results_count
        );

        self.gpu.queue().submit(std::iter::once(encoder.finish()));

        // Block until the copy has landed; nothing reads the slots before this.
        let slice = staged.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to wait for the parsum dispatch")?;
        rx.recv()
            .context("readback callback was dropped")?
            .context("failed to map the partial-sum buffer")?;

        let partials = {
            let mapped = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, i32>(&mapped).to_vec()
        };
        staged.readback.unmap();

        debug_assert_eq!(partials.len(), staged.results_count);
        Ok(partials)
    }

    fn label(&self) -> &str {
        "GPU"
    }
}

/// Workgroup width for an adapter whose largest subgroup is `subgroup_max_size`.
///
/// A size of 0 means the backend did not report one. The result always fits
/// the device's workgroup limits.
pub fn choose_execution_width(subgroup_max_size: u32, limits: &wgpu::Limits) -> NonZeroUsize {
    let ceiling = limits
        .max_compute_invocations_per_workgroup
        .min(limits.max_compute_workgroup_size_x)
        .max(1);
    let width = match subgroup_max_size {
        0 => FALLBACK_EXECUTION_WIDTH,
        n => n,
    };
    NonZeroUsize::new(width.clamp(1, ceiling) as usize).unwrap_or(NonZeroUsize::MIN)
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ScalarUniform>() as u64),
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(invocations: u32, size_x: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_compute_invocations_per_workgroup: invocations,
            max_compute_workgroup_size_x: size_x,
            ..wgpu::Limits::downlevel_defaults()
        }
    }

    #[test]
    fn width_follows_subgroup_size() {
        assert_eq!(choose_execution_width(32, &limits(256, 256)).get(), 32);
        assert_eq!(choose_execution_width(128, &limits(256, 256)).get(), 128);
    }

    #[test]
    fn unreported_subgroup_size_uses_fallback() {
        assert_eq!(
            choose_execution_width(0, &limits(256, 256)).get(),
            FALLBACK_EXECUTION_WIDTH as usize
        );
    }

    #[test]
    fn width_is_clamped_to_workgroup_limits() {
        assert_eq!(choose_execution_width(128, &limits(64, 256)).get(), 64);
        assert_eq!(choose_execution_width(128, &limits(256, 16)).get(), 16);
        assert_eq!(choose_execution_width(128, &limits(0, 0)).get(), 1);
    }
}
