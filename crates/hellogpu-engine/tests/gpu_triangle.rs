//! Builds the triangle render pipeline on a real adapter.

use hellogpu_engine::device::{ComputeGpu, GpuInit};
use hellogpu_engine::render::{RenderCtx, TrianglePipeline, TriangleScene};

#[test]
#[ignore = "requires a GPU adapter - run with --ignored"]
fn triangle_pipeline_passes_validation() {
    let gpu = ComputeGpu::new_blocking(GpuInit::compute()).expect("GPU setup");
    let device = gpu.device();

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    for format in [
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ] {
        let ctx = RenderCtx::new(device, gpu.queue(), format);
        let _pipeline = TrianglePipeline::new(&ctx, &TriangleScene::default());
    }
    let error = pollster::block_on(scope.pop());

    assert!(error.is_none(), "validation error: {error:?}");
}
