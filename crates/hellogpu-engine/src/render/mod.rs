//! Triangle rendering.
//!
//! [`TriangleScene`] is the immutable description of what to draw,
//! [`FrameLoop`] drives one frame per display refresh through a
//! [`FrameSurface`], and [`TrianglePipeline`] / [`GpuFrameSurface`] are the
//! wgpu-backed pieces behind that seam.

mod ctx;
mod frame;
mod scene;
mod triangle;

pub use ctx::RenderCtx;
pub use frame::{FrameLoop, FrameOutcome, FrameState, FrameSurface};
pub use scene::{DrawCall, TriangleScene, Vertex};
pub use triangle::{GpuFrameSurface, TrianglePipeline};
