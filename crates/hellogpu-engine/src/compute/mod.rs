//! Chunked parallel reduction.
//!
//! The input is split into fixed-size chunks ([`ChunkPlan`]). A
//! [`PartialSumDevice`] sums every chunk in parallel, one worker per chunk,
//! and the host adds the partial sums sequentially. [`Reducer`] runs that
//! two-level reduction next to a plain host loop and reports both timings.
//!
//! Devices:
//! - [`GpuReduction`]: wgpu compute pipeline (`parsum` kernel)
//! - [`EmulatedDevice`]: the same grid on host threads

mod device;
mod emulated;
mod gpu;
mod host;
mod input;
mod plan;
mod reducer;
mod report;

pub use device::PartialSumDevice;
pub use emulated::{EmulatedDevice, EmulatedStaged, WorkerVisit};
pub use gpu::{choose_execution_width, GpuReduction, GpuStaged, FALLBACK_EXECUTION_WIDTH};
pub use host::{chunk_sum, finalize, sequential_sum};
pub use input::{random_input, ReductionConfig, DEFAULT_CHUNK_SIZE, DEFAULT_ELEMENT_COUNT};
pub use plan::ChunkPlan;
pub use reducer::{ChunkedSum, Reducer, HOST_LABEL};
pub use report::{Measurement, ReductionReport};
