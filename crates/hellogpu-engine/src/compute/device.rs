use std::num::NonZeroUsize;

use anyhow::Result;

use super::ChunkPlan;

/// A parallel executor for the chunked partial-sum kernel.
///
/// Contract for [`execute`](Self::execute): the returned vector has exactly
/// `plan.results_count()` entries, and entry `i` is the 32-bit wrapping sum of
/// `input[plan.chunk(i)]`. Each entry is produced by exactly one logical worker.
///
/// Work is split in two so callers can time the dispatch separately from the
/// upload into device-visible memory.
pub trait PartialSumDevice {
    /// Input and output storage prepared by [`stage`](Self::stage).
    type Staged;

    /// Lanes per workgroup. Only affects how the grid is sized.
    fn execution_width(&self) -> NonZeroUsize;

    /// Copies `input` into device-visible memory and allocates zeroed result slots.
    ///
    /// `plan` must describe `input` and have at least one chunk.
    fn stage(&self, input: &[i32], plan: ChunkPlan) -> Result<Self::Staged>;

    /// Dispatches the grid, waits for completion and reads the partial sums back.
    fn execute(&self, staged: Self::Staged) -> Result<Vec<i32>>;

    /// Short name used in logs and reports.
    fn label(&self) -> &str;
}
