use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

use super::host;
use super::{ChunkPlan, PartialSumDevice};

/// One lane that did work during an emulated dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerVisit {
    pub group: usize,
    pub lane: usize,
    pub result_index: usize,
    pub range: Range<usize>,
}

type Observer = Arc<dyn Fn(&WorkerVisit) + Send + Sync>;

/// Runs the partial-sum grid on host threads.
///
/// Each workgroup becomes one rayon task that owns the slice of result slots
/// for its lanes, so slots are disjoint by construction. Lanes past the last
/// chunk do not exist in the trailing group.
#[derive(Clone)]
pub struct EmulatedDevice {
    execution_width: NonZeroUsize,
    observer: Option<Observer>,
}

/// Host copy of the input plus zeroed result slots.
pub struct EmulatedStaged {
    input: Vec<i32>,
    results: Vec<i32>,
    plan: ChunkPlan,
}

impl EmulatedDevice {
    pub const DEFAULT_EXECUTION_WIDTH: NonZeroUsize = NonZeroUsize::new(32).unwrap();

    pub fn new(execution_width: NonZeroUsize) -> Self {
        Self {
            execution_width,
            observer: None,
        }
    }

    /// Calls `observer` from the worker thread for every lane that writes a slot.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&WorkerVisit) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl Default for EmulatedDevice {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXECUTION_WIDTH)
    }
}

impl fmt::Debug for EmulatedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmulatedDevice")
            .field("execution_width", &self.execution_width)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl PartialSumDevice for EmulatedDevice {
    type Staged = EmulatedStaged;

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

        Ok(EmulatedStaged {
            input: input.to_vec(),
            results: vec![0; plan.results_count()],
            plan,
        })
    }

    fn execute(&self, staged: Self::Staged) -> Result<Vec<i32>> {
        let EmulatedStaged {
            input,
            mut results,
            plan,
        } = staged;
        let width = self.execution_width.get();

        log::debug!(
            "emulated dispatch: {} groups x {} lanes for {} partial sums",
            plan.group_count(self.execution_width),
            width,
            plan.results_count()
        );

        results
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(group, slots)| {
                for (lane, slot) in slots.iter_mut().enumerate() {
                    let result_index = group * width + lane;
                    let range = plan.chunk(result_index);

                    if let Some(observer) = &self.observer {
                        observer(&WorkerVisit {
                            group,
                            lane,
                            result_index,
                            range: range.clone(),
                        });
                    }

                    *slot = host::chunk_sum(&input[range]);
                }
            });

        Ok(results)
    }

    fn label(&self) -> &str {
        "Emulated"
    }
}
