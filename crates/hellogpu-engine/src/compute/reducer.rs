use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use anyhow::Result;

use super::host;
use super::{ChunkPlan, Measurement, PartialSumDevice, ReductionReport};

/// Label of the host-only comparison path.
pub const HOST_LABEL: &str = "CPU";

/// Output of the two-level (device chunks, then host) reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedSum {
    pub partials: Vec<i32>,
    pub total: i64,
    /// Dispatch + wait + readback + host finalization.
    pub elapsed: Duration,
}

/// Drives a [`PartialSumDevice`] through one chunked reduction.
pub struct Reducer<D> {
    device: D,
    chunk_size: NonZeroUsize,
    value_bound: Option<u32>,
}

impl<D: PartialSumDevice> Reducer<D> {
    pub fn new(device: D, chunk_size: NonZeroUsize) -> Self {
        Self {
            device,
            chunk_size,
            value_bound: None,
        }
    }

    /// Exclusive upper bound of the input values, used to warn when a
    /// 32-bit partial sum could wrap.
    pub fn with_value_bound(mut self, max_value: u32) -> Self {
        self.value_bound = Some(max_value);
        self
    }

    pub fn plan_for(&self, input: &[i32]) -> ChunkPlan {
        ChunkPlan::new(input.len(), self.chunk_size)
    }

    /// Sums `input` on the device in chunks and combines the partials on the host.
    ///
    /// Staging (the copy into device memory) is not part of `elapsed`.
    pub fn chunked_sum(&self, input: &[i32]) -> Result<ChunkedSum> {
        let plan = self.plan_for(input);

        if let Some(bound) = self.value_bound {
            if plan.partial_may_overflow(bound) {
                log::warn!(
                    "chunks of {} values below {bound} can overflow a 32-bit partial sum",
                    plan.chunk_size()
                );
            }
        }

        if plan.is_empty() {
            return Ok(ChunkedSum {
                partials: Vec::new(),
                total: 0,
                elapsed: Duration::ZERO,
            });
        }

        log::info!(
            "{}: {} elements in {} chunks of {}",
            self.device.label(),
            plan.len(),
            plan.results_count(),
            plan.chunk_size()
        );

        let staged = self.device.stage(input, plan)?;

        let start = Instant::now();
        let partials = self.device.execute(staged)?;
        let total = host::finalize(&partials);
        let elapsed = start.elapsed();

        anyhow::ensure!(
            partials.len() == plan.results_count(),
            "device returned {} partial sums, expected {}",
            partials.len(),
            plan.results_count()
        );

        Ok(ChunkedSum {
            partials,
            total,
            elapsed,
        })
    }

    /// Runs the device path, then the sequential host path over the same input.
    pub fn run(&self, input: &[i32]) -> Result<ReductionReport> {
        let chunked = self.chunked_sum(input)?;

        let start = Instant::now();
        let host_total = host::sequential_sum(input);
        let host_elapsed = start.elapsed();

        let report = ReductionReport {
            device: Measurement::new(self.device.label(), chunked.total, chunked.elapsed),
            host: Measurement::new(HOST_LABEL, host_total, host_elapsed),
            partials: chunked.partials.len(),
        };

        if !report.agrees() {
            log::warn!(
                "device total {} differs from host total {}",
                report.device.result,
                report.host.result
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{random_input, EmulatedDevice};

    fn nz(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    #[test]
    fn worked_example_end_to_end() {
        let reducer = Reducer::new(EmulatedDevice::default(), nz(3));
        let input = [5, 3, 8, 1, 9, 2, 4, 7, 6, 0];

        let sum = reducer.chunked_sum(&input).unwrap();
        assert_eq!(sum.partials, vec![16, 12, 17, 0]);
        assert_eq!(sum.total, 45);

        let report = reducer.run(&input).unwrap();
        assert_eq!(report.device.result, 45);
        assert_eq!(report.host.result, 45);
        assert_eq!(report.host.label, HOST_LABEL);
        assert_eq!(report.device.label, "Emulated");
        assert_eq!(report.partials, 4);
    }

    #[test]
    fn device_and_host_agree_on_random_inputs() {
        for (seed, len, chunk) in [(1, 1, 1), (2, 1_000, 7), (3, 4_096, 64), (4, 100_003, 1_000)] {
            let input = random_input(len, 100, Some(seed));
            let reducer = Reducer::new(EmulatedDevice::new(nz(16)), nz(chunk));
            let report = reducer.run(&input).unwrap();
            assert!(report.agrees(), "seed {seed}: {report}");
            assert_eq!(report.partials, len.div_ceil(chunk));
        }
    }

    #[test]
    fn empty_input_skips_the_device() {
        let reducer = Reducer::new(EmulatedDevice::default(), nz(10));
        let report = reducer.run(&[]).unwrap();
        assert_eq!(report.device.result, 0);
        assert_eq!(report.host.result, 0);
        assert_eq!(report.partials, 0);
    }

    #[test]
    fn host_total_is_exact_when_a_partial_wraps() {
        // One chunk wraps in 32 bits; the host reference does not.
        let input = [i32::MAX, 1];
        let reducer = Reducer::new(EmulatedDevice::default(), nz(2)).with_value_bound(u32::MAX);
        let report = reducer.run(&input).unwrap();
        assert_eq!(report.host.result, i32::MAX as i64 + 1);
        assert_eq!(report.device.result, i32::MIN as i64);
        assert!(!report.agrees());
    }
}
