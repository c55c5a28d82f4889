//! Sums ten million random integers on the GPU in fixed-size chunks, then
//! again on the CPU, and prints both results with their timings.

use anyhow::Result;

use hellogpu_engine::compute::{GpuReduction, Reducer, ReductionConfig};
use hellogpu_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ReductionConfig::default();

    let device = GpuReduction::new_default()?;
    let reducer = Reducer::new(device, config.chunk_size).with_value_bound(config.max_value);

    let input = config.generate_input();
    log::info!("generated {} values in [0, {})", input.len(), config.max_value);

    let report = reducer.run(&input)?;
    println!("{report}");

    Ok(())
}
