//! Runs the `parsum` kernel on a real adapter.

use std::num::NonZeroUsize;

use hellogpu_engine::compute::{
    choose_execution_width, random_input, ChunkPlan, EmulatedDevice, GpuReduction,
    PartialSumDevice, Reducer,
};

fn nz(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

#[test]
#[ignore = "requires a GPU adapter - run with --ignored"]
fn gpu_partials_match_emulated_device() {
    let gpu = GpuReduction::new_default().expect("GPU reduction setup");
    let emulated = EmulatedDevice::default();

    for (len, chunk) in [(10, 3), (1, 1), (4_097, 64), (1_000_003, 10_000)] {
        let input = random_input(len, 100, Some(len as u64));
        let plan = ChunkPlan::new(len, nz(chunk));

        let on_gpu = gpu.execute(gpu.stage(&input, plan).unwrap()).unwrap();
        let on_host = emulated.execute(emulated.stage(&input, plan).unwrap()).unwrap();
        assert_eq!(on_gpu, on_host, "len {len}, chunk {chunk}");
    }
}

#[test]
#[ignore = "requires a GPU adapter - run with --ignored"]
fn gpu_worked_example() {
    let reducer = Reducer::new(GpuReduction::new_default().expect("GPU reduction setup"), nz(3));
    let sum = reducer.chunked_sum(&[5, 3, 8, 1, 9, 2, 4, 7, 6, 0]).unwrap();
    assert_eq!(sum.partials, vec![16, 12, 17, 0]);
    assert_eq!(sum.total, 45);

    let report = reducer.run(&[5, 3, 8, 1, 9, 2, 4, 7, 6, 0]).unwrap();
    assert!(report.agrees());
    assert_eq!(report.device.label, "GPU");
}

#[test]
#[ignore = "requires a GPU adapter - run with --ignored"]
fn gpu_execution_width_comes_from_adapter() {
    let reduction = GpuReduction::new_default().expect("GPU reduction setup");
    let info = reduction.gpu().adapter().get_info();
    let limits = reduction.gpu().device().limits();

    let expected = choose_execution_width(info.subgroup_max_size, &limits);
    assert_eq!(reduction.execution_width(), expected);

    // A dispatch sized by that width still covers every chunk.
    let input = random_input(expected.get() * 7 + 5, 100, Some(7));
    let plan = ChunkPlan::new(input.len(), nz(1));
    let partials = reduction.execute(reduction.stage(&input, plan).unwrap()).unwrap();
    assert_eq!(partials, input);
}
