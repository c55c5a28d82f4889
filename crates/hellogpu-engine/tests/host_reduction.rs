//! Host-side reduction helpers as seen from outside the crate.

use hellogpu_engine::compute::{chunk_sum, finalize, sequential_sum};

#[test]
fn chunked_and_sequential_totals_agree() {
    let input = [5, 3, 8, 1, 9, 2, 4, 7, 6, 0];
    let partials: Vec<i32> = input.chunks(3).map(chunk_sum).collect();

    assert_eq!(partials, vec![16, 12, 17, 0]);
    assert_eq!(finalize(&partials), 45);
    assert_eq!(sequential_sum(&input), 45);
}
