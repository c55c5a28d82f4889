//! hellogpu engine crate.
//!
//! Owns the GPU + platform runtime pieces behind the two demos:
//! - `compute`: chunked parallel reduction (device partial sums, host total)
//! - `render`: a static triangle redrawn on every display refresh

pub mod compute;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
