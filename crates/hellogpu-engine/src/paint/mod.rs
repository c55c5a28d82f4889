//! Color model shared by the renderer and its callers.

pub mod color;

pub use color::Color;
