//! Colors passed to the renderer.

mod color;

pub use color::Color;
