//! Spiral engine crate.
//!
//! Owns the platform + GPU runtime pieces and the solid mesh renderer used by
//! the viewer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod paint;
