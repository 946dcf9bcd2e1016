//! Core engine-facing contracts.
//!
//! The interface between the window runtime and the viewer: an [`App`]
//! receives window events and one [`FrameCtx`] per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
