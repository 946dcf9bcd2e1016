//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into a
//! [`RenderTarget`] handed out once per frame.
//!
//! Convention:
//! - Vertex positions are homogeneous `Vec4`s already in clip space after
//!   the renderer's transform; no viewport uniform is involved.
//! - Use [`Viewport::aspect`] to build an aspect-correcting transform.

mod ctx;
pub mod solid;
mod viewport;

pub use ctx::{RenderCtx, RenderTarget};
pub use viewport::Viewport;
