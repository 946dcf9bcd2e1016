//! Flat-colored mesh rendering.
//!
//! [`SolidRenderer`] uploads a [`spiral_mesh::Mesh`] once and draws it as
//! lines (edges) or triangles (faces) in a single color under a 4x4
//! transform. Shader compile/link checks live in [`program`] and run
//! on the CPU through `naga`.

pub mod program;
mod renderer;
mod uniforms;

pub use program::{
    CompiledShader, ShaderError, ShaderProgram, ShaderStage, UniformLocations, compile_shader,
    link_program,
};
pub use renderer::SolidRenderer;
