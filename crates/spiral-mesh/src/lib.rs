//! Procedural mesh generation for the spiral ribbon viewer.
//!
//! This crate is intentionally free of GPU code. It produces plain
//! vertex / edge / face buffers that a renderer uploads once.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`affine`] | `point`, `vector`, `polar_to_cartesian`, `ease` |
//! | [`mesh`] | `Mesh` trait, `Edge`, `Face`, `BoundingBox` |
//! | [`spiral`] | `SpiralMesh`, `SpiralParams`, `SpiralPreset` |
//! | [`error`] | `MeshError` |
//!
//! # Quick start
//!
//! ```rust
//! use spiral_mesh::{Mesh, SpiralMesh};
//!
//! let mesh = SpiralMesh::new();
//! assert_eq!(mesh.vertex_count(), 2 + 2 * 10_000);
//! assert_eq!(mesh.edge_count(), mesh.face_count());
//! ```

pub mod affine;
pub mod error;
pub mod mesh;
pub mod spiral;

pub use error::MeshError;
pub use mesh::{BoundingBox, Edge, Face, Mesh};
pub use spiral::{SpiralMesh, SpiralParams, SpiralPreset, Winding};
