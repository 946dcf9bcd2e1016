use std::f32::consts::TAU;

use glam::Vec4;

use crate::affine::{self, Kind, point, polar_to_cartesian, vector};
use crate::error::MeshError;
use crate::mesh::{BoundingBox, Edge, Face, Mesh};

/// Forward finite-difference step used to estimate the curve tangent.
pub const TANGENT_STEP: f32 = 1e-4;

/// Largest sample count whose `2 + 2 * detail` vertices still fit `u32` indices.
pub const MAX_DETAIL: u32 = (u32::MAX - 2) / 2;

/// Direction the tangent probe travels around the spiral.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    #[inline]
    pub const fn sign(self) -> f32 {
        match self {
            Winding::CounterClockwise => 1.0,
            Winding::Clockwise => -1.0,
        }
    }
}

/// Shape parameters of a spiral ribbon.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpiralParams {
    /// Full turns from the center to the rim.
    pub revolutions: u32,
    /// Number of samples along the curve. Each sample emits two vertices.
    pub detail: u32,
    /// Half-width at the start of the ribbon.
    pub min_width: f32,
    /// Half-width added at the end of the ribbon, scaled by the ease curve.
    pub max_width: f32,
    pub winding: Winding,
}

impl SpiralParams {
    /// Half-width of the ribbon at progress `t`.
    #[inline]
    pub fn half_width(&self, t: f32) -> f32 {
        self.min_width + affine::ease(t) * self.max_width
    }

    fn validate(&self) -> Result<(), MeshError> {
        if self.detail > MAX_DETAIL {
            return Err(MeshError::DetailTooLarge { detail: self.detail, max: MAX_DETAIL });
        }
        for (name, value) in [("min_width", self.min_width), ("max_width", self.max_width)] {
            if !value.is_finite() {
                return Err(MeshError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

/// Built-in spiral shapes.
///
/// The default is chosen at build time: enabling the `tight-spiral` feature
/// makes [`SpiralPreset::Tight`] the default, otherwise [`SpiralPreset::Wide`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpiralPreset {
    /// Few wide revolutions.
    Wide,
    /// Many narrow revolutions, tangent probed in the opposite direction.
    Tight,
}

impl SpiralPreset {
    pub const fn params(self) -> SpiralParams {
        match self {
            SpiralPreset::Wide => SpiralParams {
                revolutions: 20,
                detail: 10_000,
                min_width: 0.005,
                max_width: 0.01,
                winding: Winding::CounterClockwise,
            },
            SpiralPreset::Tight => SpiralParams {
                revolutions: 80,
                detail: 10_000,
                min_width: -0.01,
                max_width: 0.02,
                winding: Winding::Clockwise,
            },
        }
    }
}

impl Default for SpiralPreset {
    fn default() -> Self {
        if cfg!(feature = "tight-spiral") {
            SpiralPreset::Tight
        } else {
            SpiralPreset::Wide
        }
    }
}

/// Point on the guide curve at progress `t`: polar radius `t`, angle `2π·R·t`.
#[inline]
pub fn reference_point(t: f32, revolutions: u32) -> Vec4 {
    polar_to_cartesian(t, TAU * revolutions as f32 * t, Kind::Point)
}

/// Ribbon mesh swept along an Archimedean spiral.
///
/// Built in one go by the constructor and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralMesh {
    params: SpiralParams,
    vertices: Vec<Vec4>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    bounds: BoundingBox,
}

impl SpiralMesh {
    /// Builds the build-time default preset.
    pub fn new() -> Self {
        Self::with_preset(SpiralPreset::default())
    }

    pub fn with_preset(preset: SpiralPreset) -> Self {
        Self::build(preset.params())
    }

    /// Builds a spiral from custom parameters.
    pub fn with_params(params: SpiralParams) -> Result<Self, MeshError> {
        params.validate()?;
        Ok(Self::build(params))
    }

    pub fn params(&self) -> &SpiralParams {
        &self.params
    }

    fn build(params: SpiralParams) -> Self {
        let samples = params.detail as usize;

        let mut vertices = Vec::with_capacity(2 + 2 * samples);
        let mut edges = Vec::with_capacity(2 * samples);
        let mut faces = Vec::with_capacity(2 * samples);

        // Two placeholders at the origin so the first sample has a previous
        // pair to connect to. The first triangles are therefore degenerate.
        vertices.push(point(0.0, 0.0));
        vertices.push(point(0.0, 0.0));

        let angle_rate = TAU * params.revolutions as f32;

        for i in 0..params.detail {
            let t = i as f32 / params.detail as f32;

            let reference = reference_point(t, params.revolutions);

            let probe_t = t + TANGENT_STEP;
            let probe = polar_to_cartesian(
                probe_t,
                params.winding.sign() * angle_rate * probe_t,
                Kind::Point,
            );
            let tangent = ((probe - reference) / TANGENT_STEP).normalize();

            let normal = vector(-tangent.y, tangent.x) * params.half_width(t);

            let p0 = vertices.len() as u32;
            vertices.push(reference + normal);
            let p1 = vertices.len() as u32;
            vertices.push(reference - normal);

            edges.push(Edge::new(p0, p0 - 2));
            edges.push(Edge::new(p1, p1 - 2));

            faces.push(Face::new(p0, p1, p0 - 1));
            faces.push(Face::new(p0, p0 - 2, p0 - 1));
        }

        let bounds = BoundingBox::from_vertices(&vertices);

        log::debug!(
            "spiral mesh: {} vertices, {} edges, {} faces, size {:?}",
            vertices.len(),
            edges.len(),
            faces.len(),
            bounds.size
        );

        Self {
            params,
            vertices,
            edges,
            faces,
            bounds,
        }
    }
}

impl Default for SpiralMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh for SpiralMesh {
    fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}
