use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Line segment between two vertices, by index.
///
/// `#[repr(C)]` so a slice of edges can be uploaded directly as a `u32`
/// index buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    /// Number of indices one edge contributes to a line-list draw.
    pub const INDICES: u32 = 2;

    #[inline]
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    #[inline]
    pub const fn indices(self) -> [u32; 2] {
        [self.a, self.b]
    }
}

/// Triangle over three vertices, by index.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    /// Number of indices one face contributes to a triangle-list draw.
    pub const INDICES: u32 = 3;

    #[inline]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub const fn indices(self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// Axis-aligned bounds of a mesh.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoundingBox {
    pub center: Vec4,
    pub size: Vec4,
}

impl BoundingBox {
    /// Builds bounds from a vertex list.
    ///
    /// `size` is the component-wise `|max - min|` over all vertices. `center`
    /// is pinned to `(0, 0, 0, 0)` instead of the midpoint of the extrema;
    /// viewers that frame the mesh rely on this origin-centered behavior.
    ///
    /// The extrema are seeded from the first vertex, not from zero. For a
    /// mesh of points (`w == 1` everywhere) `size.w` is therefore `0`, where a
    /// zero-seeded fold would report `1`; `x` and `y` agree either way as long
    /// as the mesh spans the origin.
    pub fn from_vertices(vertices: &[Vec4]) -> Self {
        let Some((first, rest)) = vertices.split_first() else {
            return Self::default();
        };

        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));

        Self {
            center: Vec4::ZERO,
            size: (max - min).abs(),
        }
    }
}

/// Read-only view of an indexed mesh.
///
/// This is the whole surface a renderer needs: raw arrays plus their counts,
/// and the bounds used to frame the mesh on screen.
pub trait Mesh {
    fn vertices(&self) -> &[Vec4];

    fn edges(&self) -> &[Edge];

    fn faces(&self) -> &[Face];

    fn bounds(&self) -> BoundingBox;

    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    #[inline]
    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Bounding-box size.
    #[inline]
    fn dimensions(&self) -> Vec4 {
        self.bounds().size
    }

    /// Bounding-box center.
    #[inline]
    fn center(&self) -> Vec4 {
        self.bounds().center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── BoundingBox ───────────────────────────────────────────────────────

    #[test]
    fn bounds_of_empty_is_zero() {
        assert_eq!(BoundingBox::from_vertices(&[]), BoundingBox::default());
    }

    #[test]
    fn bounds_size_is_extent() {
        let verts = [
            Vec4::new(-1.0, 2.0, 0.0, 1.0),
            Vec4::new(3.0, -4.0, 0.0, 1.0),
            Vec4::new(0.5, 0.5, 0.0, 1.0),
        ];
        let b = BoundingBox::from_vertices(&verts);
        assert_eq!(b.size, Vec4::new(4.0, 6.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_center_stays_at_origin() {
        // Every vertex lies in the +x/+y quadrant; the center still does not move.
        let verts = [Vec4::new(10.0, 10.0, 0.0, 1.0), Vec4::new(12.0, 14.0, 0.0, 1.0)];
        let b = BoundingBox::from_vertices(&verts);
        assert_eq!(b.center, Vec4::ZERO);
        assert_eq!(b.size, Vec4::new(2.0, 4.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_of_points_have_zero_w_extent() {
        let verts = [
            Vec4::new(-1.0, -2.0, 0.0, 1.0),
            Vec4::new(1.0, 0.5, 0.0, 1.0),
        ];
        let b = BoundingBox::from_vertices(&verts);
        assert_eq!(b.size.w, 0.0);
        assert_eq!(b.size.truncate(), glam::Vec3::new(2.0, 2.5, 0.0));
    }

    #[test]
    fn bounds_single_vertex_has_zero_size() {
        let b = BoundingBox::from_vertices(&[Vec4::new(5.0, -5.0, 0.0, 1.0)]);
        assert_eq!(b.size, Vec4::ZERO);
    }

    // ── index layout ──────────────────────────────────────────────────────

    #[test]
    fn edges_cast_to_flat_indices() {
        let edges = [Edge::new(2, 0), Edge::new(3, 1)];
        let flat: &[u32] = bytemuck::cast_slice(&edges);
        assert_eq!(flat, &[2, 0, 3, 1]);
    }

    #[test]
    fn faces_cast_to_flat_indices() {
        let faces = [Face::new(2, 3, 1), Face::new(2, 0, 1)];
        let flat: &[u32] = bytemuck::cast_slice(&faces);
        assert_eq!(flat, &[2, 3, 1, 2, 0, 1]);
    }
}
