use glam::{Mat4, Vec3, Vec4};

/// Share of clip space (per axis, `[-1, 1]`) the mesh's larger extent covers.
pub const FILL: f32 = 0.9;

/// Radians per second of viewer rotation.
pub const SPIN_RATE: f32 = 0.15;

/// Maps a mesh with the given extent around `center` into clip space.
///
/// The mesh is centered, scaled so its larger side spans `2 * FILL`, rotated
/// about Z by `angle`, and finally squeezed along the longer viewport axis so
/// it keeps its proportions on a non-square surface.
pub fn fit_transform(dimensions: Vec4, center: Vec4, aspect: f32, angle: f32) -> Mat4 {
    let extent = dimensions.x.max(dimensions.y);
    let scale = if extent > 0.0 && extent.is_finite() {
        2.0 * FILL / extent
    } else {
        1.0
    };

    aspect_correction(aspect)
        * Mat4::from_rotation_z(angle)
        * Mat4::from_scale(Vec3::new(scale, scale, 1.0))
        * Mat4::from_translation(-center.truncate())
}

fn aspect_correction(aspect: f32) -> Mat4 {
    let (sx, sy) = if !(aspect > 0.0 && aspect.is_finite()) {
        (1.0, 1.0)
    } else if aspect >= 1.0 {
        (1.0 / aspect, 1.0)
    } else {
        (1.0, aspect)
    };
    Mat4::from_scale(Vec3::new(sx, sy, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiral_mesh::affine::point;
    use spiral_mesh::{Mesh, SpiralMesh, SpiralPreset};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn square_viewport_fits_extent() {
        let m = fit_transform(Vec4::new(4.0, 2.0, 0.0, 0.0), Vec4::ZERO, 1.0, 0.0);
        let p = m * point(2.0, 1.0);
        assert!(approx(p.x, FILL));
        assert!(approx(p.y, FILL / 2.0));
        assert!(approx(p.w, 1.0));
    }

    #[test]
    fn center_maps_to_origin() {
        let c = Vec4::new(3.0, -1.0, 0.0, 0.0);
        let m = fit_transform(Vec4::new(2.0, 2.0, 0.0, 0.0), c, 1.7, 0.8);
        let p = m * point(3.0, -1.0);
        assert!(approx(p.x, 0.0) && approx(p.y, 0.0));
    }

    #[test]
    fn wide_viewport_squeezes_x() {
        let m = fit_transform(Vec4::new(2.0, 2.0, 0.0, 0.0), Vec4::ZERO, 2.0, 0.0);
        let p = m * point(1.0, 1.0);
        assert!(approx(p.x, FILL / 2.0));
        assert!(approx(p.y, FILL));
    }

    #[test]
    fn tall_viewport_squeezes_y() {
        let m = fit_transform(Vec4::new(2.0, 2.0, 0.0, 0.0), Vec4::ZERO, 0.5, 0.0);
        let p = m * point(1.0, 1.0);
        assert!(approx(p.x, FILL));
        assert!(approx(p.y, FILL / 2.0));
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        let m = fit_transform(Vec4::ZERO, Vec4::ZERO, 0.0, 0.0);
        assert!(m.is_finite());
        let m = fit_transform(Vec4::ZERO, Vec4::ZERO, f32::NAN, 0.0);
        assert!(m.is_finite());
    }

    #[test]
    fn spiral_lands_inside_clip_space() {
        let mesh = SpiralMesh::with_preset(SpiralPreset::Wide);
        let m = fit_transform(mesh.dimensions(), mesh.center(), 16.0 / 9.0, 1.3);
        for v in mesh.vertices() {
            let p = m * *v;
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "vertex {v} maps to {p}");
        }
    }
}
