//! Homogeneous 2D helpers.
//!
//! Positions live in `Vec4` with `z = 0`. The `w` component separates points
//! (`w = 1`, affected by translation) from vectors (`w = 0`).

use glam::Vec4;

/// Whether a homogeneous coordinate is a position or a direction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Kind {
    Point,
    Vector,
}

impl Kind {
    #[inline]
    pub const fn w(self) -> f32 {
        match self {
            Kind::Point => 1.0,
            Kind::Vector => 0.0,
        }
    }
}

/// Position `(x, y, 0, 1)`.
#[inline]
pub const fn point(x: f32, y: f32) -> Vec4 {
    Vec4::new(x, y, 0.0, 1.0)
}

/// Direction `(x, y, 0, 0)`.
#[inline]
pub const fn vector(x: f32, y: f32) -> Vec4 {
    Vec4::new(x, y, 0.0, 0.0)
}

/// Converts polar `(radius, theta)` to a homogeneous Cartesian coordinate.
#[inline]
pub fn polar_to_cartesian(radius: f32, theta: f32, kind: Kind) -> Vec4 {
    Vec4::new(radius * theta.cos(), radius * theta.sin(), 0.0, kind.w())
}

/// Quadratic ease-in: slow near 0, accelerating toward 1.
#[inline]
pub fn ease(t: f32) -> f32 {
    t * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-6;

    #[test]
    fn point_and_vector_differ_only_in_w() {
        assert_eq!(point(1.0, 2.0), Vec4::new(1.0, 2.0, 0.0, 1.0));
        assert_eq!(vector(1.0, 2.0), Vec4::new(1.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn polar_zero_radius_is_origin() {
        let p = polar_to_cartesian(0.0, 1.234, Kind::Point);
        assert_eq!(p, point(0.0, 0.0));
    }

    #[test]
    fn polar_quarter_turn() {
        let p = polar_to_cartesian(2.0, FRAC_PI_2, Kind::Point);
        assert!(p.x.abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert_eq!(p.w, 1.0);
    }

    #[test]
    fn polar_vector_kind_has_zero_w() {
        let v = polar_to_cartesian(1.0, PI, Kind::Vector);
        assert!((v.x + 1.0).abs() < EPS);
        assert_eq!(v.w, 0.0);
    }

    #[test]
    fn ease_is_quadratic() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(0.5), 0.25);
        assert_eq!(ease(1.0), 1.0);
    }
}
