/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// The solid renderer writes these four floats verbatim into the `color`
/// uniform; no premultiplication or gamma conversion happens on the way.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_is_rgba() {
        assert_eq!(Color::new(0.1, 0.2, 0.3, 0.4).to_array(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn converts_to_wgpu_clear_color() {
        let w: wgpu::Color = Color::new(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!((w.r, w.g, w.b, w.a), (0.25, 0.5, 0.75, 1.0));
    }
}
