use thiserror::Error;

/// Errors raised while building a mesh from custom parameters.
///
/// The shipped presets never fail; only hand-written [`SpiralParams`](crate::SpiralParams)
/// can be rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// The requested sample count would produce more vertices than a `u32`
    /// index can address.
    #[error("spiral detail {detail} exceeds the maximum of {max} samples")]
    DetailTooLarge { detail: u32, max: u32 },

    #[error("spiral parameter `{name}` must be finite (got {value})")]
    NonFinite { name: &'static str, value: f32 },
}
