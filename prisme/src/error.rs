use thiserror::Error;

use super::Float;

/// Invalid parameters handed to a shape constructor, or to [`RayParams`](crate::RayParams).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(Float),

    #[error("size must be non-negative and finite, got {width} x {height}")]
    InvalidSize { width: Float, height: Float },

    #[error("coordinates must be finite")]
    NonFinite,

    #[error("direction must not be zero")]
    ZeroDirection,

    #[error("epsilon must be non-negative and finite, got {0}")]
    InvalidEpsilon(Float),
}
