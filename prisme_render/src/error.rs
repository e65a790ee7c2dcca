use thiserror::Error;

use super::Float;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("canvas size must be positive and finite, got {width} x {height}")]
    InvalidSize { width: Float, height: Float },

    #[error("failed to write the document: {0}")]
    Io(#[from] std::io::Error),
}
