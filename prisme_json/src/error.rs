use thiserror::Error;

use prisme::GeometryError;

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("`{field}` must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown {kind} type: `{name}`")]
    UnknownType { kind: &'static str, name: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

impl JsonError {
    #[inline]
    #[must_use]
    pub fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::Invalid { field, expected }
    }
}
