use thiserror::Error;

/// Top-level error type for the geokern geometry kernel.
#[derive(Debug, Error)]
pub enum GeokernError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    GeoJson(#[from] GeoJsonError),
}

/// Errors related to geometric construction.
///
/// Arithmetic degeneracies (parallel lines, zero-length spans) are reported
/// as `None` by the operations themselves; these errors cover structural
/// misuse of the API.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("need at least {needed} points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("expected a flat array of {expected} numbers, got {got}")]
    InvalidArrayLength { expected: usize, got: usize },

    #[error("zero-length vector")]
    ZeroVector,

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Errors related to the GeoJSON adapter.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("failed to parse GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`GeokernError`].
pub type Result<T> = std::result::Result<T, GeokernError>;
