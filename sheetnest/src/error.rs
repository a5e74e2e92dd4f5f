use thiserror::Error;

/// Result type alias for operations that validate their input up front.
pub type Result<T> = std::result::Result<T, PackingError>;

/// Configuration errors, detected before any scanning starts.
/// Per-item failures are never reported through this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    /// Surface extent is zero, negative or not finite.
    #[error("invalid surface extent: {width} x {height}")]
    InvalidSurface { width: f64, height: f64 },

    /// Bitmap dimensions do not match the length of the cell array.
    #[error("mask of {width} x {height} cells expects {expected} values, got {actual}")]
    MaskLengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Physical extent of the mask cannot be mapped onto its cells.
    #[error("invalid physical-to-cell scale: {0}")]
    InvalidScale(String),

    /// Run options contradict each other (e.g. minimum size above maximum size).
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Not a single part can fit on the surface.
    #[error("none of the {n_parts} parts fit on the surface")]
    NoFittableParts { n_parts: usize },
}
