use thiserror::Error;

pub type Result<T> = std::result::Result<T, MosaicError>;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("grid mask has no cells")]
    EmptyMask,

    #[error("mask row {row} has {found} columns, expected {expected}")]
    RaggedMask {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownCellKind { row: usize, col: usize, symbol: char },

    #[error("decoration density must be within 0..=1, got {0}")]
    InvalidDensity(f64),

    #[error("texture scale factor must be finite and positive, got {0}")]
    InvalidTextureScale(f64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
