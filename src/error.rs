//! Error types for grid runs.

use thiserror::Error;

/// Result type for gridmul operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Which side of the thread grid a [`GridError::GridExceedsMatrix`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Cols => f.write_str("columns"),
        }
    }
}

/// Everything that can be rejected before workers are spawned, plus the
/// I/O failures of the persistence helpers.
///
/// Nothing inside the phase loop produces one of these. A worker that
/// panics there leaves the rest blocked at the next barrier, and the run
/// never returns.
#[derive(Debug, Error)]
pub enum GridError {
    /// Matrix dimension is zero
    #[error("matrix dimension must be at least 1")]
    EmptyMatrix,

    /// `N * N` does not fit in `usize`
    #[error("matrix dimension {n} is too large to allocate {n}x{n} elements")]
    TooLarge { n: usize },

    /// One of the grid sides is zero
    #[error("thread grid must be at least 1x1, got {p}x{q}")]
    EmptyGrid { p: usize, q: usize },

    /// More grid parts than matrix rows/columns; some tiles would be empty
    #[error("{parts} grid parts along {axis} exceed matrix size {n}")]
    GridExceedsMatrix { axis: Axis, parts: usize, n: usize },

    /// Zero phases requested
    #[error("iterations must be at least 1")]
    NoIterations,

    /// Caller buffer does not hold N*N elements
    #[error("{name}: expected {expected} elements, got {actual}")]
    BufferSize {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Matrix operands of different sizes
    #[error("shape mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    Shape { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparseable token in a matrix file
    #[error("line {line}: cannot parse {token:?} as a number")]
    Parse { line: usize, token: String },
}
