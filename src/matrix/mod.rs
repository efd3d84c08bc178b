//! Matrix storage and the sequential baseline.
//!
//! `storage` holds the flat row-major buffer the grid runs operate on.
//! `naive_ijk` is the single-threaded reference every parallel result is
//! checked against.

pub mod naive_ijk;
pub mod storage;

pub use storage::Matrix;
