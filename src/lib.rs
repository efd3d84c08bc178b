//! Dense matrix multiplication on a hand-built 2-D worker grid.
//!
//! Rather than hand rows to a scheduler, a run spawns `P × Q` threads
//! once and gives each a fixed rectangle of the output. The run then
//! repeats `A <- A * B` for a number of phases. Each phase is compute,
//! barrier, copy C back into A, barrier. The barriers are the only
//! synchronization; tile disjointness does the rest.
//!
//! ## Usage
//!
//! ```
//! use gridmul::run;
//!
//! let n = 64;
//! let mut a = vec![1.0f64; n * n];
//! let b = vec![2.0f64; n * n];
//! let mut c = vec![0.0f64; n * n];
//!
//! // 2×4 grid, 3 phases: A becomes A·B·B·B
//! let elapsed = run(&mut a, &b, &mut c, n, 2, 4, 3).unwrap();
//! assert_eq!(a, c);
//! # let _ = elapsed;
//! ```
//!
//! Results are bit-identical to the sequential triple loop for every grid
//! shape, because each output element is still summed in ascending `k`
//! by a single thread.
//!
//! ## What's inside
//!
//! - `grid`: thread id → tile mapping, pure and testable on its own
//! - `threaded`: the persistent worker grid and its phase state machine
//! - `matrix`: row-major storage and the sequential reference
//! - `persist`: text matrix files for the command-line runner

pub mod config;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod persist;
pub mod threaded;

pub use config::RunConfig;
pub use error::{GridError, Result};
pub use grid::{ThreadGrid, Tile, plan};
pub use matrix::Matrix;
pub use matrix::naive_ijk::{matmul_naive_ijk, matmul_naive_repeated};
pub use threaded::barrier::CancelToken;
pub use threaded::{RunReport, run, run_matrices, run_with};
