//! The persistent worker grid.
//!
//! `P × Q` scoped threads are spawned once per run. Each one keeps its
//! tile for every phase and meets the others at two barriers per phase:
//!
//! - `worker`: tile compute and copy-back
//! - `phase`: the per-worker state machine driving both barriers
//! - `barrier`: the rendezvous abstraction and cancellation flag

pub mod barrier;
pub mod phase;
pub mod worker;

use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{GridError, Result};
use crate::grid::flat_rows;
use crate::matrix::Matrix;

use barrier::CancelToken;
use phase::PhaseController;
use worker::{SharedBuf, Worker};

/// Outcome of [`run_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Wall-clock time of the whole phase loop, thread spawn and join included.
    pub elapsed: Duration,
    pub phases_completed: usize,
    pub cancelled: bool,
}

/// Applies `A <- A * B` `iterations` times on a `p × q` worker grid.
///
/// All three buffers are `n × n` row-major. On return A and C both hold
/// A·B^iterations and B is unchanged. Returns the elapsed time of the
/// phase loop.
///
/// The result is bit-identical to
/// [`matmul_naive_repeated`](crate::matrix::naive_ijk::matmul_naive_repeated)
/// for any grid shape.
///
/// # Errors
///
/// Rejects the configuration (see [`RunConfig::new`]) or a wrongly sized
/// buffer before any thread is spawned.
pub fn run(
    a: &mut [f64],
    b: &[f64],
    c: &mut [f64],
    n: usize,
    p: usize,
    q: usize,
    iterations: usize,
) -> Result<Duration> {
    let config = RunConfig::new(n, p, q, iterations)?;
    run_with(a, b, c, &config, &CancelToken::new()).map(|report| report.elapsed)
}

/// Same as [`run`], with a pre-validated config and a cancel token.
///
/// Cancelling stops the run at the end of the phase in progress; A then
/// holds the result of [`RunReport::phases_completed`] phases.
pub fn run_with(
    a: &mut [f64],
    b: &[f64],
    c: &mut [f64],
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<RunReport> {
    config.check_buffer("A", a)?;
    config.check_buffer("B", b)?;
    config.check_buffer("C", c)?;

    let n = config.n();
    let grid = config.grid();
    let workers = grid.workers();

    info!(
        n,
        p = grid.p,
        q = grid.q,
        iterations = config.iterations(),
        "starting grid run"
    );

    let controller = PhaseController::new(Barrier::new(workers), config.iterations(), cancel.clone());
    let a_buf = SharedBuf::new(a);
    let c_buf = SharedBuf::new(c);

    let start = Instant::now();
    thread::scope(|s| {
        for tid in 0..workers {
            let tile = grid.tile(tid, n);
            let copy_rows = flat_rows(tid, workers, n);
            let controller = &controller;

            s.spawn(move || {
                debug!(
                    tid,
                    p = tile.p,
                    q = tile.q,
                    rows = ?tile.rows,
                    cols = ?tile.cols,
                    copy_rows = ?copy_rows,
                    "worker tile"
                );
                let mut worker = Worker::new(tile, copy_rows, n, a_buf, b, c_buf);
                controller.drive(&mut worker);
            });
        }
    });
    let elapsed = start.elapsed();

    let report = RunReport {
        elapsed,
        phases_completed: controller.completed(),
        cancelled: controller.halted(),
    };
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        phases = report.phases_completed,
        cancelled = report.cancelled,
        "grid run finished"
    );

    Ok(report)
}

/// [`run`] over [`Matrix`] operands.
///
/// # Errors
///
/// [`GridError::Shape`] if B or C differs in size from A, otherwise as [`run`].
pub fn run_matrices(
    a: &mut Matrix,
    b: &Matrix,
    c: &mut Matrix,
    p: usize,
    q: usize,
    iterations: usize,
) -> Result<Duration> {
    let n = a.n();
    for other in [b.n(), c.n()] {
        if other != n {
            return Err(GridError::Shape {
                expected: n,
                actual: other,
            });
        }
    }
    run(a.as_mut_slice(), b.as_slice(), c.as_mut_slice(), n, p, q, iterations)
}
