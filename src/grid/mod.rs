//! Thread-to-tile decomposition.
//!
//! A run uses `P × Q` workers laid out as a logical grid. Worker `tid`
//! sits at `(p, q) = (tid / Q, tid % Q)` and owns the output rows of grid
//! row `p` and the output columns of grid column `q`. Rows are split in
//! blocks of `N / P`; the last grid row takes the `N % P` leftover rows.
//! Columns are split the same way with `Q`.
//!
//! ```text
//!            q = 0      q = 1      q = Q-1 (+N%Q cols)
//!          +----------+----------+--------------+
//!  p = 0   |  tid 0   |  tid 1   |   tid Q-1    |
//!          +----------+----------+--------------+
//!  p = 1   |  tid Q   |  tid Q+1 |   ...        |
//!          +----------+----------+--------------+
//!  p = P-1 |          |          |   tid PQ-1   |
//!  (+N%P)  +----------+----------+--------------+
//! ```
//!
//! Everything here is a pure function of `(tid, P, Q, N)`, so coverage and
//! disjointness can be tested without spawning a thread.

use std::ops::Range;

/// Logical `P × Q` arrangement of workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadGrid {
    pub p: usize,
    pub q: usize,
}

impl ThreadGrid {
    pub fn new(p: usize, q: usize) -> Self {
        Self { p, q }
    }

    /// Number of workers, `P * Q`.
    pub fn workers(&self) -> usize {
        self.p * self.q
    }

    /// Grid coordinates of worker `tid`.
    pub fn coords(&self, tid: usize) -> (usize, usize) {
        (tid / self.q, tid % self.q)
    }

    /// Tile of worker `tid` for an `n × n` output.
    pub fn tile(&self, tid: usize, n: usize) -> Tile {
        plan(tid, self.p, self.q, n)
    }

    /// Tiles of every worker, indexed by `tid`.
    pub fn tiles(&self, n: usize) -> Vec<Tile> {
        (0..self.workers()).map(|tid| self.tile(tid, n)).collect()
    }
}

/// Rectangular block of C owned by a single worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub tid: usize,
    pub p: usize,
    pub q: usize,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Tile {
    /// Number of output elements in the tile.
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.rows.contains(&i) && self.cols.contains(&j)
    }
}

/// Computes the tile owned by worker `tid` of a `p × q` grid over an `n × n`
/// matrix.
///
/// Preconditions: `tid < p * q`, `p >= 1`, `q >= 1`, `n >= 1`. With `p > n`
/// (or `q > n`) every block but the last is empty; [`crate::RunConfig`]
/// rejects that before a run starts.
///
/// The remainder goes to the worker whose *grid coordinate* is last
/// (`p == P-1` for rows, `q == Q-1` for columns), so every grid row gets
/// the same column split.
pub fn plan(tid: usize, p: usize, q: usize, n: usize) -> Tile {
    let (gp, gq) = (tid / q, tid % q);
    Tile {
        tid,
        p: gp,
        q: gq,
        rows: block(gp, p, n),
        cols: block(gq, q, n),
    }
}

/// `index`-th of `parts` contiguous blocks of `0..n`, last block absorbing
/// `n % parts`.
fn block(index: usize, parts: usize, n: usize) -> Range<usize> {
    let per = n / parts;
    let start = index * per;
    let end = if index == parts - 1 { n } else { start + per };
    start..end
}

/// Rows of the full matrix that worker `tid` copies from C back into A.
///
/// This split ignores the tile layout: the `n` rows are dealt out flat over
/// all `workers`, the first `n % workers` workers taking one extra row.
/// Workers past the end of the matrix get an empty range.
pub fn flat_rows(tid: usize, workers: usize, n: usize) -> Range<usize> {
    let per = n / workers;
    let extra = n % workers;
    let start = tid * per + tid.min(extra);
    let len = per + usize::from(tid < extra);
    start..start + len
}
