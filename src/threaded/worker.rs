//! Per-worker tile compute and copy-back.

use std::marker::PhantomData;
use std::ops::Range;
use std::ptr;

use crate::grid::Tile;

use super::phase::PhaseWork;

/// A caller buffer shared by every worker of a run.
///
/// Workers write through raw pointers because Rust can't express "each
/// thread has its own scattered rectangle of this slice". The tile
/// partition and the phase barriers together guarantee that no element is
/// written while anyone else reads or writes it.
#[derive(Clone, Copy)]
pub(crate) struct SharedBuf<'a> {
    ptr: *mut f64,
    len: usize,
    _borrow: PhantomData<&'a mut [f64]>,
}

// Access discipline is enforced by the phase protocol, not the type.
unsafe impl Send for SharedBuf<'_> {}
unsafe impl Sync for SharedBuf<'_> {}

impl<'a> SharedBuf<'a> {
    pub(crate) fn new(buf: &'a mut [f64]) -> Self {
        Self {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
            _borrow: PhantomData,
        }
    }

    /// # Safety
    ///
    /// No worker may write to the buffer while the returned slice is used.
    unsafe fn as_slice(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// # Safety
    ///
    /// `idx < len`, and no other worker reads or writes `idx` concurrently.
    unsafe fn write(&self, idx: usize, value: f64) {
        debug_assert!(idx < self.len);
        unsafe { self.ptr.add(idx).write(value) }
    }

    /// Copies rows `rows` of an `n`-wide matrix from `src` into `self`.
    ///
    /// # Safety
    ///
    /// Both buffers hold at least `rows.end * n` elements, and no other
    /// worker touches those rows of either buffer during the copy.
    unsafe fn copy_rows_from(&self, src: &SharedBuf<'_>, rows: Range<usize>, n: usize) {
        debug_assert!(rows.end * n <= self.len && rows.end * n <= src.len);
        unsafe {
            ptr::copy_nonoverlapping(
                src.ptr.add(rows.start * n),
                self.ptr.add(rows.start * n),
                rows.len() * n,
            );
        }
    }
}

/// `sum_k a[i][k] * b[k][j]` over ascending `k` with a fresh accumulator.
#[inline(always)]
fn dot(a_row: &[f64], b: &[f64], j: usize, n: usize) -> f64 {
    let mut sum = 0.0;
    for (k, &a_ik) in a_row.iter().enumerate() {
        sum += a_ik * b[k * n + j];
    }
    sum
}

/// Produces every `(index, value)` of one tile of C = A * B.
///
/// Only the reduction-free output is split: every element reads a whole
/// row of A and a whole column of B. `store` receives the flat index
/// `i * n + j` of each element of the tile and nothing else.
#[inline(always)]
fn tile_values(a: &[f64], b: &[f64], n: usize, tile: &Tile, mut store: impl FnMut(usize, f64)) {
    for i in tile.rows.clone() {
        let a_row = &a[i * n..(i + 1) * n];
        for j in tile.cols.clone() {
            store(i * n + j, dot(a_row, b, j, n));
        }
    }
}

/// Computes one tile of C = A * B into a full-size `c`.
///
/// Same kernel the grid workers run. Elements of `c` outside the tile are
/// left untouched.
pub fn compute_tile(a: &[f64], b: &[f64], c: &mut [f64], n: usize, tile: &Tile) {
    tile_values(a, b, n, tile, |idx, value| c[idx] = value);
}

/// One member of the worker grid.
///
/// Holds its tile for the compute step and its flat row range for the
/// copy-back step. Both are fixed for the whole run.
pub(crate) struct Worker<'a> {
    tile: Tile,
    copy_rows: Range<usize>,
    n: usize,
    a: SharedBuf<'a>,
    b: &'a [f64],
    c: SharedBuf<'a>,
}

impl<'a> Worker<'a> {
    pub(crate) fn new(
        tile: Tile,
        copy_rows: Range<usize>,
        n: usize,
        a: SharedBuf<'a>,
        b: &'a [f64],
        c: SharedBuf<'a>,
    ) -> Self {
        Self {
            tile,
            copy_rows,
            n,
            a,
            b,
            c,
        }
    }
}

impl PhaseWork for Worker<'_> {
    fn compute(&mut self, _phase: usize) {
        // SAFETY: during compute nobody writes A, and each C element belongs
        // to exactly one tile.
        let a = unsafe { self.a.as_slice() };
        let c = self.c;
        tile_values(a, self.b, self.n, &self.tile, |idx, value| unsafe {
            c.write(idx, value)
        });
    }

    fn copy_back(&mut self, _phase: usize) {
        // SAFETY: C is complete after the first barrier and the flat row
        // split gives every row of A to exactly one worker.
        unsafe { self.a.copy_rows_from(&self.c, self.copy_rows.clone(), self.n) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ThreadGrid, flat_rows};
    use crate::matrix::naive_ijk::matmul_naive_ijk;

    fn sample(n: usize, modulo: usize) -> Vec<f64> {
        (0..n * n).map(|i| (i % modulo) as f64 - 3.0).collect()
    }

    #[test]
    fn test_compute_tile_touches_only_its_tile() {
        let n = 5;
        let a = sample(n, 7);
        let b = sample(n, 11);
        let tile = ThreadGrid::new(2, 2).tile(3, n);
        let mut c = vec![f64::NAN; n * n];

        compute_tile(&a, &b, &mut c, n, &tile);

        let mut expected = vec![0.0; n * n];
        matmul_naive_ijk(&a, &b, &mut expected, n);
        for i in 0..n {
            for j in 0..n {
                let got = c[i * n + j];
                if tile.contains(i, j) {
                    assert_eq!(got.to_bits(), expected[i * n + j].to_bits());
                } else {
                    assert!(got.is_nan(), "({}, {}) written outside tile", i, j);
                }
            }
        }
    }

    #[test]
    fn test_all_tiles_rebuild_full_product() {
        let n = 9;
        let a = sample(n, 13);
        let b = sample(n, 5);
        let mut c = vec![0.0; n * n];
        for tile in ThreadGrid::new(2, 4).tiles(n) {
            compute_tile(&a, &b, &mut c, n, &tile);
        }

        let mut expected = vec![0.0; n * n];
        matmul_naive_ijk(&a, &b, &mut expected, n);
        assert_eq!(c, expected);
    }

    #[test]
    fn test_worker_compute_writes_only_its_tile() {
        let n = 7;
        let mut a = sample(n, 7);
        let b = sample(n, 11);
        let mut expected = vec![0.0; n * n];
        matmul_naive_ijk(&a, &b, &mut expected, n);

        let grid = ThreadGrid::new(3, 2);
        let tile = grid.tile(3, n);
        let mut c = vec![f64::NAN; n * n];
        {
            let a_buf = SharedBuf::new(&mut a);
            let c_buf = SharedBuf::new(&mut c);
            let mut worker = Worker::new(tile.clone(), 0..0, n, a_buf, &b, c_buf);
            worker.compute(0);
        }

        for i in 0..n {
            for j in 0..n {
                let got = c[i * n + j];
                if tile.contains(i, j) {
                    assert_eq!(got.to_bits(), expected[i * n + j].to_bits());
                } else {
                    assert!(got.is_nan(), "({}, {}) written outside tile", i, j);
                }
            }
        }
    }

    #[test]
    fn test_worker_phase_sequential() {
        // Drives every worker of a 2x2 grid by hand on one thread.
        let n = 4;
        let mut a = sample(n, 7);
        let b = sample(n, 3);
        let mut c = vec![0.0; n * n];

        let mut expected = vec![0.0; n * n];
        matmul_naive_ijk(&a, &b, &mut expected, n);

        let grid = ThreadGrid::new(2, 2);
        {
            let a_buf = SharedBuf::new(&mut a);
            let c_buf = SharedBuf::new(&mut c);
            let mut workers: Vec<_> = (0..grid.workers())
                .map(|tid| {
                    Worker::new(
                        grid.tile(tid, n),
                        flat_rows(tid, grid.workers(), n),
                        n,
                        a_buf,
                        &b,
                        c_buf,
                    )
                })
                .collect();

            for w in &mut workers {
                w.compute(0);
            }
            for w in &mut workers {
                w.copy_back(0);
            }
        }

        assert_eq!(c, expected);
        assert_eq!(a, expected);
    }
}
