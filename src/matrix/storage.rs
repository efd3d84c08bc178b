//! Flat, contiguous N×N storage.

use std::ops::{Index, IndexMut};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{GridError, Result};

/// Square matrix of `f64` in one contiguous row-major buffer.
///
/// Element `(i, j)` lives at offset `i * n + j`. The grid runs work on the
/// raw slices (see [`Matrix::as_slice`]), so a `Matrix` is just a sized
/// owner for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All elements set to `value`.
    pub fn filled(n: usize, value: f64) -> Self {
        Self {
            n,
            data: vec![value; n * n],
        }
    }

    pub fn zeros(n: usize) -> Self {
        Self::filled(n, 0.0)
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`GridError::BufferSize`] if `data.len() != n * n`, and
    /// [`GridError::TooLarge`] if `n * n` overflows.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self> {
        let expected = n.checked_mul(n).ok_or(GridError::TooLarge { n })?;
        if data.len() != expected {
            return Err(GridError::BufferSize {
                name: "matrix",
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { n, data })
    }

    /// Builds from nested rows, e.g. `[[1.0, 2.0], [3.0, 4.0]]`.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n {
                return Err(GridError::Shape {
                    expected: n,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n, data })
    }

    /// Uniform values in `[0, 1)` from a seeded generator, so the same seed
    /// always gives the same matrix.
    pub fn random(n: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..n * n).map(|_| rng.r#gen::<f64>()).collect();
        Self { n, data }
    }

    /// Matrix dimension N.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and an empty matrix has no rows anyway
        self.data.chunks_exact(self.n.max(1))
    }

    /// Bitwise equality, so `-0.0 != 0.0` and identical NaNs compare equal.
    pub fn bit_eq(&self, other: &Matrix) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(x, y)| x.to_bits() == y.to_bits())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.n + j]
    }
}
