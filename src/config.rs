//! Run parameters and their up-front validation.

use crate::error::{Axis, GridError, Result};
use crate::grid::ThreadGrid;

/// Validated `(N, P, Q, iterations)`.
///
/// Holding a `RunConfig` means the grid fits the matrix: every worker has a
/// non-empty tile and the phase loop runs at least once. The fields are
/// private so the only way to get one is through [`RunConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    n: usize,
    elements: usize,
    grid: ThreadGrid,
    iterations: usize,
}

impl RunConfig {
    /// # Errors
    ///
    /// - [`GridError::EmptyMatrix`] if `n == 0`
    /// - [`GridError::TooLarge`] if `n * n` overflows `usize`
    /// - [`GridError::EmptyGrid`] if `p == 0` or `q == 0`
    /// - [`GridError::GridExceedsMatrix`] if `p > n` or `q > n`
    /// - [`GridError::NoIterations`] if `iterations == 0`
    pub fn new(n: usize, p: usize, q: usize, iterations: usize) -> Result<Self> {
        if n == 0 {
            return Err(GridError::EmptyMatrix);
        }
        let elements = n.checked_mul(n).ok_or(GridError::TooLarge { n })?;
        if p == 0 || q == 0 {
            return Err(GridError::EmptyGrid { p, q });
        }
        if p > n {
            return Err(GridError::GridExceedsMatrix {
                axis: Axis::Rows,
                parts: p,
                n,
            });
        }
        if q > n {
            return Err(GridError::GridExceedsMatrix {
                axis: Axis::Cols,
                parts: q,
                n,
            });
        }
        if iterations == 0 {
            return Err(GridError::NoIterations);
        }

        Ok(Self {
            n,
            elements,
            grid: ThreadGrid::new(p, q),
            iterations,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn grid(&self) -> ThreadGrid {
        self.grid
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Elements per matrix, `N * N`.
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Checks that a caller buffer holds exactly `N * N` elements.
    pub fn check_buffer(&self, name: &'static str, buf: &[f64]) -> Result<()> {
        if buf.len() != self.elements() {
            return Err(GridError::BufferSize {
                name,
                expected: self.elements(),
                actual: buf.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid() {
        let cfg = RunConfig::new(10, 3, 4, 2).unwrap();
        assert_eq!(cfg.grid().workers(), 12);
        assert_eq!(cfg.elements(), 100);
    }

    #[test]
    fn test_grid_equal_to_n_is_fine() {
        assert!(RunConfig::new(4, 4, 4, 1).is_ok());
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(RunConfig::new(0, 1, 1, 1), Err(GridError::EmptyMatrix)));
        assert!(matches!(
            RunConfig::new(4, 0, 2, 1),
            Err(GridError::EmptyGrid { p: 0, q: 2 })
        ));
        assert!(matches!(
            RunConfig::new(4, 5, 1, 1),
            Err(GridError::GridExceedsMatrix {
                axis: Axis::Rows,
                parts: 5,
                n: 4
            })
        ));
        assert!(matches!(
            RunConfig::new(4, 1, 5, 1),
            Err(GridError::GridExceedsMatrix { axis: Axis::Cols, .. })
        ));
        assert!(matches!(RunConfig::new(4, 2, 2, 0), Err(GridError::NoIterations)));
    }

    #[test]
    fn test_rejects_overflowing_size() {
        let n = 1usize << (usize::BITS / 2);
        assert!(matches!(RunConfig::new(n, 1, 1, 1), Err(GridError::TooLarge { n: got }) if got == n));
        // largest n whose square still fits is accepted
        let fits = n - 1;
        assert_eq!(RunConfig::new(fits, 1, 1, 1).unwrap().elements(), fits * fits);
    }

    #[test]
    fn test_check_buffer() {
        let cfg = RunConfig::new(3, 1, 1, 1).unwrap();
        assert!(cfg.check_buffer("A", &[0.0; 9]).is_ok());
        assert!(matches!(
            cfg.check_buffer("C", &[0.0; 10]),
            Err(GridError::BufferSize {
                name: "C",
                expected: 9,
                actual: 10
            })
        ));
    }
}
