/// Naive square matrix multiplication using i-j-k loop order: C = A * B
///
/// This is the textbook triple loop. Each output element gets its own
/// scalar accumulator and the `k` reduction always runs in ascending order,
/// which is exactly what every grid worker does for its tile. The grid runs
/// are therefore bit-identical to this function, not just close.
///
/// C is overwritten, not accumulated into.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, overwritten with A * B
/// * `n` - Matrix dimension
pub fn matmul_naive_ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// Applies [`matmul_naive_ijk`] `iterations` times, feeding each product
/// back in as the new A.
///
/// Sequential model of a full grid run: on return `a` and `c` both hold
/// A·B^iterations.
pub fn matmul_naive_repeated(a: &mut [f64], b: &[f64], c: &mut [f64], n: usize, iterations: usize) {
    for _ in 0..iterations {
        matmul_naive_ijk(a, b, c, n);
        a.copy_from_slice(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2_known_product() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let mut c = [0.0; 4];
        matmul_naive_ijk(&a, &b, &mut c, 2);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_overwrites_stale_output() {
        let a = [1.0, 0.0, 0.0, 1.0];
        let b = [3.0, 1.0, 4.0, 1.0];
        let mut c = [99.0; 4];
        matmul_naive_ijk(&a, &b, &mut c, 2);
        assert_eq!(c, b);
    }

    #[test]
    fn test_repeated_doubling() {
        let mut a = [1.0, 0.0, 0.0, 1.0];
        let b = [2.0, 0.0, 0.0, 2.0];
        let mut c = [0.0; 4];
        matmul_naive_repeated(&mut a, &b, &mut c, 2, 3);
        assert_eq!(a, [8.0, 0.0, 0.0, 8.0]);
        assert_eq!(a, c);
    }
}
