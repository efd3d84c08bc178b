//! Plain-text matrix files.
//!
//! One row per line, each element written as ` {:.6} `. Reading accepts
//! any whitespace-separated numbers as long as there are exactly `n * n`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{GridError, Result};
use crate::matrix::Matrix;

/// Writes `m` in the text layout above.
pub fn write_matrix<W: Write>(mut out: W, m: &Matrix) -> Result<()> {
    for row in m.rows() {
        for x in row {
            write!(out, " {:.6} ", x)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads an `n × n` matrix.
///
/// # Errors
///
/// [`GridError::Parse`] on a token that isn't a number, and
/// [`GridError::BufferSize`] if the element count isn't `n * n`.
pub fn read_matrix<R: Read>(input: R, n: usize) -> Result<Matrix> {
    let mut data = Vec::new();
    for (line_no, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| GridError::Parse {
                line: line_no + 1,
                token: token.to_string(),
            })?;
            data.push(value);
        }
    }
    Matrix::from_vec(n, data)
}

/// Output file name for a run: `<prefix>.<n>.<iterations>.<workers>.txt`.
pub fn output_path(prefix: &Path, n: usize, iterations: usize, workers: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!(".{}.{}.{}.txt", n, iterations, workers));
    PathBuf::from(name)
}

pub fn save(path: &Path, m: &Matrix) -> Result<()> {
    write_matrix(BufWriter::new(File::create(path)?), m)?;
    info!(path = %path.display(), "matrix written");
    Ok(())
}

pub fn load(path: &Path, n: usize) -> Result<Matrix> {
    read_matrix(File::open(path)?, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_layout() {
        let m = Matrix::from_rows(&[[1.0, 2.5], [-3.0, 0.125]]).unwrap();
        let mut out = Vec::new();
        write_matrix(&mut out, &m).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " 1.000000  2.500000 \n -3.000000  0.125000 \n"
        );
    }

    #[test]
    fn test_read_back() {
        let m = Matrix::from_rows(&[[1.0, 2.5], [-3.0, 0.125]]).unwrap();
        let mut out = Vec::new();
        write_matrix(&mut out, &m).unwrap();
        assert_eq!(read_matrix(out.as_slice(), 2).unwrap(), m);
    }

    #[test]
    fn test_read_rejects_garbage() {
        let err = read_matrix("1 2\n3 x\n".as_bytes(), 2).unwrap_err();
        match err {
            GridError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_short_input() {
        assert!(matches!(
            read_matrix("1 2 3".as_bytes(), 2),
            Err(GridError::BufferSize {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("gridmul-persist-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = output_path(&dir.join("C"), 3, 2, 4);

        let m = Matrix::random(3, 42);
        save(&path, &m).unwrap();
        let back = load(&path, 3).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        for (x, y) in m.as_slice().iter().zip(back.as_slice()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/tmp/out/C"), 100, 5, 8);
        assert_eq!(path, PathBuf::from("/tmp/out/C.100.5.8.txt"));
    }
}
