//! Dense square matrices and Cholesky solving
//!
//! Only what the rating system needs: a row-major square matrix, an
//! LLᵗ factorization without pivoting, and forward/back substitution.

use crate::error::{RatingError, RatingResult};

/// Square matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `size` x `size` matrix of zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Build a matrix from rows, all of which must have `rows.len()` entries
    pub fn from_rows(rows: &[Vec<f64>]) -> RatingResult<Self> {
        let size = rows.len();
        let mut matrix = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(RatingError::DimensionMismatch {
                    expected: size,
                    actual: row.len(),
                });
            }
            matrix.data[i * size..(i + 1) * size].copy_from_slice(row);
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] = value;
    }

    /// Add `value` to the entry at `(row, col)`
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] += value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Matrix-vector product
    pub fn mul_vec(&self, v: &[f64]) -> RatingResult<Vec<f64>> {
        if v.len() != self.size {
            return Err(RatingError::DimensionMismatch {
                expected: self.size,
                actual: v.len(),
            });
        }

        Ok((0..self.size)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }
}

/// Lower-triangular factor `L` of a symmetric positive-definite matrix, `L·Lᵗ = A`
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
    lower: Matrix,
}

impl CholeskyFactor {
    /// Factor `matrix`, failing on any zero or negative pivot
    pub fn factor(matrix: &Matrix) -> RatingResult<Self> {
        Self::factor_with_min_pivot(matrix, 0.0)
    }

    /// Factor `matrix`, failing when a squared pivot is not above `min_pivot`.
    ///
    /// With `min_pivot == 0.0` only exactly singular or indefinite input is
    /// rejected; near-singular systems factor and may solve to unstable values.
    pub fn factor_with_min_pivot(matrix: &Matrix, min_pivot: f64) -> RatingResult<Self> {
        let n = matrix.size();
        let mut lower = Matrix::zeros(n);

        for i in 0..n {
            for j in 0..=i {
                let dot: f64 = (0..j).map(|k| lower.get(i, k) * lower.get(j, k)).sum();
                let value = matrix.get(i, j) - dot;

                if i == j {
                    // Negated comparison so NaN is rejected as well
                    if !(value > min_pivot) {
                        return Err(RatingError::NotPositiveDefinite {
                            index: i,
                            pivot: value,
                        });
                    }
                    lower.set(i, i, value.sqrt());
                } else {
                    // lower[j][j] > 0 was checked when row j was factored
                    lower.set(i, j, value / lower.get(j, j));
                }
            }
        }

        Ok(Self { lower })
    }

    /// The lower-triangular factor
    pub fn lower(&self) -> &Matrix {
        &self.lower
    }

    pub fn size(&self) -> usize {
        self.lower.size()
    }

    /// Solve `A·x = b` for the factored `A`
    pub fn solve(&self, b: &[f64]) -> RatingResult<Vec<f64>> {
        if b.len() != self.size() {
            return Err(RatingError::DimensionMismatch {
                expected: self.size(),
                actual: b.len(),
            });
        }

        let y = self.forward_substitute(b);
        Ok(self.back_substitute(&y))
    }

    /// Solve `L·y = b`
    fn forward_substitute(&self, b: &[f64]) -> Vec<f64> {
        let l = &self.lower;
        let mut y = b.to_vec();
        for i in 0..l.size() {
            let dot: f64 = (0..i).map(|j| l.get(i, j) * y[j]).sum();
            y[i] = (y[i] - dot) / l.get(i, i);
        }
        y
    }

    /// Solve `Lᵗ·x = y`, reading the transpose in place
    fn back_substitute(&self, y: &[f64]) -> Vec<f64> {
        let l = &self.lower;
        let n = l.size();
        let mut x = y.to_vec();
        for i in (0..n).rev() {
            let dot: f64 = (i + 1..n).map(|j| l.get(j, i) * x[j]).sum();
            x[i] = (x[i] - dot) / l.get(i, i);
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{} != {}", a, e);
        }
    }

    #[test]
    fn test_factor_known_matrix() {
        // Classic example with an integer factor
        let a = Matrix::from_rows(&[
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ])
        .unwrap();

        let factor = CholeskyFactor::factor(&a).unwrap();
        let l = factor.lower();

        assert_close(l.row(0), &[2.0, 0.0, 0.0]);
        assert_close(l.row(1), &[6.0, 1.0, 0.0]);
        assert_close(l.row(2), &[-8.0, 5.0, 3.0]);
    }

    #[test]
    fn test_factor_reconstructs_matrix() {
        let a = Matrix::from_rows(&[
            vec![6.0, 2.0, 1.0, 0.0],
            vec![2.0, 5.0, 2.0, 1.0],
            vec![1.0, 2.0, 7.0, 3.0],
            vec![0.0, 1.0, 3.0, 8.0],
        ])
        .unwrap();

        let factor = CholeskyFactor::factor(&a).unwrap();
        let l = factor.lower();

        for i in 0..4 {
            for j in 0..4 {
                if j > i {
                    assert_eq!(l.get(i, j), 0.0);
                }
                let product: f64 = (0..4).map(|k| l.get(i, k) * l.get(j, k)).sum();
                assert!((product - a.get(i, j)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_solve_round_trip() {
        let a = Matrix::from_rows(&[
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ])
        .unwrap();
        let expected = vec![1.0, -2.0, 0.5];
        let b = a.mul_vec(&expected).unwrap();

        let x = CholeskyFactor::factor(&a).unwrap().solve(&b).unwrap();
        assert_close(&x, &expected);
    }

    #[test]
    fn test_zero_row_is_rejected() {
        let a = Matrix::from_rows(&[
            vec![2.0, 1.0, 0.0],
            vec![1.0, 2.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();

        let err = CholeskyFactor::factor(&a).unwrap_err();
        assert_eq!(
            err,
            RatingError::NotPositiveDefinite {
                index: 2,
                pivot: 0.0
            }
        );
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_indefinite_matrix_is_rejected() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();

        match CholeskyFactor::factor(&a) {
            Err(RatingError::NotPositiveDefinite { index, pivot }) => {
                assert_eq!(index, 1);
                assert!(pivot < 0.0);
            }
            other => panic!("expected NotPositiveDefinite, got {:?}", other),
        }
    }

    #[test]
    fn test_min_pivot_guard() {
        let a = Matrix::from_rows(&[vec![1.0, 0.999], vec![0.999, 1.0]]).unwrap();

        assert!(CholeskyFactor::factor(&a).is_ok());
        assert!(CholeskyFactor::factor_with_min_pivot(&a, 0.01).is_err());
    }

    #[test]
    fn test_dimension_checks() {
        assert!(Matrix::from_rows(&[vec![1.0, 0.0], vec![1.0]]).is_err());

        let factor = CholeskyFactor::factor(&Matrix::from_rows(&[vec![4.0]]).unwrap()).unwrap();
        assert_eq!(
            factor.solve(&[1.0, 2.0]),
            Err(RatingError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(factor.solve(&[8.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_empty_matrix() {
        let factor = CholeskyFactor::factor(&Matrix::zeros(0)).unwrap();
        assert!(factor.solve(&[]).unwrap().is_empty());
    }
}
