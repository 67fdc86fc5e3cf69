use super::{Matrix, MatrixError, snap, EPS};

/// Doolittle factorization A = LU, where L is unit lower-triangular and U is
/// upper-triangular. No row exchanges are performed, so every leading
/// principal minor of A must be non-zero.
#[derive(Debug, Clone)]
pub struct Lu {

    l : Matrix,

    u : Matrix
}

impl Lu {

    pub fn new(a : &Matrix) -> Result<Self, MatrixError> {
        if !a.is_square() {
            return Err(MatrixError::DimensionMismatch {
                op : "LU factorization",
                left : a.shape(),
                right : a.shape()
            });
        }
        let n = a.nrows();
        let mut l = Matrix::identity(n);
        let mut u = Matrix::zeros(n, n);
        for i in 0..n {

            // Row i of U
            for j in i..n {
                let acc : f64 = (0..i).map(|k| l.at(i, k) * u.at(k, j) ).sum();
                u.put(i, j, snap(a.at(i, j) - acc));
            }

            let pivot = u.at(i, i);
            if pivot.abs() < EPS {
                return Err(MatrixError::Singular { pivot, position : i });
            }

            // Column i of L, below the unit diagonal
            for j in (i + 1)..n {
                let acc : f64 = (0..i).map(|k| l.at(j, k) * u.at(k, i) ).sum();
                l.put(j, i, snap((a.at(j, i) - acc) / pivot));
            }
        }
        Ok(Self { l, u })
    }

    pub fn l(&self) -> &Matrix {
        &self.l
    }

    pub fn u(&self) -> &Matrix {
        &self.u
    }

    /// Product of the pivots.
    pub fn determinant(&self) -> f64 {
        (0..self.u.nrows()).map(|i| self.u.at(i, i) ).product()
    }

    /// Inverse of the factored matrix, as inv(U) * inv(L).
    pub fn inverse(&self) -> Result<Matrix, MatrixError> {
        invert_upper(&self.u).multiply(&invert_lower(&self.l))
    }

}

/// Inverts an upper-triangular matrix with non-zero diagonal, filling each
/// column from the diagonal upwards.
fn invert_upper(u : &Matrix) -> Matrix {
    let n = u.nrows();
    let mut inv = Matrix::zeros(n, n);
    for i in 0..n {
        inv.put(i, i, 1.0 / u.at(i, i));
        for k in (0..i).rev() {
            let s : f64 = ((k + 1)..=i).map(|j| u.at(k, j) * inv.at(j, i) ).sum();
            inv.put(k, i, snap(-s / u.at(k, k)));
        }
    }
    inv
}

/// Inverts a unit lower-triangular matrix by forward recurrence down each column.
fn invert_lower(l : &Matrix) -> Matrix {
    let n = l.nrows();
    let mut inv = Matrix::zeros(n, n);
    for i in 0..n {
        inv.put(i, i, 1.0);
        for k in (i + 1)..n {
            for j in i..k {
                let v = inv.at(k, i) - l.at(k, j) * inv.at(j, i);
                inv.put(k, i, snap(v));
            }
        }
    }
    inv
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn factors_reproduce_matrix() {
        let a = Matrix::from_row_slice(3, 3, &[
            2., -1., 0.,
            -1., 2., -1.,
            0., -1., 2.
        ]);
        let lu = Lu::new(&a).unwrap();
        for i in 0..3 {
            assert_eq!(lu.l().get(i, i).unwrap(), 1.0);
            for j in (i + 1)..3 {
                assert_eq!(lu.l().get(i, j).unwrap(), 0.0);
                assert_eq!(lu.u().get(j, i).unwrap(), 0.0);
            }
        }
        let prod = lu.l().multiply(lu.u()).unwrap();
        for (p, e) in prod.as_slice().iter().zip(a.as_slice().iter()) {
            assert_abs_diff_eq!(*p, *e, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(lu.determinant(), a.determinant().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn triangular_inverses() {
        let u = Matrix::from_row_slice(2, 2, &[2., 1., 0., 4.]);
        assert_eq!(invert_upper(&u), Matrix::from_row_slice(2, 2, &[0.5, -0.125, 0., 0.25]));
        let l = Matrix::from_row_slice(2, 2, &[1., 0., 3., 1.]);
        assert_eq!(invert_lower(&l), Matrix::from_row_slice(2, 2, &[1., 0., -3., 1.]));
    }

    #[test]
    fn cancelled_entries_are_exact_zeros() {
        // 0.3 - 3 * 0.1 leaves about -5.6e-17 unless snapped.
        assert!(0.3 - 3.0 * 0.1 != 0.0);
        let a = Matrix::from_row_slice(3, 3, &[
            1., 0.1, 0.1,
            3., 1.3, 0.3,
            3., 0.3, 1.
        ]);
        let lu = Lu::new(&a).unwrap();
        assert_eq!(lu.u().get(1, 2).unwrap(), 0.0);
        assert_eq!(lu.l().get(2, 1).unwrap(), 0.0);
        let prod = lu.l().multiply(lu.u()).unwrap();
        for (p, e) in prod.as_slice().iter().zip(a.as_slice().iter()) {
            assert_abs_diff_eq!(*p, *e, epsilon = 1e-12);
        }

        let l = Matrix::from_row_slice(3, 3, &[
            1., 0., 0.,
            0.1, 1., 0.,
            0.3, 3., 1.
        ]);
        let inv = invert_lower(&l);
        assert_eq!(inv.get(1, 0).unwrap(), -0.1);
        assert_eq!(inv.get(2, 0).unwrap(), 0.0);

        let u = Matrix::from_row_slice(3, 3, &[
            1., 3., 0.3,
            0., 1., 0.1,
            0., 0., 1.
        ]);
        let inv = invert_upper(&u);
        assert_eq!(inv.get(1, 2).unwrap(), -0.1);
        assert_eq!(inv.get(0, 2).unwrap(), 0.0);
    }

    #[test]
    fn zero_leading_pivot() {
        let a = Matrix::from_row_slice(2, 2, &[0., 1., 1., 0.]);
        assert_eq!(Lu::new(&a).unwrap_err(), MatrixError::Singular { pivot : 0.0, position : 0 });
    }

}
