use nalgebra::DMatrix;
use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};
use std::ops::Mul;
use thiserror::Error;

/// Doolittle factorization and the triangular inversions built on it.
pub mod lu;

pub use lu::Lu;

/// Entries whose magnitude falls below this value after an arithmetic
/// combination step are replaced by exactly zero.
pub const EPS : f64 = 1e-12;

pub(crate) fn snap(x : f64) -> f64 {
    if x.abs() < EPS {
        0.0
    } else {
        x
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {

    #[error("Invalid matrix dimension for {op}: {left:?} against {right:?}")]
    DimensionMismatch { op : &'static str, left : (usize, usize), right : (usize, usize) },

    #[error("Index ({row}, {col}) outside {nrows}x{ncols} matrix")]
    Index { row : usize, col : usize, nrows : usize, ncols : usize },

    #[error("Matrix is singular (pivot {pivot} at diagonal position {position})")]
    Singular { pivot : f64, position : usize }

}

/// Dense real matrix with extents fixed at construction, stored row-major.
/// Every operation allocates a fresh result and leaves its operands untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {

    nrows : usize,

    ncols : usize,

    data : Vec<f64>
}

impl Matrix {

    pub fn zeros(nrows : usize, ncols : usize) -> Self {
        Self { nrows, ncols, data : vec![0.0; nrows * ncols] }
    }

    /// Builds a matrix from the first nrows*ncols entries of values, read
    /// row by row. Panics if fewer entries are informed.
    pub fn from_row_slice(nrows : usize, ncols : usize, values : &[f64]) -> Self {
        assert!(
            values.len() >= nrows * ncols,
            "Matrix of {}x{} requires {} values, but {} were informed",
            nrows,
            ncols,
            nrows * ncols,
            values.len()
        );
        Self { nrows, ncols, data : values[0..nrows * ncols].to_vec() }
    }

    /// Single-row matrix holding the informed values.
    pub fn row_vector(values : &[f64]) -> Self {
        Self::from_row_slice(1, values.len(), values)
    }

    pub fn identity(n : usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Row-major view over all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..]
    }

    pub fn row(&self, i : usize) -> Result<&[f64], MatrixError> {
        if i >= self.nrows {
            return Err(self.index_error(i, 0));
        }
        Ok(&self.data[i * self.ncols..(i + 1) * self.ncols])
    }

    pub fn get(&self, row : usize, col : usize) -> Result<f64, MatrixError> {
        self.check_index(row, col)?;
        Ok(self.at(row, col))
    }

    pub fn set(&mut self, row : usize, col : usize, value : f64) -> Result<(), MatrixError> {
        self.check_index(row, col)?;
        self.data[row * self.ncols + col] = value;
        Ok(())
    }

    pub(crate) fn at(&self, row : usize, col : usize) -> f64 {
        self.data[row * self.ncols + col]
    }

    pub(crate) fn put(&mut self, row : usize, col : usize, value : f64) {
        self.data[row * self.ncols + col] = value;
    }

    fn check_index(&self, row : usize, col : usize) -> Result<(), MatrixError> {
        if row >= self.nrows || col >= self.ncols {
            Err(self.index_error(row, col))
        } else {
            Ok(())
        }
    }

    fn index_error(&self, row : usize, col : usize) -> MatrixError {
        MatrixError::Index { row, col, nrows : self.nrows, ncols : self.ncols }
    }

    fn mismatch(&self, op : &'static str, other : &Matrix) -> MatrixError {
        MatrixError::DimensionMismatch { op, left : self.shape(), right : other.shape() }
    }

    fn require_square(&self, op : &'static str) -> Result<(), MatrixError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(self.mismatch(op, self))
        }
    }

    fn zip_with<F>(&self, other : &Matrix, op : &'static str, f : F) -> Result<Matrix, MatrixError>
    where
        F : Fn(f64, f64) -> f64
    {
        if self.shape() != other.shape() {
            return Err(self.mismatch(op, other));
        }
        let data = self.data.iter()
            .zip(other.data.iter())
            .map(|(a, b)| snap(f(*a, *b)) )
            .collect();
        Ok(Matrix { nrows : self.nrows, ncols : self.ncols, data })
    }

    /// Element-wise sum; both operands must share the same extents.
    pub fn add(&self, other : &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "addition", |a, b| a + b )
    }

    /// Element-wise difference; both operands must share the same extents.
    pub fn subtract(&self, other : &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "subtraction", |a, b| a - b )
    }

    /// Matrix product self * other. The number of columns of self must
    /// match the number of rows of other.
    pub fn multiply(&self, other : &Matrix) -> Result<Matrix, MatrixError> {
        if self.ncols != other.nrows {
            return Err(self.mismatch("multiplication", other));
        }
        let mut prod = Matrix::zeros(self.nrows, other.ncols);
        for i in 0..self.nrows {
            for j in 0..other.ncols {
                let mut acc = 0.0;
                for k in 0..self.ncols {
                    acc += self.at(i, k) * other.at(k, j);
                }
                prod.put(i, j, snap(acc));
            }
        }
        Ok(prod)
    }

    pub fn scale(&self, factor : f64) -> Matrix {
        let data = self.data.iter().map(|x| factor * x ).collect();
        Matrix { nrows : self.nrows, ncols : self.ncols, data }
    }

    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::zeros(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                t.put(j, i, self.at(i, j));
            }
        }
        t
    }

    /// Submatrix formed by deleting the informed row and column of a square
    /// matrix, preserving the relative order of what remains.
    pub fn cofactor(&self, row : usize, col : usize) -> Result<Matrix, MatrixError> {
        self.require_square("cofactor")?;
        if self.nrows < 2 {
            return Err(self.mismatch("cofactor", self));
        }
        self.check_index(row, col)?;
        let n = self.nrows;
        let mut sub = Matrix::zeros(n - 1, n - 1);
        let mut dst = sub.data.iter_mut();
        for i in (0..n).filter(|i| *i != row ) {
            for j in (0..n).filter(|j| *j != col ) {
                if let Some(e) = dst.next() {
                    *e = self.at(i, j);
                }
            }
        }
        Ok(sub)
    }

    /// Determinant by cofactor expansion along the first column. The cost grows
    /// factorially with the matrix order, which is only acceptable for the
    /// small covariance matrices this crate deals with.
    pub fn determinant(&self) -> Result<f64, MatrixError> {
        self.require_square("determinant")?;
        match self.nrows {
            0 => Ok(1.0),
            1 => Ok(self.data[0]),
            n => {
                let mut det = 0.0;
                for i in 0..n {
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    det += sign * self.at(i, 0) * self.cofactor(i, 0)?.determinant()?;
                }
                Ok(det)
            }
        }
    }

    /// Inverse through the LU factorization (no row exchanges). Fails with
    /// MatrixError::Singular when a zero pivot shows up during the factorization.
    pub fn inverse(&self) -> Result<Matrix, MatrixError> {
        Lu::new(self)?.inverse()
    }

}

impl<'a> Mul<f64> for &'a Matrix {

    type Output = Matrix;

    fn mul(self, factor : f64) -> Matrix {
        self.scale(factor)
    }

}

impl Mul<f64> for Matrix {

    type Output = Matrix;

    fn mul(self, factor : f64) -> Matrix {
        self.scale(factor)
    }

}

impl Display for Matrix {

    fn fmt(&self, f : &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for i in 0..self.nrows {
            let row = (0..self.ncols)
                .map(|j| format!("{}", self.at(i, j)) )
                .collect::<Vec<_>>()
                .join("\t\t");
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }

}

impl<'a> From<&'a Matrix> for DMatrix<f64> {

    fn from(m : &'a Matrix) -> Self {
        DMatrix::from_row_slice(m.nrows, m.ncols, &m.data[..])
    }

}

impl<'a> From<&'a DMatrix<f64>> for Matrix {

    fn from(m : &'a DMatrix<f64>) -> Self {
        let mut out = Matrix::zeros(m.nrows(), m.ncols());
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                out.put(i, j, m[(i, j)]);
            }
        }
        out
    }

}
