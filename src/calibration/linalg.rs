use nalgebra::{DMatrix, DVector};

use crate::prelude::Error;

/// Relative tolerance used to identify null coefficients
const RELATIVE_TOLERANCE: f64 = 1.0E-12;

/// QR factorization of any (m, n) matrix, returns the
/// (min(m, n), n) upper triangular factor.
pub(crate) fn triangular_factor(matrix: DMatrix<f64>) -> DMatrix<f64> {
    matrix.qr().r()
}

/// Null coefficient tolerance, relative to the largest coefficient
pub(crate) fn tolerance(matrix: &DMatrix<f64>) -> f64 {
    RELATIVE_TOLERANCE * matrix.amax().max(1.0)
}

/// Returns index of the last row whose coefficient in this column is not null
pub(crate) fn last_nonzero_row(matrix: &DMatrix<f64>, column: usize, tol: f64) -> Option<usize> {
    (0..matrix.nrows())
        .rev()
        .find(|i| matrix[(*i, column)].abs() > tol)
}

/// Least squares solution of `a x = b`, `a` possibly being rectangular or rank deficient
pub(crate) fn least_squares(
    a: DMatrix<f64>,
    b: &DVector<f64>,
    eps: f64,
) -> Result<DVector<f64>, Error> {
    let svd = a.svd(true, true);
    svd.solve(b, eps).map_err(Error::Solving)
}
