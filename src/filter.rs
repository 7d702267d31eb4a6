//! Savitzky-Golay smoothing and differentiation.
//!
//! The classic least-squares polynomial convolution filter (Savitzky &
//! Golay, DOI 10.1021/ac60214a047): fit a polynomial of the given order to
//! each window of samples and evaluate the fit (or its first derivative) at
//! the window center. The input is zero-padded symmetrically by half the
//! window before filtering and the padding trimmed afterwards, so the output
//! always has the input's length; the first and last half-window samples are
//! influenced by the zero padding.

use crate::error::FilterError;

/// Default window length, in samples.
pub const DEFAULT_WINDOW: usize = 13;

/// Default polynomial order.
pub const DEFAULT_ORDER: usize = 3;

/// Smooth `data` with a Savitzky-Golay filter.
///
/// `window` must be a positive odd number and at least `order + 2`.
pub fn smooth(data: &[f64], window: usize, order: usize) -> Result<Vec<f64>, FilterError> {
    savitzky_golay(data, window, order, 0)
}

/// First derivative of `data` (per sample step) via Savitzky-Golay.
///
/// Same parameter constraints as [`smooth`].
pub fn differentiate(data: &[f64], window: usize, order: usize) -> Result<Vec<f64>, FilterError> {
    savitzky_golay(data, window, order, 1)
}

fn savitzky_golay(
    data: &[f64],
    window: usize,
    order: usize,
    deriv: usize,
) -> Result<Vec<f64>, FilterError> {
    if window % 2 != 1 {
        return Err(FilterError::WindowNotOdd { window });
    }
    if window < order + 2 {
        return Err(FilterError::WindowTooSmall { window, order });
    }
    if order < deriv {
        return Err(FilterError::OrderTooSmall { order, deriv });
    }

    let weights = coefficients(window, order, deriv);
    let half = window / 2;

    let mut padded = vec![0.0; data.len() + 2 * half];
    padded[half..half + data.len()].copy_from_slice(data);

    Ok((0..data.len())
        .map(|i| {
            weights
                .iter()
                .enumerate()
                .map(|(j, w)| w * padded[i + j])
                .sum()
        })
        .collect())
}

/// Convolution weights: the `deriv`-th row of the pseudoinverse of the
/// window's Vandermonde design matrix `B` (rows `k = -h..=h`, columns
/// `k^0..k^order`), computed as `(BᵀB)⁻¹Bᵀ`.
fn coefficients(window: usize, order: usize, deriv: usize) -> Vec<f64> {
    let half = (window / 2) as i64;
    let terms = order + 1;

    // Normal matrix: (BᵀB)[i][j] = Σ_k k^(i+j)
    let mut normal = vec![vec![0.0; terms]; terms];
    for k in -half..=half {
        let k = k as f64;
        for (i, row) in normal.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell += k.powi((i + j) as i32);
            }
        }
    }

    let inverse = invert(normal);

    // Weight for sample offset k: Σ_j inverse[deriv][j] * k^j
    (-half..=half)
        .map(|k| {
            let k = k as f64;
            inverse[deriv]
                .iter()
                .enumerate()
                .map(|(j, c)| c * k.powi(j as i32))
                .sum()
        })
        .collect()
}

/// Gauss-Jordan inversion with partial pivoting. The normal matrix BᵀB is
/// positive definite whenever `window > order`, so the pivots never vanish.
fn invert(mut a: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let n = a.len();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        a.swap(pivot, col);
        inv.swap(pivot, col);

        let scale = a[col][col];
        for j in 0..n {
            a[col][j] /= scale;
            inv[col][j] /= scale;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    inv
}
