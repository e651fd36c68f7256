//! Linear algebra utilities.

use crate::FloatValue;
use ndarray::Array1;

/// A tridiagonal linear system.
///
/// Row `i` reads `lower[i] * x[i-1] + diag[i] * x[i] + upper[i] * x[i+1] = rhs[i]`,
/// so `lower[0]` and `upper[n-1]` are never used.
#[derive(Debug, Clone)]
pub struct Tridiagonal {
    pub lower: Array1<FloatValue>,
    pub diag: Array1<FloatValue>,
    pub upper: Array1<FloatValue>,
}

impl Tridiagonal {
    /// A system of `n` equations with all coefficients zero.
    pub fn zeros(n: usize) -> Self {
        Self {
            lower: Array1::zeros(n),
            diag: Array1::zeros(n),
            upper: Array1::zeros(n),
        }
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Solve the system with the Thomas algorithm.
    ///
    /// # Panics
    /// Panics if `rhs` has the wrong length or a zero pivot is encountered.
    /// Diagonally dominant systems, such as implicit diffusion steps, never
    /// produce one.
    ///
    /// # Example
    /// ```
    /// use canoak_core::utils::linear_algebra::Tridiagonal;
    /// use ndarray::array;
    ///
    /// let system = Tridiagonal {
    ///     lower: array![0.0, -1.0, -1.0],
    ///     diag: array![2.0, 2.0, 2.0],
    ///     upper: array![-1.0, -1.0, 0.0],
    /// };
    /// let x = system.solve(&array![1.0, 0.0, 1.0]);
    /// assert!(x.iter().all(|v| (v - 1.0).abs() < 1e-10));
    /// ```
    pub fn solve(&self, rhs: &Array1<FloatValue>) -> Array1<FloatValue> {
        let n = self.len();
        assert!(n > 0, "System must have at least one equation");
        assert_eq!(rhs.len(), n, "rhs must have one entry per equation");

        let mut c_prime = Array1::<FloatValue>::zeros(n);
        let mut x = Array1::<FloatValue>::zeros(n);

        assert!(self.diag[0].abs() > 1e-15, "Zero pivot encountered at row 0");
        c_prime[0] = self.upper[0] / self.diag[0];
        x[0] = rhs[0] / self.diag[0];

        for i in 1..n {
            let denom = self.diag[i] - self.lower[i] * c_prime[i - 1];
            assert!(denom.abs() > 1e-15, "Zero pivot encountered at row {}", i);
            c_prime[i] = self.upper[i] / denom;
            x[i] = (rhs[i] - self.lower[i] * x[i - 1]) / denom;
        }

        for i in (0..n - 1).rev() {
            x[i] -= c_prime[i] * x[i + 1];
        }
        x
    }
}
