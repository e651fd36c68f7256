//! Dispersion matrix relating canopy source layers to domain concentrations.
//!
//! Element `(j, i)` is the concentration change at domain layer `i` per unit
//! source strength in canopy layer `j`, for a friction velocity of 1 m/s
//! (units s/m). The matrix is loaded once, validated against the configured
//! [`Setup`] and then shared read-only by every profile update.

use crate::constants::VON_KARMAN;
use crate::errors::{CanoakError, CanoakResult};
use crate::setup::Setup;
use crate::FloatValue;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionMatrix {
    dij: Array2<FloatValue>,
}

impl DispersionMatrix {
    pub fn new(dij: Array2<FloatValue>) -> Self {
        Self { dij }
    }

    /// Build a matrix from row vectors, one row per source layer.
    pub fn from_rows(rows: Vec<Vec<FloatValue>>) -> CanoakResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some((j, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(CanoakError::Error(format!(
                "Dispersion matrix row {} has {} columns, expected {}",
                j,
                row.len(),
                n_cols
            )));
        }
        let flat: Vec<FloatValue> = rows.into_iter().flatten().collect();
        let dij = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| CanoakError::Error(e.to_string()))?;
        Ok(Self { dij })
    }

    /// K-theory approximation of a dispersion matrix for `setup`.
    ///
    /// Each source releases a unit flux that must pass every layer between
    /// itself and the reference level, so
    ///
    /// $$D_{ji} = \sum_{k=\max(i,j)}^{N-1} \frac{\Delta z}{K(z_k)}$$
    ///
    /// with $K = \kappa (z - d)$ above the canopy and an exponential decay of
    /// the canopy-top value below it ($d = 0.6 h$, $u_* = 1$).
    pub fn gradient_diffusion(setup: &Setup) -> Self {
        let (n_source, n_domain) = setup.dispersion_shape();
        let delz = setup.delz();
        let h = setup.canopy_height;
        let d = 0.6 * h;
        let k_top = VON_KARMAN * (h - d);

        let inv_k: Vec<FloatValue> = (0..n_domain)
            .map(|k| {
                let z = (k as FloatValue + 0.5) * delz;
                let diffusivity = if z > h {
                    VON_KARMAN * (z - d)
                } else {
                    k_top * (2.0 * (z / h - 1.0)).exp()
                };
                delz / diffusivity
            })
            .collect();

        // Resistance from layer k up to the reference level.
        let mut to_top = vec![0.0; n_domain];
        let mut acc = 0.0;
        for k in (0..n_domain).rev() {
            acc += inv_k[k];
            to_top[k] = acc;
        }

        let dij = Array2::from_shape_fn((n_source, n_domain), |(j, i)| to_top[i.max(j)]);
        Self { dij }
    }

    /// (source layers, domain layers)
    pub fn shape(&self) -> (usize, usize) {
        let s = self.dij.shape();
        (s[0], s[1])
    }

    /// Fail unless the matrix has exactly the `expected` shape.
    pub fn check_shape(&self, expected: (usize, usize)) -> CanoakResult<()> {
        let found = self.shape();
        if found != expected {
            return Err(CanoakError::DispersionShape { expected, found });
        }
        Ok(())
    }

    pub fn as_array(&self) -> &Array2<FloatValue> {
        &self.dij
    }

    /// Dispersion of every source layer onto domain layer `i`.
    pub fn column(&self, i: usize) -> ArrayView1<'_, FloatValue> {
        self.dij.column(i)
    }

    /// Dispersion of source layer `j` onto every domain layer.
    pub fn row(&self, j: usize) -> ArrayView1<'_, FloatValue> {
        self.dij.row(j)
    }
}
