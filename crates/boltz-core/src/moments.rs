//! First and second moment estimates and their combination rules.

use serde::{Deserialize, Serialize};

use crate::errors::{BoltzError, ErrorInfo};

/// Estimated `E[s_i]` and `E[s_i s_j]` for an `n`-unit model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentEstimate {
    n: usize,
    mean_spins: Vec<f64>,
    mean_products: Vec<f64>,
}

impl MomentEstimate {
    /// Wraps a mean spin vector and a row-major `n x n` product matrix.
    pub fn from_parts(
        n: usize,
        mean_spins: Vec<f64>,
        mean_products: Vec<f64>,
    ) -> Result<Self, BoltzError> {
        if mean_spins.len() != n || mean_products.len() != n * n {
            return Err(BoltzError::Config(
                ErrorInfo::new("dimension-mismatch", "moment buffers do not match N")
                    .with_context("n", n)
                    .with_context("s_len", mean_spins.len())
                    .with_context("ss_len", mean_products.len()),
            ));
        }
        Ok(Self {
            n,
            mean_spins,
            mean_products,
        })
    }

    /// Number of units.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Mean spin vector `S`.
    pub fn s(&self) -> &[f64] {
        &self.mean_spins
    }

    /// Mean outer product `SS`, row-major.
    pub fn ss(&self) -> &[f64] {
        &self.mean_products
    }

    /// Entry `SS[i][j]`.
    pub fn product(&self, i: usize, j: usize) -> f64 {
        self.mean_products[i * self.n + j]
    }

    /// Largest absolute entry-wise difference to `other` across `S` and `SS`.
    pub fn max_abs_diff(&self, other: &MomentEstimate) -> f64 {
        self.mean_spins
            .iter()
            .zip(&other.mean_spins)
            .chain(self.mean_products.iter().zip(&other.mean_products))
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Checks the invariants every estimate must satisfy: finite entries,
    /// `|S_i| <= 1`, unit diagonal and a symmetric `SS`, all within `tol`.
    pub fn check_invariants(&self, tol: f64) -> Result<(), BoltzError> {
        let invalid = |code: &str, message: &str, i: usize, j: usize, value: f64| {
            BoltzError::Config(
                ErrorInfo::new(code, message)
                    .with_context("i", i)
                    .with_context("j", j)
                    .with_context("value", value),
            )
        };
        for (i, &value) in self.mean_spins.iter().enumerate() {
            if !value.is_finite() || value.abs() > 1.0 + tol {
                return Err(invalid("moment-bounds", "mean spin outside [-1, 1]", i, i, value));
            }
        }
        for i in 0..self.n {
            let diag = self.product(i, i);
            if !diag.is_finite() || (diag - 1.0).abs() > tol {
                return Err(invalid("moment-diagonal", "SS diagonal must be 1", i, i, diag));
            }
            for j in (i + 1)..self.n {
                let upper = self.product(i, j);
                let lower = self.product(j, i);
                if !upper.is_finite() || upper.abs() > 1.0 + tol || (upper - lower).abs() > tol {
                    return Err(invalid("moment-symmetry", "SS must be symmetric", i, j, upper));
                }
            }
        }
        Ok(())
    }

    /// Arithmetic mean of `S` and of `SS` across estimates, each moment
    /// averaged on its own.
    pub fn mean(estimates: &[MomentEstimate]) -> Result<Self, BoltzError> {
        let weighted: Vec<(&MomentEstimate, f64)> =
            estimates.iter().map(|estimate| (estimate, 1.0)).collect();
        Self::combine(&weighted)
    }

    /// Mean weighted by the number of samples behind each estimate.
    pub fn weighted_mean(estimates: &[(MomentEstimate, usize)]) -> Result<Self, BoltzError> {
        let weighted: Vec<(&MomentEstimate, f64)> = estimates
            .iter()
            .map(|(estimate, samples)| (estimate, *samples as f64))
            .collect();
        Self::combine(&weighted)
    }

    fn combine(estimates: &[(&MomentEstimate, f64)]) -> Result<Self, BoltzError> {
        let Some((first, _)) = estimates.first() else {
            return Err(BoltzError::config(
                "empty-combination",
                "cannot combine an empty list of estimates",
            ));
        };
        let n = first.n;
        let total: f64 = estimates.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return Err(BoltzError::config(
                "empty-combination",
                "combined estimates carry no weight",
            ));
        }
        let mut mean_spins = vec![0.0; n];
        let mut mean_products = vec![0.0; n * n];
        for (index, (estimate, weight)) in estimates.iter().enumerate() {
            if estimate.n != n {
                return Err(BoltzError::Config(
                    ErrorInfo::new("dimension-mismatch", "estimates disagree on N")
                        .with_context("index", index)
                        .with_context("expected", n)
                        .with_context("actual", estimate.n),
                ));
            }
            let share = weight / total;
            for (acc, value) in mean_spins.iter_mut().zip(&estimate.mean_spins) {
                *acc += share * value;
            }
            for (acc, value) in mean_products.iter_mut().zip(&estimate.mean_products) {
                *acc += share * value;
            }
        }
        Ok(Self {
            n,
            mean_spins,
            mean_products,
        })
    }
}
