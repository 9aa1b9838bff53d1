//! Spin configurations and the validated (W, h, N) model description.

use serde::{Deserialize, Serialize};

use crate::errors::{BoltzError, ErrorInfo};

/// Ordered sequence of N spins, each exactly `+1` or `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct SpinConfiguration(Vec<i8>);

impl SpinConfiguration {
    /// Validates raw values and wraps them as a configuration.
    pub fn try_from_values(values: Vec<i8>) -> Result<Self, BoltzError> {
        if let Some(index) = values.iter().position(|&v| v != 1 && v != -1) {
            return Err(BoltzError::Codec(
                ErrorInfo::new("spin-value", "spin values must be +1 or -1")
                    .with_context("index", index)
                    .with_context("value", values[index]),
            ));
        }
        Ok(Self(values))
    }

    /// Configuration with every spin pointing down.
    pub fn all_down(n: usize) -> Self {
        Self(vec![-1; n])
    }

    /// Number of units in the configuration.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the configuration holds no units.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read-only view of the spins.
    pub fn spins(&self) -> &[i8] {
        &self.0
    }

    /// Spin of unit `index`.
    pub fn get(&self, index: usize) -> i8 {
        self.0[index]
    }

    /// Flips unit `index` in place.
    pub fn flip(&mut self, index: usize) {
        self.0[index] = -self.0[index];
    }

}

impl TryFrom<Vec<i8>> for SpinConfiguration {
    type Error = BoltzError;

    fn try_from(values: Vec<i8>) -> Result<Self, Self::Error> {
        Self::try_from_values(values)
    }
}

impl From<SpinConfiguration> for Vec<i8> {
    fn from(config: SpinConfiguration) -> Self {
        config.0
    }
}

/// Dense row-major coupling matrix `W`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CouplingMatrix {
    /// All-zero `n x n` matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            data: vec![0.0; n * n],
        }
    }

    /// Wraps row-major data of the given shape.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, BoltzError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(BoltzError::Config(
                ErrorInfo::new("dimension-mismatch", "coupling data does not match its shape")
                    .with_context("rows", rows)
                    .with_context("cols", cols)
                    .with_context("len", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from nested rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, BoltzError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(BoltzError::Config(
                    ErrorInfo::new("dimension-mismatch", "coupling rows have unequal length")
                        .with_context("row", index)
                        .with_context("expected", cols)
                        .with_context("actual", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// `(rows, cols)` of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Overwrites entry `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Validated Boltzmann model: couplings `W`, field `h` and unit count `N`.
///
/// Besides the caller's matrix the model keeps the symmetrised interaction
/// `W_ij + W_ji` with a zero diagonal, so a single-flip energy change only
/// touches one contiguous row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinModel {
    n: usize,
    couplings: CouplingMatrix,
    field: Vec<f64>,
    interaction: Vec<f64>,
}

impl SpinModel {
    /// Validates `W` against `(n, n)` and `h` against `n`.
    pub fn new(couplings: CouplingMatrix, field: Vec<f64>, n: usize) -> Result<Self, BoltzError> {
        if couplings.shape() != (n, n) {
            let (rows, cols) = couplings.shape();
            return Err(BoltzError::Config(
                ErrorInfo::new("dimension-mismatch", "coupling matrix must be N x N")
                    .with_context("n", n)
                    .with_context("rows", rows)
                    .with_context("cols", cols),
            ));
        }
        if field.len() != n {
            return Err(BoltzError::Config(
                ErrorInfo::new("dimension-mismatch", "field length must equal N")
                    .with_context("n", n)
                    .with_context("field_len", field.len()),
            ));
        }
        if let Some(index) = couplings.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(BoltzError::Config(
                ErrorInfo::new("non-finite-coupling", "coupling entries must be finite")
                    .with_context("row", index / n)
                    .with_context("col", index % n),
            ));
        }
        if let Some(index) = field.iter().position(|v| !v.is_finite()) {
            return Err(BoltzError::Config(
                ErrorInfo::new("non-finite-field", "field entries must be finite")
                    .with_context("index", index),
            ));
        }

        let mut interaction = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    interaction[i * n + j] = couplings.get(i, j) + couplings.get(j, i);
                }
            }
        }
        Ok(Self {
            n,
            couplings,
            field,
            interaction,
        })
    }

    /// Model with zero couplings and the given field.
    pub fn independent(field: Vec<f64>) -> Result<Self, BoltzError> {
        let n = field.len();
        Self::new(CouplingMatrix::zeros(n), field, n)
    }

    /// Number of units.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Coupling matrix as supplied by the caller.
    pub fn couplings(&self) -> &CouplingMatrix {
        &self.couplings
    }

    /// External field.
    pub fn field(&self) -> &[f64] {
        &self.field
    }

    /// Row `i` of `W + W^T` with the diagonal zeroed.
    pub fn interaction_row(&self, i: usize) -> &[f64] {
        &self.interaction[i * self.n..(i + 1) * self.n]
    }
}
