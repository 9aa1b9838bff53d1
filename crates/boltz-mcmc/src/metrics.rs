use boltz_core::{BoltzError, MomentEstimate, SpinConfiguration};
use serde::{Deserialize, Serialize};

/// Exact integer running sums of spins and spin products.
///
/// Only the upper triangle of the product matrix is accumulated; the lower one
/// is mirrored when the estimate is built, so `SS` is symmetric and its
/// diagonal is exactly one.
#[derive(Debug, Clone)]
pub struct MomentAccumulator {
    n: usize,
    count: u64,
    sums: Vec<i64>,
    products: Vec<i64>,
}

impl MomentAccumulator {
    /// Creates an empty accumulator for `n` units.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            count: 0,
            sums: vec![0; n],
            products: vec![0; n * n],
        }
    }

    /// Counts `state` as `weight` consecutive samples.
    pub fn push(&mut self, state: &SpinConfiguration, weight: u64) {
        let spins = state.spins();
        let w = weight as i64;
        for (i, &si) in spins.iter().enumerate() {
            let si = i64::from(si) * w;
            self.sums[i] += si;
            let row = &mut self.products[i * self.n..(i + 1) * self.n];
            for (j, &sj) in spins.iter().enumerate().skip(i) {
                row[j] += si * i64::from(sj);
            }
        }
        self.count += weight;
    }

    /// Number of samples accumulated so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Divides the sums by the sample count.
    pub fn finish(&self) -> Result<MomentEstimate, BoltzError> {
        if self.count == 0 {
            return Err(BoltzError::config(
                "empty-accumulator",
                "no samples were accumulated",
            ));
        }
        let count = self.count as f64;
        let n = self.n;
        let mean_spins = self.sums.iter().map(|&s| s as f64 / count).collect();
        let mut mean_products = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let value = self.products[i * n + j] as f64 / count;
                mean_products[i * n + j] = value;
                mean_products[j * n + i] = value;
            }
        }
        MomentEstimate::from_parts(n, mean_spins, mean_products)
    }
}

/// Accepted and proposed move tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCounter {
    /// Accepted proposals.
    pub accepted: u64,
    /// Issued proposals.
    pub proposed: u64,
}

impl AcceptanceCounter {
    /// Records the outcome of one proposal.
    pub fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        if accepted {
            self.accepted += 1;
        }
    }

    /// Adds another tally to this one.
    pub fn merge(&mut self, other: &AcceptanceCounter) {
        self.accepted += other.accepted;
        self.proposed += other.proposed;
    }

    /// Accepted over proposed, zero before any proposal.
    pub fn ratio(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}
