use boltz_core::errors::ErrorInfo;
use boltz_core::{codec, BoltzError, MomentEstimate, SpinModel};

use crate::energy;

/// Widest model enumerated exhaustively.
pub const MAX_EXACT_UNITS: usize = 20;

/// Energies of every state, indexed by state identifier.
fn state_energies(model: &SpinModel) -> Result<Vec<f64>, BoltzError> {
    let n = model.n();
    if n > MAX_EXACT_UNITS {
        return Err(BoltzError::Config(
            ErrorInfo::new("too-many-units", "exact enumeration is limited to 20 units")
                .with_context("n", n)
                .with_hint("use a sampling backend for larger systems"),
        ));
    }
    (0..codec::state_count(n)?)
        .map(|id| codec::decode(id, n).map(|state| energy::energy(model, &state)))
        .collect()
}

/// Boltzmann weights `exp(-(E - E_min))` and their shift `E_min`.
fn shifted_weights(energies: &[f64]) -> (Vec<f64>, f64) {
    let min = energies.iter().copied().fold(f64::INFINITY, f64::min);
    (energies.iter().map(|e| (min - e).exp()).collect(), min)
}

/// `ln Z` by enumeration.
pub fn log_partition_function(model: &SpinModel) -> Result<f64, BoltzError> {
    let (weights, min) = shifted_weights(&state_energies(model)?);
    Ok(weights.iter().sum::<f64>().ln() - min)
}

/// `Z = sum_s exp(-E(s))` by enumeration.
pub fn exact_partition_function(model: &SpinModel) -> Result<f64, BoltzError> {
    Ok(log_partition_function(model)?.exp())
}

/// Exact first and second moments under the Boltzmann distribution.
pub fn exact_moments(model: &SpinModel) -> Result<MomentEstimate, BoltzError> {
    let n = model.n();
    let (weights, _) = shifted_weights(&state_energies(model)?);
    let total: f64 = weights.iter().sum();
    let mut mean_spins = vec![0.0; n];
    let mut mean_products = vec![0.0; n * n];
    for (id, weight) in weights.iter().enumerate() {
        let state = codec::decode(id as u64, n)?;
        let p = weight / total;
        let spins = state.spins();
        for (i, &si) in spins.iter().enumerate() {
            mean_spins[i] += p * f64::from(si);
            for (j, &sj) in spins.iter().enumerate() {
                mean_products[i * n + j] += p * f64::from(si * sj);
            }
        }
    }
    MomentEstimate::from_parts(n, mean_spins, mean_products)
}
