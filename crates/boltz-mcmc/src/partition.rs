use boltz_core::errors::ErrorInfo;
use boltz_core::{BoltzError, RngHandle, SpinConfiguration, SpinModel};
use rand::Rng;

use crate::energy;

/// Monte Carlo estimate of `Z` from uniformly drawn configurations:
/// `Z ~ 2^N * mean(exp(-E(s)))`.
pub fn estimate_partition_function(
    model: &SpinModel,
    num_samples: usize,
    rng: &mut RngHandle,
) -> Result<f64, BoltzError> {
    if num_samples == 0 {
        return Err(BoltzError::Config(
            ErrorInfo::new("invalid-num-samples", "num_samples must be at least 1")
                .with_context("num_samples", num_samples),
        ));
    }
    let n = model.n();
    let mut total = 0.0;
    for _ in 0..num_samples {
        let spins = (0..n)
            .map(|_| if rng.gen::<bool>() { 1 } else { -1 })
            .collect();
        let state = SpinConfiguration::try_from_values(spins)?;
        total += (-energy::energy(model, &state)).exp();
    }
    Ok(total / num_samples as f64 * 2f64.powi(n as i32))
}
