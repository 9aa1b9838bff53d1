#![deny(missing_docs)]

//! Entry points for estimating the first and second moments of a Boltzmann
//! spin model.
//!
//! [`calculate_statistics`] spends the whole budget in one sampler invocation;
//! [`calculate_statistics_ram_friendlier`] splits it into `config.parts`
//! independent chunks and averages them. Both pick their backend from the
//! configuration. [`StatisticsAggregator`] takes any [`boltz_core::Sampler`]
//! directly.

/// Chunked aggregation over an injected backend.
pub mod aggregate;
/// Backend construction from configuration.
pub mod backend;
/// YAML configuration schema.
pub mod config;

pub use aggregate::{AggregationOptions, StatisticsAggregator, StatisticsReport};
pub use backend::select_backend;
pub use config::{
    AcceleratedConfig, BackendKind, ChunkExecution, RemainderPolicy, SeedPolicy, StatisticsConfig,
};

use boltz_core::{BoltzError, MomentEstimate, SpinModel};

/// Estimates the moments of `model` from `num_samples` samples drawn in a
/// single invocation of the configured backend.
pub fn calculate_statistics(
    model: &SpinModel,
    num_samples: usize,
    config: &StatisticsConfig,
) -> Result<MomentEstimate, BoltzError> {
    config.validate()?;
    let sampler = select_backend(config)?;
    StatisticsAggregator::new(sampler.as_ref(), AggregationOptions::from(config))
        .calculate_statistics(model, num_samples)
        .map(|report| report.moments)
}

/// Same estimate from `config.parts` chunks of `num_samples / parts` samples
/// each, averaged per moment.
pub fn calculate_statistics_ram_friendlier(
    model: &SpinModel,
    num_samples: usize,
    config: &StatisticsConfig,
) -> Result<MomentEstimate, BoltzError> {
    config.validate()?;
    let sampler = select_backend(config)?;
    StatisticsAggregator::new(sampler.as_ref(), AggregationOptions::from(config))
        .calculate_statistics_ram_friendlier(model, num_samples)
        .map(|report| report.moments)
}
