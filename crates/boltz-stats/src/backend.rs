use boltz_core::{BoltzError, Sampler};
use boltz_host::AcceleratedSampler;
use boltz_mcmc::{MetropolisHastings, ParallelChains};
use tracing::debug;

use crate::config::{BackendKind, StatisticsConfig};

/// Builds the backend named by `config.backend`.
///
/// An accelerated backend that cannot be located or loaded is an error; no
/// other backend is substituted.
pub fn select_backend(config: &StatisticsConfig) -> Result<Box<dyn Sampler>, BoltzError> {
    let sampler: Box<dyn Sampler> = match config.backend {
        BackendKind::Reference => Box::new(MetropolisHastings::new(config.chain.clone())),
        BackendKind::Parallel => Box::new(ParallelChains::new(config.chain.clone())),
        BackendKind::Accelerated => Box::new(AcceleratedSampler::locate(
            config.accelerated.library_path.as_deref(),
            &config.accelerated.env_var,
        )?),
    };
    debug!(backend = sampler.name(), "selected sampling backend");
    Ok(sampler)
}
