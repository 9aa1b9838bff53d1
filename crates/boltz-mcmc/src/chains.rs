use std::time::Instant;

use boltz_core::errors::ErrorInfo;
use boltz_core::{
    BoltzError, Degeneracy, MomentEstimate, RngHandle, SampleOutcome, SampleRequest, Sampler,
    SpinModel,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ChainParams;
use crate::determinism;
use crate::kernel::{run_chain, ChainResult};
use crate::metrics::AcceptanceCounter;

/// Multi-chain backend: `num_threads` independent chains on a rayon pool.
///
/// The sample budget is split over the chains with the remainder going to the
/// first ones, chain `k` draws from substream `k` of the request seed, and the
/// chain estimates are combined weighted by chain length. Each chain applies
/// its own burn-in.
#[derive(Debug, Clone, Default)]
pub struct ParallelChains {
    params: ChainParams,
}

impl ParallelChains {
    /// Creates the backend with the given per-chain parameters.
    pub fn new(params: ChainParams) -> Self {
        Self { params }
    }

    /// Per-chain parameters.
    pub fn params(&self) -> &ChainParams {
        &self.params
    }
}

impl Sampler for ParallelChains {
    fn name(&self) -> &str {
        "parallel"
    }

    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError> {
        request.validate()?;
        self.params.validate(model.n())?;

        let chains = request.num_threads.min(request.num_samples);
        let budgets = determinism::split_evenly(request.num_samples, chains);
        let run_all = || -> Result<Vec<ChainResult>, BoltzError> {
            budgets
                .par_iter()
                .enumerate()
                .map(|(index, &budget)| -> Result<ChainResult, BoltzError> {
                    let mut rng =
                        RngHandle::from_seed(determinism::chain_seed(request.seed, index));
                    let chain = run_chain(model, &self.params, budget, &mut rng)?;
                    debug!(
                        chain = index,
                        samples = budget,
                        acceptance = chain.acceptance_ratio(),
                        "chain finished"
                    );
                    Ok(chain)
                })
                .collect()
        };

        let start = Instant::now();
        // Chains are seeded by index, so the pool they run on does not change
        // the result. Inside a rayon worker the enclosing pool is reused.
        let results = if rayon::current_thread_index().is_some() {
            run_all()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(request.num_threads)
                .build()
                .map_err(|err| {
                    BoltzError::Backend(
                        ErrorInfo::new("thread-pool", err.to_string())
                            .with_context("num_threads", request.num_threads),
                    )
                })?;
            pool.install(run_all)?
        };

        let mut acceptance = AcceptanceCounter::default();
        let mut weighted = Vec::with_capacity(results.len());
        for chain in results {
            acceptance.merge(&chain.acceptance);
            weighted.push((chain.moments, chain.samples));
        }
        let moments = MomentEstimate::weighted_mean(&weighted)?;
        let ratio = acceptance.ratio();
        info!(
            backend = "parallel",
            chains,
            samples = request.num_samples,
            acceptance_pct = ratio * 100.0,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "chains combined"
        );

        let degeneracy = Degeneracy::classify(acceptance.accepted, acceptance.proposed);
        if let Some(kind) = degeneracy {
            warn!(?kind, acceptance = ratio, "degenerate acceptance across all chains");
        }
        Ok(SampleOutcome {
            moments,
            acceptance_ratio: Some(ratio),
            samples: request.num_samples,
            degeneracy,
        })
    }
}
