use std::time::Instant;

use boltz_core::errors::ErrorInfo;
use boltz_core::{BoltzError, MomentEstimate, SampleOutcome, SampleRequest, Sampler, SpinModel};
use boltz_mcmc::determinism::{chunk_seed, split_evenly};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::config::{ChunkExecution, RemainderPolicy, SeedPolicy, StatisticsConfig};

/// Options governing how a budget is spread over sampler invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Threads handed to each invocation and to parallel chunk execution.
    pub num_threads: usize,
    /// Number of chunks of the RAM friendly path.
    pub parts: usize,
    /// Treatment of `num_samples mod parts`.
    pub remainder: RemainderPolicy,
    /// Chunk scheduling.
    pub chunk_execution: ChunkExecution,
    /// Master seed policy, resolved once per call.
    pub seed_policy: SeedPolicy,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self::from(&StatisticsConfig::default())
    }
}

impl From<&StatisticsConfig> for AggregationOptions {
    fn from(config: &StatisticsConfig) -> Self {
        Self {
            num_threads: config.num_threads,
            parts: config.parts,
            remainder: config.remainder,
            chunk_execution: config.chunk_execution,
            seed_policy: config.seed_policy.clone(),
        }
    }
}

/// Outcome of an aggregated estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Combined moment estimate.
    pub moments: MomentEstimate,
    /// Sample weighted mean acceptance ratio, when every invocation reported one.
    pub acceptance_ratio: Option<f64>,
    /// Samples that entered the estimate.
    pub samples_used: usize,
    /// Samples dropped by the discard remainder policy.
    pub samples_discarded: usize,
    /// Number of sampler invocations.
    pub parts: usize,
    /// Master seed the run was derived from.
    pub master_seed: u64,
}

/// Splits work over an injected sampling backend and combines the results.
pub struct StatisticsAggregator<'a> {
    sampler: &'a dyn Sampler,
    options: AggregationOptions,
}

impl<'a> StatisticsAggregator<'a> {
    /// Wraps `sampler` with the given chunking options.
    pub fn new(sampler: &'a dyn Sampler, options: AggregationOptions) -> Self {
        Self { sampler, options }
    }

    /// One invocation with the whole budget.
    pub fn calculate_statistics(
        &self,
        model: &SpinModel,
        num_samples: usize,
    ) -> Result<StatisticsReport, BoltzError> {
        let master_seed = self.options.seed_policy.resolve();
        let _span =
            info_span!("statistics", backend = self.sampler.name(), n = model.n()).entered();
        let start = Instant::now();
        let outcome = self.invoke(model, 0, num_samples, master_seed)?;
        info!(
            samples = outcome.samples,
            master_seed,
            acceptance_pct = outcome.acceptance_ratio.map(|ratio| ratio * 100.0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "statistics finished"
        );
        Ok(StatisticsReport {
            samples_used: outcome.samples,
            acceptance_ratio: outcome.acceptance_ratio,
            moments: outcome.moments,
            samples_discarded: 0,
            parts: 1,
            master_seed,
        })
    }

    /// `parts` independent invocations whose estimates are averaged.
    ///
    /// Each invocation only holds its own chunk, which bounds peak memory by a
    /// single chunk. The first failing chunk aborts the whole call.
    pub fn calculate_statistics_ram_friendlier(
        &self,
        model: &SpinModel,
        num_samples: usize,
    ) -> Result<StatisticsReport, BoltzError> {
        let parts = self.options.parts;
        if parts == 0 {
            return Err(BoltzError::Config(
                ErrorInfo::new("boltz_stats.invalid_parts", "parts must be at least 1")
                    .with_context("parts", parts),
            ));
        }
        if num_samples < parts {
            return Err(BoltzError::Config(
                ErrorInfo::new("boltz_stats.invalid_parts", "every part needs at least one sample")
                    .with_context("parts", parts)
                    .with_context("num_samples", num_samples),
            ));
        }

        let (budgets, discarded) = match self.options.remainder {
            RemainderPolicy::Discard => (vec![num_samples / parts; parts], num_samples % parts),
            RemainderPolicy::Distribute => (split_evenly(num_samples, parts), 0),
        };
        if discarded > 0 {
            warn!(discarded, num_samples, parts, "discarding remainder samples");
        }

        let master_seed = self.options.seed_policy.resolve();
        let _span = info_span!(
            "statistics_chunked",
            backend = self.sampler.name(),
            n = model.n(),
            parts
        )
        .entered();
        let start = Instant::now();
        let outcomes = match self.options.chunk_execution {
            ChunkExecution::Sequential => budgets
                .iter()
                .enumerate()
                .map(|(index, &budget)| self.invoke(model, index, budget, master_seed))
                .collect::<Result<Vec<_>, BoltzError>>()?,
            ChunkExecution::Parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.options.num_threads.max(1))
                    .build()
                    .map_err(|err| {
                        BoltzError::Backend(
                            ErrorInfo::new("boltz_stats.thread_pool", err.to_string())
                                .with_context("num_threads", self.options.num_threads),
                        )
                    })?;
                pool.install(|| {
                    budgets
                        .par_iter()
                        .enumerate()
                        .map(|(index, &budget)| self.invoke(model, index, budget, master_seed))
                        .collect::<Result<Vec<_>, BoltzError>>()
                })?
            }
        };

        let moments = match self.options.remainder {
            RemainderPolicy::Discard => {
                let estimates: Vec<MomentEstimate> =
                    outcomes.iter().map(|outcome| outcome.moments.clone()).collect();
                MomentEstimate::mean(&estimates)?
            }
            RemainderPolicy::Distribute => {
                let weighted: Vec<(MomentEstimate, usize)> = outcomes
                    .iter()
                    .map(|outcome| (outcome.moments.clone(), outcome.samples))
                    .collect();
                MomentEstimate::weighted_mean(&weighted)?
            }
        };
        let samples_used: usize = outcomes.iter().map(|outcome| outcome.samples).sum();
        let acceptance_ratio = pooled_acceptance(&outcomes);
        info!(
            samples = samples_used,
            discarded,
            master_seed,
            acceptance_pct = acceptance_ratio.map(|ratio| ratio * 100.0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "chunked statistics finished"
        );
        Ok(StatisticsReport {
            moments,
            acceptance_ratio,
            samples_used,
            samples_discarded: discarded,
            parts,
            master_seed,
        })
    }

    fn invoke(
        &self,
        model: &SpinModel,
        part: usize,
        num_samples: usize,
        master_seed: u64,
    ) -> Result<SampleOutcome, BoltzError> {
        let request = SampleRequest::new(num_samples, chunk_seed(master_seed, part))
            .with_threads(self.options.num_threads);
        let outcome = self.sampler.sample(model, &request).map_err(|err| {
            debug!(part, code = %err.info().code, "chunk failed");
            err
        })?;
        debug!(
            part,
            samples = outcome.samples,
            acceptance = outcome.acceptance_ratio,
            "chunk finished"
        );
        Ok(outcome)
    }
}

fn pooled_acceptance(outcomes: &[SampleOutcome]) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total = 0usize;
    for outcome in outcomes {
        weighted += outcome.acceptance_ratio? * outcome.samples as f64;
        total += outcome.samples;
    }
    (total > 0).then(|| weighted / total as f64)
}
