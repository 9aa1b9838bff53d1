use std::time::Instant;

use boltz_core::errors::ErrorInfo;
use boltz_core::{
    codec, BoltzError, Degeneracy, MomentEstimate, RngHandle, SampleOutcome, SampleRequest,
    Sampler, SpinConfiguration, SpinModel,
};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, warn};

use crate::config::{ChainParams, InitialState};
use crate::energy;
use crate::metrics::{AcceptanceCounter, MomentAccumulator};

/// Result of a single Metropolis-Hastings chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    /// Moments over the post burn-in steps.
    pub moments: MomentEstimate,
    /// Accepted and proposed tallies over every step, burn-in included.
    pub acceptance: AcceptanceCounter,
    /// Number of accumulated steps.
    pub samples: usize,
    /// Configuration the chain ended in.
    pub final_state: SpinConfiguration,
}

impl ChainResult {
    /// Accepted over proposed moves.
    pub fn acceptance_ratio(&self) -> f64 {
        self.acceptance.ratio()
    }
}

/// Runs one chain of `params.burn_in + num_samples` steps over `model`.
///
/// Every step flips `params.flip` distinct units chosen uniformly and accepts
/// with probability `min(1, exp(-dE))`. A rejected step re-counts the current
/// configuration.
pub fn run_chain(
    model: &SpinModel,
    params: &ChainParams,
    num_samples: usize,
    rng: &mut RngHandle,
) -> Result<ChainResult, BoltzError> {
    params.validate(model.n())?;
    if num_samples == 0 {
        return Err(BoltzError::Config(
            ErrorInfo::new("invalid-num-samples", "num_samples must be at least 1")
                .with_context("num_samples", num_samples),
        ));
    }

    let steps = params.burn_in.checked_add(num_samples).ok_or_else(|| {
        BoltzError::Config(
            ErrorInfo::new("invalid-burn-in", "burn_in plus num_samples overflows the step count")
                .with_context("burn_in", params.burn_in)
                .with_context("num_samples", num_samples),
        )
    })?;

    let n = model.n();
    let mut state = initial_state(n, &params.initial_state, rng)?;
    let mut accumulator = MomentAccumulator::new(n);
    let mut acceptance = AcceptanceCounter::default();
    // Steps the current configuration has been held since it was last flushed.
    let mut held = 0u64;

    let mut single = [0usize; 1];
    for step in 0..steps {
        let drawn;
        let flips: &[usize] = if params.flip == 1 {
            single[0] = rng.gen_range(0..n);
            &single
        } else {
            drawn = index::sample(rng.inner_mut(), n, params.flip).into_vec();
            &drawn
        };
        let delta = energy::multi_flip_delta(model, &state, flips);
        let accepted = delta <= 0.0 || rng.next_unit() < (-delta).exp();
        acceptance.record(accepted);
        if accepted {
            if held > 0 {
                accumulator.push(&state, held);
                held = 0;
            }
            for &unit in flips {
                state.flip(unit);
            }
        }
        if step >= params.burn_in {
            held += 1;
        }
    }
    accumulator.push(&state, held);

    Ok(ChainResult {
        moments: accumulator.finish()?,
        acceptance,
        samples: num_samples,
        final_state: state,
    })
}

fn initial_state(
    n: usize,
    policy: &InitialState,
    rng: &mut RngHandle,
) -> Result<SpinConfiguration, BoltzError> {
    match policy {
        InitialState::Random => {
            let spins = (0..n)
                .map(|_| if rng.gen::<bool>() { 1 } else { -1 })
                .collect();
            SpinConfiguration::try_from_values(spins)
        }
        InitialState::AllDown => Ok(SpinConfiguration::all_down(n)),
        InitialState::State { id } => codec::decode(*id, n),
    }
}

/// Reference Metropolis-Hastings backend: one chain on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct MetropolisHastings {
    params: ChainParams,
}

impl MetropolisHastings {
    /// Creates the backend with the given chain parameters.
    pub fn new(params: ChainParams) -> Self {
        Self { params }
    }

    /// Chain parameters used for every request.
    pub fn params(&self) -> &ChainParams {
        &self.params
    }
}

impl Sampler for MetropolisHastings {
    fn name(&self) -> &str {
        "reference"
    }

    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError> {
        request.validate()?;
        let _span = debug_span!("mh_chain", n = model.n(), samples = request.num_samples).entered();
        if request.num_threads > 1 {
            debug!(
                requested = request.num_threads,
                "reference backend runs single-threaded"
            );
        }

        let start = Instant::now();
        let mut rng = RngHandle::from_seed(request.seed);
        let chain = run_chain(model, &self.params, request.num_samples, &mut rng)?;
        let ratio = chain.acceptance_ratio();
        info!(
            backend = "reference",
            samples = chain.samples,
            burn_in = self.params.burn_in,
            acceptance_pct = ratio * 100.0,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "chain finished"
        );

        let degeneracy = Degeneracy::classify(chain.acceptance.accepted, chain.acceptance.proposed);
        if let Some(kind) = degeneracy {
            warn!(?kind, acceptance = ratio, "degenerate acceptance over the whole chain");
        }
        Ok(SampleOutcome {
            moments: chain.moments,
            acceptance_ratio: Some(ratio),
            samples: chain.samples,
            degeneracy,
        })
    }
}
