#![deny(missing_docs)]
#![doc = "Core traits and data types for Boltzmann moment estimation: the spin model, the state codec, moment estimates and the `Sampler` contract every backend implements."]

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod errors;
pub mod model;
pub mod moments;
pub mod rng;

pub use codec::{decode, decode_many, encode, encode_many, encode_spins, state_count};
pub use errors::{BoltzError, ErrorInfo};
pub use model::{CouplingMatrix, SpinConfiguration, SpinModel};
pub use moments::MomentEstimate;
pub use rng::{derive_substream_seed, fresh_seed, RngHandle};

/// Parameters shared by every sampling backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRequest {
    /// Number of configurations accumulated into the estimate.
    pub num_samples: usize,
    /// Worker threads the backend may use. Single-threaded backends ignore it.
    pub num_threads: usize,
    /// Master seed for the run.
    pub seed: u64,
}

impl SampleRequest {
    /// Single-threaded request for `num_samples` samples.
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self {
            num_samples,
            num_threads: 1,
            seed,
        }
    }

    /// Returns the request with a different thread budget.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Rejects empty sample budgets and zero thread counts.
    pub fn validate(&self) -> Result<(), BoltzError> {
        if self.num_samples == 0 {
            return Err(BoltzError::Config(
                ErrorInfo::new("invalid-num-samples", "num_samples must be at least 1")
                    .with_context("num_samples", self.num_samples),
            ));
        }
        if self.num_threads == 0 {
            return Err(BoltzError::Config(
                ErrorInfo::new("invalid-num-threads", "num_threads must be at least 1")
                    .with_context("num_threads", self.num_threads),
            ));
        }
        Ok(())
    }
}

/// Advisory flag raised when a chain accepted none or all of its proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Degeneracy {
    /// No proposal was accepted; the chain never moved.
    NoneAccepted,
    /// Every proposal was accepted; the energy landscape is flat or mis-scaled.
    AllAccepted,
}

impl Degeneracy {
    /// Classifies an accepted / proposed tally.
    pub fn classify(accepted: u64, proposed: u64) -> Option<Self> {
        if proposed == 0 {
            None
        } else if accepted == 0 {
            Some(Degeneracy::NoneAccepted)
        } else if accepted == proposed {
            Some(Degeneracy::AllAccepted)
        } else {
            None
        }
    }
}

/// Estimate returned by a single sampler invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Mean spins and mean pairwise products.
    pub moments: MomentEstimate,
    /// Accepted over proposed moves, when the backend reports it.
    pub acceptance_ratio: Option<f64>,
    /// Number of configurations behind the estimate.
    pub samples: usize,
    /// Advisory degeneracy flag.
    pub degeneracy: Option<Degeneracy>,
}

/// Sampling backend contract.
///
/// Implementations estimate the moments of the Boltzmann distribution of
/// `model` from `request.num_samples` configurations. They never mutate the
/// model, and the same request seed reproduces the same outcome.
pub trait Sampler: Send + Sync {
    /// Short backend identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Runs the backend to completion and returns the estimate.
    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError>;
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError> {
        (**self).sample(model, request)
    }
}
