#![deny(missing_docs)]

//! Metropolis-Hastings sampling of Boltzmann spin models.
//!
//! The reference backend ([`MetropolisHastings`]) runs one chain on the calling
//! thread; [`ParallelChains`] spreads the same budget over independent chains on
//! a rayon pool. Small models can be solved exactly through [`exact`].

/// Multi-chain backend.
pub mod chains;
/// Chain parameters and their YAML schema.
pub mod config;
/// Deterministic seed derivation and budget splitting.
pub mod determinism;
/// Energy function and incremental flip deltas.
pub mod energy;
/// Exhaustive enumeration for small systems.
pub mod exact;
/// Core chain and the reference backend.
pub mod kernel;
/// Moment accumulators and acceptance tallies.
pub mod metrics;
/// Monte Carlo estimate of the partition function.
pub mod partition;

pub use chains::ParallelChains;
pub use config::{ChainParams, InitialState};
pub use exact::{exact_moments, exact_partition_function, log_partition_function};
pub use kernel::{run_chain, ChainResult, MetropolisHastings};
pub use metrics::{AcceptanceCounter, MomentAccumulator};
pub use partition::estimate_partition_function;
