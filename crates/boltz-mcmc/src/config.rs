use boltz_core::errors::ErrorInfo;
use boltz_core::{codec, BoltzError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters of a single Metropolis-Hastings chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// Number of distinct units flipped by every proposal.
    #[serde(default = "default_flip")]
    pub flip: usize,
    /// Number of initial steps excluded from the estimate.
    #[serde(default)]
    pub burn_in: usize,
    /// Starting configuration of the chain.
    #[serde(default)]
    pub initial_state: InitialState,
}

fn default_flip() -> usize {
    1
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            flip: default_flip(),
            burn_in: 0,
            initial_state: InitialState::default(),
        }
    }
}

impl ChainParams {
    /// Checks the parameters against an `n`-unit model.
    pub fn validate(&self, n: usize) -> Result<(), BoltzError> {
        if self.flip == 0 || self.flip > n {
            return Err(BoltzError::Config(
                ErrorInfo::new("invalid-flip", "flip must lie in [1, N]")
                    .with_context("flip", self.flip)
                    .with_context("n", n),
            ));
        }
        if let InitialState::State { id } = self.initial_state {
            codec::decode(id, n).map_err(|err| {
                BoltzError::Config(
                    ErrorInfo::new("invalid-initial-state", err.info().message.clone())
                        .with_context("id", id)
                        .with_context("n", n),
                )
            })?;
        }
        Ok(())
    }
}

/// Starting configuration policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InitialState {
    /// Uniform over `{-1, +1}^N`.
    #[default]
    Random,
    /// Every spin `-1`.
    AllDown,
    /// The configuration decoded from a state identifier.
    State {
        /// State identifier in `[0, 2^N)`.
        id: u64,
    },
}
