//! Bijection between integer state identifiers and spin configurations.
//!
//! Digit `k` of an identifier encodes unit `k`: bit `1` is spin `+1`, bit `0`
//! is spin `-1`. Identifiers are `u64`, which caps the unit count at 64.

use crate::errors::{BoltzError, ErrorInfo};
use crate::model::SpinConfiguration;

/// Widest system an identifier can address.
pub const MAX_UNITS: usize = 64;

/// Unit count callers conventionally pass when they have no model at hand.
pub const DEFAULT_UNITS: usize = 11;

fn check_units(n: usize) -> Result<(), BoltzError> {
    if n > MAX_UNITS {
        return Err(BoltzError::Codec(
            ErrorInfo::new("too-many-units", "state identifiers address at most 64 units")
                .with_context("n", n),
        ));
    }
    Ok(())
}

/// Number of states `2^n` of an `n`-unit system.
pub fn state_count(n: usize) -> Result<u64, BoltzError> {
    if n >= MAX_UNITS {
        return Err(BoltzError::Codec(
            ErrorInfo::new("too-many-units", "state count does not fit in u64")
                .with_context("n", n),
        ));
    }
    Ok(1u64 << n)
}

/// Decodes a single identifier into an `n`-unit configuration.
pub fn decode(id: u64, n: usize) -> Result<SpinConfiguration, BoltzError> {
    check_units(n)?;
    if n < MAX_UNITS && id >> n != 0 {
        return Err(BoltzError::Codec(
            ErrorInfo::new("state-out-of-range", "identifier exceeds 2^N - 1")
                .with_context("id", id)
                .with_context("n", n),
        ));
    }
    let spins = (0..n)
        .map(|k| if (id >> k) & 1 == 1 { 1 } else { -1 })
        .collect();
    SpinConfiguration::try_from_values(spins)
}

/// Decodes a batch of identifiers, one configuration per identifier.
pub fn decode_many(ids: &[u64], n: usize) -> Result<Vec<SpinConfiguration>, BoltzError> {
    ids.iter().map(|&id| decode(id, n)).collect()
}

/// Encodes a configuration of length `n` into its identifier.
pub fn encode(config: &SpinConfiguration, n: usize) -> Result<u64, BoltzError> {
    check_units(n)?;
    if config.len() != n {
        return Err(BoltzError::Codec(
            ErrorInfo::new("length-mismatch", "configuration length must equal N")
                .with_context("n", n)
                .with_context("len", config.len()),
        ));
    }
    Ok(config
        .spins()
        .iter()
        .enumerate()
        .filter(|(_, spin)| **spin == 1)
        .fold(0u64, |id, (k, _)| id | (1u64 << k)))
}

/// Encodes a batch of configurations.
pub fn encode_many(configs: &[SpinConfiguration], n: usize) -> Result<Vec<u64>, BoltzError> {
    configs.iter().map(|config| encode(config, n)).collect()
}

/// Encodes raw spin values, rejecting anything other than `+1` / `-1`.
pub fn encode_spins(spins: &[i8], n: usize) -> Result<u64, BoltzError> {
    let config = SpinConfiguration::try_from_values(spins.to_vec())?;
    encode(&config, n)
}
