//! Host side of accelerated sampling backends.
//!
//! A backend is a native module exporting `boltz_sampler_info` and
//! `boltz_sampler_run` with the layouts in [`abi`]. The host resolves its
//! location, checks the ABI version and exposes it as a regular
//! [`boltz_core::Sampler`].

pub mod abi;
mod loader;
mod sampler;

pub use abi::{
    AbiStatus, AbiString, SampleBuffers, SampleJob, SampleRunFn, SamplerInfoFn,
    SamplerPluginInfo, SAMPLER_ABI_VERSION,
};
pub use loader::{resolve_library_path, verify_abi_compat, DEFAULT_ENV_VAR};
pub use sampler::AcceleratedSampler;
