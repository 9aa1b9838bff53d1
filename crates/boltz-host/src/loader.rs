use std::env;
use std::path::{Path, PathBuf};

use boltz_core::errors::{BoltzError, ErrorInfo};
use tracing::debug;

use crate::abi::{SamplerPluginInfo, SAMPLER_ABI_VERSION};

pub const DEFAULT_ENV_VAR: &str = "BOLTZ_ACCELERATED_SAMPLER";

/// Locates the accelerated library: `explicit` first, else the path held by
/// the environment variable `env_var`. The file must exist.
pub fn resolve_library_path(explicit: Option<&Path>, env_var: &str) -> Result<PathBuf, BoltzError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(env_var) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => {
                return Err(BoltzError::Backend(
                    ErrorInfo::new(
                        "boltz_host.library_unset",
                        "no accelerated sampler library configured",
                    )
                        .with_context("env_var", env_var)
                        .with_hint(format!(
                            "set {env_var} or accelerated.library_path to the shared library"
                        )),
                ))
            }
        },
    };
    if !path.is_file() {
        return Err(BoltzError::Backend(
            ErrorInfo::new("boltz_host.library_missing", "accelerated sampler library not found")
                .with_context("path", path.display()),
        ));
    }
    debug!(path = %path.display(), "resolved accelerated sampler library");
    Ok(path)
}

pub fn verify_abi_compat(info: &SamplerPluginInfo) -> Result<(), BoltzError> {
    if info.abi_version != SAMPLER_ABI_VERSION {
        return Err(BoltzError::Backend(
            ErrorInfo::new(
                "boltz_host.abi_mismatch",
                format!(
                    "sampler ABI {} is incompatible with host ABI {}",
                    info.abi_version, SAMPLER_ABI_VERSION
                ),
            )
            .with_context("expected", SAMPLER_ABI_VERSION)
            .with_context("actual", info.abi_version),
        ));
    }
    Ok(())
}
