use std::fs;
use std::path::{Path, PathBuf};

use boltz_core::errors::ErrorInfo;
use boltz_core::{fresh_seed, BoltzError};
use boltz_mcmc::ChainParams;
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters of a moment estimation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Sampling backend.
    #[serde(default)]
    pub backend: BackendKind,
    /// Worker threads handed to the backend and to parallel chunk execution.
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    /// Number of chunks used by the RAM friendly entry point.
    #[serde(default = "default_parts")]
    pub parts: usize,
    /// Treatment of `num_samples mod parts`.
    #[serde(default)]
    pub remainder: RemainderPolicy,
    /// Whether chunks run one after another or on a rayon pool.
    #[serde(default)]
    pub chunk_execution: ChunkExecution,
    /// Per-chain parameters of the built-in backends.
    #[serde(default)]
    pub chain: ChainParams,
    /// Master seed policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Location of the accelerated backend.
    #[serde(default)]
    pub accelerated: AcceleratedConfig,
}

fn default_num_threads() -> usize {
    3
}

fn default_parts() -> usize {
    10
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            num_threads: default_num_threads(),
            parts: default_parts(),
            remainder: RemainderPolicy::default(),
            chunk_execution: ChunkExecution::default(),
            chain: ChainParams::default(),
            seed_policy: SeedPolicy::default(),
            accelerated: AcceleratedConfig::default(),
        }
    }
}

impl StatisticsConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, BoltzError> {
        let config: Self = serde_yaml::from_str(contents).map_err(|err| {
            BoltzError::Serde(ErrorInfo::new("boltz_stats.config_parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, BoltzError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            BoltzError::Serde(
                ErrorInfo::new(
                    "boltz_stats.config_read",
                    format!("failed to read configuration: {err}"),
                )
                .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| {
            let mut info = err.info().clone();
            info.context.insert("path".into(), path.display().to_string());
            match err {
                BoltzError::Serde(_) => BoltzError::Serde(info),
                _ => BoltzError::Config(info),
            }
        })
    }

    /// Checks the model independent fields.
    pub fn validate(&self) -> Result<(), BoltzError> {
        if self.num_threads == 0 {
            return Err(BoltzError::Config(
                ErrorInfo::new("boltz_stats.invalid_num_threads", "num_threads must be at least 1")
                    .with_context("num_threads", self.num_threads),
            ));
        }
        if self.parts == 0 {
            return Err(BoltzError::Config(
                ErrorInfo::new("boltz_stats.invalid_parts", "parts must be at least 1")
                    .with_context("parts", self.parts),
            ));
        }
        Ok(())
    }
}

/// Sampling backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Single Metropolis-Hastings chain on the calling thread.
    #[default]
    Reference,
    /// Independent chains on a rayon pool.
    Parallel,
    /// Native module loaded through the C ABI.
    Accelerated,
}

/// Treatment of the samples left over when `parts` does not divide the budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Every chunk gets `floor(num_samples / parts)`; the rest is dropped.
    #[default]
    Discard,
    /// The first `num_samples mod parts` chunks get one extra sample.
    Distribute,
}

/// Chunk scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkExecution {
    /// Chunks run in order on the calling thread.
    #[default]
    Sequential,
    /// Chunks run concurrently on a pool of `num_threads` workers.
    Parallel,
}

/// Seed selection for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed; a fresh one is drawn per call when omitted.
    #[serde(default)]
    pub master_seed: Option<u64>,
}

impl SeedPolicy {
    /// Returns the configured master seed or a fresh one.
    pub fn resolve(&self) -> u64 {
        self.master_seed.unwrap_or_else(fresh_seed)
    }
}

/// Location of the accelerated backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratedConfig {
    /// Explicit shared library path. Takes precedence over `env_var`.
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    /// Environment variable consulted when no explicit path is set.
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

fn default_env_var() -> String {
    boltz_host::DEFAULT_ENV_VAR.to_string()
}

impl Default for AcceleratedConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            env_var: default_env_var(),
        }
    }
}
