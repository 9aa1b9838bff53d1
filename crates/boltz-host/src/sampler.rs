use std::path::{Path, PathBuf};
use std::time::Instant;

use boltz_core::errors::{BoltzError, ErrorInfo};
use boltz_core::{Degeneracy, MomentEstimate, SampleOutcome, SampleRequest, Sampler, SpinModel};
use tracing::{info, warn};

use crate::abi::{SampleBuffers, SampleJob, SampleRunFn, SamplerInfoFn};
use crate::loader::{resolve_library_path, verify_abi_compat};

const OUTPUT_TOLERANCE: f64 = 1e-9;

/// Sampling backend served by a native module through the C ABI.
pub struct AcceleratedSampler {
    name: String,
    origin: Option<PathBuf>,
    run: SampleRunFn,
    // Keeps `run` alive for dynamically loaded modules.
    #[cfg(feature = "dynamic")]
    _library: Option<libloading::Library>,
}

impl std::fmt::Debug for AcceleratedSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceleratedSampler")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl AcceleratedSampler {
    /// Wraps entrypoints linked into the current binary.
    ///
    /// # Safety
    ///
    /// Both functions must honour the `boltz_sampler_*` contract: `info`
    /// returns a name valid for the program lifetime and `run` writes only
    /// within the buffers it is handed.
    pub unsafe fn from_entrypoints(
        info: SamplerInfoFn,
        run: SampleRunFn,
    ) -> Result<Self, BoltzError> {
        let (name, run) = Self::handshake(info, run)?;
        Ok(Self {
            name,
            origin: None,
            run,
            #[cfg(feature = "dynamic")]
            _library: None,
        })
    }

    /// Resolves the library from `explicit` or `env_var` and loads it.
    pub fn locate(explicit: Option<&Path>, env_var: &str) -> Result<Self, BoltzError> {
        let path = resolve_library_path(explicit, env_var)?;
        Self::open(&path)
    }

    /// Loads the shared library at `path` and checks its ABI version.
    #[cfg(feature = "dynamic")]
    pub fn open(path: &Path) -> Result<Self, BoltzError> {
        let symbol_error = |symbol: &[u8], err: libloading::Error| {
            BoltzError::Backend(
                ErrorInfo::new("boltz_host.missing_symbol", err.to_string())
                    .with_context("path", path.display())
                    .with_context(
                        "symbol",
                        String::from_utf8_lossy(&symbol[..symbol.len() - 1]),
                    ),
            )
        };
        // SAFETY: loading runs the library initialisers; the module is trusted
        // once the operator points the host at it.
        let library = unsafe { libloading::Library::new(path) }.map_err(|err| {
            BoltzError::Backend(
                ErrorInfo::new("boltz_host.library_load", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        // SAFETY: symbol types follow the published ABI; the function pointers
        // are only used while `library` is held by the returned sampler.
        let (info, run) = unsafe {
            let info = *library
                .get::<SamplerInfoFn>(crate::abi::INFO_SYMBOL)
                .map_err(|err| symbol_error(crate::abi::INFO_SYMBOL, err))?;
            let run = *library
                .get::<SampleRunFn>(crate::abi::RUN_SYMBOL)
                .map_err(|err| symbol_error(crate::abi::RUN_SYMBOL, err))?;
            (info, run)
        };
        // SAFETY: see above.
        let (name, run) = unsafe { Self::handshake(info, run) }.map_err(|err| {
            let mut detail = err.info().clone();
            detail.context.insert("path".into(), path.display().to_string());
            BoltzError::Backend(detail)
        })?;
        info!(backend = %name, path = %path.display(), "loaded accelerated sampler");
        Ok(Self {
            name,
            origin: Some(path.to_path_buf()),
            run,
            _library: Some(library),
        })
    }

    #[cfg(not(feature = "dynamic"))]
    pub fn open(path: &Path) -> Result<Self, BoltzError> {
        Err(BoltzError::Backend(
            ErrorInfo::new("boltz_host.library_load", "dynamic loading is disabled in this build")
                .with_context("path", path.display())
                .with_hint("enable the `dynamic` feature of boltz-host"),
        ))
    }

    unsafe fn handshake(
        info: SamplerInfoFn,
        run: SampleRunFn,
    ) -> Result<(String, SampleRunFn), BoltzError> {
        let info = info();
        verify_abi_compat(&info)?;
        let name = info.name.as_str()?;
        let name = if name.is_empty() { "accelerated" } else { name };
        Ok((name.to_string(), run))
    }

    /// Library the sampler was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl Sampler for AcceleratedSampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError> {
        request.validate()?;
        let n = model.n();
        let mut mean_spins = vec![f64::NAN; n];
        let mut mean_products = vec![f64::NAN; n * n];
        let mut acceptance = f64::NAN;
        let job = SampleJob {
            couplings: model.couplings().as_slice().as_ptr(),
            field: model.field().as_ptr(),
            n,
            num_samples: request.num_samples,
            num_threads: request.num_threads,
            seed: request.seed,
        };
        let buffers = SampleBuffers {
            mean_spins: mean_spins.as_mut_ptr(),
            mean_products: mean_products.as_mut_ptr(),
            acceptance_ratio: &mut acceptance,
        };

        let start = Instant::now();
        // SAFETY: job inputs borrow the model and the buffers are sized per the
        // ABI; both outlive the call.
        let status = unsafe { (self.run)(&job, &buffers) };
        if !status.is_ok() {
            // SAFETY: the message is owned by the plugin and valid after return.
            let message = unsafe { status.message.as_str() }.unwrap_or_default();
            return Err(BoltzError::Backend(
                ErrorInfo::new(
                    "boltz_host.run_failed",
                    format!("accelerated sampler failed: {message}"),
                )
                .with_context("backend", &self.name)
                .with_context("status", status.code),
            ));
        }

        let invalid_output = |err: BoltzError| {
            BoltzError::Backend(
                ErrorInfo::new("boltz_host.invalid_output", err.info().message.clone())
                    .with_context("backend", &self.name)
                    .with_context("check", &err.info().code),
            )
        };
        let moments =
            MomentEstimate::from_parts(n, mean_spins, mean_products).map_err(invalid_output)?;
        moments
            .check_invariants(OUTPUT_TOLERANCE)
            .map_err(invalid_output)?;
        let acceptance_ratio = if acceptance.is_nan() {
            None
        } else if (0.0..=1.0).contains(&acceptance) {
            Some(acceptance)
        } else {
            return Err(BoltzError::Backend(
                ErrorInfo::new("boltz_host.invalid_output", "acceptance ratio outside [0, 1]")
                    .with_context("backend", &self.name)
                    .with_context("acceptance", acceptance),
            ));
        };

        info!(
            backend = %self.name,
            samples = request.num_samples,
            threads = request.num_threads,
            acceptance_pct = acceptance_ratio.map(|ratio| ratio * 100.0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "accelerated run finished"
        );
        let degeneracy = acceptance_ratio.and_then(|ratio| {
            if ratio == 0.0 {
                Some(Degeneracy::NoneAccepted)
            } else if ratio == 1.0 {
                Some(Degeneracy::AllAccepted)
            } else {
                None
            }
        });
        if let Some(kind) = degeneracy {
            warn!(?kind, backend = %self.name, "degenerate acceptance reported by backend");
        }
        Ok(SampleOutcome {
            moments,
            acceptance_ratio,
            samples: request.num_samples,
            degeneracy,
        })
    }
}
