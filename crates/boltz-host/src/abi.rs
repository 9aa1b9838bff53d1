use std::os::raw::c_char;

use boltz_core::errors::{BoltzError, ErrorInfo};

pub const SAMPLER_ABI_VERSION: u32 = 1;

/// Exported symbol returning [`SamplerPluginInfo`].
pub const INFO_SYMBOL: &[u8] = b"boltz_sampler_info\0";
/// Exported symbol running one sampling job.
pub const RUN_SYMBOL: &[u8] = b"boltz_sampler_run\0";

/// Result returned by plugin entrypoints. `code == 0` means success.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct AbiStatus {
    pub code: i32,
    pub message: AbiString,
}

impl AbiStatus {
    pub const OK: Self = Self {
        code: 0,
        message: AbiString::EMPTY,
    };

    pub fn is_ok(self) -> bool {
        self.code == 0
    }
}

/// Borrowed UTF-8 string owned by the plugin.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct AbiString {
    pub ptr: *const c_char,
    pub len: usize,
}

impl AbiString {
    pub const EMPTY: Self = Self {
        ptr: std::ptr::null(),
        len: 0,
    };

    /// Builds a view over a static string, for plugins written in Rust.
    pub const fn from_static(value: &'static str) -> Self {
        Self {
            ptr: value.as_ptr() as *const c_char,
            len: value.len(),
        }
    }

    /// # Safety
    ///
    /// `ptr` must be null or point to `len` readable bytes that outlive `'a`.
    pub unsafe fn as_str<'a>(self) -> Result<&'a str, BoltzError> {
        if self.ptr.is_null() {
            return Ok("");
        }
        let slice = std::slice::from_raw_parts(self.ptr as *const u8, self.len);
        std::str::from_utf8(slice).map_err(|err| {
            BoltzError::Backend(ErrorInfo::new("boltz_host.invalid_utf8", err.to_string()))
        })
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct SamplerPluginInfo {
    pub abi_version: u32,
    pub name: AbiString,
}

/// Inputs of one sampling job. `couplings` is row-major `n x n`, `field` has
/// `n` entries; both stay valid for the duration of the call.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct SampleJob {
    pub couplings: *const f64,
    pub field: *const f64,
    pub n: usize,
    pub num_samples: usize,
    pub num_threads: usize,
    pub seed: u64,
}

/// Host-owned output buffers: `n` mean spins, `n * n` mean products and one
/// acceptance ratio, left as NaN when the backend does not track it.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct SampleBuffers {
    pub mean_spins: *mut f64,
    pub mean_products: *mut f64,
    pub acceptance_ratio: *mut f64,
}

pub type SamplerInfoFn = unsafe extern "C" fn() -> SamplerPluginInfo;
pub type SampleRunFn = unsafe extern "C" fn(*const SampleJob, *const SampleBuffers) -> AbiStatus;
