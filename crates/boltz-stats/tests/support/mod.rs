#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use boltz_core::{
    BoltzError, CouplingMatrix, MomentEstimate, SampleOutcome, SampleRequest, Sampler, SpinModel,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

pub fn coupled_model() -> SpinModel {
    let w = CouplingMatrix::from_rows(&[
        vec![0.0, 0.3, -0.2],
        vec![0.3, 0.0, 0.25],
        vec![-0.2, 0.25, 0.0],
    ])
    .unwrap();
    SpinModel::new(w, vec![0.2, -0.4, 0.1], 3).unwrap()
}

/// Records every request and answers with uncorrelated zero-mean moments.
#[derive(Default)]
pub struct RecordingSampler {
    pub requests: Mutex<Vec<SampleRequest>>,
    /// Invocation (0-based) that fails, if any.
    pub fail_at: Option<usize>,
    calls: AtomicUsize,
}

impl RecordingSampler {
    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<SampleRequest> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort_by_key(|request| request.seed);
        requests
    }
}

impl Sampler for RecordingSampler {
    fn name(&self) -> &str {
        "recording"
    }

    fn sample(
        &self,
        model: &SpinModel,
        request: &SampleRequest,
    ) -> Result<SampleOutcome, BoltzError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(call) {
            return Err(BoltzError::backend("backend-failed", "injected failure"));
        }
        self.requests.lock().unwrap().push(*request);
        let n = model.n();
        let mut products = vec![0.0; n * n];
        for i in 0..n {
            products[i * n + i] = 1.0;
        }
        Ok(SampleOutcome {
            moments: MomentEstimate::from_parts(n, vec![0.0; n], products)?,
            acceptance_ratio: Some(0.25),
            samples: request.num_samples,
            degeneracy: None,
        })
    }
}
