use boltz_core::errors::{BoltzError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("n", 3)
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = BoltzError::Config(sample_info("dimension-mismatch", "W must be N x N"));
    assert_eq!(err.info().code, "dimension-mismatch");
    assert_eq!(err.info().context.get("n").map(String::as_str), Some("3"));
}

#[test]
fn codec_error_surface() {
    let err = BoltzError::Codec(sample_info("spin-value", "bad spin"));
    assert_eq!(err.info().code, "spin-value");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn backend_error_surface() {
    let err = BoltzError::Backend(sample_info("backend-unset", "no path"));
    assert_eq!(err.info().code, "backend-unset");
    assert!(err.to_string().starts_with("backend unavailable:"));
}

#[test]
fn serde_error_surface() {
    let err = BoltzError::Serde(sample_info("config-parse", "bad yaml"));
    assert_eq!(err.info().code, "config-parse");
}

#[test]
fn display_lists_context_and_hint() {
    let info = ErrorInfo::new("invalid-flip", "flip exceeds N")
        .with_context("flip", 4)
        .with_context("n", 2)
        .with_hint("use flip <= N");
    assert_eq!(
        info.to_string(),
        "flip exceeds N (code: invalid-flip) | context: [flip=4, n=2] | hint: use flip <= N"
    );
}
