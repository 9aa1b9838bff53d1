use std::io::Write;
use std::path::PathBuf;

use boltz_core::BoltzError;
use boltz_mcmc::InitialState;
use boltz_stats::{BackendKind, ChunkExecution, RemainderPolicy, StatisticsConfig};

const FULL: &str = r#"
backend: parallel
num_threads: 4
parts: 8
remainder: distribute
chunk_execution: parallel
chain:
  flip: 2
  burn_in: 100
  initial_state: { type: state, id: 5 }
seed_policy:
  master_seed: 42
accelerated:
  library_path: /opt/boltz/libsampler.so
  env_var: CUSTOM_SAMPLER
"#;

#[test]
fn empty_document_yields_defaults() {
    let config = StatisticsConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, StatisticsConfig::default());
    assert_eq!(config.backend, BackendKind::Reference);
    assert_eq!(config.num_threads, 3);
    assert_eq!(config.parts, 10);
    assert_eq!(config.remainder, RemainderPolicy::Discard);
    assert_eq!(config.chunk_execution, ChunkExecution::Sequential);
    assert_eq!(config.seed_policy.master_seed, None);
    assert_eq!(config.accelerated.env_var, "BOLTZ_ACCELERATED_SAMPLER");
}

#[test]
fn full_document_parses() {
    let config = StatisticsConfig::from_yaml_str(FULL).unwrap();
    assert_eq!(config.backend, BackendKind::Parallel);
    assert_eq!(config.num_threads, 4);
    assert_eq!(config.parts, 8);
    assert_eq!(config.remainder, RemainderPolicy::Distribute);
    assert_eq!(config.chunk_execution, ChunkExecution::Parallel);
    assert_eq!(config.chain.flip, 2);
    assert_eq!(config.chain.burn_in, 100);
    assert_eq!(config.chain.initial_state, InitialState::State { id: 5 });
    assert_eq!(config.seed_policy.resolve(), 42);
    assert_eq!(
        config.accelerated.library_path,
        Some(PathBuf::from("/opt/boltz/libsampler.so"))
    );
    assert_eq!(config.accelerated.env_var, "CUSTOM_SAMPLER");
}

#[test]
fn loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL.as_bytes()).unwrap();
    let config = StatisticsConfig::load(file.path()).unwrap();
    assert_eq!(config.parts, 8);
}

#[test]
fn io_and_parse_failures_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let err = StatisticsConfig::load(&missing).unwrap_err();
    assert!(matches!(err, BoltzError::Serde(_)));
    assert_eq!(err.info().code, "boltz_stats.config_read");
    assert!(err.info().context.contains_key("path"));

    let broken = dir.path().join("broken.yaml");
    std::fs::write(&broken, "backend: [unclosed").unwrap();
    let err = StatisticsConfig::load(&broken).unwrap_err();
    assert!(matches!(err, BoltzError::Serde(_)));
    assert_eq!(err.info().code, "boltz_stats.config_parse");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn unknown_backends_and_zero_parts_are_rejected() {
    let err = StatisticsConfig::from_yaml_str("backend: quantum\n").unwrap_err();
    assert_eq!(err.info().code, "boltz_stats.config_parse");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.yaml");
    std::fs::write(&path, "parts: 0\n").unwrap();
    let err = StatisticsConfig::load(&path).unwrap_err();
    assert!(matches!(err, BoltzError::Config(_)));
    assert_eq!(err.info().code, "boltz_stats.invalid_parts");
}
