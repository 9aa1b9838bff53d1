mod support;

use std::path::PathBuf;

use boltz_core::{BoltzError, SpinModel};
use boltz_stats::{
    calculate_statistics, calculate_statistics_ram_friendlier, select_backend, BackendKind,
    SeedPolicy, StatisticsConfig,
};

fn seeded(backend: BackendKind) -> StatisticsConfig {
    StatisticsConfig {
        backend,
        seed_policy: SeedPolicy {
            master_seed: Some(7),
        },
        ..StatisticsConfig::default()
    }
}

#[test]
fn built_in_backends_are_selected_by_kind() {
    assert_eq!(select_backend(&seeded(BackendKind::Reference)).unwrap().name(), "reference");
    assert_eq!(select_backend(&seeded(BackendKind::Parallel)).unwrap().name(), "parallel");
}

#[test]
fn unavailable_accelerated_backend_is_an_error() {
    let mut config = seeded(BackendKind::Accelerated);
    config.accelerated.env_var = "BOLTZ_TEST_STATS_SAMPLER_UNSET".into();
    std::env::remove_var(&config.accelerated.env_var);

    let Err(err) = select_backend(&config) else {
        panic!("accelerated backend must not fall back");
    };
    assert!(matches!(err, BoltzError::Backend(_)));
    assert_eq!(err.info().code, "boltz_host.library_unset");

    let model = support::coupled_model();
    let err = calculate_statistics(&model, 1_000, &config).unwrap_err();
    assert_eq!(err.info().code, "boltz_host.library_unset");
    let err = calculate_statistics_ram_friendlier(&model, 1_000, &config).unwrap_err();
    assert_eq!(err.info().code, "boltz_host.library_unset");

    config.accelerated.library_path = Some(PathBuf::from("/nonexistent/libboltz_sampler.so"));
    let err = calculate_statistics(&model, 1_000, &config).unwrap_err();
    assert_eq!(err.info().code, "boltz_host.library_missing");
}

#[test]
fn entry_points_estimate_a_free_spin() {
    support::init_tracing();
    let model = SpinModel::independent(vec![0.5]).unwrap();
    let expected = 0.5f64.tanh();
    for backend in [BackendKind::Reference, BackendKind::Parallel] {
        let config = seeded(backend);
        let direct = calculate_statistics(&model, 150_000, &config).unwrap();
        assert!((direct.s()[0] - expected).abs() < 0.05);
        let chunked = calculate_statistics_ram_friendlier(&model, 150_000, &config).unwrap();
        assert!((chunked.s()[0] - expected).abs() < 0.05);
        assert_eq!(chunked.product(0, 0), 1.0);
    }
}

#[test]
fn same_seed_gives_the_same_estimate() {
    let model = support::coupled_model();
    let config = seeded(BackendKind::Parallel);
    let a = calculate_statistics_ram_friendlier(&model, 20_000, &config).unwrap();
    let b = calculate_statistics_ram_friendlier(&model, 20_000, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn chain_parameters_are_checked_against_the_model() {
    let mut config = seeded(BackendKind::Reference);
    config.chain.flip = 4;
    let err = calculate_statistics(&support::coupled_model(), 1_000, &config).unwrap_err();
    assert_eq!(err.info().code, "invalid-flip");
}
