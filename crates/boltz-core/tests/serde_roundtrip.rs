use boltz_core::errors::{BoltzError, ErrorInfo};
use boltz_core::{MomentEstimate, SampleOutcome, SpinConfiguration};

#[test]
fn outcome_round_trips_json() {
    let outcome = SampleOutcome {
        moments: MomentEstimate::from_parts(2, vec![0.25, -0.5], vec![1.0, 0.1, 0.1, 1.0])
            .unwrap(),
        acceptance_ratio: Some(0.4),
        samples: 1000,
        degeneracy: None,
    };
    let json = serde_json::to_string_pretty(&outcome).expect("serialize");
    let decoded: SampleOutcome = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, outcome);
}

#[test]
fn errors_serialise_with_family_tag() {
    let err = BoltzError::Config(ErrorInfo::new("invalid-parts", "parts must be >= 1"));
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["family"], "Config");
    assert_eq!(value["detail"]["code"], "invalid-parts");
}

#[test]
fn configurations_reject_invalid_spins_on_deserialise() {
    let ok: SpinConfiguration = serde_json::from_str("[1, -1, 1]").expect("valid spins");
    assert_eq!(ok.spins(), &[1, -1, 1]);
    assert!(serde_json::from_str::<SpinConfiguration>("[1, 0]").is_err());
}
