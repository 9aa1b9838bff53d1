use boltz_core::codec::{self, MAX_UNITS};
use boltz_core::SpinConfiguration;
use proptest::prelude::*;

#[test]
fn every_identifier_round_trips_for_small_systems() {
    for n in 0..=10usize {
        for id in 0..(1u64 << n) {
            let config = codec::decode(id, n).unwrap();
            assert_eq!(config.len(), n);
            assert_eq!(codec::encode(&config, n).unwrap(), id);
        }
    }
}

#[test]
fn batch_shapes_mirror_their_input() {
    let configs = codec::decode_many(&[0, 5, 7], 3).unwrap();
    assert_eq!(configs.len(), 3);
    assert_eq!(configs[0].spins(), &[-1, -1, -1]);
    assert_eq!(configs[1].spins(), &[1, -1, 1]);
    assert_eq!(configs[2].spins(), &[1, 1, 1]);
    assert_eq!(codec::encode_many(&configs, 3).unwrap(), vec![0, 5, 7]);

    let single = codec::decode(5, 3).unwrap();
    assert_eq!(single, configs[1]);
    assert!(codec::decode_many(&[], 3).unwrap().is_empty());
}

#[test]
fn invalid_inputs_are_rejected() {
    assert_eq!(
        codec::decode(8, 3).unwrap_err().info().code,
        "state-out-of-range"
    );
    assert_eq!(
        codec::decode(0, MAX_UNITS + 1).unwrap_err().info().code,
        "too-many-units"
    );
    assert_eq!(
        codec::encode_spins(&[1, 0, -1], 3).unwrap_err().info().code,
        "spin-value"
    );
    let config = SpinConfiguration::all_down(4);
    assert_eq!(
        codec::encode(&config, 3).unwrap_err().info().code,
        "length-mismatch"
    );
    assert_eq!(codec::state_count(11).unwrap(), 2048);
    assert!(codec::state_count(64).is_err());
}

#[test]
fn encoding_leaves_its_input_untouched() {
    let spins = vec![1i8, -1, -1, 1];
    let before = spins.clone();
    let id = codec::encode_spins(&spins, 4).unwrap();
    assert_eq!(id, 9);
    assert_eq!(spins, before);
}

proptest! {
    #[test]
    fn configurations_survive_encode_then_decode(spins in proptest::collection::vec(prop_oneof![Just(1i8), Just(-1i8)], 0..=64)) {
        let n = spins.len();
        let config = SpinConfiguration::try_from_values(spins).unwrap();
        let id = codec::encode(&config, n).unwrap();
        prop_assert_eq!(codec::decode(id, n).unwrap(), config);
    }

    #[test]
    fn wide_identifiers_survive_decode_then_encode(id in any::<u64>(), n in 1usize..=64) {
        let id = if n == 64 { id } else { id & ((1u64 << n) - 1) };
        let config = codec::decode(id, n).unwrap();
        prop_assert_eq!(codec::encode(&config, n).unwrap(), id);
    }
}
