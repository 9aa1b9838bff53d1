use boltz_core::{CouplingMatrix, SpinModel};

/// Four weakly coupled units with a mixed field.
pub fn coupled_model() -> SpinModel {
    let w = CouplingMatrix::from_rows(&[
        vec![0.0, 0.4, -0.2, 0.1],
        vec![0.4, 0.0, 0.3, -0.25],
        vec![-0.2, 0.3, 0.0, 0.35],
        vec![0.1, -0.25, 0.35, 0.0],
    ])
    .unwrap();
    SpinModel::new(w, vec![0.3, -0.2, 0.1, 0.0], 4).unwrap()
}
