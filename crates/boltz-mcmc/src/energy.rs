use boltz_core::{SpinConfiguration, SpinModel};

/// Energy `E(s) = -1/2 sum_{i != j} W_ij s_i s_j - sum_i h_i s_i`.
pub fn energy(model: &SpinModel, state: &SpinConfiguration) -> f64 {
    let spins = state.spins();
    let mut pair = 0.0;
    let mut linear = 0.0;
    for (i, &si) in spins.iter().enumerate() {
        let si = f64::from(si);
        let row = model.couplings().row(i);
        let coupled: f64 = spins
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, &sj)| row[j] * f64::from(sj))
            .sum();
        pair += si * coupled;
        linear += model.field()[i] * si;
    }
    -0.5 * pair - linear
}

/// Local field `sum_{j != i} (W_ij + W_ji) s_j` acting on unit `i`.
fn local_field(model: &SpinModel, state: &SpinConfiguration, i: usize) -> f64 {
    model
        .interaction_row(i)
        .iter()
        .zip(state.spins())
        .map(|(a, &s)| a * f64::from(s))
        .sum()
}

/// Energy change of flipping unit `i`, in O(N).
pub fn flip_delta(model: &SpinModel, state: &SpinConfiguration, i: usize) -> f64 {
    let si = f64::from(state.get(i));
    si * local_field(model, state, i) + 2.0 * model.field()[i] * si
}

/// Energy change of flipping every unit in `indices` at once.
///
/// `indices` must be distinct. The pairwise correction removes the coupling
/// terms between flipped units, which keep their relative sign.
pub fn multi_flip_delta(model: &SpinModel, state: &SpinConfiguration, indices: &[usize]) -> f64 {
    let mut delta: f64 = indices.iter().map(|&i| flip_delta(model, state, i)).sum();
    for (a, &i) in indices.iter().enumerate() {
        let si = f64::from(state.get(i));
        let row = model.interaction_row(i);
        for &j in &indices[a + 1..] {
            delta -= 2.0 * row[j] * si * f64::from(state.get(j));
        }
    }
    delta
}
