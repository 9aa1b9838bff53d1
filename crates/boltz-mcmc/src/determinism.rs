use boltz_core::derive_substream_seed;

/// Derives the deterministic seed of chain `chain_index` within one request.
pub fn chain_seed(master_seed: u64, chain_index: usize) -> u64 {
    derive_substream_seed(master_seed, chain_index as u64)
}

/// Derives the deterministic seed of chunk `part_index` of a split run.
pub fn chunk_seed(master_seed: u64, part_index: usize) -> u64 {
    derive_substream_seed(master_seed ^ 0xA5A5_A5A5_A5A5_A5A5, part_index as u64)
}

/// Splits `total` into `parts` budgets that differ by at most one, the
/// larger ones first.
pub fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let extra = total % parts;
    (0..parts)
        .map(|index| base + usize::from(index < extra))
        .collect()
}
