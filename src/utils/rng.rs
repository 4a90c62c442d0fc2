use rand_chacha::ChaCha20Rng;
use rand::SeedableRng;

/// Deterministic per-temperature RNG stream derived from a master seed.
///
/// SplitMix64 finaliser over `master ^ (index · golden ratio)`, so that
/// neighbouring indices get unrelated seeds.
pub fn stream_rng(master: u64, index: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(mix_seed(master, index))
}

pub fn mix_seed(master: u64, index: usize) -> u64 {
    let mut x = master ^ (index as u64).wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
