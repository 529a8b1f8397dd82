use rand::{SeedableRng, rngs::StdRng};

/// Random source injected into grain and tile generation.
///
/// Any `rand::Rng` works at the call sites; this is the concrete generator sessions own.
pub type RandomSource = StdRng;

/// Deterministic source: the same seed replays the same grain and tile layout.
pub fn seeded(seed: u64) -> RandomSource {
    StdRng::seed_from_u64(seed)
}

/// Source seeded from the operating system.
pub fn from_entropy() -> RandomSource {
    StdRng::from_entropy()
}
