//! Random number generation for profile selection.
//!
//! RULE: Nothing in the selector may call a platform RNG directly.
//! All randomness flows through a SelectionRng owned by the selector.
//!
//! Production runs seed the generator from OS entropy, so every turn's draw
//! is independent of the previous ones. Tests and reproducible harness runs
//! pass a fixed seed instead.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The selector's generator.
pub struct SelectionRng {
    inner: Pcg64Mcg,
}

impl SelectionRng {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self { inner: Pcg64Mcg::from_entropy() }
    }

    /// Fixed seed. Two generators with the same seed draw the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None       => Self::from_entropy(),
        }
    }

    /// Uniform index in [0, len). None when `len` is zero.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.inner.gen_range(0..len))
    }
}

impl Default for SelectionRng {
    fn default() -> Self { Self::from_entropy() }
}
