//! Deterministic SplitMix32 generator used for reproducible system generation

use rand::{RngCore, SeedableRng};

const GOLDEN_GAMMA: u32 = 0x9E37_79B9;

/// Small integer-hash generator: identical seeds give bit-identical draws
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitMix32 {
    state: u32,
}

impl SplitMix32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Reset the generator to the start of the sequence for `seed`
    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 16)).wrapping_mul(0x21F0_AAAD);
        z = (z ^ (z >> 15)).wrapping_mul(0x735A_2D97);
        z ^ (z >> 15)
    }

    /// Uniform draw in [0, 1)
    ///
    /// Uses the top 24 bits: a full 32-bit value divided by 2^32 rounds up to
    /// exactly 1.0 in f32 for the largest outputs.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform draw in [min, max)
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

impl RngCore for SplitMix32 {
    fn next_u32(&mut self) -> u32 {
        SplitMix32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand::rand_core::impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for SplitMix32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
