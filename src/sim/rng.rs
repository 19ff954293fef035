//! Seeded counter-based generator
//!
//! 32-bit state advanced by a fixed odd constant, scrambled with xor/multiply
//! rounds. The same seed always yields the same stream on every platform.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Inclusive-exclusive range `[start, stop)` used for randomized durations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimRange {
    pub start: f64,
    pub stop: f64,
}

impl SimRange {
    pub const fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform float in `[0, 1)`
    pub fn rand(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// `floor(min + r * (max - min))`
    pub fn rand_range(&mut self, max: f64, min: f64) -> i64 {
        let r = self.rand();
        (min + r * (max - min)).floor() as i64
    }

    /// Index into a collection of `len` items; `len` must be non-zero
    pub fn rand_index(&mut self, len: usize) -> usize {
        (self.rand() * len as f64).floor() as usize
    }

    pub fn rand_range_r(&mut self, range: SimRange) -> f64 {
        let r = self.rand();
        (range.start + r * (range.stop - range.start)).floor()
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
