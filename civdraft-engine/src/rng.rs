//! Seeded random stream used by every generation run.
//!
//! A textual seed is hashed into a 32-bit state (avalanche-mixed per UTF-16
//! code unit) which then drives a 32-bit counter-based generator. The same
//! seed string always reproduces the same stream.
use rand::{RngCore, SeedableRng};

use crate::constants::{
    SEED_HASH_BASIS, SEED_HASH_MULTIPLIER, SEED_MIX_A, SEED_MIX_B, STREAM_INCREMENT, UNIT_SCALE,
};

/// Hash a seed string into the initial generator state.
#[must_use]
pub fn hash_seed(seed: &str) -> u32 {
    let units: Vec<u16> = seed.encode_utf16().collect();
    let len = u32::try_from(units.len()).unwrap_or(u32::MAX);
    let mut h = SEED_HASH_BASIS ^ len;
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(SEED_HASH_MULTIPLIER);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(SEED_MIX_A);
    h = (h ^ (h >> 13)).wrapping_mul(SEED_MIX_B);
    h ^ (h >> 16)
}

/// Deterministic draft RNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRng {
    state: u32,
}

impl DraftRng {
    /// Build a fresh stream from a seed string.
    #[must_use]
    pub fn from_seed_str(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Next uniform float in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        next_unit(self)
    }
}

impl RngCore for DraftRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STREAM_INCREMENT);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for DraftRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u32::from_le_bytes(seed),
        }
    }
}

/// Draw a uniform float in `[0, 1)` from the top of any 32-bit stream.
pub fn next_unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / UNIT_SCALE
}

/// Uniform index draw: `floor(unit * len)`. Returns `None` for an empty bag.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn pick_index<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (next_unit(rng) * len as f64).floor() as usize;
    Some(idx.min(len - 1))
}
