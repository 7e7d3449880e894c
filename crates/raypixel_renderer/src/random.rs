//! Pseudo-random scalar source.
//!
//! A tiny 32-bit linear congruential generator. It is fast and cheap to
//! construct, which lets every scanline task own a private stream instead of
//! sharing one generator across threads.

use rand::{RngCore, SeedableRng};

/// Linear congruential generator: `state = 214013 * state + 2531011`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const MULTIPLIER: u32 = 214_013;
    const INCREMENT: u32 = 2_531_011;

    /// Create a generator from a raw 32-bit state.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Derive an independent stream for one scanline of one frame.
    ///
    /// The same `(seed, frame, row)` always yields the same stream, so a
    /// frame renders identically no matter how rows are scheduled.
    pub fn for_row(seed: u64, frame: u64, row: u32) -> Self {
        // splitmix64 finalizer over the combined key
        let mut z = seed
            ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ u64::from(row).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Self::new((z >> 32) as u32)
    }

    /// Current raw state.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RngCore for Lcg {
    /// Advance and return the full 32-bit state.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
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

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Draw a float in [0, 1) from the top 16 bits of the next 32-bit output.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    f64::from(rng.next_u32() >> 16) / 65536.0
}
