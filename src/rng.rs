//! Injectable randomness.
//!
//! Every randomized engine function takes `&mut R where R: RngCore`, so
//! tests pass a seeded [`SimpleRng`] and get reproducible weeks. Only
//! [`SimpleRng::from_clock`] touches wall-clock time, and only the
//! session constructor calls it.

use rand_core::{impls, RngCore, SeedableRng};

const LCG_MUL: u64 = 6364136223846793005;
const LCG_INC: u64 = 1442695040888963407;

/// Small 64-bit LCG with an output mix. Fast, serializable, good enough
/// for game balance rolls; not for anything security related.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the host clock (`Date.now()` in the browser).
    pub fn from_clock() -> Self {
        Self::new(clock_seed())
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for SimpleRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

// ── Sampling helpers ─────────────────────────────────────────────────

/// Uniform f64 in [0, 1).
#[inline]
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Bernoulli(p); `p` is clamped to [0, 1], NaN never fires.
#[inline]
pub fn chance<R: RngCore + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() {
        return false;
    }
    unit(rng) < p.clamp(0.0, 1.0)
}

/// Uniform f64 in [low, high).
#[inline]
pub fn uniform<R: RngCore + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + unit(rng) * (high - low)
}

/// Uniform integer in [low, high]. Returns `low` when the range is empty.
pub fn range_inclusive<R: RngCore + ?Sized>(rng: &mut R, low: u32, high: u32) -> u32 {
    if high <= low {
        return low;
    }
    let span = (high - low) as u64 + 1;
    low + (rng.next_u64() % span) as u32
}

/// Random element of a slice.
pub fn pick<'a, T, R: RngCore + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let i = (rng.next_u64() % items.len() as u64) as usize;
    items.get(i)
}
