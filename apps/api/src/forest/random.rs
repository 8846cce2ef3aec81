//! Seeded Random — deterministic pseudo-random streams keyed by strings.
//!
//! Every draw the layout makes comes from a `SeededRandom` built from a
//! string key, so the same creator list always replays the same sequence.
//! The stream uses only wrapping `u32` arithmetic and an exact `u32 → f64`
//! conversion, which keeps it bit-identical across platforms.

/// Used when a key hashes to zero; an all-zero state would otherwise be the
/// first value of every stream seeded from such keys.
const ZERO_SEED_FALLBACK: u32 = 0x9E37_79B9;

/// Odd increment applied to the state before each mix.
const STATE_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32, the normalizer that maps a `u32` into `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Hashes a string key into a 32-bit seed (`h = h * 31 + unit`, wrapping).
///
/// Hashes UTF-16 code units so that keys agree with front-end code that
/// hashes JavaScript strings.
pub fn seed_hash(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// A stateful 32-bit xorshift-multiply stream.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Builds a stream from an arbitrary string key.
    pub fn seed(key: &str) -> Self {
        Self::from_seed(seed_hash(key))
    }

    /// Builds a stream from an already-hashed seed.
    pub fn from_seed(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_FALLBACK } else { seed };
        SeededRandom { state }
    }

    /// Returns the next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Returns a value in `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Returns an index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
