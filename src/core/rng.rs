//! Room-code generation.
//!
//! ## Key Features
//!
//! - **Uniform**: each character is drawn uniformly from `A-Z0-9`
//! - **Deterministic when seeded**: same seed, same sequence of codes
//! - **OS entropy by default**: unseeded generators are unpredictable
//!
//! A six-character code gives 36^6 ≈ 2.2 billion possibilities. Collisions
//! are not detected; at that size they are accepted as negligible.
//!
//! ```
//! use ttt_sync::core::RoomCodeRng;
//!
//! let mut a = RoomCodeRng::new(7);
//! let mut b = RoomCodeRng::new(7);
//! assert_eq!(a.room_code(6), b.room_code(6));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Characters room codes are drawn from.
pub const ROOM_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// ChaCha8-backed generator for room codes.
#[derive(Clone, Debug)]
pub struct RoomCodeRng {
    inner: ChaCha8Rng,
}

impl RoomCodeRng {
    /// Seeded generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded if `seed` is set, otherwise from entropy.
    #[must_use]
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Draw a code of `len` characters.
    pub fn room_code(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let index = self.inner.gen_range(0..ROOM_CODE_ALPHABET.len());
                char::from(ROOM_CODE_ALPHABET[index])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = RoomCodeRng::new(42);
        let mut rng2 = RoomCodeRng::new(42);

        for _ in 0..20 {
            assert_eq!(rng1.room_code(6), rng2.room_code(6));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = RoomCodeRng::new(1);
        let mut rng2 = RoomCodeRng::new(2);

        let seq1: Vec<_> = (0..5).map(|_| rng1.room_code(6)).collect();
        let seq2: Vec<_> = (0..5).map(|_| rng2.room_code(6)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_codes_use_alphabet_and_length() {
        let mut rng = RoomCodeRng::new(9);
        for len in [1, 6, 12] {
            let code = rng.room_code(len);
            assert_eq!(code.len(), len);
            assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_successive_codes_differ() {
        let mut rng = RoomCodeRng::new(3);
        let codes: Vec<_> = (0..50).map(|_| rng.room_code(6)).collect();
        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
