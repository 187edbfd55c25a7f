//! Random password generation.
//!
//! Each policy draws every character independently and uniformly from its
//! charset. The generator owns its RNG rather than touching process-global
//! state, so a seed can be injected for deterministic tests.
//!
//! `Generator::new` seeds once from the wall clock at second granularity,
//! so the startup time predicts the whole stream. Known limitation: not
//! suitable for credentials that matter. A hardened variant would seed from
//! the OS entropy source.

use crate::protocol::GenerateKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIGITS: &[u8] = b"0123456789";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const SECURE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789!@#$%^&*()";

/// Password generator with an owned, seedable RNG.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    /// Create a generator seeded from the wall clock (second granularity).
    pub fn new() -> Self {
        Self::with_seed(chrono::Utc::now().timestamp() as u64)
    }

    /// Create a generator with a fixed seed. Same seed, same passwords.
    pub fn with_seed(seed: u64) -> Self {
        Generator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a password of exactly `length` characters under `kind`'s
    /// policy.
    pub fn generate(&mut self, kind: GenerateKind, length: usize) -> String {
        (0..length)
            .map(|_| match kind {
                GenerateKind::Numeric => self.pick(DIGITS),
                GenerateKind::Alpha => self.pick(LOWERCASE),
                GenerateKind::Mixed => {
                    if self.rng.random_bool(0.5) {
                        self.pick(LOWERCASE)
                    } else {
                        self.pick(DIGITS)
                    }
                }
                GenerateKind::Secure => self.pick(SECURE),
            })
            .collect()
    }

    fn pick(&mut self, charset: &[u8]) -> char {
        let idx = self.rng.random_range(0..charset.len());
        charset[idx] as char
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
