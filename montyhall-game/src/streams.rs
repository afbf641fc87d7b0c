//! Deterministic per-round random streams derived from a user seed.
//!
//! The user seed is expanded into a 256-bit ChaCha key with a domain-separated
//! HMAC. Round `i` then draws from ChaCha stream `i` under that key, so any
//! round can be replayed on its own and rounds can run on any thread without
//! sharing generator state.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

const ROUND_DOMAIN: &[u8] = b"montyhall.rounds.v1";

/// Key material shared by every round of one seeded run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStreams {
    seed: u64,
    key: [u8; 32],
}

impl RoundStreams {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            key: derive_stream_key(seed, ROUND_DOMAIN),
        }
    }

    /// The seed these streams were derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh generator positioned at the start of round `index`'s stream.
    #[must_use]
    pub fn round(&self, index: u64) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::from_seed(self.key);
        rng.set_stream(index);
        rng
    }
}

fn derive_stream_key(user_seed: u64, domain_tag: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("HMAC accepts any key length");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}
