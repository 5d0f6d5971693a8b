//! Stellar keypair generation.
//!
//! One candidate per call: an ed25519 secret from OS randomness, rendered
//! in the two strkey forms (`G...` public address, `S...` secret seed).

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use stellar_strkey::ed25519::{PrivateKey, PublicKey};

/// One generated (address, seed) pair under test against the query.
/// Discarded unless it matches.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub address: String,
    pub seed: String,
}

/// Generate a fresh keypair from `OsRng`. Each worker calls this
/// independently; there is no shared state.
pub fn random() -> Candidate {
    let mut secret = [0_u8; 32];
    OsRng.fill_bytes(&mut secret);
    let signing = SigningKey::from_bytes(&secret);
    Candidate {
        address: PublicKey(signing.verifying_key().to_bytes()).to_string(),
        seed: PrivateKey(secret).to_string(),
    }
}
