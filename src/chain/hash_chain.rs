//! Repeated SHA-256 hashing of a seed.

use crate::types::{Digest, Seed};
use sha2::{Digest as _, Sha256};

/// Upper bound on up-front allocation; longer chains grow as they are built.
const MAX_PREALLOCATION: usize = 4096;

/// Hex-encoded SHA-256 of the UTF-8 bytes of `input`.
pub fn sha256_hex(input: &str) -> Digest {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Derive `count` digests: the first hashes the seed, each following one hashes
/// the previous digest's hex text.
pub fn digest_chain(seed: &str, count: usize) -> Vec<Digest> {
    let mut digests: Vec<Digest> = Vec::with_capacity(count.min(MAX_PREALLOCATION));
    for _ in 0..count {
        let next = match digests.last() {
            Some(previous) => sha256_hex(previous),
            None => sha256_hex(seed),
        };
        digests.push(next);
    }
    digests
}

/// The hashes that become chain outcomes for a request of `amount` games.
///
/// The seed itself is the most recent game, followed by `amount - 1` chained
/// digests. A non-positive amount yields nothing.
pub fn game_hashes(seed: &str, amount: i64) -> Vec<Seed> {
    if amount <= 0 {
        return Vec::new();
    }
    let capacity = usize::try_from(amount).map_or(MAX_PREALLOCATION, |n| n.min(MAX_PREALLOCATION));
    let mut hashes = Vec::with_capacity(capacity);
    hashes.push(seed.to_string());
    hashes.extend(digest_chain(seed, (amount - 1) as usize));
    hashes
}
