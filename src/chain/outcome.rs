//! Provably fair outcome derivation.
//!
//! Each game hash keys an HMAC-SHA256 over a public block hash. The first 32 bits
//! of the tag are mapped through an inverse-uniform transform with a house edge,
//! floored to two decimals and clamped at 1.00.

use crate::chain::hash_chain::game_hashes;
use crate::types::Outcome;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Public block hash used as the HMAC message for every game.
pub const BLOCK_HASH: &str = "0000000000000000001b34dc6a1e86083f95500b096231436e9b25cbdd0075c4";

/// Fraction of every payout retained by the house.
pub const HOUSE_EDGE: f64 = 0.01;

/// Lowest possible outcome.
pub const MIN_OUTCOME: Outcome = 1.0;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Derive the outcome of one game hash against `public_reference`.
pub fn derive_outcome(digest: &str, public_reference: &str) -> Outcome {
    let mut mac = HmacSha256::new_from_slice(digest.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(public_reference.as_bytes());
    let tag = mac.finalize().into_bytes();

    // First 8 hex characters are exactly the first four bytes, big endian
    let dec = u32::from_be_bytes([tag[0], tag[1], tag[2], tag[3]]);
    let raw = (TWO_POW_32 / (f64::from(dec) + 1.0)) * (1.0 - HOUSE_EDGE);
    let floored = (raw * 100.0).floor() / 100.0;

    floored.max(MIN_OUTCOME)
}

/// Build the full outcome chain for `seed`, most recent first.
pub fn outcome_chain(seed: &str, amount: i64) -> Vec<Outcome> {
    game_hashes(seed, amount)
        .iter()
        .map(|hash| derive_outcome(hash, BLOCK_HASH))
        .collect()
}

/// Two-decimal display form of an outcome.
pub fn format_outcome(outcome: Outcome) -> String {
    format!("{:.2}", outcome)
}
