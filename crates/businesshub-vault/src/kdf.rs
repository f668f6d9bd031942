// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA512 derivation of the per-secret key.
//!
//! Each secret gets its own 64-byte random salt, so the derived key differs
//! for every record even though the master key is shared. The iteration
//! count is fixed: records do not carry it.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroizing;

/// PBKDF2 iteration count applied to every record.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the per-secret salt in bytes.
pub const SALT_LEN: usize = 64;

/// Length of the derived AES-256 key in bytes.
pub const DERIVED_KEY_LEN: usize = 32;

const ROUNDS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(rounds) => rounds,
    None => panic!("PBKDF2_ITERATIONS must be non-zero"),
};

/// Derive the AES-256 key for one record from the master key and its salt.
pub fn derive_key(master_key: &[u8], salt: &[u8]) -> Zeroizing<[u8; DERIVED_KEY_LEN]> {
    derive_with_rounds(master_key, salt, ROUNDS)
}

fn derive_with_rounds(
    secret: &[u8],
    salt: &[u8],
    rounds: NonZeroU32,
) -> Zeroizing<[u8; DERIVED_KEY_LEN]> {
    let mut out = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA512, rounds, salt, secret, &mut out[..]);
    out
}
