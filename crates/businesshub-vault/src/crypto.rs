// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations with a detached tag.
//!
//! New records use a 128-bit IV, the layout already persisted by existing
//! deployments. Records carrying a 96-bit IV are accepted on open.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use businesshub_core::HubError;
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::DERIVED_KEY_LEN;

/// IV length used when sealing.
pub const IV_LEN: usize = 16;

/// Shorter IV length accepted when opening.
pub const COMPACT_IV_LEN: usize = 12;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

type Aes256Gcm128Iv = AesGcm<Aes256, U16>;
type Aes256Gcm96Iv = AesGcm<Aes256, U12>;

/// Fill `buf` from the system CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<(), HubError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| HubError::Encryption("failed to generate random bytes".to_string()))
}

/// Encrypt `plaintext`, returning the ciphertext and its detached tag.
pub fn seal(
    key: &[u8; DERIVED_KEY_LEN],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), HubError> {
    let cipher = Aes256Gcm128Iv::new_from_slice(key)
        .map_err(|_| HubError::Encryption("failed to create AES-256-GCM key".to_string()))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(iv), &[], &mut buffer)
        .map_err(|_| HubError::Encryption("AES-256-GCM encryption failed".to_string()))?;

    let mut detached = [0u8; TAG_LEN];
    detached.copy_from_slice(&tag);
    Ok((buffer, detached))
}

/// Decrypt and verify `ciphertext` against `tag`.
///
/// Fails with [`HubError::Authentication`] when the tag does not verify; no
/// plaintext is produced in that case.
pub fn open(
    key: &[u8; DERIVED_KEY_LEN],
    iv: &[u8],
    tag: &[u8; TAG_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, HubError> {
    match iv.len() {
        IV_LEN => open_with::<Aes256Gcm128Iv>(key, iv, tag, ciphertext),
        COMPACT_IV_LEN => open_with::<Aes256Gcm96Iv>(key, iv, tag, ciphertext),
        n => Err(HubError::Format(format!(
            "iv must be {IV_LEN} or {COMPACT_IV_LEN} bytes, got {n}"
        ))),
    }
}

fn open_with<C: KeyInit + AeadInPlace>(
    key: &[u8; DERIVED_KEY_LEN],
    iv: &[u8],
    tag: &[u8; TAG_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, HubError> {
    let cipher = C::new_from_slice(key)
        .map_err(|_| HubError::Internal("failed to create AES-256-GCM key".to_string()))?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            &[],
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| HubError::Authentication)?;

    Ok(buffer)
}
