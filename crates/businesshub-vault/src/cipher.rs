// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential cipher: one plaintext string in, one self-describing record out.
//!
//! A record is `saltHex:ivHex:tagHex:ciphertextHex`. Decrypting it needs only
//! the master key and those four segments.

use std::fmt;
use std::str::FromStr;

use businesshub_config::VaultConfig;
use businesshub_core::HubError;
use tracing::debug;

use crate::crypto::{self, COMPACT_IV_LEN, IV_LEN, TAG_LEN};
use crate::kdf::{self, SALT_LEN};
use crate::key::MasterKey;

/// Separator between the hex segments of a serialized record.
pub const SEPARATOR: char = ':';

/// The at-rest form of one encrypted secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    salt: [u8; SALT_LEN],
    iv: Vec<u8>,
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedSecret {
    /// Parse a serialized record.
    ///
    /// Wrong segment count, non-hex text, or unexpected segment lengths are
    /// [`HubError::Format`].
    pub fn parse(serialized: &str) -> Result<Self, HubError> {
        let segments: Vec<&str> = serialized.split(SEPARATOR).collect();
        let [salt_hex, iv_hex, tag_hex, ciphertext_hex] = segments[..] else {
            return Err(HubError::Format(format!(
                "encrypted value must have 4 segments, got {}",
                segments.len()
            )));
        };

        let salt = decode_fixed::<SALT_LEN>("salt", salt_hex)?;
        let iv = decode_segment("iv", iv_hex)?;
        if iv.len() != IV_LEN && iv.len() != COMPACT_IV_LEN {
            return Err(HubError::Format(format!(
                "iv must be {IV_LEN} or {COMPACT_IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        let tag = decode_fixed::<TAG_LEN>("tag", tag_hex)?;
        let ciphertext = decode_segment("ciphertext", ciphertext_hex)?;

        Ok(Self {
            salt,
            iv,
            tag,
            ciphertext,
        })
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.salt),
            hex::encode(&self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedSecret {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, HubError> {
    hex::decode(segment).map_err(|_| HubError::Format(format!("{name} segment is not valid hex")))
}

fn decode_fixed<const N: usize>(name: &str, segment: &str) -> Result<[u8; N], HubError> {
    let bytes = decode_segment(name, segment)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HubError::Format(format!("{name} must be {N} bytes, got {len}")))
}

/// Encrypts and decrypts individual credential strings under the master key.
///
/// Every call draws a fresh salt and IV and derives its own key, so the
/// cipher holds no per-call state and is safe to share across threads.
/// Each call runs PBKDF2 with 100,000 iterations; async callers should
/// run it off the reactor.
#[derive(Debug, Clone)]
pub struct CredentialCipher {
    master_key: MasterKey,
}

impl CredentialCipher {
    pub fn new(master_key: MasterKey) -> Self {
        Self { master_key }
    }

    /// Build a cipher from the vault configuration (or `ENCRYPTION_KEY`).
    pub fn from_config(config: &VaultConfig) -> Result<Self, HubError> {
        Ok(Self::new(MasterKey::from_config(config)?))
    }

    /// Encrypt into a structured record.
    pub fn encrypt_record(&self, plaintext: &str) -> Result<EncryptedSecret, HubError> {
        let mut salt = [0u8; SALT_LEN];
        crypto::fill_random(&mut salt)?;
        let mut iv = [0u8; IV_LEN];
        crypto::fill_random(&mut iv)?;

        let key = kdf::derive_key(self.master_key.as_bytes(), &salt);
        let (ciphertext, tag) = crypto::seal(&key, &iv, plaintext.as_bytes())?;

        Ok(EncryptedSecret {
            salt,
            iv: iv.to_vec(),
            tag,
            ciphertext,
        })
    }

    /// Encrypt `plaintext` into its serialized record.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, HubError> {
        let record = self.encrypt_record(plaintext)?;
        debug!("secret encrypted");
        Ok(record.to_string())
    }

    /// Decrypt a structured record.
    pub fn decrypt_record(&self, record: &EncryptedSecret) -> Result<String, HubError> {
        let key = kdf::derive_key(self.master_key.as_bytes(), &record.salt);
        let plaintext = crypto::open(&key, &record.iv, &record.tag, &record.ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|_| HubError::Format("decrypted value is not valid UTF-8".to_string()))
    }

    /// Decrypt a serialized record back to its plaintext.
    pub fn decrypt(&self, serialized: &str) -> Result<String, HubError> {
        let record = EncryptedSecret::parse(serialized)?;
        self.decrypt_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> CredentialCipher {
        CredentialCipher::new(MasterKey::from_bytes([0x42; 32]))
    }

    #[test]
    fn serialized_record_layout() {
        let serialized = cipher().encrypt("secret123").unwrap();
        let segments: Vec<&str> = serialized.split(SEPARATOR).collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].len(), SALT_LEN * 2);
        assert_eq!(segments[1].len(), IV_LEN * 2);
        assert_eq!(segments[2].len(), TAG_LEN * 2);
        assert_eq!(segments[3].len(), "secret123".len() * 2);
        assert!(
            serialized
                .chars()
                .all(|c| c == SEPARATOR || c.is_ascii_hexdigit())
        );
    }

    #[test]
    fn parse_display_is_lossless() {
        let serialized = cipher().encrypt("value").unwrap();
        let record: EncryptedSecret = serialized.parse().unwrap();
        assert_eq!(record.to_string(), serialized);
        assert_eq!(record.iv().len(), IV_LEN);
    }

    #[test]
    fn parse_rejects_wrong_segment_count() {
        for input in ["", "abc", "a:b:c", "00:00:00:00:00"] {
            let err = EncryptedSecret::parse(input).unwrap_err();
            assert!(matches!(err, HubError::Format(_)), "input {input:?}");
        }
    }

    #[test]
    fn parse_rejects_non_hex_segment() {
        let input = format!(
            "{}:{}:{}:zz",
            "00".repeat(SALT_LEN),
            "00".repeat(IV_LEN),
            "00".repeat(TAG_LEN)
        );
        assert!(matches!(
            EncryptedSecret::parse(&input).unwrap_err(),
            HubError::Format(_)
        ));
    }

    #[test]
    fn parse_rejects_short_salt_and_tag() {
        let short_salt = format!("00:{}:{}:", "00".repeat(IV_LEN), "00".repeat(TAG_LEN));
        assert!(matches!(
            EncryptedSecret::parse(&short_salt).unwrap_err(),
            HubError::Format(_)
        ));

        let short_tag = format!("{}:{}:00:", "00".repeat(SALT_LEN), "00".repeat(IV_LEN));
        assert!(matches!(
            EncryptedSecret::parse(&short_tag).unwrap_err(),
            HubError::Format(_)
        ));
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let c = cipher();
        let serialized = c.encrypt("").unwrap();
        assert!(serialized.ends_with(SEPARATOR));
        assert_eq!(c.decrypt(&serialized).unwrap(), "");
    }

    #[test]
    fn non_utf8_plaintext_is_format_error() {
        let c = cipher();
        let salt = [9u8; SALT_LEN];
        let iv = [3u8; IV_LEN];
        let key = kdf::derive_key(c.master_key.as_bytes(), &salt);
        let (ciphertext, tag) = crypto::seal(&key, &iv, &[0xff, 0xfe]).unwrap();
        let record = EncryptedSecret {
            salt,
            iv: iv.to_vec(),
            tag,
            ciphertext,
        };

        let err = c.decrypt_record(&record).unwrap_err();
        assert!(matches!(err, HubError::Format(_)), "got {err:?}");
    }

    #[test]
    fn debug_does_not_leak_master_key() {
        let debug = format!("{:?}", cipher());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("4242"));
    }
}
