// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Results go to `out`, diagnostics to `err`.

use std::io::{Read, Write};
use std::path::Path;

use businesshub_core::HubError;
use businesshub_vault::{audit_fields, CredentialCipher, CredentialMapper, MasterKey};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::info;

/// `businesshub keygen`
pub fn keygen(out: &mut impl Write) -> Result<(), HubError> {
    let key = MasterKey::generate()?;
    writeln!(out, "{}", key.to_hex().as_str())?;
    info!("generated new master key");
    Ok(())
}

/// `businesshub encrypt`
pub fn encrypt(
    cipher: &CredentialCipher,
    secret: &SecretString,
    out: &mut impl Write,
) -> Result<(), HubError> {
    writeln!(out, "{}", cipher.encrypt(secret.expose_secret())?)?;
    Ok(())
}

/// `businesshub decrypt <RECORD>`
pub fn decrypt(
    cipher: &CredentialCipher,
    record: &str,
    out: &mut impl Write,
) -> Result<(), HubError> {
    writeln!(out, "{}", cipher.decrypt(record.trim())?)?;
    Ok(())
}

/// `businesshub seal`
pub fn seal(mapper: &CredentialMapper, config: &Value, out: &mut impl Write) -> Result<(), HubError> {
    let sealed = mapper.encrypt_fields(config)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&sealed)?)?;
    Ok(())
}

/// `businesshub reveal`. Returns true when some field stayed encrypted.
pub fn reveal(
    mapper: &CredentialMapper,
    config: &Value,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, HubError> {
    let revealed = mapper.decrypt_fields(config);
    writeln!(out, "{}", serde_json::to_string_pretty(&revealed.config)?)?;
    for (field, outcome) in &revealed.outcomes {
        if let businesshub_vault::FieldOutcome::Failed(e) = outcome {
            writeln!(err, "credentials.{field}: not decrypted ({})", e.kind())?;
        }
    }
    Ok(revealed.is_degraded())
}

/// `businesshub audit`. Returns the number of findings.
pub fn audit(allowlist: &[String], config: &Value, out: &mut impl Write) -> Result<usize, HubError> {
    let findings = audit_fields(allowlist, config);
    for path in &findings {
        writeln!(out, "{path}: credential-shaped field is stored in plaintext")?;
    }
    Ok(findings.len())
}

/// Read a configuration JSON from `path`, or from stdin when absent or `-`.
pub fn read_config(path: Option<&Path>) -> Result<Value, HubError> {
    let content = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mapper(byte: u8) -> CredentialMapper {
        CredentialMapper::new(
            CredentialCipher::new(MasterKey::from_bytes([byte; 32])),
            vec!["password".to_string()],
        )
    }

    #[test]
    fn keygen_prints_64_hex_chars() {
        let mut out = Vec::new();
        keygen(&mut out).unwrap();
        let line = String::from_utf8(out).unwrap();
        let key = line.trim_end();
        assert_eq!(key.len(), 64);
        assert!(MasterKey::from_hex(key).is_ok());
    }

    #[test]
    fn encrypt_then_decrypt() {
        let cipher = CredentialCipher::new(MasterKey::from_bytes([1u8; 32]));
        let mut record = Vec::new();
        encrypt(&cipher, &SecretString::from("s3cret".to_string()), &mut record).unwrap();

        let mut plain = Vec::new();
        decrypt(&cipher, &String::from_utf8(record).unwrap(), &mut plain).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "s3cret\n");
    }

    #[test]
    fn seal_then_reveal_with_wrong_key_reports_field() {
        let config = json!({ "credentials": { "password": "pw" } });
        let mut sealed = Vec::new();
        seal(&mapper(1), &config, &mut sealed).unwrap();
        let sealed: Value = serde_json::from_slice(&sealed).unwrap();

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let degraded = reveal(&mapper(2), &sealed, &mut out, &mut err).unwrap();
        assert!(degraded);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "credentials.password: not decrypted (authentication)\n"
        );
        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed, sealed);
    }

    #[test]
    fn audit_counts_findings() {
        let config = json!({ "apiKey": "k", "credentials": { "clientSecret": "c" } });
        let mut out = Vec::new();
        let n = audit(&["password".to_string()], &config, &mut out).unwrap();
        assert_eq!(n, 2);
        assert!(String::from_utf8(out).unwrap().contains("credentials.clientSecret"));
    }
}
