// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret acquisition via TTY prompt or piped stdin.

use std::io::{IsTerminal, Read};

use businesshub_core::HubError;
use secrecy::SecretString;

/// Read the secret to encrypt.
///
/// Interactive sessions get a no-echo prompt via `rpassword`. Otherwise all
/// of stdin is read and a single trailing newline is stripped.
pub fn read_secret() -> Result<SecretString, HubError> {
    let secret = if std::io::stdin().is_terminal() {
        rpassword::prompt_password("Secret to encrypt: ")?
    } else {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        strip_trailing_newline(buf)
    };

    if secret.is_empty() {
        return Err(HubError::Encryption(
            "refusing to encrypt an empty secret".to_string(),
        ));
    }
    Ok(SecretString::from(secret))
}

fn strip_trailing_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}
