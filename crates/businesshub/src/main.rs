// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BusinessHub credential vault CLI.
//!
//! Operator tooling over the same cipher and mapper the integration
//! handlers use: key generation, single-secret encrypt/decrypt, and
//! whole-configuration seal/reveal/audit.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use businesshub_config::HubConfig;
use businesshub_core::HubError;
use businesshub_vault::{CredentialCipher, CredentialMapper};
use clap::{Parser, Subcommand};
use tracing::error;

/// BusinessHub integration credential vault.
#[derive(Parser, Debug)]
#[command(name = "businesshub", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a new random master key (hex).
    Keygen,
    /// Encrypt one secret read from the terminal or stdin.
    Encrypt,
    /// Decrypt one serialized record.
    Decrypt {
        /// Record in `salt:iv:tag:ciphertext` form.
        record: String,
    },
    /// Encrypt the recognized credential fields of a configuration JSON.
    Seal {
        /// Input file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
    /// Decrypt the recognized credential fields of a configuration JSON.
    Reveal {
        /// Input file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
    /// List credential-shaped fields that are not encrypted at rest.
    Audit {
        /// Input file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
}

/// Exit code for `reveal` when some field stayed encrypted.
const EXIT_DEGRADED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => businesshub_config::load_and_validate_path(path),
        None => businesshub_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            businesshub_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server.log_level);

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            error!(error = e.kind(), "command failed");
            eprintln!("businesshub: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &HubConfig) -> Result<ExitCode, HubError> {
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Keygen => commands::keygen(&mut stdout)?,
        Commands::Encrypt => {
            let cipher = CredentialCipher::from_config(&config.vault)?;
            let secret = prompt::read_secret()?;
            commands::encrypt(&cipher, &secret, &mut stdout)?;
        }
        Commands::Decrypt { record } => {
            let cipher = CredentialCipher::from_config(&config.vault)?;
            commands::decrypt(&cipher, &record, &mut stdout)?;
        }
        Commands::Seal { file } => {
            let mapper = CredentialMapper::from_config(&config.vault)?;
            let input = commands::read_config(file.as_deref())?;
            commands::seal(&mapper, &input, &mut stdout)?;
        }
        Commands::Reveal { file } => {
            let mapper = CredentialMapper::from_config(&config.vault)?;
            let input = commands::read_config(file.as_deref())?;
            let degraded =
                commands::reveal(&mapper, &input, &mut stdout, &mut std::io::stderr())?;
            if degraded {
                return Ok(ExitCode::from(EXIT_DEGRADED));
            }
        }
        Commands::Audit { file } => {
            let input = commands::read_config(file.as_deref())?;
            commands::audit(&config.vault.credential_fields, &input, &mut stdout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initializes the tracing subscriber on stderr with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("businesshub={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
