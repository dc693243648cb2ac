//! Taskvault CLI - end-to-end encryption for team task boards.
//!
//! This is the command-line client for the Taskvault encryption core. It
//! owns the pieces the core treats as external: the passphrase prompt, the
//! config file, and the encryption feature flag.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskvault_core::TeamCipher;

mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod passphrase;

use cli::{BoardCommands, Cli, Commands};
use passphrase::CliPassphraseProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let encryption_enabled = config.encryption.enabled;

    let cipher = Arc::new(TeamCipher::new(
        Arc::new(CliPassphraseProvider),
        config.kdf.to_params(),
    ));

    match cli.command {
        Commands::Encrypt(args) => {
            commands::text::handle_encrypt(&cipher, encryption_enabled, args).await
        }
        Commands::Decrypt(args) => {
            commands::text::handle_decrypt(&cipher, encryption_enabled, args).await
        }
        Commands::Check(args) => commands::text::handle_check(args),
        Commands::Board(args) => match args.command {
            BoardCommands::Encrypt(file_args) => {
                commands::board::handle_encrypt(cipher, encryption_enabled, cli.quiet, file_args)
                    .await
            }
            BoardCommands::Decrypt(file_args) => {
                commands::board::handle_decrypt(cipher, encryption_enabled, cli.quiet, file_args)
                    .await
            }
        },
        Commands::Completions(args) => commands::misc::handle_completions(args.shell),
    }
}

/// Route core tracing events to stderr, filtered by `RUST_LOG` (default:
/// warnings only). Stdout stays clean for command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
