//! Passphrase acquisition for the CLI.
//!
//! Resolution order mirrors how operators actually run the tool: the
//! `TASKVAULT_PASSPHRASE` environment variable first (scripts, CI), then an
//! interactive prompt on a TTY. A non-interactive session without the
//! variable counts as a cancelled prompt, which the core reports as
//! `KeyUnavailable`.

use std::io::IsTerminal;

use async_trait::async_trait;
use dialoguer::Password;
use secrecy::SecretString;

use taskvault_core::{validate_passphrase, PassphraseProvider, Result, VaultError};

/// Environment variable consulted before prompting.
pub const PASSPHRASE_ENV: &str = "TASKVAULT_PASSPHRASE";

pub struct CliPassphraseProvider;

#[async_trait]
impl PassphraseProvider for CliPassphraseProvider {
    async fn acquire(&self, team_id: &str) -> Result<Option<SecretString>> {
        if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
            if !value.trim().is_empty() {
                return Ok(Some(SecretString::from(value)));
            }
        }

        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        // dialoguer blocks on the terminal; keep it off the async executor.
        let prompt = format!("Passphrase for team {}", team_id);
        let outcome = tokio::task::spawn_blocking(move || {
            Password::new()
                .with_prompt(prompt)
                .validate_with(|input: &String| {
                    validate_passphrase(input).map_err(|e| e.to_string())
                })
                .interact()
        })
        .await
        .map_err(|e| VaultError::KeyUnavailable(format!("Prompt task failed: {}", e)))?;

        match outcome {
            Ok(passphrase) => Ok(Some(SecretString::from(passphrase))),
            // Interrupted prompt (Ctrl-C / closed stdin) is a cancel, not a bug
            Err(_) => Ok(None),
        }
    }
}
