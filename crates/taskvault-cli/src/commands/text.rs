//! One-off string commands: encrypt, decrypt, check.

use taskvault_core::{is_ciphertext, TeamCipher, VaultError};

use crate::cli::{CheckArgs, DecryptArgs, EncryptArgs};
use crate::errors::CliError;
use crate::helpers::read_text_arg;

pub async fn handle_encrypt(
    cipher: &TeamCipher,
    encryption_enabled: bool,
    args: EncryptArgs,
) -> anyhow::Result<()> {
    let text = read_text_arg(args.text)?;

    if !encryption_enabled {
        println!("{}", text);
        return Ok(());
    }

    match cipher.encrypt_for_team(&args.team, &text).await {
        Ok(encrypted) => {
            println!("{}", encrypted);
            Ok(())
        }
        Err(VaultError::KeyUnavailable(reason)) => {
            CliError::auth_failed(format!("No passphrase available: {}", reason)).exit()
        }
        Err(VaultError::InvalidInput(reason)) => CliError::invalid_input(reason).exit(),
        Err(err) => Err(err.into()),
    }
}

pub async fn handle_decrypt(
    cipher: &TeamCipher,
    encryption_enabled: bool,
    args: DecryptArgs,
) -> anyhow::Result<()> {
    let text = read_text_arg(args.text)?;

    if !encryption_enabled {
        println!("{}", text);
        return Ok(());
    }

    match cipher.decrypt_for_team(&args.team, &text).await {
        Ok(decrypted) => {
            println!("{}", decrypted);
            Ok(())
        }
        Err(VaultError::DecryptionFailed) => CliError::auth_failed_with_hint(
            "Unable to decrypt: wrong passphrase or corrupted data.",
            "Hint: Every member of a team must use the same shared passphrase.",
        )
        .exit(),
        Err(VaultError::MalformedCiphertext(reason)) => {
            CliError::invalid_input(format!("Malformed ciphertext: {}", reason)).exit()
        }
        Err(VaultError::KeyUnavailable(reason)) => {
            CliError::auth_failed(format!("No passphrase available: {}", reason)).exit()
        }
        Err(err) => Err(err.into()),
    }
}

pub fn handle_check(args: CheckArgs) -> anyhow::Result<()> {
    let text = read_text_arg(args.text)?;
    if is_ciphertext(&text) {
        println!("ciphertext");
    } else {
        println!("plaintext");
    }
    Ok(())
}
