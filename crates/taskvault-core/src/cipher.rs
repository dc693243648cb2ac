//! Encrypt/decrypt operations for team task content.
//!
//! This is the surface the rest of the application consumes. Task titles
//! and descriptions are encrypted under the owning team's derived key with
//! XChaCha20-Poly1305 and travel as [`Envelope`] strings; everything else
//! about a task stays plaintext.
//!
//! XChaCha20-Poly1305 provides:
//! - 256-bit key security
//! - 192-bit nonces (safe for random generation)
//! - Authenticated encryption (confidentiality + tamper detection)
//!
//! A fresh random nonce is drawn per encryption. Nonce reuse under the same
//! key is the one unrecoverable failure of this scheme; random 24-byte
//! nonces keep the collision probability negligible.

use std::sync::Arc;

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::crypto::KdfParams;
use crate::envelope::{is_ciphertext, Envelope, FORMAT_VERSION};
use crate::error::{Result, VaultError};
use crate::keyring::{PassphraseProvider, TeamKeyring};
use crate::model::Task;

/// Encryption service for team task content.
///
/// Owns the [`TeamKeyring`] and the injected passphrase provider. Cheap to
/// share behind an `Arc`; encrypt/decrypt calls for independent tasks run
/// fully in parallel once a team's key is cached.
pub struct TeamCipher {
    keyring: TeamKeyring,
    provider: Arc<dyn PassphraseProvider>,
}

impl TeamCipher {
    /// Create a cipher with an empty keyring.
    pub fn new(provider: Arc<dyn PassphraseProvider>, params: KdfParams) -> Self {
        Self {
            keyring: TeamKeyring::new(params),
            provider,
        }
    }

    /// Encrypt `plaintext` for a team, returning the envelope string.
    ///
    /// Obtains the team key from the keyring (prompting and deriving on
    /// first use), encrypts under a fresh random nonce, and encodes the
    /// result. Encrypting the same text twice yields different strings.
    ///
    /// # Errors
    ///
    /// `KeyUnavailable` if passphrase acquisition is cancelled or fails;
    /// `InvalidInput` for an empty team id.
    pub async fn encrypt_for_team(&self, team_id: &str, plaintext: &str) -> Result<String> {
        let key = self
            .keyring
            .get_or_derive(team_id, self.provider.as_ref())
            .await?;

        let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::Crypto("Encryption failed".to_string()))?;

        let envelope = Envelope {
            version: FORMAT_VERSION,
            nonce: nonce.into(),
            ciphertext,
        };
        Ok(envelope.encode())
    }

    /// Decrypt an envelope string for a team, returning the plaintext.
    ///
    /// Values that do not carry the envelope marker are returned unchanged:
    /// task text stored before encryption was enabled must keep rendering,
    /// so legacy plaintext passes through rather than erroring. Once the
    /// marker is present the string is never treated as plaintext again;
    /// parse and authentication failures are surfaced.
    ///
    /// The envelope is decoded before the key is requested, so malformed
    /// input never triggers a passphrase prompt.
    ///
    /// # Errors
    ///
    /// `MalformedCiphertext` if the envelope does not parse;
    /// `DecryptionFailed` if authentication fails (wrong passphrase, or the
    /// stored value was corrupted or tampered with). Never returns partial
    /// or corrupted plaintext.
    pub async fn decrypt_for_team(&self, team_id: &str, text: &str) -> Result<String> {
        if !is_ciphertext(text) {
            return Ok(text.to_string());
        }

        let envelope = Envelope::decode(text)?;
        let key = self
            .keyring
            .get_or_derive(team_id, self.provider.as_ref())
            .await?;

        let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
        let plaintext = cipher
            .decrypt(
                XNonce::from_slice(&envelope.nonce),
                envelope.ciphertext.as_slice(),
            )
            .map_err(|_| {
                tracing::warn!(team = team_id, "decryption failed: authentication error");
                VaultError::DecryptionFailed
            })?;

        String::from_utf8(plaintext)
            .map_err(|_| VaultError::Crypto("Decrypted payload is not valid UTF-8".to_string()))
    }

    /// Encrypt a task's title and description in place-of-value, returning
    /// the encrypted copy. Fields already carrying the envelope marker are
    /// left untouched, so re-running over a half-encrypted board is safe.
    pub async fn encrypt_task(&self, team_id: &str, task: &Task) -> Result<Task> {
        let mut encrypted = task.clone();
        if !is_ciphertext(&task.title) {
            encrypted.title = self.encrypt_for_team(team_id, &task.title).await?;
        }
        if !is_ciphertext(&task.description) {
            encrypted.description = self.encrypt_for_team(team_id, &task.description).await?;
        }
        Ok(encrypted)
    }

    /// Decrypt a task's title and description, returning the plaintext copy.
    /// Legacy plaintext fields pass through unchanged.
    pub async fn decrypt_task(&self, team_id: &str, task: &Task) -> Result<Task> {
        let mut decrypted = task.clone();
        decrypted.title = self.decrypt_for_team(team_id, &task.title).await?;
        decrypted.description = self.decrypt_for_team(team_id, &task.description).await?;
        Ok(decrypted)
    }

    /// Drop a team's cached key, forcing re-prompting on next use.
    ///
    /// Administrative reset only; this does not re-encrypt any stored data.
    pub fn reset_team_key(&self, team_id: &str) -> bool {
        self.keyring.reset(team_id)
    }
}
