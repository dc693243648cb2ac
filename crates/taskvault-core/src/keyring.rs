//! In-memory team key cache.
//!
//! Derivation is deliberately slow (Argon2id, see [`crate::crypto`]), and
//! prompting a user for the team passphrase is slower still, so derived keys
//! are memoized per team for the life of the process. The keyring is an
//! explicitly constructed object with no global state; whoever owns it
//! decides its lifetime.
//!
//! The cache-fill path is single-flight per team: concurrent callers for the
//! same uncached team collapse into one passphrase prompt and one derivation,
//! and all of them receive the resulting key. A cancelled or failed fill
//! leaves the slot empty so the next caller can try again.
//!
//! Keys live in memory only. Nothing here is serialized to disk or logs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;

use crate::crypto::{derive_team_key, KdfParams, TeamKey};
use crate::error::{Result, VaultError};

/// Source of team passphrases.
///
/// The prompt is a UI concern (a dialog in the desktop shell, a terminal
/// prompt in the CLI, a fixture in tests), so the keyring takes it as an
/// injected collaborator. It is invoked at most once per team per process
/// lifetime unless [`TeamKeyring::reset`] intervenes.
#[async_trait]
pub trait PassphraseProvider: Send + Sync {
    /// Obtain the passphrase for a team.
    ///
    /// Returns `Ok(None)` when the user cancels, which the keyring surfaces
    /// as [`VaultError::KeyUnavailable`].
    async fn acquire(&self, team_id: &str) -> Result<Option<SecretString>>;
}

/// Process-wide cache mapping team id to derived [`TeamKey`].
pub struct TeamKeyring {
    params: KdfParams,
    teams: Mutex<HashMap<String, Arc<OnceCell<TeamKey>>>>,
}

impl TeamKeyring {
    /// Create an empty keyring using the given derivation work factor.
    pub fn new(params: KdfParams) -> Self {
        Self {
            params,
            teams: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the key for `team_id`, deriving and caching it on first use.
    ///
    /// On a cache miss the provider is asked for the passphrase and Argon2id
    /// runs on the blocking thread pool, keeping the async executor free. At
    /// most one derivation is in flight per team; racing callers await the
    /// same fill.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty team id
    /// - `KeyUnavailable` when the provider cancels or fails
    /// - `Crypto` when derivation itself fails
    pub async fn get_or_derive(
        &self,
        team_id: &str,
        provider: &dyn PassphraseProvider,
    ) -> Result<TeamKey> {
        if team_id.is_empty() {
            return Err(VaultError::InvalidInput(
                "Team id cannot be empty".to_string(),
            ));
        }

        let cell = {
            let mut teams = self.teams.lock().unwrap_or_else(PoisonError::into_inner);
            teams.entry(team_id.to_string()).or_default().clone()
        };

        let key = cell
            .get_or_try_init(|| async {
                tracing::debug!(team = team_id, "team key not cached, deriving");

                let passphrase = provider.acquire(team_id).await?.ok_or_else(|| {
                    VaultError::KeyUnavailable("Passphrase prompt was cancelled".to_string())
                })?;

                let params = self.params.clone();
                let team = team_id.to_string();
                let key = tokio::task::spawn_blocking(move || {
                    derive_team_key(passphrase.expose_secret(), &team, &params)
                })
                .await
                .map_err(|e| VaultError::Crypto(format!("Key derivation task failed: {}", e)))??;

                tracing::debug!(team = team_id, "team key derived and cached");
                Ok::<TeamKey, VaultError>(key)
            })
            .await?;

        Ok(key.clone())
    }

    /// Remove a cached key, forcing re-prompting and re-derivation on next
    /// use. Administrative; normal operation never calls this.
    ///
    /// Returns `true` if an entry was removed. An in-flight derivation for
    /// the removed team completes into the detached slot and is discarded.
    pub fn reset(&self, team_id: &str) -> bool {
        let mut teams = self.teams.lock().unwrap_or_else(PoisonError::into_inner);
        teams.remove(team_id).is_some()
    }

    /// Whether a key for `team_id` is already cached.
    pub fn is_cached(&self, team_id: &str) -> bool {
        let teams = self.teams.lock().unwrap_or_else(PoisonError::into_inner);
        teams
            .get(team_id)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }
}
