//! Team key derivation using Argon2id.
//!
//! A team key is derived from the team's shared passphrase and the team
//! identifier. The identifier is stretched into a salt with BLAKE3, so two
//! teams that happen to pick the same passphrase still end up with different
//! keys, and no salt ever needs to be stored or exchanged.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Length of a derived team key in bytes (256 bits for XChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// Context string for BLAKE3 salt derivation. Changing this breaks every
/// existing ciphertext, so it is versioned and frozen.
const SALT_CONTEXT: &str = "taskvault v1 team key salt";

/// Argon2id work-factor parameters.
///
/// Defaults balance security and interactive latency:
/// - Memory: 64 MiB
/// - Iterations: 3
/// - Parallelism: 1 (single lane; derivation already runs off the event loop)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Iteration count (time cost)
    pub iterations: u32,
    /// Parallelism degree (lanes)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Create params with explicit values.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// A symmetric key shared by the members of one team.
///
/// Key material is zeroized from memory when dropped, reducing the window
/// of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct TeamKey {
    key: [u8; KEY_LENGTH],
}

impl TeamKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for TeamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a team key from a shared passphrase and a team identifier.
///
/// Deterministic: the same (passphrase, team) pair always yields the same
/// key, which is what lets every team member reconstruct it locally.
/// Distinct teams get distinct salts via BLAKE3 domain separation.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the passphrase or team id is
/// empty, `VaultError::Crypto` if the Argon2 parameters are rejected.
pub fn derive_team_key(passphrase: &str, team_id: &str, params: &KdfParams) -> Result<TeamKey> {
    if passphrase.is_empty() {
        return Err(VaultError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if team_id.is_empty() {
        return Err(VaultError::InvalidInput(
            "Team id cannot be empty".to_string(),
        ));
    }

    let salt = blake3::derive_key(SALT_CONTEXT, team_id.as_bytes());

    let argon2_params = argon2::Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| VaultError::Crypto(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt, &mut key_bytes)
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(TeamKey::from_bytes(key_bytes))
}
