//! # Taskvault Core
//!
//! End-to-end encryption core for the Taskvault team task manager.
//!
//! Task titles and descriptions are encrypted client-side under a
//! team-shared symmetric key derived from a passphrase; the backing store
//! and sync layer only ever see envelope strings. This crate provides the
//! whole pipeline and nothing else: no UI, no persistence, no transport.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation, team key type, passphrase rules
//! - **keyring**: per-team key cache with single-flight derivation
//! - **envelope**: the stable text encoding of an encrypted payload
//! - **cipher**: the public encrypt/decrypt operations
//! - **model**: task and board types the operations apply to
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use secrecy::SecretString;
//! use taskvault_core::{KdfParams, PassphraseProvider, Result, TeamCipher};
//!
//! struct Prompt;
//!
//! #[async_trait]
//! impl PassphraseProvider for Prompt {
//!     async fn acquire(&self, _team_id: &str) -> Result<Option<SecretString>> {
//!         // ask the user...
//!         Ok(Some(SecretString::from("team passphrase".to_string())))
//!     }
//! }
//!
//! # async fn demo() -> Result<()> {
//! let cipher = TeamCipher::new(Arc::new(Prompt), KdfParams::default());
//! let stored = cipher.encrypt_for_team("acme", "Fix login bug").await?;
//! let title = cipher.decrypt_for_team("acme", &stored).await?;
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod keyring;
pub mod model;

pub use cipher::TeamCipher;
pub use crypto::{derive_team_key, validate_passphrase, KdfParams, TeamKey};
pub use envelope::{is_ciphertext, Envelope};
pub use error::{Result, VaultError};
pub use keyring::{PassphraseProvider, TeamKeyring};
pub use model::{Board, Task, TaskStatus};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
