//! Error types for Taskvault core operations.
//!
//! This module defines the error hierarchy for the encryption core.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Taskvault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for Taskvault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Invalid user input (empty passphrase, empty team id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Passphrase acquisition failed or was cancelled
    #[error("Team key unavailable: {0}")]
    KeyUnavailable(String),

    /// Ciphertext string does not parse as an envelope
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Authentication failed during decryption (wrong passphrase or
    /// tampered data; which byte differed is deliberately not reported)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Encryption or key-derivation primitive error
    #[error("Encryption error: {0}")]
    Crypto(String),
}
