//! Cryptographic operations for Taskvault.
//!
//! This module provides key derivation for team-shared keys using
//! well-audited libraries:
//! - **Argon2id**: Memory-hard key derivation function
//! - **BLAKE3**: Domain-separated salt derivation from team identifiers
//!
//! ## Security Model
//!
//! - One symmetric key per team, derived from a passphrase shared by the
//!   team's members; every member reconstructs the same key independently
//! - Argon2id for key derivation (memory-hard, resistant to brute-force)
//! - Key material zeroized from memory on drop
//! - No passphrases or keys persisted by this crate
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of stored ciphertext (task titles/descriptions at rest)
//! - Offline brute-force attacks on the team passphrase
//!
//! We do NOT defend against:
//! - A malicious team member (one passphrase is shared by the whole team)
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod key;
pub mod passphrase;

pub use key::{derive_team_key, KdfParams, TeamKey};
pub use passphrase::validate_passphrase;
