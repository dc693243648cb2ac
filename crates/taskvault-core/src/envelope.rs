//! Ciphertext envelope codec.
//!
//! An encrypted task field travels through ordinary string columns, UI
//! state, and sync payloads that were all built for plain text, so the
//! envelope serializes to a single printable string:
//!
//! ```text
//! tvlt.<version>.<base64 nonce>.<base64 ciphertext>
//! ```
//!
//! The `tvlt.` marker is how encrypted values are told apart from legacy
//! plaintext that predates encryption. A user whose task title genuinely
//! starts with `tvlt.` will be misclassified and fail decryption loudly;
//! that collision is accepted rather than worked around.
//!
//! Version 1 is frozen. Clients on different application versions decrypt
//! each other's envelopes, so any algorithm change must bump the version
//! number and keep parsing version 1.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, VaultError};

/// Marker prefix identifying an encrypted value.
pub const MARKER: &str = "tvlt.";

/// Current envelope format version.
pub const FORMAT_VERSION: u8 = 1;

/// XChaCha20 nonce size in bytes (192 bits, safe for random generation).
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 tag size (16 bytes, regardless of the message or key size).
pub const TAG_LENGTH: usize = 16;

/// One encrypted payload, as produced by a single encryption operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Format version (see [`FORMAT_VERSION`])
    pub version: u8,
    /// The 24-byte XChaCha20 nonce
    pub nonce: [u8; NONCE_LENGTH],
    /// The ciphertext including the trailing 16-byte Poly1305 tag
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize to the single-string text form.
    ///
    /// Deterministic and reversible: `decode(&e.encode()) == e`.
    pub fn encode(&self) -> String {
        format!(
            "{}{}.{}.{}",
            MARKER,
            self.version,
            STANDARD.encode(self.nonce),
            STANDARD.encode(&self.ciphertext)
        )
    }

    /// Parse the text form back into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::MalformedCiphertext` if the marker is missing,
    /// the field structure does not parse, the version is unsupported, or
    /// the component lengths are inconsistent.
    pub fn decode(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix(MARKER)
            .ok_or_else(|| malformed("missing marker"))?;

        let mut fields = body.splitn(3, '.');
        let version_field = fields.next().ok_or_else(|| malformed("missing version"))?;
        let nonce_field = fields.next().ok_or_else(|| malformed("missing nonce"))?;
        let ciphertext_field = fields
            .next()
            .ok_or_else(|| malformed("missing ciphertext"))?;

        let version: u8 = version_field
            .parse()
            .map_err(|_| malformed("version is not a number"))?;
        if version != FORMAT_VERSION {
            return Err(malformed(&format!("unsupported version {}", version)));
        }

        let nonce_bytes = STANDARD
            .decode(nonce_field)
            .map_err(|_| malformed("nonce is not valid base64"))?;
        let nonce: [u8; NONCE_LENGTH] = nonce_bytes
            .try_into()
            .map_err(|_| malformed("nonce has wrong length"))?;

        let ciphertext = STANDARD
            .decode(ciphertext_field)
            .map_err(|_| malformed("ciphertext is not valid base64"))?;
        if ciphertext.len() < TAG_LENGTH {
            return Err(malformed("ciphertext shorter than authentication tag"));
        }

        Ok(Self {
            version,
            nonce,
            ciphertext,
        })
    }
}

/// Lightweight check for whether a stored string is an encrypted envelope.
///
/// Only the marker is inspected; a `true` result does not guarantee the rest
/// of the string parses. Values stored before encryption was enabled return
/// `false` and are passed through as legacy plaintext.
pub fn is_ciphertext(text: &str) -> bool {
    text.starts_with(MARKER)
}

fn malformed(reason: &str) -> VaultError {
    VaultError::MalformedCiphertext(reason.to_string())
}
