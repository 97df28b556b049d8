//! Rotation token generation and comparison.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Raw entropy behind each issued token, before encoding.
pub(crate) const TOKEN_ENTROPY_BYTES: usize = 128;

/// Token presented by the client's persistent credential.
///
/// Wrapped in [`SecretString`] so the value stays out of debug output and
/// log fields.
#[derive(Clone, Debug)]
pub struct ClientToken(SecretString);

impl ClientToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Constant-time comparison against the server-side token.
    ///
    /// Comparison time must not vary with the position of the first
    /// differing byte. The length guard short-circuits, but token lengths
    /// are fixed by the generator and carry no secret data.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        let presented = self.0.expose_secret().as_bytes();
        let stored = stored.as_bytes();
        if presented.len() != stored.len() {
            return false;
        }
        presented.ct_eq(stored).into()
    }
}

/// Generate a fresh rotation token from 128 bytes of OS entropy.
///
/// The raw value goes to the client credential and, verbatim, into the
/// session record. An unavailable random source is surfaced to the caller;
/// a request must never proceed with a weak token.
pub fn generate_rotation_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate rotation token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}
