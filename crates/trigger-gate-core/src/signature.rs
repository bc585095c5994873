//! HMAC-SHA1 webhook signatures.
//!
//! GitHub and Bitbucket Server sign the raw request body with HMAC-SHA1 keyed
//! by the shared secret and send `sha1=<hex digest>` in `X-Hub-Signature`.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt;

type HmacSha1 = Hmac<Sha1>;

/// Algorithm prefix of the signature header value.
pub const SHA1_PREFIX: &str = "sha1=";

/// Reasons a signature check can reject a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature header is missing")]
    Missing,

    #[error("signature header must start with 'sha1='")]
    MissingPrefix,

    #[error("signature is not valid hex: {message}")]
    InvalidHex { message: String },

    #[error("signature does not match the request body")]
    Mismatch,

    #[error("failed to initialise HMAC: {message}")]
    Hmac { message: String },
}

impl SignatureError {
    /// True when the header could not be parsed, as opposed to a well-formed
    /// signature that does not match.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Missing | Self::MissingPrefix | Self::InvalidHex { .. }
        )
    }
}

/// Outcome of the signature phase of an interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// No secret configured; the request is trusted as-is.
    NotRequired,
    Verified,
    Rejected(SignatureError),
}

impl Verification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Verified => "verified",
            Self::Rejected(_) => "rejected",
        }
    }
}

impl From<Result<(), SignatureError>> for Verification {
    fn from(result: Result<(), SignatureError>) -> Self {
        match result {
            Ok(()) => Self::Verified,
            Err(e) => Self::Rejected(e),
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verify an `X-Hub-Signature` value against the body.
///
/// The comparison is constant-time with respect to the expected digest.
///
/// # Errors
///
/// - [`SignatureError::Missing`] if `provided` is `None`
/// - [`SignatureError::MissingPrefix`] / [`SignatureError::InvalidHex`] if the value is malformed
/// - [`SignatureError::Mismatch`] if the digest differs
///
/// # Examples
///
/// ```rust
/// use trigger_gate_core::{verify_hmac_sha1, SignatureError};
///
/// let header = "sha1=38e005ef7dd3faee13204505532011257023654e";
/// assert!(verify_hmac_sha1(b"somepayload", Some(header), b"secret").is_ok());
/// assert_eq!(
///     verify_hmac_sha1(b"otherpayload", Some(header), b"secret"),
///     Err(SignatureError::Mismatch)
/// );
/// ```
pub fn verify_hmac_sha1(
    body: &[u8],
    provided: Option<&str>,
    secret: &[u8],
) -> Result<(), SignatureError> {
    let provided = provided.ok_or(SignatureError::Missing)?;
    let digest = provided
        .strip_prefix(SHA1_PREFIX)
        .ok_or(SignatureError::MissingPrefix)?;
    let expected = hex::decode(digest).map_err(|e| SignatureError::InvalidHex {
        message: e.to_string(),
    })?;

    let mut mac = new_mac(secret)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the `sha1=<hex>` header value a sender would attach to `body`.
///
/// # Errors
///
/// Returns [`SignatureError::Hmac`] if the HMAC cannot be keyed.
pub fn compute_sha1_signature(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(format!(
        "{}{}",
        SHA1_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn new_mac(secret: &[u8]) -> Result<HmacSha1, SignatureError> {
    HmacSha1::new_from_slice(secret).map_err(|e| SignatureError::Hmac {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
