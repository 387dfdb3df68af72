//! Error types shared across treehash crates.
//!
//! Crates define their own errors for parameter and lifecycle failures; this
//! module only holds the verification outcome, which must stay opaque.

use core::fmt;

/// A computed digest did not match the expected one.
///
/// Carries no detail about where the mismatch occurred. The comparison that
/// produces it is expected to run in constant time.
///
/// ```
/// use traits::VerificationError;
///
/// fn check(ok: bool) -> Result<(), VerificationError> {
///   if ok { Ok(()) } else { Err(VerificationError::new()) }
/// }
///
/// assert!(check(false).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub struct VerificationError;

impl VerificationError {
  /// Create a new verification error.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl fmt::Display for VerificationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("digest verification failed")
  }
}

impl core::error::Error for VerificationError {}
