//! Errors raised by parameter validation and the context lifecycle.

use core::fmt;

/// Failure of a tree-hash operation.
///
/// Every variant is detected before any state is mutated or any output byte
/// is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
  /// Requested digest length outside `1..=64`.
  InvalidOutputLength {
    /// The rejected length.
    requested: usize,
  },
  /// A parameter block that no lane can be initialized from.
  InvalidParameter,
  /// Output buffer shorter than the configured digest length.
  BufferTooSmall {
    /// Bytes the digest needs.
    needed: usize,
    /// Bytes the caller supplied.
    actual: usize,
  },
  /// Update or finalize on a context (or lane) that was already finalized.
  AlreadyFinalized,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidOutputLength { requested } => {
        write!(f, "invalid output length {requested}, expected 1..=64 bytes")
      }
      Self::InvalidParameter => f.write_str("invalid BLAKE2b parameter block"),
      Self::BufferTooSmall { needed, actual } => {
        write!(f, "output buffer too small: need {needed} bytes, got {actual}")
      }
      Self::AlreadyFinalized => f.write_str("hash state already finalized"),
    }
  }
}

impl core::error::Error for Error {}
