//! Variable-length digest value with constant-time equality.

use core::fmt;

use crate::crypto::blake2b::OUT_LEN;

/// A finished tree digest of 1..=64 bytes.
///
/// Equality against another `Hash` or a byte slice is constant-time in the
/// digest contents, so a `Hash` can be compared against a secret expected value.
#[derive(Clone, Copy)]
pub struct Hash {
  bytes: [u8; OUT_LEN],
  len: u8,
}

impl Hash {
  /// `len` must already be validated to `1..=64`.
  #[inline]
  pub(crate) fn new(bytes: [u8; OUT_LEN], len: usize) -> Self {
    debug_assert!((1..=OUT_LEN).contains(&len));
    let mut bytes = bytes;
    // Bytes past the digest never leak through Copy or Debug.
    if let Some(tail) = bytes.get_mut(len..) {
      tail.fill(0);
    }
    Self { bytes, len: len as u8 }
  }

  /// The digest bytes.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    self.bytes.get(..usize::from(self.len)).unwrap_or(&self.bytes)
  }

  /// Digest length in bytes.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    usize::from(self.len)
  }

  /// Always false; a digest holds at least one byte.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    false
  }
}

impl AsRef<[u8]> for Hash {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

/// This implementation is constant-time.
impl PartialEq for Hash {
  fn eq(&self, other: &Hash) -> bool {
    constant_time_eq::constant_time_eq(self.as_bytes(), other.as_bytes())
  }
}

/// This implementation is constant-time.
impl PartialEq<[u8]> for Hash {
  fn eq(&self, other: &[u8]) -> bool {
    constant_time_eq::constant_time_eq(self.as_bytes(), other)
  }
}

/// This implementation is constant-time.
impl<const N: usize> PartialEq<[u8; N]> for Hash {
  fn eq(&self, other: &[u8; N]) -> bool {
    constant_time_eq::constant_time_eq(self.as_bytes(), other)
  }
}

impl Eq for Hash {}

impl fmt::LowerHex for Hash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for b in self.as_bytes() {
      write!(f, "{b:02x}")?;
    }
    Ok(())
  }
}

impl fmt::Display for Hash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::LowerHex::fmt(self, f)
  }
}

impl fmt::Debug for Hash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Hash(0x{self:x})")
  }
}
