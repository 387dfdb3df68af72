//! Fixed-output hashing trait.

use core::fmt::Debug;

/// A streaming hash with a fixed-size output.
///
/// `finalize` borrows the hasher, so a running digest can be read off and the
/// message extended afterwards. Hashers with one-shot finalization keep that
/// in their inherent API and implement this trait on a copying adapter.
pub trait Digest: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  /// Usually `[u8; OUTPUT_SIZE]`.
  type Output: Copy + Eq + Debug;

  #[must_use]
  fn new() -> Self;

  /// Append `data` to the message.
  fn update(&mut self, data: &[u8]);

  /// Digest of everything absorbed so far.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Forget the absorbed message.
  fn reset(&mut self);

  /// Hash `data` in one call.
  #[inline]
  #[must_use]
  fn digest(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }
}

#[cfg(test)]
mod tests {
  use super::Digest;

  // Wrapping byte sum; enough to drive the provided `digest`.
  #[derive(Clone, Default)]
  struct ByteSum(u16);

  impl Digest for ByteSum {
    const OUTPUT_SIZE: usize = 2;
    type Output = [u8; 2];

    fn new() -> Self {
      Self(0)
    }

    fn update(&mut self, data: &[u8]) {
      self.0 = data.iter().fold(self.0, |acc, &b| acc.wrapping_add(u16::from(b)));
    }

    fn finalize(&self) -> Self::Output {
      self.0.to_le_bytes()
    }

    fn reset(&mut self) {
      self.0 = 0;
    }
  }

  #[test]
  fn one_shot_equals_streaming() {
    let mut h = ByteSum::new();
    h.update(b"ab");
    h.update(b"cd");
    assert_eq!(ByteSum::digest(b"abcd"), h.finalize());
  }

  #[test]
  fn finalize_borrows_and_reset_clears() {
    let mut h = ByteSum::new();
    h.update(b"x");
    assert_eq!(h.finalize(), h.finalize());
    h.reset();
    assert_eq!(h.finalize(), ByteSum::new().finalize());
  }
}
