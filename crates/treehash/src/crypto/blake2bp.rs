//! BLAKE2bp: a fixed fan-out 4, depth 2 BLAKE2b tree.
//!
//! Input is cut into 128-byte blocks dealt round-robin to four leaf lanes
//! (block `j` goes to leaf `j % 4`). Each leaf produces a full 64-byte digest;
//! the four digests, in leaf order, form the 256-byte message of the root
//! lane, whose digest is truncated to the requested length.
//!
//! Leaves and root differ only in their [`ParamBlock`]: leaves carry
//! `node_depth = 0` and `node_offset = lane index`, the root carries
//! `node_depth = 1`. Leaf 3 and the root are flagged as last nodes.

#![allow(clippy::indexing_slicing)] // Super-block slicing at fixed lane offsets

#[cfg(feature = "std")]
pub mod parallel;

use traits::{Digest, VerificationError};

use super::blake2b::{BLOCK_LEN, Lane, OUT_LEN, PERSONAL_LEN, ParamBlock, SALT_LEN};
use crate::{Error, Hash};

/// Number of leaf lanes.
pub const DEGREE: usize = 4;

/// Bytes buffered before one block is dealt to every leaf.
pub const SUPERBLOCK_LEN: usize = BLOCK_LEN * DEGREE;

/// Fixed tree shape written into every parameter block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeShape {
  pub fanout: u8,
  pub depth: u8,
  pub leaf_length: u32,
  pub inner_length: u8,
}

pub const SHAPE: TreeShape = TreeShape {
  fanout: DEGREE as u8,
  depth: 2,
  leaf_length: 0,
  inner_length: OUT_LEN as u8,
};

const fn tree_params(out_len: u8, key_len: u8, node_offset: u64, node_depth: u8) -> ParamBlock {
  ParamBlock {
    digest_length: out_len,
    key_length: key_len,
    fanout: SHAPE.fanout,
    depth: SHAPE.depth,
    leaf_length: SHAPE.leaf_length,
    node_offset,
    node_depth,
    inner_length: SHAPE.inner_length,
    salt: [0; SALT_LEN],
    personal: [0; PERSONAL_LEN],
  }
}

/// Parameter block for leaf `lane` (0..4).
#[must_use]
pub const fn leaf_params(out_len: u8, key_len: u8, lane: u64) -> ParamBlock {
  tree_params(out_len, key_len, lane, 0)
}

/// Parameter block for the root.
#[must_use]
pub const fn root_params(out_len: u8, key_len: u8) -> ParamBlock {
  tree_params(out_len, key_len, 0, 1)
}

#[inline]
fn rejected(err: Error) -> Error {
  #[cfg(feature = "tracing")]
  tracing::debug!(error = %err, "blake2bp operation rejected");
  err
}

pub(crate) fn checked_out_len(out_len: usize) -> Result<u8, Error> {
  if (1..=OUT_LEN).contains(&out_len) {
    Ok(out_len as u8)
  } else {
    Err(rejected(Error::InvalidOutputLength { requested: out_len }))
  }
}

pub(crate) fn leaf_lane(out_len: u8, lane: usize) -> Lane {
  Lane::new_unchecked(&leaf_params(out_len, 0, lane as u64), lane == DEGREE - 1)
}

pub(crate) fn root_lane(out_len: u8) -> Lane {
  Lane::new_unchecked(&root_params(out_len, 0), true)
}

/// Feed the leaf digests, in lane order, to the root and finalize it.
pub(crate) fn combine(root: &mut Lane, leaf_digests: &[[u8; OUT_LEN]; DEGREE]) -> [u8; OUT_LEN] {
  for digest in leaf_digests {
    root.absorb(digest);
  }
  root.finish()
}

/// Incremental BLAKE2bp context.
///
/// Created per message, fed through [`update`](Self::update), and finalized
/// once. After finalization every update or finalize call fails with
/// [`Error::AlreadyFinalized`].
#[derive(Clone)]
pub struct Blake2bp {
  leaves: [Lane; DEGREE],
  root: Lane,
  buf: [u8; SUPERBLOCK_LEN],
  buf_len: usize,
  out_len: usize,
  finalized: bool,
}

impl Blake2bp {
  /// Start a context producing `out_len` bytes (1..=64).
  pub fn new(out_len: usize) -> Result<Self, Error> {
    let len = checked_out_len(out_len)?;
    #[cfg(feature = "tracing")]
    tracing::trace!(out_len, "blake2bp context initialized");
    Ok(Self::init(len))
  }

  fn init(out_len: u8) -> Self {
    Self {
      leaves: core::array::from_fn(|lane| leaf_lane(out_len, lane)),
      root: root_lane(out_len),
      buf: [0u8; SUPERBLOCK_LEN],
      buf_len: 0,
      out_len: usize::from(out_len),
      finalized: false,
    }
  }

  /// One-shot digest of `data`.
  pub fn digest(out_len: usize, data: &[u8]) -> Result<Hash, Error> {
    let mut ctx = Self::new(out_len)?;
    ctx.absorb(data);
    ctx.finalize()
  }

  /// Append `data` to the message. Empty input is a no-op.
  pub fn update(&mut self, data: &[u8]) -> Result<(), Error> {
    if self.finalized {
      return Err(rejected(Error::AlreadyFinalized));
    }
    self.absorb(data);
    Ok(())
  }

  /// Write the digest into `out[..out_len]`.
  ///
  /// Fails with [`Error::BufferTooSmall`] without touching `out` or the
  /// context, which can then be finalized with a larger buffer.
  pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), Error> {
    if self.finalized {
      return Err(rejected(Error::AlreadyFinalized));
    }
    let actual = out.len();
    let Some(dst) = out.get_mut(..self.out_len) else {
      return Err(rejected(Error::BufferTooSmall {
        needed: self.out_len,
        actual,
      }));
    };
    let digest = self.finish();
    dst.copy_from_slice(&digest[..self.out_len]);
    Ok(())
  }

  /// Finalize and return the digest.
  pub fn finalize(&mut self) -> Result<Hash, Error> {
    if self.finalized {
      return Err(rejected(Error::AlreadyFinalized));
    }
    Ok(Hash::new(self.finish(), self.out_len))
  }

  /// Finalize and compare against `expected` in constant time.
  ///
  /// An already finalized context never verifies.
  pub fn verify(&mut self, expected: &[u8]) -> Result<(), VerificationError> {
    match self.finalize() {
      Ok(digest) if digest == *expected => Ok(()),
      _ => Err(VerificationError::new()),
    }
  }

  #[inline]
  #[must_use]
  pub fn out_len(&self) -> usize {
    self.out_len
  }

  /// Bytes held in the super-block buffer, not yet dealt to the leaves.
  #[inline]
  #[must_use]
  pub fn buffered_len(&self) -> usize {
    self.buf_len
  }

  #[inline]
  #[must_use]
  pub fn is_finalized(&self) -> bool {
    self.finalized
  }

  fn deal(leaves: &mut [Lane; DEGREE], superblock: &[u8; SUPERBLOCK_LEN]) {
    let (blocks, _) = superblock.as_chunks::<BLOCK_LEN>();
    for (leaf, block) in leaves.iter_mut().zip(blocks) {
      leaf.absorb(block);
    }
  }

  pub(crate) fn absorb(&mut self, mut data: &[u8]) {
    if data.is_empty() {
      return;
    }

    let fill = SUPERBLOCK_LEN - self.buf_len;
    if self.buf_len != 0 && data.len() >= fill {
      self.buf[self.buf_len..].copy_from_slice(&data[..fill]);
      Self::deal(&mut self.leaves, &self.buf);
      self.buf_len = 0;
      data = &data[fill..];
    }

    // Leaves hold back their newest block, so dealing a super-block as soon as
    // it is complete never costs an extra empty compression at finalization.
    let (superblocks, rest) = data.as_chunks::<SUPERBLOCK_LEN>();
    for superblock in superblocks {
      Self::deal(&mut self.leaves, superblock);
    }

    if !rest.is_empty() {
      self.buf[self.buf_len..self.buf_len + rest.len()].copy_from_slice(rest);
      self.buf_len += rest.len();
    }
  }

  /// Unchecked finalization returning the full-width root digest.
  fn finish(&mut self) -> [u8; OUT_LEN] {
    let mut leaf_digests = [[0u8; OUT_LEN]; DEGREE];
    for (i, (leaf, digest)) in self.leaves.iter_mut().zip(&mut leaf_digests).enumerate() {
      let start = i * BLOCK_LEN;
      if self.buf_len > start {
        let end = core::cmp::min(self.buf_len, start + BLOCK_LEN);
        leaf.absorb(&self.buf[start..end]);
      }
      *digest = leaf.finish();
    }
    self.buf_len = 0;
    self.finalized = true;

    #[cfg(feature = "tracing")]
    tracing::trace!(out_len = self.out_len, "blake2bp context finalized");

    combine(&mut self.root, &leaf_digests)
  }
}

/// Fixed-output BLAKE2bp implementing [`Digest`].
///
/// `finalize` works on a copy of the state, so the hasher stays usable.
#[derive(Clone)]
pub struct Blake2bpFixed<const N: usize> {
  state: Blake2bp,
}

/// BLAKE2bp with the full 64-byte output.
pub type Blake2bp512 = Blake2bpFixed<64>;

/// BLAKE2bp with `digest_length = 32` in every parameter block.
pub type Blake2bp256 = Blake2bpFixed<32>;

impl<const N: usize> Default for Blake2bpFixed<N> {
  #[inline]
  fn default() -> Self {
    const { assert!(N >= 1 && N <= OUT_LEN, "BLAKE2bp output must be 1..=64 bytes") };
    Self {
      state: Blake2bp::init(N as u8),
    }
  }
}

impl<const N: usize> Digest for Blake2bpFixed<N> {
  const OUTPUT_SIZE: usize = N;
  type Output = [u8; N];

  #[inline]
  fn new() -> Self {
    Self::default()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.state.absorb(data);
  }

  fn finalize(&self) -> Self::Output {
    let full = self.state.clone().finish();
    let mut out = [0u8; N];
    out.copy_from_slice(&full[..N]);
    out
  }

  #[inline]
  fn reset(&mut self) {
    *self = Self::default();
  }
}
