//! BLAKE2b compression (RFC 7693) and a single hashing lane.
//!
//! A [`Lane`] is one running BLAKE2b state initialized from an explicit
//! [`ParamBlock`]. The tree construction in [`super::blake2bp`] owns five of
//! them; nothing here is shared between lanes.

#![allow(clippy::indexing_slicing)] // Compression schedule uses fixed indices

use crate::Error;

/// Compression block size in bytes.
pub const BLOCK_LEN: usize = 128;
/// Full chaining-value width in bytes.
pub const OUT_LEN: usize = 64;
/// Largest key length a parameter block may declare.
pub const KEY_LEN: usize = 64;
pub const SALT_LEN: usize = 16;
pub const PERSONAL_LEN: usize = 16;

const IV: [u64; 8] = [
  0x6a09_e667_f3bc_c908,
  0xbb67_ae85_84ca_a73b,
  0x3c6e_f372_fe94_f82b,
  0xa54f_f53a_5f1d_36f1,
  0x510e_527f_ade6_82d1,
  0x9b05_688c_2b3e_6c1f,
  0x1f83_d9ab_fb41_bd6b,
  0x5be0_cd19_137e_2179,
];

const SIGMA: [[usize; 16]; 12] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
  [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
  [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
  [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
  [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
  [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
  [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
  [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
  [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

#[inline(always)]
fn g(a: &mut u64, b: &mut u64, c: &mut u64, d: &mut u64, x: u64, y: u64) {
  *a = a.wrapping_add(*b).wrapping_add(x);
  *d = (*d ^ *a).rotate_right(32);
  *c = c.wrapping_add(*d);
  *b = (*b ^ *c).rotate_right(24);
  *a = a.wrapping_add(*b).wrapping_add(y);
  *d = (*d ^ *a).rotate_right(16);
  *c = c.wrapping_add(*d);
  *b = (*b ^ *c).rotate_right(63);
}

/// Compress one block into `h`.
///
/// `t` is the total byte count including this block; `f` is the finalization
/// flag pair (`f[0]` marks the last block, `f[1]` the last node).
#[inline(always)]
pub(crate) fn compress(h: &mut [u64; 8], block: &[u8; BLOCK_LEN], t: u128, f: [u64; 2]) {
  let (chunks, _) = block.as_chunks::<8>();
  let mut m = [0u64; 16];
  for (i, c) in chunks.iter().enumerate() {
    m[i] = u64::from_le_bytes(*c);
  }

  let mut v = [
    h[0],
    h[1],
    h[2],
    h[3],
    h[4],
    h[5],
    h[6],
    h[7],
    IV[0],
    IV[1],
    IV[2],
    IV[3],
    IV[4] ^ (t as u64),
    IV[5] ^ ((t >> 64) as u64),
    IV[6] ^ f[0],
    IV[7] ^ f[1],
  ];

  for s in &SIGMA {
    let [v0, v1, v2, v3, v4, v5, v6, v7, v8, v9, v10, v11, v12, v13, v14, v15] = &mut v;

    g(v0, v4, v8, v12, m[s[0]], m[s[1]]);
    g(v1, v5, v9, v13, m[s[2]], m[s[3]]);
    g(v2, v6, v10, v14, m[s[4]], m[s[5]]);
    g(v3, v7, v11, v15, m[s[6]], m[s[7]]);

    g(v0, v5, v10, v15, m[s[8]], m[s[9]]);
    g(v1, v6, v11, v12, m[s[10]], m[s[11]]);
    g(v2, v7, v8, v13, m[s[12]], m[s[13]]);
    g(v3, v4, v9, v14, m[s[14]], m[s[15]]);
  }

  for i in 0..8 {
    h[i] ^= v[i] ^ v[i + 8];
  }
}

/// BLAKE2b parameter block.
///
/// Serialized by [`ParamBlock::to_bytes`] into the 64-byte little-endian layout
/// that is XORed into the IV; two implementations agree on a digest only if
/// they agree on these bytes.
///
/// | Offset | Field |
/// |--------|-------|
/// | 0 | digest length |
/// | 1 | key length |
/// | 2 | fanout |
/// | 3 | depth |
/// | 4..8 | leaf length |
/// | 8..16 | node offset |
/// | 16 | node depth |
/// | 17 | inner length |
/// | 18..32 | reserved (zero) |
/// | 32..48 | salt |
/// | 48..64 | personalization |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamBlock {
  pub digest_length: u8,
  pub key_length: u8,
  pub fanout: u8,
  pub depth: u8,
  pub leaf_length: u32,
  pub node_offset: u64,
  pub node_depth: u8,
  pub inner_length: u8,
  pub salt: [u8; SALT_LEN],
  pub personal: [u8; PERSONAL_LEN],
}

impl ParamBlock {
  /// Serialized size in bytes.
  pub const LEN: usize = 64;

  /// Plain sequential BLAKE2b with the given digest length.
  #[must_use]
  pub const fn sequential(digest_length: u8) -> Self {
    Self {
      digest_length,
      key_length: 0,
      fanout: 1,
      depth: 1,
      leaf_length: 0,
      node_offset: 0,
      node_depth: 0,
      inner_length: 0,
      salt: [0; SALT_LEN],
      personal: [0; PERSONAL_LEN],
    }
  }

  /// Reject blocks no lane can be initialized from.
  pub fn validate(&self) -> Result<(), Error> {
    let digest_ok = (1..=OUT_LEN).contains(&usize::from(self.digest_length));
    let key_ok = usize::from(self.key_length) <= KEY_LEN;
    if digest_ok && key_ok { Ok(()) } else { Err(Error::InvalidParameter) }
  }

  #[must_use]
  pub fn to_bytes(&self) -> [u8; Self::LEN] {
    let mut p = [0u8; Self::LEN];
    p[0] = self.digest_length;
    p[1] = self.key_length;
    p[2] = self.fanout;
    p[3] = self.depth;
    p[4..8].copy_from_slice(&self.leaf_length.to_le_bytes());
    p[8..16].copy_from_slice(&self.node_offset.to_le_bytes());
    p[16] = self.node_depth;
    p[17] = self.inner_length;
    p[32..48].copy_from_slice(&self.salt);
    p[48..64].copy_from_slice(&self.personal);
    p
  }

  fn initial_chaining_value(&self) -> [u64; 8] {
    let bytes = self.to_bytes();
    let (words, _) = bytes.as_chunks::<8>();
    let mut h = IV;
    for (hi, w) in h.iter_mut().zip(words) {
      *hi ^= u64::from_le_bytes(*w);
    }
    h
  }
}

/// One BLAKE2b hashing lane.
///
/// Input is buffered lazily: a full block stays in the buffer until more input
/// arrives, so the final block can always be compressed with the last-block
/// flag set. A lane is finalized exactly once.
#[derive(Clone)]
pub struct Lane {
  h: [u64; 8],
  t: u128,
  f: [u64; 2],
  buf: [u8; BLOCK_LEN],
  buf_len: usize,
  out_len: usize,
  last_node: bool,
}

impl Lane {
  /// Initialize a lane from `params`.
  ///
  /// `last_node` marks the rightmost node of its tree level; it sets the second
  /// finalization word when the lane is finalized.
  pub fn new(params: &ParamBlock, last_node: bool) -> Result<Self, Error> {
    params.validate()?;
    Ok(Self::new_unchecked(params, last_node))
  }

  /// Callers guarantee `params` validates.
  pub(crate) fn new_unchecked(params: &ParamBlock, last_node: bool) -> Self {
    debug_assert!(params.validate().is_ok());
    Self {
      h: params.initial_chaining_value(),
      t: 0,
      f: [0; 2],
      buf: [0u8; BLOCK_LEN],
      buf_len: 0,
      out_len: usize::from(params.digest_length),
      last_node,
    }
  }

  /// Absorb `data`.
  pub fn update(&mut self, data: &[u8]) -> Result<(), Error> {
    if self.is_finalized() {
      return Err(Error::AlreadyFinalized);
    }
    self.absorb(data);
    Ok(())
  }

  /// Finalize and return the full 64-byte chaining value.
  ///
  /// The output is not truncated to the configured digest length; tree nodes
  /// always hand the full width to their parent.
  pub fn finalize(&mut self) -> Result<[u8; OUT_LEN], Error> {
    if self.is_finalized() {
      return Err(Error::AlreadyFinalized);
    }
    Ok(self.finish())
  }

  #[inline]
  #[must_use]
  pub fn is_finalized(&self) -> bool {
    self.f[0] != 0
  }

  /// Bytes compressed so far, excluding the buffered tail.
  #[inline]
  #[must_use]
  pub fn bytes_hashed(&self) -> u128 {
    self.t
  }

  #[inline]
  #[must_use]
  pub fn buffered_len(&self) -> usize {
    self.buf_len
  }

  /// Digest length declared in the lane's parameter block.
  #[inline]
  #[must_use]
  pub fn out_len(&self) -> usize {
    self.out_len
  }

  #[inline]
  #[must_use]
  pub fn is_last_node(&self) -> bool {
    self.last_node
  }

  #[inline]
  fn compress_block(&mut self, block: &[u8; BLOCK_LEN]) {
    self.t = self.t.wrapping_add(BLOCK_LEN as u128);
    compress(&mut self.h, block, self.t, self.f);
  }

  /// Unchecked update; callers guarantee the lane is not finalized.
  pub(crate) fn absorb(&mut self, mut data: &[u8]) {
    if data.is_empty() {
      return;
    }

    if self.buf_len != 0 {
      let take = core::cmp::min(BLOCK_LEN - self.buf_len, data.len());
      self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
      self.buf_len += take;
      data = &data[take..];

      if self.buf_len == BLOCK_LEN && !data.is_empty() {
        let block = self.buf;
        self.compress_block(&block);
        self.buf_len = 0;
      }
    }

    let (blocks, rest) = data.as_chunks::<BLOCK_LEN>();
    if !blocks.is_empty() {
      // With no trailing bytes, the last full block is held back for finalization.
      let (to_compress, held) = if rest.is_empty() {
        (&blocks[..blocks.len() - 1], blocks.last())
      } else {
        (blocks, None)
      };

      for block in to_compress {
        self.compress_block(block);
      }

      if let Some(last) = held {
        self.buf.copy_from_slice(last);
        self.buf_len = BLOCK_LEN;
      }
    }

    if !rest.is_empty() {
      self.buf[..rest.len()].copy_from_slice(rest);
      self.buf_len = rest.len();
    }
  }

  /// Unchecked finalization; callers guarantee the lane is not finalized.
  pub(crate) fn finish(&mut self) -> [u8; OUT_LEN] {
    self.t = self.t.wrapping_add(self.buf_len as u128);
    self.f[0] = u64::MAX;
    if self.last_node {
      self.f[1] = u64::MAX;
    }
    self.buf[self.buf_len..].fill(0);
    compress(&mut self.h, &self.buf, self.t, self.f);
    self.buf_len = 0;

    let mut out = [0u8; OUT_LEN];
    for (chunk, word) in out.chunks_exact_mut(8).zip(self.h) {
      chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
  }
}
