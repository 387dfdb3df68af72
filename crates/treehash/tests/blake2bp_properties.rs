use proptest::prelude::*;
use treehash::{
  Error,
  crypto::{
    Blake2bp,
    blake2bp::{SUPERBLOCK_LEN, parallel},
  },
};

fn digest_in_parts(out_len: usize, data: &[u8], cuts: &[usize]) -> treehash::Hash {
  let mut ctx = Blake2bp::new(out_len).unwrap();
  let mut start = 0;
  for &cut in cuts {
    let end = cut.clamp(start, data.len());
    ctx.update(&data[start..end]).unwrap();
    start = end;
  }
  ctx.update(&data[start..]).unwrap();
  ctx.finalize().unwrap()
}

proptest! {
  #[test]
  fn any_split_gives_same_digest(
    data in proptest::collection::vec(any::<u8>(), 0..3000),
    mut cuts in proptest::collection::vec(0usize..3000, 0..8),
    out_len in 1usize..=64,
  ) {
    cuts.sort_unstable();
    let whole = Blake2bp::digest(out_len, &data).unwrap();
    prop_assert_eq!(digest_in_parts(out_len, &data, &cuts), whole);
  }

  #[test]
  fn single_bit_flip_changes_digest(
    data in proptest::collection::vec(any::<u8>(), 1..2048),
    pos in any::<prop::sample::Index>(),
    bit in 0u8..8,
  ) {
    let mut flipped = data.clone();
    let i = pos.index(flipped.len());
    flipped[i] ^= 1 << bit;
    prop_assert_ne!(Blake2bp::digest(64, &data).unwrap(), Blake2bp::digest(64, &flipped).unwrap());
  }

  #[test]
  fn threaded_matches_sequential(data in proptest::collection::vec(any::<u8>(), 0..40_000)) {
    prop_assert_eq!(parallel::digest(48, &data).unwrap(), Blake2bp::digest(48, &data).unwrap());
  }
}

#[test]
fn output_length_bounds() {
  for len in 1..=64 {
    assert!(Blake2bp::new(len).is_ok(), "len={len}");
  }
  assert_eq!(Blake2bp::new(0).err(), Some(Error::InvalidOutputLength { requested: 0 }));
  assert_eq!(Blake2bp::new(65).err(), Some(Error::InvalidOutputLength { requested: 65 }));
}

#[test]
fn superblock_boundary_has_no_residue() {
  let data = vec![0x5au8; SUPERBLOCK_LEN];
  let mut ctx = Blake2bp::new(64).unwrap();
  ctx.update(&data).unwrap();
  assert_eq!(ctx.buffered_len(), 0);

  let mut byte_at_a_time = Blake2bp::new(64).unwrap();
  for b in &data {
    byte_at_a_time.update(core::slice::from_ref(b)).unwrap();
  }
  assert_eq!(byte_at_a_time.buffered_len(), 0);
  assert_eq!(ctx.finalize().unwrap(), byte_at_a_time.finalize().unwrap());
}

#[test]
fn output_length_is_domain_separated() {
  // Not a prefix relation: digest_length is part of every parameter block.
  let long = Blake2bp::digest(64, b"abc").unwrap();
  let short = Blake2bp::digest(32, b"abc").unwrap();
  assert_ne!(&long.as_bytes()[..32], short.as_bytes());
}

#[test]
fn buffer_one_short_fails_cleanly() {
  for out_len in [1usize, 17, 64] {
    let mut ctx = Blake2bp::new(out_len).unwrap();
    ctx.update(b"message").unwrap();
    let mut out = vec![0x11u8; out_len - 1];
    assert_eq!(
      ctx.finalize_into(&mut out),
      Err(Error::BufferTooSmall {
        needed: out_len,
        actual: out_len - 1
      })
    );
    assert!(out.iter().all(|&b| b == 0x11));
  }
}

#[test]
fn second_final_is_rejected() {
  let mut ctx = Blake2bp::new(32).unwrap();
  ctx.update(b"once").unwrap();
  let mut out = [0u8; 32];
  ctx.finalize_into(&mut out).unwrap();
  let first = out;
  assert_eq!(ctx.finalize_into(&mut out), Err(Error::AlreadyFinalized));
  assert_eq!(out, first);
  assert_eq!(ctx.update(b""), Err(Error::AlreadyFinalized));
}
