#![no_main]

use libfuzzer_sys::fuzz_target;
use traits::Digest as _;
use treehash::crypto::{Blake2bp, Blake2bp512};

fn split_point(input: &[u8]) -> usize {
  if input.is_empty() {
    return 0;
  }
  (input[0] as usize) % (input.len() + 1)
}

fn out_len(input: &[u8]) -> usize {
  input.last().map_or(64, |&b| (b as usize % 64) + 1)
}

fuzz_target!(|input: &[u8]| {
  let split = split_point(input);
  let (a, b) = input.split_at(split);
  let len = out_len(input);

  let ours = Blake2bp::digest(len, input).unwrap();

  let mut ctx = Blake2bp::new(len).unwrap();
  ctx.update(a).unwrap();
  ctx.update(b).unwrap();
  assert_eq!(ours, ctx.finalize().unwrap());

  let expected = blake2b_simd::blake2bp::Params::new().hash_length(len).hash(input);
  assert_eq!(ours.as_bytes(), expected.as_bytes());

  let mut h = Blake2bp512::new();
  h.update(a);
  h.update(b);
  assert_eq!(&h.finalize()[..], blake2b_simd::blake2bp::blake2bp(input).as_bytes());
});
