use core::hint::black_box;

use criterion::{BenchmarkGroup, Throughput, measurement::WallTime};

/// Deterministic, fast pseudo-random generator suitable for benchmarks.
#[inline]
fn xorshift64star(state: &mut u64) -> u64 {
  let mut x = *state;
  x ^= x >> 12;
  x ^= x << 25;
  x ^= x >> 27;
  *state = x;
  x.wrapping_mul(0x2545F4914F6CDD1D)
}

pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut state = seed ^ (len as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
  let mut out = vec![0u8; len];
  for b in &mut out {
    *b = (xorshift64star(&mut state) >> 56) as u8;
  }
  black_box(&out);
  out
}

/// Sizes straddling the 128-byte block and 512-byte super-block boundaries,
/// then bulk sizes where the threaded path applies.
pub fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  let sizes = [0usize, 64, 128, 511, 512, 513, 4 * 1024, 64 * 1024, 1024 * 1024];
  sizes
    .into_iter()
    .map(|len| (len, pseudo_random_bytes(len, 0xB2B7_0004)))
    .collect()
}

pub fn set_throughput(group: &mut BenchmarkGroup<'_, WallTime>, len: usize) {
  group.throughput(Throughput::Bytes(len.max(1) as u64));
}
