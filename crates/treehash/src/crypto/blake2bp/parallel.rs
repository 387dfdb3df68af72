//! One-shot BLAKE2bp with each leaf lane on its own scoped thread.
//!
//! Lane `i` reads blocks `i, i + 4, i + 8, ...` straight from the input, so the
//! threads share nothing but the immutable message. Digests are joined in lane
//! order before the root combine regardless of which thread finishes first.

use std::thread;

use super::{BLOCK_LEN, DEGREE, OUT_LEN, checked_out_len, combine, leaf_lane, root_lane};
use crate::{Error, Hash};

/// Inputs shorter than this are hashed on the calling thread.
pub const MIN_PARALLEL_LEN: usize = 16 * 1024;

/// Digest of `data`, identical to [`super::Blake2bp::digest`].
pub fn digest(out_len: usize, data: &[u8]) -> Result<Hash, Error> {
  let len = checked_out_len(out_len)?;
  if data.len() < MIN_PARALLEL_LEN {
    return super::Blake2bp::digest(out_len, data);
  }

  let leaves = leaf_digests(len, data, [0, 1, 2, 3]);
  let mut root = root_lane(len);
  Ok(Hash::new(combine(&mut root, &leaves), out_len))
}

fn hash_lane(out_len: u8, lane: usize, data: &[u8]) -> [u8; OUT_LEN] {
  let mut leaf = leaf_lane(out_len, lane);
  for block in data.chunks(BLOCK_LEN).skip(lane).step_by(DEGREE) {
    leaf.absorb(block);
  }
  leaf.finish()
}

/// Run the leaves, spawning them in `spawn_order`; results are in lane order.
pub(crate) fn leaf_digests(out_len: u8, data: &[u8], spawn_order: [usize; DEGREE]) -> [[u8; OUT_LEN]; DEGREE] {
  debug_assert!((0..DEGREE).all(|lane| spawn_order.contains(&lane)));

  thread::scope(|s| {
    let mut handles: [Option<thread::ScopedJoinHandle<'_, [u8; OUT_LEN]>>; DEGREE] = [const { None }; DEGREE];
    for lane in spawn_order {
      if let Some(slot) = handles.get_mut(lane) {
        *slot = Some(s.spawn(move || hash_lane(out_len, lane, data)));
      }
    }

    let mut digests = [[0u8; OUT_LEN]; DEGREE];
    for (digest, handle) in digests.iter_mut().zip(handles) {
      if let Some(handle) = handle {
        *digest = handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload));
      }
    }
    digests
  })
}
