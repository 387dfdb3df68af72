//! Four-leaf BLAKE2bp tree hashing.
//!
//! Input is striped across four BLAKE2b leaf lanes in 128-byte blocks; the four
//! 64-byte leaf digests are concatenated and hashed once more by a root lane,
//! whose output is truncated to the requested length (1..=64 bytes).
//!
//! ```
//! use treehash::crypto::Blake2bp;
//!
//! let mut ctx = Blake2bp::new(32)?;
//! ctx.update(b"hello ")?;
//! ctx.update(b"world")?;
//! let digest = ctx.finalize()?;
//! assert_eq!(digest, Blake2bp::digest(32, b"hello world")?);
//! # Ok::<(), treehash::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Threaded one-shot hashing in [`crypto::blake2bp::parallel`] |
//! | `tracing` | No | Lifecycle and rejection events through `tracing` |
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod crypto;
mod error;
mod hash;

pub use error::Error;
pub use hash::Hash;
pub use traits::{Digest, VerificationError};
