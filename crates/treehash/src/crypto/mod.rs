//! BLAKE2b primitive and the four-leaf tree built on it.

pub mod blake2b;
pub mod blake2bp;

pub use blake2b::{Lane, ParamBlock};
pub use blake2bp::{Blake2bp, Blake2bp256, Blake2bp512};
