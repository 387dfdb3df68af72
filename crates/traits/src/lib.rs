//! Core traits shared by the treehash crates.
//!
//! This crate is `no_std` compatible and has zero dependencies.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Digest`] | Streaming, fixed-output cryptographic hashing |
//! | [`VerificationError`] | Opaque failure when a digest does not match |
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to ensure
//! all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

mod digest;
pub mod error;

pub use digest::Digest;
pub use error::VerificationError;
