//! raidwatch core: runtime-free protocol primitives, request signing, and
//! attack-event decoding.
//!
//! This crate defines the wire-level contracts and error surface shared by the
//! relay runtime and its tests. It carries no transport or async runtime
//! dependencies.
//!
//! # Panic-free
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed frames, key material, and game payloads surface as
//! `RaidwatchError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod attack;
pub mod auth;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RaidwatchError};
