//! Top-level facade crate for raidwatch.
//!
//! Re-exports the protocol core and the relay runtime so users can depend on a single crate.

pub mod core {
    pub use raidwatch_core::*;
}

pub mod relay {
    pub use raidwatch_relay::*;
}
