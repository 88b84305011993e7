//! Error types and dense numeric helpers shared by the `xdsp` crates.
//!
//! Nothing in here knows about labeled arrays; it is the layer the labeled
//! spectral code in `xdsp` is built on.

mod error;
pub mod num_rs;

pub use error::*;

/// Result alias used across the workspace.
pub type Result<T> = core::result::Result<T, Error>;
