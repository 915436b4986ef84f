//! Shared error definitions and filesystem helpers used across all clawmux crates.

pub mod error;
pub mod fs;

pub use error::{ClawmuxError, Error, FromMessage, Result};
