//! Pointer input types fed in by the host.

mod types;

pub use types::*;
