//! Primitive tree module.
//!
//! The format-independent value tree and configuration errors.

pub use graphcast_types::*;
