//! Shared primitives: errors, colors, hashing, abort signaling.

pub mod abort;
pub mod color;
pub mod error;
pub(crate) mod math;
