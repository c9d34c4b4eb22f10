//! Tiled texture access, alpha mode detection and texture placement.

pub mod detect;
pub mod instance;
pub mod source;
