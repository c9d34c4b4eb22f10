//! Surface materials and their per-frame render data.

pub mod material;
