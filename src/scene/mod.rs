//! Scene authoring, scoped name resolution and the frame lifecycle.

pub mod binding;
pub mod graph;
pub mod lifecycle;
pub mod metadata;
pub mod params;
pub mod resolve;
pub mod scene;
