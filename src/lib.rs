//! Candela is the scene binding and output accumulation core of a
//! physically-based CPU renderer.
//!
//! Candela owns the stretch of the pipeline between an authored scene
//! description and the shading kernels: it resolves the names entities use
//! to reference each other, derives per-frame render state, and routes
//! shading results into arbitrary output variables (AOVs).
//!
//! # Frame cycle overview
//!
//! 1. **Author**: build a [`Scene`] out of scopes, textures, texture
//!    instances, materials and shading model entities
//! 2. **Begin**: [`Scene::begin_frame`] resolves named references, detects
//!    texture alpha modes and builds material render data
//! 3. **Render**: each worker creates an [`AovAccumulatorSet`] from the
//!    shared [`AovRegistry`] and feeds it [`ShadingComponents`] per sample
//! 4. **End**: [`Scene::end_frame`] releases all per-frame state
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Lazy failure**: a dangling reference is only an error at the first
//!   point of actual use; authoring and binding tolerate absent names.
//! - **Bounded inspection**: alpha mode detection keeps at most one texture
//!   tile in memory, whatever the texture size.
//! - **Lock-free accumulation**: every worker owns its accumulators; the
//!   sample write path takes no lock.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aov;
mod foundation;
mod material;
mod scene;
mod texture;

pub use kurbo::Affine;

pub use aov::accumulator::{ColorAccumulator, ShadingComponents};
pub use aov::registry::{AovAccumulatorSet, AovKind, AovRegistry};
pub use foundation::abort::AbortSwitch;
pub use foundation::color::Color3;
pub use foundation::error::{RenderError, RenderResult};
pub use material::material::{
    BasisModifier, DisplacementMethod, Material, MaterialRenderData, NormalMapUp,
};
pub use scene::binding::{BindOutcome, EntityBinding};
pub use scene::graph::{EntityKind, NodeId, SceneGraph, SceneNode};
pub use scene::lifecycle::{
    FrameContext, FrameFailure, FrameLifecycle, FrameReport, FrameWarning, LifecycleState,
};
pub use scene::metadata::{ModelMetadata, ParamKind, ParamSpec};
pub use scene::params::ParamSet;
pub use scene::resolve::{resolve_from, resolve_in};
pub use scene::scene::Scene;
pub use texture::detect::{AlphaMode, detect_alpha_mode};
pub use texture::instance::{AddressingMode, FilteringMode, TextureInstance};
pub use texture::source::{MemoryTexture, TextureProperties, Tile, TileSource};
