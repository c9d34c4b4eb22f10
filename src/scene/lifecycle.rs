use std::sync::Arc;

use slotmap::SecondaryMap;

use crate::foundation::abort::AbortSwitch;
use crate::foundation::error::{RenderError, RenderResult};
use crate::scene::graph::{NodeId, SceneGraph};
use crate::texture::source::TileSource;

/// Frame-cycle position of an entity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleState {
    /// No frame state held; references are unresolved.
    Unbound,
    /// Frame setup completed; the entity holds resolved references or
    /// derived render data.
    Bound,
}

/// Read-only scene state handed to entities during frame setup.
pub struct FrameContext<'a> {
    /// The scene hierarchy, for name resolution.
    pub graph: &'a SceneGraph,
    textures: &'a SecondaryMap<NodeId, Arc<dyn TileSource>>,
    abort: &'a AbortSwitch,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        graph: &'a SceneGraph,
        textures: &'a SecondaryMap<NodeId, Arc<dyn TileSource>>,
        abort: &'a AbortSwitch,
    ) -> Self {
        Self { graph, textures, abort }
    }

    /// Texel data behind the texture node `id`, if the node has any.
    pub fn texture_source(&self, id: NodeId) -> Option<&dyn TileSource> {
        self.textures.get(id).map(|s| s.as_ref())
    }

    /// Fail with [`RenderError::Aborted`] once the host has requested an
    /// early stop.
    pub fn ensure_not_aborted(&self) -> RenderResult<()> {
        if self.abort.is_set() {
            Err(RenderError::Aborted)
        } else {
            Ok(())
        }
    }
}

/// Per-frame setup and teardown hooks implemented by entity payloads.
///
/// `on_frame_begin` moves the entity to [`LifecycleState::Bound`] and is
/// idempotent, so beginning an already bound entity is a no-op rather than
/// an error. `on_frame_end` releases frame state and is likewise safe to
/// call on an entity that never began.
pub trait FrameLifecycle {
    /// Current frame-cycle position.
    fn state(&self) -> LifecycleState;

    /// Resolve references and derive per-frame data.
    ///
    /// An error is fatal to this entity only; the caller records it and
    /// keeps setting up the rest of the frame.
    fn on_frame_begin(&mut self, ctx: &FrameContext<'_>, self_id: NodeId) -> RenderResult<()>;

    /// Drop per-frame data and return to [`LifecycleState::Unbound`].
    fn on_frame_end(&mut self);
}

/// Advisory notice produced during frame setup.
///
/// Warnings flag configurations that are legal but likely unintended; the
/// frame still renders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameWarning {
    /// Name of the entity the notice concerns.
    pub entity: String,
    /// Human-readable description.
    pub message: String,
}

/// Entity excluded from the frame after a fatal per-entity error.
#[derive(Debug)]
pub struct FrameFailure {
    /// The failed entity.
    pub id: NodeId,
    /// Name of the failed entity.
    pub entity: String,
    /// What went wrong.
    pub error: RenderError,
}

/// Outcome of [`Scene::begin_frame`](crate::Scene::begin_frame).
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Advisory notices; the frame renders regardless.
    pub warnings: Vec<FrameWarning>,
    /// Entities that failed setup and take no part in the frame.
    pub failures: Vec<FrameFailure>,
}

impl FrameReport {
    /// Whether setup finished without warnings or per-entity failures.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }
}
