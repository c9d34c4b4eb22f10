use crate::foundation::error::{RenderError, RenderResult};
use crate::scene::graph::{EntityKind, NodeId};

/// What a call to [`EntityBinding::bind_with`] did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindOutcome {
    /// The binding was already in place; no resolution was attempted.
    AlreadyBound,
    /// The target was resolved and stored.
    Bound(NodeId),
    /// Resolution found nothing; the binding stays empty.
    Unresolved,
}

/// Frame-scoped link from a referencing entity to a resolved target.
///
/// Binding is idempotent: once a target is stored, later calls are no-ops
/// and never re-resolve, even if entities were renamed in between. Failing
/// to resolve is not an error at bind time; consumers that actually need the
/// target call [`EntityBinding::require_resolved`], which is where a missing
/// entity becomes fatal.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityBinding {
    target: Option<NodeId>,
}

impl EntityBinding {
    /// An unbound binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a target is currently stored.
    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    /// The stored target, if any.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Bind by running `resolve`, unless a target is already stored.
    pub fn bind_with(&mut self, resolve: impl FnOnce() -> Option<NodeId>) -> BindOutcome {
        if self.target.is_some() {
            return BindOutcome::AlreadyBound;
        }
        match resolve() {
            Some(id) => {
                self.target = Some(id);
                BindOutcome::Bound(id)
            }
            None => BindOutcome::Unresolved,
        }
    }

    /// Drop the stored target, returning the binding to its unbound state.
    pub fn unbind(&mut self) {
        self.target = None;
    }

    /// The stored target, or an unknown-entity error naming the reference.
    ///
    /// `name` is the referenced entity's name, `kind` what it was expected
    /// to be, and `referer` the entity holding the reference.
    pub fn require_resolved(&self, name: &str, kind: EntityKind, referer: &str) -> RenderResult<NodeId> {
        self.target
            .ok_or_else(|| RenderError::unknown_entity(name, kind.label(), referer))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/binding.rs"]
mod tests;
