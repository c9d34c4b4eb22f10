//! Scoped name resolution over the scene hierarchy.
//!
//! References between entities are plain names. A name is resolved relative
//! to the referencing entity: its enclosing scope is searched first, then
//! each ancestor scope in turn up to the root. The first match wins, so an
//! entity in an inner scope shadows a same-named entity in an outer one.
//! Failure to resolve is not an error here; callers decide whether a missing
//! name matters.

use crate::scene::graph::{EntityKind, NodeId, SceneGraph};

/// Resolve `name` as seen from the entity `referer`.
///
/// The search starts at the scope enclosing `referer` and walks upward.
/// Returns `None` when no scope on the path holds a matching entity, or when
/// `referer` itself is stale.
pub fn resolve_from(graph: &SceneGraph, referer: NodeId, kind: EntityKind, name: &str) -> Option<NodeId> {
    let node = graph.get(referer)?;
    // Only the root scope has no parent; a search from the root scans the
    // root itself.
    let scope = node.parent().unwrap_or(referer);
    resolve_in(graph, scope, kind, name)
}

/// Resolve `name` starting at `scope` itself, then its ancestors.
pub fn resolve_in(graph: &SceneGraph, scope: NodeId, kind: EntityKind, name: &str) -> Option<NodeId> {
    let mut current = Some(scope);
    while let Some(scope) = current {
        if let Some(found) = graph.find_child(scope, kind, name) {
            return Some(found);
        }
        current = graph.get(scope)?.parent();
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/scene/resolve.rs"]
mod tests;
