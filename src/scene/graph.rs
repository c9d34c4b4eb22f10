use slotmap::{SecondaryMap, SlotMap};

use crate::foundation::error::{RenderError, RenderResult};
use crate::foundation::math::Fnv1a64;
use crate::scene::params::ParamSet;

slotmap::new_key_type! {
    /// Generational handle to a node in a [`SceneGraph`].
    ///
    /// Handles are weak: removing a node invalidates its id, and a stale id
    /// simply fails lookups instead of aliasing a newer node.
    pub struct NodeId;
}

/// Kind of entity a scene node represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Named container; scopes nest and drive name resolution.
    Scope,
    /// Texture resource definition.
    Texture,
    /// Placement of a texture with sampling settings.
    TextureInstance,
    /// Surface material.
    Material,
    /// Reflectance model referenced by materials.
    Bsdf,
    /// Subsurface scattering model referenced by materials.
    Bssrdf,
    /// Emission model referenced by materials.
    Edf,
}

impl EntityKind {
    /// Lowercase label used in log and error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Scope => "scope",
            EntityKind::Texture => "texture",
            EntityKind::TextureInstance => "texture instance",
            EntityKind::Material => "material",
            EntityKind::Bsdf => "bsdf",
            EntityKind::Bssrdf => "bssrdf",
            EntityKind::Edf => "edf",
        }
    }
}

/// One entry of the scene's node table.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Entity name; resolution matches it within the enclosing scopes.
    pub name: String,
    /// Model identifier of the implementation behind the entity.
    pub model: String,
    /// Authoring-time parameters.
    pub params: ParamSet,
    kind: EntityKind,
    parent: Option<NodeId>,
}

impl SceneNode {
    /// Kind of entity this node represents. Fixed at creation.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Enclosing scope, `None` only for the root scope.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn hash_into(&self, h: &mut Fnv1a64) {
        h.write_str(&self.name);
        h.write_str(&self.model);
        h.write_str(self.kind.label());
        self.params.hash_into(h);
    }
}

/// Node table holding the scene hierarchy.
///
/// Topology is append-oriented: nodes are created under an existing scope and
/// keep their parent for life. Child order within a scope is registration
/// order, which makes name lookups deterministic when duplicates exist (the
/// first registered entity wins).
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    root: NodeId,
}

impl SceneGraph {
    /// Create a graph holding only the root scope.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode {
            name: "scene".to_owned(),
            model: "scene".to_owned(),
            params: ParamSet::new(),
            kind: EntityKind::Scope,
            parent: None,
        });
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        Self { nodes, children, root }
    }

    /// The root scope.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a nested scope under `parent`.
    pub fn add_scope(&mut self, parent: NodeId, name: impl Into<String>) -> RenderResult<NodeId> {
        let id = self.add_node(parent, EntityKind::Scope, name.into(), "scope".to_owned(), ParamSet::new())?;
        self.children.insert(id, Vec::new());
        Ok(id)
    }

    /// Create a leaf entity under the scope `parent`.
    pub fn add_entity(
        &mut self,
        parent: NodeId,
        kind: EntityKind,
        name: impl Into<String>,
        model: impl Into<String>,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        if kind == EntityKind::Scope {
            return Err(RenderError::validation("scopes must be created with add_scope"));
        }
        self.add_node(parent, kind, name.into(), model.into(), params)
    }

    fn add_node(
        &mut self,
        parent: NodeId,
        kind: EntityKind,
        name: String,
        model: String,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        match self.nodes.get(parent) {
            Some(node) if node.kind == EntityKind::Scope => {}
            Some(node) => {
                return Err(RenderError::validation(format!(
                    "cannot add \"{name}\" under {} \"{}\": not a scope",
                    node.kind.label(),
                    node.name
                )));
            }
            None => return Err(RenderError::validation(format!("cannot add \"{name}\": parent scope no longer exists"))),
        }
        let id = self.nodes.insert(SceneNode {
            name,
            model,
            params,
            kind,
            parent: Some(parent),
        });
        self.children[parent].push(id);
        Ok(id)
    }

    /// Node lookup; `None` for stale or foreign ids.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node lookup, e.g. to rename an entity or edit its parameters.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Whether `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Ids of the direct children of `scope`, in registration order.
    pub fn children(&self, scope: NodeId) -> &[NodeId] {
        self.children.get(scope).map_or(&[], Vec::as_slice)
    }

    /// First child of `scope` matching `kind` and `name`.
    pub fn find_child(&self, scope: NodeId, kind: EntityKind, name: &str) -> Option<NodeId> {
        self.children(scope)
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.kind == kind && n.name == name))
    }

    /// `id` followed by all its live descendants, in unspecified order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        let mut out = vec![id];
        let mut stack = vec![id];
        while let Some(scope) = stack.pop() {
            if let Some(kids) = self.children.get(scope) {
                out.extend(kids.iter().copied());
                stack.extend(kids.iter().copied());
            }
        }
        out
    }

    /// Remove a node and, for scopes, everything beneath it.
    ///
    /// Returns the removed node, or `None` when `id` was already stale. The
    /// root scope cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        if id == self.root || !self.nodes.contains_key(id) {
            return None;
        }
        for stale in self.subtree(id).iter().skip(1) {
            self.nodes.remove(*stale);
            self.children.remove(*stale);
        }
        let node = self.nodes.remove(id)?;
        self.children.remove(id);
        if let Some(parent) = node.parent {
            if let Some(kids) = self.children.get_mut(parent) {
                kids.retain(|&k| k != id);
            }
        }
        Some(node)
    }

    /// Iterate over all live nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter()
    }

    /// Ids of all live nodes of the given kind, in unspecified order.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
