use std::sync::Arc;

use kurbo::Affine;
use slotmap::SecondaryMap;

use crate::foundation::abort::AbortSwitch;
use crate::foundation::error::{RenderError, RenderResult};
use crate::foundation::math::{combine_signatures, Fnv1a64};
use crate::material::material::{BasisModifier, Material};
use crate::scene::graph::{EntityKind, NodeId, SceneGraph, SceneNode};
use crate::scene::lifecycle::{FrameContext, FrameFailure, FrameLifecycle, FrameReport, FrameWarning};
use crate::scene::params::ParamSet;
use crate::texture::instance::TextureInstance;
use crate::texture::source::TileSource;

/// The scene: a node table plus per-kind entity payloads.
///
/// The graph owns names, parameters and the scope hierarchy; payload tables
/// keyed by [`NodeId`] carry what each kind needs at render time (texel
/// sources, parsed sampling state, material frame data). Frame setup walks
/// the payloads in dependency order: texture instances bind before the
/// materials that may reference them.
#[derive(Default)]
pub struct Scene {
    graph: SceneGraph,
    textures: SecondaryMap<NodeId, Arc<dyn TileSource>>,
    instances: SecondaryMap<NodeId, TextureInstance>,
    materials: SecondaryMap<NodeId, Material>,
}

impl Scene {
    /// An empty scene holding only the root scope.
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            textures: SecondaryMap::new(),
            instances: SecondaryMap::new(),
            materials: SecondaryMap::new(),
        }
    }

    /// The root scope.
    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    /// The scene hierarchy.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the hierarchy, e.g. to rename entities.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Create a nested scope under `parent`.
    pub fn create_scope(&mut self, parent: NodeId, name: impl Into<String>) -> RenderResult<NodeId> {
        self.graph.add_scope(parent, name)
    }

    /// Add a texture with its texel data under the scope `parent`.
    pub fn add_texture(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        model: impl Into<String>,
        params: ParamSet,
        source: Arc<dyn TileSource>,
    ) -> RenderResult<NodeId> {
        let id = self.graph.add_entity(parent, EntityKind::Texture, name, model, params)?;
        self.textures.insert(id, source);
        Ok(id)
    }

    /// Add a texture instance referencing `texture_name` under `parent`.
    pub fn add_texture_instance(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        params: ParamSet,
        texture_name: impl Into<String>,
        transform: Affine,
    ) -> RenderResult<NodeId> {
        let name = name.into();
        let instance = TextureInstance::new(&name, &params, texture_name, transform);
        let id = self
            .graph
            .add_entity(parent, EntityKind::TextureInstance, name, TextureInstance::MODEL, params)?;
        self.instances.insert(id, instance);
        Ok(id)
    }

    /// Add a material under `parent`.
    pub fn add_material(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        let name = name.into();
        let material = Material::new(&name, &params);
        let id = self
            .graph
            .add_entity(parent, EntityKind::Material, name, Material::MODEL, params)?;
        self.materials.insert(id, material);
        Ok(id)
    }

    /// Add a reflectance model entity under `parent`.
    pub fn add_bsdf(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        model: impl Into<String>,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        self.graph.add_entity(parent, EntityKind::Bsdf, name, model, params)
    }

    /// Add a subsurface scattering model entity under `parent`.
    pub fn add_bssrdf(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        model: impl Into<String>,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        self.graph.add_entity(parent, EntityKind::Bssrdf, name, model, params)
    }

    /// Add an emission model entity under `parent`.
    pub fn add_edf(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        model: impl Into<String>,
        params: ParamSet,
    ) -> RenderResult<NodeId> {
        self.graph.add_entity(parent, EntityKind::Edf, name, model, params)
    }

    /// Texel data of the texture node `id`.
    pub fn texture_source(&self, id: NodeId) -> Option<&Arc<dyn TileSource>> {
        self.textures.get(id)
    }

    /// The texture instance payload behind `id`.
    pub fn texture_instance(&self, id: NodeId) -> Option<&TextureInstance> {
        self.instances.get(id)
    }

    /// The material payload behind `id`.
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Iterate over texture instances with their node ids.
    pub fn texture_instances(&self) -> impl Iterator<Item = (NodeId, &TextureInstance)> {
        self.instances.iter()
    }

    /// Iterate over materials with their node ids.
    pub fn materials(&self) -> impl Iterator<Item = (NodeId, &Material)> {
        self.materials.iter()
    }

    /// Bind one texture instance ahead of frame setup.
    ///
    /// Needed when an instance must be sampled before
    /// [`Scene::begin_frame`] runs, e.g. while building acceleration
    /// structures that filter on transparency. Binding here is the same
    /// idempotent operation frame setup performs, so a later `begin_frame`
    /// leaves the early binding untouched.
    pub fn bind_texture_instance(&mut self, id: NodeId) -> RenderResult<()> {
        let abort = AbortSwitch::new();
        let ctx = FrameContext::new(&self.graph, &self.textures, &abort);
        let instance = self
            .instances
            .get_mut(id)
            .ok_or_else(|| RenderError::validation("no texture instance behind this id"))?;
        instance.bind(&ctx, id)
    }

    /// Drop one instance's texture binding, e.g. after retargeting it to
    /// another texture. The next bind resolves the name afresh; a detected
    /// alpha mode is kept.
    pub fn unbind_texture_instance(&mut self, id: NodeId) -> RenderResult<()> {
        let instance = self
            .instances
            .get_mut(id)
            .ok_or_else(|| RenderError::validation("no texture instance behind this id"))?;
        instance.unbind();
        Ok(())
    }

    /// Drop every instance's texture binding after a topology edit.
    pub fn unbind_all_texture_instances(&mut self) {
        for (_, instance) in self.instances.iter_mut() {
            instance.unbind();
        }
    }

    /// Run frame setup over every entity.
    ///
    /// Texture instances bind first, then materials build their render
    /// data, so material references observe bound instances. A failing
    /// entity is recorded in the report and excluded from the frame; setup
    /// carries on with the rest. Only a tripped `abort` switch stops setup
    /// entirely, with [`RenderError::Aborted`].
    #[tracing::instrument(skip(self, abort))]
    pub fn begin_frame(&mut self, abort: &AbortSwitch) -> RenderResult<FrameReport> {
        let mut report = FrameReport::default();
        let ctx = FrameContext::new(&self.graph, &self.textures, abort);

        for (id, instance) in self.instances.iter_mut() {
            ctx.ensure_not_aborted()?;
            if !ctx.graph.contains(id) {
                continue;
            }
            if let Err(error) = instance.on_frame_begin(&ctx, id) {
                record_failure(&ctx, &mut report, id, error);
            }
        }

        for (id, material) in self.materials.iter_mut() {
            ctx.ensure_not_aborted()?;
            if !ctx.graph.contains(id) {
                continue;
            }
            if let Err(error) = material.on_frame_begin(&ctx, id) {
                record_failure(&ctx, &mut report, id, error);
            }
        }

        for (id, material) in self.materials.iter() {
            let Some(data) = material.render_data() else { continue };
            let entity = ctx.graph.get(id).map_or_else(String::new, |n| n.name.clone());
            for message in &data.warnings {
                report.warnings.push(FrameWarning {
                    entity: entity.clone(),
                    message: message.clone(),
                });
            }
        }

        tracing::debug!(
            instances = self.instances.len(),
            materials = self.materials.len(),
            failures = report.failures.len(),
            warnings = report.warnings.len(),
            "frame setup complete"
        );
        Ok(report)
    }

    /// Release all per-frame state. Safe to call without a matching
    /// [`Scene::begin_frame`].
    pub fn end_frame(&mut self) {
        for (_, instance) in self.instances.iter_mut() {
            instance.on_frame_end();
        }
        for (_, material) in self.materials.iter_mut() {
            material.on_frame_end();
        }
    }

    /// The texture bound to the instance `id`.
    ///
    /// This is the lazy counterpart to binding: an unresolved reference
    /// only becomes an error once something actually asks for the texture.
    /// A reference whose target was removed after binding fails the same
    /// way, since resolved references are weak.
    pub fn resolved_texture(&self, id: NodeId) -> RenderResult<NodeId> {
        let instance = self
            .instances
            .get(id)
            .ok_or_else(|| RenderError::validation("no texture instance behind this id"))?;
        let referer = self.graph.get(id).map_or("", |n| n.name.as_str());
        let texture = instance.require_texture(referer)?;
        if !self.graph.contains(texture) {
            return Err(RenderError::unknown_entity(
                instance.texture_name(),
                EntityKind::Texture.label(),
                referer,
            ));
        }
        Ok(texture)
    }

    /// Content signature of the entity `id`, usable as a cache key.
    ///
    /// Hashes the node's name, model and parameters. For texture instances
    /// the referenced texture name and, once bound, the texture's own
    /// signature are mixed in; for materials with frame data, the
    /// signatures of every resolved input follow. Editing either side of a
    /// reference therefore changes the dependent's signature. Returns
    /// `None` for stale ids.
    pub fn signature_of(&self, id: NodeId) -> Option<u64> {
        let node = self.graph.get(id)?;
        let mut h = Fnv1a64::new_default();
        node.hash_into(&mut h);
        let mut signature = h.finish();

        match node.kind() {
            EntityKind::TextureInstance => {
                if let Some(instance) = self.instances.get(id) {
                    let mut h = Fnv1a64::new_default();
                    h.write_str(instance.texture_name());
                    signature = combine_signatures(signature, h.finish());
                    if let Some(texture) = instance.texture() {
                        if let Some(texture_signature) = self.signature_of(texture) {
                            signature = combine_signatures(signature, texture_signature);
                        }
                    }
                }
            }
            EntityKind::Material => {
                if let Some(data) = self.materials.get(id).and_then(Material::render_data) {
                    let displacement_map = data.basis_modifier.map(|m| match m {
                        BasisModifier::Bump { map, .. } | BasisModifier::Normal { map, .. } => map,
                    });
                    for dep in [data.bsdf, data.bssrdf, data.edf, data.alpha_map, displacement_map]
                        .into_iter()
                        .flatten()
                    {
                        if let Some(dep_signature) = self.signature_of(dep) {
                            signature = combine_signatures(signature, dep_signature);
                        }
                    }
                }
            }
            _ => {}
        }

        Some(signature)
    }

    /// Remove an entity, or a scope with its whole subtree, together with
    /// any payloads.
    pub fn remove_entity(&mut self, id: NodeId) -> Option<SceneNode> {
        let doomed = self.graph.subtree(id);
        let node = self.graph.remove(id)?;
        for dead in doomed {
            self.textures.remove(dead);
            self.instances.remove(dead);
            self.materials.remove(dead);
        }
        Some(node)
    }
}

fn record_failure(ctx: &FrameContext<'_>, report: &mut FrameReport, id: NodeId, error: RenderError) {
    let entity = ctx.graph.get(id).map_or_else(String::new, |n| n.name.clone());
    tracing::error!(
        entity,
        error = %error,
        "entity failed frame setup and takes no part in this frame"
    );
    report.failures.push(FrameFailure { id, entity, error });
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
