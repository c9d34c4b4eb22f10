use crate::foundation::error::RenderResult;
use crate::scene::graph::{EntityKind, NodeId};
use crate::scene::lifecycle::{FrameContext, FrameLifecycle, LifecycleState};
use crate::scene::metadata::{ModelMetadata, ParamSpec};
use crate::scene::params::ParamSet;
use crate::scene::resolve::resolve_from;

/// How a displacement map perturbs the shading basis.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplacementMethod {
    /// Heightfield interpreted as bump mapping.
    Bump,
    /// Map interpreted as an encoded normal.
    Normal,
}

/// Which channel of a normal map encodes the up direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMapUp {
    /// Green channel is up.
    Y,
    /// Blue channel is up.
    Z,
}

/// Shading basis perturbation derived from the displacement settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BasisModifier {
    /// Bump mapping from a heightfield.
    Bump {
        /// The displacement map's texture instance.
        map: NodeId,
        /// Height scale.
        amplitude: f32,
    },
    /// Normal mapping.
    Normal {
        /// The normal map's texture instance.
        map: NodeId,
        /// Channel carrying the up direction.
        up: NormalMapUp,
    },
}

/// References and derived state a material holds while a frame is active.
///
/// Built afresh by every [`Material::on_frame_begin`]; unresolved names
/// simply stay `None` until something actually needs them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialRenderData {
    /// Resolved reflectance model.
    pub bsdf: Option<NodeId>,
    /// Resolved subsurface scattering model.
    pub bssrdf: Option<NodeId>,
    /// Resolved emission model.
    pub edf: Option<NodeId>,
    /// Resolved alpha map texture instance.
    pub alpha_map: Option<NodeId>,
    /// Basis perturbation, present when a displacement map resolved.
    pub basis_modifier: Option<BasisModifier>,
    /// Advisory notices raised while building this data.
    pub warnings: Vec<String>,
}

/// Surface material tying reflectance, emission and transparency together.
///
/// All cross-entity references are by name and resolved at frame setup
/// relative to the material's own scope.
#[derive(Clone, Debug)]
pub struct Material {
    bsdf_name: Option<String>,
    bssrdf_name: Option<String>,
    edf_name: Option<String>,
    alpha_map_name: Option<String>,
    displacement_map_name: Option<String>,
    displacement_method: DisplacementMethod,
    bump_amplitude: f32,
    normal_map_up: NormalMapUp,
    render_data: Option<MaterialRenderData>,
}

fn entity_ref(params: &ParamSet, key: &str) -> Option<String> {
    params.get_str(key).filter(|s| !s.is_empty()).map(str::to_owned)
}

impl Material {
    /// Model identifier carried by material nodes.
    pub const MODEL: &'static str = "generic_material";

    /// Create a material from its parameters.
    ///
    /// `name` is the material's own name, used to tag parameter warnings.
    pub fn new(name: &str, params: &ParamSet) -> Self {
        let context = format!("material \"{name}\"");

        let displacement_method =
            match params.get_enum_or("displacement_method", "bump", &["bump", "normal"], &context) {
                "normal" => DisplacementMethod::Normal,
                _ => DisplacementMethod::Bump,
            };

        let normal_map_up = match params.get_enum_or("normal_map_up", "z", &["y", "z"], &context) {
            "y" => NormalMapUp::Y,
            _ => NormalMapUp::Z,
        };

        Self {
            bsdf_name: entity_ref(params, "bsdf"),
            bssrdf_name: entity_ref(params, "bssrdf"),
            edf_name: entity_ref(params, "edf"),
            alpha_map_name: entity_ref(params, "alpha_map"),
            displacement_map_name: entity_ref(params, "displacement_map"),
            displacement_method,
            bump_amplitude: params.get_f32_or("bump_amplitude", 1.0, &context),
            normal_map_up,
            render_data: None,
        }
    }

    /// Name of the referenced reflectance model, if any.
    pub fn bsdf_name(&self) -> Option<&str> {
        self.bsdf_name.as_deref()
    }

    /// Name of the referenced emission model, if any.
    pub fn edf_name(&self) -> Option<&str> {
        self.edf_name.as_deref()
    }

    /// Name of the referenced alpha map, if any.
    pub fn alpha_map_name(&self) -> Option<&str> {
        self.alpha_map_name.as_deref()
    }

    /// Displacement method parsed at construction.
    pub fn displacement_method(&self) -> DisplacementMethod {
        self.displacement_method
    }

    /// Bump amplitude parsed at construction.
    pub fn bump_amplitude(&self) -> f32 {
        self.bump_amplitude
    }

    /// Normal map up channel parsed at construction.
    pub fn normal_map_up(&self) -> NormalMapUp {
        self.normal_map_up
    }

    /// Frame state, present between `on_frame_begin` and `on_frame_end`.
    pub fn render_data(&self) -> Option<&MaterialRenderData> {
        self.render_data.as_ref()
    }

    fn resolve_ref(
        &self,
        ctx: &FrameContext<'_>,
        self_id: NodeId,
        kind: EntityKind,
        name: Option<&str>,
    ) -> Option<NodeId> {
        name.and_then(|n| resolve_from(ctx.graph, self_id, kind, n))
    }

    fn create_basis_modifier(&self, displacement_map: Option<NodeId>) -> Option<BasisModifier> {
        let map = displacement_map?;
        Some(match self.displacement_method {
            DisplacementMethod::Bump => BasisModifier::Bump {
                map,
                amplitude: self.bump_amplitude,
            },
            DisplacementMethod::Normal => BasisModifier::Normal {
                map,
                up: self.normal_map_up,
            },
        })
    }

    /// Parameter sheet for generic materials.
    pub fn metadata() -> ModelMetadata {
        ModelMetadata {
            model: Self::MODEL,
            params: vec![
                ParamSpec::entity_ref("bsdf", "BSDF", "bsdf"),
                ParamSpec::entity_ref("bssrdf", "BSSRDF", "bssrdf"),
                ParamSpec::entity_ref("edf", "EDF", "edf"),
                ParamSpec::entity_ref("alpha_map", "Alpha Map", "texture_instance"),
                ParamSpec::entity_ref("displacement_map", "Displacement Map", "texture_instance"),
                ParamSpec::enumeration("displacement_method", "Displacement Method", &["bump", "normal"], "bump")
                    .required(),
                ParamSpec::numeric("bump_amplitude", "Bump Amplitude", 0.0, 1.0, 1.0),
                ParamSpec::enumeration("normal_map_up", "Normal Map Up Vector", &["y", "z"], "z"),
            ],
        }
    }
}

impl FrameLifecycle for Material {
    fn state(&self) -> LifecycleState {
        if self.render_data.is_some() {
            LifecycleState::Bound
        } else {
            LifecycleState::Unbound
        }
    }

    fn on_frame_begin(&mut self, ctx: &FrameContext<'_>, self_id: NodeId) -> RenderResult<()> {
        if self.render_data.is_some() {
            return Ok(());
        }

        let mut data = MaterialRenderData {
            bsdf: self.resolve_ref(ctx, self_id, EntityKind::Bsdf, self.bsdf_name.as_deref()),
            bssrdf: self.resolve_ref(ctx, self_id, EntityKind::Bssrdf, self.bssrdf_name.as_deref()),
            edf: self.resolve_ref(ctx, self_id, EntityKind::Edf, self.edf_name.as_deref()),
            alpha_map: self.resolve_ref(
                ctx,
                self_id,
                EntityKind::TextureInstance,
                self.alpha_map_name.as_deref(),
            ),
            basis_modifier: None,
            warnings: Vec::new(),
        };
        let displacement_map = self.resolve_ref(
            ctx,
            self_id,
            EntityKind::TextureInstance,
            self.displacement_map_name.as_deref(),
        );
        data.basis_modifier = self.create_basis_modifier(displacement_map);

        if data.edf.is_some() && data.alpha_map.is_some() {
            let name = ctx.graph.get(self_id).map_or("", |n| n.name.as_str());
            tracing::warn!(
                material = name,
                "material is emitting light but may be partially or entirely transparent; \
                 this may lead to unexpected or unphysical results"
            );
            data.warnings.push(
                "material is emitting light but may be partially or entirely transparent; \
                 this may lead to unexpected or unphysical results"
                    .to_owned(),
            );
        }

        self.render_data = Some(data);
        Ok(())
    }

    fn on_frame_end(&mut self) {
        self.render_data = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/material.rs"]
mod tests;
