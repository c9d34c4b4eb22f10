use kurbo::Affine;

use crate::foundation::error::{RenderError, RenderResult};
use crate::scene::binding::{BindOutcome, EntityBinding};
use crate::scene::graph::{EntityKind, NodeId};
use crate::scene::lifecycle::{FrameContext, FrameLifecycle, LifecycleState};
use crate::scene::metadata::{ModelMetadata, ParamSpec};
use crate::scene::params::ParamSet;
use crate::scene::resolve::resolve_from;
use crate::texture::detect::{detect_alpha_mode, AlphaMode};

/// How texture coordinates outside the unit square are handled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Coordinates are clamped to the edge texels.
    Clamp,
    /// Coordinates wrap, tiling the texture.
    Wrap,
}

/// Texel reconstruction filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilteringMode {
    /// Nearest-texel lookup.
    Nearest,
    /// Bilinear interpolation of the four closest texels.
    Bilinear,
}

/// Placement of a texture in the scene, with sampling settings.
///
/// The instance references its texture by name; the reference is resolved
/// when the instance binds, at frame setup or through an explicit early
/// bind. Sampling modes are parsed once at construction, with invalid
/// parameter values logged and replaced by their defaults.
#[derive(Clone, Debug)]
pub struct TextureInstance {
    texture_name: String,
    transform: Affine,
    addressing_mode: AddressingMode,
    filtering_mode: FilteringMode,
    alpha_mode: AlphaMode,
    effective_alpha_mode: AlphaMode,
    texture: EntityBinding,
}

impl TextureInstance {
    /// Model identifier carried by texture instance nodes.
    pub const MODEL: &'static str = "texture_instance";

    /// Create an instance referencing the texture named `texture_name`.
    ///
    /// `name` is the instance's own name, used to tag parameter warnings.
    pub fn new(name: &str, params: &ParamSet, texture_name: impl Into<String>, transform: Affine) -> Self {
        let context = format!("texture instance \"{name}\"");

        let addressing_mode =
            match params.get_enum_or("addressing_mode", "wrap", &["clamp", "wrap"], &context) {
                "clamp" => AddressingMode::Clamp,
                _ => AddressingMode::Wrap,
            };

        let filtering_mode =
            match params.get_enum_or("filtering_mode", "bilinear", &["nearest", "bilinear"], &context) {
                "nearest" => FilteringMode::Nearest,
                _ => FilteringMode::Bilinear,
            };

        let alpha_mode = match params.get_enum_or(
            "alpha_mode",
            "alpha_channel",
            &["alpha_channel", "luminance", "detect"],
            &context,
        ) {
            "luminance" => AlphaMode::Luminance,
            "detect" => AlphaMode::Detect,
            _ => AlphaMode::AlphaChannel,
        };

        Self {
            texture_name: texture_name.into(),
            transform,
            addressing_mode,
            filtering_mode,
            alpha_mode,
            // Until a texture is bound, the effective mode is simply the
            // user-selected mode.
            effective_alpha_mode: alpha_mode,
            texture: EntityBinding::new(),
        }
    }

    /// Name of the referenced texture.
    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    /// Texture-space transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Addressing mode parsed at construction.
    pub fn addressing_mode(&self) -> AddressingMode {
        self.addressing_mode
    }

    /// Filtering mode parsed at construction.
    pub fn filtering_mode(&self) -> FilteringMode {
        self.filtering_mode
    }

    /// The user-selected alpha mode, possibly [`AlphaMode::Detect`].
    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// The alpha mode actually in effect.
    ///
    /// Equals [`TextureInstance::alpha_mode`] until a detection runs; once
    /// detection settles on a concrete mode, that mode survives unbinding
    /// and later rebinds without rescanning the texture.
    pub fn effective_alpha_mode(&self) -> AlphaMode {
        self.effective_alpha_mode
    }

    /// The bound texture, if binding has happened and succeeded.
    pub fn texture(&self) -> Option<NodeId> {
        self.texture.target()
    }

    /// Resolve and store the texture reference; idempotent.
    ///
    /// The alpha mode is resolved as soon as a texture is bound, not later
    /// at first sampling, because the instance may be needed before frame
    /// setup completes. Failure to resolve the name is not an error here;
    /// a texture without texel data or a failing tile load is, and excludes
    /// this instance from the frame.
    pub fn bind(&mut self, ctx: &FrameContext<'_>, self_id: NodeId) -> RenderResult<()> {
        let outcome = self
            .texture
            .bind_with(|| resolve_from(ctx.graph, self_id, EntityKind::Texture, &self.texture_name));
        let BindOutcome::Bound(texture_id) = outcome else {
            return Ok(());
        };
        if self.effective_alpha_mode == AlphaMode::Detect {
            let source = ctx.texture_source(texture_id).ok_or_else(|| {
                RenderError::acquisition(format!(
                    "texture \"{}\" has no texel data attached",
                    self.texture_name
                ))
            })?;
            self.effective_alpha_mode = detect_alpha_mode(source)?;
            let name = ctx.graph.get(self_id).map_or("", |n| n.name.as_str());
            tracing::debug!(
                texture_instance = name,
                alpha_mode = self.effective_alpha_mode.label(),
                "detected alpha mode"
            );
        }
        Ok(())
    }

    /// Drop the texture binding. The effective alpha mode is kept.
    pub fn unbind(&mut self) {
        self.texture.unbind();
    }

    /// The bound texture, or an unknown-entity error naming `referer` when
    /// the reference never resolved.
    pub fn require_texture(&self, referer: &str) -> RenderResult<NodeId> {
        self.texture.require_resolved(&self.texture_name, EntityKind::Texture, referer)
    }

    /// Parameter sheet for texture instances.
    pub fn metadata() -> ModelMetadata {
        ModelMetadata {
            model: Self::MODEL,
            params: vec![
                ParamSpec::enumeration("addressing_mode", "Addressing Mode", &["clamp", "wrap"], "wrap"),
                ParamSpec::enumeration("filtering_mode", "Filtering Mode", &["nearest", "bilinear"], "bilinear"),
                ParamSpec::enumeration(
                    "alpha_mode",
                    "Alpha Mode",
                    &["alpha_channel", "luminance", "detect"],
                    "alpha_channel",
                ),
            ],
        }
    }
}

impl FrameLifecycle for TextureInstance {
    fn state(&self) -> LifecycleState {
        if self.texture.is_bound() {
            LifecycleState::Bound
        } else {
            LifecycleState::Unbound
        }
    }

    fn on_frame_begin(&mut self, ctx: &FrameContext<'_>, self_id: NodeId) -> RenderResult<()> {
        self.bind(ctx, self_id)
    }

    fn on_frame_end(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/instance.rs"]
mod tests;
