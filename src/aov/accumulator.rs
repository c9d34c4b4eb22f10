use crate::aov::registry::AovKind;
use crate::foundation::color::Color3;

/// Shading terms produced for one sample, split by scattering origin.
///
/// Accumulators pick the terms relevant to their channel; the beauty output
/// is the sum of everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadingComponents {
    /// Directly lit diffuse scattering.
    pub diffuse: Color3,
    /// Diffuse scattering after at least one bounce.
    pub indirect_diffuse: Color3,
    /// Directly lit glossy scattering.
    pub glossy: Color3,
    /// Glossy scattering after at least one bounce.
    pub indirect_glossy: Color3,
    /// Self-emitted radiance.
    pub emission: Color3,
}

/// Accumulator for one color output channel.
///
/// Writes overwrite: each call replaces the accumulated color with the
/// contribution of the sample at hand, so stale values from earlier samples
/// can never leak into the output. Summation over samples happens downstream
/// in the framebuffer, not here.
///
/// Channel selection is a plain match on [`AovKind`], which keeps the
/// per-sample cost at a branch instead of a virtual call.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorAccumulator {
    index: usize,
    kind: AovKind,
    color: Color3,
}

impl ColorAccumulator {
    /// Create an accumulator flushing into output slot `index`.
    pub fn new(index: usize, kind: AovKind) -> Self {
        Self {
            index,
            kind,
            color: Color3::BLACK,
        }
    }

    /// Output slot this accumulator flushes into.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Channel flavor this accumulator serves.
    pub fn kind(&self) -> AovKind {
        self.kind
    }

    /// The currently accumulated color.
    pub fn color(&self) -> Color3 {
        self.color
    }

    /// Replace the accumulated color with this sample's contribution.
    pub fn write(&mut self, shading: &ShadingComponents, multiplier: f32) {
        self.color = match self.kind {
            AovKind::Diffuse => shading.diffuse + shading.indirect_diffuse,
            AovKind::DirectDiffuse => shading.diffuse,
            AovKind::IndirectDiffuse => shading.indirect_diffuse,
            AovKind::Glossy => shading.glossy + shading.indirect_glossy,
            AovKind::DirectGlossy => shading.glossy,
            AovKind::IndirectGlossy => shading.indirect_glossy,
            AovKind::Emission => shading.emission,
        };
        self.color *= multiplier;
    }

    /// Return to black, e.g. at a sample boundary before any write.
    pub fn reset(&mut self) {
        self.color = Color3::BLACK;
    }

    /// Copy the accumulated color into its slot of `output`.
    pub fn flush(&self, output: &mut [Color3]) {
        output[self.index] = self.color;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/aov/accumulator.rs"]
mod tests;
