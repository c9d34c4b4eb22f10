use crate::aov::accumulator::{ColorAccumulator, ShadingComponents};
use crate::foundation::color::Color3;

/// Flavor of an arbitrary output variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AovKind {
    /// Direct plus indirect diffuse scattering.
    Diffuse,
    /// Directly lit diffuse scattering only.
    DirectDiffuse,
    /// Indirect diffuse scattering only.
    IndirectDiffuse,
    /// Direct plus indirect glossy scattering.
    Glossy,
    /// Directly lit glossy scattering only.
    DirectGlossy,
    /// Indirect glossy scattering only.
    IndirectGlossy,
    /// Self-emitted radiance.
    Emission,
}

impl AovKind {
    /// Every supported flavor, in canonical order.
    pub const ALL: [AovKind; 7] = [
        AovKind::Diffuse,
        AovKind::DirectDiffuse,
        AovKind::IndirectDiffuse,
        AovKind::Glossy,
        AovKind::DirectGlossy,
        AovKind::IndirectGlossy,
        AovKind::Emission,
    ];

    /// Model identifier, e.g. `"diffuse_aov"`.
    pub fn model(self) -> &'static str {
        match self {
            AovKind::Diffuse => "diffuse_aov",
            AovKind::DirectDiffuse => "direct_diffuse_aov",
            AovKind::IndirectDiffuse => "indirect_diffuse_aov",
            AovKind::Glossy => "glossy_aov",
            AovKind::DirectGlossy => "direct_glossy_aov",
            AovKind::IndirectGlossy => "indirect_glossy_aov",
            AovKind::Emission => "emission_aov",
        }
    }

    /// Output channel name, e.g. `"diffuse"`.
    pub fn channel_name(self) -> &'static str {
        match self {
            AovKind::Diffuse => "diffuse",
            AovKind::DirectDiffuse => "direct_diffuse",
            AovKind::IndirectDiffuse => "indirect_diffuse",
            AovKind::Glossy => "glossy",
            AovKind::DirectGlossy => "direct_glossy",
            AovKind::IndirectGlossy => "indirect_glossy",
            AovKind::Emission => "emission",
        }
    }

    /// Look a flavor up by its model identifier.
    pub fn from_model(model: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.model() == model)
    }

    /// Components per pixel; all current flavors are RGB.
    pub fn channel_count(self) -> usize {
        3
    }
}

/// Ordered set of output channels requested for a frame.
///
/// The registry fixes each channel's output slot at registration time and
/// then acts as a factory for per-worker accumulator sets. The registry
/// itself is immutable during rendering and shared by reference; every
/// worker owns the accumulator set it created, so no lock is ever taken on
/// the write path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AovRegistry {
    kinds: Vec<AovKind>,
}

impl AovRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel and return its output slot.
    ///
    /// Registering a flavor twice is a no-op returning the existing slot.
    pub fn register(&mut self, kind: AovKind) -> usize {
        if let Some(index) = self.index_of(kind) {
            return index;
        }
        self.kinds.push(kind);
        self.kinds.len() - 1
    }

    /// Output slot of a registered flavor.
    pub fn index_of(&self, kind: AovKind) -> Option<usize> {
        self.kinds.iter().position(|k| *k == kind)
    }

    /// Registered flavors in slot order.
    pub fn kinds(&self) -> &[AovKind] {
        &self.kinds
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no channel is registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Build a fresh accumulator set for one worker.
    pub fn create_accumulators(&self) -> AovAccumulatorSet {
        AovAccumulatorSet {
            accumulators: self
                .kinds
                .iter()
                .enumerate()
                .map(|(index, kind)| ColorAccumulator::new(index, *kind))
                .collect(),
        }
    }
}

/// One worker's accumulators, one per registered channel.
#[derive(Clone, Debug, PartialEq)]
pub struct AovAccumulatorSet {
    accumulators: Vec<ColorAccumulator>,
}

impl AovAccumulatorSet {
    /// Number of accumulators in the set.
    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    /// The accumulators, in output slot order.
    pub fn accumulators(&self) -> &[ColorAccumulator] {
        &self.accumulators
    }

    /// Feed one sample's shading to every accumulator.
    pub fn write(&mut self, shading: &ShadingComponents, multiplier: f32) {
        for acc in &mut self.accumulators {
            acc.write(shading, multiplier);
        }
    }

    /// Return every accumulator to black at a sample boundary.
    pub fn reset(&mut self) {
        for acc in &mut self.accumulators {
            acc.reset();
        }
    }

    /// Flush every accumulator into its slot of `output`.
    ///
    /// `output` must hold at least [`AovAccumulatorSet::len`] slots.
    pub fn flush(&self, output: &mut [Color3]) {
        for acc in &self.accumulators {
            acc.flush(output);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/aov/registry.rs"]
mod tests;
