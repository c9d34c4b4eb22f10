/// Declared shape of a single entity parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    /// Closed set of textual values.
    Enumeration {
        /// Accepted values.
        allowed: &'static [&'static str],
        /// Value assumed when the parameter is absent.
        default: &'static str,
    },
    /// Scalar with an inclusive range.
    Numeric {
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
        /// Value assumed when the parameter is absent.
        default: f32,
    },
    /// Reference to another entity, resolved by name at frame setup.
    EntityRef {
        /// Kind of entity the reference must name.
        kind: &'static str,
    },
}

/// One entry of a model's parameter sheet.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamSpec {
    /// Parameter key as it appears in a [`ParamSet`](crate::ParamSet).
    pub name: &'static str,
    /// Human-readable label for tooling.
    pub label: &'static str,
    /// Value shape and defaults.
    pub kind: ParamKind,
    /// Whether omitting the parameter is an authoring error.
    pub required: bool,
}

impl ParamSpec {
    /// Declare an optional enumeration parameter.
    pub fn enumeration(
        name: &'static str,
        label: &'static str,
        allowed: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Enumeration { allowed, default },
            required: false,
        }
    }

    /// Declare an optional numeric parameter.
    pub fn numeric(name: &'static str, label: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Numeric { min, max, default },
            required: false,
        }
    }

    /// Declare an optional entity reference parameter.
    pub fn entity_ref(name: &'static str, label: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::EntityRef { kind },
            required: false,
        }
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Self-describing parameter sheet published by an entity model.
///
/// Host applications read these to build editing UIs and to validate project
/// files without instantiating entities.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ModelMetadata {
    /// Model identifier, e.g. `"generic_material"`.
    pub model: &'static str,
    /// Declared parameters, in presentation order.
    pub params: Vec<ParamSpec>,
}
