use std::collections::BTreeMap;

use crate::foundation::math::Fnv1a64;

/// Declarative parameter bag attached to every scene entity.
///
/// Values are free-form JSON; typed access goes through the `get_*_or`
/// getters, which implement the renderer's tolerant read contract: a missing
/// key yields the documented default, and an invalid value logs a warning
/// carrying the owning entity's context and then yields the default. Entity
/// setup never fails on a malformed parameter.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, serde_json::Value>);

impl ParamSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`ParamSet::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// String value lookup; `None` when missing or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read an enumeration parameter restricted to `allowed` values.
    ///
    /// Returns the matching entry of `allowed`, or `default` when the key is
    /// missing. An out-of-range or non-string value logs a warning tagged
    /// with `context` (the owning entity's label) and falls back to
    /// `default`. `default` must be one of `allowed`.
    pub fn get_enum_or(
        &self,
        key: &str,
        default: &'static str,
        allowed: &'static [&'static str],
        context: &str,
    ) -> &'static str {
        debug_assert!(allowed.contains(&default));
        let Some(value) = self.0.get(key) else {
            return default;
        };
        match value.as_str() {
            Some(s) => match allowed.iter().find(|a| **a == s) {
                Some(a) => a,
                None => {
                    tracing::warn!(
                        context,
                        parameter = key,
                        value = s,
                        default,
                        "invalid enumeration value, using default"
                    );
                    default
                }
            },
            None => {
                tracing::warn!(
                    context,
                    parameter = key,
                    %value,
                    default,
                    "expected a string value, using default"
                );
                default
            }
        }
    }

    /// Read a numeric parameter, falling back to `default` on a missing key
    /// or a non-numeric value (the latter logs a warning tagged with
    /// `context`).
    pub fn get_f32_or(&self, key: &str, default: f32, context: &str) -> f32 {
        let Some(value) = self.0.get(key) else {
            return default;
        };
        match value.as_f64() {
            Some(v) => v as f32,
            None => {
                tracing::warn!(
                    context,
                    parameter = key,
                    %value,
                    default,
                    "expected a numeric value, using default"
                );
                default
            }
        }
    }

    /// Feed the set into a signature hash, deterministically.
    pub(crate) fn hash_into(&self, h: &mut Fnv1a64) {
        for (key, value) in &self.0 {
            h.write_str(key);
            // serde_json renders object keys in sorted order, so the text
            // form is stable for equal values.
            h.write_str(&value.to_string());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/params.rs"]
mod tests;
