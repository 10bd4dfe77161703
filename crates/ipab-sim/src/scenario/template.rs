//! Scenario templates and their keys.

use ipab_core::beamforming::{ArrayConfig, PhasedArray};
use ipab_core::types::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// A stored array configuration plus a description.
///
/// The configuration is flattened, so a template reads as an array document
/// with an extra `description` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub config: ArrayConfig,
}

impl ScenarioTemplate {
    pub fn new(description: impl Into<String>, config: ArrayConfig) -> Self {
        Self {
            description: description.into(),
            config,
        }
    }

    /// Snapshot an existing array, elements included.
    pub fn from_array(array: &PhasedArray, description: impl Into<String>) -> Self {
        Self::new(description, array.to_config())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Build a fresh array from the template, assigning `id`.
    pub fn instantiate(&self, id: u32) -> CoreResult<PhasedArray> {
        let mut config = self.config.clone();
        config.id = id;
        PhasedArray::try_from(config)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        // Surface bad enum strings as such before the flattened parse
        PhasedArray::from_value(&value)?;
        let description = value
            .get("description")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let config = ArrayConfig::deserialize(&value)?;
        Ok(Self::new(description, config))
    }
}

/// Scenario key for a display name.
///
/// Lowercases, turns runs of whitespace or underscores into a single `_`,
/// and drops everything else that is not alphanumeric. Leading and trailing
/// separators are trimmed.
pub fn slugify(name: &str) -> CoreResult<String> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '_' {
            pending_sep = true;
        }
    }

    if slug.is_empty() {
        return Err(CoreError::MalformedConfiguration(format!(
            "scenario name '{}' has no usable characters",
            name
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipab_core::beamforming::ArrayGeometry;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Scenario").unwrap(), "my_scenario");
        assert_eq!(slugify("  Wide   Beam! (v2) ").unwrap(), "wide_beam_v2");
        assert_eq!(slugify("already_slugged").unwrap(), "already_slugged");
        assert_eq!(slugify("5G").unwrap(), "5g");
        assert!(matches!(slugify(" !?- "), Err(CoreError::MalformedConfiguration(_))));
    }

    #[test]
    fn test_template_json_flattened() {
        let json = r#"{
            "name": "Ring",
            "description": "a ring",
            "geometry": "circular",
            "num_elements": 12
        }"#;
        let template = ScenarioTemplate::from_json(json).unwrap();
        assert_eq!(template.name(), "Ring");
        assert_eq!(template.description, "a ring");
        assert_eq!(template.config.geometry, ArrayGeometry::Circular);

        let array = template.instantiate(9).unwrap();
        assert_eq!(array.id(), 9);
        assert_eq!(array.elements().len(), 12);
    }

    #[test]
    fn test_template_bad_enum() {
        assert!(matches!(
            ScenarioTemplate::from_json(r#"{"geometry": "blob"}"#),
            Err(CoreError::InvalidEnumValue { .. })
        ));
    }

    #[test]
    fn test_template_serde_roundtrip() {
        let template = ScenarioTemplate::from_array(&PhasedArray::new(2, "Saved"), "desc");
        let json = serde_json::to_string(&template).unwrap();
        let back: ScenarioTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}
