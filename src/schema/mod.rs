use std::collections::BTreeMap;

use crate::foundation::error::{CartoucheError, CartoucheResult};
use crate::property::possibly::UnevaluatedProperties;
use crate::property::spec::PropertySpec;
use crate::property::value::PropertyValue;

/// A symbol layer as it appears in the style JSON.
///
/// Only structural parsing happens here; deep schema validation is the
/// style-spec validator's job upstream.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerDef {
    /// Layer id, unique within a style.
    pub id: String,
    /// Layer type tag; must be `"symbol"` for this crate.
    #[serde(rename = "type")]
    pub layer_type: String,
    /// Source name this layer draws from.
    #[serde(default)]
    pub source: Option<String>,
    /// Source layer within a vector source.
    #[serde(default, rename = "source-layer")]
    pub source_layer: Option<String>,
    /// Minimum zoom at which the layer is rendered.
    #[serde(default)]
    pub minzoom: Option<f64>,
    /// Maximum zoom at which the layer is rendered.
    #[serde(default)]
    pub maxzoom: Option<f64>,
    /// Raw declared layout properties.
    #[serde(default)]
    pub layout: BTreeMap<String, serde_json::Value>,
    /// Raw declared paint properties.
    #[serde(default)]
    pub paint: BTreeMap<String, serde_json::Value>,
}

impl LayerDef {
    /// Read a layer definition from a JSON file.
    pub fn from_path(path: &std::path::Path) -> CartoucheResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CartoucheError::style(format!("read layer file '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| CartoucheError::style(format!("invalid layer JSON: {e}")))
    }
}

/// Merge declared JSON values over a schema table's defaults.
///
/// Unknown property names are skipped with a warning; rejecting them is the
/// upstream validator's call.
pub fn build_properties(
    specs: Vec<PropertySpec>,
    declared: &BTreeMap<String, serde_json::Value>,
) -> CartoucheResult<UnevaluatedProperties> {
    let mut props = UnevaluatedProperties::from_specs(specs);
    for (name, raw) in declared {
        let Some(spec) = props.get(name).map(|e| e.spec.clone()) else {
            tracing::warn!(property = %name, "skipping unknown symbol property");
            continue;
        };
        let value = PropertyValue::from_json(raw, &spec)
            .map_err(|e| CartoucheError::style(format!("property \"{name}\": {e}")))?;
        let _ = props.set(name, value);
    }
    Ok(props)
}

#[cfg(test)]
#[path = "../../tests/unit/schema.rs"]
mod tests;
