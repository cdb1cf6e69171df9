use rayon::prelude::*;

use crate::expression::eval::{EvaluationContext, Feature};
use crate::expression::value::Value;
use crate::foundation::core::{CanonicalTileId, EvaluationParameters, Padding};
use crate::foundation::error::{CartoucheError, CartoucheResult};
use crate::property::possibly::{PropertySet, UnevaluatedProperties};
use crate::property::spec::{symbol_layout_specs, symbol_paint_specs};
use crate::property::value::PropertyValue;
use crate::schema::LayerDef;
use crate::symbol::bucket::{BucketParameters, SymbolBucket};
use crate::symbol::overrides::{apply_paint_overrides, has_paint_override};
use crate::symbol::resolve::resolve_symbol_layout;
use crate::symbol::tokens::resolve_tokens;

/// A symbol style layer: declared property sets plus the possibly-evaluated
/// sets of the current evaluation generation.
///
/// The evaluated sets are rebuilt from the declared values on every
/// [`SymbolLayer::recalculate`]; intermediate states are inconsistent, so a
/// single instance must not be recalculated concurrently. Distinct instances
/// are independent (see [`recalculate_layers`]).
#[derive(Clone, Debug)]
pub struct SymbolLayer {
    /// Layer id from the style.
    pub id: String,
    /// Source name this layer draws from.
    pub source: Option<String>,
    /// Source layer within a vector source.
    pub source_layer: Option<String>,
    /// Minimum zoom at which the layer is rendered.
    pub minzoom: Option<f64>,
    /// Maximum zoom at which the layer is rendered.
    pub maxzoom: Option<f64>,
    /// Possibly-evaluated layout of the current generation.
    pub layout: PropertySet,
    /// Possibly-evaluated paint of the current generation.
    pub paint: PropertySet,
    unevaluated_layout: UnevaluatedProperties,
    unevaluated_paint: UnevaluatedProperties,
    parameters: EvaluationParameters,
}

impl SymbolLayer {
    /// Build a layer from its style definition and run an initial
    /// recalculation at zoom 0.
    pub fn from_def(def: &LayerDef) -> CartoucheResult<Self> {
        if def.layer_type != "symbol" {
            return Err(CartoucheError::style(format!(
                "layer \"{}\" has type \"{}\", expected \"symbol\"",
                def.id, def.layer_type
            )));
        }
        let unevaluated_layout =
            crate::schema::build_properties(symbol_layout_specs(), &def.layout)?;
        let unevaluated_paint = crate::schema::build_properties(symbol_paint_specs(), &def.paint)?;

        let parameters = EvaluationParameters::new(0.0);
        let layout = unevaluated_layout.possibly_evaluate(&parameters, &[])?;
        let paint = unevaluated_paint.possibly_evaluate(&parameters, &[])?;
        let mut layer = Self {
            id: def.id.clone(),
            source: def.source.clone(),
            source_layer: def.source_layer.clone(),
            minzoom: def.minzoom,
            maxzoom: def.maxzoom,
            layout,
            paint,
            unevaluated_layout,
            unevaluated_paint,
            parameters,
        };
        layer.recalculate(&parameters, &[])?;
        Ok(layer)
    }

    /// Parse a layer from style JSON text.
    pub fn from_json_str(json: &str) -> CartoucheResult<Self> {
        let def: LayerDef = serde_json::from_str(json)
            .map_err(|e| CartoucheError::style(format!("invalid layer JSON: {e}")))?;
        Self::from_def(&def)
    }

    /// Run one evaluation generation: generic evaluation of both property
    /// sets, then layout default resolution, then paint override injection.
    ///
    /// Both sets are fully rebuilt from the declared values, so re-running
    /// replaces earlier override wrappers instead of stacking them.
    #[tracing::instrument(skip(self, available_images), fields(layer = %self.id))]
    pub fn recalculate(
        &mut self,
        params: &EvaluationParameters,
        available_images: &[String],
    ) -> CartoucheResult<()> {
        self.layout = self
            .unevaluated_layout
            .possibly_evaluate(params, available_images)?;
        self.paint = self
            .unevaluated_paint
            .possibly_evaluate(params, available_images)?;
        resolve_symbol_layout(&mut self.layout);
        apply_paint_overrides(&self.layout, &mut self.paint);
        self.parameters = *params;
        Ok(())
    }

    /// Zoom of the last recalculation.
    pub fn zoom(&self) -> f64 {
        self.parameters.zoom
    }

    /// Evaluate a layout property for `feature`, substituting legacy
    /// `{token}` attributes when the property was declared as a plain,
    /// token-capable constant and evaluated to non-empty text.
    pub fn get_value_and_resolve_tokens(
        &self,
        name: &str,
        feature: &Feature,
        canonical: Option<&CanonicalTileId>,
        available_images: &[String],
    ) -> CartoucheResult<Value> {
        let property = self
            .layout
            .get(name)
            .ok_or_else(|| CartoucheError::style(format!("unknown layout property \"{name}\"")))?;
        let ctx = EvaluationContext {
            zoom: Some(self.parameters.zoom),
            feature: Some(feature),
            canonical,
            available_images,
            ..Default::default()
        };
        let value = property.evaluate(&ctx)?;

        let declared = self.unevaluated_layout.get(name);
        let plain_constant = declared.is_some_and(|d| {
            d.spec.tokens && !d.value.is_data_driven() && !d.value.is_expression()
        });
        if plain_constant && value.is_truthy() {
            let template = match &value {
                Value::String(s) => Some(s.clone()),
                Value::Formatted(f) => Some(f.to_plain_text()),
                _ => None,
            };
            if let Some(template) = template {
                return Ok(Value::String(resolve_tokens(&feature.properties, &template)));
            }
        }
        Ok(value)
    }

    /// Evaluate `icon-padding` for `feature` and scale it by `pixel_ratio`.
    pub fn icon_padding(
        &self,
        feature: &Feature,
        canonical: Option<&CanonicalTileId>,
        pixel_ratio: f64,
    ) -> CartoucheResult<Padding> {
        let property = self
            .layout
            .get("icon-padding")
            .ok_or_else(|| CartoucheError::style("schema is missing \"icon-padding\""))?;
        let ctx = EvaluationContext {
            zoom: Some(self.parameters.zoom),
            feature: Some(feature),
            canonical,
            ..Default::default()
        };
        let value = property.evaluate(&ctx)?;
        let Value::Array(items) = &value else {
            return Err(CartoucheError::expression(format!(
                "\"icon-padding\" evaluated to {}, expected a padding array",
                value.type_of()
            )));
        };
        let components = items
            .iter()
            .map(|v| match v {
                Value::Number(n) => Ok(*n),
                other => Err(CartoucheError::expression(format!(
                    "padding component must be a number, got {}",
                    other.type_of()
                ))),
            })
            .collect::<CartoucheResult<Vec<f64>>>()?;
        Ok(Padding::from_slice(&components)?.scaled(pixel_ratio))
    }

    /// Whether the current `text-field` carries a per-run override for the
    /// paint property `name`.
    pub fn has_paint_override(&self, name: &str) -> bool {
        has_paint_override(&self.layout, name)
    }

    /// Replace a declared layout property; takes effect on the next
    /// recalculation.
    pub fn set_layout_property(&mut self, name: &str, json: &serde_json::Value) -> CartoucheResult<()> {
        let spec = self
            .unevaluated_layout
            .get(name)
            .map(|e| e.spec.clone())
            .ok_or_else(|| CartoucheError::style(format!("unknown layout property \"{name}\"")))?;
        let value = PropertyValue::from_json(json, &spec)?;
        let _ = self.unevaluated_layout.set(name, value);
        Ok(())
    }

    /// Replace a declared paint property; returns whether the update forces a
    /// relayout because a formatted-text override is in play.
    pub fn set_paint_property(
        &mut self,
        name: &str,
        json: &serde_json::Value,
    ) -> CartoucheResult<bool> {
        let entry = self
            .unevaluated_paint
            .get(name)
            .cloned()
            .ok_or_else(|| CartoucheError::style(format!("unknown paint property \"{name}\"")))?;
        let new_value = PropertyValue::from_json(json, &entry.spec)?;
        let needs_relayout = entry.spec.overridable
            && self.handle_overridable_paint_update(name, &entry.value, &new_value);
        let _ = self.unevaluated_paint.set(name, new_value);
        Ok(needs_relayout)
    }

    fn handle_overridable_paint_update(
        &self,
        name: &str,
        old: &PropertyValue,
        new: &PropertyValue,
    ) -> bool {
        if old.is_data_driven() || new.is_data_driven() {
            return false;
        }
        has_paint_override(&self.layout, name)
    }

    /// Seed a tessellation bucket for this layer.
    pub fn create_bucket(&self, parameters: BucketParameters) -> SymbolBucket {
        SymbolBucket::new(self.id.clone(), parameters)
    }

    /// Per-layer hit-testing radius; symbol extents live in the collision
    /// index, so the layer itself contributes none.
    pub fn query_radius(&self) -> f64 {
        0.0
    }

    /// Direct feature intersection is a caller error for symbol layers: the
    /// feature index must route them through the collision path.
    pub fn query_intersects_feature(&self) -> CartoucheResult<bool> {
        Err(CartoucheError::query(
            "symbol layers take the collision path in the feature index",
        ))
    }
}

/// Recalculate distinct layers in parallel.
///
/// Each layer is owned by exactly one worker for the duration of the pass,
/// which keeps the per-instance single-writer discipline.
pub fn recalculate_layers(
    layers: &mut [SymbolLayer],
    params: &EvaluationParameters,
    available_images: &[String],
) -> CartoucheResult<()> {
    layers
        .par_iter_mut()
        .try_for_each(|layer| layer.recalculate(params, available_images))
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/layer.rs"]
mod tests;
