use crate::expression::ast::Expr;
use crate::expression::eval::EvaluationContext;
use crate::expression::value::Value;
use crate::foundation::core::EvaluationParameters;
use crate::foundation::error::CartoucheResult;
use crate::property::spec::PropertySpec;
use crate::property::value::{ExpressionKind, PropertyValue, StyleExpression};

/// Evaluation class of a possibly-evaluated value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationKind {
    /// Fully resolved for this generation.
    Constant,
    /// Needs per-feature evaluation, zoom-independent.
    Source,
    /// Needs per-feature and per-zoom evaluation.
    Composite,
}

impl EvaluationKind {
    /// Lowercase tag used in diagnostics and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Source => "source",
            Self::Composite => "composite",
        }
    }
}

/// Feature-dependent, zoom-independent expression payload.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceExpression {
    /// Expression to evaluate per feature.
    pub expression: Expr,
}

/// Feature- and zoom-dependent expression payload.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeExpression {
    /// Expression to evaluate per feature at a known zoom.
    pub expression: Expr,
    /// Ascending zoom-stop inputs carried from the declared value.
    pub zoom_stops: Vec<f64>,
}

/// The three payload shapes a property can hold after generic evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum PossiblyEvaluated {
    /// Resolved value.
    Constant(Value),
    /// Per-feature expression.
    Source(SourceExpression),
    /// Per-feature, per-zoom expression.
    Composite(CompositeExpression),
}

/// A possibly-evaluated property value plus its schema back-reference.
#[derive(Clone, Debug, PartialEq)]
pub struct PossiblyEvaluatedValue {
    /// Property specification this value belongs to.
    pub spec: PropertySpec,
    /// Evaluated or still-pending payload.
    pub value: PossiblyEvaluated,
}

impl PossiblyEvaluatedValue {
    /// Evaluation class of the current payload.
    pub fn kind(&self) -> EvaluationKind {
        match self.value {
            PossiblyEvaluated::Constant(_) => EvaluationKind::Constant,
            PossiblyEvaluated::Source(_) => EvaluationKind::Source,
            PossiblyEvaluated::Composite(_) => EvaluationKind::Composite,
        }
    }

    /// The resolved value, when already constant.
    pub fn constant(&self) -> Option<&Value> {
        match &self.value {
            PossiblyEvaluated::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Evaluate for a concrete feature context.
    ///
    /// Results are coerced to the spec's value type; a null result falls back
    /// to the schema default.
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> CartoucheResult<Value> {
        let ctx = EvaluationContext {
            expected: Some(self.spec.value_type),
            ..*ctx
        };
        let raw = match &self.value {
            PossiblyEvaluated::Constant(v) => return Ok(v.clone()),
            PossiblyEvaluated::Source(source) => source.expression.evaluate(&ctx)?,
            PossiblyEvaluated::Composite(composite) => composite.expression.evaluate(&ctx)?,
        };
        if matches!(raw, Value::Null) {
            return Ok(self.spec.default.clone());
        }
        raw.coerce(self.spec.value_type)
    }

    /// Compact JSON description: constants print their value, pending
    /// expressions print their evaluation class.
    pub fn describe(&self) -> serde_json::Value {
        match &self.value {
            PossiblyEvaluated::Constant(v) => v.to_json(),
            other => {
                let kind = match other {
                    PossiblyEvaluated::Source(_) => EvaluationKind::Source,
                    _ => EvaluationKind::Composite,
                };
                serde_json::json!({ "kind": kind.as_str() })
            }
        }
    }
}

/// One declared property with its schema entry.
#[derive(Clone, Debug, PartialEq)]
pub struct UnevaluatedProperty {
    /// Property specification.
    pub spec: PropertySpec,
    /// Declared value (schema default when the layer omits the property).
    pub value: PropertyValue,
}

/// Ordered declared property mapping, unique names in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct UnevaluatedProperties {
    entries: Vec<UnevaluatedProperty>,
}

impl UnevaluatedProperties {
    /// Build from a schema table, every property at its default.
    pub fn from_specs(specs: Vec<PropertySpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| {
                let value = PropertyValue::Constant(spec.default.clone());
                UnevaluatedProperty { spec, value }
            })
            .collect();
        Self { entries }
    }

    /// Look up a declared property by name.
    pub fn get(&self, name: &str) -> Option<&UnevaluatedProperty> {
        self.entries.iter().find(|e| e.spec.name == name)
    }

    /// Replace the declared value for `name`; false if the schema has no
    /// such property.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> bool {
        match self.entries.iter_mut().find(|e| e.spec.name == name) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    /// Iterate entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &UnevaluatedProperty> {
        self.entries.iter()
    }

    /// Run the generic evaluation pass for one generation.
    ///
    /// Camera-class values resolve to constants at `params.zoom`; source and
    /// composite values pass through for later per-feature evaluation.
    pub fn possibly_evaluate(
        &self,
        params: &EvaluationParameters,
        available_images: &[String],
    ) -> CartoucheResult<PropertySet> {
        let ctx = EvaluationContext {
            zoom: Some(params.zoom),
            available_images,
            ..Default::default()
        };
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = match &entry.value {
                PropertyValue::Constant(v) => PossiblyEvaluated::Constant(v.clone()),
                PropertyValue::Expression(style_expr) => {
                    possibly_evaluate_expression(style_expr, &entry.spec, &ctx)?
                }
            };
            entries.push(PossiblyEvaluatedValue {
                spec: entry.spec.clone(),
                value,
            });
        }
        Ok(PropertySet { entries })
    }
}

fn possibly_evaluate_expression(
    style_expr: &StyleExpression,
    spec: &PropertySpec,
    ctx: &EvaluationContext<'_>,
) -> CartoucheResult<PossiblyEvaluated> {
    match style_expr.kind {
        ExpressionKind::Camera => {
            let ctx = EvaluationContext {
                expected: Some(spec.value_type),
                ..*ctx
            };
            let raw = style_expr.expr.evaluate(&ctx)?;
            let value = if matches!(raw, Value::Null) {
                spec.default.clone()
            } else {
                raw.coerce(spec.value_type)?
            };
            Ok(PossiblyEvaluated::Constant(value))
        }
        ExpressionKind::Source => Ok(PossiblyEvaluated::Source(SourceExpression {
            expression: style_expr.expr.clone(),
        })),
        ExpressionKind::Composite => Ok(PossiblyEvaluated::Composite(CompositeExpression {
            expression: style_expr.expr.clone(),
            zoom_stops: style_expr.zoom_stops.clone(),
        })),
    }
}

/// Ordered possibly-evaluated property mapping for one generation.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySet {
    entries: Vec<PossiblyEvaluatedValue>,
}

impl PropertySet {
    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PossiblyEvaluatedValue> {
        self.entries.iter().find(|e| e.spec.name == name)
    }

    /// The resolved value for `name`, when already constant.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(PossiblyEvaluatedValue::constant)
    }

    /// Overwrite `name` with a resolved constant; false if unknown.
    pub fn set_constant(&mut self, name: &str, value: Value) -> bool {
        self.set_value(name, PossiblyEvaluated::Constant(value))
    }

    /// Overwrite `name` with a new payload; false if unknown.
    pub fn set_value(&mut self, name: &str, value: PossiblyEvaluated) -> bool {
        match self.entries.iter_mut().find(|e| e.spec.name == name) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    /// Iterate entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &PossiblyEvaluatedValue> {
        self.entries.iter()
    }

    /// Names of paint properties formatted-text runs may override.
    pub fn overridable_names(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.spec.overridable)
            .map(|e| e.spec.name)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/property/possibly.rs"]
mod tests;
