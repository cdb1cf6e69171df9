use std::collections::BTreeMap;

use crate::expression::ast::Expr;
use crate::expression::value::{Color, Formatted, FormattedSection, Value, ValueType};
use crate::foundation::core::CanonicalTileId;
use crate::foundation::error::{CartoucheError, CartoucheResult};

/// A vector-tile feature as seen by the style engine.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Feature {
    /// Stable feature id, when the source assigns one.
    pub id: Option<u64>,
    /// Feature attributes.
    pub properties: BTreeMap<String, Value>,
}

impl Feature {
    /// Read a feature from its GeoJSON-like form (`{"id": …, "properties": {…}}`).
    pub fn from_json(json: &serde_json::Value) -> CartoucheResult<Self> {
        let id = json.get("id").and_then(serde_json::Value::as_u64);
        let mut properties = BTreeMap::new();
        if let Some(serde_json::Value::Object(props)) = json.get("properties") {
            for (key, raw) in props {
                let _ = properties.insert(key.clone(), Value::from_json(raw)?);
            }
        }
        Ok(Self { id, properties })
    }

    /// Builder-style attribute insertion, used heavily by tests.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        let _ = self.properties.insert(key.into(), value);
        self
    }
}

/// Everything an expression may read during one evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvaluationContext<'a> {
    /// Camera zoom; present for camera and composite evaluations.
    pub zoom: Option<f64>,
    /// Feature under evaluation; present for source and composite evaluations.
    pub feature: Option<&'a Feature>,
    /// Tile the feature was read from.
    pub canonical: Option<&'a CanonicalTileId>,
    /// Names of currently loadable sprite images.
    pub available_images: &'a [String],
    /// Active formatted-text run, when paint is evaluated per section.
    pub section: Option<&'a FormattedSection>,
    /// Schema type the surrounding property expects; guides interpolation.
    pub expected: Option<ValueType>,
}

/// Interpolation contract for value types with a linear blend.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            r: f64::lerp(&a.r, &b.r, t),
            g: f64::lerp(&a.g, &b.g, t),
            b: f64::lerp(&a.b, &b.b, t),
            a: f64::lerp(&a.a, &b.a, t),
        }
    }
}

impl Expr {
    /// Evaluate this expression against `ctx`.
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> CartoucheResult<Value> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Zoom => ctx
                .zoom
                .map(Value::Number)
                .ok_or_else(|| CartoucheError::expression("zoom is not available in this context")),
            Self::Get(name) => {
                let feature = ctx.feature.ok_or_else(|| {
                    CartoucheError::expression("feature data is not available in this context")
                })?;
                Ok(feature.properties.get(name).cloned().unwrap_or(Value::Null))
            }
            Self::Eq(a, b) => Ok(Value::Bool(a.evaluate(ctx)? == b.evaluate(ctx)?)),
            Self::Coalesce(items) => {
                for item in items {
                    let v = item.evaluate(ctx)?;
                    if !matches!(v, Value::Null) {
                        return Ok(v);
                    }
                }
                Ok(Value::Null)
            }
            Self::Concat(items) => {
                let mut out = String::new();
                for item in items {
                    out.push_str(&item.evaluate(ctx)?.to_display_string());
                }
                Ok(Value::String(out))
            }
            Self::Case { branches, fallback } => {
                for branch in branches {
                    if branch.condition.evaluate(ctx)?.is_truthy() {
                        return branch.output.evaluate(ctx);
                    }
                }
                fallback.evaluate(ctx)
            }
            Self::Step {
                input,
                default,
                stops,
            } => {
                let x = eval_number(input, ctx)?;
                let mut selected: Option<&Expr> = None;
                for (at, output) in stops {
                    if x >= *at {
                        selected = Some(output);
                    } else {
                        break;
                    }
                }
                selected.unwrap_or(default).evaluate(ctx)
            }
            Self::Interpolate { input, stops } => evaluate_interpolate(input, stops, ctx),
            Self::Image(name) => match name.evaluate(ctx)? {
                Value::String(name) => {
                    if ctx.available_images.iter().any(|i| *i == name) {
                        Ok(Value::String(name))
                    } else {
                        Ok(Value::Null)
                    }
                }
                other => Err(CartoucheError::expression(format!(
                    "\"image\" expects a string name, got {}",
                    other.type_of()
                ))),
            },
            Self::Format(format) => {
                let mut sections = Vec::with_capacity(format.sections.len());
                for declared in &format.sections {
                    let text = declared.content.evaluate(ctx)?.to_display_string();
                    let text_color = match &declared.text_color {
                        Some(expr) => match expr.evaluate(ctx)?.coerce(ValueType::Color)? {
                            Value::Color(c) => Some(c),
                            _ => None,
                        },
                        None => None,
                    };
                    let font_scale = match &declared.font_scale {
                        Some(expr) => match expr.evaluate(ctx)? {
                            Value::Number(n) => Some(n),
                            other => {
                                return Err(CartoucheError::expression(format!(
                                    "\"font-scale\" must be a number, got {}",
                                    other.type_of()
                                )));
                            }
                        },
                        None => None,
                    };
                    let text_font = match &declared.text_font {
                        Some(expr) => match expr.evaluate(ctx)? {
                            Value::Null => None,
                            other => Some(other.to_display_string()),
                        },
                        None => None,
                    };
                    sections.push(FormattedSection {
                        text,
                        text_color,
                        font_scale,
                        text_font,
                    });
                }
                Ok(Value::Formatted(Formatted { sections }))
            }
            Self::SectionOverride(over) => {
                if let Some(section) = ctx.section {
                    if let Some(v) = section.override_for(&over.property) {
                        return Ok(v);
                    }
                }
                over.fallback.evaluate(ctx)
            }
        }
    }
}

fn eval_number(expr: &Expr, ctx: &EvaluationContext<'_>) -> CartoucheResult<f64> {
    match expr.evaluate(ctx)? {
        Value::Number(n) => Ok(n),
        other => Err(CartoucheError::expression(format!(
            "expected a number input, got {}",
            other.type_of()
        ))),
    }
}

fn evaluate_interpolate(
    input: &Expr,
    stops: &[(f64, Expr)],
    ctx: &EvaluationContext<'_>,
) -> CartoucheResult<Value> {
    let x = eval_number(input, ctx)?;

    let first = &stops[0];
    let last = &stops[stops.len() - 1];
    if x <= first.0 {
        return coerce_stop(first.1.evaluate(ctx)?, ctx);
    }
    if x >= last.0 {
        return coerce_stop(last.1.evaluate(ctx)?, ctx);
    }

    // x is strictly between the first and last stop inputs.
    let upper = stops.iter().position(|(at, _)| x < *at).unwrap_or(stops.len() - 1);
    let (a_at, a_expr) = &stops[upper - 1];
    let (b_at, b_expr) = &stops[upper];
    let t = (x - a_at) / (b_at - a_at);

    let a = coerce_stop(a_expr.evaluate(ctx)?, ctx)?;
    let b = coerce_stop(b_expr.evaluate(ctx)?, ctx)?;
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f64::lerp(&a, &b, t))),
        (Value::Color(a), Value::Color(b)) => Ok(Value::Color(Color::lerp(&a, &b, t))),
        (a, b) => Err(CartoucheError::expression(format!(
            "cannot interpolate between {} and {}",
            a.type_of(),
            b.type_of()
        ))),
    }
}

fn coerce_stop(v: Value, ctx: &EvaluationContext<'_>) -> CartoucheResult<Value> {
    match ctx.expected {
        Some(expected) => v.coerce(expected),
        None => Ok(v),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
