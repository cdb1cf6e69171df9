use crate::expression::ast::Expr;
use crate::expression::value::Value;
use crate::foundation::error::{CartoucheError, CartoucheResult};
use crate::property::spec::PropertySpec;

/// Evaluation class of a declared style expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Depends on the camera (zoom) at most; fully resolvable per generation.
    Camera,
    /// Depends on feature data, not on zoom.
    Source,
    /// Depends on both feature data and zoom.
    Composite,
}

/// A parsed and classified style expression.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleExpression {
    /// Expression tree.
    pub expr: Expr,
    /// Evaluation class.
    pub kind: ExpressionKind,
    /// Ascending zoom-stop inputs; empty unless zoom-dependent.
    pub zoom_stops: Vec<f64>,
}

impl StyleExpression {
    /// Classify `expr` and extract its zoom interpolation structure.
    ///
    /// Zoom-dependent expressions must keep `zoom` as the input of the
    /// outermost `step`/`interpolate`, as in the original style spec.
    pub fn new(expr: Expr) -> CartoucheResult<Self> {
        let feature = expr.uses_feature();
        let zoom = expr.uses_zoom();
        let kind = match (zoom, feature) {
            (_, false) => ExpressionKind::Camera,
            (false, true) => ExpressionKind::Source,
            (true, true) => ExpressionKind::Composite,
        };
        let zoom_stops = if zoom { top_level_zoom_stops(&expr)? } else { Vec::new() };
        Ok(Self {
            expr,
            kind,
            zoom_stops,
        })
    }
}

fn top_level_zoom_stops(expr: &Expr) -> CartoucheResult<Vec<f64>> {
    match expr {
        Expr::Interpolate { input, stops } => {
            if input.as_ref() != &Expr::Zoom || stops.iter().any(|(_, o)| o.uses_zoom()) {
                return Err(zoom_placement_error());
            }
            Ok(stops.iter().map(|(at, _)| *at).collect())
        }
        Expr::Step {
            input,
            default,
            stops,
        } => {
            if input.as_ref() != &Expr::Zoom
                || default.uses_zoom()
                || stops.iter().any(|(_, o)| o.uses_zoom())
            {
                return Err(zoom_placement_error());
            }
            Ok(stops.iter().map(|(at, _)| *at).collect())
        }
        _ => Err(zoom_placement_error()),
    }
}

fn zoom_placement_error() -> CartoucheError {
    CartoucheError::expression(
        "\"zoom\" may only be the input of a top-level \"step\" or \"interpolate\"",
    )
}

/// A declared (unevaluated) property value from the style JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Plain constant, already coerced to the schema type.
    Constant(Value),
    /// Expression still requiring camera and/or feature inputs.
    Expression(StyleExpression),
}

impl PropertyValue {
    /// Parse a raw style-JSON value for `spec`.
    pub fn from_json(json: &serde_json::Value, spec: &PropertySpec) -> CartoucheResult<Self> {
        if Expr::is_expression_json(json) {
            let parsed = StyleExpression::new(Expr::from_json(json)?)?;
            Ok(Self::Expression(parsed))
        } else {
            let value = Value::from_json(json)?.coerce(spec.value_type)?;
            Ok(Self::Constant(value))
        }
    }

    /// Whether per-feature data is needed to evaluate this value.
    pub fn is_data_driven(&self) -> bool {
        matches!(
            self,
            Self::Expression(StyleExpression {
                kind: ExpressionKind::Source | ExpressionKind::Composite,
                ..
            })
        )
    }

    /// Whether this value was declared as an expression at all.
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/property/value.rs"]
mod tests;
