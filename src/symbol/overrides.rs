use crate::expression::ast::{Expr, SectionOverrideExpr};
use crate::expression::value::{Value, ValueType};
use crate::property::possibly::{
    CompositeExpression, PossiblyEvaluated, PropertySet, SourceExpression,
};

/// Whether the layer's `text-field` carries a formatted-text run override for
/// the paint property `name`.
///
/// Constant formatted values are scanned directly; source expressions get a
/// depth-first pre-order walk that short-circuits on the first match.
/// Composite (zoom-dependent) text fields are deliberately not inspected.
pub fn has_paint_override(layout: &PropertySet, name: &str) -> bool {
    let Some(text_field) = layout.get("text-field") else {
        return false;
    };
    match &text_field.value {
        PossiblyEvaluated::Constant(Value::Formatted(formatted)) => formatted
            .sections
            .iter()
            .any(|section| section.override_for(name).is_some()),
        PossiblyEvaluated::Source(source) => expression_has_override(&source.expression, name),
        _ => false,
    }
}

fn expression_has_override(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Literal(value) if value.type_of() == ValueType::Formatted => {
            let Value::Formatted(formatted) = value else {
                return false;
            };
            formatted
                .sections
                .iter()
                .any(|section| section.override_for(name).is_some())
        }
        // Declared sections are known at construction time; no evaluation needed.
        Expr::Format(format) => format
            .sections
            .iter()
            .any(|section| section.declares_override(name)),
        other => other
            .children()
            .iter()
            .any(|child| expression_has_override(child, name)),
    }
}

/// Rewrite every overridable paint property with a detected override into a
/// section-override expression wrapping the original value.
///
/// The wrap preserves the evaluation class implied by the original value:
/// constant and source become source, composite stays composite with its zoom
/// stops carried forward unmodified. The original payload is captured
/// immutably, so earlier evaluation generations remain readable.
pub fn apply_paint_overrides(layout: &PropertySet, paint: &mut PropertySet) {
    for name in paint.overridable_names() {
        if !has_paint_override(layout, name) {
            continue;
        }
        let Some(original) = paint.get(name).cloned() else {
            continue;
        };
        let zoom_stops = match &original.value {
            PossiblyEvaluated::Composite(composite) => Some(composite.zoom_stops.clone()),
            _ => None,
        };
        let expression = Expr::SectionOverride(SectionOverrideExpr {
            property: name.to_owned(),
            fallback: Box::new(original),
        });
        let wrapped = match zoom_stops {
            Some(zoom_stops) => PossiblyEvaluated::Composite(CompositeExpression {
                expression,
                zoom_stops,
            }),
            None => PossiblyEvaluated::Source(SourceExpression { expression }),
        };
        let _ = paint.set_value(name, wrapped);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/overrides.rs"]
mod tests;
