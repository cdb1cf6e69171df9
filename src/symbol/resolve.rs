use crate::expression::value::Value;
use crate::property::possibly::PropertySet;

/// Rotation/pitch alignment of symbol text and icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    /// Unresolved sentinel; never survives layout resolution.
    Auto,
    /// Aligned to the map plane.
    Map,
    /// Aligned to the viewport.
    Viewport,
}

impl Alignment {
    /// Parse from a resolved layout value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "auto" => Some(Self::Auto),
                "map" => Some(Self::Map),
                "viewport" => Some(Self::Viewport),
                _ => None,
            },
            _ => None,
        }
    }

    /// Style-JSON spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Map => "map",
            Self::Viewport => "viewport",
        }
    }

    fn to_value(self) -> Value {
        Value::String(self.as_str().to_owned())
    }
}

/// Placement of symbols along their geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolPlacement {
    /// One symbol at each point of the geometry.
    Point,
    /// Symbols repeated along the line.
    Line,
    /// One symbol at the center of the line.
    LineCenter,
}

impl SymbolPlacement {
    /// Parse from a resolved layout value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "point" => Some(Self::Point),
                "line" => Some(Self::Line),
                "line-center" => Some(Self::LineCenter),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Supported text flow directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritingMode {
    /// Left-to-right horizontal flow.
    Horizontal,
    /// Top-to-bottom vertical flow.
    Vertical,
}

/// Resolve the `auto` defaults of the alignment properties and normalize
/// `text-writing-mode`, in the fixed rule order.
///
/// Pitch alignments read the *already resolved* rotation alignments, so the
/// rotation rules must run first. The pass is total and idempotent; resolved
/// sets pass through unchanged.
pub fn resolve_symbol_layout(layout: &mut PropertySet) {
    let placement = layout
        .constant("symbol-placement")
        .and_then(SymbolPlacement::from_value)
        .unwrap_or(SymbolPlacement::Point);

    resolve_rotation_alignment(layout, "icon-rotation-alignment", placement);
    resolve_rotation_alignment(layout, "text-rotation-alignment", placement);

    if alignment_of(layout, "text-pitch-alignment") == Some(Alignment::Auto) {
        let resolved = if alignment_of(layout, "text-rotation-alignment") == Some(Alignment::Map) {
            Alignment::Map
        } else {
            Alignment::Viewport
        };
        let _ = layout.set_constant("text-pitch-alignment", resolved.to_value());
    }

    if alignment_of(layout, "icon-pitch-alignment") == Some(Alignment::Auto) {
        if let Some(rotation) = layout.constant("icon-rotation-alignment").cloned() {
            let _ = layout.set_constant("icon-pitch-alignment", rotation);
        }
    }

    if placement == SymbolPlacement::Point {
        let resolved = match layout.constant("text-writing-mode") {
            Some(Value::Array(modes)) if !modes.is_empty() => dedup_preserving_order(modes),
            _ => vec![Value::String("horizontal".to_owned())],
        };
        let _ = layout.set_constant("text-writing-mode", Value::Array(resolved));
    }
}

fn resolve_rotation_alignment(layout: &mut PropertySet, name: &str, placement: SymbolPlacement) {
    if alignment_of(layout, name) != Some(Alignment::Auto) {
        return;
    }
    let resolved = if placement == SymbolPlacement::Point {
        Alignment::Viewport
    } else {
        Alignment::Map
    };
    let _ = layout.set_constant(name, resolved.to_value());
}

fn alignment_of(layout: &PropertySet, name: &str) -> Option<Alignment> {
    layout.constant(name).and_then(Alignment::from_value)
}

fn dedup_preserving_order(modes: &[Value]) -> Vec<Value> {
    let mut deduped: Vec<Value> = Vec::with_capacity(modes.len());
    for mode in modes {
        if !deduped.contains(mode) {
            deduped.push(mode.clone());
        }
    }
    deduped
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/resolve.rs"]
mod tests;
