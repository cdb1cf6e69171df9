use crate::foundation::core::Padding;
use crate::foundation::error::{CartoucheError, CartoucheResult};

/// RGBA color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque black, the schema default for text.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Build a color from explicit channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`/`#rrggbb`/`#rrggbbaa` hex or `rgb()`/`rgba()` notation.
    pub fn parse(s: &str) -> CartoucheResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_components(body);
        }
        Err(CartoucheError::expression(format!(
            "could not parse color \"{s}\""
        )))
    }

    fn parse_hex(hex: &str) -> CartoucheResult<Self> {
        if !hex.is_ascii() {
            return Err(CartoucheError::expression(format!(
                "invalid hex color \"#{hex}\""
            )));
        }

        fn byte(pair: &str) -> CartoucheResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CartoucheError::expression(format!("invalid hex byte \"{pair}\"")))
        }

        let (r, g, b, a) = match hex.len() {
            3 => {
                let n = |i: usize| byte(&hex[i..=i].repeat(2));
                (n(0)?, n(1)?, n(2)?, 255)
            }
            6 => (byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255),
            8 => (
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            ),
            _ => {
                return Err(CartoucheError::expression(format!(
                    "invalid hex color \"#{hex}\""
                )));
            }
        };
        Ok(Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: f64::from(a) / 255.0,
        })
    }

    fn parse_components(body: &str) -> CartoucheResult<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(CartoucheError::expression(
                "rgb()/rgba() expects 3 or 4 components",
            ));
        }
        let num = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| CartoucheError::expression(format!("invalid color component \"{p}\"")))
        };
        // Channels are 0-255, alpha 0-1.
        let r = num(parts[0])? / 255.0;
        let g = num(parts[1])? / 255.0;
        let b = num(parts[2])? / 255.0;
        let a = if parts.len() == 4 { num(parts[3])? } else { 1.0 };
        Ok(Self { r, g, b, a })
    }

    /// Render as `rgba(r,g,b,a)` with 0-255 channels.
    pub fn to_rgba_string(self) -> String {
        let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round();
        format!(
            "rgba({},{},{},{})",
            ch(self.r),
            ch(self.g),
            ch(self.b),
            self.a
        )
    }
}

/// A rich-text value as an ordered sequence of sections.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Formatted {
    /// Ordered text runs.
    pub sections: Vec<FormattedSection>,
}

impl Formatted {
    /// Single unstyled section holding `text`.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            sections: vec![FormattedSection::plain(text)],
        }
    }

    /// Concatenated section text without styling.
    pub fn to_plain_text(&self) -> String {
        self.sections.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One run of a [`Formatted`] value, optionally carrying per-run paint overrides.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FormattedSection {
    /// Section text.
    pub text: String,
    /// Per-run text color override.
    pub text_color: Option<Color>,
    /// Per-run font scale relative to the layer font size.
    pub font_scale: Option<f64>,
    /// Per-run font stack override.
    pub text_font: Option<String>,
}

impl FormattedSection {
    /// Unstyled section holding `text`.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The override value this section carries for `property`, if any.
    pub fn override_for(&self, property: &str) -> Option<Value> {
        match property {
            "text-color" => self.text_color.map(Value::Color),
            _ => None,
        }
    }
}

/// Runtime type tag for [`Value`], plus schema-side aggregate types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ValueType {
    /// Absent value.
    Null,
    /// Boolean.
    Bool,
    /// Floating-point number.
    Number,
    /// UTF-8 string.
    String,
    /// RGBA color.
    Color,
    /// Heterogeneous array.
    Array,
    /// Rich formatted text.
    Formatted,
    /// Four-component padding; values normalize to a 4-element number array.
    Padding,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Color => "color",
            Self::Array => "array",
            Self::Formatted => "formatted",
            Self::Padding => "padding",
        };
        f.write_str(name)
    }
}

/// Closed runtime value model shared by constants and expression results.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Floating-point number.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// RGBA color.
    Color(Color),
    /// Heterogeneous array.
    Array(Vec<Value>),
    /// Rich formatted text.
    Formatted(Formatted),
}

impl Value {
    /// Runtime type of this value.
    pub fn type_of(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Color(_) => ValueType::Color,
            Self::Array(_) => ValueType::Array,
            Self::Formatted(_) => ValueType::Formatted,
        }
    }

    /// Truthiness following the original engine's coercion rules.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Color(_) | Self::Array(_) | Self::Formatted(_) => true,
        }
    }

    /// String rendering used by `concat` and token substitution.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::String(s) => s.clone(),
            Self::Color(c) => c.to_rgba_string(),
            Self::Array(items) => items
                .iter()
                .map(Self::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            Self::Formatted(f) => f.to_plain_text(),
        }
    }

    /// Convert a raw JSON constant into a runtime value.
    pub fn from_json(json: &serde_json::Value) -> CartoucheResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| CartoucheError::expression("number constant out of range")),
            serde_json::Value::String(s) => Ok(Self::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<CartoucheResult<Vec<_>>>()
                .map(Self::Array),
            serde_json::Value::Object(_) => Err(CartoucheError::expression(
                "object literals are not valid style constants",
            )),
        }
    }

    /// Render as JSON for diagnostics and CLI output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Color(c) => serde_json::Value::String(c.to_rgba_string()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Formatted(f) => serde_json::json!({
                "sections": f
                    .sections
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "text": s.text,
                            "text-color": s.text_color.map(Color::to_rgba_string),
                            "font-scale": s.font_scale,
                            "text-font": s.text_font,
                        })
                    })
                    .collect::<Vec<_>>(),
            }),
        }
    }

    /// Coerce into the schema type `target`.
    ///
    /// `Null` passes through untouched so absent feature data stays absent.
    pub fn coerce(self, target: ValueType) -> CartoucheResult<Self> {
        if matches!(self, Self::Null) {
            return Ok(Self::Null);
        }
        let actual = self.type_of();
        match (target, self) {
            (ValueType::Null, v) => Ok(v),
            (ValueType::Bool, v @ Self::Bool(_)) => Ok(v),
            (ValueType::Number, v @ Self::Number(_)) => Ok(v),
            (ValueType::String, v @ Self::String(_)) => Ok(v),
            (ValueType::String, v @ (Self::Number(_) | Self::Bool(_))) => {
                Ok(Self::String(v.to_display_string()))
            }
            (ValueType::Color, v @ Self::Color(_)) => Ok(v),
            (ValueType::Color, Self::String(s)) => Color::parse(&s).map(Self::Color),
            (ValueType::Array, v @ Self::Array(_)) => Ok(v),
            (ValueType::Formatted, v @ Self::Formatted(_)) => Ok(v),
            (ValueType::Formatted, Self::String(s)) => Ok(Self::Formatted(Formatted::plain(s))),
            (ValueType::Formatted, v @ (Self::Number(_) | Self::Bool(_))) => {
                Ok(Self::Formatted(Formatted::plain(v.to_display_string())))
            }
            (ValueType::Padding, Self::Number(n)) => {
                Ok(Self::Array(vec![Self::Number(n); 4]))
            }
            (ValueType::Padding, Self::Array(items)) => {
                let nums = items
                    .iter()
                    .map(|v| match v {
                        Self::Number(n) => Ok(*n),
                        other => Err(CartoucheError::expression(format!(
                            "padding component must be a number, got {}",
                            other.type_of()
                        ))),
                    })
                    .collect::<CartoucheResult<Vec<f64>>>()?;
                let padding = Padding::from_slice(&nums)?;
                Ok(Self::Array(
                    padding.values.iter().copied().map(Self::Number).collect(),
                ))
            }
            (target, _) => Err(CartoucheError::expression(format!(
                "expected {target}, got {actual}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/value.rs"]
mod tests;
