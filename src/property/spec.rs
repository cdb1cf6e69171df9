use crate::expression::value::{Color, Value, ValueType};

/// Schema metadata for one symbol-layer property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySpec {
    /// Property name as it appears in the style JSON.
    pub name: &'static str,
    /// Schema value type; evaluation results are coerced to it.
    pub value_type: ValueType,
    /// Value used when the layer does not declare the property, or when a
    /// data-driven evaluation yields null.
    pub default: Value,
    /// Whether formatted-text runs may override this paint property.
    pub overridable: bool,
    /// Whether plain constants support legacy `{token}` substitution.
    pub tokens: bool,
}

impl PropertySpec {
    fn new(name: &'static str, value_type: ValueType, default: Value) -> Self {
        Self {
            name,
            value_type,
            default,
            overridable: false,
            tokens: false,
        }
    }

    fn with_tokens(mut self) -> Self {
        self.tokens = true;
        self
    }

    fn as_overridable(mut self) -> Self {
        self.overridable = true;
        self
    }
}

/// Layout property schema for symbol layers, in schema order.
pub fn symbol_layout_specs() -> Vec<PropertySpec> {
    vec![
        PropertySpec::new(
            "symbol-placement",
            ValueType::String,
            Value::String("point".to_owned()),
        ),
        PropertySpec::new("symbol-spacing", ValueType::Number, Value::Number(250.0)),
        PropertySpec::new("icon-image", ValueType::String, Value::Null).with_tokens(),
        PropertySpec::new(
            "icon-padding",
            ValueType::Padding,
            Value::Array(vec![Value::Number(2.0); 4]),
        ),
        PropertySpec::new(
            "icon-rotation-alignment",
            ValueType::String,
            Value::String("auto".to_owned()),
        ),
        PropertySpec::new(
            "icon-pitch-alignment",
            ValueType::String,
            Value::String("auto".to_owned()),
        ),
        PropertySpec::new(
            "text-field",
            ValueType::Formatted,
            Value::Formatted(Default::default()),
        )
        .with_tokens(),
        PropertySpec::new(
            "text-font",
            ValueType::Array,
            Value::Array(vec![
                Value::String("Open Sans Regular".to_owned()),
                Value::String("Arial Unicode MS Regular".to_owned()),
            ]),
        ),
        PropertySpec::new("text-size", ValueType::Number, Value::Number(16.0)),
        PropertySpec::new(
            "text-rotation-alignment",
            ValueType::String,
            Value::String("auto".to_owned()),
        ),
        PropertySpec::new(
            "text-pitch-alignment",
            ValueType::String,
            Value::String("auto".to_owned()),
        ),
        PropertySpec::new("text-writing-mode", ValueType::Array, Value::Null),
    ]
}

/// Paint property schema for symbol layers, in schema order.
pub fn symbol_paint_specs() -> Vec<PropertySpec> {
    vec![
        PropertySpec::new("text-color", ValueType::Color, Value::Color(Color::BLACK))
            .as_overridable(),
        PropertySpec::new(
            "text-halo-color",
            ValueType::Color,
            Value::Color(Color::rgba(0.0, 0.0, 0.0, 0.0)),
        ),
        PropertySpec::new("text-halo-width", ValueType::Number, Value::Number(0.0)),
        PropertySpec::new("text-opacity", ValueType::Number, Value::Number(1.0)),
        PropertySpec::new("icon-color", ValueType::Color, Value::Color(Color::BLACK)),
        PropertySpec::new("icon-opacity", ValueType::Number, Value::Number(1.0)),
    ]
}
