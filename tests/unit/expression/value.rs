use super::*;

#[test]
fn parses_hex_and_functional_colors() {
    assert_eq!(Color::parse("#000000").unwrap(), Color::BLACK);
    assert_eq!(Color::parse("#fff").unwrap(), Color::rgba(1.0, 1.0, 1.0, 1.0));
    assert_eq!(
        Color::parse("#ff000080").unwrap().a,
        f64::from(0x80u8) / 255.0
    );
    assert_eq!(
        Color::parse("rgba(255, 0, 0, 0.5)").unwrap(),
        Color::rgba(1.0, 0.0, 0.0, 0.5)
    );
    assert_eq!(
        Color::parse("rgb(0, 255, 0)").unwrap(),
        Color::rgba(0.0, 1.0, 0.0, 1.0)
    );
    assert!(Color::parse("teal-ish").is_err());
    assert!(Color::parse("#12345").is_err());
}

#[test]
fn truthiness_follows_engine_coercion() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::String(String::new()).is_truthy());
    assert!(Value::Number(2.0).is_truthy());
    assert!(Value::String("a".to_owned()).is_truthy());
    assert!(Value::Formatted(Formatted::default()).is_truthy());
}

#[test]
fn display_string_drops_trailing_zero_fraction() {
    assert_eq!(Value::Number(3.0).to_display_string(), "3");
    assert_eq!(Value::Number(3.5).to_display_string(), "3.5");
    assert_eq!(Value::Null.to_display_string(), "");
}

#[test]
fn coerce_string_to_color_and_formatted() {
    let c = Value::String("#ff0000".to_owned())
        .coerce(ValueType::Color)
        .unwrap();
    assert_eq!(c, Value::Color(Color::rgba(1.0, 0.0, 0.0, 1.0)));

    let f = Value::String("hi".to_owned())
        .coerce(ValueType::Formatted)
        .unwrap();
    let Value::Formatted(f) = f else {
        panic!("expected formatted");
    };
    assert_eq!(f.to_plain_text(), "hi");
    assert!(f.sections[0].text_color.is_none());
}

#[test]
fn coerce_null_passes_through() {
    assert_eq!(Value::Null.coerce(ValueType::Color).unwrap(), Value::Null);
    assert_eq!(Value::Null.coerce(ValueType::Padding).unwrap(), Value::Null);
}

#[test]
fn coerce_padding_splats_scalars() {
    let v = Value::Number(2.0).coerce(ValueType::Padding).unwrap();
    assert_eq!(v, Value::Array(vec![Value::Number(2.0); 4]));

    let v = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])
        .coerce(ValueType::Padding)
        .unwrap();
    assert_eq!(
        v,
        Value::Array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(1.0),
            Value::Number(2.0),
        ])
    );

    assert!(
        Value::String("wide".to_owned())
            .coerce(ValueType::Padding)
            .is_err()
    );
}

#[test]
fn section_override_lookup_is_per_property() {
    let section = FormattedSection {
        text: "run".to_owned(),
        text_color: Some(Color::BLACK),
        font_scale: Some(1.5),
        text_font: None,
    };
    assert_eq!(
        section.override_for("text-color"),
        Some(Value::Color(Color::BLACK))
    );
    assert_eq!(section.override_for("text-halo-color"), None);
    assert_eq!(FormattedSection::plain("x").override_for("text-color"), None);
}
