use super::*;
use crate::foundation::core::EvaluationParameters;
use crate::property::possibly::UnevaluatedProperties;
use crate::property::spec::symbol_layout_specs;
use crate::property::value::PropertyValue;

fn layout_with(pairs: &[(&str, serde_json::Value)]) -> PropertySet {
    let mut props = UnevaluatedProperties::from_specs(symbol_layout_specs());
    for (name, json) in pairs {
        let spec = props.get(name).unwrap().spec.clone();
        assert!(props.set(name, PropertyValue::from_json(json, &spec).unwrap()));
    }
    props
        .possibly_evaluate(&EvaluationParameters::new(0.0), &[])
        .unwrap()
}

fn alignment(layout: &PropertySet, name: &str) -> Alignment {
    Alignment::from_value(layout.constant(name).unwrap()).unwrap()
}

#[test]
fn point_placement_resolves_auto_rotation_to_viewport() {
    let mut layout = layout_with(&[]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "icon-rotation-alignment"), Alignment::Viewport);
    assert_eq!(alignment(&layout, "text-rotation-alignment"), Alignment::Viewport);
}

#[test]
fn line_placements_resolve_auto_rotation_to_map() {
    for placement in ["line", "line-center"] {
        let mut layout = layout_with(&[("symbol-placement", serde_json::json!(placement))]);
        resolve_symbol_layout(&mut layout);
        assert_eq!(alignment(&layout, "icon-rotation-alignment"), Alignment::Map);
        assert_eq!(alignment(&layout, "text-rotation-alignment"), Alignment::Map);
    }
}

#[test]
fn explicit_alignments_pass_through_unchanged() {
    let mut layout = layout_with(&[
        ("symbol-placement", serde_json::json!("line")),
        ("icon-rotation-alignment", serde_json::json!("viewport")),
        ("text-rotation-alignment", serde_json::json!("viewport")),
    ]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "icon-rotation-alignment"), Alignment::Viewport);
    assert_eq!(alignment(&layout, "text-rotation-alignment"), Alignment::Viewport);
}

#[test]
fn text_pitch_follows_the_resolved_text_rotation() {
    // auto rotation on a line placement resolves to map, pitch follows.
    let mut layout = layout_with(&[("symbol-placement", serde_json::json!("line"))]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "text-pitch-alignment"), Alignment::Map);

    // viewport rotation pulls pitch to viewport.
    let mut layout = layout_with(&[("text-rotation-alignment", serde_json::json!("viewport"))]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "text-pitch-alignment"), Alignment::Viewport);
}

#[test]
fn icon_pitch_copies_the_resolved_icon_rotation_verbatim() {
    let mut layout = layout_with(&[("icon-rotation-alignment", serde_json::json!("map"))]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "icon-pitch-alignment"), Alignment::Map);

    let mut layout = layout_with(&[("symbol-placement", serde_json::json!("line"))]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "icon-pitch-alignment"), Alignment::Map);
}

#[test]
fn explicit_pitch_survives_rotation_resolution() {
    let mut layout = layout_with(&[
        ("symbol-placement", serde_json::json!("line")),
        ("text-pitch-alignment", serde_json::json!("viewport")),
    ]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(alignment(&layout, "text-pitch-alignment"), Alignment::Viewport);
}

#[test]
fn no_auto_survives_resolution() {
    let mut layout = layout_with(&[("symbol-placement", serde_json::json!("line"))]);
    resolve_symbol_layout(&mut layout);
    for name in [
        "icon-rotation-alignment",
        "text-rotation-alignment",
        "text-pitch-alignment",
        "icon-pitch-alignment",
    ] {
        assert_ne!(alignment(&layout, name), Alignment::Auto, "{name}");
    }
}

#[test]
fn unset_writing_mode_defaults_to_horizontal_for_point_placement() {
    let mut layout = layout_with(&[]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(
        layout.constant("text-writing-mode").unwrap(),
        &Value::Array(vec![Value::String("horizontal".to_owned())])
    );
}

#[test]
fn writing_modes_dedup_preserving_first_occurrence() {
    let mut layout = layout_with(&[(
        "text-writing-mode",
        serde_json::json!(["horizontal", "vertical", "horizontal"]),
    )]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(
        layout.constant("text-writing-mode").unwrap(),
        &Value::Array(vec![
            Value::String("horizontal".to_owned()),
            Value::String("vertical".to_owned()),
        ])
    );
}

#[test]
fn empty_writing_modes_fall_back_to_horizontal() {
    let mut layout = layout_with(&[("text-writing-mode", serde_json::json!([]))]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(
        layout.constant("text-writing-mode").unwrap(),
        &Value::Array(vec![Value::String("horizontal".to_owned())])
    );
}

#[test]
fn line_placement_leaves_writing_modes_alone() {
    let mut layout = layout_with(&[
        ("symbol-placement", serde_json::json!("line")),
        ("text-writing-mode", serde_json::json!(["vertical", "vertical"])),
    ]);
    resolve_symbol_layout(&mut layout);
    assert_eq!(
        layout.constant("text-writing-mode").unwrap(),
        &Value::Array(vec![
            Value::String("vertical".to_owned()),
            Value::String("vertical".to_owned()),
        ])
    );
}

#[test]
fn resolution_is_idempotent() {
    let mut once = layout_with(&[
        ("symbol-placement", serde_json::json!("line")),
        ("text-writing-mode", serde_json::json!(["vertical"])),
    ]);
    resolve_symbol_layout(&mut once);
    let mut twice = once.clone();
    resolve_symbol_layout(&mut twice);
    assert_eq!(once, twice);
}
