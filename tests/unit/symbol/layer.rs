use super::*;

fn layer(json: serde_json::Value) -> SymbolLayer {
    SymbolLayer::from_json_str(&json.to_string()).unwrap()
}

fn poi_layer() -> SymbolLayer {
    layer(serde_json::json!({
        "id": "poi",
        "type": "symbol",
        "layout": {
            "icon-image": "{maki}-15",
            "text-field": "{name} ({ref})",
            "icon-padding": [1, 2, 3, 4]
        },
        "paint": { "text-color": "#112233" }
    }))
}

#[test]
fn non_symbol_layers_are_rejected() {
    let err = SymbolLayer::from_json_str(
        &serde_json::json!({ "id": "bg", "type": "background" }).to_string(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("style error:"));
}

#[test]
fn tokens_resolve_for_plain_constants_only() {
    let layer = poi_layer();
    let feature = Feature::default()
        .with_property("name", Value::String("Elm St".to_owned()))
        .with_property("ref", Value::String("A1".to_owned()))
        .with_property("maki", Value::String("park".to_owned()));

    assert_eq!(
        layer
            .get_value_and_resolve_tokens("text-field", &feature, None, &[])
            .unwrap(),
        Value::String("Elm St (A1)".to_owned())
    );
    assert_eq!(
        layer
            .get_value_and_resolve_tokens("icon-image", &feature, None, &[])
            .unwrap(),
        Value::String("park-15".to_owned())
    );

    // Declared as an expression: the evaluated value passes through untouched,
    // tokens and all.
    let layer = layer_with_text_field(serde_json::json!(["concat", "{name}", "!"]));
    let value = layer
        .get_value_and_resolve_tokens("text-field", &feature, None, &[])
        .unwrap();
    assert_eq!(
        value,
        Value::Formatted(crate::expression::value::Formatted::plain("{name}!"))
    );
}

fn layer_with_text_field(text_field: serde_json::Value) -> SymbolLayer {
    layer(serde_json::json!({
        "id": "t",
        "type": "symbol",
        "layout": { "text-field": text_field }
    }))
}

#[test]
fn icon_padding_scales_by_pixel_ratio() {
    let layer = poi_layer();
    let feature = Feature::default();
    let padding = layer.icon_padding(&feature, None, 2.0).unwrap();
    assert_eq!(padding.values, [2.0, 4.0, 6.0, 8.0]);

    let padding = layer.icon_padding(&feature, None, 1.0).unwrap();
    assert_eq!(padding.values, [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn query_stubs_follow_the_collision_path_contract() {
    let layer = poi_layer();
    assert_eq!(layer.query_radius(), 0.0);
    let err = layer.query_intersects_feature().unwrap_err();
    assert!(matches!(err, CartoucheError::Query(_)));
}

#[test]
fn create_bucket_seeds_the_tessellation_inputs() {
    let layer = poi_layer();
    let params = BucketParameters {
        canonical: CanonicalTileId::new(14, 2_674, 6_102).unwrap(),
        zoom: 14.0,
        overscaling: 1.0,
        pixel_ratio: 2.0,
    };
    let bucket = layer.create_bucket(params);
    assert_eq!(bucket.layer_id, "poi");
    assert_eq!(bucket.parameters, params);
}

#[test]
fn overridable_paint_updates_report_relayout_only_with_an_active_override() {
    let mut layer = layer(serde_json::json!({
        "id": "t",
        "type": "symbol",
        "layout": {
            "text-field": ["format", ["get", "name"], { "text-color": "#ff0000" }]
        }
    }));

    // Constant to constant with an override in the layout: relayout.
    assert!(layer.set_paint_property("text-color", &serde_json::json!("#00ff00")).unwrap());

    // Data-driven updates bail out before the override check.
    assert!(!layer.set_paint_property("text-color", &serde_json::json!(["get", "c"])).unwrap());

    // Non-overridable properties never force relayout through this path.
    assert!(!layer.set_paint_property("text-opacity", &serde_json::json!(0.5)).unwrap());

    // Unknown names are style errors.
    assert!(layer.set_paint_property("text-glow", &serde_json::json!(1)).is_err());
}

#[test]
fn recalculate_layers_runs_every_layer() {
    let mut layers = vec![poi_layer(), poi_layer(), poi_layer()];
    recalculate_layers(&mut layers, &EvaluationParameters::new(11.0), &[]).unwrap();
    assert!(layers.iter().all(|l| l.zoom() == 11.0));
}
