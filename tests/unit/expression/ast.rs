use super::*;

fn parse(json: serde_json::Value) -> Expr {
    Expr::from_json(&json).unwrap()
}

#[test]
fn non_arrays_and_plain_arrays_are_literals() {
    assert_eq!(
        parse(serde_json::json!("hello")),
        Expr::Literal(Value::String("hello".to_owned()))
    );
    assert_eq!(parse(serde_json::json!(3.0)), Expr::Literal(Value::Number(3.0)));
    // A font stack is an array constant, not an expression.
    assert_eq!(
        parse(serde_json::json!(["Noto Sans", "Arial"])),
        Expr::Literal(Value::Array(vec![
            Value::String("Noto Sans".to_owned()),
            Value::String("Arial".to_owned()),
        ]))
    );
}

#[test]
fn expression_json_detection_keys_off_known_operators() {
    assert!(Expr::is_expression_json(&serde_json::json!(["get", "name"])));
    assert!(Expr::is_expression_json(&serde_json::json!(["format", "a"])));
    assert!(!Expr::is_expression_json(&serde_json::json!(["horizontal"])));
    assert!(!Expr::is_expression_json(&serde_json::json!("get")));
}

#[test]
fn parses_nested_operators() {
    let expr = parse(serde_json::json!([
        "case",
        ["==", ["get", "class"], "park"],
        ["concat", ["get", "name"], " park"],
        ["get", "name"]
    ]));
    let Expr::Case { branches, fallback } = expr else {
        panic!("expected case");
    };
    assert_eq!(branches.len(), 1);
    assert!(matches!(*fallback, Expr::Get(ref name) if name == "name"));
}

#[test]
fn format_style_options_attach_to_the_preceding_section() {
    let expr = parse(serde_json::json!([
        "format",
        ["get", "name"],
        { "text-color": "#ff0000", "font-scale": 1.2 },
        "\n",
        ["get", "ref"]
    ]));
    let Expr::Format(format) = expr else {
        panic!("expected format");
    };
    assert_eq!(format.sections.len(), 3);
    assert!(format.sections[0].declares_override("text-color"));
    assert!(format.sections[0].font_scale.is_some());
    assert!(!format.sections[1].declares_override("text-color"));
    assert!(!format.sections[2].declares_override("text-color"));
    // Declared overrides never answer for other paint properties.
    assert!(!format.sections[0].declares_override("text-halo-color"));
}

#[test]
fn format_rejects_leading_style_object() {
    assert!(Expr::from_json(&serde_json::json!(["format", { "font-scale": 2.0 }, "x"])).is_err());
}

#[test]
fn interpolate_requires_linear_and_ascending_stops() {
    assert!(
        Expr::from_json(&serde_json::json!([
            "interpolate", ["exponential", 2], ["zoom"], 0, 1, 10, 2
        ]))
        .is_err()
    );
    assert!(
        Expr::from_json(&serde_json::json!([
            "interpolate", ["linear"], ["zoom"], 10, 1, 10, 2
        ]))
        .is_err()
    );
    assert!(
        Expr::from_json(&serde_json::json!([
            "interpolate", ["linear"], ["zoom"], 0, 1, 10, 2
        ]))
        .is_ok()
    );
}

#[test]
fn unknown_operator_is_an_expression_error() {
    let err = Expr::from_json(&serde_json::json!(["coalesce2", 1])).unwrap_err();
    assert!(err.to_string().contains("expression error:"));
}

#[test]
fn children_are_ordered_and_complete() {
    let expr = parse(serde_json::json!([
        "step", ["zoom"], "a", 5, "b", 10, "c"
    ]));
    let kids = expr.children();
    assert_eq!(kids.len(), 4);
    assert_eq!(kids[0], &Expr::Zoom);
    assert_eq!(kids[1], &Expr::Literal(Value::String("a".to_owned())));

    let format = parse(serde_json::json!([
        "format", ["get", "name"], { "text-color": ["get", "c"] }
    ]));
    let kids = format.children();
    assert_eq!(kids.len(), 2);
    assert!(matches!(kids[1], Expr::Get(name) if name == "c"));
}

#[test]
fn usage_scans_reach_nested_nodes() {
    let expr = parse(serde_json::json!(["concat", "a", ["get", "name"]]));
    assert!(expr.uses_feature());
    assert!(!expr.uses_zoom());

    let expr = parse(serde_json::json!([
        "interpolate", ["linear"], ["zoom"], 0, ["get", "size"], 10, 4
    ]));
    assert!(expr.uses_feature());
    assert!(expr.uses_zoom());
}
