use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CartoucheError::style("x")
            .to_string()
            .contains("style error:")
    );
    assert!(
        CartoucheError::expression("x")
            .to_string()
            .contains("expression error:")
    );
    assert!(
        CartoucheError::query("x")
            .to_string()
            .contains("query error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CartoucheError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
