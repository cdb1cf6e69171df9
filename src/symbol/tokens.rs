use std::collections::BTreeMap;

use crate::expression::value::Value;

/// Substitute legacy `{attribute}` tokens from feature attributes.
///
/// Missing attributes become the empty string; braces without a closing
/// partner pass through verbatim.
pub fn resolve_tokens(properties: &BTreeMap<String, Value>, template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if !after[..close].contains('{') => {
                let key = &after[..close];
                if let Some(value) = properties.get(key) {
                    out.push_str(&value.to_display_string());
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/tokens.rs"]
mod tests;
