//! `{path}` variable resolution
//!
//! Text content may contain placeholders of the form `{invoice.number}` or
//! `{customer.name}`. Each placeholder is a dot-separated path looked up in
//! a JSON context. A path that does not resolve leaves the placeholder in
//! the output verbatim, and malformed braces are passed through as literal
//! text. Substituted values are not re-scanned.

use serde_json::Value;

/// Substitute placeholders in `text` against `context` in a single pass
pub fn resolve(text: &str, context: &Value) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(['{', '}']) {
            Some(end) if after.as_bytes()[end] == b'}' => {
                let path = &after[..end];
                match lookup_path(context, path) {
                    Some(value) => out.push_str(&value_to_string(value)),
                    None => {
                        out.push('{');
                        out.push_str(path);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            // No closing brace, or another '{' opens first: literal '{'
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Walk a dot-separated path through nested JSON objects
fn lookup_path<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = context;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.get(segment)?;
    }
    Some(current)
}

/// Render a JSON value the way it should appear in document text
///
/// Null renders as the empty string so optional fields (a missing GSTIN,
/// say) leave a blank rather than the word "null".
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> Value {
        json!({
            "invoice": {"number": "INV-2024-001", "total": 4720},
            "customer": {"name": "Acme Traders", "gstin": null},
        })
    }

    #[test]
    fn test_simple_substitution() {
        assert_eq!(
            resolve("Invoice #: {invoice.number}", &context()),
            "Invoice #: INV-2024-001"
        );
    }

    #[test]
    fn test_multiple_placeholders() {
        assert_eq!(
            resolve("{customer.name} owes {invoice.total}", &context()),
            "Acme Traders owes 4720"
        );
    }

    #[test]
    fn test_unresolved_path_stays_verbatim() {
        assert_eq!(
            resolve("Hello {missing.path}!", &context()),
            "Hello {missing.path}!"
        );
    }

    #[test]
    fn test_null_value_renders_empty() {
        assert_eq!(resolve("GSTIN: {customer.gstin}", &context()), "GSTIN: ");
    }

    #[test]
    fn test_malformed_braces_are_literal() {
        assert_eq!(resolve("open { brace", &context()), "open { brace");
        assert_eq!(resolve("empty {} braces", &context()), "empty {} braces");
        assert_eq!(
            resolve("{ {invoice.number}", &context()),
            "{ INV-2024-001"
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let ctx = json!({"a": "{b}", "b": "never"});
        assert_eq!(resolve("{a}", &ctx), "{b}");
    }

    #[test]
    fn test_no_placeholders_passthrough() {
        assert_eq!(resolve("plain text", &context()), "plain text");
    }
}
