//! [`WaveDocument`] → text.

use serde_json::Value;
use wavescaler_core::WaveDocument;

use crate::error::FormatError;
use crate::relaxed::write_relaxed;

/// Render a document as strict JSON.
///
/// `pretty` selects two-space indentation; otherwise the output is compact.
/// Known keys come out in model order (`signal`, `config`, `head`, `foot`,
/// `edge`), followed by unknown keys in their original order.
pub fn generate(doc: &WaveDocument, pretty: bool) -> Result<String, FormatError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    rendered.map_err(|e| FormatError::Validation(e.to_string()))
}

/// Render an untyped value, checking the minimum WaveJSON shape first.
pub fn generate_value(value: &Value, pretty: bool) -> Result<String, FormatError> {
    let Value::Object(root) = value else {
        return Err(FormatError::Validation(
            "not a valid WaveJSON object".to_string(),
        ));
    };
    if !matches!(root.get("signal"), Some(Value::Array(_))) {
        return Err(FormatError::Validation(
            "'signal' property must be an array and exist.".to_string(),
        ));
    }

    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| FormatError::Validation(e.to_string()))
}

/// Compact relaxed-dialect rendering, as WaveDrom users usually write it.
pub fn to_relaxed(doc: &WaveDocument) -> Result<String, FormatError> {
    let value = serde_json::to_value(doc).map_err(|e| FormatError::Validation(e.to_string()))?;
    let mut out = String::new();
    write_relaxed(&value, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatErrorKind;
    use serde_json::json;
    use wavescaler_core::{Group, Signal, SignalItem};

    #[test]
    fn test_compact_output() {
        let doc = WaveDocument::with_signals([Signal::new("gamma", "0.1").into()]);
        assert_eq!(
            generate(&doc, false).unwrap(),
            r#"{"signal":[{"name":"gamma","wave":"0.1"}]}"#
        );
    }

    #[test]
    fn test_empty_signal_list() {
        assert_eq!(generate(&WaveDocument::new(), false).unwrap(), r#"{"signal":[]}"#);
    }

    #[test]
    fn test_pretty_uses_two_spaces() {
        let doc = WaveDocument::with_signals([Signal::new("a", "0").into()]);
        let out = generate(&doc, true).unwrap();
        assert!(out.contains("\n  \"signal\": [\n    {\n      \"name\": \"a\""));
    }

    #[test]
    fn test_groups_and_spacers_shape() {
        let doc = WaveDocument::with_signals([
            Group::new("G").with_items([Signal::new("a", "1").into()]).into(),
            SignalItem::Spacer,
        ]);
        assert_eq!(
            generate(&doc, false).unwrap(),
            r#"{"signal":[["G",{"name":"a","wave":"1"}],{}]}"#
        );
    }

    #[test]
    fn test_generate_value_rejects_non_documents() {
        let err = generate_value(&json!([1, 2]), false).unwrap_err();
        assert_eq!(err.kind(), FormatErrorKind::Validation);
        assert!(err.to_string().contains("not a valid WaveJSON object"));

        let err = generate_value(&json!({ "signal": "nope" }), false).unwrap_err();
        assert!(err.to_string().contains("'signal' property must be an array and exist."));

        let err = generate_value(&json!({ "config": {} }), false).unwrap_err();
        assert_eq!(err.kind(), FormatErrorKind::Validation);
    }

    #[test]
    fn test_generate_value_keeps_key_order() {
        let value = json!({ "foot": { "text": "f" }, "signal": [] });
        assert_eq!(
            generate_value(&value, false).unwrap(),
            r#"{"foot":{"text":"f"},"signal":[]}"#
        );
    }

    #[test]
    fn test_to_relaxed() {
        let doc = WaveDocument::with_signals([Signal::new("clk", "p..").into()]);
        assert_eq!(to_relaxed(&doc).unwrap(), "{signal:[{name:'clk',wave:'p..'}]}");
    }
}
