//! Integration tests for parse → edit → generate pipelines.
//!
//! These run full documents through the public API the way the editor
//! and CLI do, checking that nothing is lost along the way.

use serde_json::json;
use wavescaler_core::{DropPosition, Group, Signal, SignalData, SignalItem, TreePath, WaveDocument};
use wavescaler_format::{
    decode_share_url, generate, generate_value, parse, parse_document, share_url,
    FormatErrorKind,
};

/// A document touching every section the model knows about.
fn full_document_text() -> &'static str {
    r#"{
      "signal": [
        { "name": "clk", "wave": "pP" },
        ["MyGroup",
          { "name": "data", "wave": "x.==.x", "data": ["A", "B"] },
          { "name": "req", "wave": "010" }
        ],
        {}
      ],
      "config": { "hscale": 3, "skin": "default", "head": { "text": "Diagram Title", "tick": 0 } },
      "foot": { "text": "Footer notes", "tock": 5, "every": 2 },
      "edge": ["data@1 -> req@2 edge text"]
    }"#
}

#[test]
fn test_full_document_survives_pretty_cycle() {
    let doc = parse_document(full_document_text()).unwrap();
    let text = generate(&doc, true).unwrap();
    let again = parse_document(&text).unwrap();
    assert_eq!(doc, again);

    // Integers stay integers.
    assert!(text.contains("\"hscale\": 3"));
    assert!(!text.contains("3.0"));
}

#[test]
fn test_generated_text_matches_source_json() {
    let doc = parse_document(full_document_text()).unwrap();
    let generated: serde_json::Value = serde_json::from_str(&generate(&doc, false).unwrap()).unwrap();
    let source: serde_json::Value = serde_json::from_str(full_document_text()).unwrap();
    assert_eq!(generated, source);
}

#[test]
fn test_relaxed_source_with_comments() {
    let text = r#"
    // clocked bus
    { signal: [
        { name: 'clk',  wave: 'p.....' },
        { name: 'bus',  wave: 'x.34.x', data: 'head body', },   /* single label */
        [ 'ctl',
          { name: 'we', wave: '01.0..', phase: 0.5 },
        ],
      ],
      config: { hscale: 2 },
    }"#;
    let parsed = parse(text).unwrap();
    assert!(parsed.warnings.is_empty());

    let doc = parsed.document;
    assert_eq!(doc.hscale(), 2.0);
    let bus = doc.signal[1].as_signal().unwrap();
    assert_eq!(bus.data, Some(SignalData::Single("head body".to_string())));
    let we = doc.item_at(&TreePath::from([2, 0])).and_then(SignalItem::as_signal).unwrap();
    assert_eq!(we.phase.as_ref().and_then(|n| n.as_f64()), Some(0.5));
}

#[test]
fn test_unknown_fields_round_trip_in_order() {
    let text = r#"{"signal":[{"name":"a","wave":"0","zeta":1,"alpha":{"k":"v"}}],"custom":[1,2]}"#;
    let doc = parse_document(text).unwrap();
    assert_eq!(generate(&doc, false).unwrap(), text);
}

#[test]
fn test_edit_then_generate() {
    let doc = parse_document(full_document_text()).unwrap();
    // Move "clk" into the group, after "req". Paths address the tree as it
    // was before the move.
    let moved = doc.moved(&TreePath::from([0]), &TreePath::from([1, 1]), DropPosition::After);
    // Root shrank by one, so the group is now at index 0.
    let group = moved.signal[0].as_group().unwrap();
    assert_eq!(group.name, "MyGroup");
    let names: Vec<_> = group
        .items
        .iter()
        .filter_map(SignalItem::as_signal)
        .map(|s| s.name_or_default().to_string())
        .collect();
    assert_eq!(names, ["data", "req", "clk"]);

    // Untouched sections are carried over.
    assert_eq!(moved.config, doc.config);
    assert_eq!(moved.edge, doc.edge);
    assert!(generate(&moved, false).is_ok());
}

#[test]
fn test_error_kinds() {
    assert_eq!(parse("").unwrap_err().kind(), FormatErrorKind::Syntax);
    assert_eq!(parse("{ signal: [ }").unwrap_err().kind(), FormatErrorKind::Syntax);
    assert_eq!(parse(r#"{ "signal": 1 }"#).unwrap_err().kind(), FormatErrorKind::Structure);
    assert_eq!(parse(r#"{ "signal": [[1]] }"#).unwrap_err().kind(), FormatErrorKind::Structure);
    assert_eq!(
        generate_value(&json!("text"), true).unwrap_err().kind(),
        FormatErrorKind::Validation
    );
}

#[test]
fn test_share_link_round_trip() {
    let doc = WaveDocument::with_signals([
        Signal::new("clk", "p...").into(),
        Group::new("Bus & Ctl")
            .with_items([Signal::new("d", "=.=.").with_data(SignalData::List(vec![
                "it's".into(),
                "50%".into(),
            ]))
            .into()])
            .into(),
        SignalItem::Spacer,
    ]);
    let url = share_url("http://localhost:5173/", &doc).unwrap();
    assert!(url.starts_with("http://localhost:5173/?waveform="));
    assert!(!url[url.find('=').unwrap() + 1..].contains('&'));

    let decoded = decode_share_url(&url).unwrap().unwrap();
    assert_eq!(decoded.document, doc);
}
