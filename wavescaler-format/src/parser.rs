//! Text → [`WaveDocument`].

use std::fmt;

use serde_json::Value;
use wavescaler_core::{SignalItem, TreePath, WaveDocument};

use crate::error::FormatError;
use crate::relaxed::normalize;

/// Non-fatal finding about a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    MissingName(TreePath),
    MissingWave(TreePath),
    /// A known field whose value has the wrong JSON type. The value is kept
    /// untouched and written back out.
    MistypedField { path: TreePath, field: &'static str },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingName(path) => write!(f, "signal at {path} has no 'name'"),
            ParseWarning::MissingWave(path) => write!(f, "signal at {path} has no 'wave'"),
            ParseWarning::MistypedField { path, field } => {
                write!(f, "signal at {path} has an unexpected type for '{field}'; kept as-is")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub document: WaveDocument,
    pub warnings: Vec<ParseWarning>,
}

/// Parse strict or relaxed WaveJSON.
pub fn parse(text: &str) -> Result<ParsedDocument, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let strict = normalize(text);
    let value: Value = serde_json::from_str(&strict).map_err(|e| FormatError::syntax(&e))?;
    let document = document_from_value(value)?;

    let warnings = collect_warnings(&document);
    for warning in &warnings {
        log::warn!("{warning}");
    }

    Ok(ParsedDocument { document, warnings })
}

/// [`parse`] without the warning list; warnings are still logged.
pub fn parse_document(text: &str) -> Result<WaveDocument, FormatError> {
    parse(text).map(|parsed| parsed.document)
}

/// Build a document from an already-decoded JSON value.
pub fn document_from_value(value: Value) -> Result<WaveDocument, FormatError> {
    let Value::Object(mut root) = value else {
        return Err(missing_signal());
    };
    let Some(Value::Array(raw_items)) = root.get_mut("signal").map(Value::take) else {
        return Err(missing_signal());
    };

    let items = raw_items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            SignalItem::try_from(raw)
                .map_err(|e| FormatError::Structure(format!("signal[{index}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // `signal` was taken above; reset it to an empty array so the remaining
    // sections deserialize without re-walking the items.
    root.insert("signal".to_string(), Value::Array(Vec::new()));
    let mut document: WaveDocument = serde_json::from_value(Value::Object(root))
        .map_err(|e| FormatError::Structure(e.to_string()))?;
    document.signal = items;
    Ok(document)
}

fn missing_signal() -> FormatError {
    FormatError::Structure(
        "'signal' property must be an array and exist at the root.".to_string(),
    )
}

fn collect_warnings(document: &WaveDocument) -> Vec<ParseWarning> {
    document
        .signals()
        .flat_map(|(path, signal)| {
            let mut found = Vec::new();
            if signal.name.is_none() && !signal.extra.contains_key("name") {
                found.push(ParseWarning::MissingName(path.clone()));
            }
            if signal.wave.is_none() && !signal.extra.contains_key("wave") {
                found.push(ParseWarning::MissingWave(path.clone()));
            }
            found.extend(signal.mistyped_fields().map(|field| ParseWarning::MistypedField {
                path: path.clone(),
                field,
            }));
            found
        })
        .collect()
}

/// Parse relaxed text into an untyped value, normalizing first.
pub fn parse_value(text: &str) -> Result<Value, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }
    serde_json::from_str(&normalize(text)).map_err(|e| FormatError::syntax(&e))
}
