//! WaveJSON document model.
//!
//! A document is a `signal` sequence of [`SignalItem`]s plus optional
//! `config`, `head`, `foot` and `edge` sections. Items are one of three
//! shapes, distinguished on the wire purely by JSON shape:
//!
//! ```text
//!  { "name": "clk", "wave": "p..." }     → SignalItem::Signal
//!  [ "Bus", { ... }, [ "Nested", ... ] ]  → SignalItem::Group
//!  { }                                    → SignalItem::Spacer
//! ```
//!
//! Fields the model does not know about are kept in `extra` maps so that
//! skins and future extensions survive a parse → generate cycle.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::path::TreePath;

/// Character used in wave strings for "same as previous cycle".
pub const IMPLICIT_CYCLE: char = '.';

// ---------------------------------------------------------------
// Signal
// ---------------------------------------------------------------

/// Payload labels shown inside data cells (`=`, `2`..`9` wave characters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalData {
    Single(String),
    List(Vec<String>),
}

/// Keys with a typed slot on [`Signal`].
pub const SIGNAL_FIELDS: [&str; 6] = ["name", "wave", "data", "period", "phase", "node"];

/// A named waveform lane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SignalData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Skin or extension fields, in insertion order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Signal {
    pub fn new(name: impl Into<String>, wave: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            wave: Some(wave.into()),
            ..Self::default()
        }
    }

    /// Build a Signal from a JSON object without rejecting anything.
    ///
    /// A known key whose value has an unexpected type (`name: 7`,
    /// `data: ['a', 1]`) stays in `extra` under its own key, so the value
    /// still round-trips. See [`Signal::mistyped_fields`].
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut signal = Signal::default();
        for (key, value) in map {
            match key.as_str() {
                "name" => signal.name = typed_or_extra(key, value, &mut signal.extra),
                "wave" => signal.wave = typed_or_extra(key, value, &mut signal.extra),
                "data" => signal.data = typed_or_extra(key, value, &mut signal.extra),
                "period" => signal.period = typed_or_extra(key, value, &mut signal.extra),
                "phase" => signal.phase = typed_or_extra(key, value, &mut signal.extra),
                "node" => signal.node = typed_or_extra(key, value, &mut signal.extra),
                _ => {
                    signal.extra.insert(key, value);
                }
            }
        }
        signal
    }

    /// Known keys that were kept untyped in `extra`.
    pub fn mistyped_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        SIGNAL_FIELDS
            .into_iter()
            .filter(|field| self.extra.contains_key(*field))
    }

    pub fn with_data(mut self, data: SignalData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<Number>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<Number>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Display name, or the empty string for anonymous lanes.
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn wave_str(&self) -> &str {
        self.wave.as_deref().unwrap_or("")
    }

    /// Number of cycles encoded in the wave string.
    pub fn cycle_count(&self) -> usize {
        self.wave_str().chars().count()
    }

    /// Value in effect at `cycle`, resolving implicit `.` cycles backwards
    /// to the last explicit character.
    ///
    /// Returns `None` past the end of the wave or when every cycle up to
    /// `cycle` is implicit.
    pub fn effective_value(&self, cycle: usize) -> Option<char> {
        let chars: Vec<char> = self.wave_str().chars().collect();
        if cycle >= chars.len() {
            return None;
        }
        chars[..=cycle]
            .iter()
            .rev()
            .copied()
            .find(|c| *c != IMPLICIT_CYCLE)
    }

    /// Overwrite the character at `cycle`. Cycles past the end of the wave
    /// are padded with implicit cycles first.
    pub fn set_cycle(&mut self, cycle: usize, value: char) {
        let mut chars: Vec<char> = self.wave_str().chars().collect();
        if cycle < chars.len() {
            chars[cycle] = value;
        } else {
            chars.resize(cycle, IMPLICIT_CYCLE);
            chars.push(value);
        }
        self.wave = Some(chars.into_iter().collect());
    }
}

// ---------------------------------------------------------------
// Group
// ---------------------------------------------------------------

/// Named, nestable collection of items. Serialized as `[name, ...items]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub name: String,
    pub items: Vec<SignalItem>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = SignalItem>) -> Self {
        self.items.extend(items);
        self
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len() + 1))?;
        seq.serialize_element(&self.name)?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

// ---------------------------------------------------------------
// SignalItem
// ---------------------------------------------------------------

/// One row of the `signal` sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalItem {
    Signal(Signal),
    Group(Group),
    Spacer,
}

impl SignalItem {
    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            SignalItem::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn as_signal_mut(&mut self) -> Option<&mut Signal> {
        match self {
            SignalItem::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            SignalItem::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, SignalItem::Group(_))
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, SignalItem::Spacer)
    }
}

impl From<Signal> for SignalItem {
    fn from(signal: Signal) -> Self {
        SignalItem::Signal(signal)
    }
}

impl From<Group> for SignalItem {
    fn from(group: Group) -> Self {
        SignalItem::Group(group)
    }
}

impl TryFrom<Value> for SignalItem {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if map.is_empty() => Ok(SignalItem::Spacer),
            Value::Object(map) => Ok(SignalItem::Signal(Signal::from_map(map))),
            Value::Array(elements) => {
                let mut elements = elements.into_iter();
                let name = match elements.next() {
                    Some(Value::String(name)) => name,
                    Some(other) => {
                        return Err(format!("group name must be a string, found {other}"))
                    }
                    None => return Err("group must not be empty".to_string()),
                };
                let items = elements
                    .map(SignalItem::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SignalItem::Group(Group { name, items }))
            }
            other => Err(format!(
                "signal item must be an object or an array, found {other}"
            )),
        }
    }
}

impl Serialize for SignalItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SignalItem::Signal(signal) => signal.serialize(serializer),
            SignalItem::Group(group) => group.serialize(serializer),
            SignalItem::Spacer => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl<'de> Deserialize<'de> for SignalItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SignalItem::try_from(value).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------
// Document sections
// ---------------------------------------------------------------

/// `head` / `foot` caption block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSection {
    /// Caption text, either a plain string or JsonML markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tock: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hscale: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<TextSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foot: Option<TextSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hspace: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vscale: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root aggregate of a WaveJSON diagram. `signal` is always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveDocument {
    pub signal: Vec<SignalItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<WaveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<TextSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foot: Option<TextSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WaveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signals(signal: impl IntoIterator<Item = SignalItem>) -> Self {
        Self {
            signal: signal.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Copy of this document with the `signal` sequence replaced.
    pub fn with_signal(&self, signal: Vec<SignalItem>) -> Self {
        Self {
            signal,
            config: self.config.clone(),
            head: self.head.clone(),
            foot: self.foot.clone(),
            edge: self.edge.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Effective horizontal scale; an absent or zero `hscale` reads as 1.
    pub fn hscale(&self) -> f64 {
        self.config
            .as_ref()
            .and_then(|c| c.hscale.as_ref())
            .and_then(Number::as_f64)
            .filter(|scale| *scale != 0.0)
            .unwrap_or(1.0)
    }

    pub fn set_hscale(&mut self, scale: f64) {
        let config = self.config.get_or_insert_with(WaveConfig::default);
        config.hscale = number_from_f64(scale);
    }

    /// Depth-first paths of every Signal, skipping Groups and Spacers.
    pub fn signal_paths(&self) -> Vec<TreePath> {
        fn walk(items: &[SignalItem], prefix: &TreePath, out: &mut Vec<TreePath>) {
            for (index, item) in items.iter().enumerate() {
                let path = prefix.child(index);
                match item {
                    SignalItem::Signal(_) => out.push(path),
                    SignalItem::Group(group) => walk(&group.items, &path, out),
                    SignalItem::Spacer => {}
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.signal, &TreePath::root(), &mut out);
        out
    }

    /// Iterate every Signal together with its path.
    pub fn signals(&self) -> impl Iterator<Item = (TreePath, &Signal)> + '_ {
        self.signal_paths().into_iter().filter_map(move |path| {
            crate::tree::item_at_path(&self.signal, &path)
                .and_then(SignalItem::as_signal)
                .map(|signal| (path, signal))
        })
    }
}

fn typed_or_extra<T: DeserializeOwned>(
    key: String,
    value: Value,
    extra: &mut Map<String, Value>,
) -> Option<T> {
    match T::deserialize(&value) {
        Ok(typed) => Some(typed),
        Err(_) => {
            extra.insert(key, value);
            None
        }
    }
}

/// Integral values are stored as JSON integers so `1.0` is emitted as `1`.
pub fn number_from_f64(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_shapes_deserialize() {
        let items: Vec<SignalItem> = serde_json::from_value(json!([
            { "name": "clk", "wave": "p..." },
            {},
            ["Bus", { "name": "a", "wave": "01" }, ["Inner"]]
        ]))
        .unwrap();

        assert!(matches!(items[0], SignalItem::Signal(_)));
        assert!(items[1].is_spacer());
        let group = items[2].as_group().unwrap();
        assert_eq!(group.name, "Bus");
        assert_eq!(group.items.len(), 2);
        assert_eq!(group.items[1].as_group().unwrap().name, "Inner");
    }

    #[test]
    fn test_group_serializes_name_first() {
        let group = Group::new("G").with_items([Signal::new("a", "0").into()]);
        let value = serde_json::to_value(SignalItem::Group(group)).unwrap();
        assert_eq!(value, json!(["G", { "name": "a", "wave": "0" }]));
    }

    #[test]
    fn test_spacer_serializes_as_empty_object() {
        assert_eq!(serde_json::to_string(&SignalItem::Spacer).unwrap(), "{}");
    }

    #[test]
    fn test_rejects_malformed_items() {
        assert!(SignalItem::try_from(json!([])).is_err());
        assert!(SignalItem::try_from(json!([1, {}])).is_err());
        assert!(SignalItem::try_from(json!("clk")).is_err());
    }

    #[test]
    fn test_mistyped_fields_kept_in_extra() {
        let value = json!({ "name": 7, "wave": "x==", "data": ["a", 1], "period": 2 });
        let item = SignalItem::try_from(value.clone()).unwrap();
        let signal = item.as_signal().unwrap();

        assert_eq!(signal.name, None);
        assert_eq!(signal.data, None);
        assert_eq!(signal.wave.as_deref(), Some("x=="));
        assert_eq!(signal.period, Some(Number::from(2)));
        assert_eq!(signal.extra.get("name"), Some(&json!(7)));
        assert_eq!(signal.mistyped_fields().collect::<Vec<_>>(), vec!["name", "data"]);

        let written = serde_json::to_value(&item).unwrap();
        assert_eq!(written.get("name"), Some(&json!(7)));
        assert_eq!(written.get("data"), Some(&json!(["a", 1])));
        assert_eq!(SignalItem::try_from(written).unwrap(), item);
    }

    #[test]
    fn test_extension_fields_survive() {
        let value = json!({ "name": "a", "wave": "01", "skin": "narrow", "phase": 0.5 });
        let item = SignalItem::try_from(value.clone()).unwrap();
        let signal = item.as_signal().unwrap();
        assert_eq!(signal.extra.get("skin"), Some(&json!("narrow")));
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_integer_period_stays_integer() {
        let item = SignalItem::try_from(json!({ "name": "a", "wave": "0", "period": 2 })).unwrap();
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"name":"a","wave":"0","period":2}"#
        );
    }

    #[test]
    fn test_effective_value_resolves_implicit_cycles() {
        let signal = Signal::new("a", "1..0.");
        assert_eq!(signal.effective_value(0), Some('1'));
        assert_eq!(signal.effective_value(2), Some('1'));
        assert_eq!(signal.effective_value(4), Some('0'));
        assert_eq!(signal.effective_value(5), None);
        assert_eq!(Signal::new("b", "..").effective_value(1), None);
    }

    #[test]
    fn test_set_cycle_pads_with_implicit_cycles() {
        let mut signal = Signal::new("a", "01");
        signal.set_cycle(4, 'x');
        assert_eq!(signal.wave.as_deref(), Some("01..x"));
        signal.set_cycle(0, '1');
        assert_eq!(signal.wave.as_deref(), Some("11..x"));
    }

    #[test]
    fn test_signal_paths_skip_groups_and_spacers() {
        let doc = WaveDocument::with_signals([
            Signal::new("a", "0").into(),
            SignalItem::Spacer,
            Group::new("G")
                .with_items([Signal::new("b", "1").into(), SignalItem::Spacer])
                .into(),
        ]);
        let paths = doc.signal_paths();
        assert_eq!(paths, vec![TreePath::from(vec![0]), TreePath::from(vec![2, 0])]);
        let names: Vec<_> = doc.signals().map(|(_, s)| s.name_or_default().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_hscale_defaults_and_updates() {
        let mut doc = WaveDocument::new();
        assert_eq!(doc.hscale(), 1.0);
        doc.set_hscale(1.25);
        assert_eq!(doc.hscale(), 1.25);
        doc.set_hscale(2.0);
        assert_eq!(
            doc.config.as_ref().unwrap().hscale,
            Some(Number::from(2))
        );
    }
}
