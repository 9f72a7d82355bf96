//! Structural difference between documents, used to suppress duplicate
//! history entries.
//!
//! Only the `signal` sequence takes part in the comparison. Wave strings are
//! compared literally: `"1.."` and `"111"` render identically but count as
//! different states. Numbers compare by value, so `2` and `2.0` are equal.

use serde_json::{Map, Number, Value};

use crate::model::{Signal, SignalItem, WaveDocument};

/// True when `a` and `b` differ anywhere in their signal trees.
pub fn is_different(a: &WaveDocument, b: &WaveDocument) -> bool {
    sequences_differ(&a.signal, &b.signal)
}

pub fn sequences_differ(a: &[SignalItem], b: &[SignalItem]) -> bool {
    a.len() != b.len() || a.iter().zip(b).any(|(x, y)| items_differ(x, y))
}

pub fn items_differ(a: &SignalItem, b: &SignalItem) -> bool {
    match (a, b) {
        (SignalItem::Group(x), SignalItem::Group(y)) => {
            x.name != y.name || sequences_differ(&x.items, &y.items)
        }
        (SignalItem::Spacer, SignalItem::Spacer) => false,
        (SignalItem::Signal(x), SignalItem::Signal(y)) => signals_differ(x, y),
        _ => true,
    }
}

fn signals_differ(a: &Signal, b: &Signal) -> bool {
    waves_differ(a.wave.as_deref(), b.wave.as_deref())
        || a.name != b.name
        || a.data != b.data
        || numbers_differ(a.period.as_ref(), b.period.as_ref())
        || numbers_differ(a.phase.as_ref(), b.phase.as_ref())
        || a.node != b.node
        || maps_differ(&a.extra, &b.extra)
}

fn numbers_differ(a: Option<&Number>, b: Option<&Number>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.as_f64() != b.as_f64(),
        (None, None) => false,
        _ => true,
    }
}

fn maps_differ(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() != b.len()
        || a.iter()
            .any(|(key, x)| b.get(key).map_or(true, |y| values_differ(x, y)))
}

fn values_differ(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() != y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() != y.len() || x.iter().zip(y).any(|(x, y)| values_differ(x, y))
        }
        (Value::Object(x), Value::Object(y)) => maps_differ(x, y),
        _ => a != b,
    }
}

/// Cycle-by-cycle comparison; no `.` normalization.
fn waves_differ(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            a.chars().count() != b.chars().count() || a.chars().zip(b.chars()).any(|(x, y)| x != y)
        }
        (None, None) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, SignalData};
    use serde_json::json;

    fn doc(items: Vec<SignalItem>) -> WaveDocument {
        WaveDocument::with_signals(items)
    }

    #[test]
    fn test_identical_documents_are_not_different() {
        let a = doc(vec![
            Signal::new("a", "01.").into(),
            SignalItem::Spacer,
            Group::new("G").with_items([Signal::new("b", "x=").into()]).into(),
        ]);
        assert!(!is_different(&a, &a.clone()));
    }

    #[test]
    fn test_length_mismatch() {
        let a = doc(vec![Signal::new("a", "0").into()]);
        let b = doc(vec![Signal::new("a", "0").into(), SignalItem::Spacer]);
        assert!(is_different(&a, &b));
    }

    #[test]
    fn test_implicit_and_explicit_repeats_differ() {
        let a = doc(vec![Signal::new("a", "1..").into()]);
        let b = doc(vec![Signal::new("a", "111").into()]);
        assert!(is_different(&a, &b));
    }

    #[test]
    fn test_group_vs_signal_differs() {
        let a = doc(vec![Group::new("a").into()]);
        let b = doc(vec![Signal::new("a", "0").into()]);
        assert!(is_different(&a, &b));
    }

    #[test]
    fn test_spacer_vs_signal_differs() {
        let a = doc(vec![SignalItem::Spacer]);
        let b = doc(vec![Signal::new("a", "0").into()]);
        assert!(is_different(&a, &b));
        assert!(!is_different(&a, &doc(vec![SignalItem::Spacer])));
    }

    #[test]
    fn test_nested_group_child_differs() {
        let inner = |wave: &str| -> SignalItem {
            Group::new("outer")
                .with_items([Group::new("inner").with_items([Signal::new("s", wave).into()]).into()])
                .into()
        };
        assert!(is_different(&doc(vec![inner("01")]), &doc(vec![inner("10")])));
        assert!(!is_different(&doc(vec![inner("01")]), &doc(vec![inner("01")])));
    }

    #[test]
    fn test_group_rename_differs() {
        let a = doc(vec![Group::new("A").into()]);
        let b = doc(vec![Group::new("B").into()]);
        assert!(is_different(&a, &b));
    }

    #[test]
    fn test_non_wave_fields_differ() {
        let base = Signal::new("bus", "x=");
        let mut with_data = base.clone();
        with_data.data = Some(SignalData::List(vec!["A".into()]));
        let mut with_extra = base.clone();
        with_extra.extra.insert("skin".into(), json!("narrow"));

        let a = doc(vec![base.into()]);
        assert!(is_different(&a, &doc(vec![with_data.into()])));
        assert!(is_different(&a, &doc(vec![with_extra.into()])));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let with_period = |period: Number| -> WaveDocument {
            let mut signal = Signal::new("a", "0");
            signal.extra.insert("offset".into(), json!([{ "by": period.clone() }]));
            signal.period = Some(period);
            doc(vec![signal.into()])
        };
        let two = Number::from(2);
        let two_float = Number::from_f64(2.0).unwrap();
        let three = Number::from(3);

        assert!(!is_different(&with_period(two.clone()), &with_period(two_float)));
        assert!(is_different(&with_period(two), &with_period(three)));
    }

    #[test]
    fn test_config_is_ignored() {
        let a = doc(vec![Signal::new("a", "0").into()]);
        let mut b = a.clone();
        b.set_hscale(2.0);
        assert!(!is_different(&a, &b));
    }
}
