//! Shareable links carrying a document in the `waveform` query parameter.
//!
//! The payload is the compact relaxed rendering, percent-encoded with the
//! same unreserved set as JavaScript's `encodeURIComponent`, so links made
//! here open in the web editor and vice versa.

use wavescaler_core::WaveDocument;

use crate::error::FormatError;
use crate::generator::to_relaxed;
use crate::parser::{parse, ParsedDocument};

pub const SHARE_PARAM: &str = "waveform";

/// `{base without query or fragment}?waveform=<encoded relaxed text>`.
pub fn share_url(base: &str, doc: &WaveDocument) -> Result<String, FormatError> {
    let payload = to_relaxed(doc)?;
    let (base, _, _) = split_url(base);
    Ok(format!("{base}?{SHARE_PARAM}={}", encode_component(&payload)))
}

/// Document carried by `url`, if any.
///
/// `Ok(None)` when the parameter is absent or empty; an error when it is
/// present but does not decode or parse.
pub fn decode_share_url(url: &str) -> Result<Option<ParsedDocument>, FormatError> {
    let (_, query, _) = split_url(url);
    let Some(raw) = query_pairs(query).find_map(|(key, value)| (key == SHARE_PARAM).then_some(value))
    else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let text = decode_component(raw)?;
    parse(&text).map(Some)
}

/// `url` with every `waveform` parameter removed; other parameters keep
/// their order and the fragment is kept.
pub fn strip_share_param(url: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(SHARE_PARAM))
        .collect();

    let mut out = base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// `(before '?', query, fragment)`.
fn split_url(url: &str) -> (&str, &str, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, query, fragment),
        None => (rest, "", fragment),
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

pub fn encode_component(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Percent-decoding with form semantics (`+` is a space).
pub fn decode_component(text: &str) -> Result<String, FormatError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
                let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    return Err(FormatError::InvalidEncoding(format!(
                        "malformed escape at byte {i}"
                    )));
                };
                out.push(hi << 4 | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|e| FormatError::InvalidEncoding(e.to_string()))
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
