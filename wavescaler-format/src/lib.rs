//! # wavescaler-format — WaveJSON text I/O
//!
//! Parsing (strict JSON or the relaxed JavaScript-literal dialect WaveDrom
//! users write), generation, and shareable-link encoding.
//!
//! ```text
//!  text ──▸ relaxed::normalize ──▸ serde_json ──▸ shape check ──▸ WaveDocument
//!                                                                    │
//!  text ◂── generate(pretty) ◂────────────────────────────────────────┘
//!  link ◂── share::share_url (relaxed text, percent-encoded)
//! ```

pub mod error;
pub mod generator;
pub mod parser;
pub mod relaxed;
pub mod share;

pub use error::{FormatError, FormatErrorKind};
pub use generator::{generate, generate_value, to_relaxed};
pub use parser::{document_from_value, parse, parse_document, parse_value, ParseWarning, ParsedDocument};
pub use share::{decode_share_url, share_url, strip_share_param, SHARE_PARAM};
