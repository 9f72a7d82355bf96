use thiserror::Error;

/// Coarse classification of a [`FormatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatErrorKind {
    /// Malformed textual input.
    Syntax,
    /// Well-formed JSON that is not a WaveJSON document.
    Structure,
    /// A document that cannot be written out.
    Validation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Input string is empty or only whitespace.")]
    Empty,

    #[error("JSON syntax error: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid URL encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid WaveJSON structure: {0}")]
    Structure(String),

    #[error("Invalid WaveJSON object: {0}")]
    Validation(String),
}

impl FormatError {
    pub fn kind(&self) -> FormatErrorKind {
        match self {
            FormatError::Empty | FormatError::Syntax { .. } | FormatError::InvalidEncoding(_) => {
                FormatErrorKind::Syntax
            }
            FormatError::Structure(_) => FormatErrorKind::Structure,
            FormatError::Validation(_) => FormatErrorKind::Validation,
        }
    }

    pub(crate) fn syntax(e: &serde_json::Error) -> Self {
        FormatError::Syntax {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}
