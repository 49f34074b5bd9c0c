//! All error types for the pomocodec crate.
//!
//! Binary decoding fails with [`FormatError`], text parsing with [`ParseError`].
//! Both are wrapped by the crate-wide [`Error`] returned from file-level operations.

use thiserror::Error;

/// Failures while decoding a compiled `.mo` catalog.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unrecognized signature {0:02x?}")]
    UnrecognizedSignature([u8; 4]),

    #[error("unsupported revision {0}")]
    UnsupportedRevision(u32),

    #[error("truncated data: {length} bytes at offset {offset} reach past end of stream")]
    Truncated { offset: u64, length: u64 },

    #[error("string at index {index} is not valid UTF-8")]
    InvalidUtf8 {
        index: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Failures while parsing a `.po` catalog. Every variant knows its 1-based line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no method found: `{directive}` on line {line}")]
    UnknownDirective { line: usize, directive: String },

    #[error("not string format: {text:?} on line {line}")]
    NotStringFormat { line: usize, text: String },

    #[error("string without a preceding directive on line {line}")]
    OrphanString { line: usize },

    #[error("plural index {index} exceeds {max} on line {line}")]
    PluralIndexOutOfRange {
        line: usize,
        index: String,
        max: usize,
    },
}

impl ParseError {
    /// The 1-based line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownDirective { line, .. }
            | ParseError::NotStringFormat { line, .. }
            | ParseError::OrphanString { line }
            | ParseError::PluralIndexOutOfRange { line, .. } => *line,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unrecognized_signature_error() {
        let error = FormatError::UnrecognizedSignature([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            error.to_string(),
            "unrecognized signature [de, ad, be, ef]"
        );
    }

    #[test]
    fn test_unsupported_revision_error() {
        let error = FormatError::UnsupportedRevision(2);
        assert_eq!(error.to_string(), "unsupported revision 2");
    }

    #[test]
    fn test_parse_error_line() {
        let error = ParseError::NotStringFormat {
            line: 6,
            text: "\"".to_string(),
        };
        assert_eq!(error.line(), 6);
        assert!(error.to_string().contains("on line 6"));

        let error = ParseError::UnknownDirective {
            line: 3,
            directive: "msgfoo".to_string(),
        };
        assert_eq!(error.line(), 3);
        assert!(error.to_string().starts_with("no method found"));

        let error = ParseError::PluralIndexOutOfRange {
            line: 9,
            index: "70000".to_string(),
            max: 65535,
        };
        assert_eq!(error.line(), 9);
        assert_eq!(
            error.to_string(),
            "plural index 70000 exceeds 65535 on line 9"
        );
    }

    #[test]
    fn test_wrapped_errors() {
        let error = Error::from(FormatError::UnsupportedRevision(7));
        assert!(error.to_string().starts_with("format error"));

        let error = Error::from(ParseError::OrphanString { line: 1 });
        assert!(error.to_string().starts_with("parse error"));

        let error = Error::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownFormat("xyz".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownFormat"));
        assert!(debug.contains("xyz"));
    }
}
