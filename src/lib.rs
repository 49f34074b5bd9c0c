#![forbid(unsafe_code)]
//! Gettext catalog toolkit for Rust.
//!
//! Parses and writes the editable `.po` text format and decodes the compiled `.mo`
//! binary format. Both produce the same ordered list of [`Entry`] values.
//!
//! # Quick Start
//!
//! ```rust
//! use pomocodec::{Entry, MoFile, PoFile};
//!
//! let po = PoFile::parse("#, fuzzy\nmsgid \"Back\"\nmsgstr \"Zurück\"")?;
//! assert!(po.entries[0].is_fuzzy());
//! assert_eq!(po.entries[0], Entry::singular("Back", "Zurück"));
//!
//! // Decoded entries can be written out as text.
//! let text = PoFile::with_entries(po.entries).to_text();
//! assert_eq!(text, "#, fuzzy\nmsgid \"Back\"\nmsgstr \"Zurück\"");
//!
//! assert!(MoFile::parse(b"not a catalog").is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **`.po`**: read and write, including plural forms, multi-line strings and comments
//! - **`.mo`**: read only, both byte orders, revisions 0 and 1

pub mod codec;
pub mod error;
pub mod formats;
pub mod read_options;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{Codec, convert, convert_auto},
    error::{Error, FormatError, ParseError},
    formats::{FormatType, MoFile, PoFile, infer_format_from_extension},
    read_options::ReadOptions,
    types::{CatalogHeader, Entry, Field, Source, Target},
};

/// Decodes a compiled catalog.
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<Entry>, FormatError> {
    Ok(MoFile::parse(bytes)?.entries)
}

/// Parses a text catalog.
pub fn parse_text(text: &str) -> Result<Vec<Entry>, ParseError> {
    Ok(PoFile::parse(text)?.entries)
}

/// Renders entries as a text catalog, keeping the last entry for each source key.
pub fn serialize_text(entries: &[Entry]) -> String {
    PoFile::with_entries(entries.to_vec()).to_text()
}
