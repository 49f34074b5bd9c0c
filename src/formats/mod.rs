//! All supported catalog file formats for pomocodec.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod mo;
pub mod po;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

pub use mo::MoFile;
pub use po::PoFile;

use crate::Error;

/// Represents all supported catalog file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Editable gettext text catalog (`.po`).
    Po,
    /// Compiled gettext binary catalog (`.mo`), read-only.
    Mo,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use pomocodec::formats::FormatType;
/// assert_eq!(FormatType::Po.to_string(), "po");
/// assert_eq!(FormatType::Mo.to_string(), "mo");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Po => write!(f, "po"),
            FormatType::Mo => write!(f, "mo"),
        }
    }
}

/// Accepts `po`/`pot` and `mo`/`gmo`, case-insensitively.
///
/// Returns [`crate::error::Error::UnknownFormat`] for unknown strings.
///
/// # Example
/// ```rust
/// use pomocodec::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("PO").unwrap(), FormatType::Po);
/// assert_eq!(FormatType::from_str("gmo").unwrap(), FormatType::Mo);
/// assert!(FormatType::from_str("xliff").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "po" | "pot" => Ok(FormatType::Po),
            "mo" | "gmo" => Ok(FormatType::Mo),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Po => "po",
            FormatType::Mo => "mo",
        }
    }

    /// Whether pomocodec can write this format.
    pub fn is_writable(&self) -> bool {
        matches!(self, FormatType::Po)
    }
}

/// Infers a [`FormatType`] from a file path's extension.
///
/// # Example
/// ```rust
/// use pomocodec::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(infer_format_from_extension("de/messages.po"), Some(FormatType::Po));
/// assert_eq!(infer_format_from_extension("messages.MO"), Some(FormatType::Mo));
/// assert_eq!(infer_format_from_extension("messages.txt"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    path.as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .and_then(|ext| FormatType::from_str(ext).ok())
}
