//! This module provides the `Codec` struct for loading gettext catalogs from
//! `.po` and `.mo` files into one ordered list of entries, writing them back out
//! as `.po` text, and caching them as JSON.
//!
//! Every load appends to the same entry list, so a `.po` file and several `.mo`
//! files can be combined; duplicates (equal source and target) are skipped unless
//! [`ReadOptions::dedupe`] is turned off.
use std::path::Path;

use tracing::debug;

use crate::{
    error::Error,
    formats::{FormatType, MoFile, PoFile, infer_format_from_extension},
    read_options::ReadOptions,
    traits::{Parser, Writer},
    types::{CatalogHeader, Entry},
};

/// An ordered collection of catalog entries gathered from one or more files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    /// All loaded entries, in load order.
    pub entries: Vec<Entry>,
}

impl Codec {
    /// Creates a new, empty `Codec`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over all entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header values declared by the last metadata entry.
    pub fn header(&self) -> CatalogHeader {
        CatalogHeader::from_entries(&self.entries)
    }

    /// Appends entries, skipping ones already present when `dedupe` is set.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = Entry>, dedupe: bool) {
        for entry in entries {
            if dedupe && self.entries.contains(&entry) {
                continue;
            }
            self.entries.push(entry);
        }
    }

    /// Reads a catalog file given its path and explicit format type.
    pub fn read_file_by_type<P: AsRef<Path>>(
        &mut self,
        path: P,
        format_type: FormatType,
    ) -> Result<(), Error> {
        self.read_file_with_options(path, &ReadOptions::new().with_format_hint(Some(format_type)))
    }

    /// Reads a catalog file, inferring its format from the file extension.
    pub fn read_file_by_extension<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.read_file_with_options(path, &ReadOptions::new())
    }

    /// Reads a catalog file with explicit [`ReadOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when no hint is given and the
    /// extension is not recognized, or the format/parse/I/O error of the read.
    pub fn read_file_with_options<P: AsRef<Path>>(
        &mut self,
        path: P,
        options: &ReadOptions,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let format_type = match options.format_hint {
            Some(format_type) => format_type,
            None => infer_format_from_extension(path).ok_or_else(|| {
                Error::UnsupportedFormat(format!(
                    "Unsupported file extension: {:?}.",
                    path.extension()
                ))
            })?,
        };

        let entries = read_entries(path, format_type)?;
        debug!(
            "read {} entries from {} as {}",
            entries.len(),
            path.display(),
            format_type
        );
        self.add_entries(entries, options.dedupe);

        Ok(())
    }

    /// Writes all entries to `path` as `.po` text.
    ///
    /// Entries sharing a source key collapse to the last one.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(format_type) = infer_format_from_extension(path) {
            if !format_type.is_writable() {
                return Err(Error::UnsupportedFormat(format!(
                    "Writing {} files is not supported.",
                    format_type
                )));
            }
        }
        PoFile::with_entries(self.entries.clone()).write_to(path)
    }

    /// Renders all entries as `.po` text.
    pub fn to_po_text(&self) -> String {
        PoFile::with_entries(self.entries.clone()).to_text()
    }

    /// Caches the current entries to a JSON file, comments included.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        let mut writer = std::fs::File::create(path).map_err(Error::Io)?;
        serde_json::to_writer(&mut writer, &self.entries)?;
        Ok(())
    }

    /// Loads entries from a JSON cache file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = std::io::BufReader::new(std::fs::File::open(path).map_err(Error::Io)?);
        let entries: Vec<Entry> = serde_json::from_reader(reader)?;
        Ok(Codec { entries })
    }
}

fn read_entries(path: &Path, format_type: FormatType) -> Result<Vec<Entry>, Error> {
    match format_type {
        FormatType::Po => Ok(PoFile::read_from(path)?.entries),
        FormatType::Mo => Ok(MoFile::read_from(path)?.entries),
    }
}

/// Convert a catalog file into `.po` text.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if `output_format` is not writable, or
/// any error from reading `input`.
///
/// # Example
///
/// ```rust,no_run
/// use pomocodec::{convert, formats::FormatType};
/// convert("de.mo", FormatType::Mo, "de.po", FormatType::Po)?;
/// # Ok::<(), pomocodec::Error>(())
/// ```
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    input_format: FormatType,
    output: Q,
    output_format: FormatType,
) -> Result<(), Error> {
    if !output_format.is_writable() {
        return Err(Error::UnsupportedFormat(format!(
            "Writing {} files is not supported.",
            output_format
        )));
    }

    let entries = read_entries(input.as_ref(), input_format)?;
    PoFile::with_entries(entries).write_to(output)
}

/// Convert a catalog file, inferring both formats from file extensions.
///
/// ```rust,no_run
/// pomocodec::convert_auto("locale/de/messages.mo", "messages.po")?;
/// # Ok::<(), pomocodec::Error>(())
/// ```
pub fn convert_auto<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<(), Error> {
    let input_format = infer_format_from_extension(&input).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "Cannot infer input format from extension: {:?}",
            input.as_ref().extension()
        ))
    })?;
    let output_format = infer_format_from_extension(&output).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "Cannot infer output format from extension: {:?}",
            output.as_ref().extension()
        ))
    })?;
    convert(input, input_format, output, output_format)
}
