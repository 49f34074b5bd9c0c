//! Decoder for the compiled gettext `.mo` format.
//!
//! The hash table is never consulted; both string tables are scanned linearly.
//! Writing `.mo` files is not supported.

use std::io::{BufRead, Cursor};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use crate::{
    error::{Error, FormatError},
    traits::Parser,
    types::{CatalogHeader, Entry, Source, Target},
};

const MAGIC_LITTLE_ENDIAN: [u8; 4] = [0xde, 0x12, 0x04, 0x95];
const MAGIC_BIG_ENDIAN: [u8; 4] = [0x95, 0x04, 0x12, 0xde];

/// Separates singular/plural sources and the plural targets inside one string.
const PLURAL_SEPARATOR: char = '\0';

/// Number of 4-byte system-dependent fields that follow the header in revision 1.
const SYSDEP_FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Fixed header fields following the magic number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoHeader {
    pub endianness: Endianness,
    pub revision: u32,
    pub string_count: u32,
    pub original_table_offset: u32,
    pub translated_table_offset: u32,
    pub hash_table_size: u32,
    pub hash_table_offset: u32,
}

/// A catalog decoded from one or more `.mo` buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoFile {
    /// Decoded entries; no two are equal by source and target.
    pub entries: Vec<Entry>,
    /// Settings from the most recently decoded metadata entry.
    pub header: CatalogHeader,
}

impl MoFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        MoFile {
            entries,
            header: CatalogHeader::default(),
        }
    }

    /// Decodes a single buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut mo = MoFile::new();
        mo.add_entries_from_bytes(bytes)?;
        Ok(mo)
    }

    /// Decodes `bytes` and appends every entry not already present.
    ///
    /// Comments are never merged. On error the catalog is left untouched.
    pub fn add_entries_from_bytes(&mut self, bytes: &[u8]) -> Result<&[Entry], FormatError> {
        let (pairs, header) = decode_strings(bytes)?;

        let mut added = 0;
        for (source, target) in pairs {
            let entry = build_entry(source, target);
            if self.entries.contains(&entry) {
                trace!("skipping duplicate entry {}", entry);
                continue;
            }
            self.entries.push(entry);
            added += 1;
        }
        if let Some(header) = header {
            self.header = header;
        }

        debug!("decoded {} new entries from binary catalog", added);
        Ok(&self.entries)
    }
}

impl Parser for MoFile {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(MoFile::parse(&bytes)?)
    }
}

/// Reads the header fields and checks the revision.
pub fn read_header(bytes: &[u8]) -> Result<MoHeader, FormatError> {
    let magic: [u8; 4] = bytes
        .get(0..4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(FormatError::Truncated {
            offset: 0,
            length: 4,
        })?;

    let endianness = match magic {
        MAGIC_LITTLE_ENDIAN => Endianness::Little,
        MAGIC_BIG_ENDIAN => Endianness::Big,
        other => return Err(FormatError::UnrecognizedSignature(other)),
    };

    let mut reader = ByteReader::new(bytes, endianness);
    reader.seek(4);

    let header = MoHeader {
        endianness,
        revision: reader.read_u32()?,
        string_count: reader.read_u32()?,
        original_table_offset: reader.read_u32()?,
        translated_table_offset: reader.read_u32()?,
        hash_table_size: reader.read_u32()?,
        hash_table_offset: reader.read_u32()?,
    };

    match header.revision {
        0 => {}
        1 => {
            for _ in 0..SYSDEP_FIELD_COUNT {
                reader.read_u32()?;
            }
        }
        revision => return Err(FormatError::UnsupportedRevision(revision)),
    }

    Ok(header)
}

/// Returns the raw source/target pairs in table order plus the header parsed
/// from the last metadata entry, if any.
fn decode_strings(
    bytes: &[u8],
) -> Result<(Vec<(String, String)>, Option<CatalogHeader>), FormatError> {
    let header = read_header(bytes)?;
    debug!(
        "binary catalog: {:?} endian, revision {}, {} strings",
        header.endianness, header.revision, header.string_count
    );

    let mut reader = ByteReader::new(bytes, header.endianness);
    let originals = reader.read_table(header.original_table_offset, header.string_count)?;
    let translations = reader.read_table(header.translated_table_offset, header.string_count)?;

    let mut pairs = Vec::with_capacity(originals.len());
    let mut metadata = None;

    for (index, (original, translation)) in originals.iter().zip(&translations).enumerate() {
        let source = reader.read_string(*original, index)?;
        let target = reader.read_string(*translation, index)?;

        if source.is_empty() {
            let catalog_header = CatalogHeader::from_metadata(&target);
            debug!(
                "metadata: charset {:?}, nplurals {}, plural {}",
                catalog_header.charset,
                catalog_header.plural_count,
                catalog_header.plural_expression
            );
            metadata = Some(catalog_header);
        }

        pairs.push((source, target));
    }

    Ok((pairs, metadata))
}

fn build_entry(source: String, target: String) -> Entry {
    if !source.contains(PLURAL_SEPARATOR) && !target.contains(PLURAL_SEPARATOR) {
        return Entry::singular(source, target);
    }

    let (singular, plural) = source
        .split_once(PLURAL_SEPARATOR)
        .unwrap_or((source.as_str(), ""));

    Entry {
        source: Some(Source::Plural {
            singular: singular.to_string(),
            plural: plural.to_string(),
        }),
        target: Some(Target::Plural(
            target
                .split(PLURAL_SEPARATOR)
                .map(|form| Some(form.to_string()))
                .collect(),
        )),
        comment: None,
    }
}

/// `(length, offset)` of one string in the data area.
#[derive(Debug, Clone, Copy)]
struct StringRef {
    length: u32,
    offset: u32,
}

struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    endianness: Endianness,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
        ByteReader {
            cursor: Cursor::new(bytes),
            endianness,
        }
    }

    fn seek(&mut self, offset: u64) {
        self.cursor.set_position(offset);
    }

    fn read_u32(&mut self) -> Result<u32, FormatError> {
        let offset = self.cursor.position();
        let value = match self.endianness {
            Endianness::Little => self.cursor.read_u32::<LittleEndian>(),
            Endianness::Big => self.cursor.read_u32::<BigEndian>(),
        };
        value.map_err(|_| FormatError::Truncated { offset, length: 4 })
    }

    fn read_table(&mut self, offset: u32, count: u32) -> Result<Vec<StringRef>, FormatError> {
        self.ensure_range(u64::from(offset), u64::from(count) * 8)?;
        self.seek(u64::from(offset));

        (0..count)
            .map(|_| {
                Ok::<_, FormatError>(StringRef {
                    length: self.read_u32()?,
                    offset: self.read_u32()?,
                })
            })
            .collect()
    }

    fn read_string(&self, string: StringRef, index: usize) -> Result<String, FormatError> {
        let start = u64::from(string.offset);
        let length = u64::from(string.length);
        self.ensure_range(start, length)?;

        let bytes = self.cursor.get_ref();
        let start = string.offset as usize;
        let end = start + string.length as usize;
        String::from_utf8(bytes[start..end].to_vec())
            .map_err(|source| FormatError::InvalidUtf8 { index, source })
    }

    fn ensure_range(&self, offset: u64, length: u64) -> Result<(), FormatError> {
        let available = self.cursor.get_ref().len() as u64;
        match offset.checked_add(length) {
            Some(end) if end <= available => Ok(()),
            _ => Err(FormatError::Truncated { offset, length }),
        }
    }
}
